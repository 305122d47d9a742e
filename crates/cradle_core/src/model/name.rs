//! Baby name idea model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Girl,
    Boy,
    Neutral,
}

/// One name on the shortlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BabyName {
    /// Row id; 0 until persisted.
    pub id: i64,
    pub name: String,
    pub gender: Gender,
    pub is_favorite: bool,
    pub created_at: i64,
}

impl BabyName {
    pub fn new(name: impl Into<String>, gender: Gender) -> Self {
        Self {
            id: 0,
            name: name.into(),
            gender,
            is_favorite: false,
            created_at: 0,
        }
    }
}
