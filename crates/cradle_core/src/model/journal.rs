//! Journal entry and letter models.

use serde::{Deserialize, Serialize};

/// Mood tag attached to a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Radiant,
    Good,
    Tired,
    Anxious,
    Low,
}

/// One diary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Row id; 0 until persisted.
    pub id: i64,
    pub title: String,
    pub body: String,
    pub mood: Mood,
    /// Supportive reply attached later; a fresh entry has none.
    pub reply: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl JournalEntry {
    pub fn new(title: impl Into<String>, body: impl Into<String>, mood: Mood) -> Self {
        Self {
            id: 0,
            title: title.into(),
            body: body.into(),
            mood,
            reply: None,
            created_at: 0,
            updated_at: 0,
        }
    }
}

/// A keepsake letter written to the baby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Letter {
    /// Row id; 0 until persisted.
    pub id: i64,
    pub title: String,
    pub body: String,
    pub created_at: i64,
}

impl Letter {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            body: body.into(),
            created_at: 0,
        }
    }
}
