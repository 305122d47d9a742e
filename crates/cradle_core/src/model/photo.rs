//! Weekly belly photo model.

use serde::{Deserialize, Serialize};

/// One photo per gestation week.
///
/// The week number is the identity; storing a photo for an already
/// photographed week replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BellyPhoto {
    pub week: u32,
    /// Absolute path of the stored image copy.
    pub file_path: String,
    pub note: Option<String>,
    pub created_at: i64,
}

impl BellyPhoto {
    pub fn new(week: u32, file_path: impl Into<String>) -> Self {
        Self {
            week,
            file_path: file_path.into(),
            note: None,
            created_at: 0,
        }
    }
}
