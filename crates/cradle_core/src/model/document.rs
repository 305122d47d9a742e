//! Stored document model.
//!
//! Rows reference copied files by absolute path; file content is never
//! embedded in the database.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Ultrasound,
    LabResult,
    Prescription,
    Insurance,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Row id; 0 until persisted.
    pub id: i64,
    pub title: String,
    pub category: DocumentCategory,
    /// Absolute path of the managed copy.
    pub file_path: String,
    pub created_at: i64,
}

impl Document {
    pub fn new(
        title: impl Into<String>,
        category: DocumentCategory,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            title: title.into(),
            category,
            file_path: file_path.into(),
            created_at: 0,
        }
    }
}
