//! Reminder model.

use serde::{Deserialize, Serialize};

/// A dated to-do surfaced through local notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Row id; 0 until persisted.
    pub id: i64,
    pub title: String,
    pub note: Option<String>,
    /// Epoch milliseconds when the reminder is due.
    pub due_at: i64,
    pub is_done: bool,
    /// Whether the platform notification for it already fired.
    pub notified: bool,
    pub created_at: i64,
}

impl Reminder {
    /// Creates a pending reminder: not completed, not notified.
    pub fn new(title: impl Into<String>, due_at: i64) -> Self {
        Self {
            id: 0,
            title: title.into(),
            note: None,
            due_at,
            is_done: false,
            notified: false,
            created_at: 0,
        }
    }
}
