//! Checklist domain models.
//!
//! # Responsibility
//! - Define the shared item shape used by the hospital bag, baby shower
//!   and birth plan lists.
//! - Define the per-week pregnancy check item keyed by (week, title).
//!
//! # Invariants
//! - `id` is 0 until the record is persisted, then stable.
//! - Weekly checks keep at most one row per (week, title).

use serde::{Deserialize, Serialize};

/// Which of the app's checklists an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistKind {
    HospitalBag,
    BabyShower,
    BirthPlan,
}

/// Who or what an item is for. Drives grouping and sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Mom,
    Baby,
    Partner,
    Paperwork,
    Other,
}

/// One entry on a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Row id; 0 until persisted.
    pub id: i64,
    pub list: ChecklistKind,
    pub category: Category,
    pub title: String,
    pub note: Option<String>,
    /// Higher sorts first within a category.
    pub priority: i32,
    pub is_done: bool,
    /// Epoch milliseconds, assigned by the store at insert.
    pub created_at: i64,
    /// Epoch milliseconds, refreshed by the store on edit.
    pub updated_at: i64,
}

impl ChecklistItem {
    /// Creates an unchecked item with default priority.
    pub fn new(list: ChecklistKind, category: Category, title: impl Into<String>) -> Self {
        Self {
            id: 0,
            list,
            category,
            title: title.into(),
            note: None,
            priority: 0,
            is_done: false,
            created_at: 0,
            updated_at: 0,
        }
    }
}

/// One pregnancy check item scoped to a gestation week.
///
/// The (week, title) pair is the natural key; re-inserting it replaces the
/// stored state wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyCheck {
    pub week: u32,
    pub title: String,
    pub is_done: bool,
    pub updated_at: i64,
}
