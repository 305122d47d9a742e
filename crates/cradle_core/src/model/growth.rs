//! Growth measurement and health event models.

use serde::{Deserialize, Serialize};

/// One weighing/measuring session for the baby.
///
/// Both measurements are optional; a record with neither still documents
/// that a session happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    /// Row id; 0 until persisted.
    pub id: i64,
    /// Epoch milliseconds when the measurement was taken.
    pub recorded_at: i64,
    /// Baby age at measurement time.
    pub age_weeks: u32,
    pub weight_grams: Option<u32>,
    pub height_cm: Option<f64>,
    pub note: Option<String>,
}

impl GrowthRecord {
    pub fn new(recorded_at: i64, age_weeks: u32) -> Self {
        Self {
            id: 0,
            recorded_at,
            age_weeks,
            weight_grams: None,
            height_cm: None,
            note: None,
        }
    }
}

/// Medical vs. developmental milestone distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthKind {
    Medical,
    Development,
}

/// A dated medical or development event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Row id; 0 until persisted.
    pub id: i64,
    pub kind: HealthKind,
    pub title: String,
    pub note: Option<String>,
    pub occurred_at: i64,
}

impl HealthRecord {
    pub fn new(kind: HealthKind, title: impl Into<String>, occurred_at: i64) -> Self {
        Self {
            id: 0,
            kind,
            title: title.into(),
            note: None,
            occurred_at,
        }
    }
}
