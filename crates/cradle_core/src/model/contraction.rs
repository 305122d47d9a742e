//! Contraction timing models.
//!
//! # Invariants
//! - Every timed contraction belongs to exactly one session.
//! - Deleting a session removes all records sharing its identifier.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque grouping key assigned when a timing screen opens.
pub type SessionId = Uuid;

/// Perceived strength, chosen after a contraction is stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    #[default]
    Mild,
    Moderate,
    Strong,
}

/// One timed contraction event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contraction {
    /// Row id; 0 until persisted.
    pub id: i64,
    pub session_id: SessionId,
    /// Epoch milliseconds when timing started.
    pub started_at: i64,
    /// Absent while a contraction is still being timed.
    pub duration_seconds: Option<u32>,
    pub intensity: Intensity,
    pub created_at: i64,
}

impl Contraction {
    pub fn new(session_id: SessionId, started_at: i64) -> Self {
        Self {
            id: 0,
            session_id,
            started_at,
            duration_seconds: None,
            intensity: Intensity::default(),
            created_at: 0,
        }
    }
}
