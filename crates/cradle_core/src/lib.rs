//! Core domain logic for the cradle pregnancy/baby tracker.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod live;
pub mod logging;
pub mod model;
pub mod profile;
pub mod repo;
pub mod search;
pub mod service;
pub mod stats;

pub use live::{ChangeBus, ChangeListener, FilteredLive, LiveQuery, Topic};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::checklist::{Category, ChecklistItem, ChecklistKind, WeeklyCheck};
pub use model::contraction::{Contraction, Intensity, SessionId};
pub use model::document::{Document, DocumentCategory};
pub use model::growth::{GrowthRecord, HealthKind, HealthRecord};
pub use model::journal::{JournalEntry, Letter, Mood};
pub use model::name::{BabyName, Gender};
pub use model::photo::BellyPhoto;
pub use model::reminder::Reminder;
pub use profile::{BabyProfile, ProfileError, ProfileResult, ProfileStore};
pub use repo::checklist_repo::{ChecklistRepository, SqliteChecklistRepository};
pub use repo::contraction_repo::{ContractionRepository, SqliteContractionRepository};
pub use repo::document_repo::{DocumentRepository, SqliteDocumentRepository};
pub use repo::growth_repo::{GrowthRepository, HealthRepository, SqliteGrowthRepository};
pub use repo::journal_repo::{JournalRepository, LetterRepository, SqliteJournalRepository};
pub use repo::name_repo::{NameRepository, SqliteNameRepository};
pub use repo::photo_repo::{PhotoRepository, SqlitePhotoRepository};
pub use repo::reminder_repo::{ReminderRepository, SqliteReminderRepository};
pub use repo::{RepoError, RepoResult};
pub use search::{search_everything, SearchDomain, SearchError, SearchHit, SearchQuery};
pub use service::contraction_service::{
    ContractionService, ContractionServiceError, ContractionTimer, TimerError, TimerState,
};
pub use service::document_service::{DocumentService, DocumentServiceError};
pub use service::growth_service::{
    GrowthAssessment, GrowthForm, GrowthService, GrowthServiceError,
};
pub use stats::contraction::{session_stats, should_go_to_hospital, SessionStats};
pub use stats::growth::{classify_height, classify_weight, GrowthBand};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
