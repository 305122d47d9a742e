//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Keep error semantics simple for UI integration: envelopes, not
//!   exceptions.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Storage is configured once per process before data calls.

use cradle_core::db::open_db;
use cradle_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    session_stats, should_go_to_hospital, Category, ChangeBus, ChecklistItem, ChecklistKind,
    ChecklistRepository, ContractionRepository, NameRepository, SqliteChecklistRepository,
    SqliteContractionRepository, SqliteNameRepository,
};
use log::info;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const NAMES_DEFAULT_LIMIT: u32 = 10;
const NAMES_LIMIT_MAX: u32 = 50;
const DB_FILE_NAME: &str = "cradle.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the storage directory for this process.
///
/// # FFI contract
/// - First call wins; later calls with another directory report an error.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_storage(db_dir: String) -> ActionResponse {
    let requested = PathBuf::from(db_dir).join(DB_FILE_NAME);
    let active = DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        info!(
            "event=storage_configured module=ffi status=ok path={}",
            active.display()
        );
        ActionResponse::success("storage configured", None)
    } else {
        ActionResponse::failure(format!(
            "storage already configured at `{}`",
            active.display()
        ))
    }
}

/// Generic action response envelope for command flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Optional created row id.
    pub row_id: Option<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, row_id: Option<i64>) -> Self {
        Self {
            ok: true,
            row_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            row_id: None,
            message: message.into(),
        }
    }
}

/// Checklist item projection for list display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItemView {
    pub id: i64,
    pub category: String,
    pub title: String,
    pub is_done: bool,
}

/// Checklist list response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistListResponse {
    pub items: Vec<ChecklistItemView>,
    pub done_count: u32,
    pub total_count: u32,
    pub message: String,
}

/// Lists one checklist with an optional substring filter.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; failures come back as an empty list plus message.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_list(list: String, filter: String) -> ChecklistListResponse {
    let Some(kind) = parse_list_tag(&list) else {
        return ChecklistListResponse {
            items: Vec::new(),
            done_count: 0,
            total_count: 0,
            message: format!("unknown checklist `{list}`"),
        };
    };

    let outcome = with_checklist_repo(|repo| {
        let items = repo.search(kind, filter.as_str())?;
        let (done_count, total_count) = repo.progress(kind)?;
        Ok((items, done_count, total_count))
    });

    match outcome {
        Ok((items, done_count, total_count)) => ChecklistListResponse {
            items: items.iter().map(item_view).collect(),
            done_count,
            total_count,
            message: String::new(),
        },
        Err(message) => ChecklistListResponse {
            items: Vec::new(),
            done_count: 0,
            total_count: 0,
            message,
        },
    }
}

/// Adds one checklist item.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; returns a deterministic envelope.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_add(list: String, category: String, title: String) -> ActionResponse {
    let Some(kind) = parse_list_tag(&list) else {
        return ActionResponse::failure(format!("unknown checklist `{list}`"));
    };
    let Some(category) = parse_category_tag(&category) else {
        return ActionResponse::failure(format!("unknown category `{category}`"));
    };
    if title.trim().is_empty() {
        return ActionResponse::failure("title cannot be blank");
    }

    let outcome = with_checklist_repo(|repo| {
        repo.insert(&ChecklistItem::new(kind, category, title.trim()))
    });
    match outcome {
        Ok(id) => ActionResponse::success("item added", Some(id)),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Toggles one checklist item's completion state.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; returns a deterministic envelope.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_set_done(id: i64, done: bool) -> ActionResponse {
    match with_checklist_repo(|repo| repo.set_done(id, done)) {
        Ok(()) => ActionResponse::success("item updated", Some(id)),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Baby name projection for search display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BabyNameView {
    pub id: i64,
    pub name: String,
    pub gender: String,
    pub is_favorite: bool,
}

/// Name search response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSearchResponse {
    pub items: Vec<BabyNameView>,
    /// Effective applied search limit.
    pub applied_limit: u32,
    pub message: String,
}

/// Searches baby names with an applied result limit.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; returns a deterministic envelope with applied limit.
#[flutter_rust_bridge::frb(sync)]
pub fn names_search(text: String, limit: Option<u32>) -> NameSearchResponse {
    let applied_limit = normalize_names_limit(limit);

    let outcome = open_connection().and_then(|conn| {
        let repo = SqliteNameRepository::try_new(&conn, ChangeBus::new())
            .map_err(|err| err.to_string())?;
        repo.search(text.trim()).map_err(|err| err.to_string())
    });

    match outcome {
        Ok(names) => NameSearchResponse {
            items: names
                .iter()
                .take(applied_limit as usize)
                .map(|name| BabyNameView {
                    id: name.id,
                    name: name.name.clone(),
                    gender: format!("{:?}", name.gender).to_lowercase(),
                    is_favorite: name.is_favorite,
                })
                .collect(),
            applied_limit,
            message: String::new(),
        },
        Err(message) => NameSearchResponse {
            items: Vec::new(),
            applied_limit,
            message,
        },
    }
}

/// Contraction session statistics envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStatsResponse {
    pub ok: bool,
    pub count: u32,
    pub avg_duration_seconds: f64,
    pub avg_interval_seconds: f64,
    pub hospital_flag: bool,
    pub message: String,
}

/// Computes statistics for one stored contraction session.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; returns a deterministic envelope.
#[flutter_rust_bridge::frb(sync)]
pub fn contraction_session_stats(session_id: String) -> SessionStatsResponse {
    let Ok(session) = Uuid::parse_str(session_id.trim()) else {
        return stats_failure(format!("invalid session id `{session_id}`"));
    };

    let outcome = open_connection().and_then(|conn| {
        let repo = SqliteContractionRepository::try_new(&conn, ChangeBus::new())
            .map_err(|err| err.to_string())?;
        repo.list_session(session).map_err(|err| err.to_string())
    });

    match outcome {
        Ok(events) => {
            let stats = session_stats(&events);
            SessionStatsResponse {
                ok: true,
                count: stats.count as u32,
                avg_duration_seconds: stats.avg_duration_seconds,
                avg_interval_seconds: stats.avg_interval_seconds,
                hospital_flag: should_go_to_hospital(&stats),
                message: String::new(),
            }
        }
        Err(message) => stats_failure(message),
    }
}

fn stats_failure(message: String) -> SessionStatsResponse {
    SessionStatsResponse {
        ok: false,
        count: 0,
        avg_duration_seconds: 0.0,
        avg_interval_seconds: 0.0,
        hospital_flag: false,
        message,
    }
}

fn item_view(item: &ChecklistItem) -> ChecklistItemView {
    ChecklistItemView {
        id: item.id,
        category: format!("{:?}", item.category).to_lowercase(),
        title: item.title.clone(),
        is_done: item.is_done,
    }
}

fn with_checklist_repo<T>(
    action: impl FnOnce(&SqliteChecklistRepository<'_>) -> cradle_core::RepoResult<T>,
) -> Result<T, String> {
    let conn = open_connection()?;
    let repo =
        SqliteChecklistRepository::try_new(&conn, ChangeBus::new()).map_err(|err| err.to_string())?;
    action(&repo).map_err(|err| err.to_string())
}

fn open_connection() -> Result<Connection, String> {
    let Some(path) = DB_PATH.get() else {
        return Err("storage not configured; call configure_storage first".to_string());
    };
    open_db(path).map_err(|err| err.to_string())
}

fn normalize_names_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => NAMES_DEFAULT_LIMIT,
        Some(value) if value > NAMES_LIMIT_MAX => NAMES_LIMIT_MAX,
        Some(value) => value,
    }
}

fn parse_list_tag(value: &str) -> Option<ChecklistKind> {
    match value.trim() {
        "hospital_bag" => Some(ChecklistKind::HospitalBag),
        "baby_shower" => Some(ChecklistKind::BabyShower),
        "birth_plan" => Some(ChecklistKind::BirthPlan),
        _ => None,
    }
}

fn parse_category_tag(value: &str) -> Option<Category> {
    match value.trim() {
        "mom" => Some(Category::Mom),
        "baby" => Some(Category::Baby),
        "partner" => Some(Category::Partner),
        "paperwork" => Some(Category::Paperwork),
        "other" => Some(Category::Other),
        _ => None,
    }
}
