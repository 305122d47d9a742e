//! Contraction repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist timed contraction events grouped by session.
//! - Express session deletion as one bulk predicate delete.
//!
//! # Invariants
//! - Session listings are oldest-first: `started_at ASC, id ASC`.
//! - Deleting a session touches only rows with that session identifier.

use crate::live::{ChangeBus, Topic};
use crate::model::contraction::{Contraction, Intensity, SessionId};
use crate::repo::{ensure_schema_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

/// Repository interface for contraction events.
pub trait ContractionRepository {
    fn insert(&self, contraction: &Contraction) -> RepoResult<i64>;
    /// Events of one session, oldest first.
    fn list_session(&self, session_id: SessionId) -> RepoResult<Vec<Contraction>>;
    /// Distinct session identifiers, most recently started first.
    fn sessions(&self) -> RepoResult<Vec<SessionId>>;
    /// Engine-computed event count for one session.
    fn count_session(&self, session_id: SessionId) -> RepoResult<u32>;
    fn delete(&self, id: i64) -> RepoResult<()>;
    /// Removes every event sharing the session identifier.
    fn delete_session(&self, session_id: SessionId) -> RepoResult<()>;
    fn delete_all(&self) -> RepoResult<()>;
}

/// SQLite-backed contraction repository.
pub struct SqliteContractionRepository<'conn> {
    conn: &'conn Connection,
    bus: ChangeBus,
}

impl<'conn> SqliteContractionRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection, bus: ChangeBus) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["contractions"])?;
        Ok(Self { conn, bus })
    }
}

impl ContractionRepository for SqliteContractionRepository<'_> {
    fn insert(&self, contraction: &Contraction) -> RepoResult<i64> {
        self.conn.execute(
            "INSERT INTO contractions (session_id, started_at, duration_seconds, intensity)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                contraction.session_id.to_string(),
                contraction.started_at,
                contraction.duration_seconds,
                intensity_to_db(contraction.intensity),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.bus.publish(Topic::Contractions);
        Ok(id)
    }

    fn list_session(&self, session_id: SessionId) -> RepoResult<Vec<Contraction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, started_at, duration_seconds, intensity, created_at
             FROM contractions
             WHERE session_id = ?1
             ORDER BY started_at ASC, id ASC;",
        )?;
        let mut rows = stmt.query([session_id.to_string()])?;
        let mut contractions = Vec::new();
        while let Some(row) = rows.next()? {
            contractions.push(parse_contraction_row(row)?);
        }
        Ok(contractions)
    }

    fn sessions(&self) -> RepoResult<Vec<SessionId>> {
        let mut stmt = self.conn.prepare(
            "SELECT session_id, max(started_at) AS last_started
             FROM contractions
             GROUP BY session_id
             ORDER BY last_started DESC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next()? {
            let raw: String = row.get("session_id")?;
            let session = Uuid::parse_str(&raw).map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid session id `{raw}` in contractions.session_id"
                ))
            })?;
            sessions.push(session);
        }
        Ok(sessions)
    }

    fn count_session(&self, session_id: SessionId) -> RepoResult<u32> {
        let count = self.conn.query_row(
            "SELECT count(*) FROM contractions WHERE session_id = ?1;",
            [session_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM contractions WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "contraction",
                id,
            });
        }
        self.bus.publish(Topic::Contractions);
        Ok(())
    }

    fn delete_session(&self, session_id: SessionId) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM contractions WHERE session_id = ?1;",
            [session_id.to_string()],
        )?;
        self.bus.publish(Topic::Contractions);
        Ok(())
    }

    fn delete_all(&self) -> RepoResult<()> {
        self.conn.execute("DELETE FROM contractions;", [])?;
        self.bus.publish(Topic::Contractions);
        Ok(())
    }
}

fn parse_contraction_row(row: &Row<'_>) -> RepoResult<Contraction> {
    let session_text: String = row.get("session_id")?;
    let session_id = Uuid::parse_str(&session_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid session id `{session_text}` in contractions.session_id"
        ))
    })?;

    let intensity_text: String = row.get("intensity")?;
    let intensity = parse_intensity(&intensity_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid intensity `{intensity_text}` in contractions.intensity"
        ))
    })?;

    Ok(Contraction {
        id: row.get("id")?,
        session_id,
        started_at: row.get("started_at")?,
        duration_seconds: row.get("duration_seconds")?,
        intensity,
        created_at: row.get("created_at")?,
    })
}

fn intensity_to_db(intensity: Intensity) -> &'static str {
    match intensity {
        Intensity::Mild => "mild",
        Intensity::Moderate => "moderate",
        Intensity::Strong => "strong",
    }
}

fn parse_intensity(value: &str) -> Option<Intensity> {
    match value {
        "mild" => Some(Intensity::Mild),
        "moderate" => Some(Intensity::Moderate),
        "strong" => Some(Intensity::Strong),
        _ => None,
    }
}
