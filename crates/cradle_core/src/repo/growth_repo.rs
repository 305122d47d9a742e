//! Growth and health record repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist weighing/measuring sessions and dated health events.
//! - Compute measurement aggregates inside the storage engine.
//!
//! # Invariants
//! - Growth listings are chart-ordered: `recorded_at ASC, id ASC`.
//! - Averages ignore rows where the measurement is absent.

use crate::live::{ChangeBus, Topic};
use crate::model::growth::{GrowthRecord, HealthKind, HealthRecord};
use crate::repo::{ensure_schema_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const GROWTH_SELECT_SQL: &str = "SELECT
    id,
    recorded_at,
    age_weeks,
    weight_grams,
    height_cm,
    note
FROM growth_records";

/// Repository interface for growth measurements.
pub trait GrowthRepository {
    fn insert(&self, record: &GrowthRecord) -> RepoResult<i64>;
    /// Full-record overwrite keyed by id.
    fn update(&self, record: &GrowthRecord) -> RepoResult<()>;
    fn get(&self, id: i64) -> RepoResult<Option<GrowthRecord>>;
    fn list(&self) -> RepoResult<Vec<GrowthRecord>>;
    /// Most recent measurement by `recorded_at`, if any.
    fn latest(&self) -> RepoResult<Option<GrowthRecord>>;
    /// Engine-computed average over present weights; `None` when no row
    /// carries one.
    fn average_weight_grams(&self) -> RepoResult<Option<f64>>;
    fn delete(&self, id: i64) -> RepoResult<()>;
}

/// Repository interface for medical/development events.
pub trait HealthRepository {
    fn insert(&self, record: &HealthRecord) -> RepoResult<i64>;
    fn list(&self) -> RepoResult<Vec<HealthRecord>>;
    fn list_by_kind(&self, kind: HealthKind) -> RepoResult<Vec<HealthRecord>>;
    fn delete(&self, id: i64) -> RepoResult<()>;
}

/// SQLite-backed growth/health repository.
pub struct SqliteGrowthRepository<'conn> {
    conn: &'conn Connection,
    bus: ChangeBus,
}

impl<'conn> SqliteGrowthRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection, bus: ChangeBus) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["growth_records", "health_records"])?;
        Ok(Self { conn, bus })
    }
}

impl GrowthRepository for SqliteGrowthRepository<'_> {
    fn insert(&self, record: &GrowthRecord) -> RepoResult<i64> {
        self.conn.execute(
            "INSERT INTO growth_records (recorded_at, age_weeks, weight_grams, height_cm, note)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                record.recorded_at,
                record.age_weeks,
                record.weight_grams,
                record.height_cm,
                record.note.as_deref(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.bus.publish(Topic::Growth);
        Ok(id)
    }

    fn update(&self, record: &GrowthRecord) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE growth_records
             SET
                recorded_at = ?1,
                age_weeks = ?2,
                weight_grams = ?3,
                height_cm = ?4,
                note = ?5
             WHERE id = ?6;",
            params![
                record.recorded_at,
                record.age_weeks,
                record.weight_grams,
                record.height_cm,
                record.note.as_deref(),
                record.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "growth record",
                id: record.id,
            });
        }
        self.bus.publish(Topic::Growth);
        Ok(())
    }

    fn get(&self, id: i64) -> RepoResult<Option<GrowthRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GROWTH_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_growth_row(row)?));
        }
        Ok(None)
    }

    fn list(&self) -> RepoResult<Vec<GrowthRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GROWTH_SELECT_SQL} ORDER BY recorded_at ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_growth_row(row)?);
        }
        Ok(records)
    }

    fn latest(&self) -> RepoResult<Option<GrowthRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GROWTH_SELECT_SQL} ORDER BY recorded_at DESC, id DESC LIMIT 1;"
        ))?;
        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_growth_row(row)?));
        }
        Ok(None)
    }

    fn average_weight_grams(&self) -> RepoResult<Option<f64>> {
        let average = self.conn.query_row(
            "SELECT avg(weight_grams) FROM growth_records WHERE weight_grams IS NOT NULL;",
            [],
            |row| row.get::<_, Option<f64>>(0),
        )?;
        Ok(average)
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM growth_records WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "growth record",
                id,
            });
        }
        self.bus.publish(Topic::Growth);
        Ok(())
    }
}

impl HealthRepository for SqliteGrowthRepository<'_> {
    fn insert(&self, record: &HealthRecord) -> RepoResult<i64> {
        self.conn.execute(
            "INSERT INTO health_records (kind, title, note, occurred_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                kind_to_db(record.kind),
                record.title.as_str(),
                record.note.as_deref(),
                record.occurred_at,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.bus.publish(Topic::Health);
        Ok(id)
    }

    fn list(&self) -> RepoResult<Vec<HealthRecord>> {
        self.collect_health(
            "SELECT id, kind, title, note, occurred_at
             FROM health_records
             ORDER BY occurred_at DESC, id DESC;",
            &[],
        )
    }

    fn list_by_kind(&self, kind: HealthKind) -> RepoResult<Vec<HealthRecord>> {
        self.collect_health(
            "SELECT id, kind, title, note, occurred_at
             FROM health_records
             WHERE kind = ?1
             ORDER BY occurred_at DESC, id DESC;",
            &[&kind_to_db(kind)],
        )
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM health_records WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "health record",
                id,
            });
        }
        self.bus.publish(Topic::Health);
        Ok(())
    }
}

impl SqliteGrowthRepository<'_> {
    fn collect_health(
        &self,
        sql: &str,
        binds: &[&dyn rusqlite::ToSql],
    ) -> RepoResult<Vec<HealthRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(binds)?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_health_row(row)?);
        }
        Ok(records)
    }
}

fn parse_growth_row(row: &Row<'_>) -> RepoResult<GrowthRecord> {
    Ok(GrowthRecord {
        id: row.get("id")?,
        recorded_at: row.get("recorded_at")?,
        age_weeks: row.get("age_weeks")?,
        weight_grams: row.get("weight_grams")?,
        height_cm: row.get("height_cm")?,
        note: row.get("note")?,
    })
}

fn parse_health_row(row: &Row<'_>) -> RepoResult<HealthRecord> {
    let kind_text: String = row.get("kind")?;
    let kind = parse_kind(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid kind `{kind_text}` in health_records.kind"))
    })?;

    Ok(HealthRecord {
        id: row.get("id")?,
        kind,
        title: row.get("title")?,
        note: row.get("note")?,
        occurred_at: row.get("occurred_at")?,
    })
}

fn kind_to_db(kind: HealthKind) -> &'static str {
    match kind {
        HealthKind::Medical => "medical",
        HealthKind::Development => "development",
    }
}

fn parse_kind(value: &str) -> Option<HealthKind> {
    match value {
        "medical" => Some(HealthKind::Medical),
        "development" => Some(HealthKind::Development),
        _ => None,
    }
}
