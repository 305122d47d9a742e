//! Belly photo repository contract and SQLite implementation.
//!
//! # Invariants
//! - The gestation week is the primary key; `upsert` replaces wholesale.
//! - Listings are chronological by week.

use crate::live::{ChangeBus, Topic};
use crate::model::photo::BellyPhoto;
use crate::repo::{ensure_schema_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Repository interface for weekly belly photos.
pub trait PhotoRepository {
    /// Stores the photo for its week, replacing any previous one.
    fn upsert(&self, photo: &BellyPhoto) -> RepoResult<()>;
    fn get_week(&self, week: u32) -> RepoResult<Option<BellyPhoto>>;
    fn list(&self) -> RepoResult<Vec<BellyPhoto>>;
    fn delete_week(&self, week: u32) -> RepoResult<()>;
}

/// SQLite-backed photo repository.
pub struct SqlitePhotoRepository<'conn> {
    conn: &'conn Connection,
    bus: ChangeBus,
}

impl<'conn> SqlitePhotoRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection, bus: ChangeBus) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["belly_photos"])?;
        Ok(Self { conn, bus })
    }
}

impl PhotoRepository for SqlitePhotoRepository<'_> {
    fn upsert(&self, photo: &BellyPhoto) -> RepoResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO belly_photos (week, file_path, note)
             VALUES (?1, ?2, ?3);",
            params![photo.week, photo.file_path.as_str(), photo.note.as_deref()],
        )?;
        self.bus.publish(Topic::BellyPhotos);
        Ok(())
    }

    fn get_week(&self, week: u32) -> RepoResult<Option<BellyPhoto>> {
        let mut stmt = self.conn.prepare(
            "SELECT week, file_path, note, created_at
             FROM belly_photos
             WHERE week = ?1;",
        )?;
        let mut rows = stmt.query([week])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_photo_row(row)?));
        }
        Ok(None)
    }

    fn list(&self) -> RepoResult<Vec<BellyPhoto>> {
        let mut stmt = self.conn.prepare(
            "SELECT week, file_path, note, created_at
             FROM belly_photos
             ORDER BY week ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut photos = Vec::new();
        while let Some(row) = rows.next()? {
            photos.push(parse_photo_row(row)?);
        }
        Ok(photos)
    }

    fn delete_week(&self, week: u32) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM belly_photos WHERE week = ?1;", [week])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "belly photo",
                id: i64::from(week),
            });
        }
        self.bus.publish(Topic::BellyPhotos);
        Ok(())
    }
}

fn parse_photo_row(row: &Row<'_>) -> RepoResult<BellyPhoto> {
    Ok(BellyPhoto {
        week: row.get("week")?,
        file_path: row.get("file_path")?,
        note: row.get("note")?,
        created_at: row.get("created_at")?,
    })
}
