//! Baby name repository contract and SQLite implementation.
//!
//! # Invariants
//! - Listings are alphabetical: `name ASC, id ASC`.
//! - `toggle_favorite` flips the stored flag without a read-back.

use crate::live::{ChangeBus, Topic};
use crate::model::name::{BabyName, Gender};
use crate::repo::{ensure_schema_ready, int_to_bool, like_substring, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const NAME_SELECT_SQL: &str = "SELECT
    id,
    name,
    gender,
    is_favorite,
    created_at
FROM baby_names";

/// Repository interface for baby name ideas.
pub trait NameRepository {
    fn insert(&self, name: &BabyName) -> RepoResult<i64>;
    fn get(&self, id: i64) -> RepoResult<Option<BabyName>>;
    fn list(&self) -> RepoResult<Vec<BabyName>>;
    fn list_by_gender(&self, gender: Gender) -> RepoResult<Vec<BabyName>>;
    fn favorites(&self) -> RepoResult<Vec<BabyName>>;
    /// Case-insensitive substring search over the name column.
    ///
    /// A blank term matches everything.
    fn search(&self, term: &str) -> RepoResult<Vec<BabyName>>;
    fn toggle_favorite(&self, id: i64) -> RepoResult<()>;
    fn delete(&self, id: i64) -> RepoResult<()>;
}

/// SQLite-backed baby name repository.
pub struct SqliteNameRepository<'conn> {
    conn: &'conn Connection,
    bus: ChangeBus,
}

impl<'conn> SqliteNameRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection, bus: ChangeBus) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["baby_names"])?;
        Ok(Self { conn, bus })
    }

    fn collect(&self, sql: &str, binds: &[&dyn rusqlite::ToSql]) -> RepoResult<Vec<BabyName>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(binds)?;
        let mut names = Vec::new();
        while let Some(row) = rows.next()? {
            names.push(parse_name_row(row)?);
        }
        Ok(names)
    }
}

impl NameRepository for SqliteNameRepository<'_> {
    fn insert(&self, name: &BabyName) -> RepoResult<i64> {
        self.conn.execute(
            "INSERT INTO baby_names (name, gender, is_favorite)
             VALUES (?1, ?2, ?3);",
            params![
                name.name.as_str(),
                gender_to_db(name.gender),
                i64::from(name.is_favorite),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.bus.publish(Topic::BabyNames);
        Ok(id)
    }

    fn get(&self, id: i64) -> RepoResult<Option<BabyName>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NAME_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_name_row(row)?));
        }
        Ok(None)
    }

    fn list(&self) -> RepoResult<Vec<BabyName>> {
        self.collect(
            &format!("{NAME_SELECT_SQL} ORDER BY name COLLATE NOCASE ASC, id ASC;"),
            &[],
        )
    }

    fn list_by_gender(&self, gender: Gender) -> RepoResult<Vec<BabyName>> {
        self.collect(
            &format!(
                "{NAME_SELECT_SQL}
                 WHERE gender = ?1
                 ORDER BY name COLLATE NOCASE ASC, id ASC;"
            ),
            &[&gender_to_db(gender)],
        )
    }

    fn favorites(&self) -> RepoResult<Vec<BabyName>> {
        self.collect(
            &format!(
                "{NAME_SELECT_SQL}
                 WHERE is_favorite = 1
                 ORDER BY name COLLATE NOCASE ASC, id ASC;"
            ),
            &[],
        )
    }

    fn search(&self, term: &str) -> RepoResult<Vec<BabyName>> {
        if term.trim().is_empty() {
            return self.list();
        }

        let pattern = like_substring(term.trim());
        self.collect(
            &format!(
                "{NAME_SELECT_SQL}
                 WHERE lower(name) LIKE ?1 ESCAPE '\\'
                 ORDER BY name COLLATE NOCASE ASC, id ASC;"
            ),
            &[&pattern],
        )
    }

    fn toggle_favorite(&self, id: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE baby_names SET is_favorite = 1 - is_favorite WHERE id = ?1;",
            [id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "baby name",
                id,
            });
        }
        self.bus.publish(Topic::BabyNames);
        Ok(())
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM baby_names WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "baby name",
                id,
            });
        }
        self.bus.publish(Topic::BabyNames);
        Ok(())
    }
}

fn parse_name_row(row: &Row<'_>) -> RepoResult<BabyName> {
    let gender_text: String = row.get("gender")?;
    let gender = parse_gender(&gender_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid gender `{gender_text}` in baby_names.gender"))
    })?;

    Ok(BabyName {
        id: row.get("id")?,
        name: row.get("name")?,
        gender,
        is_favorite: int_to_bool("baby_names.is_favorite", row.get("is_favorite")?)?,
        created_at: row.get("created_at")?,
    })
}

fn gender_to_db(gender: Gender) -> &'static str {
    match gender {
        Gender::Girl => "girl",
        Gender::Boy => "boy",
        Gender::Neutral => "neutral",
    }
}

fn parse_gender(value: &str) -> Option<Gender> {
    match value {
        "girl" => Some(Gender::Girl),
        "boy" => Some(Gender::Boy),
        "neutral" => Some(Gender::Neutral),
        _ => None,
    }
}
