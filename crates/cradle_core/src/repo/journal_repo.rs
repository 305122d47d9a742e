//! Journal and letter repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs for diary entries and keepsake letters.
//!
//! # Invariants
//! - Listings are newest-first: `created_at DESC, id DESC`.
//! - A stored entry without a reply reads back as `reply = None`.

use crate::live::{ChangeBus, Topic};
use crate::model::journal::{JournalEntry, Letter, Mood};
use crate::repo::{ensure_schema_ready, like_substring, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    title,
    body,
    mood,
    reply,
    created_at,
    updated_at
FROM journal_entries";

/// Repository interface for diary entries.
pub trait JournalRepository {
    fn insert(&self, entry: &JournalEntry) -> RepoResult<i64>;
    /// Full-record overwrite keyed by id.
    fn update(&self, entry: &JournalEntry) -> RepoResult<()>;
    /// Attaches a supportive reply without rewriting the entry.
    fn set_reply(&self, id: i64, reply: &str) -> RepoResult<()>;
    fn get(&self, id: i64) -> RepoResult<Option<JournalEntry>>;
    fn list(&self) -> RepoResult<Vec<JournalEntry>>;
    fn list_by_mood(&self, mood: Mood) -> RepoResult<Vec<JournalEntry>>;
    /// Case-insensitive substring search over title and body.
    ///
    /// A blank term matches everything.
    fn search(&self, term: &str) -> RepoResult<Vec<JournalEntry>>;
    fn delete(&self, id: i64) -> RepoResult<()>;
}

/// Repository interface for letters to the baby.
pub trait LetterRepository {
    fn insert(&self, letter: &Letter) -> RepoResult<i64>;
    fn get(&self, id: i64) -> RepoResult<Option<Letter>>;
    fn list(&self) -> RepoResult<Vec<Letter>>;
    fn delete(&self, id: i64) -> RepoResult<()>;
}

/// SQLite-backed journal/letter repository.
pub struct SqliteJournalRepository<'conn> {
    conn: &'conn Connection,
    bus: ChangeBus,
}

impl<'conn> SqliteJournalRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection, bus: ChangeBus) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["journal_entries", "letters"])?;
        Ok(Self { conn, bus })
    }

    fn collect_entries(&self, sql: &str, binds: &[&dyn rusqlite::ToSql]) -> RepoResult<Vec<JournalEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(binds)?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }
}

impl JournalRepository for SqliteJournalRepository<'_> {
    fn insert(&self, entry: &JournalEntry) -> RepoResult<i64> {
        self.conn.execute(
            "INSERT INTO journal_entries (title, body, mood, reply)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                entry.title.as_str(),
                entry.body.as_str(),
                mood_to_db(entry.mood),
                entry.reply.as_deref(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.bus.publish(Topic::Journal);
        Ok(id)
    }

    fn update(&self, entry: &JournalEntry) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE journal_entries
             SET
                title = ?1,
                body = ?2,
                mood = ?3,
                reply = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?5;",
            params![
                entry.title.as_str(),
                entry.body.as_str(),
                mood_to_db(entry.mood),
                entry.reply.as_deref(),
                entry.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "journal entry",
                id: entry.id,
            });
        }
        self.bus.publish(Topic::Journal);
        Ok(())
    }

    fn set_reply(&self, id: i64, reply: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE journal_entries
             SET reply = ?1, updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?2;",
            params![reply, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "journal entry",
                id,
            });
        }
        self.bus.publish(Topic::Journal);
        Ok(())
    }

    fn get(&self, id: i64) -> RepoResult<Option<JournalEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }
        Ok(None)
    }

    fn list(&self) -> RepoResult<Vec<JournalEntry>> {
        self.collect_entries(
            &format!("{ENTRY_SELECT_SQL} ORDER BY created_at DESC, id DESC;"),
            &[],
        )
    }

    fn list_by_mood(&self, mood: Mood) -> RepoResult<Vec<JournalEntry>> {
        self.collect_entries(
            &format!(
                "{ENTRY_SELECT_SQL}
                 WHERE mood = ?1
                 ORDER BY created_at DESC, id DESC;"
            ),
            &[&mood_to_db(mood)],
        )
    }

    fn search(&self, term: &str) -> RepoResult<Vec<JournalEntry>> {
        if term.trim().is_empty() {
            return JournalRepository::list(self);
        }

        let pattern = like_substring(term.trim());
        self.collect_entries(
            &format!(
                "{ENTRY_SELECT_SQL}
                 WHERE lower(title) LIKE ?1 ESCAPE '\\'
                    OR lower(body) LIKE ?1 ESCAPE '\\'
                 ORDER BY created_at DESC, id DESC;"
            ),
            &[&pattern],
        )
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM journal_entries WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "journal entry",
                id,
            });
        }
        self.bus.publish(Topic::Journal);
        Ok(())
    }
}

impl LetterRepository for SqliteJournalRepository<'_> {
    fn insert(&self, letter: &Letter) -> RepoResult<i64> {
        self.conn.execute(
            "INSERT INTO letters (title, body) VALUES (?1, ?2);",
            params![letter.title.as_str(), letter.body.as_str()],
        )?;
        let id = self.conn.last_insert_rowid();
        self.bus.publish(Topic::Letters);
        Ok(id)
    }

    fn get(&self, id: i64) -> RepoResult<Option<Letter>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, body, created_at FROM letters WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_letter_row(row)?));
        }
        Ok(None)
    }

    fn list(&self) -> RepoResult<Vec<Letter>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, body, created_at
             FROM letters
             ORDER BY created_at DESC, id DESC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut letters = Vec::new();
        while let Some(row) = rows.next()? {
            letters.push(parse_letter_row(row)?);
        }
        Ok(letters)
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM letters WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "letter",
                id,
            });
        }
        self.bus.publish(Topic::Letters);
        Ok(())
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<JournalEntry> {
    let mood_text: String = row.get("mood")?;
    let mood = parse_mood(&mood_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid mood `{mood_text}` in journal_entries.mood"))
    })?;

    Ok(JournalEntry {
        id: row.get("id")?,
        title: row.get("title")?,
        body: row.get("body")?,
        mood,
        reply: row.get("reply")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_letter_row(row: &Row<'_>) -> RepoResult<Letter> {
    Ok(Letter {
        id: row.get("id")?,
        title: row.get("title")?,
        body: row.get("body")?,
        created_at: row.get("created_at")?,
    })
}

fn mood_to_db(mood: Mood) -> &'static str {
    match mood {
        Mood::Radiant => "radiant",
        Mood::Good => "good",
        Mood::Tired => "tired",
        Mood::Anxious => "anxious",
        Mood::Low => "low",
    }
}

fn parse_mood(value: &str) -> Option<Mood> {
    match value {
        "radiant" => Some(Mood::Radiant),
        "good" => Some(Mood::Good),
        "tired" => Some(Mood::Tired),
        "anxious" => Some(Mood::Anxious),
        "low" => Some(Mood::Low),
        _ => None,
    }
}
