//! Reminder repository contract and SQLite implementation.
//!
//! # Invariants
//! - Listings are soonest-due first: `due_at ASC, id ASC`.
//! - `set_done` and `mark_notified` are narrow single-field updates.

use crate::live::{ChangeBus, Topic};
use crate::model::reminder::Reminder;
use crate::repo::{bool_to_int, ensure_schema_ready, int_to_bool, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const REMINDER_SELECT_SQL: &str = "SELECT
    id,
    title,
    note,
    due_at,
    is_done,
    notified,
    created_at
FROM reminders";

/// Repository interface for reminders.
pub trait ReminderRepository {
    fn insert(&self, reminder: &Reminder) -> RepoResult<i64>;
    /// Full-record overwrite keyed by id.
    fn update(&self, reminder: &Reminder) -> RepoResult<()>;
    fn set_done(&self, id: i64, done: bool) -> RepoResult<()>;
    /// Records that the platform notification fired.
    fn mark_notified(&self, id: i64) -> RepoResult<()>;
    fn get(&self, id: i64) -> RepoResult<Option<Reminder>>;
    fn list(&self) -> RepoResult<Vec<Reminder>>;
    /// Open reminders due strictly before `before_ms`.
    fn list_due(&self, before_ms: i64) -> RepoResult<Vec<Reminder>>;
    fn delete(&self, id: i64) -> RepoResult<()>;
    /// Clears completed reminders in one predicate delete.
    fn delete_done(&self) -> RepoResult<()>;
}

/// SQLite-backed reminder repository.
pub struct SqliteReminderRepository<'conn> {
    conn: &'conn Connection,
    bus: ChangeBus,
}

impl<'conn> SqliteReminderRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection, bus: ChangeBus) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["reminders"])?;
        Ok(Self { conn, bus })
    }

    fn collect(&self, sql: &str, binds: &[&dyn rusqlite::ToSql]) -> RepoResult<Vec<Reminder>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(binds)?;
        let mut reminders = Vec::new();
        while let Some(row) = rows.next()? {
            reminders.push(parse_reminder_row(row)?);
        }
        Ok(reminders)
    }
}

impl ReminderRepository for SqliteReminderRepository<'_> {
    fn insert(&self, reminder: &Reminder) -> RepoResult<i64> {
        self.conn.execute(
            "INSERT INTO reminders (title, note, due_at, is_done, notified)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                reminder.title.as_str(),
                reminder.note.as_deref(),
                reminder.due_at,
                bool_to_int(reminder.is_done),
                bool_to_int(reminder.notified),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.bus.publish(Topic::Reminders);
        Ok(id)
    }

    fn update(&self, reminder: &Reminder) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE reminders
             SET title = ?1, note = ?2, due_at = ?3, is_done = ?4, notified = ?5
             WHERE id = ?6;",
            params![
                reminder.title.as_str(),
                reminder.note.as_deref(),
                reminder.due_at,
                bool_to_int(reminder.is_done),
                bool_to_int(reminder.notified),
                reminder.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "reminder",
                id: reminder.id,
            });
        }
        self.bus.publish(Topic::Reminders);
        Ok(())
    }

    fn set_done(&self, id: i64, done: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE reminders SET is_done = ?1 WHERE id = ?2;",
            params![bool_to_int(done), id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "reminder",
                id,
            });
        }
        self.bus.publish(Topic::Reminders);
        Ok(())
    }

    fn mark_notified(&self, id: i64) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("UPDATE reminders SET notified = 1 WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "reminder",
                id,
            });
        }
        self.bus.publish(Topic::Reminders);
        Ok(())
    }

    fn get(&self, id: i64) -> RepoResult<Option<Reminder>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{REMINDER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_reminder_row(row)?));
        }
        Ok(None)
    }

    fn list(&self) -> RepoResult<Vec<Reminder>> {
        self.collect(
            &format!("{REMINDER_SELECT_SQL} ORDER BY due_at ASC, id ASC;"),
            &[],
        )
    }

    fn list_due(&self, before_ms: i64) -> RepoResult<Vec<Reminder>> {
        self.collect(
            &format!(
                "{REMINDER_SELECT_SQL}
                 WHERE is_done = 0 AND due_at < ?1
                 ORDER BY due_at ASC, id ASC;"
            ),
            &[&before_ms],
        )
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM reminders WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "reminder",
                id,
            });
        }
        self.bus.publish(Topic::Reminders);
        Ok(())
    }

    fn delete_done(&self) -> RepoResult<()> {
        self.conn.execute("DELETE FROM reminders WHERE is_done = 1;", [])?;
        self.bus.publish(Topic::Reminders);
        Ok(())
    }
}

fn parse_reminder_row(row: &Row<'_>) -> RepoResult<Reminder> {
    Ok(Reminder {
        id: row.get("id")?,
        title: row.get("title")?,
        note: row.get("note")?,
        due_at: row.get("due_at")?,
        is_done: int_to_bool("reminders.is_done", row.get("is_done")?)?,
        notified: int_to_bool("reminders.notified", row.get("notified")?)?,
        created_at: row.get("created_at")?,
    })
}
