//! Checklist repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs for the three checklists over `checklist_items`.
//! - Provide replace-on-conflict persistence for per-week checks.
//!
//! # Invariants
//! - Item listings are ordered by category, then priority descending, then
//!   title.
//! - `upsert_weekly` keeps at most one row per (week, title).
//! - Every successful write publishes its change topic.

use crate::live::{ChangeBus, Topic};
use crate::model::checklist::{Category, ChecklistItem, ChecklistKind, WeeklyCheck};
use crate::repo::{
    bool_to_int, ensure_schema_ready, int_to_bool, like_substring, RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    list,
    category,
    title,
    note,
    priority,
    is_done,
    created_at,
    updated_at
FROM checklist_items";

/// Repository interface for checklist items and weekly checks.
pub trait ChecklistRepository {
    /// Persists a new item and returns its assigned id.
    fn insert(&self, item: &ChecklistItem) -> RepoResult<i64>;
    /// Full-record overwrite keyed by id.
    fn update(&self, item: &ChecklistItem) -> RepoResult<()>;
    /// Narrow completion toggle that skips the full-record read-back.
    fn set_done(&self, id: i64, done: bool) -> RepoResult<()>;
    fn get(&self, id: i64) -> RepoResult<Option<ChecklistItem>>;
    /// Lists one checklist, ordered category > priority desc > title.
    fn list(&self, list: ChecklistKind) -> RepoResult<Vec<ChecklistItem>>;
    /// Case-insensitive substring search over title and note.
    ///
    /// A blank term matches everything.
    fn search(&self, list: ChecklistKind, term: &str) -> RepoResult<Vec<ChecklistItem>>;
    fn delete(&self, id: i64) -> RepoResult<()>;
    /// Removes every item of one checklist.
    fn delete_all(&self, list: ChecklistKind) -> RepoResult<()>;
    /// (done, total) counts computed by the storage engine.
    fn progress(&self, list: ChecklistKind) -> RepoResult<(u32, u32)>;

    /// Replaces the stored state for (week, title) wholesale.
    fn upsert_weekly(&self, check: &WeeklyCheck) -> RepoResult<()>;
    fn list_weekly(&self, week: u32) -> RepoResult<Vec<WeeklyCheck>>;
    fn delete_weekly(&self, week: u32) -> RepoResult<()>;
}

/// SQLite-backed checklist repository.
pub struct SqliteChecklistRepository<'conn> {
    conn: &'conn Connection,
    bus: ChangeBus,
}

impl<'conn> SqliteChecklistRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection, bus: ChangeBus) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["checklist_items", "weekly_checks"])?;
        Ok(Self { conn, bus })
    }
}

impl ChecklistRepository for SqliteChecklistRepository<'_> {
    fn insert(&self, item: &ChecklistItem) -> RepoResult<i64> {
        self.conn.execute(
            "INSERT INTO checklist_items (list, category, title, note, priority, is_done)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                list_to_db(item.list),
                category_to_db(item.category),
                item.title.as_str(),
                item.note.as_deref(),
                item.priority,
                bool_to_int(item.is_done),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.bus.publish(Topic::Checklist);
        Ok(id)
    }

    fn update(&self, item: &ChecklistItem) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE checklist_items
             SET
                list = ?1,
                category = ?2,
                title = ?3,
                note = ?4,
                priority = ?5,
                is_done = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?7;",
            params![
                list_to_db(item.list),
                category_to_db(item.category),
                item.title.as_str(),
                item.note.as_deref(),
                item.priority,
                bool_to_int(item.is_done),
                item.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "checklist item",
                id: item.id,
            });
        }
        self.bus.publish(Topic::Checklist);
        Ok(())
    }

    fn set_done(&self, id: i64, done: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE checklist_items
             SET is_done = ?1, updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?2;",
            params![bool_to_int(done), id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "checklist item",
                id,
            });
        }
        self.bus.publish(Topic::Checklist);
        Ok(())
    }

    fn get(&self, id: i64) -> RepoResult<Option<ChecklistItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }
        Ok(None)
    }

    fn list(&self, list: ChecklistKind) -> RepoResult<Vec<ChecklistItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL}
             WHERE list = ?1
             ORDER BY category ASC, priority DESC, title ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([list_to_db(list)])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }

    fn search(&self, list: ChecklistKind, term: &str) -> RepoResult<Vec<ChecklistItem>> {
        if term.trim().is_empty() {
            return self.list(list);
        }

        let pattern = like_substring(term.trim());
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL}
             WHERE list = ?1
               AND (lower(title) LIKE ?2 ESCAPE '\\'
                    OR lower(coalesce(note, '')) LIKE ?2 ESCAPE '\\')
             ORDER BY category ASC, priority DESC, title ASC, id ASC;"
        ))?;
        let mut rows = stmt.query(params![list_to_db(list), pattern])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM checklist_items WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "checklist item",
                id,
            });
        }
        self.bus.publish(Topic::Checklist);
        Ok(())
    }

    fn delete_all(&self, list: ChecklistKind) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM checklist_items WHERE list = ?1;",
            [list_to_db(list)],
        )?;
        self.bus.publish(Topic::Checklist);
        Ok(())
    }

    fn progress(&self, list: ChecklistKind) -> RepoResult<(u32, u32)> {
        let (done, total) = self.conn.query_row(
            "SELECT
                count(CASE WHEN is_done = 1 THEN 1 END),
                count(*)
             FROM checklist_items
             WHERE list = ?1;",
            [list_to_db(list)],
            |row| Ok((row.get::<_, u32>(0)?, row.get::<_, u32>(1)?)),
        )?;
        Ok((done, total))
    }

    fn upsert_weekly(&self, check: &WeeklyCheck) -> RepoResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO weekly_checks (week, title, is_done, updated_at)
             VALUES (?1, ?2, ?3, (strftime('%s', 'now') * 1000));",
            params![check.week, check.title.as_str(), bool_to_int(check.is_done)],
        )?;
        self.bus.publish(Topic::WeeklyChecks);
        Ok(())
    }

    fn list_weekly(&self, week: u32) -> RepoResult<Vec<WeeklyCheck>> {
        let mut stmt = self.conn.prepare(
            "SELECT week, title, is_done, updated_at
             FROM weekly_checks
             WHERE week = ?1
             ORDER BY title ASC;",
        )?;
        let mut rows = stmt.query([week])?;
        let mut checks = Vec::new();
        while let Some(row) = rows.next()? {
            checks.push(WeeklyCheck {
                week: row.get("week")?,
                title: row.get("title")?,
                is_done: int_to_bool("weekly_checks.is_done", row.get("is_done")?)?,
                updated_at: row.get("updated_at")?,
            });
        }
        Ok(checks)
    }

    fn delete_weekly(&self, week: u32) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM weekly_checks WHERE week = ?1;", [week])?;
        self.bus.publish(Topic::WeeklyChecks);
        Ok(())
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<ChecklistItem> {
    let list_text: String = row.get("list")?;
    let list = parse_list(&list_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid list `{list_text}` in checklist_items.list"))
    })?;

    let category_text: String = row.get("category")?;
    let category = parse_category(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in checklist_items.category"
        ))
    })?;

    Ok(ChecklistItem {
        id: row.get("id")?,
        list,
        category,
        title: row.get("title")?,
        note: row.get("note")?,
        priority: row.get("priority")?,
        is_done: int_to_bool("checklist_items.is_done", row.get("is_done")?)?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn list_to_db(list: ChecklistKind) -> &'static str {
    match list {
        ChecklistKind::HospitalBag => "hospital_bag",
        ChecklistKind::BabyShower => "baby_shower",
        ChecklistKind::BirthPlan => "birth_plan",
    }
}

fn parse_list(value: &str) -> Option<ChecklistKind> {
    match value {
        "hospital_bag" => Some(ChecklistKind::HospitalBag),
        "baby_shower" => Some(ChecklistKind::BabyShower),
        "birth_plan" => Some(ChecklistKind::BirthPlan),
        _ => None,
    }
}

fn category_to_db(category: Category) -> &'static str {
    match category {
        Category::Mom => "mom",
        Category::Baby => "baby",
        Category::Partner => "partner",
        Category::Paperwork => "paperwork",
        Category::Other => "other",
    }
}

fn parse_category(value: &str) -> Option<Category> {
    match value {
        "mom" => Some(Category::Mom),
        "baby" => Some(Category::Baby),
        "partner" => Some(Category::Partner),
        "paperwork" => Some(Category::Paperwork),
        "other" => Some(Category::Other),
        _ => None,
    }
}
