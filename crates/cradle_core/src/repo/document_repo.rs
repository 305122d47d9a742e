//! Document repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist metadata rows for copied document files.
//!
//! # Invariants
//! - Rows store absolute file paths; file bytes never enter the database.
//! - Listings are newest-first: `created_at DESC, id DESC`.

use crate::live::{ChangeBus, Topic};
use crate::model::document::{Document, DocumentCategory};
use crate::repo::{ensure_schema_ready, like_substring, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const DOCUMENT_SELECT_SQL: &str = "SELECT
    id,
    title,
    category,
    file_path,
    created_at
FROM documents";

/// Repository interface for stored documents.
pub trait DocumentRepository {
    fn insert(&self, document: &Document) -> RepoResult<i64>;
    fn get(&self, id: i64) -> RepoResult<Option<Document>>;
    fn list(&self) -> RepoResult<Vec<Document>>;
    fn list_by_category(&self, category: DocumentCategory) -> RepoResult<Vec<Document>>;
    /// Case-insensitive substring search over titles.
    ///
    /// A blank term matches everything.
    fn search(&self, term: &str) -> RepoResult<Vec<Document>>;
    fn delete(&self, id: i64) -> RepoResult<()>;
    /// Removes every document row of one category.
    fn delete_by_category(&self, category: DocumentCategory) -> RepoResult<()>;
}

/// SQLite-backed document repository.
pub struct SqliteDocumentRepository<'conn> {
    conn: &'conn Connection,
    bus: ChangeBus,
}

impl<'conn> SqliteDocumentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection, bus: ChangeBus) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["documents"])?;
        Ok(Self { conn, bus })
    }

    fn collect(&self, sql: &str, binds: &[&dyn rusqlite::ToSql]) -> RepoResult<Vec<Document>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(binds)?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            documents.push(parse_document_row(row)?);
        }
        Ok(documents)
    }
}

impl DocumentRepository for SqliteDocumentRepository<'_> {
    fn insert(&self, document: &Document) -> RepoResult<i64> {
        self.conn.execute(
            "INSERT INTO documents (title, category, file_path)
             VALUES (?1, ?2, ?3);",
            params![
                document.title.as_str(),
                category_to_db(document.category),
                document.file_path.as_str(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.bus.publish(Topic::Documents);
        Ok(id)
    }

    fn get(&self, id: i64) -> RepoResult<Option<Document>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DOCUMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_document_row(row)?));
        }
        Ok(None)
    }

    fn list(&self) -> RepoResult<Vec<Document>> {
        self.collect(
            &format!("{DOCUMENT_SELECT_SQL} ORDER BY created_at DESC, id DESC;"),
            &[],
        )
    }

    fn list_by_category(&self, category: DocumentCategory) -> RepoResult<Vec<Document>> {
        self.collect(
            &format!(
                "{DOCUMENT_SELECT_SQL}
                 WHERE category = ?1
                 ORDER BY created_at DESC, id DESC;"
            ),
            &[&category_to_db(category)],
        )
    }

    fn search(&self, term: &str) -> RepoResult<Vec<Document>> {
        if term.trim().is_empty() {
            return self.list();
        }

        let pattern = like_substring(term.trim());
        self.collect(
            &format!(
                "{DOCUMENT_SELECT_SQL}
                 WHERE lower(title) LIKE ?1 ESCAPE '\\'
                 ORDER BY created_at DESC, id DESC;"
            ),
            &[&pattern],
        )
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM documents WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "document",
                id,
            });
        }
        self.bus.publish(Topic::Documents);
        Ok(())
    }

    fn delete_by_category(&self, category: DocumentCategory) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM documents WHERE category = ?1;",
            [category_to_db(category)],
        )?;
        self.bus.publish(Topic::Documents);
        Ok(())
    }
}

fn parse_document_row(row: &Row<'_>) -> RepoResult<Document> {
    let category_text: String = row.get("category")?;
    let category = parse_category(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in documents.category"
        ))
    })?;

    Ok(Document {
        id: row.get("id")?,
        title: row.get("title")?,
        category,
        file_path: row.get("file_path")?,
        created_at: row.get("created_at")?,
    })
}

fn category_to_db(category: DocumentCategory) -> &'static str {
    match category {
        DocumentCategory::Ultrasound => "ultrasound",
        DocumentCategory::LabResult => "lab_result",
        DocumentCategory::Prescription => "prescription",
        DocumentCategory::Insurance => "insurance",
        DocumentCategory::Other => "other",
    }
}

fn parse_category(value: &str) -> Option<DocumentCategory> {
    match value {
        "ultrasound" => Some(DocumentCategory::Ultrasound),
        "lab_result" => Some(DocumentCategory::LabResult),
        "prescription" => Some(DocumentCategory::Prescription),
        "insurance" => Some(DocumentCategory::Insurance),
        "other" => Some(DocumentCategory::Other),
        _ => None,
    }
}
