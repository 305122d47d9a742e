//! LIKE-based scan across every searchable table.

use crate::db::DbError;
use crate::repo::like_substring;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

const SNIPPET_MAX_CHARS: usize = 80;

/// Result type for search APIs.
pub type SearchResult<T> = Result<T, SearchError>;

/// Search-layer error for DB interaction and result decoding.
#[derive(Debug)]
pub enum SearchError {
    Db(DbError),
    InvalidData(String),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid search row: {message}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for SearchError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SearchError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Which entity family produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDomain {
    Checklist,
    Journal,
    Letter,
    Document,
    BabyName,
}

/// Search options for the cross-entity scan.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// User query text.
    pub text: String,
    /// Maximum number of hits across all families.
    pub limit: u32,
}

impl SearchQuery {
    /// Creates a query with the default limit.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limit: 20,
        }
    }
}

/// Single hit returned by [`search_everything`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub domain: SearchDomain,
    pub id: i64,
    pub title: String,
    /// Shortened matched text for result display.
    pub snippet: String,
}

/// One scanned table: family tag plus the SQL yielding (id, title, text).
const SCANS: &[(SearchDomain, &str)] = &[
    (
        SearchDomain::Checklist,
        "SELECT id, title, coalesce(note, title) AS body, created_at
         FROM checklist_items
         WHERE lower(title) LIKE ?1 ESCAPE '\\'
            OR lower(coalesce(note, '')) LIKE ?1 ESCAPE '\\'
         ORDER BY created_at DESC, id DESC",
    ),
    (
        SearchDomain::Journal,
        "SELECT id, title, body, created_at
         FROM journal_entries
         WHERE lower(title) LIKE ?1 ESCAPE '\\'
            OR lower(body) LIKE ?1 ESCAPE '\\'
         ORDER BY created_at DESC, id DESC",
    ),
    (
        SearchDomain::Letter,
        "SELECT id, title, body, created_at
         FROM letters
         WHERE lower(title) LIKE ?1 ESCAPE '\\'
            OR lower(body) LIKE ?1 ESCAPE '\\'
         ORDER BY created_at DESC, id DESC",
    ),
    (
        SearchDomain::Document,
        "SELECT id, title, title AS body, created_at
         FROM documents
         WHERE lower(title) LIKE ?1 ESCAPE '\\'
         ORDER BY created_at DESC, id DESC",
    ),
    (
        SearchDomain::BabyName,
        "SELECT id, name AS title, name AS body, created_at
         FROM baby_names
         WHERE lower(name) LIKE ?1 ESCAPE '\\'
         ORDER BY created_at DESC, id DESC",
    ),
];

/// Scans every searchable family for a case-insensitive substring match.
///
/// Returns an empty list for blank queries.
pub fn search_everything(conn: &Connection, query: &SearchQuery) -> SearchResult<Vec<SearchHit>> {
    let term = query.text.trim();
    if term.is_empty() || query.limit == 0 {
        return Ok(Vec::new());
    }

    let pattern = like_substring(term);
    let mut hits = Vec::new();

    for &(domain, sql) in SCANS {
        if hits.len() >= query.limit as usize {
            break;
        }

        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([pattern.as_str()])?;
        while let Some(row) = rows.next()? {
            if hits.len() >= query.limit as usize {
                break;
            }
            let body: String = row.get("body")?;
            hits.push(SearchHit {
                domain,
                id: row.get("id")?,
                title: row.get("title")?,
                snippet: snippet_of(&body),
            });
        }
    }

    Ok(hits)
}

fn snippet_of(text: &str) -> String {
    let mut snippet: String = text.chars().take(SNIPPET_MAX_CHARS).collect();
    if text.chars().count() > SNIPPET_MAX_CHARS {
        snippet.push_str("...");
    }
    snippet
}

#[cfg(test)]
mod tests {
    use super::snippet_of;

    #[test]
    fn snippet_truncates_long_text_with_ellipsis() {
        let long = "x".repeat(100);
        let snippet = snippet_of(&long);
        assert_eq!(snippet.chars().count(), 83);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn snippet_keeps_short_text_untouched() {
        assert_eq!(snippet_of("short"), "short");
    }
}
