//! Cross-entity substring search.
//!
//! # Responsibility
//! - Provide one keyword search spanning every text-bearing family.
//! - Return typed hits tagged with their originating family.
//!
//! # Invariants
//! - Matching is case-insensitive substring, the same policy as the
//!   per-repository search operations.
//! - Result ordering is deterministic: family order, then recency.

mod scan;

pub use scan::{search_everything, SearchDomain, SearchError, SearchHit, SearchQuery, SearchResult};
