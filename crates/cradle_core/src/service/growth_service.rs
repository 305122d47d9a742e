//! Growth entry use-case service.
//!
//! # Responsibility
//! - Turn free-text form fields into typed growth records.
//! - Surface malformed numerics as typed validation errors instead of
//!   silently dropping the field.
//!
//! # Invariants
//! - A blank measurement field means "not provided" and is accepted.
//! - A non-blank field that fails to parse rejects the whole submission.

use crate::model::growth::GrowthRecord;
use crate::repo::growth_repo::GrowthRepository;
use crate::repo::RepoError;
use crate::stats::growth::{classify_height, classify_weight, GrowthBand};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:[.,]\d+)?").expect("valid number regex"));

pub type GrowthServiceResult<T> = Result<T, GrowthServiceError>;

/// Service error for growth form submissions.
#[derive(Debug)]
pub enum GrowthServiceError {
    /// A non-blank measurement field carries no parseable number.
    InvalidNumber { field: &'static str, raw: String },
    Repo(RepoError),
}

impl Display for GrowthServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { field, raw } => {
                write!(f, "field `{field}` has no parseable number: `{raw}`")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GrowthServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidNumber { .. } => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for GrowthServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Free-text form fields for one measurement session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrowthForm {
    /// e.g. `"4350 g"` or `"4,35 kg"`; blank means not measured.
    pub weight_text: String,
    /// e.g. `"54.5"` or `"54,5 cm"`; blank means not measured.
    pub height_text: String,
    pub note: String,
}

/// Band summary for one stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthAssessment {
    pub weight: Option<GrowthBand>,
    pub height: Option<GrowthBand>,
}

/// Growth entry service over a repository implementation.
pub struct GrowthService<R: GrowthRepository> {
    repo: R,
}

impl<R: GrowthRepository> GrowthService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists one measurement session from form input.
    ///
    /// Weight is read in grams unless the field mentions `kg`, in which
    /// case the value is converted.
    pub fn record_entry(
        &self,
        recorded_at: i64,
        age_weeks: u32,
        form: &GrowthForm,
    ) -> GrowthServiceResult<i64> {
        let mut record = GrowthRecord::new(recorded_at, age_weeks);
        record.weight_grams = parse_weight_grams(&form.weight_text)?;
        record.height_cm = parse_measurement("height", &form.height_text)?;
        let note = form.note.trim();
        record.note = (!note.is_empty()).then(|| note.to_string());

        Ok(self.repo.insert(&record)?)
    }

    /// Classifies one stored record against the reference table.
    pub fn assess(&self, record: &GrowthRecord) -> GrowthAssessment {
        GrowthAssessment {
            weight: record
                .weight_grams
                .map(|grams| classify_weight(record.age_weeks, grams)),
            height: record
                .height_cm
                .map(|cm| classify_height(record.age_weeks, cm)),
        }
    }
}

/// Extracts a weight in grams from free text.
///
/// Blank input is `Ok(None)`; non-blank input without a number is a typed
/// error.
pub fn parse_weight_grams(raw: &str) -> GrowthServiceResult<Option<u32>> {
    let Some(value) = parse_measurement("weight", raw)? else {
        return Ok(None);
    };
    let grams = if raw.to_lowercase().contains("kg") {
        value * 1000.0
    } else {
        value
    };
    Ok(Some(grams.round() as u32))
}

/// Extracts the first decimal number from free text.
///
/// Accepts both `.` and `,` as the decimal separator.
pub fn parse_measurement(field: &'static str, raw: &str) -> GrowthServiceResult<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let matched = NUMBER_RE
        .find(trimmed)
        .ok_or_else(|| GrowthServiceError::InvalidNumber {
            field,
            raw: trimmed.to_string(),
        })?;
    let normalized = matched.as_str().replace(',', ".");
    let value = normalized
        .parse::<f64>()
        .map_err(|_| GrowthServiceError::InvalidNumber {
            field,
            raw: trimmed.to_string(),
        })?;
    Ok(Some(value))
}
