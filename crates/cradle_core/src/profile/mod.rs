//! Key-value preference store and user/baby profile access.
//!
//! # Responsibility
//! - Provide an explicit, injectable configuration service over `prefs`.
//! - Serialize the structured baby profile as a JSON payload.
//!
//! # Invariants
//! - Keys follow replace-on-conflict semantics: one row per key.
//! - Writes publish `Topic::Prefs` so screens can observe flag changes.

use crate::live::{ChangeBus, Topic};
use crate::model::name::Gender;
use crate::repo::{ensure_schema_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const KEY_ONBOARDING_DONE: &str = "onboarding_done";
const KEY_BABY_PROFILE: &str = "baby_profile";
const KEY_DAILY_REMINDER_MINUTES: &str = "daily_reminder_minutes";
const KEY_PREMIUM: &str = "premium";

pub type ProfileResult<T> = Result<T, ProfileError>;

/// Error for preference access and profile decoding.
#[derive(Debug)]
pub enum ProfileError {
    Repo(RepoError),
    /// Stored payload for a structured key cannot be decoded.
    Decode {
        key: &'static str,
        source: serde_json::Error,
    },
}

impl Display for ProfileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Decode { key, source } => {
                write!(f, "invalid stored payload for `{key}`: {source}")
            }
        }
    }
}

impl Error for ProfileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Decode { source, .. } => Some(source),
        }
    }
}

impl From<RepoError> for ProfileError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for ProfileError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

/// Structured user/baby profile captured during onboarding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BabyProfile {
    pub name: Option<String>,
    /// Expected delivery date in epoch milliseconds.
    pub due_date_ms: Option<i64>,
    pub gender: Option<Gender>,
}

/// Injected configuration service over the `prefs` table.
pub struct ProfileStore<'conn> {
    conn: &'conn Connection,
    bus: ChangeBus,
}

impl<'conn> ProfileStore<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection, bus: ChangeBus) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["prefs"])?;
        Ok(Self { conn, bus })
    }

    pub fn onboarding_done(&self) -> ProfileResult<bool> {
        Ok(self.read(KEY_ONBOARDING_DONE)?.as_deref() == Some("1"))
    }

    pub fn set_onboarding_done(&self, done: bool) -> ProfileResult<()> {
        self.write(KEY_ONBOARDING_DONE, if done { "1" } else { "0" })
    }

    /// Stored profile, or the empty default when onboarding has not
    /// captured one yet.
    pub fn baby_profile(&self) -> ProfileResult<BabyProfile> {
        match self.read(KEY_BABY_PROFILE)? {
            Some(payload) => {
                serde_json::from_str(&payload).map_err(|source| ProfileError::Decode {
                    key: KEY_BABY_PROFILE,
                    source,
                })
            }
            None => Ok(BabyProfile::default()),
        }
    }

    pub fn set_baby_profile(&self, profile: &BabyProfile) -> ProfileResult<()> {
        let payload = serde_json::to_string(profile).map_err(|source| ProfileError::Decode {
            key: KEY_BABY_PROFILE,
            source,
        })?;
        self.write(KEY_BABY_PROFILE, &payload)
    }

    /// Minutes past midnight for the daily reminder, when configured.
    pub fn daily_reminder_minutes(&self) -> ProfileResult<Option<u32>> {
        let raw = self.read(KEY_DAILY_REMINDER_MINUTES)?;
        Ok(raw.and_then(|value| value.parse().ok()))
    }

    pub fn set_daily_reminder_minutes(&self, minutes: u32) -> ProfileResult<()> {
        self.write(KEY_DAILY_REMINDER_MINUTES, &minutes.to_string())
    }

    /// Subscription state observed by gated screens.
    pub fn is_premium(&self) -> ProfileResult<bool> {
        Ok(self.read(KEY_PREMIUM)?.as_deref() == Some("1"))
    }

    pub fn set_premium(&self, premium: bool) -> ProfileResult<()> {
        self.write(KEY_PREMIUM, if premium { "1" } else { "0" })
    }

    fn read(&self, key: &str) -> ProfileResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM prefs WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> ProfileResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO prefs (key, value) VALUES (?1, ?2);",
            params![key, value],
        )?;
        self.bus.publish(Topic::Prefs);
        Ok(())
    }
}
