//! Contraction timing use-case service and its state machine.
//!
//! # Responsibility
//! - Drive the start → stop → intensity flow for one timing screen.
//! - Persist confirmed events and expose session statistics.
//!
//! # Invariants
//! - The machine accepts exactly one in-flight contraction; starting while
//!   timing is rejected, never silently restarted.
//! - Skipping the intensity step still persists the event, with the
//!   default intensity.
//! - All timestamps enter as explicit `now_ms` inputs; the machine itself
//!   never reads a clock.

use crate::model::contraction::{Contraction, Intensity, SessionId};
use crate::repo::contraction_repo::ContractionRepository;
use crate::repo::RepoError;
use crate::stats::contraction::{session_stats, should_go_to_hospital, SessionStats};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Timer lifecycle for one timing screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Timing {
        started_at: i64,
    },
    SelectingIntensity {
        started_at: i64,
        duration_seconds: u32,
    },
}

/// Typed rejection for undefined timer inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// `start` while a contraction is already being timed.
    AlreadyTiming,
    /// `stop` without a running contraction.
    NotTiming,
    /// `start`/`stop` while an intensity choice is pending.
    IntensityPending,
    /// `confirm`/`skip` without a stopped contraction.
    NothingToConfirm,
}

impl Display for TimerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyTiming => write!(f, "a contraction is already being timed"),
            Self::NotTiming => write!(f, "no contraction is being timed"),
            Self::IntensityPending => write!(f, "an intensity choice is pending"),
            Self::NothingToConfirm => write!(f, "no stopped contraction to confirm"),
        }
    }
}

impl Error for TimerError {}

/// Pure contraction timer state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractionTimer {
    state: TimerState,
}

impl Default for ContractionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractionTimer {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Begins timing a contraction. Only valid from `Idle`.
    pub fn start(&mut self, now_ms: i64) -> Result<(), TimerError> {
        match self.state {
            TimerState::Idle => {
                self.state = TimerState::Timing { started_at: now_ms };
                Ok(())
            }
            TimerState::Timing { .. } => Err(TimerError::AlreadyTiming),
            TimerState::SelectingIntensity { .. } => Err(TimerError::IntensityPending),
        }
    }

    /// Stops timing and moves to the intensity choice.
    ///
    /// Returns the measured duration in whole seconds, clamped at zero for
    /// a clock that moved backwards.
    pub fn stop(&mut self, now_ms: i64) -> Result<u32, TimerError> {
        match self.state {
            TimerState::Timing { started_at } => {
                let elapsed_ms = now_ms.saturating_sub(started_at).max(0);
                let duration_seconds = (elapsed_ms / 1000) as u32;
                self.state = TimerState::SelectingIntensity {
                    started_at,
                    duration_seconds,
                };
                Ok(duration_seconds)
            }
            TimerState::Idle => Err(TimerError::NotTiming),
            TimerState::SelectingIntensity { .. } => Err(TimerError::IntensityPending),
        }
    }

    /// Finishes the flow, yielding the stopped contraction's measurements.
    pub fn take_pending(&mut self) -> Result<(i64, u32), TimerError> {
        match self.state {
            TimerState::SelectingIntensity {
                started_at,
                duration_seconds,
            } => {
                self.state = TimerState::Idle;
                Ok((started_at, duration_seconds))
            }
            _ => Err(TimerError::NothingToConfirm),
        }
    }
}

pub type ContractionServiceResult<T> = Result<T, ContractionServiceError>;

/// Service error for the timing flow.
#[derive(Debug)]
pub enum ContractionServiceError {
    Timer(TimerError),
    Repo(RepoError),
}

impl Display for ContractionServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timer(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContractionServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Timer(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<TimerError> for ContractionServiceError {
    fn from(value: TimerError) -> Self {
        Self::Timer(value)
    }
}

impl From<RepoError> for ContractionServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service for one timing screen instance.
///
/// Each instance owns a random session identifier; events it saves are
/// grouped under that session.
pub struct ContractionService<R: ContractionRepository> {
    repo: R,
    timer: ContractionTimer,
    session_id: SessionId,
}

impl<R: ContractionRepository> ContractionService<R> {
    /// Creates a service with a fresh session.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            timer: ContractionTimer::new(),
            session_id: Uuid::new_v4(),
        }
    }

    /// Creates a service resuming an existing session.
    pub fn with_session(repo: R, session_id: SessionId) -> Self {
        Self {
            repo,
            timer: ContractionTimer::new(),
            session_id,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    pub fn start(&mut self, now_ms: i64) -> ContractionServiceResult<()> {
        self.timer.start(now_ms)?;
        Ok(())
    }

    /// Stops the running contraction; returns the duration in seconds.
    pub fn stop(&mut self, now_ms: i64) -> ContractionServiceResult<u32> {
        Ok(self.timer.stop(now_ms)?)
    }

    /// Saves the stopped contraction with the chosen intensity.
    pub fn confirm(&mut self, intensity: Intensity) -> ContractionServiceResult<i64> {
        self.persist_pending(intensity)
    }

    /// Saves the stopped contraction with the default intensity.
    pub fn skip(&mut self) -> ContractionServiceResult<i64> {
        self.persist_pending(Intensity::default())
    }

    /// Statistics over the current session snapshot.
    pub fn stats(&self) -> ContractionServiceResult<SessionStats> {
        let events = self.repo.list_session(self.session_id)?;
        Ok(session_stats(&events))
    }

    /// Whether the current session pattern suggests leaving for the
    /// hospital.
    pub fn hospital_flag(&self) -> ContractionServiceResult<bool> {
        Ok(should_go_to_hospital(&self.stats()?))
    }

    /// Drops every event of this session.
    pub fn discard_session(&self) -> ContractionServiceResult<()> {
        self.repo.delete_session(self.session_id)?;
        Ok(())
    }

    fn persist_pending(&mut self, intensity: Intensity) -> ContractionServiceResult<i64> {
        let (started_at, duration_seconds) = self.timer.take_pending()?;
        let mut contraction = Contraction::new(self.session_id, started_at);
        contraction.duration_seconds = Some(duration_seconds);
        contraction.intensity = intensity;
        let id = self.repo.insert(&contraction)?;
        info!(
            "event=contraction_saved module=contraction status=ok session={} duration_s={duration_seconds}",
            self.session_id
        );
        Ok(id)
    }
}
