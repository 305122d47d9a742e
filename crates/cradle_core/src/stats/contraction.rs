//! Contraction session statistics and the hospital heuristic.
//!
//! # Invariants
//! - Average duration covers only events that carry a duration.
//! - With fewer than two events the interval statistic is 0, not NaN.
//! - The hospital flag requires all three sub-conditions at once.

use crate::model::contraction::Contraction;

/// Minimum event count before the hospital flag can trip.
pub const HOSPITAL_MIN_EVENTS: usize = 6;
/// Minimum average contraction duration in seconds.
pub const HOSPITAL_MIN_AVG_DURATION_SECS: f64 = 30.0;
/// Average start-to-start interval window in seconds.
pub const HOSPITAL_INTERVAL_RANGE_SECS: (f64, f64) = (60.0, 300.0);

/// Summary numbers for one timing session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionStats {
    /// Total events in the session.
    pub count: usize,
    /// Mean duration in seconds over events with a recorded duration;
    /// 0 when none carry one.
    pub avg_duration_seconds: f64,
    /// Mean gap in seconds between consecutive start times; 0 with fewer
    /// than two events.
    pub avg_interval_seconds: f64,
}

/// Computes session statistics from an event snapshot.
///
/// Events may arrive in any order; intervals are taken over start times
/// sorted ascending.
pub fn session_stats(events: &[Contraction]) -> SessionStats {
    let durations: Vec<f64> = events
        .iter()
        .filter_map(|event| event.duration_seconds)
        .map(f64::from)
        .collect();
    let avg_duration_seconds = if durations.is_empty() {
        0.0
    } else {
        durations.iter().sum::<f64>() / durations.len() as f64
    };

    let mut starts: Vec<i64> = events.iter().map(|event| event.started_at).collect();
    starts.sort_unstable();
    let avg_interval_seconds = if starts.len() < 2 {
        0.0
    } else {
        let total_gap_ms = (starts[starts.len() - 1] - starts[0]) as f64;
        total_gap_ms / 1000.0 / (starts.len() - 1) as f64
    };

    SessionStats {
        count: events.len(),
        avg_duration_seconds,
        avg_interval_seconds,
    }
}

/// Whether the session pattern suggests heading to the hospital.
///
/// True only when the event count, the average duration AND the average
/// interval window all hold; no sub-condition triggers alone.
pub fn should_go_to_hospital(stats: &SessionStats) -> bool {
    let (interval_min, interval_max) = HOSPITAL_INTERVAL_RANGE_SECS;
    stats.count >= HOSPITAL_MIN_EVENTS
        && stats.avg_duration_seconds >= HOSPITAL_MIN_AVG_DURATION_SECS
        && stats.avg_interval_seconds >= interval_min
        && stats.avg_interval_seconds <= interval_max
}

#[cfg(test)]
mod tests {
    use super::{session_stats, should_go_to_hospital, SessionStats};
    use crate::model::contraction::Contraction;
    use uuid::Uuid;

    fn event(started_at: i64, duration_seconds: Option<u32>) -> Contraction {
        let mut contraction = Contraction::new(Uuid::nil(), started_at);
        contraction.duration_seconds = duration_seconds;
        contraction
    }

    #[test]
    fn empty_and_singleton_sessions_have_zero_interval() {
        assert_eq!(session_stats(&[]).avg_interval_seconds, 0.0);
        let single = [event(1_000, Some(40))];
        assert_eq!(session_stats(&single).avg_interval_seconds, 0.0);
    }

    #[test]
    fn average_duration_skips_events_without_one() {
        let events = [event(0, Some(30)), event(60_000, None), event(120_000, Some(60))];
        let stats = session_stats(&events);
        assert_eq!(stats.avg_duration_seconds, 45.0);
    }

    #[test]
    fn intervals_are_taken_over_sorted_start_times() {
        let events = [event(240_000, Some(30)), event(0, Some(30)), event(120_000, Some(30))];
        let stats = session_stats(&events);
        assert_eq!(stats.avg_interval_seconds, 120.0);
    }

    #[test]
    fn hospital_flag_needs_all_three_conditions() {
        let passing = SessionStats {
            count: 6,
            avg_duration_seconds: 45.0,
            avg_interval_seconds: 180.0,
        };
        assert!(should_go_to_hospital(&passing));

        let low_count = SessionStats { count: 5, ..passing };
        let short_duration = SessionStats {
            avg_duration_seconds: 20.0,
            ..passing
        };
        let sparse_intervals = SessionStats {
            avg_interval_seconds: 600.0,
            ..passing
        };
        assert!(!should_go_to_hospital(&low_count));
        assert!(!should_go_to_hospital(&short_duration));
        assert!(!should_go_to_hospital(&sparse_intervals));
    }
}
