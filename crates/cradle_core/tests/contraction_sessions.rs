use cradle_core::db::open_db_in_memory;
use cradle_core::{
    ChangeBus, Contraction, ContractionRepository, ContractionService, ContractionServiceError,
    Intensity, SqliteContractionRepository, TimerError, TimerState,
};
use uuid::Uuid;

#[test]
fn timed_flow_persists_confirmed_contraction() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContractionRepository::try_new(&conn, ChangeBus::new()).unwrap();
    let mut service = ContractionService::new(repo);

    service.start(1_000_000).unwrap();
    assert!(matches!(service.timer_state(), TimerState::Timing { .. }));

    let duration = service.stop(1_045_000).unwrap();
    assert_eq!(duration, 45);

    let id = service.confirm(Intensity::Strong).unwrap();
    assert!(id > 0);
    assert_eq!(service.timer_state(), TimerState::Idle);

    let repo = SqliteContractionRepository::try_new(&conn, ChangeBus::new()).unwrap();
    let events = repo.list_session(service.session_id()).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].started_at, 1_000_000);
    assert_eq!(events[0].duration_seconds, Some(45));
    assert_eq!(events[0].intensity, Intensity::Strong);
}

#[test]
fn skip_persists_with_default_intensity() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContractionRepository::try_new(&conn, ChangeBus::new()).unwrap();
    let mut service = ContractionService::new(repo);

    service.start(0).unwrap();
    service.stop(30_000).unwrap();
    service.skip().unwrap();

    let repo = SqliteContractionRepository::try_new(&conn, ChangeBus::new()).unwrap();
    let events = repo.list_session(service.session_id()).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].intensity, Intensity::Mild);
}

#[test]
fn undefined_timer_inputs_are_rejected_with_typed_errors() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContractionRepository::try_new(&conn, ChangeBus::new()).unwrap();
    let mut service = ContractionService::new(repo);

    let err = service.stop(1_000).unwrap_err();
    assert!(matches!(
        err,
        ContractionServiceError::Timer(TimerError::NotTiming)
    ));

    service.start(1_000).unwrap();
    let err = service.start(2_000).unwrap_err();
    assert!(matches!(
        err,
        ContractionServiceError::Timer(TimerError::AlreadyTiming)
    ));
    // The running contraction survives the rejected start.
    assert_eq!(service.timer_state(), TimerState::Timing { started_at: 1_000 });

    service.stop(31_000).unwrap();
    let err = service.start(40_000).unwrap_err();
    assert!(matches!(
        err,
        ContractionServiceError::Timer(TimerError::IntensityPending)
    ));

    service.confirm(Intensity::Moderate).unwrap();
    let err = service.skip().unwrap_err();
    assert!(matches!(
        err,
        ContractionServiceError::Timer(TimerError::NothingToConfirm)
    ));
}

#[test]
fn deleting_a_session_leaves_other_sessions_untouched() {
    let conn = open_db_in_memory().unwrap();
    let bus = ChangeBus::new();

    let first_session = Uuid::new_v4();
    let second_session = Uuid::new_v4();
    let repo = SqliteContractionRepository::try_new(&conn, bus.clone()).unwrap();
    for minute in 0..3 {
        let mut event = Contraction::new(first_session, minute * 60_000);
        event.duration_seconds = Some(40);
        repo.insert(&event).unwrap();

        let mut other = Contraction::new(second_session, minute * 60_000 + 1);
        other.duration_seconds = Some(50);
        repo.insert(&other).unwrap();
    }

    repo.delete_session(first_session).unwrap();

    assert!(repo.list_session(first_session).unwrap().is_empty());
    assert_eq!(repo.count_session(second_session).unwrap(), 3);
    assert_eq!(repo.sessions().unwrap(), vec![second_session]);
}

#[test]
fn empty_and_singleton_sessions_report_zero_interval() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContractionRepository::try_new(&conn, ChangeBus::new()).unwrap();
    let mut service = ContractionService::new(repo);

    let stats = service.stats().unwrap();
    assert_eq!(stats.count, 0);
    assert_eq!(stats.avg_interval_seconds, 0.0);
    assert_eq!(stats.avg_duration_seconds, 0.0);

    service.start(0).unwrap();
    service.stop(20_000).unwrap();
    service.confirm(Intensity::Mild).unwrap();

    let stats = service.stats().unwrap();
    assert_eq!(stats.count, 1);
    assert_eq!(stats.avg_interval_seconds, 0.0);
}

#[test]
fn six_regular_contractions_trip_the_hospital_flag_five_do_not() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContractionRepository::try_new(&conn, ChangeBus::new()).unwrap();
    let mut service = ContractionService::new(repo);

    // Six 45-second contractions, starts spaced 180 seconds apart.
    let mut last_id = 0;
    for index in 0..6 {
        let start = index * 180_000;
        service.start(start).unwrap();
        service.stop(start + 45_000).unwrap();
        last_id = service.confirm(Intensity::Moderate).unwrap();
    }

    let stats = service.stats().unwrap();
    assert_eq!(stats.count, 6);
    assert_eq!(stats.avg_duration_seconds, 45.0);
    assert_eq!(stats.avg_interval_seconds, 180.0);
    assert!(service.hospital_flag().unwrap());

    let repo = SqliteContractionRepository::try_new(&conn, ChangeBus::new()).unwrap();
    repo.delete(last_id).unwrap();
    assert!(!service.hospital_flag().unwrap());
}

#[test]
fn discard_session_removes_every_event_of_it() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContractionRepository::try_new(&conn, ChangeBus::new()).unwrap();
    let mut service = ContractionService::new(repo);

    for index in 0..2 {
        let start = index * 120_000;
        service.start(start).unwrap();
        service.stop(start + 40_000).unwrap();
        service.confirm(Intensity::Mild).unwrap();
    }
    service.discard_session().unwrap();

    let stats = service.stats().unwrap();
    assert_eq!(stats.count, 0);
}
