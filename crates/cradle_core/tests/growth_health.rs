use cradle_core::db::open_db_in_memory;
use cradle_core::{
    ChangeBus, GrowthBand, GrowthForm, GrowthRecord, GrowthRepository, GrowthService,
    GrowthServiceError, HealthKind, HealthRecord, HealthRepository, SqliteGrowthRepository,
};

#[test]
fn record_entry_parses_free_text_measurements() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGrowthRepository::try_new(&conn, ChangeBus::new()).unwrap();
    let service = GrowthService::new(repo);

    let form = GrowthForm {
        weight_text: "4,35 kg".to_string(),
        height_text: "54.5 cm".to_string(),
        note: "  after feeding  ".to_string(),
    };
    let id = service.record_entry(1_700_000_000_000, 4, &form).unwrap();

    let repo = SqliteGrowthRepository::try_new(&conn, ChangeBus::new()).unwrap();
    let stored = GrowthRepository::get(&repo, id).unwrap().unwrap();
    assert_eq!(stored.weight_grams, Some(4350));
    assert_eq!(stored.height_cm, Some(54.5));
    assert_eq!(stored.note.as_deref(), Some("after feeding"));
    assert_eq!(stored.age_weeks, 4);
}

#[test]
fn blank_measurement_fields_are_accepted_as_not_provided() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGrowthRepository::try_new(&conn, ChangeBus::new()).unwrap();
    let service = GrowthService::new(repo);

    let form = GrowthForm {
        weight_text: "   ".to_string(),
        height_text: String::new(),
        note: String::new(),
    };
    let id = service.record_entry(1_700_000_000_000, 8, &form).unwrap();

    let repo = SqliteGrowthRepository::try_new(&conn, ChangeBus::new()).unwrap();
    let stored = GrowthRepository::get(&repo, id).unwrap().unwrap();
    assert_eq!(stored.weight_grams, None);
    assert_eq!(stored.height_cm, None);
    assert_eq!(stored.note, None);
}

#[test]
fn malformed_measurement_rejects_submission_with_typed_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGrowthRepository::try_new(&conn, ChangeBus::new()).unwrap();
    let service = GrowthService::new(repo);

    let form = GrowthForm {
        weight_text: "chunky".to_string(),
        ..GrowthForm::default()
    };
    let err = service
        .record_entry(1_700_000_000_000, 8, &form)
        .unwrap_err();
    assert!(matches!(
        err,
        GrowthServiceError::InvalidNumber { field: "weight", .. }
    ));

    let repo = SqliteGrowthRepository::try_new(&conn, ChangeBus::new()).unwrap();
    assert!(GrowthRepository::list(&repo).unwrap().is_empty());
}

#[test]
fn list_is_chart_ordered_and_latest_returns_most_recent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGrowthRepository::try_new(&conn, ChangeBus::new()).unwrap();

    let mut early = GrowthRecord::new(1_000, 0);
    early.weight_grams = Some(3_400);
    let mut late = GrowthRecord::new(3_000, 4);
    late.weight_grams = Some(4_400);
    let mut middle = GrowthRecord::new(2_000, 2);
    middle.weight_grams = Some(3_900);

    GrowthRepository::insert(&repo, &late).unwrap();
    GrowthRepository::insert(&repo, &early).unwrap();
    GrowthRepository::insert(&repo, &middle).unwrap();

    let listed = GrowthRepository::list(&repo).unwrap();
    let recorded: Vec<i64> = listed.iter().map(|record| record.recorded_at).collect();
    assert_eq!(recorded, vec![1_000, 2_000, 3_000]);

    let latest = repo.latest().unwrap().unwrap();
    assert_eq!(latest.recorded_at, 3_000);
}

#[test]
fn average_weight_ignores_records_without_one() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGrowthRepository::try_new(&conn, ChangeBus::new()).unwrap();

    assert_eq!(repo.average_weight_grams().unwrap(), None);

    let mut with_weight = GrowthRecord::new(1_000, 0);
    with_weight.weight_grams = Some(4_000);
    let without_weight = GrowthRecord::new(2_000, 1);
    let mut heavier = GrowthRecord::new(3_000, 2);
    heavier.weight_grams = Some(5_000);

    GrowthRepository::insert(&repo, &with_weight).unwrap();
    GrowthRepository::insert(&repo, &without_weight).unwrap();
    GrowthRepository::insert(&repo, &heavier).unwrap();

    assert_eq!(repo.average_weight_grams().unwrap(), Some(4_500.0));
}

#[test]
fn assessment_classifies_band_edges_as_within() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGrowthRepository::try_new(&conn, ChangeBus::new()).unwrap();
    let service = GrowthService::new(repo);

    // Week 0 reference: 3400 g and 50 cm; edges at +15% / +10% exactly.
    let mut record = GrowthRecord::new(1_000, 0);
    record.weight_grams = Some(3_910);
    record.height_cm = Some(55.0);

    let assessment = service.assess(&record);
    assert_eq!(assessment.weight, Some(GrowthBand::WithinAverage));
    assert_eq!(assessment.height, Some(GrowthBand::WithinAverage));

    record.weight_grams = Some(3_911);
    record.height_cm = Some(44.9);
    let assessment = service.assess(&record);
    assert_eq!(assessment.weight, Some(GrowthBand::AboveAverage));
    assert_eq!(assessment.height, Some(GrowthBand::BelowAverage));
}

#[test]
fn health_records_filter_by_kind() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGrowthRepository::try_new(&conn, ChangeBus::new()).unwrap();

    let vaccine = HealthRecord::new(HealthKind::Medical, "First vaccines", 2_000);
    let smile = HealthRecord::new(HealthKind::Development, "First smile", 1_000);
    HealthRepository::insert(&repo, &vaccine).unwrap();
    HealthRepository::insert(&repo, &smile).unwrap();

    let medical = repo.list_by_kind(HealthKind::Medical).unwrap();
    assert_eq!(medical.len(), 1);
    assert_eq!(medical[0].title, "First vaccines");

    let all = HealthRepository::list(&repo).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].title, "First vaccines");
}
