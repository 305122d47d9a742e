use cradle_core::db::open_db_in_memory;
use cradle_core::{
    search_everything, BabyName, Category, ChangeBus, ChecklistItem, ChecklistKind,
    ChecklistRepository, Gender, JournalEntry, JournalRepository, Mood, NameRepository,
    SearchDomain, SearchQuery, SqliteChecklistRepository, SqliteJournalRepository,
    SqliteNameRepository,
};
use rusqlite::Connection;

#[test]
fn blank_query_returns_no_hits() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);

    let hits = search_everything(&conn, &SearchQuery::new("   ")).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn hits_span_families_and_all_contain_the_term() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);

    let hits = search_everything(&conn, &SearchQuery::new("mila")).unwrap();
    assert_eq!(hits.len(), 2);

    let domains: Vec<SearchDomain> = hits.iter().map(|hit| hit.domain).collect();
    assert!(domains.contains(&SearchDomain::Journal));
    assert!(domains.contains(&SearchDomain::BabyName));
    assert!(hits.iter().all(|hit| {
        hit.title.to_lowercase().contains("mila") || hit.snippet.to_lowercase().contains("mila")
    }));
}

#[test]
fn limit_caps_hits_across_families() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);

    let mut query = SearchQuery::new("a");
    query.limit = 2;
    let hits = search_everything(&conn, &query).unwrap();
    assert_eq!(hits.len(), 2);
}

#[test]
fn matching_is_case_insensitive_substring() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);

    let upper = search_everything(&conn, &SearchQuery::new("SWADDLE")).unwrap();
    assert_eq!(upper.len(), 1);
    assert_eq!(upper[0].domain, SearchDomain::Checklist);
    assert_eq!(upper[0].title, "Swaddle blankets");
}

fn seed(conn: &Connection) {
    let bus = ChangeBus::new();

    let checklist = SqliteChecklistRepository::try_new(conn, bus.clone()).unwrap();
    checklist
        .insert(&ChecklistItem::new(
            ChecklistKind::HospitalBag,
            Category::Baby,
            "Swaddle blankets",
        ))
        .unwrap();

    let journal = SqliteJournalRepository::try_new(conn, bus.clone()).unwrap();
    JournalRepository::insert(
        &journal,
        &JournalEntry::new(
            "Name shortlist",
            "We keep coming back to Mila.",
            Mood::Good,
        ),
    )
    .unwrap();

    let names = SqliteNameRepository::try_new(conn, bus).unwrap();
    names.insert(&BabyName::new("Mila", Gender::Girl)).unwrap();
}
