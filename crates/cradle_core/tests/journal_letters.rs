use cradle_core::db::open_db_in_memory;
use cradle_core::{
    ChangeBus, JournalEntry, JournalRepository, Letter, LetterRepository, Mood, RepoError,
    SqliteJournalRepository,
};

#[test]
fn new_entry_defaults_to_no_reply() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteJournalRepository::try_new(&conn, ChangeBus::new()).unwrap();

    let entry = JournalEntry::new("First kick", "Felt it during breakfast!", Mood::Radiant);
    assert!(entry.reply.is_none());

    let id = JournalRepository::insert(&repo, &entry).unwrap();
    let loaded = JournalRepository::get(&repo, id).unwrap().unwrap();
    assert_eq!(loaded.title, "First kick");
    assert_eq!(loaded.mood, Mood::Radiant);
    assert!(loaded.reply.is_none());
    assert!(loaded.created_at > 0);
}

#[test]
fn update_overwrites_entry_and_set_reply_attaches_one() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteJournalRepository::try_new(&conn, ChangeBus::new()).unwrap();

    let id = JournalRepository::insert(
        &repo,
        &JournalEntry::new("Rough night", "Could not sleep.", Mood::Tired),
    )
    .unwrap();

    let mut stored = JournalRepository::get(&repo, id).unwrap().unwrap();
    stored.body = "Could not sleep, heartburn again.".to_string();
    stored.mood = Mood::Low;
    repo.update(&stored).unwrap();

    repo.set_reply(id, "Third trimester nights are hard. Rest when you can.")
        .unwrap();

    let reloaded = JournalRepository::get(&repo, id).unwrap().unwrap();
    assert_eq!(reloaded.body, "Could not sleep, heartburn again.");
    assert_eq!(reloaded.mood, Mood::Low);
    assert!(reloaded.reply.is_some());
    assert!(reloaded.updated_at >= reloaded.created_at);
}

#[test]
fn update_missing_entry_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteJournalRepository::try_new(&conn, ChangeBus::new()).unwrap();

    let mut ghost = JournalEntry::new("Ghost", "Not stored", Mood::Good);
    ghost.id = 404;
    let err = repo.update(&ghost).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { id: 404, .. }));
}

#[test]
fn list_returns_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteJournalRepository::try_new(&conn, ChangeBus::new()).unwrap();

    let first = JournalRepository::insert(
        &repo,
        &JournalEntry::new("Week 12", "Scan day.", Mood::Good),
    )
    .unwrap();
    let second = JournalRepository::insert(
        &repo,
        &JournalEntry::new("Week 13", "Told the family.", Mood::Radiant),
    )
    .unwrap();

    let entries = JournalRepository::list(&repo).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, second);
    assert_eq!(entries[1].id, first);
}

#[test]
fn list_by_mood_filters_entries() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteJournalRepository::try_new(&conn, ChangeBus::new()).unwrap();

    JournalRepository::insert(&repo, &JournalEntry::new("A", "body", Mood::Anxious)).unwrap();
    JournalRepository::insert(&repo, &JournalEntry::new("B", "body", Mood::Good)).unwrap();
    JournalRepository::insert(&repo, &JournalEntry::new("C", "body", Mood::Anxious)).unwrap();

    let anxious = repo.list_by_mood(Mood::Anxious).unwrap();
    assert_eq!(anxious.len(), 2);
    assert!(anxious.iter().all(|entry| entry.mood == Mood::Anxious));
}

#[test]
fn search_hits_contain_term_and_blank_is_pass_through() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteJournalRepository::try_new(&conn, ChangeBus::new()).unwrap();

    JournalRepository::insert(
        &repo,
        &JournalEntry::new("Nursery", "Painted the nursery wall.", Mood::Good),
    )
    .unwrap();
    JournalRepository::insert(
        &repo,
        &JournalEntry::new("Checkup", "Doctor says all is well.", Mood::Good),
    )
    .unwrap();

    let hits = repo.search("NURSERY").unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].title.to_lowercase().contains("nursery")
        || hits[0].body.to_lowercase().contains("nursery"));

    assert_eq!(repo.search("").unwrap(), JournalRepository::list(&repo).unwrap());
}

#[test]
fn delete_removes_entry() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteJournalRepository::try_new(&conn, ChangeBus::new()).unwrap();

    let id = JournalRepository::insert(
        &repo,
        &JournalEntry::new("Temp", "To be removed", Mood::Good),
    )
    .unwrap();
    JournalRepository::delete(&repo, id).unwrap();
    assert!(JournalRepository::get(&repo, id).unwrap().is_none());

    let err = JournalRepository::delete(&repo, id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}

#[test]
fn letters_roundtrip_and_list_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteJournalRepository::try_new(&conn, ChangeBus::new()).unwrap();

    let first = LetterRepository::insert(
        &repo,
        &Letter::new("Before you arrive", "We picked your room today."),
    )
    .unwrap();
    let second = LetterRepository::insert(
        &repo,
        &Letter::new("One month to go", "Your bag is packed."),
    )
    .unwrap();

    let loaded = LetterRepository::get(&repo, first).unwrap().unwrap();
    assert_eq!(loaded.title, "Before you arrive");

    let letters = LetterRepository::list(&repo).unwrap();
    assert_eq!(letters.len(), 2);
    assert_eq!(letters[0].id, second);

    LetterRepository::delete(&repo, first).unwrap();
    assert!(LetterRepository::get(&repo, first).unwrap().is_none());
}
