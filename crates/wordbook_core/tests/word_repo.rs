use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use rusqlite::Connection;
use wordbook_core::db::open_db_in_memory;
use wordbook_core::{
    Definition, RepoError, SqliteWordRepository, Word, WordOrder, WordRepository,
    WordValidationError,
};

fn t(seconds: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + TimeDelta::seconds(seconds)
}

fn word_with_definitions(text: &str, at: DateTime<Utc>, definitions: &[(&str, i64)]) -> Word {
    let mut word = Word::new(text, at);
    for (definition_text, votes) in definitions {
        let mut definition = Definition::new(*definition_text, at);
        definition.votes = *votes;
        word.push_definition(definition);
    }
    word
}

#[test]
fn save_and_find_round_trip_preserves_aggregate() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWordRepository::try_new(&conn).unwrap();
    let word = word_with_definitions("run", t(0), &[("move fast", 3), ("execute", -1)]);

    let saved = repo.save(&word).unwrap();
    let loaded = repo.find_by_id(word.id).unwrap().expect("word should exist");

    assert_eq!(saved, word);
    assert_eq!(loaded, word);
}

#[test]
fn definitions_come_back_in_stored_order_without_resorting() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWordRepository::try_new(&conn).unwrap();
    // Deliberately unranked: the repository must not reorder.
    let word = word_with_definitions("set", t(0), &[("low", -2), ("high", 9), ("mid", 1)]);

    repo.save(&word).unwrap();
    let loaded = repo.find_by_id(word.id).unwrap().unwrap();

    let texts: Vec<_> = loaded.definitions.iter().map(|d| d.text.as_str()).collect();
    assert_eq!(texts, vec!["low", "high", "mid"]);
}

#[test]
fn saving_again_replaces_definitions_wholesale() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWordRepository::try_new(&conn).unwrap();
    let mut word = word_with_definitions("bank", t(0), &[("river side", 0), ("money house", 0)]);
    repo.save(&word).unwrap();

    let removed = word.definitions[0].id;
    word.remove_definition(removed);
    word.text = "banks".to_string();
    word.push_definition(Definition::new("tilt an aircraft", t(5)));
    repo.save(&word).unwrap();

    let loaded = repo.find_by_id(word.id).unwrap().unwrap();
    assert_eq!(loaded, word);
    assert!(loaded.definition(removed).is_none());
    assert_eq!(count_rows(&conn, "definitions"), 2);
}

#[test]
fn find_by_id_returns_none_for_unknown_word() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWordRepository::try_new(&conn).unwrap();

    assert!(repo.find_by_id(uuid::Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn find_all_orders_newest_first_by_requested_key() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWordRepository::try_new(&conn).unwrap();

    let mut older = Word::new("older", t(0));
    let newer = Word::new("newer", t(10));
    older.updated_at = t(20);
    repo.save(&older).unwrap();
    repo.save(&newer).unwrap();

    let by_created: Vec<_> = repo
        .find_all(WordOrder::CreatedAtDesc)
        .unwrap()
        .into_iter()
        .map(|word| word.text)
        .collect();
    let by_updated: Vec<_> = repo
        .find_all(WordOrder::UpdatedAtDesc)
        .unwrap()
        .into_iter()
        .map(|word| word.text)
        .collect();

    assert_eq!(by_created, vec!["newer", "older"]);
    assert_eq!(by_updated, vec!["older", "newer"]);
}

#[test]
fn find_all_on_empty_store_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWordRepository::try_new(&conn).unwrap();

    assert!(repo.find_all(WordOrder::default()).unwrap().is_empty());
}

#[test]
fn delete_cascades_to_definitions() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWordRepository::try_new(&conn).unwrap();
    let word = word_with_definitions("gone", t(0), &[("a", 0), ("b", 0)]);
    repo.save(&word).unwrap();

    repo.delete(word.id).unwrap();

    assert!(repo.find_by_id(word.id).unwrap().is_none());
    assert_eq!(count_rows(&conn, "definitions"), 0);
}

#[test]
fn delete_unknown_word_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWordRepository::try_new(&conn).unwrap();
    let id = uuid::Uuid::new_v4();

    match repo.delete(id) {
        Err(RepoError::NotFound(missing)) => assert_eq!(missing, id),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn save_rejects_invalid_aggregate_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWordRepository::try_new(&conn).unwrap();
    let word = Word::new("  ", t(0));

    match repo.save(&word) {
        Err(RepoError::Validation(WordValidationError::BlankWordText)) => {}
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(count_rows(&conn, "words"), 0);
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteWordRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        }) => {
            assert_eq!(actual_version, 0);
            assert!(expected_version > 0);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("unmigrated connection should be rejected"),
    }
}

#[test]
fn corrupted_rows_surface_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWordRepository::try_new(&conn).unwrap();
    conn.execute(
        "INSERT INTO words (uuid, text, created_at, updated_at) VALUES ('not-a-uuid', 'x', 0, 0);",
        [],
    )
    .unwrap();

    match repo.find_all(WordOrder::default()) {
        Err(RepoError::InvalidData(message)) => assert!(message.contains("not-a-uuid")),
        other => panic!("unexpected result: {other:?}"),
    }
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}
