use famtree_core::db::migrations::latest_version;
use famtree_core::db::{open_db, open_db_in_memory, DbError};
use famtree_core::{
    JsonFileSource, MemberRecord, MemberRepository, MemberSource, RepoError, SourceError,
    SqliteMemberRepository,
};
use rusqlite::Connection;

const EXPORT_JSON: &str = r#"[
    {"id": 3, "name": "Grace", "generation": 1, "parentId": 1, "spouseId": null},
    {"id": 1, "name": "Henry", "birthYear": "1930", "generation": 0, "parentId": null, "spouseId": 2},
    {"id": 2, "name": "Iris", "generation": 0, "phoneNumber": "555-0101", "address": "2 Oak Rd"},
    {"id": 4, "name": "Jack", "generation": 2, "parentId": 3, "notes": "twin"}
]"#;

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn open_db_in_memory_creates_members_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'members'
            );",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1);
}

#[test]
fn reopening_store_keeps_members() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("family.sqlite3");

    let conn = open_db(&path).unwrap();
    SqliteMemberRepository::try_new(&conn)
        .unwrap()
        .insert_member(&MemberRecord::new(1, "Henry", 0))
        .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    assert_eq!(repo.count_members().unwrap(), 1);
    assert_eq!(repo.get_member(1).unwrap().unwrap().name, "Henry");
    assert_eq!(repo.get_member(2).unwrap(), None);
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 99;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 99);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn list_members_orders_by_generation_then_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let records = JsonFileSource::new("export.json").parse(EXPORT_JSON).unwrap();

    assert_eq!(repo.replace_all(&records).unwrap(), 4);

    let ids: Vec<i64> = repo
        .list_members()
        .unwrap()
        .iter()
        .map(|member| member.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[test]
fn stored_records_round_trip_optional_fields_and_dangling_links() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let mut record = MemberRecord::new(5, "Kate", 1)
        .with_parent(404)
        .with_spouse(405);
    record.address = Some("9 Pine Ave".to_string());
    repo.insert_member(&record).unwrap();

    assert_eq!(repo.get_member(5).unwrap(), Some(record));
}

#[test]
fn replace_all_swaps_previous_content() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    repo.insert_member(&MemberRecord::new(99, "Old", 0)).unwrap();

    repo.replace_all(&[MemberRecord::new(1, "New", 0)]).unwrap();

    assert_eq!(repo.get_member(99).unwrap(), None);
    assert_eq!(repo.count_members().unwrap(), 1);
}

#[test]
fn insert_rejects_blank_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let err = repo
        .insert_member(&MemberRecord::new(1, "", 0))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn sqlite_repository_is_a_member_source() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    repo.replace_all(&[
        MemberRecord::new(2, "Child", 1).with_parent(1),
        MemberRecord::new(1, "Root", 0),
    ])
    .unwrap();

    let fetched = repo.fetch_members().unwrap();
    assert_eq!(fetched[0].name, "Root");
    assert_eq!(fetched[1].name, "Child");
}

#[test]
fn json_file_source_sorts_by_generation_stably() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("members.json");
    std::fs::write(&path, EXPORT_JSON).unwrap();

    let members = JsonFileSource::new(&path).fetch_members().unwrap();

    let names: Vec<&str> = members.iter().map(|member| member.name.as_str()).collect();
    assert_eq!(names, vec!["Henry", "Iris", "Grace", "Jack"]);
    assert_eq!(members[1].phone_number.as_deref(), Some("555-0101"));
    assert_eq!(members[3].notes.as_deref(), Some("twin"));
}

#[test]
fn json_file_source_reports_missing_file_and_bad_content() {
    let dir = tempfile::tempdir().unwrap();

    let missing = JsonFileSource::new(dir.path().join("absent.json"));
    assert!(matches!(
        missing.fetch_members().unwrap_err(),
        SourceError::Io { .. }
    ));

    let bad_path = dir.path().join("bad.json");
    std::fs::write(&bad_path, r#"{"not": "a list"}"#).unwrap();
    let bad = JsonFileSource::new(&bad_path);
    assert!(matches!(
        bad.fetch_members().unwrap_err(),
        SourceError::Parse { .. }
    ));
}
