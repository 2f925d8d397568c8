use chrono::{TimeZone, Utc};
use notekeep_core::db::open_db_in_memory;
use notekeep_core::storage::notes_key;
use notekeep_core::{
    KeyValueStore, MemoryKeyValueStore, Note, NoteRepository, NoteService, NoteServiceError,
    NoteValidationError, RepoError, Session, SqliteKeyValueStore, StorageNoteRepository,
};
use uuid::Uuid;

fn fixed_note(content: &str, updated_secs: i64) -> Note {
    let at = Utc.timestamp_opt(updated_secs, 0).unwrap();
    Note {
        id: Uuid::new_v4(),
        title: String::new(),
        content: content.to_string(),
        created_at: at,
        updated_at: at,
    }
}

#[test]
fn create_note_trims_input_and_persists_it() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let service = NoteService::new(StorageNoteRepository::new(&store), &Session::local("alice"));

    let created = service.create_note("  Shopping ", " milk\n").unwrap();
    assert_eq!(created.title, "Shopping");
    assert_eq!(created.content, "milk");
    assert_eq!(created.created_at, created.updated_at);

    let listed = service.list_notes().unwrap();
    assert_eq!(listed, vec![created]);
    assert!(store.get_item(&notes_key("alice")).unwrap().is_some());
}

#[test]
fn invalid_input_is_rejected_before_persisting() {
    let store = MemoryKeyValueStore::new();
    let service = NoteService::new(StorageNoteRepository::new(&store), &Session::local("alice"));

    let err = service.create_note("title", "   ").unwrap_err();
    assert!(matches!(
        err,
        NoteServiceError::Validation(NoteValidationError::EmptyContent)
    ));

    let err = service.create_note(&"t".repeat(201), "body").unwrap_err();
    assert!(matches!(
        err,
        NoteServiceError::Validation(NoteValidationError::TitleTooLong { .. })
    ));

    let err = service.create_note("", &"c".repeat(10_001)).unwrap_err();
    assert!(matches!(
        err,
        NoteServiceError::Validation(NoteValidationError::ContentTooLong { .. })
    ));

    assert!(store.is_empty());
}

#[test]
fn list_is_sorted_by_updated_at_descending() {
    let store = MemoryKeyValueStore::new();
    let repo = StorageNoteRepository::new(&store);
    let oldest = fixed_note("oldest", 1_000);
    let newest = fixed_note("newest", 3_000);
    let middle = fixed_note("middle", 2_000);
    repo.save_notes("alice", &[oldest.clone(), newest.clone(), middle.clone()])
        .unwrap();

    let service = NoteService::new(repo, &Session::local("alice"));
    let contents: Vec<String> = service
        .list_notes()
        .unwrap()
        .into_iter()
        .map(|note| note.content)
        .collect();
    assert_eq!(contents, vec!["newest", "middle", "oldest"]);
}

#[test]
fn update_moves_note_to_front_and_keeps_created_at() {
    let store = MemoryKeyValueStore::new();
    let repo = StorageNoteRepository::new(&store);
    let first = fixed_note("first", 1_000);
    let second = fixed_note("second", 2_000);
    repo.save_notes("alice", &[first.clone(), second.clone()])
        .unwrap();

    let service = NoteService::new(repo, &Session::local("alice"));
    let updated = service.update_note(first.id, "Renamed", "first, edited").unwrap();
    assert_eq!(updated.created_at, first.created_at);
    assert!(updated.updated_at > second.updated_at);

    let listed = service.list_notes().unwrap();
    assert_eq!(listed[0].id, first.id);
    assert_eq!(listed[0].title, "Renamed");
    assert_eq!(listed[1], second);
}

#[test]
fn update_and_delete_of_unknown_id_report_not_found() {
    let store = MemoryKeyValueStore::new();
    let service = NoteService::new(StorageNoteRepository::new(&store), &Session::local("alice"));
    service.create_note("", "keep me").unwrap();
    let missing = Uuid::new_v4();

    assert!(matches!(
        service.update_note(missing, "", "x").unwrap_err(),
        NoteServiceError::NoteNotFound(id) if id == missing
    ));
    assert!(matches!(
        service.delete_note(missing).unwrap_err(),
        NoteServiceError::NoteNotFound(id) if id == missing
    ));
    assert_eq!(service.list_notes().unwrap().len(), 1);
}

#[test]
fn delete_removes_exactly_one_note() {
    let store = MemoryKeyValueStore::new();
    let service = NoteService::new(StorageNoteRepository::new(&store), &Session::local("alice"));
    let a = service.create_note("", "a").unwrap();
    let b = service.create_note("", "b").unwrap();
    let c = service.create_note("", "c").unwrap();

    service.delete_note(b.id).unwrap();

    let mut remaining: Vec<Uuid> = service
        .list_notes()
        .unwrap()
        .into_iter()
        .map(|note| note.id)
        .collect();
    remaining.sort();
    let mut expected = vec![a.id, c.id];
    expected.sort();
    assert_eq!(remaining, expected);
    assert_eq!(service.get_note(b.id).unwrap(), None);
    assert_eq!(service.get_note(a.id).unwrap().map(|note| note.content), Some("a".to_string()));
}

#[test]
fn notes_are_isolated_per_owner() {
    let store = MemoryKeyValueStore::new();
    let alice = NoteService::new(StorageNoteRepository::new(&store), &Session::local("alice"));
    let bob = NoteService::new(StorageNoteRepository::new(&store), &Session::local("bob"));

    let note = alice.create_note("", "private").unwrap();

    assert!(bob.list_notes().unwrap().is_empty());
    assert!(matches!(
        bob.delete_note(note.id).unwrap_err(),
        NoteServiceError::NoteNotFound(_)
    ));
    assert_eq!(alice.list_notes().unwrap().len(), 1);
}

#[test]
fn persisted_list_is_sorted_and_camel_cased() {
    let store = MemoryKeyValueStore::new();
    let repo = StorageNoteRepository::new(&store);
    repo.save_notes("alice", &[fixed_note("old", 10), fixed_note("new", 20)])
        .unwrap();

    let raw = store.get_item(&notes_key("alice")).unwrap().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed[0]["content"], "new");
    assert_eq!(parsed[1]["content"], "old");
    assert!(parsed[0].get("updatedAt").is_some());
    assert!(parsed[0].get("updated_at").is_none());
}

#[test]
fn corrupt_note_list_is_reported_not_discarded() {
    let store = MemoryKeyValueStore::new();
    store.set_item(&notes_key("alice"), "{not json").unwrap();
    let service = NoteService::new(StorageNoteRepository::new(&store), &Session::local("alice"));

    assert!(matches!(
        service.list_notes().unwrap_err(),
        NoteServiceError::Repo(RepoError::InvalidData { .. })
    ));
    assert!(service.create_note("", "x").is_err());
    assert_eq!(
        store.get_item(&notes_key("alice")).unwrap().as_deref(),
        Some("{not json")
    );
}
