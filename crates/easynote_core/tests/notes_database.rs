use easynote_core::{EntityRef, Note, NotesDatabase, PurgeSummary, DEFAULT_LIST_NAME};

fn named(text: &str, priority: &str, list: &str) -> Note {
    Note::new(
        text,
        EntityRef::Name(priority.to_string()),
        EntityRef::Name(list.to_string()),
    )
}

#[test]
fn moving_list_to_trash_moves_its_active_notes() {
    let mut db = NotesDatabase::open_in_memory().unwrap();
    let home = db.add_list("Home").unwrap();
    let work = db.add_list("Work").unwrap();

    let milk = db.add_note(&named("Buy milk", "Normal", "Home")).unwrap();
    let rent = db.add_note(&named("Pay rent", "Important", "Home")).unwrap();
    let already = db.add_note(&named("Old", "Low", "Home")).unwrap();
    db.move_note_to_trash(already).unwrap();
    let report = db.add_note(&named("Report", "Normal", "Work")).unwrap();

    let moved = db.move_list_to_trash(home).unwrap();
    assert_eq!(moved, 2);

    assert!(db.get_list_by_id(home).unwrap().in_trash);
    assert!(db.get_all_notes_from_list(home).unwrap().is_empty());

    let trash_ids: Vec<_> = db
        .get_all_notes_from_trash()
        .unwrap()
        .iter()
        .map(|note| note.id)
        .collect();
    for id in [milk, rent, already] {
        assert!(trash_ids.contains(&id));
    }
    assert!(!trash_ids.contains(&report));
    assert_eq!(db.get_all_notes_from_list(work).unwrap().len(), 1);
}

#[test]
fn restoring_list_leaves_notes_in_trash() {
    let mut db = NotesDatabase::open_in_memory().unwrap();
    let home = db.add_list("Home").unwrap();
    let note = db.add_note(&named("Buy milk", "Normal", "Home")).unwrap();

    db.move_list_to_trash(home).unwrap();
    db.restore_list_from_trash(home).unwrap();

    assert!(!db.get_list_by_id(home).unwrap().in_trash);
    assert!(db.list_all_active_names().unwrap().contains(&"Home".to_string()));
    assert!(db.get_all_notes_from_list(home).unwrap().is_empty());

    db.restore_note_from_trash(note).unwrap();
    assert_eq!(db.get_all_notes_from_list(home).unwrap().len(), 1);
}

#[test]
fn move_all_notes_keeps_list_active() {
    let mut db = NotesDatabase::open_in_memory().unwrap();
    let default_list = db.get_list_id_by_name(DEFAULT_LIST_NAME).unwrap();
    let seeded = db.get_all_notes_from_list(default_list).unwrap().len();

    assert_eq!(db.move_all_notes_from_list_to_trash(default_list).unwrap(), seeded);
    assert_eq!(db.move_all_notes_from_list_to_trash(default_list).unwrap(), 0);
    assert!(!db.get_list_by_id(default_list).unwrap().in_trash);
    assert_eq!(db.get_all_notes_from_trash().unwrap().len(), seeded);
}

#[test]
fn purge_trash_removes_trashed_notes_and_lists() {
    let mut db = NotesDatabase::open_in_memory().unwrap();
    let home = db.add_list("Home").unwrap();
    db.add_list("Work").unwrap();
    db.add_note(&named("Buy milk", "Normal", "Home")).unwrap();
    let report = db.add_note(&named("Report", "Normal", "Work")).unwrap();
    db.move_note_to_trash(report).unwrap();
    db.move_list_to_trash(home).unwrap();

    let summary = db.purge_trash().unwrap();
    assert_eq!(summary, PurgeSummary { notes: 2, lists: 1 });

    assert!(db.get_all_notes_from_trash().unwrap().is_empty());
    assert!(db.list_all_trashed_lists().unwrap().is_empty());
    assert!(db.get_list_by_id(home).is_err());
    assert_eq!(db.purge_trash().unwrap(), PurgeSummary::default());
}

fn assert_every_note_has_its_list(db: &NotesDatabase) {
    for record in db.get_all_notes().unwrap() {
        assert!(record.list_name.is_some(), "note {} lost its list", record.id);
        db.update_note(&record.to_note()).unwrap();
    }
}

#[test]
fn purge_trash_takes_notes_revived_inside_trashed_list() {
    let mut db = NotesDatabase::open_in_memory().unwrap();
    let home = db.add_list("Home").unwrap();
    let restored = db.add_note(&named("Buy milk", "Normal", "Home")).unwrap();

    db.move_list_to_trash(home).unwrap();
    db.restore_note_from_trash(restored).unwrap();
    let added = db
        .add_note(&Note::new(
            "Pay rent",
            EntityRef::Name("Important".to_string()),
            EntityRef::Id(home),
        ))
        .unwrap();

    let summary = db.purge_trash().unwrap();
    assert_eq!(summary, PurgeSummary { notes: 2, lists: 1 });

    assert_eq!(db.get_note(restored).unwrap(), None);
    assert_eq!(db.get_note(added).unwrap(), None);
    assert_every_note_has_its_list(&db);
}

#[test]
fn deleting_trashed_lists_removes_their_remaining_notes() {
    let mut db = NotesDatabase::open_in_memory().unwrap();
    let home = db.add_list("Home").unwrap();
    let work = db.add_list("Work").unwrap();
    let note = db.add_note(&named("Buy milk", "Normal", "Home")).unwrap();
    let report = db.add_note(&named("Report", "Normal", "Work")).unwrap();

    db.move_list_to_trash(home).unwrap();
    db.restore_note_from_trash(note).unwrap();

    assert_eq!(db.delete_trashed_lists().unwrap(), 1);
    assert_eq!(db.get_note(note).unwrap(), None);
    assert_eq!(db.get_note(report).unwrap().unwrap().list_id, work);
    assert_every_note_has_its_list(&db);
}
