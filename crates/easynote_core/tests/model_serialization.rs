use easynote_core::{EntityRef, ListId, Note, NoteId, NoteRecord, Priority, PriorityId};
use serde_json::json;

#[test]
fn references_serialize_as_tagged_values() {
    let by_id: EntityRef<ListId> = EntityRef::Id(ListId(4));
    let by_name: EntityRef<ListId> = EntityRef::Name("Home".to_string());

    assert_eq!(serde_json::to_value(&by_id).unwrap(), json!({ "id": 4 }));
    assert_eq!(
        serde_json::to_value(&by_name).unwrap(),
        json!({ "name": "Home" })
    );
}

#[test]
fn note_write_model_roundtrips_through_json() {
    let mut note = Note::new(
        "Buy milk",
        EntityRef::Name("Normal".to_string()),
        EntityRef::Id(ListId(1)),
    );
    note.id = Some(NoteId(12));

    let value = serde_json::to_value(&note).unwrap();
    assert_eq!(value["id"], json!(12));
    assert_eq!(value["priority"], json!({ "name": "Normal" }));
    assert_eq!(value["list"], json!({ "id": 1 }));

    let decoded: Note = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, note);
}

#[test]
fn record_converts_to_resolved_write_model() {
    let record = NoteRecord {
        id: NoteId(3),
        modification_time: 1_700_000_000_000,
        text: "Pay rent".to_string(),
        in_trash: true,
        priority: Priority::new(1, "Important"),
        list_id: ListId(2),
        list_name: Some("Home".to_string()),
    };

    let note = record.to_note();
    assert_eq!(note.id, Some(NoteId(3)));
    assert_eq!(note.priority, EntityRef::Id(PriorityId(1)));
    assert_eq!(note.list, EntityRef::Id(ListId(2)));
    assert!(note.in_trash);
    assert_eq!(note.modification_time, record.modification_time);
}
