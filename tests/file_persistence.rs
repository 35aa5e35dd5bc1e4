use std::fs;

use noteforge::{
    load_theme, toggle_theme, FileStore, KvPersistence, NoteDraft, NoteStore, RawTag, Theme,
    ViewMode, NOTES_KEY,
};

fn open(dir: &std::path::Path) -> NoteStore<KvPersistence<FileStore>> {
    NoteStore::open(KvPersistence::new(FileStore::new(dir)))
}

#[test]
fn test_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let (kept, trashed) = {
        let mut store = open(dir.path());
        let kept = store.create(NoteDraft {
            title: "Grocery list".into(),
            content: "milk, eggs".into(),
            tags: vec![RawTag::label("food")],
            ..Default::default()
        });
        let trashed = store.create(NoteDraft {
            title: "Old idea".into(),
            is_favorite: true,
            ..Default::default()
        });
        store.toggle_pin(&kept);
        store.soft_delete(&trashed);
        (kept, trashed)
    };

    let store = open(dir.path());
    assert_eq!(store.len(), 2);

    let all = store.project(ViewMode::All, "egg");
    assert_eq!(all.notes.len(), 1);
    assert_eq!(all.notes[0].id, kept);
    assert!(all.notes[0].is_pinned);

    assert!(store.project(ViewMode::Favorites, "").notes.is_empty());
    let trash = store.project(ViewMode::Trash, "");
    assert_eq!(trash.notes[0].id, trashed);
    assert!(trash.notes[0].deleted().is_some());

    assert_eq!(all.counts.active, 1);
    assert_eq!(all.counts.trash, 1);
    assert_eq!(all.counts.recently_updated, 1);
}

#[test]
fn test_corrupt_file_starts_empty_and_recovers() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(format!("{}.json", NOTES_KEY)), "not json").unwrap();

    let mut store = open(dir.path());
    assert!(store.is_empty());

    store.create(NoteDraft {
        title: "Fresh start".into(),
        ..Default::default()
    });

    let reopened = open(dir.path());
    assert_eq!(reopened.notes()[0].title, "Fresh start");
}

#[test]
fn test_reads_records_written_by_older_clients() {
    let dir = tempfile::tempdir().unwrap();
    let raw = r#"[
        {"id": 1, "title": "A", "isPinned": true, "updatedAt": "2024-01-01"},
        {"id": 2, "title": "B", "isPinned": false, "updatedAt": "2024-06-01",
         "tags": ["plain", {"label": "pair", "color": "violet"}, null]},
        null,
        42
    ]"#;
    fs::write(dir.path().join(format!("{}.json", NOTES_KEY)), raw).unwrap();

    let store = open(dir.path());
    let ids: Vec<String> = store
        .project(ViewMode::All, "")
        .notes
        .iter()
        .map(|n| n.id.clone())
        .collect();
    assert_eq!(ids, vec!["1", "2"]);

    let labels: Vec<String> = store
        .get("2")
        .unwrap()
        .normalized_tags()
        .into_iter()
        .map(|t| format!("{}:{}", t.label, t.color))
        .collect();
    assert_eq!(labels, vec!["plain:blue", "pair:violet"]);
}

#[test]
fn test_theme_lives_next_to_notes() {
    let dir = tempfile::tempdir().unwrap();
    let mut prefs = FileStore::new(dir.path());
    assert_eq!(load_theme(&prefs), Theme::Light);
    assert_eq!(toggle_theme(&mut prefs), Theme::Dark);

    let reopened = FileStore::new(dir.path());
    assert_eq!(load_theme(&reopened), Theme::Dark);
    assert!(open(dir.path()).is_empty());
}
