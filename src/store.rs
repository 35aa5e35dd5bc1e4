//! The canonical note collection.
//!
//! [`NoteStore`] owns the only mutable copy of the collection. Every
//! operation that changes it writes the full collection through the
//! [`NotePersistence`] adapter before returning; operations addressed to an
//! id that isn't present change nothing and write nothing.
use std::collections::HashSet;

use chrono::Utc;
use log::{debug, info, warn};

use crate::{project, Note, NoteDraft, NotePersistence, Projection, ViewMode};

/// Which branch of [`NoteStore::update`] was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// A note with the same id existed and was replaced in place.
    Updated,
    /// No note had that id; the note was added at the front.
    Inserted,
}

/// Owns the canonical, ordered note collection and keeps it persisted.
pub struct NoteStore<P> {
    notes: Vec<Note>,
    persistence: P,
}

impl<P: NotePersistence> NoteStore<P> {
    /// Opens the store, loading the collection from `persistence`.
    ///
    /// Records repeating an id already seen are dropped, so the collection
    /// holds at most one note per id.
    pub fn open(persistence: P) -> Self {
        let loaded = persistence.load();
        let total = loaded.len();

        let mut seen = HashSet::with_capacity(total);
        let notes: Vec<Note> = loaded
            .into_iter()
            .filter(|note| seen.insert(note.id.clone()))
            .collect();

        if notes.len() < total {
            warn!("Dropped {} notes with duplicate ids", total - notes.len());
        }
        debug!("Opened note store with {} notes", notes.len());

        Self { notes, persistence }
    }

    /// The canonical collection, in stored order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Projects the collection for display, measuring recency against the current time.
    pub fn project(&self, mode: ViewMode, query: &str) -> Projection<'_> {
        project(&self.notes, mode, query, Utc::now())
    }

    /// Adds a new note at the front of the collection and returns its id.
    pub fn create(&mut self, draft: NoteDraft) -> String {
        let note = Note::new(draft, Utc::now());
        let id = note.id.clone();
        info!("Creating note: {}", id);

        self.notes.insert(0, note);
        self.flush();
        id
    }

    /// Replaces the note with the same id, or inserts it at the front when
    /// there is none.
    ///
    /// `updated_at` is stored as given; the editor refreshes it before calling.
    pub fn update(&mut self, note: Note) -> Upsert {
        let outcome = match self.position(&note.id) {
            Some(index) => {
                info!("Updating note: {}", note.id);
                self.notes[index] = note;
                Upsert::Updated
            }
            None => {
                info!("Note {} not found, inserting it", note.id);
                self.notes.insert(0, note);
                Upsert::Inserted
            }
        };
        self.flush();
        outcome
    }

    /// Moves a note to the trash, stamping `deleted_at` with the current time.
    pub fn soft_delete(&mut self, id: &str) -> bool {
        let now = Utc::now();
        self.modify(id, "Moving note to trash", |note| {
            note.is_deleted = true;
            note.deleted_at = Some(now.into());
        })
    }

    /// Takes a note out of the trash. `deleted_at` is removed, not kept stale.
    pub fn restore(&mut self, id: &str) -> bool {
        self.modify(id, "Restoring note", |note| {
            note.is_deleted = false;
            note.deleted_at = None;
        })
    }

    /// Removes a note from the collection for good.
    pub fn purge(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) => {
                info!("Permanently deleting note: {}", id);
                self.notes.remove(index);
                self.flush();
                true
            }
            None => {
                debug!("Purge ignored, no note {}", id);
                false
            }
        }
    }

    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        self.modify(id, "Toggling favorite on note", |note| {
            note.is_favorite = !note.is_favorite;
        })
    }

    pub fn toggle_pin(&mut self, id: &str) -> bool {
        self.modify(id, "Toggling pin on note", |note| {
            note.is_pinned = !note.is_pinned;
        })
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|n| n.id == id)
    }

    /// Applies `change` to the note with `id` and flushes. Returns whether it matched.
    fn modify(&mut self, id: &str, action: &str, change: impl FnOnce(&mut Note)) -> bool {
        let Some(index) = self.position(id) else {
            debug!("{} ignored, no note {}", action, id);
            return false;
        };

        info!("{}: {}", action, id);
        change(&mut self.notes[index]);
        self.flush();
        true
    }

    fn flush(&mut self) {
        self.persistence.save(&self.notes);
    }
}
