//! Persistence of the note collection.
//!
//! The whole collection lives as one JSON array under [`NOTES_KEY`]. Loading
//! never fails: a missing, unreadable or malformed entry reads as an empty
//! collection, and records without a usable id are skipped. Saving
//! never fails either; a rejected write is logged and remembered, and the
//! in-memory collection stays authoritative for the rest of the session.
use log::{debug, info, trace, warn};
use serde_json::Value;

use crate::{KeyValueStore, Note};

/// Key of the entry holding the note collection.
pub const NOTES_KEY: &str = "noteforge-notes";

/// Loads and saves the canonical note collection.
pub trait NotePersistence {
    /// Returns the stored collection, or an empty one if nothing usable is stored.
    fn load(&self) -> Vec<Note>;

    /// Replaces the stored collection. Failures are not reported to the caller.
    fn save(&mut self, notes: &[Note]);
}

/// [`NotePersistence`] over a [`KeyValueStore`].
#[derive(Debug)]
pub struct KvPersistence<S> {
    store: S,
    last_save_error: Option<String>,
}

impl<S: KeyValueStore> KvPersistence<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            last_save_error: None,
        }
    }

    /// Message of the most recent failed save, cleared by the next successful one.
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> NotePersistence for KvPersistence<S> {
    fn load(&self) -> Vec<Note> {
        let bytes = match self.store.get(NOTES_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("No stored notes under {}", NOTES_KEY);
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read {}: {}", NOTES_KEY, e);
                return Vec::new();
            }
        };

        let notes = decode_notes(&bytes);
        info!("Loaded {} notes", notes.len());
        notes
    }

    fn save(&mut self, notes: &[Note]) {
        let result = serde_json::to_vec(notes)
            .map_err(Into::into)
            .and_then(|json| self.store.set(NOTES_KEY, &json));

        match result {
            Ok(()) => {
                debug!("Saved {} notes", notes.len());
                self.last_save_error = None;
            }
            Err(e) => {
                warn!("Failed to save notes, keeping in-memory state: {}", e);
                self.last_save_error = Some(e.to_string());
            }
        }
    }
}

/// Decodes a stored collection, skipping entries that are not objects or
/// carry no usable id.
pub fn decode_notes(bytes: &[u8]) -> Vec<Note> {
    let entries = match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Array(entries)) => entries,
        Ok(other) => {
            warn!("Stored notes are not a list (found {}), ignoring", kind_of(&other));
            return Vec::new();
        }
        Err(e) => {
            warn!("Stored notes are not valid JSON, ignoring: {}", e);
            return Vec::new();
        }
    };

    let total = entries.len();
    let notes: Vec<Note> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            if !entry.is_object() {
                trace!("Skipping entry {}: {}", index, kind_of(&entry));
                return None;
            }
            match serde_json::from_value::<Note>(entry) {
                Ok(note) if note.id.is_empty() => {
                    trace!("Skipping entry {}: empty id", index);
                    None
                }
                Ok(note) => Some(note),
                Err(e) => {
                    trace!("Skipping entry {}: {}", index, e);
                    None
                }
            }
        })
        .collect();

    if notes.len() < total {
        warn!("Skipped {} malformed note records", total - notes.len());
    }
    notes
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
