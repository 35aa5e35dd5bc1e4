//! Derived, read-only views of the note collection.
//!
//! Everything here is a pure function of its arguments: the current time is
//! passed in rather than read, so projecting the same collection twice gives
//! the same result.
use chrono::{DateTime, Duration, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::Note;

/// Notes updated more recently than this count as "recently updated".
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Which slice of the collection to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ViewMode {
    /// Every note not in the trash
    #[default]
    All,
    /// Favorite notes not in the trash
    Favorites,
    /// Notes in the trash
    Trash,
}

impl ViewMode {
    /// Whether `note` belongs in this view, before any search filtering.
    pub fn includes(&self, note: &Note) -> bool {
        match self {
            ViewMode::All => !note.is_deleted,
            ViewMode::Favorites => !note.is_deleted && note.is_favorite,
            ViewMode::Trash => note.is_deleted,
        }
    }
}

/// Aggregate counts over the whole collection, independent of view and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ViewCounts {
    pub active: usize,
    pub favorites: usize,
    pub trash: usize,
    pub recently_updated: usize,
}

/// The notes to display, in display order, with the collection counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection<'a> {
    pub notes: Vec<&'a Note>,
    pub counts: ViewCounts,
}

/// Filters, searches and orders `notes` for `mode`.
///
/// The search query is trimmed and compared case-insensitively against the
/// title, snippet, content and tag labels; an empty query matches everything.
/// The trash is ordered by deletion time, newest first. Other views put pinned
/// notes first, then order by last update, newest first. Missing timestamps
/// sort as the Unix epoch, and ties keep their collection order.
pub fn project<'a>(
    notes: &'a [Note],
    mode: ViewMode,
    query: &str,
    now: DateTime<Utc>,
) -> Projection<'a> {
    let query = query.trim().to_lowercase();

    let mut visible: Vec<&Note> = notes
        .iter()
        .filter(|note| mode.includes(note))
        .filter(|note| matches_search(note, &query))
        .collect();

    // sort_by is stable, which keeps ties in collection order
    match mode {
        ViewMode::Trash => {
            visible.sort_by(|a, b| or_epoch(b.deleted()).cmp(&or_epoch(a.deleted())));
        }
        ViewMode::All | ViewMode::Favorites => {
            visible.sort_by(|a, b| {
                b.is_pinned
                    .cmp(&a.is_pinned)
                    .then_with(|| or_epoch(b.updated()).cmp(&or_epoch(a.updated())))
            });
        }
    }

    Projection {
        notes: visible,
        counts: count_notes(notes, now),
    }
}

/// Whether `note` matches an already trimmed, lower-cased query.
pub fn matches_search(note: &Note, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let contains = |text: &str| text.to_lowercase().contains(query);

    contains(&note.title)
        || note.snippet.as_deref().is_some_and(contains)
        || contains(&note.content)
        || note
            .normalized_tags()
            .iter()
            .any(|tag| contains(&tag.label))
}

/// Counts active, favorite, trashed and recently updated notes.
pub fn count_notes(notes: &[Note], now: DateTime<Utc>) -> ViewCounts {
    let window = Duration::days(RECENT_WINDOW_DAYS);

    notes.iter().fold(ViewCounts::default(), |mut counts, note| {
        if note.is_deleted {
            counts.trash += 1;
        } else {
            counts.active += 1;
            if note.is_favorite {
                counts.favorites += 1;
            }
            if note.updated().is_some_and(|at| now - at < window) {
                counts.recently_updated += 1;
            }
        }
        counts
    })
}

/// Missing or unreadable timestamps order as the Unix epoch.
fn or_epoch(at: Option<DateTime<Utc>>) -> DateTime<Utc> {
    at.unwrap_or_default()
}
