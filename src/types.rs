//! Shared result type and the command-line subcommands.
use clap::Subcommand;

use crate::{NoteError, ViewMode};

/// A specialized Result type for noteforge operations.
pub type Result<T> = std::result::Result<T, NoteError>;

/// Available subcommands for the noteforge application
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new note
    New {
        /// Title of the note
        #[clap(short = 'T', long, default_value = "")]
        title: String,

        /// Content of the note
        #[clap(short, long)]
        content: Option<String>,

        /// Tags, comma-separated; `label:color` picks a color
        #[clap(short = 't', long)]
        tags: Option<String>,

        /// Pin the note to the top of the list
        #[clap(short, long)]
        pinned: bool,

        /// Mark the note as a favorite
        #[clap(short, long)]
        favorite: bool,

        /// Write the content in an editor before saving
        #[clap(short, long)]
        edit: bool,
    },

    /// Edit an existing note
    Edit {
        /// ID of the note to edit
        id: String,

        /// New title for the note
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// New content for the note
        #[clap(short, long)]
        content: Option<String>,

        /// Replace the note's tags (comma-separated)
        #[clap(short = 't', long)]
        tags: Option<String>,

        /// Open the content in an editor
        #[clap(short, long)]
        edit: bool,
    },

    /// Move a note to the trash
    Delete {
        /// ID of the note to delete
        id: String,
    },

    /// Bring a note back from the trash
    Restore {
        /// ID of the note to restore
        id: String,
    },

    /// Permanently delete a note
    Purge {
        /// ID of the note to purge
        id: String,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Toggle a note's favorite flag
    Favorite {
        /// ID of the note
        id: String,
    },

    /// Toggle a note's pinned flag
    Pin {
        /// ID of the note
        id: String,
    },

    /// List notes in a view, optionally filtered by a search query
    List {
        /// Which notes to show
        #[clap(short, long, value_enum, default_value_t = ViewMode::All)]
        view: ViewMode,

        /// Only show notes whose title, text or tags contain this
        #[clap(short, long)]
        search: Option<String>,

        /// Limit the number of notes shown (0 shows all)
        #[clap(short = 'n', long)]
        limit: Option<usize>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Show note counts
    Stats {
        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Show or toggle the light/dark theme preference
    Theme {
        /// Switch to the other theme
        #[clap(short, long)]
        toggle: bool,
    },
}
