//! CLI module for the noteforge application
//!
//! The CLI plays both collaborator roles around the note store: it is the
//! editor that turns arguments into drafts and edited notes, and the view
//! that renders projections.
use std::{
    fs::{read_to_string, OpenOptions},
    io::{stdin, stdout, Write},
    path::Path,
    process::Command,
};

use chrono::Utc;
use log::info;
use shell_words::split;
use tempfile::Builder;

use crate::{
    load_theme, parse_tags, process_editor_content, toggle_theme, Commands, Config, FileStore,
    KeyValueStore, KvPersistence, Note, NoteDraft, NoteError, NoteStore, Projection, Result,
    Upsert, ViewCounts, ViewMode,
};

/// CLI Application handler - processes CLI commands and interfaces with NoteStore
pub struct App<S = FileStore> {
    /// The canonical note collection
    notes: NoteStore<KvPersistence<S>>,

    /// Store holding the theme preference
    preferences: S,

    /// Application configuration
    config: Config,

    /// Whether to display verbose output
    verbose: bool,
}

impl App<FileStore> {
    /// Create a new CLI application storing its data under `config.data_dir`
    pub fn new(config: Config, verbose: bool) -> Self {
        let store = FileStore::new(config.data_dir.clone());
        App::with_store(store, config, verbose)
    }
}

impl<S: KeyValueStore + Clone> App<S> {
    /// Create a new CLI application over the given key-value store
    pub fn with_store(store: S, config: Config, verbose: bool) -> Self {
        let preferences = store.clone();
        let notes = NoteStore::open(KvPersistence::new(store));
        Self {
            notes,
            preferences,
            config,
            verbose,
        }
    }

    pub fn notes(&self) -> &[Note] {
        self.notes.notes()
    }

    /// Run the CLI application with the given command
    pub fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::New {
                title,
                content,
                tags,
                pinned,
                favorite,
                edit,
            } => {
                let content = match (content, edit) {
                    (Some(c), _) => c,
                    (None, true) => self.open_editor(&title, "")?,
                    (None, false) => String::new(),
                };
                let draft = NoteDraft {
                    title,
                    content,
                    snippet: None,
                    tags: parse_tags(tags),
                    is_pinned: pinned,
                    is_favorite: favorite,
                };
                let id = self.notes.create(draft);
                println!("Note created with ID: {}", id);
            }

            Commands::Edit {
                id,
                title,
                content,
                tags,
                edit,
            } => self.handle_edit(id, title, content, tags, edit)?,

            Commands::Delete { id } => {
                let changed = self.notes.soft_delete(&id);
                self.report(changed, &id, "moved to the trash");
            }

            Commands::Restore { id } => {
                let changed = self.notes.restore(&id);
                self.report(changed, &id, "restored from the trash");
            }

            Commands::Purge { id, force } => self.handle_purge(id, force)?,

            Commands::Favorite { id } => {
                let changed = self.notes.toggle_favorite(&id);
                let state = self.flag_state(&id, |n| n.is_favorite, "favorited", "unfavorited");
                self.report(changed, &id, state);
            }

            Commands::Pin { id } => {
                let changed = self.notes.toggle_pin(&id);
                let state = self.flag_state(&id, |n| n.is_pinned, "pinned", "unpinned");
                self.report(changed, &id, state);
            }

            Commands::List {
                view,
                search,
                limit,
                json,
            } => {
                let limit = limit.unwrap_or(self.config.default_limit);
                let projection = self.notes.project(view, search.as_deref().unwrap_or(""));
                self.display_projection(&projection, view, limit, json)?;
            }

            Commands::Stats { json } => {
                let counts = self.notes.project(ViewMode::All, "").counts;
                self.display_counts(&counts, json)?;
            }

            Commands::Theme { toggle } => {
                let theme = if toggle {
                    toggle_theme(&mut self.preferences)
                } else {
                    load_theme(&self.preferences)
                };
                println!("Theme: {}", theme);
            }
        }

        self.warn_on_save_failure();
        Ok(())
    }

    fn handle_edit(
        &mut self,
        id: String,
        title: Option<String>,
        content: Option<String>,
        tags: Option<String>,
        open_editor: bool,
    ) -> Result<()> {
        if content.is_some() && open_editor {
            return Err(NoteError::ApplicationError {
                message: "Cannot specify both --content and --edit options".to_string(),
            });
        }

        // Retrieve the existing note
        let mut note = match self.notes.get(&id) {
            Some(note) => note.clone(),
            None => return Err(NoteError::NoteNotFound { id }),
        };

        if let Some(new_title) = title {
            note.title = new_title;
        }

        if let Some(new_content) = content {
            note.content = new_content;
        } else if open_editor {
            note.content = self.open_editor(&note.title, &note.content)?;
        }

        if tags.is_some() {
            note.tags = parse_tags(tags);
        }

        // Update the note's last modified time
        note.updated_at = Some(Utc::now().into());

        if self.notes.update(note) == Upsert::Updated {
            println!("Note {} updated successfully", id);
        }
        Ok(())
    }

    fn handle_purge(&mut self, id: String, force: bool) -> Result<()> {
        // Step 1: Fetch the note to be purged (to show details in the prompt)
        let note = match self.notes.get(&id) {
            Some(note) => note.clone(),
            None => {
                println!("No note with ID {}", id);
                return Ok(());
            }
        };

        // Step 2: Prompt for confirmation unless the force flag is set
        if !force {
            println!("You are about to permanently delete the following note:");
            println!("ID:     {}", note.id);
            println!("Title:  {}", note.display_title());
            let preview = note.preview();
            if !preview.is_empty() {
                println!("\n{}", preview);
            }

            println!("\nThis action cannot be undone!");
            print!("Are you sure you want to delete this note? [y/N]: ");
            stdout().flush().map_err(NoteError::Io)?;

            let mut input = String::new();
            stdin().read_line(&mut input).map_err(NoteError::Io)?;

            let input = input.trim().to_lowercase();
            if input != "y" && input != "yes" {
                println!("Deletion cancelled.");
                return Ok(());
            }
        }

        // Step 3: Purge the note
        self.notes.purge(&id);
        println!(
            "Note '{}' ({}) has been permanently deleted.",
            note.display_title(),
            note.id
        );
        Ok(())
    }

    fn flag_state(
        &self,
        id: &str,
        flag: impl Fn(&Note) -> bool,
        on: &'static str,
        off: &'static str,
    ) -> &'static str {
        match self.notes.get(id) {
            Some(note) if flag(note) => on,
            _ => off,
        }
    }

    fn report(&self, changed: bool, id: &str, action: &str) {
        if changed {
            println!("Note {} {}", id, action);
        } else {
            println!("No note with ID {}", id);
        }
    }

    fn warn_on_save_failure(&self) {
        if let Some(message) = self.notes.persistence().last_save_error() {
            eprintln!(
                "{} changes are kept for this session only: {}",
                console::style("warning:").yellow().bold(),
                message
            );
        }
    }

    /// Display a projection in the requested format
    fn display_projection(
        &self,
        projection: &Projection<'_>,
        view: ViewMode,
        limit: usize,
        json: bool,
    ) -> Result<()> {
        let shown: Vec<&Note> = if limit > 0 {
            projection.notes.iter().take(limit).copied().collect()
        } else {
            projection.notes.clone()
        };

        if json {
            return self.display_notes_json(&shown, &projection.counts);
        }

        if shown.is_empty() {
            println!("{}", empty_message(view));
            return Ok(());
        }

        self.display_notes_text(&shown, view);

        if shown.len() < projection.notes.len() {
            println!(
                "\nShowing {} of {} notes. Use --limit to show more.",
                shown.len(),
                projection.notes.len()
            );
        } else {
            println!(
                "\nFound {} note{}",
                shown.len(),
                if shown.len() == 1 { "" } else { "s" }
            );
        }
        Ok(())
    }

    /// Display notes in JSON format
    fn display_notes_json(&self, notes: &[&Note], counts: &ViewCounts) -> Result<()> {
        let notes: Vec<serde_json::Value> = notes
            .iter()
            .map(|note| {
                serde_json::json!({
                    "id": note.id,
                    "title": note.display_title(),
                    "preview": note.preview(),
                    "tags": note.normalized_tags(),
                    "isPinned": note.is_pinned,
                    "isFavorite": note.is_favorite,
                    "updatedAt": note.updated_at,
                    "deletedAt": note.deleted_at,
                })
            })
            .collect();

        let output = serde_json::json!({ "notes": notes, "counts": counts });
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    /// Display notes in text format
    fn display_notes_text(&self, notes: &[&Note], view: ViewMode) {
        // Use terminal width for formatting if available
        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        for (i, note) in notes.iter().enumerate() {
            if i > 0 {
                println!("{}", "-".repeat(term_width.min(50)));
            }

            let mut markers = Vec::new();
            if note.is_pinned {
                markers.push(console::style("Pinned").cyan().to_string());
            }
            if note.is_favorite && view != ViewMode::Trash {
                markers.push(console::style("★").yellow().to_string());
            }

            let stamp = match view {
                ViewMode::Trash => note
                    .deleted()
                    .map(|at| format!("Deleted: {}", at.format("%b %-d, %Y")))
                    .unwrap_or_default(),
                _ => note
                    .updated()
                    .map(|at| format!("Updated: {}", at.format("%b %-d, %Y")))
                    .unwrap_or_default(),
            };

            println!("ID: {} | {}", note.id, stamp);
            println!(
                "{} {}",
                console::style(note.display_title()).bold(),
                markers.join(" ")
            );

            let tags = note
                .normalized_tags()
                .iter()
                .map(|tag| {
                    let color = match tag.palette_color().id {
                        crate::ColorId::Blue => console::Color::Blue,
                        crate::ColorId::Green => console::Color::Green,
                        crate::ColorId::Amber => console::Color::Yellow,
                        crate::ColorId::Rose => console::Color::Red,
                        crate::ColorId::Violet => console::Color::Magenta,
                    };
                    console::style(format!("#{}", tag.label)).fg(color).to_string()
                })
                .collect::<Vec<_>>();
            if !tags.is_empty() {
                println!("Tags: {}", tags.join(" "));
            }

            let preview = note.preview();
            if !preview.is_empty() {
                println!("\n{}", preview);
            }
        }
    }

    fn display_counts(&self, counts: &ViewCounts, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(counts)?);
            return Ok(());
        }

        println!("Total notes:      {}", counts.active);
        println!("Updated recently: {}", counts.recently_updated);
        println!("Favorites:        {}", counts.favorites);
        println!("In trash:         {}", counts.trash);
        if self.verbose {
            println!("Data directory:   {}", self.config.data_dir.display());
        }
        Ok(())
    }

    fn open_editor(&self, title: &str, existing_content: &str) -> Result<String> {
        let temp_file = Builder::new().suffix(".txt").tempfile()?;
        let temp_path = temp_file.path().to_path_buf();

        {
            let mut file = OpenOptions::new().write(true).open(&temp_path)?;
            writeln!(file, "<!-- Editing: {} -->", title)?;
            writeln!(
                file,
                "<!-- Lines wrapped in <!-- and --> are ignored. Save and exit when done. -->"
            )?;
            writeln!(file)?;
            write!(file, "{}", existing_content)?;
        }

        let editor_cmd = self.config.resolve_editor();
        info!("Opening editor: {}", editor_cmd);
        self.launch_editor(&editor_cmd, &temp_path)?;

        let content = read_to_string(&temp_path)?;
        Ok(process_editor_content(&content))
    }

    fn launch_editor(&self, editor_cmd: &str, file_path: &Path) -> Result<()> {
        // Handle shell-like command parsing
        let args = split(editor_cmd).map_err(|e| NoteError::EditorError {
            message: format!("Failed to parse editor command: {}", e),
        })?;

        let Some((program, rest)) = args.split_first() else {
            return Err(NoteError::EditorError {
                message: "Empty editor command".to_string(),
            });
        };

        let status = Command::new(program).args(rest).arg(file_path).status()?;

        if !status.success() {
            return Err(NoteError::EditorError {
                message: "Editor exited with non-zero status".to_string(),
            });
        }

        Ok(())
    }
}

fn empty_message(view: ViewMode) -> &'static str {
    match view {
        ViewMode::All => "You don't have any notes yet.",
        ViewMode::Favorites => "No favorites yet.",
        ViewMode::Trash => "Trash is empty.",
    }
}
