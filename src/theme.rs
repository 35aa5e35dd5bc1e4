//! The light/dark theme preference, kept in its own store entry.
use std::fmt;

use log::{debug, warn};

use crate::KeyValueStore;

/// Key of the entry holding the theme preference.
pub const THEME_KEY: &str = "noteforge-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads the stored theme. Anything missing or unrecognized reads as light.
pub fn load_theme(store: &impl KeyValueStore) -> Theme {
    match store.get(THEME_KEY) {
        Ok(Some(bytes)) => match bytes.as_slice() {
            b"dark" => Theme::Dark,
            b"light" => Theme::Light,
            other => {
                debug!(
                    "Unrecognized theme {:?}, using light",
                    String::from_utf8_lossy(other)
                );
                Theme::Light
            }
        },
        Ok(None) => Theme::Light,
        Err(e) => {
            warn!("Failed to read theme preference: {}", e);
            Theme::Light
        }
    }
}

/// Stores `theme`. A rejected write is logged and otherwise ignored.
pub fn save_theme(store: &mut impl KeyValueStore, theme: Theme) {
    match store.set(THEME_KEY, theme.as_str().as_bytes()) {
        Ok(()) => debug!("Saved theme preference: {}", theme),
        Err(e) => warn!("Failed to save theme preference: {}", e),
    }
}

/// Flips the stored theme and returns the new one.
pub fn toggle_theme(store: &mut impl KeyValueStore) -> Theme {
    let theme = load_theme(store).toggled();
    save_theme(store, theme);
    theme
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[test]
    fn test_defaults_to_light() {
        assert_eq!(load_theme(&MemoryStore::new()), Theme::Light);

        let mut store = MemoryStore::new();
        store.set(THEME_KEY, b"sepia").unwrap();
        assert_eq!(load_theme(&store), Theme::Light);
    }

    #[test]
    fn test_toggle_persists() {
        let mut store = MemoryStore::new();
        assert_eq!(toggle_theme(&mut store), Theme::Dark);
        assert_eq!(store.get(THEME_KEY).unwrap().unwrap(), b"dark".to_vec());
        assert_eq!(load_theme(&store), Theme::Dark);
        assert_eq!(toggle_theme(&mut store), Theme::Light);
        assert_eq!(load_theme(&store), Theme::Light);
    }

    #[test]
    fn test_failed_save_is_ignored() {
        let mut store = MemoryStore::with_quota(2);
        assert_eq!(toggle_theme(&mut store), Theme::Dark);
        assert_eq!(load_theme(&store), Theme::Light);
    }
}
