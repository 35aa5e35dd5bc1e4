use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use which::which;

use crate::{NoteError, Result};

const CONFIG_FILE: &str = "config.json";

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the key-value store entries
    pub data_dir: PathBuf,

    /// Editor command used by `--edit`
    pub editor_command: Option<String>,

    /// How many notes `list` shows unless told otherwise
    pub default_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".noteforge"));

        Config {
            data_dir,
            editor_command: None,
            default_limit: 20,
        }
    }
}

impl Config {
    /// Loads the configuration from `path`, or from the platform config
    /// directory when no path is given. A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) => path,
                None => {
                    debug!("No config directory available, using defaults");
                    return Ok(Config::default());
                }
            },
        };

        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let text = fs::read_to_string(&path)?;
        let config = serde_json::from_str(&text).map_err(|e| NoteError::ConfigError {
            message: format!("{}: {}", path.display(), e),
        })?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// The command `--edit` launches: the configured one, then `$VISUAL`,
    /// then `$EDITOR`, then the first fallback editor found on `PATH`.
    /// Blank settings are skipped.
    pub fn resolve_editor(&self) -> String {
        let configured = self
            .editor_command
            .clone()
            .filter(|command| !command.trim().is_empty());

        if let Some(command) = configured
            .or_else(|| editor_from_env("VISUAL"))
            .or_else(|| editor_from_env("EDITOR"))
        {
            return command;
        }

        let found = FALLBACK_EDITORS
            .iter()
            .find(|editor| which(editor).is_ok())
            .unwrap_or(&FALLBACK_EDITORS[0]);
        debug!("No editor configured, falling back to {}", found);
        found.to_string()
    }
}

#[cfg(windows)]
const FALLBACK_EDITORS: [&str; 1] = ["notepad"];
#[cfg(not(windows))]
const FALLBACK_EDITORS: [&str; 3] = ["nano", "vim", "vi"];

fn editor_from_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .filter(|command| !command.trim().is_empty())
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "noteforge")
}

fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
