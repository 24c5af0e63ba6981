//! Configuration loading and parsing.
//!
//! Parses `quickfire.toml` (or an override path provided by the binary) into a list of trigger
//! definitions plus an optional locale tag:
//!
//! ```toml
//! locale = "en"
//!
//! [[triggers]]
//! match = "brb"
//! replace = "be right back"
//! prefix = '\s$'
//! ```
//!
//! Every per-trigger option except `match` is optional; defaults are resolved later by the
//! trigger normalizer, so the raw file keeps `None` for absent fields. A missing file, unreadable
//! file or parse failure (including `triggers` not being an array) yields the default, empty
//! configuration: a broken trigger file must never stop the host from starting. Unknown fields
//! are ignored to allow forward evolution.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "quickfire.toml";

/// One `[[triggers]]` table.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TriggerEntry {
    #[serde(rename = "match")]
    pub match_string: String,
    /// Replacement inserted on firing. Absent = fire without inserting.
    #[serde(default)]
    pub replace: Option<String>,
    #[serde(default)]
    pub ignore_case: Option<bool>,
    #[serde(default)]
    pub remove_matching_text: Option<bool>,
    /// Regex source tested against the lookback window before the match.
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub max_prefix_lookback: Option<usize>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub triggers: Vec<TriggerEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // file contents as read (optional)
    pub file: ConfigFile,    // parsed (or default) data
    pub path: Option<PathBuf>,
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    // Prefer a local working directory file before the platform config dir.
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("quickfire").join(CONFIG_FILE_NAME);
    }
    // Final fallback relative filename.
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_missing_using_defaults");
        return Ok(Config::default());
    };
    match parse_str(&content) {
        Some(file) => {
            info!(
                target: "config",
                path = %path.display(),
                triggers = file.triggers.len(),
                locale = file.locale.as_deref(),
                "config_loaded"
            );
            Ok(Config {
                raw: Some(content),
                file,
                path: Some(path),
            })
        }
        None => Ok(Config::default()),
    }
}

/// Parse TOML text; `None` (with a warning) when it does not describe a trigger file.
pub fn parse_str(content: &str) -> Option<ConfigFile> {
    match toml::from_str::<ConfigFile>(content) {
        Ok(file) => Some(file),
        Err(e) => {
            // Fall back to defaults: the trigger feature goes inert instead of failing startup.
            warn!(target: "config", error = %e, "config_parse_failed_using_defaults");
            None
        }
    }
}

impl Config {
    /// Build a configuration directly from TOML text (same fallback rules as [`load_from`]).
    pub fn from_toml(content: &str) -> Self {
        match parse_str(content) {
            Some(file) => Config {
                raw: Some(content.to_owned()),
                file,
                path: None,
            },
            None => Config::default(),
        }
    }

    /// Replace the file's locale, e.g. from a command-line flag.
    pub fn override_locale(&mut self, locale: Option<String>) {
        if let Some(tag) = locale {
            info!(target: "config", locale = tag.as_str(), "locale_overridden");
            self.file.locale = Some(tag);
        }
    }
}
