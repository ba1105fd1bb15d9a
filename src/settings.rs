//! Application settings from an optional `settings.toml`.
//!
//! ```toml
//! default_column_width = 12
//! frozen_columns = 1
//! delimiter = ";"
//!
//! [keys]
//! delete_row = "Ctrl+D"
//! ```

use crate::utils::settings_search_dirs;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const FILE_NAME: &str = "settings.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Width for columns missing from the sidecar config.
    pub default_column_width: usize,
    /// How many `index:width` lines a generated sidecar config gets.
    pub generated_columns: usize,
    /// Leading columns that stay put while scrolling horizontally.
    pub frozen_columns: usize,
    /// Field separator for reading and writing.
    pub delimiter: char,
    /// Keymap overrides: action name -> key string.
    pub keys: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_column_width: 10,
            generated_columns: 11,
            frozen_columns: 2,
            delimiter: ',',
            keys: HashMap::new(),
        }
    }
}

impl Settings {
    /// Load the first `settings.toml` found in the search directories.
    ///
    /// A broken file is reported and ignored; settings are never fatal.
    pub fn load() -> Self {
        for dir in settings_search_dirs() {
            let path = dir.join(FILE_NAME);
            if !path.is_file() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(s) => {
                    tracing::info!("Loaded settings [{}]", path.display());
                    return s;
                }
                Err(e) => {
                    tracing::warn!("Ignoring settings: {e:#}");
                    return Self::default();
                }
            }
        }
        Self::default()
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let s: Self = toml::from_str(text)?;
        s.validate()?;
        Ok(s)
    }

    fn validate(&self) -> Result<()> {
        if self.default_column_width == 0 {
            bail!("default_column_width must be positive");
        }
        if !self.delimiter.is_ascii() || matches!(self.delimiter, '"' | '\n' | '\r') {
            bail!("delimiter must be a single ASCII character other than a quote or newline");
        }
        Ok(())
    }

    /// The delimiter as the byte the csv reader/writer expects.
    pub fn delimiter_byte(&self) -> u8 {
        // validate() and the CLI parser only let ASCII through
        u8::try_from(self.delimiter).unwrap_or(b',')
    }

    /// Apply a `--delimiter` command-line override.
    pub fn with_delimiter(mut self, delimiter: Option<char>) -> Result<Self> {
        if let Some(d) = delimiter {
            self.delimiter = d;
            self.validate()?;
        }
        Ok(self)
    }
}

/// Location of the per-user settings file, for the help screen.
pub fn user_settings_path() -> Option<PathBuf> {
    crate::utils::app_config_dir().map(|dir| dir.join(FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let s = Settings::from_toml("").unwrap();
        assert_eq!(s.default_column_width, 10);
        assert_eq!(s.generated_columns, 11);
        assert_eq!(s.frozen_columns, 2);
        assert_eq!(s.delimiter, ',');
        assert!(s.keys.is_empty());
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let s = Settings::from_toml("frozen_columns = 0\ndelimiter = \";\"\n[keys]\nquit = \"Ctrl+Q\"\n").unwrap();
        assert_eq!(s.frozen_columns, 0);
        assert_eq!(s.delimiter_byte(), b';');
        assert_eq!(s.keys.get("quit").map(String::as_str), Some("Ctrl+Q"));
        assert_eq!(s.default_column_width, 10);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(Settings::from_toml("default_column_width = 0").is_err());
        assert!(Settings::from_toml("delimiter = \"\\\"\"").is_err());
        assert!(Settings::from_toml("delimiter = \"é\"").is_err());
        assert!(Settings::from_toml("frozen_columns = \"two\"").is_err());
    }

    #[test]
    fn cli_delimiter_override() {
        let s = Settings::default().with_delimiter(Some('\t')).unwrap();
        assert_eq!(s.delimiter_byte(), b'\t');
        assert!(Settings::default().with_delimiter(Some('"')).is_err());
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, "default_column_width = 14\n").unwrap();
        assert_eq!(Settings::from_file(&path).unwrap().default_column_width, 14);
    }
}
