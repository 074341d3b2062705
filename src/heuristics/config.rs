//! Configuration structures for the comment heuristics pipeline.
//!
//! This module provides strongly-typed configuration management using TOML files.
//! The configuration covers the source-table layout, reference-table paths,
//! processing options and the output table format. Every section falls back to
//! its defaults, so a file only needs to name what it changes.

use crate::error::{HeuristicsError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure loaded from `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source comment table layout
    pub corpus: CorpusConfig,
    /// Reference table locations
    pub references: ReferenceConfig,
    /// Per-comment processing options
    pub processing: ProcessingConfig,
    /// Output table format
    pub output: OutputConfig,
}

/// Layout of the per-source comment tables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// File name every source directory carries (e.g. `comments.csv`)
    pub file_name: String,
    /// Source-local row identifier column
    pub id_column: String,
    /// Comment text column
    pub text_column: String,
    /// Name of the composite key column placed first in the joined table
    pub key_column: String,
    /// Source-specific columns removed during joining
    pub drop_columns: Vec<String>,
    /// Field delimiter of the source tables
    pub delimiter: char,
}

/// Locations and layout of the two reference tables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Emoji category index: ragged CSV, or the nested JSON listing (`.json`)
    pub category_index: PathBuf,
    /// Affective norm table (CSV)
    pub norm_table: PathBuf,
    /// Key column of the norm table
    pub norm_key_column: String,
    /// Source columns for clarity, arousal, valence, familiarity, complexity
    pub norm_columns: [String; 5],
}

/// Per-comment processing options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Run the per-comment stages on the rayon thread pool
    pub parallel: bool,
}

/// Output table format.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Field delimiter of the enriched table
    pub delimiter: char,
    /// Write the normalized (lowercased, tokenized) text instead of the raw text
    pub normalized_text: bool,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// Returns `Ok(Config)` if successful, or an error if the file cannot be read,
    /// parsed, or names a delimiter that is not a single ASCII character.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let load_error = |reason: String| HeuristicsError::ConfigLoad {
            path: path.to_path_buf(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|err| load_error(err.to_string()))?;
        let config: Config = toml::from_str(&content).map_err(|err| load_error(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        delimiter_byte(self.corpus.delimiter)?;
        delimiter_byte(self.output.delimiter)?;
        if self.corpus.key_column.is_empty() {
            return Err(HeuristicsError::Config(
                "corpus.key_column must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Convert a configured delimiter into the byte the csv crate expects.
pub fn delimiter_byte(delimiter: char) -> Result<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(HeuristicsError::Config(format!(
            "delimiter {delimiter:?} is not a single ASCII character"
        )))
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        CorpusConfig {
            file_name: "comments.csv".to_string(),
            id_column: "comment_id".to_string(),
            text_column: "message".to_string(),
            key_column: "concert_w_ID".to_string(),
            drop_columns: vec![
                "username".to_string(),
                "comment_date".to_string(),
                "time_delta_since_upload".to_string(),
            ],
            delimiter: ',',
        }
    }
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        ReferenceConfig {
            category_index: PathBuf::from("heuristics/emojis/emojis.csv"),
            norm_table: PathBuf::from("heuristics/emojis/crawled_data.csv"),
            norm_key_column: "unicode_name".to_string(),
            norm_columns: [
                "clarity_mean".to_string(),
                "arousal_mean".to_string(),
                "valence_mean".to_string(),
                // Spelled as in the published norming table.
                "familarity_mean".to_string(),
                "complexity_mean".to_string(),
            ],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            delimiter: ',',
            normalized_text: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [corpus]
            text_column = "body"

            [processing]
            parallel = true
            "#,
        )
        .unwrap();

        assert_eq!(config.corpus.text_column, "body");
        assert_eq!(config.corpus.id_column, "comment_id");
        assert_eq!(config.references.norm_key_column, "unicode_name");
        assert!(config.processing.parallel);
        assert!(config.output.normalized_text);
        config.validate().unwrap();
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let mut config = Config::default();
        config.output.delimiter = '¦';
        assert!(matches!(config.validate(), Err(HeuristicsError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[output]\ndelimiter = \";\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(delimiter_byte(config.output.delimiter).unwrap(), b';');
        assert_eq!(config.corpus.file_name, "comments.csv");
    }

    #[test]
    fn test_load_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[corpus\nfile_name = 3\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, HeuristicsError::ConfigLoad { .. }));
        assert!(err.to_string().contains("broken.toml"));

        let missing = Config::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(missing.to_string().contains("absent.toml"));
    }
}
