//! Affective norm table: emoji token → five psychometric rating means.

use crate::error::{HeuristicsError, Result};
use indexmap::IndexMap;
use std::path::Path;
use tracing::{info, warn};

/// Mean ratings of one emoji from the norming study.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormScores {
    pub clarity: f64,
    pub arousal: f64,
    pub valence: f64,
    pub familiarity: f64,
    pub complexity: f64,
}

/// Exact-match lookup table keyed by the canonical token (`unicode_name`).
#[derive(Debug, Clone, Default)]
pub struct AffectiveNormTable {
    entries: IndexMap<String, NormScores>,
}

impl AffectiveNormTable {
    /// Build from `(token, scores)` pairs; the first entry for a token wins.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, NormScores)>,
        K: Into<String>,
    {
        let mut table = AffectiveNormTable::default();
        for (name, scores) in entries {
            table.insert(name.into(), scores);
        }
        table
    }

    fn insert(&mut self, name: String, scores: NormScores) -> bool {
        if self.entries.contains_key(&name) {
            return false;
        }
        self.entries.insert(name, scores);
        true
    }

    /// Load the norm CSV.
    ///
    /// Only `key_column` and the five `norm_columns` (clarity, arousal,
    /// valence, familiarity, complexity) are read; all other columns are
    /// discarded.
    pub fn load(
        path: impl AsRef<Path>,
        key_column: &str,
        norm_columns: &[String; 5],
    ) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|err| reference_error(path, err))?;

        let headers = reader
            .headers()
            .map_err(|err| reference_error(path, err))?
            .clone();
        let position = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim() == name)
                .ok_or_else(|| reference_error(path, format!("missing column '{name}'")))
        };
        let key_idx = position(key_column)?;
        let mut score_idx = [0usize; 5];
        for (slot, name) in score_idx.iter_mut().zip(norm_columns) {
            *slot = position(name)?;
        }

        let mut table = AffectiveNormTable::default();
        let mut duplicates = 0usize;
        for (row, result) in reader.records().enumerate() {
            let record = result.map_err(|err| reference_error(path, err))?;
            let name = record.get(key_idx).unwrap_or("").trim();
            if name.is_empty() {
                return Err(reference_error(path, format!("row {}: empty key", row + 1)));
            }

            let mut values = [0f64; 5];
            for ((value, &idx), column) in values.iter_mut().zip(&score_idx).zip(norm_columns) {
                let cell = record.get(idx).unwrap_or("").trim();
                *value = cell.parse().map_err(|_| {
                    reference_error(
                        path,
                        format!("row {}: '{column}' value {cell:?} is not a number", row + 1),
                    )
                })?;
            }
            let [clarity, arousal, valence, familiarity, complexity] = values;
            let scores = NormScores {
                clarity,
                arousal,
                valence,
                familiarity,
                complexity,
            };
            if !table.insert(name.to_string(), scores) {
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            warn!(
                path = %path.display(),
                duplicates,
                "norm table repeats tokens; first entries kept"
            );
        }
        info!(path = %path.display(), entries = table.len(), "loaded affective norm table");
        Ok(table)
    }

    /// Scores for exactly `token` (case-sensitive).
    pub fn lookup(&self, token: &str) -> Option<&NormScores> {
        self.entries.get(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn reference_error(path: &Path, reason: impl ToString) -> HeuristicsError {
    HeuristicsError::ReferenceLoad {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
