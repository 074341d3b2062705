//! Data structures for comment tables and the joined, enriched corpus.

use crate::error::{HeuristicsError, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A delimited table held fully in memory: one header row plus string cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column names in file order
    pub headers: Vec<String>,
    /// Row cells, aligned with `headers`
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Read a delimited UTF-8 table whose first row is the header.
    ///
    /// Open, parse and encoding failures are reported against `path`.
    pub fn read(path: impl AsRef<Path>, delimiter: u8) -> Result<Self> {
        let path = path.as_ref();
        Self::read_records(path, delimiter).map_err(|source| HeuristicsError::TableRead {
            path: path.to_path_buf(),
            source,
        })
    }

    fn read_records(path: &Path, delimiter: u8) -> csv::Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .from_path(path)?;

        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Table { headers, rows })
    }

    /// Write the table, header row first.
    pub fn write(&self, path: impl AsRef<Path>, delimiter: u8) -> Result<()> {
        let path = path.as_ref();
        self.write_records(path, delimiter)
            .map_err(|source| HeuristicsError::TableWrite {
                path: path.to_path_buf(),
                source,
            })
    }

    fn write_records(&self, path: &Path, delimiter: u8) -> csv::Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(path)?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Position of a column by exact name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Remove every named column that is present; absent names are ignored.
    pub fn drop_columns(&mut self, names: &[String]) {
        let keep: Vec<bool> = self
            .headers
            .iter()
            .map(|header| !names.contains(header))
            .collect();
        if keep.iter().all(|&k| k) {
            return;
        }

        self.headers = retain_by_mask(std::mem::take(&mut self.headers), &keep);
        for row in &mut self.rows {
            *row = retain_by_mask(std::mem::take(row), &keep);
        }
    }

    /// Remove the rows at `indices` in one pass.
    ///
    /// The index set is collected beforehand so no row is dropped while the
    /// table is being scanned.
    pub fn remove_rows(&mut self, indices: &BTreeSet<usize>) {
        if indices.is_empty() {
            return;
        }
        let rows = std::mem::take(&mut self.rows);
        self.rows = rows
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| !indices.contains(idx))
            .map(|(_, row)| row)
            .collect();
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn retain_by_mask(cells: Vec<String>, keep: &[bool]) -> Vec<String> {
    cells
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| keep.get(*idx).copied().unwrap_or(true))
        .map(|(_, cell)| cell)
        .collect()
}

/// Emoji presence class of a single comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EmojiClass {
    /// Nothing but emoji glyphs or emoji tokens (the empty string included)
    EmojiOnly,
    /// Text with at least one emoji
    Mixed,
    /// No emoji at all
    #[default]
    TextOnly,
}

/// Per-comment affective norm lists, one entry per matched emoji occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormLists {
    pub clarity: Vec<f64>,
    pub arousal: Vec<f64>,
    pub valence: Vec<f64>,
    pub familiarity: Vec<f64>,
    pub complexity: Vec<f64>,
}

impl NormLists {
    /// Number of matched occurrences (all five lists share this length).
    pub fn len(&self) -> usize {
        self.valence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valence.is_empty()
    }

    /// The five lists in output column order.
    pub fn columns(&self) -> [&[f64]; 5] {
        [
            &self.clarity,
            &self.arousal,
            &self.valence,
            &self.familiarity,
            &self.complexity,
        ]
    }
}

/// Derived feature columns of one comment. Zeroed at join time and filled in
/// by the extraction stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentFeatures {
    pub plu_pro: usize,
    pub sin_pro: usize,
    pub word_count: usize,
    pub char_count: usize,
    pub allcaps_c: usize,
    pub emoji_count: usize,
    /// Sorted category labels, one per category match per occurrence
    pub emoji_categories: Vec<String>,
    pub norms: NormLists,
}

/// Names of the derived columns in output order.
pub const FEATURE_COLUMNS: [&str; 12] = [
    "plu_pro",
    "sin_pro",
    "word_count",
    "char_count",
    "allcaps_c",
    "emoji_count",
    "emoji_categories",
    "clarity_mean",
    "arousal_mean",
    "valence_mean",
    "familiarity_mean",
    "complexity_mean",
];

/// One row of the joined corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentRow {
    /// `<source directory name>_<source row id>`
    pub key: String,
    /// Cells aligned with [`JoinedCorpus::columns`]
    pub cells: Vec<String>,
    /// Comment text exactly as read
    pub raw_text: String,
    /// Lowercased text with emoji glyphs rewritten to `:name:` tokens
    pub normalized_text: String,
    pub class: EmojiClass,
    pub features: CommentFeatures,
}

impl CommentRow {
    /// Fresh row with empty normalized text and zeroed features.
    pub fn new(key: String, cells: Vec<String>, raw_text: String) -> Self {
        CommentRow {
            key,
            cells,
            raw_text,
            normalized_text: String::new(),
            class: EmojiClass::default(),
            features: CommentFeatures::default(),
        }
    }
}

/// All source tables concatenated in traversal order.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedCorpus {
    /// Name of the composite key column (always written first)
    pub key_column: String,
    /// Name of the comment text column
    pub text_column: String,
    /// Retained source columns, union over all sources in first-seen order
    pub columns: Vec<String>,
    pub rows: Vec<CommentRow>,
    /// Source tables that contributed, in traversal order
    pub sources: Vec<PathBuf>,
}

impl JoinedCorpus {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the text column among the retained columns, if it survived.
    pub fn text_column_index(&self) -> Option<usize> {
        self.columns.iter().position(|col| *col == self.text_column)
    }
}
