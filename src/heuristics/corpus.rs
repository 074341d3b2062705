//! Corpus joiner: merges every per-source comment table under a root
//! directory into one [`JoinedCorpus`].

use super::config::{delimiter_byte, CorpusConfig};
use super::data::{CommentRow, JoinedCorpus, Table};
use crate::error::{HeuristicsError, Result};
use indexmap::IndexSet;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Joins source tables found under a directory tree.
pub struct CorpusJoiner<'a> {
    config: &'a CorpusConfig,
}

impl<'a> CorpusJoiner<'a> {
    pub fn new(config: &'a CorpusConfig) -> Self {
        CorpusJoiner { config }
    }

    /// Locate every `file_name` table under `root`, in file-name order.
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut tables = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() && entry.file_name() == self.config.file_name.as_str()
            {
                tables.push(entry.path().to_path_buf());
            }
        }
        Ok(tables)
    }

    /// Read, key and concatenate all source tables under `root`.
    ///
    /// Each row is keyed `<directory name>_<id>`; the id column and the
    /// configured unwanted columns are dropped. Row order within a source is
    /// kept and sources follow traversal order.
    pub fn join(&self, root: &Path) -> Result<JoinedCorpus> {
        let tables = self.discover(root)?;
        if tables.is_empty() {
            return Err(HeuristicsError::EmptyCorpus {
                root: root.to_path_buf(),
                file_name: self.config.file_name.clone(),
            });
        }

        let delimiter = delimiter_byte(self.config.delimiter)?;
        let mut columns: IndexSet<String> = IndexSet::new();
        let mut rows: Vec<CommentRow> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (source_idx, path) in tables.iter().enumerate() {
            let table = Table::read(path, delimiter)?;
            let before = rows.len();
            self.append_source(path, table, &mut columns, &mut rows)?;

            for row in &rows[before..] {
                if let Some(&first) = seen.get(&row.key) {
                    return Err(HeuristicsError::DuplicateCompositeKey {
                        key: row.key.clone(),
                        first: tables[first].clone(),
                        second: path.clone(),
                    });
                }
                seen.insert(row.key.clone(), source_idx);
            }
            debug!(source = %path.display(), rows = rows.len() - before, "joined source table");
        }

        // Sources seen earlier lack columns introduced by later ones.
        for row in &mut rows {
            row.cells.resize(columns.len(), String::new());
        }

        info!(
            sources = tables.len(),
            rows = rows.len(),
            columns = columns.len(),
            "joined corpus"
        );

        Ok(JoinedCorpus {
            key_column: self.config.key_column.clone(),
            text_column: self.config.text_column.clone(),
            columns: columns.into_iter().collect(),
            rows,
            sources: tables,
        })
    }

    fn append_source(
        &self,
        path: &Path,
        table: Table,
        columns: &mut IndexSet<String>,
        rows: &mut Vec<CommentRow>,
    ) -> Result<()> {
        let id_idx = table
            .column(&self.config.id_column)
            .ok_or_else(|| HeuristicsError::MissingKeyColumn {
                path: path.to_path_buf(),
                column: self.config.id_column.clone(),
            })?;
        let text_idx = table
            .column(&self.config.text_column)
            .ok_or_else(|| HeuristicsError::MissingTextColumn {
                path: path.to_path_buf(),
                column: self.config.text_column.clone(),
            })?;
        if table.column(&self.config.key_column).is_some() {
            return Err(HeuristicsError::Config(format!(
                "source table '{}' already has a '{}' column",
                path.display(),
                self.config.key_column
            )));
        }

        let source_name = source_name(path);

        // Global column position for every retained source column.
        let mut mapping: Vec<Option<usize>> = Vec::with_capacity(table.headers.len());
        for (idx, header) in table.headers.iter().enumerate() {
            if idx == id_idx || self.config.drop_columns.contains(header) {
                mapping.push(None);
            } else {
                let (pos, _) = columns.insert_full(header.clone());
                mapping.push(Some(pos));
            }
        }

        for record in table.rows {
            let key = format!("{}_{}", source_name, cell(&record, id_idx));
            let raw_text = cell(&record, text_idx).to_string();
            let mut cells = vec![String::new(); columns.len()];
            for (value, target) in record.into_iter().zip(&mapping) {
                if let Some(pos) = target {
                    cells[*pos] = value;
                }
            }
            rows.push(CommentRow::new(key, cells, raw_text));
        }
        Ok(())
    }
}

/// Base name of the directory holding a source table.
fn source_name(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn cell(record: &[String], idx: usize) -> &str {
    record.get(idx).map(String::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_source(root: &Path, name: &str, body: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("comments.csv"), body).unwrap();
    }

    #[test]
    fn test_composite_keys_distinct_across_sources() {
        let root = tempfile::tempdir().unwrap();
        write_source(
            root.path(),
            "ConcertA",
            "comment_id,username,message\nct_1,ann,hello\n",
        );
        write_source(
            root.path(),
            "ConcertB",
            "comment_id,username,message\nct_1,bob,bye\n",
        );

        let config = CorpusConfig::default();
        let corpus = CorpusJoiner::new(&config).join(root.path()).unwrap();

        let keys: Vec<&str> = corpus.rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["ConcertA_ct_1", "ConcertB_ct_1"]);
        assert_eq!(corpus.columns, vec!["message"]);
        assert_eq!(corpus.rows[1].raw_text, "bye");
    }

    #[test]
    fn test_missing_id_column() {
        let root = tempfile::tempdir().unwrap();
        write_source(root.path(), "Broken", "id,message\n1,hi\n");

        let config = CorpusConfig::default();
        let err = CorpusJoiner::new(&config).join(root.path()).unwrap_err();
        match err {
            HeuristicsError::MissingKeyColumn { path, column } => {
                assert!(path.ends_with("Broken/comments.csv"));
                assert_eq!(column, "comment_id");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unreadable_source_names_its_path() {
        let root = tempfile::tempdir().unwrap();
        write_source(root.path(), "ConcertOk", "comment_id,message\n1,fine\n");
        write_source(
            root.path(),
            "ConcertRagged",
            "comment_id,message\n1,ok\n2,too,many,fields\n",
        );

        let config = CorpusConfig::default();
        let err = CorpusJoiner::new(&config).join(root.path()).unwrap_err();
        match &err {
            HeuristicsError::TableRead { path, .. } => {
                assert!(path.ends_with("ConcertRagged/comments.csv"))
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("ConcertRagged"));
    }

    #[test]
    fn test_invalid_utf8_names_its_path() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("ConcertBytes");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("comments.csv"), b"comment_id,message\n1,caf\xe9\n").unwrap();

        let config = CorpusConfig::default();
        let err = CorpusJoiner::new(&config).join(root.path()).unwrap_err();
        assert!(matches!(err, HeuristicsError::TableRead { .. }));
        assert!(err.to_string().contains("ConcertBytes"));
    }

    #[test]
    fn test_duplicate_key_is_fatal() {
        let root = tempfile::tempdir().unwrap();
        write_source(
            root.path(),
            "Gig",
            "comment_id,message\n7,first\n7,second\n",
        );

        let config = CorpusConfig::default();
        let err = CorpusJoiner::new(&config).join(root.path()).unwrap_err();
        assert!(matches!(
            err,
            HeuristicsError::DuplicateCompositeKey { ref key, .. } if key == "Gig_7"
        ));
    }

    #[test]
    fn test_column_union_pads_earlier_sources() {
        let root = tempfile::tempdir().unwrap();
        write_source(root.path(), "A", "comment_id,message\n1,x\n");
        write_source(root.path(), "B", "comment_id,likes,message\n1,4,y\n");

        let config = CorpusConfig::default();
        let corpus = CorpusJoiner::new(&config).join(root.path()).unwrap();

        assert_eq!(corpus.columns, vec!["message", "likes"]);
        assert_eq!(corpus.rows[0].cells, vec!["x", ""]);
        assert_eq!(corpus.rows[1].cells, vec!["y", "4"]);
    }

    #[test]
    fn test_nested_sources_and_empty_root() {
        let root = tempfile::tempdir().unwrap();
        let config = CorpusConfig::default();
        assert!(matches!(
            CorpusJoiner::new(&config).join(root.path()),
            Err(HeuristicsError::EmptyCorpus { .. })
        ));

        write_source(&root.path().join("live"), "Show", "comment_id,message\n3,z\n");
        let corpus = CorpusJoiner::new(&config).join(root.path()).unwrap();
        assert_eq!(corpus.rows[0].key, "Show_3");
    }
}
