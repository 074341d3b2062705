//! Preprocessing filters applied to a single source table before annotation.
//!
//! Each filter collects the indices to remove in a read-only pass and then
//! removes them in one batch.

use super::data::Table;
use super::emoji::EmojiNormalizer;
use crate::error::{HeuristicsError, Result};
use std::collections::{BTreeSet, HashSet};
use tracing::info;

/// Columns the annotation copy does not need.
pub const PREPROCESS_DROP_COLUMNS: [&str; 2] = ["comment_date", "time_delta_since_upload"];

/// Remove comments posted by the channel that hosts the video.
///
/// Returns the number of rows removed.
pub fn drop_author_comments(table: &mut Table, author_column: &str, author: &str) -> Result<usize> {
    let idx = require_column(table, author_column)?;
    let author = author.trim();

    let indices: BTreeSet<usize> = table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.get(idx).map(|cell| cell.trim() == author).unwrap_or(false))
        .map(|(i, _)| i)
        .collect();

    table.remove_rows(&indices);
    info!(author, removed = indices.len(), "dropped author comments");
    Ok(indices.len())
}

/// Remove comments that are likely not English.
///
/// Emoji-only comments are kept. Otherwise emoji are stripped and the row is
/// removed if anything non-ASCII remains.
pub fn drop_non_english(
    table: &mut Table,
    text_column: &str,
    emoji: &EmojiNormalizer,
) -> Result<usize> {
    let idx = require_column(table, text_column)?;

    let indices: BTreeSet<usize> = table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            let comment = row.get(idx).map(|cell| cell.trim()).unwrap_or("");
            !keep_as_english(comment, emoji)
        })
        .map(|(i, _)| i)
        .collect();

    table.remove_rows(&indices);
    info!(removed = indices.len(), "dropped non-English comments");
    Ok(indices.len())
}

fn keep_as_english(comment: &str, emoji: &EmojiNormalizer) -> bool {
    if is_emoji_only(comment, emoji) {
        return true;
    }
    if emoji.contains_emoji(comment) {
        emoji.strip_emoji(comment).is_ascii()
    } else {
        comment.is_ascii()
    }
}

/// Raw (not yet normalized) comment made up of emoji glyphs only.
fn is_emoji_only(comment: &str, emoji: &EmojiNormalizer) -> bool {
    !comment.is_empty()
        && comment
            .chars()
            .all(|ch| ch == '\u{FE0F}' || ch == '\u{200D}' || emoji.is_emoji_char(ch))
}

/// Rows of `original` whose first-column identifier is missing from `filtered`.
pub fn filtered_out(original: &Table, filtered: &Table) -> Table {
    let kept: HashSet<&str> = filtered
        .rows
        .iter()
        .filter_map(|row| row.first().map(String::as_str))
        .collect();

    Table {
        headers: original.headers.clone(),
        rows: original
            .rows
            .iter()
            .filter(|row| {
                row.first()
                    .map(|id| !kept.contains(id.as_str()))
                    .unwrap_or(false)
            })
            .cloned()
            .collect(),
    }
}

fn require_column(table: &Table, column: &str) -> Result<usize> {
    table
        .column(column)
        .ok_or_else(|| HeuristicsError::Config(format!("table has no '{column}' column")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, &str, &str)]) -> Table {
        Table {
            headers: vec!["comment_id".into(), "username".into(), "message".into()],
            rows: rows
                .iter()
                .map(|(id, user, msg)| vec![id.to_string(), user.to_string(), msg.to_string()])
                .collect(),
        }
    }

    #[test]
    fn test_drop_author_comments() {
        let mut t = table(&[
            ("1", " Arte Concert ", "welcome!"),
            ("2", "fan", "great"),
            ("3", "Arte Concert", "thanks all"),
        ]);
        let removed = drop_author_comments(&mut t, "username", "Arte Concert").unwrap();

        assert_eq!(removed, 2);
        assert_eq!(t.rows, vec![vec!["2", "fan", "great"]]);
    }

    #[test]
    fn test_drop_non_english() {
        let emoji = EmojiNormalizer::new();
        let mut t = table(&[
            ("1", "a", "😍😍"),
            ("2", "b", "amazing 👏"),
            ("3", "c", "magnifique, très beau"),
            ("4", "d", "génial 🔥"),
            ("5", "e", "plain ascii"),
        ]);
        let removed = drop_non_english(&mut t, "message", &emoji).unwrap();

        assert_eq!(removed, 2);
        let ids: Vec<&str> = t.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "5"]);
    }

    #[test]
    fn test_missing_filter_column() {
        let mut t = table(&[("1", "a", "x")]);
        assert!(drop_author_comments(&mut t, "author", "x").is_err());
    }

    #[test]
    fn test_filtered_out() {
        let original = table(&[("1", "a", "x"), ("2", "b", "y"), ("3", "c", "z")]);
        let filtered = table(&[("1", "a", "x"), ("3", "c", "z")]);

        let removed = filtered_out(&original, &filtered);
        assert_eq!(removed.headers, original.headers);
        assert_eq!(removed.rows, vec![vec!["2", "b", "y"]]);
    }
}
