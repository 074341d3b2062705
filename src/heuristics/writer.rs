//! Enriched table output.
//!
//! List-valued columns are written as literal list text (`['heart', 'love']`,
//! `[0.8, 1.0]`), the form downstream annotation tooling parses back.

use super::data::{JoinedCorpus, FEATURE_COLUMNS};
use crate::error::{HeuristicsError, Result};
use std::path::Path;

/// Write the corpus: key column, retained columns, then the derived columns.
///
/// With `normalized_text` set, the text column carries the normalized text.
pub fn write_enriched(
    corpus: &JoinedCorpus,
    path: &Path,
    delimiter: u8,
    normalized_text: bool,
) -> Result<()> {
    write_rows(corpus, path, delimiter, normalized_text).map_err(|source| {
        HeuristicsError::TableWrite {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn write_rows(
    corpus: &JoinedCorpus,
    path: &Path,
    delimiter: u8,
    normalized_text: bool,
) -> csv::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;

    let mut header: Vec<&str> = Vec::with_capacity(1 + corpus.columns.len() + FEATURE_COLUMNS.len());
    header.push(&corpus.key_column);
    header.extend(corpus.columns.iter().map(String::as_str));
    header.extend(FEATURE_COLUMNS);
    writer.write_record(&header)?;

    let text_idx = corpus.text_column_index();
    for row in &corpus.rows {
        let features = &row.features;
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        record.push(row.key.clone());
        for (idx, cell) in row.cells.iter().enumerate() {
            if normalized_text && Some(idx) == text_idx {
                record.push(row.normalized_text.clone());
            } else {
                record.push(cell.clone());
            }
        }
        record.push(features.plu_pro.to_string());
        record.push(features.sin_pro.to_string());
        record.push(features.word_count.to_string());
        record.push(features.char_count.to_string());
        record.push(features.allcaps_c.to_string());
        record.push(features.emoji_count.to_string());
        record.push(format_str_list(&features.emoji_categories));
        for values in features.norms.columns() {
            record.push(format_float_list(values));
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// `['a', 'b']`, quoting each item the way a list literal would.
pub fn format_str_list(items: &[String]) -> String {
    let parts: Vec<String> = items.iter().map(|item| quote(item)).collect();
    format!("[{}]", parts.join(", "))
}

/// `[0.8, 1.0]`; whole numbers keep one decimal place.
pub fn format_float_list(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|&value| format_float(value)).collect();
    format!("[{}]", parts.join(", "))
}

fn format_float(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{sign}inf")
    } else if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn quote(item: &str) -> String {
    // Single quotes unless the item itself holds one and no double quote.
    let delim = if item.contains('\'') && !item.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(item.len() + 2);
    out.push(delim);
    for ch in item.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}
