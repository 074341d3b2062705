//! Emoji category index: category label → member emoji tokens.
//!
//! The index is built either from the official nested emoji listing (JSON) or
//! from the ragged CSV it is usually flattened into (`label,token,token,...`).
//! Lookups are case-insensitive substring matches against member tokens,
//! because the listing's tokens are free-form and do not always agree with the
//! normalizer's canonical names.

use crate::error::{HeuristicsError, Result};
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct EmojiCategoryIndex {
    categories: IndexMap<String, IndexSet<String>>,
    /// Lowercased members, aligned with `categories`
    folded: Vec<Vec<String>>,
}

impl EmojiCategoryIndex {
    /// Build from `(label, tokens)` pairs. A repeated label merges its tokens.
    pub fn from_categories<I, L, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (L, T)>,
        L: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        let mut categories: IndexMap<String, IndexSet<String>> = IndexMap::new();
        for (label, tokens) in entries {
            categories
                .entry(label.into())
                .or_default()
                .extend(tokens.into_iter().map(Into::into));
        }
        let folded = categories
            .values()
            .map(|members| members.iter().map(|m| m.to_lowercase()).collect())
            .collect();
        EmojiCategoryIndex { categories, folded }
    }

    /// Load from `path`: a `.json` nested listing or a ragged CSV.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let index = if is_json {
            Self::load_nested_list(path)?
        } else {
            Self::load_ragged_csv(path)?
        };
        if index.is_empty() {
            return Err(reference_error(path, "no categories found"));
        }
        info!(
            path = %path.display(),
            categories = index.len(),
            tokens = index.token_count(),
            "loaded emoji category index"
        );
        Ok(index)
    }

    /// Read the nested JSON listing from disk.
    pub fn load_nested_list(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|err| reference_error(path, err))?;
        let value: Value =
            serde_json::from_reader(file).map_err(|err| reference_error(path, err))?;
        Self::from_nested_list(&value).map_err(|reason| reference_error(path, reason))
    }

    /// Build from the nested listing.
    ///
    /// A one-element row whose label does not start with an uppercase letter
    /// opens a category (uppercase single rows are top-level groups and are
    /// skipped). While a category is open, each row with more than three
    /// fields registers its fourth field as `:name:` with spaces, tabs,
    /// hyphens and commas replaced by underscores.
    pub fn from_nested_list(value: &Value) -> std::result::Result<Self, String> {
        let rows = value
            .as_array()
            .ok_or_else(|| "top level is not a list".to_string())?;

        let mut entries: Vec<(String, Vec<String>)> = Vec::new();
        for (idx, row) in rows.iter().enumerate() {
            let Some(fields) = row.as_array() else {
                continue;
            };
            if fields.len() == 1 {
                let label = fields[0]
                    .as_str()
                    .ok_or_else(|| format!("row {idx}: category label is not a string"))?;
                let first = label
                    .chars()
                    .next()
                    .ok_or_else(|| format!("row {idx}: empty category label"))?;
                if !first.is_uppercase() {
                    entries.push((label.to_string(), Vec::new()));
                }
            } else if fields.len() > 3 {
                if let Some((_, tokens)) = entries.last_mut() {
                    let name = fields[3]
                        .as_str()
                        .ok_or_else(|| format!("row {idx}: emoji name is not a string"))?;
                    tokens.push(listing_token(name));
                }
            }
        }
        Ok(Self::from_categories(entries))
    }

    /// Read the ragged CSV form; blank lines are skipped.
    pub fn load_ragged_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|err| reference_error(path, err))?;

        let mut entries: Vec<(String, Vec<String>)> = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|err| reference_error(path, err))?;
            let mut fields = record.iter().map(str::trim);
            let Some(label) = fields.next().filter(|label| !label.is_empty()) else {
                continue;
            };
            let tokens = fields
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect();
            entries.push((label.to_string(), tokens));
        }
        Ok(Self::from_categories(entries))
    }

    /// Persist in the ragged CSV form.
    pub fn write_ragged_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(path)?;
        for (label, members) in &self.categories {
            let mut record = Vec::with_capacity(members.len() + 1);
            record.push(label.as_str());
            record.extend(members.iter().map(String::as_str));
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Persist the category labels as one comma-terminated line.
    pub fn write_labels(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        for label in self.categories.keys() {
            write!(file, "{label},")?;
        }
        Ok(())
    }

    /// Every category whose member tokens contain `token`, ignoring case.
    ///
    /// A category contributes its label at most once per call.
    pub fn lookup(&self, token: &str) -> Vec<&str> {
        let needle = token.to_lowercase();
        self.categories
            .keys()
            .zip(&self.folded)
            .filter(|(_, members)| members.iter().any(|member| member.contains(&needle)))
            .map(|(label, _)| label.as_str())
            .collect()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn members(&self, label: &str) -> Option<&IndexSet<String>> {
        self.categories.get(label)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn token_count(&self) -> usize {
        self.categories.values().map(IndexSet::len).sum()
    }
}

/// `:name:` with whitespace, hyphens and commas turned into underscores.
fn listing_token(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|ch| match ch {
            ' ' | '\t' | '-' | ',' => '_',
            other => other,
        })
        .collect();
    format!(":{cleaned}:")
}

fn reference_error(path: &Path, reason: impl ToString) -> HeuristicsError {
    HeuristicsError::ReferenceLoad {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing() -> Value {
        json!([
            ["Smileys & Emotion"],
            ["face-smiling"],
            ["😀", "U+1F600", "1", "grinning face"],
            ["😂", "U+1F602", "3", "face with tears of joy"],
            ["face-affection"],
            ["😍", "U+1F60D", "9", "smiling face with heart-eyes"],
            ["short", "row"],
            "not a row",
            ["People & Body"],
            ["hand-fingers-open"],
            ["👋", "U+1F44B", "120", "waving hand"]
        ])
    }

    #[test]
    fn test_nested_list_boundaries() {
        let index = EmojiCategoryIndex::from_nested_list(&listing()).unwrap();

        let labels: Vec<&str> = index.labels().collect();
        assert_eq!(
            labels,
            vec!["face-smiling", "face-affection", "hand-fingers-open"]
        );
        let members: Vec<&String> = index.members("face-affection").unwrap().iter().collect();
        assert_eq!(members, vec![":smiling_face_with_heart_eyes:"]);
        assert_eq!(index.token_count(), 4);
    }

    #[test]
    fn test_rows_before_first_category_ignored() {
        let value = json!([["😀", "U+1F600", "1", "grinning face"], ["misc"]]);
        let index = EmojiCategoryIndex::from_nested_list(&value).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.token_count(), 0);
    }

    #[test]
    fn test_malformed_listing() {
        assert!(EmojiCategoryIndex::from_nested_list(&json!({"a": 1})).is_err());
        assert!(EmojiCategoryIndex::from_nested_list(&json!([[""]])).is_err());
        assert!(EmojiCategoryIndex::from_nested_list(&json!([["x"], [1, 2, 3, 4]])).is_err());
    }

    #[test]
    fn test_lookup_is_substring_and_case_insensitive() {
        let index = EmojiCategoryIndex::from_categories(vec![
            ("heart", vec![":Red_Heart:", ":broken_heart:"]),
            ("face-affection", vec![":smiling_face_with_hearts:"]),
            ("hand", vec![":waving_hand:"]),
        ]);

        assert_eq!(index.lookup(":red_heart:"), vec!["heart"]);
        // ":smiling_face_with_heart" is a prefix of the listed token.
        assert_eq!(index.lookup(":smiling_face_with_heart"), vec!["face-affection"]);
        assert_eq!(index.lookup("heart"), vec!["heart", "face-affection"]);
        assert!(index.lookup(":rocket:").is_empty());
    }

    #[test]
    fn test_ragged_csv_roundtrip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("all-emoji.json");
        std::fs::write(&json_path, listing().to_string()).unwrap();

        let index = EmojiCategoryIndex::load(&json_path).unwrap();
        let csv_path = dir.path().join("emojis.csv");
        index.write_ragged_csv(&csv_path).unwrap();
        let labels_path = dir.path().join("emoji_categories.csv");
        index.write_labels(&labels_path).unwrap();

        let text = std::fs::read_to_string(&csv_path).unwrap();
        assert!(text.starts_with("face-smiling,:grinning_face:,:face_with_tears_of_joy:\n"));
        assert_eq!(
            std::fs::read_to_string(&labels_path).unwrap(),
            "face-smiling,face-affection,hand-fingers-open,"
        );

        let reloaded = EmojiCategoryIndex::load(&csv_path).unwrap();
        assert_eq!(reloaded.lookup(":waving_hand:"), vec!["hand-fingers-open"]);
    }

    #[test]
    fn test_missing_file_is_reference_error() {
        let err = EmojiCategoryIndex::load("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, HeuristicsError::ReferenceLoad { .. }));
    }
}
