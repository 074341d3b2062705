//! Resolves a comment's emoji tokens against both reference tables.

use super::categories::EmojiCategoryIndex;
use super::data::NormLists;
use super::norms::AffectiveNormTable;
use tracing::debug;

/// Categories and norms of one comment, plus how many occurrences missed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Sorted labels across all occurrences
    pub categories: Vec<String>,
    pub norms: NormLists,
    /// Occurrences that matched no category
    pub category_misses: usize,
    /// Occurrences with no norm entry
    pub norm_misses: usize,
}

/// Borrowing view over the two read-only reference tables.
pub struct EmojiResolver<'a> {
    categories: &'a EmojiCategoryIndex,
    norms: &'a AffectiveNormTable,
}

impl<'a> EmojiResolver<'a> {
    pub fn new(categories: &'a EmojiCategoryIndex, norms: &'a AffectiveNormTable) -> Self {
        EmojiResolver { categories, norms }
    }

    /// Look up every token occurrence, in order.
    ///
    /// Category matching is a case-insensitive substring test over each
    /// category's tokens; norm matching is exact. A miss on either side only
    /// leaves that occurrence out of the respective lists.
    pub fn resolve(&self, tokens: &[&str]) -> Resolution {
        let mut resolution = Resolution::default();

        for token in tokens {
            let labels = self.categories.lookup(token);
            if labels.is_empty() {
                resolution.category_misses += 1;
            }
            resolution
                .categories
                .extend(labels.into_iter().map(str::to_string));

            match self.norms.lookup(token) {
                Some(scores) => {
                    let norms = &mut resolution.norms;
                    norms.clarity.push(scores.clarity);
                    norms.arousal.push(scores.arousal);
                    norms.valence.push(scores.valence);
                    norms.familiarity.push(scores.familiarity);
                    norms.complexity.push(scores.complexity);
                }
                None => {
                    debug!(token, "no norm entry");
                    resolution.norm_misses += 1;
                }
            }
        }

        resolution.categories.sort();
        resolution
    }
}
