//! End-to-end enrichment: join, extract, resolve, write, summarize.

use super::categories::EmojiCategoryIndex;
use super::config::{delimiter_byte, Config};
use super::corpus::CorpusJoiner;
use super::data::{CommentRow, EmojiClass, JoinedCorpus};
use super::emoji::EmojiNormalizer;
use super::lexical::LexicalExtractor;
use super::norms::AffectiveNormTable;
use super::resolver::EmojiResolver;
use super::writer::write_enriched;
use crate::error::Result;
use rayon::prelude::*;
use std::fmt;
use std::path::Path;
use tracing::info;

/// Corpus-wide totals reported after a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub rows: usize,
    pub sources: usize,
    pub plu_pro: usize,
    pub sin_pro: usize,
    pub word_count: usize,
    pub char_count: usize,
    pub allcaps_c: usize,
    pub emoji_count: usize,
    pub emoji_only: usize,
    pub mixed: usize,
    pub text_only: usize,
    /// Emoji occurrences that matched no category
    pub category_misses: usize,
    /// Emoji occurrences that matched no norm entry
    pub norm_misses: usize,
}

/// Per-row lookup misses carried back from the per-comment stage.
#[derive(Debug, Clone, Copy, Default)]
struct RowMisses {
    category: usize,
    norm: usize,
}

impl Summary {
    fn record(&mut self, row: &CommentRow, misses: RowMisses) {
        let features = &row.features;
        self.rows += 1;
        self.plu_pro += features.plu_pro;
        self.sin_pro += features.sin_pro;
        self.word_count += features.word_count;
        self.char_count += features.char_count;
        self.allcaps_c += features.allcaps_c;
        self.emoji_count += features.emoji_count;
        match row.class {
            EmojiClass::EmojiOnly => self.emoji_only += 1,
            EmojiClass::Mixed => self.mixed += 1,
            EmojiClass::TextOnly => self.text_only += 1,
        }
        self.category_misses += misses.category;
        self.norm_misses += misses.norm;
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Comments: {} (from {} sources)", self.rows, self.sources)?;
        writeln!(f, "Sum plural pronouns: {}", self.plu_pro)?;
        writeln!(f, "Sum singular pronouns: {}", self.sin_pro)?;
        writeln!(f, "Sum word counts: {}", self.word_count)?;
        writeln!(f, "Sum character counts: {}", self.char_count)?;
        writeln!(f, "Sum all-caps words: {}", self.allcaps_c)?;
        writeln!(f, "Sum emoji count: {}", self.emoji_count)?;
        writeln!(
            f,
            "Emoji-only: {} | Mixed: {} | Text-only: {}",
            self.emoji_only, self.mixed, self.text_only
        )?;
        write!(
            f,
            "Unmatched emoji: {} without category, {} without norms",
            self.category_misses, self.norm_misses
        )
    }
}

/// Owns the reference tables and extractors for a run.
pub struct Pipeline {
    config: Config,
    categories: EmojiCategoryIndex,
    norms: AffectiveNormTable,
    lexical: LexicalExtractor,
    emoji: EmojiNormalizer,
}

impl Pipeline {
    /// Assemble a pipeline around already-loaded reference tables.
    pub fn new(config: Config, categories: EmojiCategoryIndex, norms: AffectiveNormTable) -> Self {
        Pipeline {
            config,
            categories,
            norms,
            lexical: LexicalExtractor::new(),
            emoji: EmojiNormalizer::new(),
        }
    }

    /// Load both reference tables named by the configuration.
    pub fn from_config(config: Config) -> Result<Self> {
        config.validate()?;
        let refs = &config.references;
        let categories = EmojiCategoryIndex::load(&refs.category_index)?;
        let norms =
            AffectiveNormTable::load(&refs.norm_table, &refs.norm_key_column, &refs.norm_columns)?;
        Ok(Self::new(config, categories, norms))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Join the corpus under `root`, enrich it and write it to `output`.
    ///
    /// Nothing is written unless joining succeeds.
    pub fn run(&self, root: &Path, output: &Path) -> Result<Summary> {
        let mut corpus = CorpusJoiner::new(&self.config.corpus).join(root)?;
        let summary = self.enrich(&mut corpus);
        write_enriched(
            &corpus,
            output,
            delimiter_byte(self.config.output.delimiter)?,
            self.config.output.normalized_text,
        )?;
        info!(output = %output.display(), rows = summary.rows, "wrote enriched table");
        Ok(summary)
    }

    /// Fill in every derived column of `corpus` and total them up.
    ///
    /// Rows are independent, so the parallel path yields the same table.
    pub fn enrich(&self, corpus: &mut JoinedCorpus) -> Summary {
        let misses: Vec<RowMisses> = if self.config.processing.parallel {
            corpus
                .rows
                .par_iter_mut()
                .map(|row| self.enrich_row(row))
                .collect()
        } else {
            corpus
                .rows
                .iter_mut()
                .map(|row| self.enrich_row(row))
                .collect()
        };

        let mut summary = Summary {
            sources: corpus.sources.len(),
            ..Summary::default()
        };
        for (row, row_misses) in corpus.rows.iter().zip(misses) {
            summary.record(row, row_misses);
        }
        info!(
            rows = summary.rows,
            emoji_only = summary.emoji_only,
            mixed = summary.mixed,
            text_only = summary.text_only,
            "enriched corpus"
        );
        summary
    }

    fn enrich_row(&self, row: &mut CommentRow) -> RowMisses {
        let lexical = self.lexical.extract(&row.raw_text);
        let normalized = self.emoji.normalize(&row.raw_text);
        let class = self.emoji.classify(&normalized);
        let tokens = self.emoji.tokens(&normalized);
        let resolution = EmojiResolver::new(&self.categories, &self.norms).resolve(&tokens);

        let features = &mut row.features;
        features.allcaps_c = lexical.allcaps_c;
        features.sin_pro = lexical.sin_pro;
        features.plu_pro = lexical.plu_pro;
        features.word_count = lexical.word_count;
        features.char_count = lexical.char_count;
        features.emoji_count = tokens.len();
        features.emoji_categories = resolution.categories;
        features.norms = resolution.norms;

        row.class = class;
        row.normalized_text = normalized;

        RowMisses {
            category: resolution.category_misses,
            norm: resolution.norm_misses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::norms::NormScores;

    fn pipeline(parallel: bool) -> Pipeline {
        let mut config = Config::default();
        config.processing.parallel = parallel;
        let categories = EmojiCategoryIndex::from_categories(vec![(
            "face-affection",
            vec![":smiling_face_with_heart_eyes:"],
        )]);
        let norms = AffectiveNormTable::from_entries(vec![(
            ":smiling_face_with_heart_eyes:",
            NormScores {
                clarity: 0.9,
                arousal: 0.7,
                valence: 0.8,
                familiarity: 0.95,
                complexity: 0.3,
            },
        )]);
        Pipeline::new(config, categories, norms)
    }

    fn corpus(texts: &[&str]) -> JoinedCorpus {
        JoinedCorpus {
            key_column: "concert_w_ID".to_string(),
            text_column: "message".to_string(),
            columns: vec!["message".to_string()],
            rows: texts
                .iter()
                .enumerate()
                .map(|(i, text)| {
                    CommentRow::new(format!("Show_{i}"), vec![text.to_string()], text.to_string())
                })
                .collect(),
            sources: vec![],
        }
    }

    #[test]
    fn test_heart_eyes_comment() {
        let mut corpus = corpus(&["we love it 😍"]);
        let summary = pipeline(false).enrich(&mut corpus);

        let row = &corpus.rows[0];
        assert_eq!(row.normalized_text, "we love it :smiling_face_with_heart_eyes:");
        assert_eq!(row.features.plu_pro, 1);
        assert_eq!(row.features.emoji_count, 1);
        assert_eq!(row.features.emoji_categories, vec!["face-affection"]);
        assert_eq!(row.features.norms.valence, vec![0.8]);
        assert_eq!(row.class, EmojiClass::Mixed);
        assert_eq!(summary.mixed, 1);
    }

    #[test]
    fn test_partition_and_bounds() {
        let texts = ["", "😍😍", "I LOVE this!!", "🚀 launch", ":red_heart: ok"];
        let mut corpus = corpus(&texts);
        let summary = pipeline(false).enrich(&mut corpus);

        assert_eq!(summary.rows, texts.len());
        assert_eq!(summary.emoji_only + summary.mixed + summary.text_only, summary.rows);
        assert_eq!(summary.emoji_only, 2);
        assert_eq!(summary.text_only, 1);
        assert_eq!(corpus.rows[0].features.emoji_count, 0);
        for row in &corpus.rows {
            assert!(row.features.norms.len() <= row.features.emoji_count);
        }
        // ":rocket:" and ":red_heart:" are in neither table.
        assert_eq!(summary.norm_misses, 2);
        assert_eq!(summary.category_misses, 2);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let texts: Vec<String> = (0..200)
            .map(|i| format!("WE {i} said HI 😍 to me {}", "🔥".repeat(i % 3)))
            .collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();

        let mut sequential = corpus(&refs);
        let mut parallel = corpus(&refs);
        let left = pipeline(false).enrich(&mut sequential);
        let right = pipeline(true).enrich(&mut parallel);

        assert_eq!(left, right);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_config_is_kept() {
        assert!(pipeline(true).config().processing.parallel);
        assert_eq!(pipeline(false).config().corpus.key_column, "concert_w_ID");
    }
}
