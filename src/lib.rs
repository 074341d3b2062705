//! # Comment Heuristics - Emoji & Lexical Features for Comment Corpora
//!
//! Batch enrichment of short social-media comments (live-stream and video
//! comments) with derived linguistic and affective features, ready for
//! annotation and classifier training.
//!
//! ## Features
//!
//! - **Corpus joining**: one table from many per-video `comments.csv` files,
//!   keyed `<video>_<comment_id>`
//! - **Lexical counts**: all-caps words, singular and plural first-person
//!   pronouns, word and character counts
//! - **Emoji normalization**: glyphs rewritten to `:name:` tokens; comments
//!   classified as emoji-only, mixed or text-only
//! - **Emoji categories**: labels from the official emoji sub-category listing
//! - **Affective norms**: clarity, arousal, valence, familiarity and
//!   complexity ratings from the face-emoji norming study
//!
//! ## Quick Start
//!
//! ```no_run
//! use comment_heuristics::heuristics::config::Config;
//! use comment_heuristics::Pipeline;
//! use std::path::Path;
//!
//! fn main() -> Result<(), comment_heuristics::HeuristicsError> {
//!     let config = Config::load("config.toml")?;
//!     let pipeline = Pipeline::from_config(config)?;
//!
//!     let summary = pipeline.run(Path::new("comments_live"), Path::new("heuristics_live.csv"))?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```
//!
//! ### Single Comments
//!
//! ```
//! use comment_heuristics::heuristics::emoji::EmojiNormalizer;
//! use comment_heuristics::heuristics::lexical::LexicalExtractor;
//!
//! let lexical = LexicalExtractor::new().extract("I LOVE this!!");
//! assert_eq!(lexical.allcaps_c, 1);
//! assert_eq!(lexical.char_count, 13);
//!
//! let emoji = EmojiNormalizer::new();
//! let text = emoji.normalize("we love it 😍");
//! assert_eq!(text, "we love it :smiling_face_with_heart_eyes:");
//! assert_eq!(emoji.count_tokens(&text), 1);
//! ```
//!
//! ## Available Cargo Features
//!
//! | Feature | Description | Default |
//! |---------|-------------|---------|
//! | `cli` | Include the `comment-heuristics` binary | ✓ |
//!
//! ## Logging
//!
//! The library logs through `tracing`; the binary prints log events when
//! `RUST_LOG` is set (e.g. `RUST_LOG=comment_heuristics=debug`).
//!
//! ## License
//!
//! GNU General Public License v3.0 (GPLv3)

pub mod error;
pub mod heuristics;

pub use error::{HeuristicsError, Result};
pub use heuristics::categories::EmojiCategoryIndex;
pub use heuristics::config::Config;
pub use heuristics::data::{CommentFeatures, EmojiClass, JoinedCorpus, Table};
pub use heuristics::norms::{AffectiveNormTable, NormScores};
pub use heuristics::{Pipeline, Summary};
