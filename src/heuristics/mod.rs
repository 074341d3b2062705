//! Comment Heuristics Pipeline
//!
//! This module turns a directory of per-video comment tables into one enriched
//! table for annotation and classification. The stages run in order:
//!
//! 1. **Join** - every `comments.csv` under a root is read, keyed as
//!    `<directory>_<comment_id>` and concatenated ([`corpus`])
//! 2. **Lexical counts** - all-caps words, first-person pronouns, words and
//!    characters ([`lexical`])
//! 3. **Emoji normalization** - glyphs become `:name:` tokens; each comment is
//!    classified emoji-only, mixed or text-only ([`emoji`])
//! 4. **Resolution** - tokens are looked up in the emoji category index and
//!    the affective norm table ([`categories`], [`norms`], [`resolver`])
//! 5. **Output** - the enriched table plus corpus totals ([`pipeline`], [`writer`])
//!
//! ## Usage
//!
//! ```bash
//! ./target/release/comment-heuristics enrich comments_live heuristics/heuristics_live.csv
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use comment_heuristics::heuristics::config::Config;
//! use comment_heuristics::heuristics::pipeline::Pipeline;
//! use std::path::Path;
//!
//! let pipeline = Pipeline::from_config(Config::default())?;
//! let summary = pipeline.run(Path::new("comments_live"), Path::new("out.csv"))?;
//! println!("{summary}");
//! # Ok::<(), comment_heuristics::HeuristicsError>(())
//! ```
//!
//! ## Configuration
//!
//! ```toml
//! [corpus]
//! file_name = "comments.csv"
//! id_column = "comment_id"
//! text_column = "message"
//! key_column = "concert_w_ID"
//! drop_columns = ["username", "comment_date", "time_delta_since_upload"]
//!
//! [references]
//! category_index = "heuristics/emojis/emojis.csv"
//! norm_table = "heuristics/emojis/crawled_data.csv"
//!
//! [processing]
//! parallel = false
//! ```
//!
//! ## Module Structure
//!
//! - [`config`] - Configuration structures and loading
//! - [`data`] - Tables, rows and derived feature columns
//! - [`corpus`] - Source discovery and joining
//! - [`lexical`] - Lexical counts
//! - [`emoji`] - Emoji normalization and classification
//! - [`categories`] - Emoji category index
//! - [`norms`] - Affective norm table
//! - [`resolver`] - Per-comment reference lookups
//! - [`pipeline`] - Stage orchestration and summary
//! - [`writer`] - Enriched table output
//! - [`preprocess`] - Annotation preprocessing filters
//! - `cli` - Command-line interface (feature `cli`)

pub mod categories;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod corpus;
pub mod data;
pub mod emoji;
pub mod lexical;
pub mod norms;
pub mod pipeline;
pub mod preprocess;
pub mod resolver;
pub mod writer;

// Re-export commonly used items for external use
#[cfg(feature = "cli")]
pub use cli::main_heuristics;
pub use pipeline::{Pipeline, Summary};
