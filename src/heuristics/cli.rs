//! Command-line interface for the comment heuristics pipeline.

use super::categories::EmojiCategoryIndex;
use super::config::{delimiter_byte, Config};
use super::data::Table;
use super::emoji::EmojiNormalizer;
use super::pipeline::Pipeline;
use super::preprocess::{
    drop_author_comments, drop_non_english, filtered_out, PREPROCESS_DROP_COLUMNS,
};
use crate::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "comment-heuristics",
    disable_help_subcommand = true,
    about = "Lexical and emoji-affect features for comment corpora"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "TOML configuration file (defaults apply when omitted)"
    )]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Join every source table under ROOT and write the enriched table
    Enrich {
        root: PathBuf,
        output: PathBuf,
        #[arg(long, value_name = "PATH", help = "Emoji category index (CSV or JSON)")]
        categories: Option<PathBuf>,
        #[arg(long, value_name = "PATH", help = "Affective norm table (CSV)")]
        norms: Option<PathBuf>,
        #[arg(long, help = "Process comments on all cores")]
        parallel: bool,
    },
    /// Filter one comment table for annotation
    Preprocess {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, help = "Channel name whose comments are removed")]
        author: Option<String>,
        #[arg(long = "author-column", default_value = "username")]
        author_column: String,
        #[arg(long = "keep-non-english", help = "Skip the non-English filter")]
        keep_non_english: bool,
    },
    /// Flatten the nested emoji listing into the category CSV
    BuildCategories {
        listing: PathBuf,
        output: PathBuf,
        #[arg(long, value_name = "PATH", help = "Also write the label list here")]
        labels: Option<PathBuf>,
    },
    /// Write the rows preprocessing removed from ORIGINAL
    FilteredOut {
        original: PathBuf,
        filtered: PathBuf,
        output: PathBuf,
    },
}

/// Main entry point for the CLI.
///
/// # Arguments
///
/// * `args` - Command-line arguments (including program name)
pub fn main_heuristics<I>(args: I) -> Result<()>
where
    I: IntoIterator<Item = String>,
{
    // Help, version and usage errors are printed by clap, which then exits.
    let cli = Cli::parse_from(args);

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Command::Enrich {
            root,
            output,
            categories,
            norms,
            parallel,
        } => {
            if let Some(path) = categories {
                config.references.category_index = path;
            }
            if let Some(path) = norms {
                config.references.norm_table = path;
            }
            config.processing.parallel |= parallel;

            let pipeline = Pipeline::from_config(config)?;
            let summary = pipeline.run(&root, &output)?;

            println!("\n===================================================================");
            println!("  Enriched table: {}", output.display());
            println!("===================================================================\n");
            println!("{summary}\n");
            Ok(())
        }
        Command::Preprocess {
            input,
            output,
            author,
            author_column,
            keep_non_english,
        } => {
            let delimiter = delimiter_byte(config.corpus.delimiter)?;
            let mut table = Table::read(&input, delimiter)?;
            let before = table.len();

            let drop: Vec<String> = PREPROCESS_DROP_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect();
            table.drop_columns(&drop);
            if let Some(author) = author {
                drop_author_comments(&mut table, &author_column, &author)?;
            }
            if !keep_non_english {
                let emoji = EmojiNormalizer::new();
                drop_non_english(&mut table, &config.corpus.text_column, &emoji)?;
            }
            table.write(&output, delimiter)?;

            println!("Kept {} of {} comments -> {}", table.len(), before, output.display());
            Ok(())
        }
        Command::BuildCategories {
            listing,
            output,
            labels,
        } => {
            let index = EmojiCategoryIndex::load_nested_list(&listing)?;
            index.write_ragged_csv(&output)?;
            if let Some(path) = labels {
                index.write_labels(&path)?;
            }
            println!(
                "Wrote {} categories ({} emoji) -> {}",
                index.len(),
                index.token_count(),
                output.display()
            );
            Ok(())
        }
        Command::FilteredOut {
            original,
            filtered,
            output,
        } => {
            let delimiter = delimiter_byte(config.corpus.delimiter)?;
            let original = Table::read(&original, delimiter)?;
            let filtered = Table::read(&filtered, delimiter)?;
            let removed = filtered_out(&original, &filtered);
            removed.write(&output, delimiter)?;

            println!("{} rows were filtered out -> {}", removed.len(), output.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_enrich() {
        let cli = Cli::try_parse_from([
            "comment-heuristics",
            "enrich",
            "comments_live",
            "out.csv",
            "--parallel",
            "--config",
            "config.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("config.toml")));
        match cli.command {
            Command::Enrich { root, parallel, categories, .. } => {
                assert_eq!(root, PathBuf::from("comments_live"));
                assert!(parallel);
                assert!(categories.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
