//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tokensmith::batch::{DEFAULT_LINE_WIDTH, DEFAULT_MAX_REPORTED_ERRORS};
use tokensmith::BatchOptions;

#[derive(Parser, Debug)]
#[command(name = "tokensmith", author, version, about = "Apply design-token documents to a variable store")]
pub struct Cli {
    /// Store snapshot to read and update; a missing file starts an empty store
    #[arg(long, global = true, value_name = "PATH", default_value = "tokensmith-store.json")]
    pub store: PathBuf,

    /// How results are printed
    #[arg(long, global = true, value_enum, default_value_t = OutputMode::Text)]
    pub output: OutputMode,

    /// Raise log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Number of error messages listed in the summary
    #[arg(long, global = true, value_name = "N", default_value_t = DEFAULT_MAX_REPORTED_ERRORS)]
    pub max_errors: usize,

    /// Run the batch but leave the snapshot untouched
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions::new()
            .max_reported_errors(self.max_errors)
            .line_width(DEFAULT_LINE_WIDTH)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or update every collection in a document
    Apply {
        /// Collections document (.json, .yaml or .yml)
        document: PathBuf,
    },
    /// Add a mode to an existing collection from a flat name/value map
    AddMode {
        /// Flat map document (.json, .yaml or .yml)
        document: PathBuf,
        /// Target collection, by id or name
        #[arg(long, value_name = "NAME|ID")]
        collection: String,
        /// Name of the mode to create
        #[arg(long)]
        mode: String,
    },
    /// List the collections in the store
    Collections,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Text,
    Json,
}
