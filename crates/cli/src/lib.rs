mod grep;
mod locate;
mod scan;
mod suggest;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "codescout",
    version,
    about = "Project indexing and parallel search engine",
    long_about = "Codescout scans a project tree into a flat index honoring per-directory \
                  ignore rules, answers substring and fuzzy locate queries over it, and runs \
                  whole-project text searches fanned out across a worker pool."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a project directory and report what was indexed
    Scan {
        /// Path to the project root directory
        #[arg(value_name = "PROJECT_PATH")]
        path: PathBuf,
    },
    /// Locate files by name using fuzzy or substring matching
    Locate {
        /// Path to the project root directory
        #[arg(value_name = "PROJECT_PATH")]
        path: PathBuf,
        /// The (partial) file name to look for
        query: String,
        /// Maximum number of results
        #[arg(long, default_value_t = 12)]
        max: usize,
        /// Plain case-insensitive substring matching instead of fuzzy ranking
        #[arg(long)]
        substring: bool,
        /// Emit results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search every indexed file for a string
    Grep {
        /// Path to the project root directory
        #[arg(value_name = "PROJECT_PATH")]
        path: PathBuf,
        /// The text to search for
        query: String,
        /// Match case exactly
        #[arg(long)]
        case_sensitive: bool,
        /// Only match whole words
        #[arg(long)]
        word: bool,
        /// Emit results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show completion suggestions at a position in a file
    Suggest {
        /// File to complete in
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// 0-based line of the cursor
        line: usize,
        /// 0-based column of the cursor
        column: usize,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = codescout_core::logging::init_logging("cli", false);

    match cli.command {
        Commands::Scan { path } => scan::run(path),
        Commands::Locate {
            path,
            query,
            max,
            substring,
            json,
        } => locate::run(path, query, max, substring, json),
        Commands::Grep {
            path,
            query,
            case_sensitive,
            word,
            json,
        } => grep::run(path, query, case_sensitive, word, json),
        Commands::Suggest { file, line, column } => suggest::run(file, line, column),
    }
}
