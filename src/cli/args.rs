//! Command line argument parsing for the Magpie CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::SearchConfig;
use crate::search::SearchScope;

/// Magpie - full-text search over a folder of notes
#[derive(Parser, Debug, Clone)]
#[command(name = "magpie")]
#[command(about = "Full-text search over a folder of plain-text notes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct MagpieArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl MagpieArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search a vault
    Search(SearchArgs),

    /// Show index statistics for a vault
    Stats(StatsArgs),
}

/// Arguments for searching a vault
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Path to the vault directory
    #[arg(value_name = "VAULT_PATH")]
    pub vault_path: PathBuf,

    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Maximum number of results to return
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Restrict the search to one note (vault-relative path)
    #[arg(long, value_name = "NOTE_PATH")]
    pub note: Option<String>,

    /// Indexable file extensions (comma-separated)
    #[arg(short, long, value_delimiter = ',', default_value = "md")]
    pub extensions: Vec<String>,

    /// Show excerpts with match markers
    #[arg(long, default_value = "true", action = clap::ArgAction::Set)]
    pub excerpts: bool,
}

impl SearchArgs {
    /// The search scope implied by the `--note` flag.
    pub fn scope(&self) -> SearchScope {
        match &self.note {
            Some(path) => SearchScope::Note(path.clone()),
            None => SearchScope::Vault,
        }
    }

    /// Build the engine configuration from the arguments.
    pub fn search_config(&self) -> SearchConfig {
        let mut config = SearchConfig::default().with_extensions(self.extensions.clone());
        config.max_results = self.limit;
        config
    }
}

/// Arguments for vault statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Path to the vault directory
    #[arg(value_name = "VAULT_PATH")]
    pub vault_path: PathBuf,

    /// Indexable file extensions (comma-separated)
    #[arg(short, long, value_delimiter = ',', default_value = "md")]
    pub extensions: Vec<String>,
}

impl StatsArgs {
    /// Build the engine configuration from the arguments.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig::default().with_extensions(self.extensions.clone())
    }
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_basic_search_command() {
        let args = MagpieArgs::try_parse_from([
            "magpie",
            "search",
            "/path/to/vault",
            "test query",
            "--limit",
            "20",
        ])
        .unwrap();

        if let Command::Search(search_args) = args.command {
            assert_eq!(search_args.vault_path, PathBuf::from("/path/to/vault"));
            assert_eq!(search_args.query, "test query");
            assert_eq!(search_args.limit, 20);
            assert!(matches!(search_args.scope(), SearchScope::Vault));
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_search_note_scope() {
        let args = MagpieArgs::try_parse_from([
            "magpie",
            "search",
            "/path/to/vault",
            "query",
            "--note",
            "daily/today.md",
        ])
        .unwrap();

        if let Command::Search(search_args) = args.command {
            assert_eq!(
                search_args.scope(),
                SearchScope::Note("daily/today.md".to_string())
            );
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_extensions_are_comma_separated() {
        let args = MagpieArgs::try_parse_from([
            "magpie",
            "search",
            "/path/to/vault",
            "query",
            "--extensions",
            "md,txt",
        ])
        .unwrap();

        if let Command::Search(search_args) = args.command {
            assert_eq!(search_args.extensions, vec!["md", "txt"]);
            let config = search_args.search_config();
            assert!(config.is_indexable("a.md"));
            assert!(config.is_indexable("b.txt"));
            assert!(!config.is_indexable("c.png"));
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_stats_command() {
        let args = MagpieArgs::try_parse_from(["magpie", "stats", "/path/to/vault"]).unwrap();

        if let Command::Stats(stats_args) = args.command {
            assert_eq!(stats_args.vault_path, PathBuf::from("/path/to/vault"));
            assert_eq!(stats_args.extensions, vec!["md"]);
        } else {
            panic!("Expected Stats command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        // Default verbosity
        let args = MagpieArgs::try_parse_from(["magpie", "stats", "v"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        // Multiple verbose flags
        let args = MagpieArgs::try_parse_from(["magpie", "-vv", "stats", "v"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        // Quiet flag
        let args = MagpieArgs::try_parse_from(["magpie", "--quiet", "stats", "v"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args =
            MagpieArgs::try_parse_from(["magpie", "--format", "json", "stats", "v"]).unwrap();
        assert!(matches!(args.output_format, OutputFormat::Json));
    }
}
