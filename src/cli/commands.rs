//! Command implementations for the Magpie CLI.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::SearchConfig;
use crate::engine::{BuildProgress, SearchEngine};
use crate::error::Result;
use crate::vault::FsVault;

/// Execute a CLI command.
pub fn execute_command(args: MagpieArgs) -> Result<()> {
    match &args.command {
        Command::Search(search_args) => run_search(search_args.clone(), &args),
        Command::Stats(stats_args) => show_stats(stats_args.clone(), &args),
    }
}

/// Index a vault directory from scratch.
fn build_engine(
    vault_path: &Path,
    config: &SearchConfig,
    cli_args: &MagpieArgs,
) -> Result<(SearchEngine, BuildProgress)> {
    let vault = Arc::new(FsVault::new(vault_path));
    let engine = SearchEngine::new(vault);

    let queued = engine.start_build(config)?;
    if cli_args.verbosity() > 1 {
        println!("Indexing {} notes from {}", queued, vault_path.display());
    }
    let progress = engine.build_until_ready(config)?;

    Ok((engine, progress))
}

/// Search the vault.
fn run_search(args: SearchArgs, cli_args: &MagpieArgs) -> Result<()> {
    let config = args.search_config();
    let start_time = Instant::now();

    let (engine, _) = build_engine(&args.vault_path, &config, cli_args)?;
    let mut hits = engine.search(&args.query, &args.scope(), &config)?;
    let duration = start_time.elapsed();

    if !args.excerpts {
        for hit in &mut hits {
            hit.excerpts.clear();
        }
    }

    let total_hits = hits.len();
    output_search_results(
        &SearchResults {
            query: args.query.clone(),
            hits,
            total_hits,
            duration_ms: duration.as_millis() as u64,
        },
        cli_args,
    )
}

/// Show index statistics for the vault.
fn show_stats(args: StatsArgs, cli_args: &MagpieArgs) -> Result<()> {
    let config = args.search_config();
    let (engine, progress) = build_engine(&args.vault_path, &config, cli_args)?;

    output_vault_stats(
        &VaultStats {
            vault: args.vault_path.to_string_lossy().to_string(),
            state: engine.readiness(),
            skipped_notes: progress.skipped,
            index: engine.stats(),
        },
        cli_args,
    )
}
