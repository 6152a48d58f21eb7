//! Output formatting for CLI commands.

use serde::Serialize;

use crate::cli::args::{MagpieArgs, OutputFormat};
use crate::engine::IndexState;
use crate::error::Result;
use crate::index::IndexStats;
use crate::search::Excerpt;
use crate::search::SearchHit;

/// Result structure for search operations.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub hits: Vec<SearchHit>,
    pub total_hits: usize,
    pub duration_ms: u64,
}

/// Result structure for vault statistics.
#[derive(Debug, Serialize)]
pub struct VaultStats {
    pub vault: String,
    pub state: IndexState,
    pub skipped_notes: usize,
    pub index: IndexStats,
}

/// Output search results in the selected format.
pub fn output_search_results(results: &SearchResults, args: &MagpieArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            print_search_results(results, args);
            Ok(())
        }
        OutputFormat::Json => output_json(results, args),
    }
}

/// Output vault statistics in the selected format.
pub fn output_vault_stats(stats: &VaultStats, args: &MagpieArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            print_vault_stats(stats);
            Ok(())
        }
        OutputFormat::Json => output_json(stats, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &MagpieArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Output search results in human format.
fn print_search_results(results: &SearchResults, args: &MagpieArgs) {
    if results.hits.is_empty() {
        println!("No results for '{}'", results.query);
        return;
    }

    println!("Search Results:");
    println!("═══════════════");

    for (i, hit) in results.hits.iter().enumerate() {
        println!();
        println!("Result {}: {} (Score: {:.3})", i + 1, hit.path, hit.score);
        println!("─────────────");
        println!("Title: {}", hit.title);

        if args.verbosity() > 1 && !hit.matched_terms.is_empty() {
            println!("Matched terms: {}", hit.matched_terms.join(", "));
        }

        for excerpt in &hit.excerpts {
            println!("  {}", highlight_excerpt(excerpt));
        }
    }

    println!();
    println!("Total hits: {}", results.total_hits);
    println!("Search time: {}ms", results.duration_ms);
}

/// Output vault statistics in human format.
fn print_vault_stats(stats: &VaultStats) {
    println!("Index Statistics:");
    println!("════════════════");
    println!("Vault: {}", stats.vault);
    println!("State: {}", stats.state);
    println!("Notes: {}", stats.index.note_count);
    println!("Distinct terms: {}", stats.index.term_count);
    println!("Postings: {}", stats.index.posting_count);
    println!("Total tokens: {}", stats.index.total_tokens);
    println!("Average note length: {:.1} tokens", stats.index.avg_note_tokens);

    if let Some(at) = stats.index.last_modified {
        println!("Last modified: {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if stats.skipped_notes > 0 {
        println!("Skipped notes: {}", stats.skipped_notes);
    }
}

/// Wrap each matched span in brackets for terminal display.
///
/// Spans arrive sorted and non-overlapping, relative to the excerpt text.
fn highlight_excerpt(excerpt: &Excerpt) -> String {
    let mut out = String::with_capacity(excerpt.text.len() + excerpt.spans.len() * 2);
    let mut cursor = 0;

    for span in &excerpt.spans {
        out.push_str(&excerpt.text[cursor..span.start]);
        out.push('[');
        out.push_str(&excerpt.text[span.start..span.end]);
        out.push(']');
        cursor = span.end;
    }
    out.push_str(&excerpt.text[cursor..]);
    out
}
