//! Search command - type-ahead filtering or relevance-ranked matches

use super::Context;
use anyhow::Result;
use owo_colors::{OwoColorize, Stream};
use picoface_cli::output::format_count;
use picoface_snapshots::SearchHit;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct JsonSearchOutput<'a, M> {
    query: &'a str,
    mode: &'static str,
    total: usize,
    matches: Vec<M>,
}

/// Run search command
pub fn run(ctx: &Context, query: &str, fuzzy: bool) -> Result<()> {
    let catalogue = ctx.catalogue()?;

    if fuzzy {
        let hits = catalogue.search(query);
        tracing::debug!(query, hits = hits.len(), "Ranked catalogue");
        return print_hits(ctx, query, hits);
    }

    let names = catalogue.filter(query);
    tracing::debug!(query, hits = names.len(), "Filtered catalogue");

    if ctx.format.is_json() {
        let output = JsonSearchOutput {
            query,
            mode: "prefix",
            total: names.len(),
            matches: names,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for name in &names {
        println!("{}", name);
    }
    eprintln!(
        "{}",
        format_count(names.len(), "match", "matches").if_supports_color(Stream::Stderr, |t| t.dimmed())
    );
    Ok(())
}

fn print_hits(ctx: &Context, query: &str, hits: Vec<SearchHit<'_>>) -> Result<()> {
    if ctx.format.is_json() {
        let output = JsonSearchOutput {
            query,
            mode: "relevance",
            total: hits.len(),
            matches: hits,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for hit in &hits {
        println!(
            "{:<40} {}",
            hit.name,
            format!("{:?}", hit.score).if_supports_color(Stream::Stdout, |t| t.dimmed())
        );
    }
    eprintln!(
        "{}",
        format_count(hits.len(), "match", "matches").if_supports_color(Stream::Stderr, |t| t.dimmed())
    );
    Ok(())
}
