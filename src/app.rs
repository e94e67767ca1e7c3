//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the fitted artifacts
//! - runs the pricing pipeline
//! - prints reports
//! - writes optional exports

use clap::Parser;
use rayon::prelude::*;

use crate::cli::{BatchArgs, Command, PriceArgs, TuiArgs};
use crate::domain::DiamondFeatures;
use crate::error::PricingError;
use crate::io::artifacts::ArtifactPaths;
use crate::io::export::PricedRow;
use crate::io::ingest::RowError;

pub mod pipeline;

use pipeline::PricingPipeline;

/// Entry point for the `dprice` binary.
pub fn run() -> Result<(), PricingError> {
    env_logger::init();

    // We want bare `dprice` to behave like `dprice tui`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Price(args) => handle_price(args),
        Command::Batch(args) => handle_batch(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_price(args: PriceArgs) -> Result<(), PricingError> {
    let paths = ArtifactPaths::resolve(args.artifact.artifacts.clone());
    // One-shot pricing loads the artifacts fresh for the request and drops
    // them afterwards; the artifacts are small.
    let pipeline = PricingPipeline::load(&paths)?;

    let features = DiamondFeatures {
        weight: args.weight,
        length: args.length,
        width: args.width,
        depth: args.depth,
        quality: args.quality,
        color: args.color,
        clarity: args.clarity,
    };

    let encoded = pipeline.transform(&features)?;
    let prediction = pipeline.predict(&encoded)?;

    println!(
        "{}",
        crate::report::format_price_summary(&features, &encoded, &prediction, &pipeline)
    );

    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<(), PricingError> {
    let paths = ArtifactPaths::resolve(args.artifact.artifacts.clone());
    let pipeline = PricingPipeline::load(&paths)?;

    let batch = crate::io::ingest::load_diamond_rows(&args.input)?;
    let mut row_errors = batch.row_errors;

    // Rows are independent and the loaded artifacts are immutable, so pricing
    // is safe to parallelize. Results are keyed by line number to keep the
    // output deterministic.
    let results: Vec<Result<PricedRow, RowError>> = batch
        .rows
        .into_par_iter()
        .map(|row| match pipeline.run(&row.features) {
            Ok(prediction) => Ok(PricedRow { row, prediction }),
            Err(err) => Err(RowError {
                line: row.line,
                message: err.to_string(),
            }),
        })
        .collect();

    let mut priced = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(p) => priced.push(p),
            Err(e) => failures.push(e),
        }
    }

    for failure in &failures {
        log::warn!("line {}: {}", failure.line, failure.message);
    }
    row_errors.extend(failures);
    row_errors.sort_by_key(|e| e.line);
    priced.sort_by_key(|p| p.row.line);

    println!(
        "{}",
        crate::report::format_batch_summary(batch.rows_read, priced.len(), &row_errors)
    );

    if let Some(path) = &args.output {
        crate::io::export::write_prices_csv(path, &priced)?;
        println!("Wrote {} priced rows to {}", priced.len(), path.display());
    }

    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), PricingError> {
    crate::tui::run(args)
}

/// Rewrite argv so `dprice` defaults to `dprice tui`.
///
/// Rules:
/// - `dprice`                     -> `dprice tui`
/// - `dprice --artifacts d ...`   -> `dprice tui --artifacts d ...`
/// - `dprice --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "price" | "batch" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
