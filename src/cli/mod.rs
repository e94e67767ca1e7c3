//! Command-line parsing for the diamond price recommender.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the pipeline/math code. Input ranges follow the
//! practical UI bounds: weight in (0, 5] carats, length in [0, 12] mm, width
//! in [0, 60] mm, depth in [0, 32] mm.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Clarity, Color, Quality};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dprice", version, about = "Diamond price recommender")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price a single diamond from flags and print a summary.
    Price(PriceArgs),
    /// Price a CSV of diamonds and optionally write a results CSV.
    Batch(BatchArgs),
    /// Launch the interactive terminal form.
    ///
    /// This uses the same underlying pricing pipeline as `dprice price`, but
    /// collects the attributes interactively using Ratatui.
    Tui(TuiArgs),
}

/// Artifact location options shared by all subcommands.
#[derive(Debug, Args, Clone)]
pub struct ArtifactArgs {
    /// Directory containing ordinal_encoder.json and price_model.json
    /// (default: $DPRICE_ARTIFACT_DIR, else ./artifacts).
    #[arg(long, value_name = "DIR")]
    pub artifacts: Option<PathBuf>,
}

/// Options for one-shot pricing.
#[derive(Debug, Parser, Clone)]
pub struct PriceArgs {
    /// Weight in carats, in (0, 5].
    #[arg(short = 'w', long, default_value_t = 0.7, value_parser = parse_weight)]
    pub weight: f64,

    /// Length in millimeters, in [0, 12].
    #[arg(short = 'l', long, default_value_t = 5.76, value_parser = parse_length)]
    pub length: f64,

    /// Width in millimeters, in [0, 60].
    #[arg(short = 'x', long, default_value_t = 5.7, value_parser = parse_width)]
    pub width: f64,

    /// Depth in millimeters, in [0, 32].
    #[arg(short = 'd', long, default_value_t = 3.43, value_parser = parse_depth)]
    pub depth: f64,

    /// Cut quality grade.
    #[arg(short = 'q', long, value_enum, default_value_t = Quality::VeryGood)]
    pub quality: Quality,

    /// Color grade (J worst, D best).
    #[arg(short = 'c', long, value_enum, default_value_t = Color::E)]
    pub color: Color,

    /// Clarity grade (I1 worst, IF best).
    #[arg(short = 'y', long, value_enum, default_value_t = Clarity::SI1)]
    pub clarity: Clarity,

    #[command(flatten)]
    pub artifact: ArtifactArgs,
}

/// Options for batch pricing.
#[derive(Debug, Parser, Clone)]
pub struct BatchArgs {
    /// Input CSV with columns: id?,weight,length,width,depth,quality,color,clarity.
    #[arg(short = 'i', long, value_name = "CSV")]
    pub input: PathBuf,

    /// Write priced rows to this CSV.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub artifact: ArtifactArgs,
}

/// Options for the interactive form.
#[derive(Debug, Parser, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub artifact: ArtifactArgs,
}

fn parse_weight(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("invalid number '{s}'"))?;
    if !v.is_finite() || v <= 0.0 || v > 5.0 {
        return Err("weight must be in (0, 5] carats".to_string());
    }
    Ok(v)
}

fn parse_length(s: &str) -> Result<f64, String> {
    parse_mm(s, "length", 12.0)
}

fn parse_width(s: &str) -> Result<f64, String> {
    parse_mm(s, "width", 60.0)
}

fn parse_depth(s: &str) -> Result<f64, String> {
    parse_mm(s, "depth", 32.0)
}

fn parse_mm(s: &str, name: &str, max: f64) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("invalid number '{s}'"))?;
    if !v.is_finite() || v < 0.0 || v > max {
        return Err(format!("{name} must be in [0, {max}] mm"));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_bounds_are_half_open() {
        assert!(parse_weight("0").is_err());
        assert!(parse_weight("-1").is_err());
        assert!(parse_weight("5.01").is_err());
        assert!((parse_weight("5").unwrap() - 5.0).abs() < 1e-12);
        assert!((parse_weight("0.7").unwrap() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn measurement_bounds_are_closed() {
        assert_eq!(parse_length("0").unwrap(), 0.0);
        assert!(parse_length("12.5").is_err());
        assert!(parse_width("60.5").is_err());
        assert!(parse_depth("-0.1").is_err());
    }

    #[test]
    fn cli_parses_a_full_price_command() {
        let cli = Cli::try_parse_from([
            "dprice", "price", "-w", "1.2", "-l", "6.8", "-x", "6.75", "-d", "4.2", "-q",
            "premium", "-c", "g", "-y", "vs1",
        ])
        .unwrap();
        match cli.command {
            Command::Price(args) => {
                assert_eq!(args.quality, Quality::Premium);
                assert_eq!(args.color, Color::G);
                assert_eq!(args.clarity, Clarity::VS1);
                assert!((args.weight - 1.2).abs() < 1e-12);
            }
            _ => panic!("expected price subcommand"),
        }
    }

    #[test]
    fn out_of_vocabulary_grade_is_rejected_at_parse_time() {
        let result = Cli::try_parse_from(["dprice", "price", "-q", "excellent"]);
        assert!(result.is_err());
    }
}
