//! Command-line parsing for the growth-rate calculator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the growth-rate math.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::TimeUnit;

pub mod prompt;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "growth", version, about = "Microbial specific growth rate calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Growth rate from a final density, an initial density, and the elapsed time.
    Rate(RateArgs),
    /// Ask for the three values interactively.
    Prompt,
    /// Fit the growth rate to a time/concentration file and print a report.
    Fit(FitArgs),
    /// Launch the interactive data-entry form.
    ///
    /// Points can be typed in or bulk-loaded from a file; the fit and chart
    /// refresh as soon as two points are present.
    Tui(TuiArgs),
}

/// Positional inputs for the single-point calculation.
///
/// Negative values parse so that the calculator, not the parser, rejects them.
#[derive(Debug, Parser, Clone)]
pub struct RateArgs {
    /// Population density at the final time (N_t).
    #[arg(allow_negative_numbers = true)]
    pub final_density: f64,

    /// Population density at the initial time (N_0).
    #[arg(allow_negative_numbers = true)]
    pub initial_density: f64,

    /// Elapsed time between the two measurements (t).
    #[arg(allow_negative_numbers = true)]
    pub elapsed_time: f64,

    /// Label for the time unit in the report.
    #[arg(long, default_value = "unit time")]
    pub unit: String,
}

/// Options for fitting a data file.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Two-column text file: time, concentration (comma, tab, or space separated).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Time unit used in labels.
    #[arg(short = 'u', long, value_enum, env = "GROWTH_TIME_UNIT", default_value_t = TimeUnit::Hours)]
    pub unit: TimeUnit,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the fit and observations to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

/// Options for the interactive form.
#[derive(Debug, Parser, Clone)]
pub struct TuiArgs {
    /// Optional file to load on start-up.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Initial time unit.
    #[arg(short = 'u', long, value_enum, env = "GROWTH_TIME_UNIT", default_value_t = TimeUnit::Hours)]
    pub unit: TimeUnit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_accepts_three_positionals_and_negatives() {
        let cli = Cli::try_parse_from(["growth", "rate", "100", "-5", "2"]).unwrap();
        match cli.command {
            Command::Rate(args) => {
                assert_eq!(args.final_density, 100.0);
                assert_eq!(args.initial_density, -5.0);
                assert_eq!(args.elapsed_time, 2.0);
                assert_eq!(args.unit, "unit time");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rate_rejects_wrong_count_and_type() {
        assert!(Cli::try_parse_from(["growth", "rate", "100", "5"]).is_err());
        assert!(Cli::try_parse_from(["growth", "rate", "100", "5", "2", "7"]).is_err());
        assert!(Cli::try_parse_from(["growth", "rate", "100", "five", "2"]).is_err());
    }

    #[test]
    fn fit_parses_unit_and_plot_flags() {
        let cli = Cli::try_parse_from(["growth", "fit", "data.csv", "--unit", "minutes", "--no-plot"]).unwrap();
        match cli.command {
            Command::Fit(args) => {
                assert_eq!(args.file, PathBuf::from("data.csv"));
                assert_eq!(args.unit, TimeUnit::Minutes);
                assert!(args.no_plot);
                assert!(args.export.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn tui_file_is_optional() {
        let cli = Cli::try_parse_from(["growth", "tui"]).unwrap();
        assert!(matches!(cli.command, Command::Tui(TuiArgs { file: None, .. })));
    }
}
