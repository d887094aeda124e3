//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - runs the single-point calculation or the interactive prompt
//! - loads + fits data files and prints reports/plots
//! - writes optional exports
//! - launches the TUI

use clap::Parser;

use crate::cli::{Command, FitArgs, RateArgs, TuiArgs};
use crate::domain::FitConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `growth` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is the normal case.
    if let Ok(path) = dotenvy::dotenv() {
        log::debug!("loaded environment from {}", path.display());
    }

    // `growth` alone opens the prompt and `growth 100000 1000 5` means
    // `growth rate 100000 1000 5`. Clap requires a subcommand name, so we
    // rewrite argv before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Rate(args) => handle_rate(args),
        Command::Prompt => crate::cli::prompt::run_prompt(),
        Command::Fit(args) => handle_fit(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_rate(args: RateArgs) -> Result<(), AppError> {
    let k = crate::fit::compute_rate(args.final_density, args.initial_density, args.elapsed_time)?;
    let n = crate::fit::generations(args.final_density, args.initial_density)?;
    println!("{}", rate_report(&args, n, k));
    Ok(())
}

fn rate_report(args: &RateArgs, generations: f64, rate: f64) -> String {
    crate::report::format_rate_report(
        args.final_density,
        args.initial_density,
        args.elapsed_time,
        generations,
        rate,
        &args.unit,
    )
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&config.data_path)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run, &config.data_path, config.time_unit)
    );

    let residuals = crate::report::compute_residuals(&run.ingest.series, &run.fit);
    println!("{}", crate::report::format_observation_table(&residuals));

    let issues = crate::report::format_line_issues(&run.ingest.issues);
    if !issues.is_empty() {
        println!("{issues}");
    }

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            &run.ingest.series,
            &run.fit,
            config.time_unit,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    if let Some(path) = &config.export {
        let export = crate::io::export::FitExport::new(&run, &config.data_path, config.time_unit);
        crate::io::export::write_fit_json(path, &export)?;
        log::info!("wrote fit export to '{}'", path.display());
    }

    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    crate::tui::run(args)
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        data_path: args.file.clone(),
        time_unit: args.unit,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export: args.export.clone(),
    }
}

/// Rewrite argv so bare invocations pick a sensible subcommand.
///
/// Rules:
/// - `growth`                     -> `growth prompt`
/// - `growth 100000 1000 5`       -> `growth rate 100000 1000 5`
/// - `growth --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("prompt".to_string());
        return argv;
    };

    // Numbers first: `-5` is a value here, not a flag.
    if arg1.parse::<f64>().is_ok() {
        argv.insert(1, "rate".to_string());
        return argv;
    }

    argv
}
