//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use std::path::Path;

use crate::app::pipeline::RunOutput;
use crate::domain::TimeUnit;
use crate::io::ingest::{LineIssue, FILE_FORMAT_INSTRUCTIONS};
use crate::report::Residual;

/// One-line result used by the interactive prompt.
pub fn format_rate_line(rate: f64, unit: &str) -> String {
    format!("The growth rate (k) is: {rate:.4} generations per {unit}.")
}

/// Report printed by `growth rate`.
pub fn format_rate_report(
    final_density: f64,
    initial_density: f64,
    elapsed_time: f64,
    generations: f64,
    rate: f64,
    unit: &str,
) -> String {
    let mut out = String::new();
    out.push_str("--- Growth Rate Calculation (CLI) ---\n");
    out.push_str(&format!("N_t (Final Density): {final_density}\n"));
    out.push_str(&format!("N_0 (Initial Density): {initial_density}\n"));
    out.push_str(&format!("t (Time Interval): {elapsed_time}\n"));
    out.push_str(&format!("Generations (n): {generations:.4}\n"));
    out.push_str(&format!(
        "The specific growth rate (k) is: {rate:.4} generations per {unit}.\n"
    ));
    out
}

/// `Fitted k: ... gen/<unit> (R²: ...)`, shared by the CLI summary and the TUI header.
pub fn format_fit_headline(rate: f64, r_squared: f64, unit: TimeUnit) -> String {
    format!("Fitted k: {rate:.4} gen/{unit} (R²: {r_squared:.4})")
}

/// Format the full run summary (dataset + fit diagnostics).
pub fn format_run_summary(run: &RunOutput, source: &Path, unit: TimeUnit) -> String {
    let mut out = String::new();
    let series = &run.ingest.series;

    out.push_str("=== growth - log2-linear growth fit ===\n");
    out.push_str(&format!("Source: {}\n", source.display()));
    let (t0, t1) = series.time_range().unwrap_or((0.0, 0.0));
    out.push_str(&format!(
        "Points: n={} | lines={} | skipped={} | time=[{t0:.2}, {t1:.2}] {unit}\n",
        series.len(),
        run.ingest.lines_read,
        run.ingest.issues.len(),
    ));

    out.push('\n');
    out.push_str(&format_fit_headline(run.fit.rate, run.fit.r_squared, unit));
    out.push('\n');
    out.push_str(&format!(
        "Line: log2(N) = {:.6} * t + {:.6}\n",
        run.fit.rate, run.fit.intercept
    ));
    match run.fit.doubling_time() {
        Some(td) => out.push_str(&format!("Doubling time: {td:.4} {unit}\n")),
        None => out.push_str("Doubling time: - (no growth)\n"),
    }

    out
}

/// Observation table with log2 values and residuals.
pub fn format_observation_table(rows: &[Residual]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:>4} {:>12} {:>14} {:>10} {:>10} {:>10}\n",
            "#", "time", "conc", "log2(N)", "fit", "residual"
        )
        .trim_end(),
    );
    out.push('\n');

    out.push_str(
        format!(
            "{:->4} {:->12} {:->14} {:->10} {:->10} {:->10}\n",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for (i, r) in rows.iter().enumerate() {
        out.push_str(
            format!(
                "{:>4} {:>12.2} {:>14.2} {:>10.4} {:>10.4} {:>10.4}\n",
                i + 1,
                r.observation.time(),
                r.observation.concentration(),
                r.log2_obs,
                r.log2_fit,
                r.residual,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Lines the loader skipped, followed by the format reminder.
///
/// Empty string when nothing was skipped.
pub fn format_line_issues(issues: &[LineIssue]) -> String {
    if issues.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str(&format!("Skipped {} line(s):\n", issues.len()));
    for issue in issues {
        out.push_str(&format!("  {}\n", issue.message));
    }
    out.push('\n');
    out.push_str(FILE_FORMAT_INSTRUCTIONS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LogLinearFit;
    use crate::io::ingest::parse_observations;
    use crate::report::compute_residuals;
    use std::io::Cursor;

    fn run(text: &str) -> RunOutput {
        let ingest = parse_observations(Cursor::new(text)).unwrap();
        let fit = crate::fit::fit_series(&ingest.series).unwrap();
        RunOutput { ingest, fit }
    }

    #[test]
    fn rate_report_uses_four_decimals() {
        let txt = format_rate_report(100_000.0, 1000.0, 5.0, 6.643856189774724, 1.328771237954945, "hour");
        assert!(txt.contains("N_t (Final Density): 100000\n"));
        assert!(txt.contains("Generations (n): 6.6439\n"));
        assert!(txt.ends_with("The specific growth rate (k) is: 1.3288 generations per hour.\n"));
    }

    #[test]
    fn rate_line_matches_prompt_output() {
        assert_eq!(
            format_rate_line(2.0, "days"),
            "The growth rate (k) is: 2.0000 generations per days."
        );
    }

    #[test]
    fn summary_reports_fit_and_doubling_time() {
        let r = run("0,1\n1,2\n2,4\nnope\n");
        let txt = format_run_summary(&r, Path::new("d.csv"), TimeUnit::Hours);
        assert!(txt.contains("Points: n=3 | lines=4 | skipped=1 | time=[0.00, 2.00] hours"));
        assert!(txt.contains("Fitted k: 1.0000 gen/hours (R²: 1.0000)"));
        assert!(txt.contains("Doubling time: 1.0000 hours"));
    }

    #[test]
    fn summary_without_growth_has_no_doubling_time() {
        let r = run("0,5\n1,5\n");
        let txt = format_run_summary(&r, Path::new("d.csv"), TimeUnit::Days);
        assert!(txt.contains("Doubling time: - (no growth)"));
    }

    #[test]
    fn observation_table_snapshot() {
        let r = run("0,1\n1,2\n");
        let fit = LogLinearFit {
            rate: 1.0,
            intercept: 0.0,
            r_squared: 1.0,
        };
        let txt = format_observation_table(&compute_residuals(&r.ingest.series, &fit));
        let expected = concat!(
            "   #         time           conc    log2(N)        fit   residual\n",
            "---- ------------ -------------- ---------- ---------- ----------\n",
            "   1         0.00           1.00     0.0000     0.0000     0.0000\n",
            "   2         1.00           2.00     1.0000     1.0000     0.0000\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn line_issues_include_format_help() {
        let r = run("0,1\nabc,1\n1,2\n");
        let txt = format_line_issues(&r.ingest.issues);
        assert!(txt.starts_with("Skipped 1 line(s):\n  Line 2: Data must be valid numbers.\n"));
        assert!(txt.contains("Example format:"));
        assert!(format_line_issues(&[]).is_empty());
    }
}
