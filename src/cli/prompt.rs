//! Interactive prompt for the single-point calculation.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles `growth rate <N_t> <N_0> <t>`
//! - the prompt provides the "run `growth` and answer questions" UX
//!
//! The session is generic over its reader/writer so it can be driven from
//! tests without a terminal.

use std::io::{self, BufRead, Write};

use crate::error::{AppError, EXIT_IO};
use crate::fit::{compute_rate, require_positive};
use crate::report::format_rate_line;

const DEFAULT_UNIT: &str = "unit time";

/// Run the prompt on stdin/stdout.
pub fn run_prompt() -> Result<(), AppError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    run_session(&mut input, &mut output)
}

/// One full request/response session.
///
/// Each value is re-requested until it is a positive number. A core
/// validation error after that is restated, not returned: the session itself
/// still succeeded.
pub fn run_session<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<(), AppError> {
    say(out, "--- Interactive growth rate calculator (k) ---")?;

    let final_density = read_positive(input, out, "Population density at finite time (N_t): ", "Final density")?;
    let initial_density =
        read_positive(input, out, "Population density at initial time (N_0): ", "Initial density")?;
    let elapsed_time = read_positive(input, out, "Time interval (t): ", "Time interval")?;

    let unit = read_line(input, out, "Enter the time unit for growth rate (e.g., hours, days): ")?;
    let unit = if unit.is_empty() { DEFAULT_UNIT.to_string() } else { unit };

    match compute_rate(final_density, initial_density, elapsed_time) {
        Ok(k) => {
            say(out, "\n--- Result ---")?;
            say(out, &format_rate_line(k, &unit))?;
        }
        Err(err) => {
            say(out, &format!("\nAn error occurred: {err}"))?;
        }
    }
    Ok(())
}

/// Ask until the answer parses and passes the positivity rule.
pub fn read_positive<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
    what: &str,
) -> Result<f64, AppError> {
    loop {
        let answer = read_line(input, out, prompt)?;
        let value = match answer.parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                say(out, "Invalid input. Please enter a valid number.")?;
                continue;
            }
        };
        match require_positive(value, what) {
            Ok(v) => return Ok(v),
            Err(err) => say(out, &format!("{err} Try again."))?,
        }
    }
}

/// Print `prompt`, read one trimmed line. EOF ends the session.
fn read_line<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> Result<String, AppError> {
    write!(out, "{prompt}").map_err(write_failed)?;
    out.flush().map_err(write_failed)?;

    let mut line = String::new();
    let bytes = input
        .read_line(&mut line)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to read input: {e}")))?;
    if bytes == 0 {
        return Err(AppError::new(
            EXIT_IO,
            "No input received. Use `growth rate <N_t> <N_0> <t>` for non-interactive use.",
        ));
    }
    Ok(line.trim().to_string())
}

fn say<W: Write>(out: &mut W, msg: &str) -> Result<(), AppError> {
    writeln!(out, "{msg}").map_err(write_failed)
}

fn write_failed(e: io::Error) -> AppError {
    AppError::new(EXIT_IO, format!("Failed to write prompt: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn session(stdin: &str) -> (Result<(), AppError>, String) {
        let mut input = Cursor::new(stdin.as_bytes().to_vec());
        let mut out = Vec::new();
        let res = run_session(&mut input, &mut out);
        (res, String::from_utf8(out).unwrap())
    }

    #[test]
    fn happy_path_prints_four_decimals() {
        let (res, out) = session("100000\n1000\n5\nhours\n");
        assert!(res.is_ok());
        assert!(out.contains("--- Result ---"));
        assert!(out.contains("The growth rate (k) is: 1.3288 generations per hours."));
    }

    #[test]
    fn re_asks_until_input_is_valid() {
        let (res, out) = session("abc\n-3\n0\n200\n100\n1\n\n");
        assert!(res.is_ok());
        assert!(out.contains("Invalid input. Please enter a valid number."));
        assert_eq!(out.matches("must be greater than zero. Try again.").count(), 2);
        assert!(out.contains("The growth rate (k) is: 1.0000 generations per unit time."));
    }

    #[test]
    fn eof_ends_the_session_with_an_error() {
        let (res, out) = session("100\n");
        let err = res.unwrap_err();
        assert_eq!(err.exit_code(), EXIT_IO);
        assert!(out.contains("Population density at initial time (N_0): "));
    }

    #[test]
    fn read_positive_returns_first_valid_value() {
        let mut input = Cursor::new(b"nan\n2.5\n".to_vec());
        let mut out = Vec::new();
        let v = read_positive(&mut input, &mut out, "> ", "Value").unwrap();
        assert_eq!(v, 2.5);
    }
}
