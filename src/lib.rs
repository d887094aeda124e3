//! `growth-rate` library crate.
//!
//! The computational core is [`fit`]: `compute_rate` for a single pair of
//! densities and `fit_rate` for a time series. Everything else (CLI, prompt,
//! file loader, TUI) calls into it and renders the result or the error.
//!
//! The binary (`growth`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - front-ends share one validation path

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod tui;
