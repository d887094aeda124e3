//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - validated measurements (`Observation`) and the caller-owned series
//! - fit outputs (`FitResult`, `LogLinearFit`)
//! - run configuration (`TimeUnit`, `FitConfig`)

pub mod types;

pub use types::*;
