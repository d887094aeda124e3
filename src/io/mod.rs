//! Input/output helpers.
//!
//! - delimited-text ingest + validation (`ingest`)
//! - JSON export of a fit run (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
