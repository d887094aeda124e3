//! Growth-rate computation.
//!
//! Two pure routines, no shared state:
//!
//! - single-point rate from an initial/final density pair (`point`)
//! - log2-linear regression across a series of observations (`series`)
//!
//! Nothing in here logs, prints, or touches the filesystem. Callers own all
//! presentation and all error reporting.

pub mod error;
pub mod point;
pub mod series;

pub use error::*;
pub use point::*;
pub use series::*;
