//! Progress reporting module
//!
//! Provides the event sink the walker and copier report through,
//! and the final run summary.

mod reporter;

pub use reporter::*;
