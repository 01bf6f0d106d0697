//! Core traversal-and-copy module
//!
//! Provides the recursive walker, the per-file copier, and the engine
//! that wires them together with bounded concurrency.

mod copier;
mod engine;
mod walker;

pub use copier::*;
pub use engine::*;
pub use walker::*;
