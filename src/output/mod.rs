// src/output/mod.rs
//! Output handling with clear separation of planning and execution.
//!
//! Path calculation is pure (`paths`); the only filesystem writes happen
//! in `writer`.

mod paths;
mod writer;

pub use paths::{sanitize_component, PathBuilder, PathLayout};
pub use writer::FileSink;
