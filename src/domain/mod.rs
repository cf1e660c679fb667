//! Core domain types for CDS spread tracking.

pub mod types;

pub use types::*;
