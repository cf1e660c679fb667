//! Terminal reporting: formatted run summary and per-issuer table.

pub mod format;

pub use format::*;
