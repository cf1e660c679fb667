//! Dataset sources.

pub mod sample;

pub use sample::*;
