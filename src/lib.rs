//! `cds-tracker` library crate.
//!
//! The binary (`cds`) is a thin wrapper around this library so that:
//!
//! - the aggregation core is testable without spawning processes
//! - modules are reusable (e.g., future dashboards, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod stats;
