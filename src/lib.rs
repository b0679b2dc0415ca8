// src/lib.rs
pub mod cli;
pub mod config;
pub mod diff;
pub mod discovery;
pub mod error;
pub mod exit;
pub mod formatter;
pub mod logging;
pub mod reporting;
pub mod search;
pub mod style;
pub mod utils;
pub mod vcs;
pub mod workspace;
