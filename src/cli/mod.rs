// src/cli/mod.rs
//! Command-line entry points.

pub mod args;
pub mod handlers;

pub use args::Cli;
pub use handlers::{build_config, handle_fit};
