//! CPT ingester library.
//!
//! Argument definitions and the command implementations behind the
//! `cpt-ingester` binary, exposed so they can be tested directly.

pub mod args;
pub mod commands;

pub use args::{Cli, Command, DbArgs};
pub use commands::BatchSummary;
