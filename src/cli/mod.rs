//! CLI module - argument parsing and the interactive explorer

mod args;
pub mod explore;

pub use args::{resolve_range, Cli, Commands};
pub use explore::run_explore;
