//! CLI argument parsing and command output.

mod args;
pub mod help;

pub use args::{Cli, Command, ConfigAction, GlobalArgs, StageArgs};
