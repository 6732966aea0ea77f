//! Command-line interface module.

mod args;
pub mod common;
pub mod compose;
pub mod exercises;
pub mod init;
pub mod serve;

pub use args::{Cli, Commands};
