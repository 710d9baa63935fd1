//! Subcommand handlers. Each takes parsed arguments and returns `CliResult`.

pub mod completions;
pub mod config;
pub mod init;
pub mod unpack;
