//! CLI module for stackshare - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
