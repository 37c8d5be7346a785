//! CLI subcommands.

pub mod tables;
