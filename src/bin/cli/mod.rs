//! CLI subcommand implementations for automation-cli

pub mod networks;
pub mod output;
pub mod positions;
