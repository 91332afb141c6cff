//! CLI entry points

pub mod serve;

use clap::{Parser, Subcommand};

/// Semantra - semantic cache-augmented question answering
#[derive(Parser)]
#[command(name = "semantra")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,
}
