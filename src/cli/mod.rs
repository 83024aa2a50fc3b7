//! CLI for the labelit server

pub mod serve;

use clap::{Parser, Subcommand};

/// labelit - active-learning document labelling service
#[derive(Parser)]
#[command(name = "labelit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the labelling API server
    Serve,
}
