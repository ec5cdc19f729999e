use clap::{ Parser, Subcommand };
use std::path::PathBuf;

pub mod commands;
pub mod ui;

#[derive(Parser)]
#[command(
    name = "vigil",
    about = "Monitors surgical room conversation against a compliance checklist",
    version,
    author,
    long_about = None
)]
pub struct VigilCli {
    /// Sets the log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    pub output_format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a conversation transcript against the checklist
    Process {
        /// File containing the transcript
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Transcript passed inline
        #[arg(short, long)]
        text: Option<String>,
    },

    /// Mark a requirement as satisfied by its exact text
    Mark {
        /// Requirement text, matched exactly
        requirement: String,
    },

    /// List checklist requirements and their completion status
    List {
        /// Only show one phase (pre-op, intra-op, post-op)
        #[arg(short, long)]
        phase: Option<String>,
    },

    /// Extract checklist steps from a procedure description and store them
    Ingest {
        /// File containing the procedure description
        #[arg(short, long)]
        procedure: PathBuf,

        /// Print the extracted steps without storing them
        #[arg(long, default_value = "false")]
        dry_run: bool,

        /// Store without asking for confirmation
        #[arg(short, long, default_value = "false")]
        yes: bool,
    },
}
