use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "subscope",
    version,
    about = "subscription detector for bank statements",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detect recurring subscriptions in bank statement exports (CSV or PDF)
    Analyze {
        /// Statement files to analyze
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Emit structured JSON object output for machine parsing
        #[arg(long)]
        json: bool,
    },
    /// Inspect the built-in service knowledge base
    #[command(arg_required_else_help = true)]
    Knowledge {
        #[command(subcommand)]
        command: KnowledgeCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum KnowledgeCommand {
    /// List every known service with its cancellation guidance
    List {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Match merchant text against the known service keywords
    Lookup {
        /// Merchant or description text to match
        text: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
