use subscope_core::commands;
use subscope_core::{CoreResult, SuccessEnvelope};

use crate::cli::{Cli, Commands, KnowledgeCommand};

pub fn dispatch(cli: &Cli) -> CoreResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Analyze { paths, .. } => commands::analyze::run(paths),
        Commands::Knowledge { command } => match command {
            KnowledgeCommand::List { .. } => commands::knowledge::list(),
            KnowledgeCommand::Lookup { text, .. } => commands::knowledge::lookup(text),
        },
    }
}
