use crate::cli::{Commands, KnowledgeCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    let json = match command {
        Commands::Analyze { json, .. } => *json,
        Commands::Knowledge { command } => match command {
            KnowledgeCommand::List { json } | KnowledgeCommand::Lookup { json, .. } => *json,
        },
    };
    if json { OutputMode::Json } else { OutputMode::Text }
}
