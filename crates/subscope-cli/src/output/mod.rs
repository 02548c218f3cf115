mod analyze_text;
mod error_text;
mod format;
mod json;
mod knowledge_text;
mod mode;

use std::io;

use subscope_core::{CoreError, SuccessEnvelope};

use crate::stdout_io::write_stdout_text;

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let rendered = match mode {
        OutputMode::Json => json::render_success_json(success)?,
        OutputMode::Text => match success.command.as_str() {
            "analyze" => analyze_text::render_analysis(success),
            "knowledge list" => knowledge_text::render_knowledge_list(success),
            "knowledge lookup" => knowledge_text::render_knowledge_lookup(success),
            _ => json::render_success_json(success)?,
        },
    };
    write_stdout_text(&rendered)
}

pub fn print_failure(error: &CoreError, mode: OutputMode) -> io::Result<()> {
    let rendered = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_text(&rendered)
}
