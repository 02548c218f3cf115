use std::path::Path;

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CoreError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
}

impl CoreError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
        }
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `subscope {cmd} --help` for usage."),
            None => "Run `subscope --help` for usage.".to_string(),
        };
        Self::new("invalid_argument", message, vec![help_hint])
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn empty_source(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "empty_source",
            &format!("Statement file `{location}` is empty."),
            vec![format!(
                "Export the statement again and retry with a non-empty `{location}`."
            )],
        )
    }

    pub fn unreadable_file(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "unreadable_file",
            &format!("Cannot read statement file `{location}`: {detail}"),
            vec![format!(
                "Check that `{location}` exists and grants read access, then retry."
            )],
        )
    }

    pub fn unsupported_format(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "unsupported_format",
            &format!("Statement file `{location}` is not a supported format."),
            vec![
                "Provide a bank statement exported as CSV or PDF.".to_string(),
                "Run `subscope analyze --help` to review supported inputs.".to_string(),
            ],
        )
    }

    pub fn pdf_structure(detail: &str) -> Self {
        Self::new(
            "pdf_structure_error",
            &format!("Cannot parse the PDF statement: {detail}"),
            vec![
                "Re-export the statement as a text-based PDF (not a scan).".to_string(),
                "Alternatively export the same statement as CSV.".to_string(),
            ],
        )
    }

    pub fn no_transactions_found() -> Self {
        Self::new(
            "no_transactions_found",
            "No transactions could be extracted from the provided statements.",
            vec![
                "Confirm the files are bank statements containing a transaction table.".to_string(),
                "For PDFs, export a text-based statement; scanned images are not readable."
                    .to_string(),
            ],
        )
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
