use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::detect::SubscriptionDetector;
use crate::error::{CoreError, CoreResult};
use crate::ingest::{ingest_csv, parse_statement_pdf};
use crate::model::{AnalysisResult, Transaction};

#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub path: String,
    pub format: String,
    pub transactions: usize,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeData {
    pub files: Vec<FileOutcome>,
    pub analysis: AnalysisResult,
}

pub fn run(paths: &[PathBuf]) -> CoreResult<SuccessEnvelope> {
    run_with_detector(paths, &SubscriptionDetector::with_builtin_knowledge())
}

/// Processes each statement file independently: a structurally broken file
/// is reported in its own outcome and never sinks the batch. Only when no
/// file yields any transaction does the command fail as a whole.
pub fn run_with_detector(
    paths: &[PathBuf],
    detector: &SubscriptionDetector,
) -> CoreResult<SuccessEnvelope> {
    if paths.is_empty() {
        return Err(CoreError::invalid_argument_for_command(
            "Provide at least one statement file to analyze.",
            Some("analyze"),
        ));
    }

    let mut files = Vec::new();
    let mut transactions: Vec<Transaction> = Vec::new();
    let mut failures: Vec<CoreError> = Vec::new();

    for path in paths {
        let display_path = path.display().to_string();
        match ingest_file(path) {
            Ok((format, rows)) => {
                let status = if rows.is_empty() { "no_transactions" } else { "ok" };
                files.push(FileOutcome {
                    path: display_path,
                    format: format.to_string(),
                    transactions: rows.len(),
                    status: status.to_string(),
                    error: None,
                });
                transactions.extend(rows);
            }
            Err(error) => {
                tracing::warn!(path = %display_path, code = %error.code, "statement file failed");
                files.push(FileOutcome {
                    path: display_path,
                    format: detected_format(path).to_string(),
                    transactions: 0,
                    status: "failed".to_string(),
                    error: Some(error.message.clone()),
                });
                failures.push(error);
            }
        }
    }

    if transactions.is_empty() {
        // Every file failed: surface the first file error rather than the
        // generic zero-results condition.
        if failures.len() == paths.len() {
            if let Some(first) = failures.into_iter().next() {
                return Err(first);
            }
        }
        return Err(CoreError::no_transactions_found());
    }

    let analysis: AnalysisResult = detector.analyze(&transactions);
    success("analyze", AnalyzeData { files, analysis })
}

fn ingest_file(path: &Path) -> CoreResult<(&'static str, Vec<Transaction>)> {
    match detected_format(path) {
        "csv" => {
            let text = fs::read_to_string(path)
                .map_err(|err| CoreError::unreadable_file(path, &err.to_string()))?;
            if text.trim().is_empty() {
                return Err(CoreError::empty_source(path));
            }
            Ok(("csv", ingest_csv(&text)?))
        }
        "pdf" => {
            let bytes =
                fs::read(path).map_err(|err| CoreError::unreadable_file(path, &err.to_string()))?;
            if bytes.is_empty() {
                return Err(CoreError::empty_source(path));
            }
            Ok(("pdf", parse_statement_pdf(&bytes)?))
        }
        _ => Err(CoreError::unsupported_format(path)),
    }
}

fn detected_format(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_lowercase);
    match extension.as_deref() {
        Some("csv") => "csv",
        Some("pdf") => "pdf",
        _ => "unknown",
    }
}
