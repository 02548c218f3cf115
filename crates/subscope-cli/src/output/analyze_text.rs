use serde_json::Value;
use subscope_core::SuccessEnvelope;
use subscope_core::model::AnalysisResult;

use super::format::{Align, Column, key_value_rows, render_table_or_blocks, terminal_width};

const SUBSCRIPTION_COLUMNS: [Column<'static>; 5] = [
    Column {
        name: "Service",
        align: Align::Left,
    },
    Column {
        name: "Category",
        align: Align::Left,
    },
    Column {
        name: "Amount",
        align: Align::Right,
    },
    Column {
        name: "Last Payment",
        align: Align::Left,
    },
    Column {
        name: "Confidence",
        align: Align::Right,
    },
];

pub fn render_analysis(success: &SuccessEnvelope) -> String {
    let Ok(analysis) =
        serde_json::from_value::<AnalysisResult>(success.data["analysis"].clone())
    else {
        return "Analysis data is missing from the response.".to_string();
    };

    let mut lines = Vec::new();

    if analysis.subscriptions.is_empty() {
        lines.push("No recurring subscriptions were detected.".to_string());
        lines.push(String::new());
        lines.push(format!(
            "  Transactions processed:  {}",
            analysis.processed_transactions
        ));
    } else {
        lines.push(format!(
            "Detected {} subscription{}:",
            analysis.subscriptions.len(),
            if analysis.subscriptions.len() == 1 { "" } else { "s" }
        ));
        lines.push(String::new());

        let rows = analysis
            .subscriptions
            .iter()
            .map(|subscription| {
                vec![
                    subscription.name.clone(),
                    subscription.category.as_str().to_string(),
                    format_money(subscription.amount, &subscription.currency),
                    subscription.last_payment_date.clone(),
                    format_confidence(subscription.confidence),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.extend(render_table_or_blocks(
            &SUBSCRIPTION_COLUMNS,
            &rows,
            terminal_width(),
            "Subscription",
        ));

        lines.push(String::new());
        lines.push("Summary:".to_string());
        lines.extend(key_value_rows(
            &[
                (
                    "Total monthly spend:",
                    format_money(analysis.total_monthly_spend, &analysis.currency),
                ),
                (
                    "Yearly projection:",
                    format_money(analysis.yearly_projection, &analysis.currency),
                ),
                (
                    "Transactions processed:",
                    analysis.processed_transactions.to_string(),
                ),
            ],
            2,
        ));
    }

    let file_lines = render_file_outcomes(&success.data["files"]);
    if !file_lines.is_empty() {
        lines.push(String::new());
        lines.push("Files:".to_string());
        lines.extend(file_lines);
    }

    lines.join("\n")
}

fn render_file_outcomes(files: &Value) -> Vec<String> {
    let Some(entries) = files.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .map(|entry| {
            let path = entry["path"].as_str().unwrap_or("<unknown>");
            let format = entry["format"].as_str().unwrap_or("?");
            match entry["error"].as_str() {
                Some(error) => format!("  {path} ({format}): failed: {error}"),
                None => {
                    let transactions = entry["transactions"].as_u64().unwrap_or(0);
                    format!("  {path} ({format}): {transactions} transactions")
                }
            }
        })
        .collect()
}

fn format_money(amount: f64, currency: &str) -> String {
    format!("{amount:.2} {currency}")
}

fn format_confidence(confidence: f64) -> String {
    format!("{:.0}%", confidence * 100.0)
}
