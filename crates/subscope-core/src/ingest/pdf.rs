use std::sync::LazyLock;

use chrono::{Datelike, Utc};
use lopdf::Document;
use regex::Regex;
use ulid::Ulid;

use crate::error::{CoreError, CoreResult};
use crate::ingest::extract;
use crate::model::Transaction;
use crate::normalize::amount::{AmountContext, normalize_amount};
use crate::normalize::date::normalize_date_with_year;

/// Vertical tolerance in layout units when binning fragments into rows.
/// PDF text placement jitters below this threshold within one visual line.
pub const ROW_TOLERANCE: f64 = 4.0;

/// One positioned text run from a PDF page, in PDF user-space coordinates
/// (origin bottom-left, y grows upward).
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PageText {
    pub fragments: Vec<TextFragment>,
}

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d{4}[/\-.]\d{1,2}[/\-.]\d{1,2})|(\d{1,2}[/\-.]\d{1,2}(?:[/\-.]\d{2,4})?)|(\d{1,2}\s+(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s*(?:\d{2,4})?)",
    )
    .unwrap()
});

static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\d.,]+").unwrap());

/// Reconstructs a statement's transactions from raw PDF bytes.
pub fn parse_statement_pdf(bytes: &[u8]) -> CoreResult<Vec<Transaction>> {
    let document =
        Document::load_mem(bytes).map_err(|err| CoreError::pdf_structure(&err.to_string()))?;

    let pages = document.get_pages();
    if pages.is_empty() {
        return Err(CoreError::pdf_structure("document contains no pages"));
    }

    let current_year = Utc::now().year();
    let mut transactions = Vec::new();

    for (page_number, page_id) in pages {
        let page = PageText {
            fragments: extract::page_fragments(&document, page_id),
        };
        let lines = reconstruct_rows(&page);
        tracing::debug!(
            page = page_number,
            fragments = page.fragments.len(),
            rows = lines.len(),
            "reconstructed pdf page"
        );
        transactions.extend(transactions_from_lines(&lines, current_year));
    }

    tracing::info!(
        count = transactions.len(),
        "extracted transactions from pdf"
    );
    Ok(transactions)
}

/// Bins fragments into visual rows by vertical position, orders rows
/// top-to-bottom and fragments left-to-right, and joins each row into one
/// logical text line. A fragment joins the first existing row within
/// [`ROW_TOLERANCE`] of its y coordinate.
pub fn reconstruct_rows(page: &PageText) -> Vec<String> {
    let mut rows: Vec<(f64, Vec<&TextFragment>)> = Vec::new();

    for fragment in &page.fragments {
        match rows
            .iter_mut()
            .find(|(y, _)| (*y - fragment.y).abs() < ROW_TOLERANCE)
        {
            Some((_, items)) => items.push(fragment),
            None => rows.push((fragment.y, vec![fragment])),
        }
    }

    // Top of the page has the largest y.
    rows.sort_by(|a, b| b.0.total_cmp(&a.0));

    rows.into_iter()
        .filter_map(|(_, mut items)| {
            items.sort_by(|a, b| a.x.total_cmp(&b.x));
            let line = items
                .iter()
                .map(|fragment| fragment.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string();
            (!line.is_empty()).then_some(line)
        })
        .collect()
}

/// Extracts date/amount/description triples from reconstructed lines. Lines
/// without both a date-like and a numeric token are not transaction rows.
pub fn transactions_from_lines(lines: &[String], current_year: i32) -> Vec<Transaction> {
    let mut transactions = Vec::new();

    for line in lines {
        let date_matches: Vec<&str> = DATE_PATTERN
            .find_iter(line)
            .map(|found| found.as_str())
            .collect();
        let number_matches: Vec<&str> = NUMBER_PATTERN
            .find_iter(line)
            .map(|found| found.as_str())
            .collect();
        if date_matches.is_empty() || number_matches.is_empty() {
            continue;
        }

        let Some((date, raw_date)) = select_date(&date_matches, current_year) else {
            continue;
        };

        let candidates: Vec<&str> = number_matches
            .iter()
            .copied()
            .filter(|token| is_plausible_amount(token))
            .collect();
        let Some(raw_amount) = candidates.last().copied() else {
            continue;
        };

        let normalized = normalize_amount(raw_amount, &AmountContext::default());
        // Statement rows are treated as outflows.
        let amount = -normalized.amount.abs();
        if amount == 0.0 {
            continue;
        }

        let description = clean_description(line, raw_date, raw_amount);
        if description.len() < 3 {
            continue;
        }

        transactions.push(Transaction {
            id: format!("txn_{}", Ulid::new()),
            date,
            description,
            original_description: line.trim().to_string(),
            amount,
            currency: Some(normalized.currency),
        });
    }

    transactions
}

/// Prefers a date whose year falls within `[current_year - 3, current_year
/// + 1]`, then any structurally valid date after 2020, else gives up on the
/// row. Dropping a row beats emitting an invalid date.
fn select_date<'a>(matches: &[&'a str], current_year: i32) -> Option<(String, &'a str)> {
    let min_year = current_year - 3;

    for raw in matches {
        if let Some(date) = normalize_date_with_year(raw, current_year) {
            if let Some(year) = parsed_year(&date) {
                if year >= min_year && year <= current_year + 1 {
                    return Some((date, raw));
                }
            }
        }
    }

    for raw in matches {
        if let Some(date) = normalize_date_with_year(raw, current_year) {
            if let Some(year) = parsed_year(&date) {
                if year > 2020 {
                    return Some((date, raw));
                }
            }
        }
    }

    None
}

fn parsed_year(iso_date: &str) -> Option<i32> {
    iso_date.get(0..4)?.parse::<i32>().ok()
}

fn is_plausible_amount(token: &str) -> bool {
    // Bare 4-digit tokens in the plausible year range are year artifacts,
    // not amounts.
    if token.len() == 4 && !token.contains('.') && !token.contains(',') {
        if let Ok(value) = token.parse::<i32>() {
            if value > 1900 && value < 2100 {
                return false;
            }
        }
    }
    token.contains('.') || token.contains(',') || token.len() >= 3
}

fn clean_description(line: &str, raw_date: &str, raw_amount: &str) -> String {
    let without_fields = line.replacen(raw_date, "", 1).replacen(raw_amount, "", 1);
    let without_symbols = without_fields
        .replace("Rp", "")
        .replace(['$', '€', '£'], "");
    without_symbols
        .trim()
        .trim_matches(|ch: char| !ch.is_ascii_alphanumeric())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{PageText, TextFragment, reconstruct_rows, transactions_from_lines};

    fn fragment(text: &str, x: f64, y: f64) -> TextFragment {
        TextFragment {
            text: text.to_string(),
            x,
            y,
        }
    }

    #[test]
    fn binning_tolerates_vertical_jitter() {
        let page = PageText {
            fragments: vec![
                fragment("NETFLIX.COM", 120.0, 700.2),
                fragment("2024-01-15", 40.0, 700.0),
                fragment("186.000", 400.0, 698.9),
                fragment("Footer", 40.0, 30.0),
            ],
        };

        let rows = reconstruct_rows(&page);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], "2024-01-15 NETFLIX.COM 186.000");
        assert_eq!(rows[1], "Footer");
    }

    #[test]
    fn rows_order_top_to_bottom() {
        let page = PageText {
            fragments: vec![
                fragment("bottom", 10.0, 100.0),
                fragment("top", 10.0, 700.0),
                fragment("middle", 10.0, 400.0),
            ],
        };

        let rows = reconstruct_rows(&page);
        assert_eq!(rows, vec!["top", "middle", "bottom"]);
    }

    #[test]
    fn extracts_transaction_from_statement_line() {
        let lines = vec!["2024-01-15 NETFLIX.COM Subscription 186.000".to_string()];

        let transactions = transactions_from_lines(&lines, 2024);
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].date, "2024-01-15");
        assert_eq!(transactions[0].description, "NETFLIX.COM Subscription");
        assert_eq!(transactions[0].amount, -186000.0);
        assert_eq!(transactions[0].currency.as_deref(), Some("IDR"));
        assert_eq!(
            transactions[0].original_description,
            "2024-01-15 NETFLIX.COM Subscription 186.000"
        );
    }

    #[test]
    fn amounts_are_forced_negative() {
        let lines = vec!["15/01/2024 SALARY CREDIT 1,500.00".to_string()];

        let transactions = transactions_from_lines(&lines, 2024);
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, -1500.0);
        assert_eq!(transactions[0].currency.as_deref(), Some("USD"));
    }

    #[test]
    fn header_lines_without_dates_are_skipped() {
        let lines = vec![
            "Transaction History".to_string(),
            "Date Description Amount".to_string(),
        ];

        assert!(transactions_from_lines(&lines, 2024).is_empty());
    }

    #[test]
    fn bare_year_tokens_are_not_amounts() {
        // The only numeric candidates besides the date are the year token
        // and a short code, so the row has no plausible amount.
        let lines = vec!["15/01 STATEMENT PERIOD 2024 X1".to_string()];

        let transactions = transactions_from_lines(&lines, 2024);
        assert!(transactions.is_empty());
    }

    #[test]
    fn ancient_dates_drop_the_row() {
        let lines = vec!["15/01/2001 OLD CHARGE 186.000".to_string()];

        assert!(transactions_from_lines(&lines, 2024).is_empty());
    }

    #[test]
    fn older_but_plausible_dates_are_accepted() {
        let lines = vec!["15/01/2021 ARCHIVED CHARGE 186.000".to_string()];

        let transactions = transactions_from_lines(&lines, 2025);
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].date, "2021-01-15");
    }

    #[test]
    fn short_descriptions_drop_the_row() {
        let lines = vec!["2024-01-15 AB 186.000".to_string()];

        assert!(transactions_from_lines(&lines, 2024).is_empty());
    }

    #[test]
    fn currency_symbols_are_stripped_from_descriptions() {
        let lines = vec!["2024-01-15 TAGIHAN LISTRIK Rp 450.000".to_string()];

        let transactions = transactions_from_lines(&lines, 2024);
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].description, "TAGIHAN LISTRIK");
    }
}
