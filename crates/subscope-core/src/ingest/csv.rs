use std::collections::HashMap;

use chrono::Utc;
use csv::ReaderBuilder;
use ulid::Ulid;

use crate::error::CoreResult;
use crate::model::Transaction;
use crate::normalize::amount::{AmountContext, ColumnHint, normalize_amount};
use crate::normalize::date::normalize_date;

const DATE_ALIASES: &[&str] = &["date", "posted"];
const DESCRIPTION_ALIASES: &[&str] = &["description", "memo"];
const AMOUNT_ALIASES: &[(&str, ColumnHint)] = &[
    ("amount", ColumnHint::Amount),
    ("debit", ColumnHint::Debit),
    ("credit", ColumnHint::Credit),
    ("value", ColumnHint::Amount),
];

/// Maps arbitrary bank CSV exports onto the canonical transaction shape.
/// Header aliases resolve case-insensitively; rows with unparsable fields
/// still emit a transaction (amount `0.0`) rather than failing the file.
pub fn ingest_csv(text: &str) -> CoreResult<Vec<Transaction>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let header_index = match reader.headers() {
        Ok(headers) => index_by_name(headers),
        Err(_) => return Ok(Vec::new()),
    };

    let date_column = first_index(&header_index, DATE_ALIASES);
    let description_column = first_index(&header_index, DESCRIPTION_ALIASES);
    let amount_columns: Vec<(usize, ColumnHint)> = AMOUNT_ALIASES
        .iter()
        .filter_map(|(alias, hint)| header_index.get(*alias).map(|index| (*index, *hint)))
        .collect();

    let today = Utc::now().format("%Y-%m-%d").to_string();
    let mut transactions = Vec::new();

    for record in reader.records() {
        let Ok(record) = record else {
            tracing::warn!("skipping malformed csv record");
            continue;
        };

        let description = description_column
            .and_then(|index| record.get(index))
            .filter(|value| !value.is_empty())
            .unwrap_or("Unknown")
            .to_string();

        let raw_amount = amount_columns.iter().find_map(|(index, hint)| {
            record
                .get(*index)
                .filter(|value| !value.is_empty())
                .map(|value| (value, *hint))
        });

        let (amount, currency) = match raw_amount {
            Some((value, hint)) => {
                let context = AmountContext {
                    column_hint: Some(hint),
                    description: Some(&description),
                };
                let normalized = normalize_amount(value, &context);
                (normalized.amount, Some(normalized.currency))
            }
            None => (0.0, None),
        };

        let date = date_column
            .and_then(|index| record.get(index))
            .and_then(normalize_date)
            .unwrap_or_else(|| today.clone());

        transactions.push(Transaction {
            id: format!("txn_{}", Ulid::new()),
            date,
            description: description.clone(),
            original_description: description,
            amount,
            currency,
        });
    }

    tracing::debug!(rows = transactions.len(), "ingested csv statement");
    Ok(transactions)
}

fn index_by_name(headers: &csv::StringRecord) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (position, name) in headers.iter().enumerate() {
        index.entry(name.trim().to_lowercase()).or_insert(position);
    }
    index
}

fn first_index(index: &HashMap<String, usize>, aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|alias| index.get(*alias).copied())
}

#[cfg(test)]
mod tests {
    use super::ingest_csv;

    #[test]
    fn resolves_standard_headers() {
        let text = "Date,Description,Amount\n2024-01-15,NETFLIX.COM,$15.99\n";
        let result = ingest_csv(text);
        assert!(result.is_ok());
        if let Ok(rows) = result {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].date, "2024-01-15");
            assert_eq!(rows[0].description, "NETFLIX.COM");
            assert_eq!(rows[0].amount, -15.99);
            assert_eq!(rows[0].currency.as_deref(), Some("USD"));
        }
    }

    #[test]
    fn resolves_alias_headers_case_insensitively() {
        let text = "posted,memo,debit\n15/01/2024,SPOTIFY AB,54.990\n";
        let result = ingest_csv(text);
        assert!(result.is_ok());
        if let Ok(rows) = result {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].date, "2024-01-15");
            assert_eq!(rows[0].description, "SPOTIFY AB");
            assert_eq!(rows[0].amount, -54990.0);
            assert_eq!(rows[0].currency.as_deref(), Some("IDR"));
        }
    }

    #[test]
    fn debit_column_forces_outflow_sign() {
        let text = "Date,Description,Debit\n2024-02-01,INDIHOME,315.000\n";
        let result = ingest_csv(text);
        assert!(result.is_ok());
        if let Ok(rows) = result {
            assert_eq!(rows[0].amount, -315000.0);
            assert_eq!(rows[0].currency.as_deref(), Some("IDR"));
        }
    }

    #[test]
    fn missing_description_defaults_to_unknown() {
        let text = "Date,Amount\n2024-01-15,1,500.00\n";
        let result = ingest_csv(text);
        assert!(result.is_ok());
        if let Ok(rows) = result {
            assert_eq!(rows[0].description, "Unknown");
        }
    }

    #[test]
    fn missing_date_column_falls_back_to_today() {
        let text = "Description,Amount\nNETFLIX.COM,\"1,500.00\"\n";
        let result = ingest_csv(text);
        assert!(result.is_ok());
        if let Ok(rows) = result {
            assert_eq!(rows[0].date.len(), 10);
            assert_eq!(rows[0].date.as_bytes()[4], b'-');
        }
    }

    #[test]
    fn unparsable_amount_emits_zero_row_instead_of_failing() {
        let text = "Date,Description,Amount\n2024-01-15,SOMETHING,n/a\n2024-01-16,NETFLIX.COM,$15.99\n";
        let result = ingest_csv(text);
        assert!(result.is_ok());
        if let Ok(rows) = result {
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].amount, 0.0);
            assert_eq!(rows[1].amount, -15.99);
        }
    }

    #[test]
    fn each_row_gets_a_unique_id() {
        let text = "Date,Description,Amount\n2024-01-15,A ROW,$1.00\n2024-01-16,B ROW,$2.00\n";
        let result = ingest_csv(text);
        assert!(result.is_ok());
        if let Ok(rows) = result {
            assert!(rows[0].id.starts_with("txn_"));
            assert!(rows[1].id.starts_with("txn_"));
            assert_ne!(rows[0].id, rows[1].id);
        }
    }

    #[test]
    fn empty_input_yields_no_rows() {
        let result = ingest_csv("");
        assert!(result.is_ok());
        if let Ok(rows) = result {
            assert!(rows.is_empty());
        }
    }
}
