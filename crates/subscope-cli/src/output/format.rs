use std::cmp;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub name: &'a str,
    pub align: Align,
}

const INDENT: usize = 2;
const COLUMN_GAP: usize = 2;

pub fn terminal_width() -> usize {
    let from_env = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(120);
    cmp::max(from_env, 40)
}

pub fn key_value_rows(entries: &[(&str, String)], indent: usize) -> Vec<String> {
    if entries.is_empty() {
        return Vec::new();
    }

    let label_width = entries
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);
    let padding = " ".repeat(indent);

    entries
        .iter()
        .map(|(label, value)| format!("{padding}{label:<label_width$}  {value}"))
        .collect()
}

/// Renders rows as an aligned table when the natural column widths fit the
/// terminal, otherwise as labeled per-row blocks. Cell values are never
/// truncated or wrapped.
pub fn render_table_or_blocks(
    columns: &[Column<'_>],
    rows: &[Vec<String>],
    max_width: usize,
    block_label: &str,
) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }

    let widths = natural_column_widths(columns, rows);
    let needed =
        INDENT + widths.iter().sum::<usize>() + COLUMN_GAP * columns.len().saturating_sub(1);
    if needed > max_width {
        return render_blocks(columns, rows, block_label);
    }

    let mut output = Vec::new();
    let header = columns
        .iter()
        .map(|column| column.name.to_string())
        .collect::<Vec<String>>();
    output.push(format_row(columns, &header, &widths));

    for row in rows {
        output.push(format_row(columns, row, &widths));
    }

    output
}

fn natural_column_widths(columns: &[Column<'_>], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths = columns
        .iter()
        .map(|column| column.name.len())
        .collect::<Vec<usize>>();

    for row in rows {
        for (index, value) in row.iter().enumerate() {
            if let Some(slot) = widths.get_mut(index) {
                *slot = cmp::max(*slot, value.chars().count());
            }
        }
    }

    widths
}

fn format_row(columns: &[Column<'_>], cells: &[String], widths: &[usize]) -> String {
    let mut pieces = Vec::with_capacity(columns.len());
    for (index, column) in columns.iter().enumerate() {
        let width = *widths.get(index).unwrap_or(&0);
        let value = cells.get(index).cloned().unwrap_or_default();

        let piece = match column.align {
            Align::Left => format!("{value:<width$}"),
            Align::Right => format!("{value:>width$}"),
        };
        pieces.push(piece);
    }

    format!("{}{}", " ".repeat(INDENT), pieces.join("  "))
}

fn render_blocks(columns: &[Column<'_>], rows: &[Vec<String>], block_label: &str) -> Vec<String> {
    if rows.is_empty() {
        return Vec::new();
    }

    let labels = columns
        .iter()
        .map(|column| format!("{}:", column.name))
        .collect::<Vec<String>>();
    let label_width = labels.iter().map(|label| label.len()).max().unwrap_or(0);

    let mut output = Vec::new();
    for (row_index, row) in rows.iter().enumerate() {
        output.push(format!("  {block_label} {}:", row_index + 1));

        for (column_index, label) in labels.iter().enumerate() {
            let value = row.get(column_index).cloned().unwrap_or_default();
            output.push(format!("    {label:<label_width$}  {value}"));
        }

        if row_index + 1 < rows.len() {
            output.push(String::new());
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::{Align, Column, key_value_rows, render_table_or_blocks};

    #[test]
    fn key_value_rows_align_labels() {
        let rows = key_value_rows(
            &[
                ("Total monthly:", "15.00 USD".to_string()),
                ("Yearly:", "180.00 USD".to_string()),
            ],
            2,
        );

        assert_eq!(rows[0], "  Total monthly:  15.00 USD");
        assert_eq!(rows[1], "  Yearly:         180.00 USD");
    }

    #[test]
    fn table_renderer_aligns_columns_when_width_is_sufficient() {
        let columns = [
            Column {
                name: "Service",
                align: Align::Left,
            },
            Column {
                name: "Amount",
                align: Align::Right,
            },
        ];
        let rows = vec![vec!["Netflix".to_string(), "15.00 USD".to_string()]];

        let rendered = render_table_or_blocks(&columns, &rows, 80, "Subscription");
        assert!(rendered[0].contains("Service"));
        assert!(rendered[0].contains("Amount"));
        assert!(rendered[1].contains("Netflix"));
        assert!(rendered[1].contains("15.00 USD"));
    }

    #[test]
    fn narrow_width_falls_back_to_blocks() {
        let columns = [
            Column {
                name: "Service",
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
        ];
        let rows = vec![vec![
            "Adobe Creative Cloud".to_string(),
            "899.000 IDR".to_string(),
            "2024-02-01".to_string(),
        ]];

        let rendered = render_table_or_blocks(&columns, &rows, 20, "Subscription");
        assert_eq!(rendered[0], "  Subscription 1:");
        assert!(rendered[1].contains("Service:"));
        assert!(rendered[2].contains("Amount:"));
        assert!(rendered[3].contains("Last Payment:"));
    }

    #[test]
    fn empty_columns_render_nothing() {
        let rendered = render_table_or_blocks(&[], &[], 80, "Row");
        assert!(rendered.is_empty());
    }
}
