use chrono::{Datelike, Utc};

const MONTH_NAMES: &[(&str, u32)] = &[
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
    // Indonesian month names that differ from the English prefixes.
    ("mei", 5),
    ("agustus", 8),
    ("oktober", 10),
    ("desember", 12),
];

/// Canonicalizes a raw date token to ISO `YYYY-MM-DD`. Returns `None` when
/// the token cannot be structurally validated; callers skip the record
/// instead of emitting a garbage date.
pub fn normalize_date(raw: &str) -> Option<String> {
    normalize_date_with_year(raw, Utc::now().year())
}

pub fn normalize_date_with_year(raw: &str, current_year: i32) -> Option<String> {
    let mut clean = raw.trim().to_string();
    if clean.ends_with('.') || clean.ends_with(',') {
        clean.pop();
    }

    if clean.chars().any(|ch| ch.is_ascii_alphabetic()) {
        if let Some(date) = parse_named_month(&clean, current_year) {
            return Some(date);
        }
    }

    parse_numeric(&clean, current_year)
}

fn parse_named_month(clean: &str, current_year: i32) -> Option<String> {
    let without_commas = clean.replace(',', "");
    let parts: Vec<&str> = without_commas
        .split(|ch: char| ch.is_whitespace() || ch == '-')
        .filter(|part| !part.is_empty())
        .collect();
    if parts.len() < 2 {
        return None;
    }

    let mut day_token = parts[0];
    let mut month_token = parts[1];
    // "Jan 20" style: the month name leads.
    if day_token.parse::<u32>().is_err() && month_token.parse::<u32>().is_ok() {
        std::mem::swap(&mut day_token, &mut month_token);
    }

    let month = lookup_month(month_token)?;
    let day = day_token.parse::<u32>().ok()?;
    if day == 0 || day > 31 {
        return None;
    }

    let year = match parts.get(2) {
        Some(token) => expand_year(token)?,
        None => current_year,
    };

    Some(format!("{year:04}-{month:02}-{day:02}"))
}

fn lookup_month(token: &str) -> Option<u32> {
    let lower = token.to_lowercase();
    let prefix: String = lower.chars().take(3).collect();

    MONTH_NAMES
        .iter()
        .find(|(name, _)| *name == prefix)
        .or_else(|| MONTH_NAMES.iter().find(|(name, _)| *name == lower))
        .map(|(_, month)| *month)
}

fn parse_numeric(clean: &str, current_year: i32) -> Option<String> {
    let separator = clean.chars().find(|ch| matches!(ch, '/' | '-' | '.'))?;
    let parts: Vec<&str> = clean.split(separator).collect();

    let (day, month, year) = match parts.as_slice() {
        [first, second, third] => {
            if first.len() == 4 {
                (*third, *second, expand_year(first)?)
            } else {
                (*first, *second, expand_year(third)?)
            }
        }
        [first, second] => (*first, *second, current_year),
        _ => return None,
    };

    let day = day.trim().parse::<u32>().ok()?;
    let month = month.trim().parse::<u32>().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    Some(format!("{year:04}-{month:02}-{day:02}"))
}

fn expand_year(token: &str) -> Option<i32> {
    let trimmed = token.trim();
    let value = trimmed.parse::<i32>().ok()?;
    if trimmed.len() == 2 {
        return Some(2000 + value);
    }
    Some(value)
}
