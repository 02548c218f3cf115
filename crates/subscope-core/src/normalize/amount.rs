/// Which statement column a raw amount came from. Drives the sign convention:
/// debit columns list outflows as positive numbers, credit columns list
/// inflows, and a generic amount column is assumed to be an expense list.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ColumnHint {
    Debit,
    Credit,
    Amount,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AmountContext<'a> {
    pub column_hint: Option<ColumnHint>,
    pub description: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedAmount {
    pub amount: f64,
    pub currency: String,
}

const LOCAL_PAYMENT_KEYWORDS: &[&str] = &[
    "qris",
    "gopay",
    "ovo",
    "dana",
    "shopeepay",
    "linkaja",
    "langganan",
    "tagihan",
    "biaya admin",
    "transfer fee",
    "pulsa",
    "token listrik",
];

/// Parses a raw amount token of unknown locale convention into a signed value
/// and an inferred currency. The inference steps are strictly ordered;
/// reordering them changes the outcome for ambiguous inputs. Unparsable
/// tokens come back as amount `0.0`, never an error.
pub fn normalize_amount(raw: &str, context: &AmountContext<'_>) -> NormalizedAmount {
    let currency = explicit_marker(raw)
        .or_else(|| keyword_currency(context.description))
        .or_else(|| separator_currency(raw))
        .unwrap_or_else(|| magnitude_currency(raw));

    let parsed = parse_with_convention(raw, currency);
    let amount = match context.column_hint {
        Some(ColumnHint::Debit) | Some(ColumnHint::Amount) => -parsed.abs(),
        Some(ColumnHint::Credit) => parsed.abs(),
        None => parsed,
    };

    NormalizedAmount {
        amount,
        currency: currency.to_string(),
    }
}

fn explicit_marker(raw: &str) -> Option<&'static str> {
    let upper = raw.to_uppercase();
    if raw.contains("Rp") || upper.contains("IDR") {
        return Some("IDR");
    }
    if raw.contains('€') || upper.contains("EUR") {
        return Some("EUR");
    }
    if raw.contains('£') || upper.contains("GBP") {
        return Some("GBP");
    }
    if raw.contains('$') || upper.contains("USD") {
        return Some("USD");
    }
    None
}

fn keyword_currency(description: Option<&str>) -> Option<&'static str> {
    let text = description?.to_lowercase();
    LOCAL_PAYMENT_KEYWORDS
        .iter()
        .any(|keyword| text.contains(keyword))
        .then_some("IDR")
}

fn separator_currency(raw: &str) -> Option<&'static str> {
    let dots = raw.matches('.').count();
    let commas = raw.matches(',').count();

    if dots > 0 && commas == 0 {
        return Some("IDR");
    }
    if dots > 0 && commas > 0 {
        let comma_last = raw.rfind(',') > raw.rfind('.');
        return Some(if comma_last { "IDR" } else { "USD" });
    }
    if commas > 0 {
        let trailing = raw.rsplit(',').next().map(trailing_digit_count)?;
        return Some(if trailing == 3 { "USD" } else { "IDR" });
    }
    None
}

fn magnitude_currency(raw: &str) -> &'static str {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    match digits.parse::<f64>() {
        Ok(value) if value > 1000.0 => "IDR",
        _ => "USD",
    }
}

fn trailing_digit_count(segment: &str) -> usize {
    segment.chars().filter(char::is_ascii_digit).count()
}

fn parse_with_convention(raw: &str, currency: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, '.' | ',' | '-'))
        .collect();

    let dots = cleaned.matches('.').count();
    let commas = cleaned.matches(',').count();
    let comma_decimal_locale = matches!(currency, "IDR" | "EUR");

    let numeric = if dots > 0 && commas > 0 {
        if cleaned.rfind(',') > cleaned.rfind('.') {
            cleaned.replace('.', "").replace(',', ".")
        } else {
            cleaned.replace(',', "")
        }
    } else if dots > 0 {
        if comma_decimal_locale || dots > 1 {
            cleaned.replace('.', "")
        } else {
            cleaned
        }
    } else if commas > 0 {
        let trailing = cleaned
            .rsplit(',')
            .next()
            .map(trailing_digit_count)
            .unwrap_or(0);
        if trailing == 3 {
            cleaned.replace(',', "")
        } else {
            cleaned.replace(',', ".")
        }
    } else {
        cleaned
    };

    numeric.parse::<f64>().unwrap_or(0.0)
}
