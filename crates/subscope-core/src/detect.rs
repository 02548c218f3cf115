use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::knowledge::KnowledgeBase;
use crate::model::{
    AnalysisResult, Frequency, ServiceCategory, Subscription, SubscriptionStatus, Transaction,
};

const KNOWLEDGE_MATCH_CONFIDENCE: f64 = 0.9;
const RECURRENCE_MATCH_CONFIDENCE: f64 = 0.6;

/// Currency in which an untagged large-magnitude amount is assumed to be
/// denominated.
const LOCAL_CURRENCY_THRESHOLD: f64 = 10000.0;

static EMBEDDED_DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{2}/\d{2}").unwrap());
static DIGIT_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Groups transactions by normalized description and classifies each group
/// as a subscription via knowledge-base match or statistical recurrence.
/// The knowledge base is injected at construction; it is immutable shared
/// state, safe to reuse across analyses.
#[derive(Debug, Clone)]
pub struct SubscriptionDetector {
    knowledge: KnowledgeBase,
}

impl SubscriptionDetector {
    pub fn new(knowledge: KnowledgeBase) -> Self {
        Self { knowledge }
    }

    pub fn with_builtin_knowledge() -> Self {
        Self::new(KnowledgeBase::builtin())
    }

    /// Never fails: malformed transactions are excluded, not reported. The
    /// caller-visible "nothing detected" outcome is an empty subscription
    /// list.
    pub fn analyze(&self, transactions: &[Transaction]) -> AnalysisResult {
        let mut groups: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();

        for transaction in transactions {
            // Income is never a subscription charge.
            if transaction.amount > 0.0 {
                continue;
            }
            let normalized = normalize_description(&transaction.description);
            if normalized.len() < 3 {
                continue;
            }
            groups.entry(normalized).or_default().push(transaction);
        }

        let mut subscriptions = Vec::new();
        for (normalized, mut group) in groups {
            group.sort_by(|a, b| b.date.cmp(&a.date));
            if let Some(subscription) = self.classify_group(&normalized, &group) {
                subscriptions.push(subscription);
            }
        }

        let dominant = dominant_currency(&subscriptions);
        let total_monthly_spend: f64 = subscriptions
            .iter()
            .map(|subscription| convert(subscription.amount, &subscription.currency, &dominant))
            .sum();

        subscriptions.sort_by(|a, b| b.amount.total_cmp(&a.amount));

        tracing::debug!(
            subscriptions = subscriptions.len(),
            currency = %dominant,
            "analysis complete"
        );

        AnalysisResult {
            subscriptions,
            total_monthly_spend,
            yearly_projection: total_monthly_spend * 12.0,
            processed_transactions: transactions.len(),
            currency: dominant,
        }
    }

    fn classify_group(&self, normalized: &str, group: &[&Transaction]) -> Option<Subscription> {
        let known = self.knowledge.lookup(normalized);

        if known.is_none() && !is_recurring(group) {
            return None;
        }

        let latest = group.first()?;
        let amount = latest.amount.abs();
        let currency = latest.currency.clone().unwrap_or_else(|| {
            if amount > LOCAL_CURRENCY_THRESHOLD {
                "IDR".to_string()
            } else {
                "USD".to_string()
            }
        });

        Some(match known {
            Some(record) => Subscription {
                id: latest.id.clone(),
                name: record.name.clone(),
                amount,
                currency,
                frequency: Frequency::Monthly,
                last_payment_date: latest.date.clone(),
                logo: Some(record.logo.clone()),
                category: record.category,
                status: SubscriptionStatus::Active,
                confidence: KNOWLEDGE_MATCH_CONFIDENCE,
                cancellation_url: Some(record.cancellation_url.clone()),
                knowledge_id: Some(record.id.clone()),
            },
            None => Subscription {
                id: latest.id.clone(),
                name: capitalize(normalized),
                amount,
                currency,
                frequency: Frequency::Monthly,
                last_payment_date: latest.date.clone(),
                logo: None,
                category: ServiceCategory::Other,
                status: SubscriptionStatus::Active,
                confidence: RECURRENCE_MATCH_CONFIDENCE,
                cancellation_url: None,
                knowledge_id: None,
            },
        })
    }
}

/// Strips embedded dates, digit runs, asterisks, and statement boilerplate
/// so recurring charges with per-month reference codes group together.
pub fn normalize_description(description: &str) -> String {
    let lowered = description.to_lowercase();
    let without_dates = EMBEDDED_DATE.replace_all(&lowered, "");
    let without_digits = DIGIT_RUNS.replace_all(&without_dates, "");
    without_digits
        .replace('*', "")
        .replace("bill payment", "")
        .replace("purchase", "")
        .replace("recurring", "")
        .trim()
        .to_string()
}

/// A group recurs when repeated amounts dominate: the ratio of distinct
/// absolute amounts to group size is at most one half.
fn is_recurring(group: &[&Transaction]) -> bool {
    if group.len() < 2 {
        return false;
    }
    let distinct: BTreeSet<u64> = group
        .iter()
        .map(|transaction| transaction.amount.abs().to_bits())
        .collect();
    distinct.len() as f64 / group.len() as f64 <= 0.5
}

/// Approximate IDR value of one unit, used only to pick a dominant currency
/// and convert totals; not a live exchange rate.
fn rate_to_base(currency: &str) -> f64 {
    match currency {
        "IDR" => 1.0,
        "USD" => 16000.0,
        "EUR" => 17000.0,
        "GBP" => 20000.0,
        "SGD" => 12000.0,
        "AUD" => 10500.0,
        _ => 1.0,
    }
}

fn convert(amount: f64, from: &str, to: &str) -> f64 {
    amount * rate_to_base(from) / rate_to_base(to)
}

fn dominant_currency(subscriptions: &[Subscription]) -> String {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for subscription in subscriptions {
        *totals.entry(subscription.currency.as_str()).or_insert(0.0) += subscription.amount;
    }

    let mut dominant = "USD".to_string();
    let mut best = 0.0;
    for (currency, total) in totals {
        let converted = total * rate_to_base(currency);
        if converted > best {
            best = converted;
            dominant = currency.to_string();
        }
    }
    dominant
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{SubscriptionDetector, normalize_description};
    use crate::knowledge::KnowledgeBase;
    use crate::model::Transaction;

    fn transaction(description: &str, amount: f64, date: &str) -> Transaction {
        Transaction {
            id: format!("txn_{description}_{date}"),
            date: date.to_string(),
            description: description.to_string(),
            original_description: description.to_string(),
            amount,
            currency: None,
        }
    }

    #[test]
    fn normalization_strips_dates_ids_and_boilerplate() {
        assert_eq!(normalize_description("NETFLIX 234234 02/12"), "netflix");
        assert_eq!(normalize_description("SPOTIFY *Premium"), "spotify premium");
        assert_eq!(
            normalize_description("Recurring BILL PAYMENT Indihome"),
            "indihome"
        );
    }

    #[test]
    fn income_is_ignored() {
        let detector = SubscriptionDetector::with_builtin_knowledge();
        let transactions = vec![
            transaction("SALARY NETFLIX LTD", 5000.0, "2024-01-01"),
            transaction("SALARY NETFLIX LTD", 5000.0, "2024-02-01"),
        ];

        let result = detector.analyze(&transactions);
        assert!(result.subscriptions.is_empty());
        assert_eq!(result.processed_transactions, 2);
    }

    #[test]
    fn knowledge_matches_use_canonical_metadata() {
        let detector = SubscriptionDetector::with_builtin_knowledge();
        let transactions = vec![transaction("NETFLIX.COM 8812", -15.0, "2024-01-01")];

        let result = detector.analyze(&transactions);
        assert_eq!(result.subscriptions.len(), 1);
        let subscription = &result.subscriptions[0];
        assert_eq!(subscription.name, "Netflix");
        assert_eq!(subscription.confidence, 0.9);
        assert_eq!(subscription.knowledge_id.as_deref(), Some("netflix"));
        assert!(subscription.logo.is_some());
        assert!(subscription.cancellation_url.is_some());
    }

    #[test]
    fn recurrence_requires_repeated_amounts() {
        let detector = SubscriptionDetector::new(KnowledgeBase::new(Vec::new()));
        let recurring = vec![
            transaction("Mystery Service", -20.0, "2024-01-01"),
            transaction("Mystery Service", -20.0, "2024-02-01"),
        ];
        let varied = vec![
            transaction("Grocery Store", -21.0, "2024-01-01"),
            transaction("Grocery Store", -35.5, "2024-02-01"),
        ];

        let detected = detector.analyze(&recurring);
        assert_eq!(detected.subscriptions.len(), 1);
        assert_eq!(detected.subscriptions[0].confidence, 0.6);
        assert_eq!(detected.subscriptions[0].name, "Mystery service");

        let ignored = detector.analyze(&varied);
        assert!(ignored.subscriptions.is_empty());
    }

    #[test]
    fn latest_transaction_supplies_amount_and_date() {
        let detector = SubscriptionDetector::new(KnowledgeBase::new(Vec::new()));
        let transactions = vec![
            transaction("Mystery Service", -20.0, "2024-01-01"),
            transaction("Mystery Service", -22.0, "2024-03-01"),
            transaction("Mystery Service", -20.0, "2024-02-01"),
            transaction("Mystery Service", -22.0, "2024-04-01"),
        ];

        let result = detector.analyze(&transactions);
        assert_eq!(result.subscriptions.len(), 1);
        assert_eq!(result.subscriptions[0].amount, 22.0);
        assert_eq!(result.subscriptions[0].last_payment_date, "2024-04-01");
    }

    #[test]
    fn untagged_large_amounts_infer_local_currency() {
        let detector = SubscriptionDetector::with_builtin_knowledge();
        let transactions = vec![
            transaction("INDIHOME", -315000.0, "2024-01-05"),
            transaction("INDIHOME", -315000.0, "2024-02-05"),
        ];

        let result = detector.analyze(&transactions);
        assert_eq!(result.subscriptions.len(), 1);
        assert_eq!(result.subscriptions[0].currency, "IDR");
        assert_eq!(result.currency, "IDR");
    }

    #[test]
    fn dominant_currency_favors_largest_converted_total() {
        let detector = SubscriptionDetector::with_builtin_knowledge();
        let mut idr = transaction("INDIHOME", -315000.0, "2024-01-05");
        idr.currency = Some("IDR".to_string());
        let mut usd = transaction("NETFLIX.COM", -15.0, "2024-01-01");
        usd.currency = Some("USD".to_string());

        let result = detector.analyze(&[idr, usd]);
        // 315000 IDR outweighs 15 USD (~240000 IDR).
        assert_eq!(result.currency, "IDR");
    }

    #[test]
    fn empty_input_defaults_to_usd() {
        let detector = SubscriptionDetector::with_builtin_knowledge();
        let result = detector.analyze(&[]);
        assert!(result.subscriptions.is_empty());
        assert_eq!(result.currency, "USD");
        assert_eq!(result.total_monthly_spend, 0.0);
        assert_eq!(result.yearly_projection, 0.0);
    }

    #[test]
    fn subscriptions_sort_descending_by_raw_amount() {
        let detector = SubscriptionDetector::new(KnowledgeBase::new(Vec::new()));
        let transactions = vec![
            transaction("Small Service", -5.0, "2024-01-01"),
            transaction("Small Service", -5.0, "2024-02-01"),
            transaction("Big Service", -50.0, "2024-01-01"),
            transaction("Big Service", -50.0, "2024-02-01"),
        ];

        let result = detector.analyze(&transactions);
        assert_eq!(result.subscriptions.len(), 2);
        assert_eq!(result.subscriptions[0].name, "Big service");
        assert_eq!(result.subscriptions[1].name, "Small service");
    }
}
