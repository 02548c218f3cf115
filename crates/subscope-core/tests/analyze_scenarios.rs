//! End-to-end detection scenarios over the public API, from raw statement
//! values through amount/date normalization to the analysis result.

use subscope_core::detect::SubscriptionDetector;
use subscope_core::model::Transaction;
use subscope_core::normalize::{AmountContext, normalize_amount, normalize_date};

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
fn known_service_with_repeat_charges_is_detected_once() {
    let detector = SubscriptionDetector::with_builtin_knowledge();
    let transactions = vec![
        transaction("Netflix", -15.00, "2024-01-01"),
        transaction("Netflix", -15.00, "2024-02-01"),
        transaction("Coffee Shop", -5.00, "2024-01-05"),
    ];

    let result = detector.analyze(&transactions);
    assert_eq!(result.subscriptions.len(), 1);
    let subscription = &result.subscriptions[0];
    assert_eq!(subscription.name, "Netflix");
    assert_eq!(subscription.amount, 15.00);
    assert_eq!(subscription.currency, "USD");
    assert_eq!(subscription.confidence, 0.9);
    assert_eq!(result.total_monthly_spend, 15.00);
    assert_eq!(result.yearly_projection, 180.00);
    assert_eq!(result.processed_transactions, 3);
}

#[test]
fn unknown_service_with_stable_amount_is_detected_by_recurrence() {
    let detector = SubscriptionDetector::with_builtin_knowledge();
    let transactions = vec![
        transaction("Mystery Service", -20.0, "2024-01-01"),
        transaction("Mystery Service", -20.0, "2024-02-01"),
    ];

    let result = detector.analyze(&transactions);
    assert_eq!(result.subscriptions.len(), 1);
    assert_eq!(result.subscriptions[0].confidence, 0.6);
    assert_eq!(result.subscriptions[0].name, "Mystery service");
}

#[test]
fn single_unknown_charge_is_not_a_subscription() {
    let detector = SubscriptionDetector::with_builtin_knowledge();
    let transactions = vec![transaction("One time purchase", -50.0, "2024-01-01")];

    let result = detector.analyze(&transactions);
    assert!(result.subscriptions.is_empty());
}

#[test]
fn local_magnitude_charges_settle_on_idr() {
    let detector = SubscriptionDetector::with_builtin_knowledge();
    let transactions = vec![
        transaction("Indihome", -315000.0, "2024-01-05"),
        transaction("Indihome", -315000.0, "2024-02-05"),
    ];

    let result = detector.analyze(&transactions);
    assert_eq!(result.subscriptions.len(), 1);
    assert_eq!(result.subscriptions[0].amount, 315000.0);
    assert_eq!(result.subscriptions[0].currency, "IDR");
    assert_eq!(result.currency, "IDR");
}

#[test]
fn dot_separated_amount_without_comma_reads_as_idr_thousands() {
    let normalized = normalize_amount("150.000", &AmountContext::default());
    assert_eq!(normalized.currency, "IDR");
    assert_eq!(normalized.amount, 150000.0);
}

#[test]
fn comma_thousands_dot_decimal_reads_as_usd() {
    let normalized = normalize_amount("1,500.00", &AmountContext::default());
    assert_eq!(normalized.currency, "USD");
    assert_eq!(normalized.amount, 1500.00);
}

#[test]
fn yearly_projection_is_always_twelve_monthly_spends() {
    let detector = SubscriptionDetector::with_builtin_knowledge();
    let transactions = vec![
        transaction("SPOTIFY AB", -9.99, "2024-01-03"),
        transaction("SPOTIFY AB", -9.99, "2024-02-03"),
        transaction("Mystery Service", -20.0, "2024-01-01"),
        transaction("Mystery Service", -20.0, "2024-02-01"),
    ];

    let result = detector.analyze(&transactions);
    assert_eq!(result.yearly_projection, result.total_monthly_spend * 12.0);
}

#[test]
fn normalized_dates_are_idempotent() {
    let samples = ["2024-03-05", "5/3/2024", "15 Jan 2024", "5 Mei 24"];
    for sample in samples {
        let first = normalize_date(sample);
        assert!(first.is_some(), "failed to normalize {sample}");
        if let Some(first) = first {
            assert_eq!(normalize_date(&first), Some(first.clone()));
        }
    }
}
