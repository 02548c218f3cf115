use serde::{Deserialize, Serialize};

/// A normalized statement row. Dates are canonical ISO `YYYY-MM-DD` strings,
/// so lexicographic order equals chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: String,
    pub description: String,
    pub original_description: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl Transaction {
    pub fn abs_amount(&self) -> f64 {
        self.amount.abs()
    }

    pub fn is_outflow(&self) -> bool {
        self.amount < 0.0
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum ServiceCategory {
    Entertainment,
    Software,
    Utilities,
    Lifestyle,
    Other,
}

impl ServiceCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            ServiceCategory::Entertainment => "Entertainment",
            ServiceCategory::Software => "Software",
            ServiceCategory::Utilities => "Utilities",
            ServiceCategory::Lifestyle => "Lifestyle",
            ServiceCategory::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum CancellationMethod {
    Online,
    Phone,
    Email,
    Letter,
}

impl CancellationMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            CancellationMethod::Online => "Online",
            CancellationMethod::Phone => "Phone",
            CancellationMethod::Email => "Email",
            CancellationMethod::Letter => "Letter",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
    Unknown,
}

impl SubscriptionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "Active",
            SubscriptionStatus::Cancelled => "Cancelled",
            SubscriptionStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Frequency {
    Monthly,
    Yearly,
    Weekly,
    Unknown,
}

impl Frequency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
            Frequency::Weekly => "Weekly",
            Frequency::Unknown => "Unknown",
        }
    }
}

/// A cheaper plan the service itself offers, surfaced next to the
/// cancellation guidance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAlternative {
    pub name: String,
    pub price: String,
    pub savings: String,
}

/// One curated record in the service knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceKnowledge {
    pub id: String,
    pub name: String,
    pub category: ServiceCategory,
    pub logo: String,
    pub cancellation_url: String,
    pub cancellation_method: CancellationMethod,
    pub steps: Vec<String>,
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downgrade_options: Option<Vec<ServiceAlternative>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub currency: String,
    pub frequency: Frequency,
    pub last_payment_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub category: ServiceCategory,
    pub status: SubscriptionStatus,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub subscriptions: Vec<Subscription>,
    pub total_monthly_spend: f64,
    pub yearly_projection: f64,
    pub processed_transactions: usize,
    pub currency: String,
}
