pub mod cache;
pub mod calculators;
pub mod client;
pub mod region;
pub mod service;

use serde::{Deserialize, Serialize};

/// Confidence in a calculated cost, from fully deterministic to "we have no
/// idea, this is a zero placeholder".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Unknown,
    Low,
    Medium,
    High,
}

/// A single resource's estimated monthly cost.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCost {
    pub amount: f64,
    pub currency: String,
    pub confidence: Confidence,
    pub assumptions: Vec<String>,
}

impl MonthlyCost {
    pub fn zero_unknown(reason: impl Into<String>) -> Self {
        Self {
            amount: 0.0,
            currency: "USD".to_string(),
            confidence: Confidence::Unknown,
            assumptions: vec![reason.into()],
        }
    }

    pub fn excluded() -> Self {
        Self {
            amount: 0.0,
            currency: "USD".to_string(),
            confidence: Confidence::High,
            assumptions: vec!["excluded by configuration".to_string()],
        }
    }
}

/// Cost of a single modified resource, old and new side by side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedResourceCost {
    pub logical_id: String,
    pub resource_type: String,
    pub old_monthly_cost: MonthlyCost,
    pub new_monthly_cost: MonthlyCost,
    pub cost_delta: f64,
}

/// A priced addition or removal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCost {
    pub logical_id: String,
    pub resource_type: String,
    pub monthly_cost: MonthlyCost,
}

/// The full cost impact of a resource diff.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CostDelta {
    pub total_delta: f64,
    pub currency: String,
    pub added_costs: Vec<ResourceCost>,
    pub removed_costs: Vec<ResourceCost>,
    pub modified_costs: Vec<ModifiedResourceCost>,
}

impl CostDelta {
    pub fn is_empty(&self) -> bool {
        self.total_delta == 0.0
            && self.added_costs.is_empty()
            && self.removed_costs.is_empty()
            && self.modified_costs.is_empty()
    }
}

pub use cache::CacheManager;
pub use client::PricingClient;
pub use service::PricingService;
