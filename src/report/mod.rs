pub mod json;
pub mod markdown;
pub mod text;

use crate::config::Config;
use crate::pricing::{CostDelta, ModifiedResourceCost, ResourceCost};
use crate::threshold::ThresholdEvaluation;

/// The decorations an analysis can optionally attach to a rendered report.
pub struct ReportContext<'a> {
    pub delta: &'a CostDelta,
    pub config_summary: Option<String>,
    pub threshold_status: Option<&'a ThresholdEvaluation>,
}

/// Formats a signed currency amount: `+$12.34`, `-$12.34`, `$0.00`.
pub fn format_signed_currency(amount: f64) -> String {
    if amount > 0.0 {
        format!("+${amount:.2}")
    } else if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${amount:.2}")
    }
}

pub fn format_currency(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Additions/removals sort descending by amount; ties break by logical id.
pub fn sorted_resource_costs(costs: &[ResourceCost]) -> Vec<&ResourceCost> {
    let mut sorted: Vec<&ResourceCost> = costs.iter().collect();
    sorted.sort_by(|a, b| {
        b.monthly_cost
            .amount
            .partial_cmp(&a.monthly_cost.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.logical_id.cmp(&b.logical_id))
    });
    sorted
}

/// Modifications sort descending by `|costDelta|`; ties break by logical id.
pub fn sorted_modified_costs(costs: &[ModifiedResourceCost]) -> Vec<&ModifiedResourceCost> {
    let mut sorted: Vec<&ModifiedResourceCost> = costs.iter().collect();
    sorted.sort_by(|a, b| {
        b.cost_delta
            .abs()
            .partial_cmp(&a.cost_delta.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.logical_id.cmp(&b.logical_id))
    });
    sorted
}

pub fn render(format: crate::config::OutputFormat, ctx: &ReportContext) -> String {
    match format {
        crate::config::OutputFormat::Text => text::render(ctx),
        crate::config::OutputFormat::Json => json::render(ctx),
        crate::config::OutputFormat::Markdown => markdown::render(ctx),
    }
}

/// The top `n` cost-driving entries across additions and positive
/// modifications, sorted descending by amount.
pub fn top_cost_drivers(delta: &CostDelta, n: usize) -> Vec<(String, f64)> {
    let mut drivers: Vec<(String, f64)> = Vec::new();
    for added in &delta.added_costs {
        drivers.push((added.logical_id.clone(), added.monthly_cost.amount));
    }
    for modified in &delta.modified_costs {
        if modified.cost_delta > 0.0 {
            drivers.push((modified.logical_id.clone(), modified.cost_delta));
        }
    }
    drivers.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    drivers.into_iter().filter(|(_, amount)| *amount > 0.0).take(n).collect()
}

pub fn config_summary(config: &Config) -> String {
    format!(
        "region={}, environment={}, excluded_types={}",
        config.region,
        config.environment,
        config.excluded_resource_types.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_currency_uses_explicit_sign() {
        assert_eq!(format_signed_currency(12.3), "+$12.30");
        assert_eq!(format_signed_currency(-12.3), "-$12.30");
        assert_eq!(format_signed_currency(0.0), "$0.00");
    }
}
