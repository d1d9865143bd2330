//! Machine-readable report: the `CostDelta` verbatim plus optional
//! decorations, stable key order, two-space indent.

use super::ReportContext;
use serde_json::json;

pub fn render(ctx: &ReportContext) -> String {
    let mut value = json!({
        "totalDelta": ctx.delta.total_delta,
        "currency": ctx.delta.currency,
        "addedCosts": ctx.delta.added_costs,
        "removedCosts": ctx.delta.removed_costs,
        "modifiedCosts": ctx.delta.modified_costs,
    });

    if let Some(summary) = &ctx.config_summary {
        value["configSummary"] = json!(summary);
    }
    if let Some(status) = ctx.threshold_status {
        value["thresholdStatus"] = serde_json::to_value(status).expect("ThresholdEvaluation always serializes");
    }

    serde_json::to_string_pretty(&value).expect("json! value always serializes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::CostDelta;

    #[test]
    fn empty_delta_serializes_to_empty_structure() {
        let delta = CostDelta::default();
        let ctx = ReportContext {
            delta: &delta,
            config_summary: None,
            threshold_status: None,
        };
        let rendered = render(&ctx);
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["totalDelta"], 0.0);
        assert!(parsed["addedCosts"].as_array().unwrap().is_empty());
    }

    #[test]
    fn config_summary_is_included_when_present() {
        let delta = CostDelta::default();
        let ctx = ReportContext {
            delta: &delta,
            config_summary: Some("region=us-east-1".to_string()),
            threshold_status: None,
        };
        let rendered = render(&ctx);
        assert!(rendered.contains("configSummary"));
        assert!(rendered.contains("region=us-east-1"));
    }
}
