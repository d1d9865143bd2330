//! Human-readable report, colorized the way the CLI's other commands are.

use super::{format_currency, format_signed_currency, sorted_modified_costs, sorted_resource_costs, ReportContext};
use colored::Colorize;

pub fn render(ctx: &ReportContext) -> String {
    let delta = ctx.delta;
    let mut out = String::new();

    if delta.is_empty() {
        out.push_str(&format!("{}\n", "No resource changes detected".bold()));
        return out;
    }

    out.push_str(&format!("{}\n", "COST DELTA".bold()));
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    let total_str = format_signed_currency(delta.total_delta);
    let colored_total = if delta.total_delta > 0.0 {
        total_str.bright_red()
    } else if delta.total_delta < 0.0 {
        total_str.bright_green()
    } else {
        total_str.normal()
    };
    out.push_str(&format!("  {}  {}/month\n\n", "TOTAL:".bold(), colored_total));

    if let Some(summary) = &ctx.config_summary {
        out.push_str(&format!("{}\n  {summary}\n\n", "CONFIGURATION".bold()));
    }

    if let Some(status) = ctx.threshold_status {
        let level_str = match status.level {
            crate::threshold::Level::Error => "EXCEEDED".bright_red().bold(),
            crate::threshold::Level::Warning => "WARNING".yellow().bold(),
            crate::threshold::Level::None => "OK".green().bold(),
        };
        out.push_str(&format!("{}\n  [{level_str}] {}\n", "THRESHOLD STATUS".bold(), status.message));
        for rec in &status.recommendations {
            out.push_str(&format!("  - {rec}\n"));
        }
        out.push('\n');
    }

    if !delta.added_costs.is_empty() {
        out.push_str(&format!("{}\n", "ADDED RESOURCES".bold()));
        for r in sorted_resource_costs(&delta.added_costs) {
            out.push_str(&format!(
                "  {} ({}): {} [{:?}]\n",
                r.logical_id,
                r.resource_type,
                format_currency(r.monthly_cost.amount),
                r.monthly_cost.confidence
            ));
        }
        out.push('\n');
    }

    if !delta.removed_costs.is_empty() {
        out.push_str(&format!("{}\n", "REMOVED RESOURCES".bold()));
        for r in sorted_resource_costs(&delta.removed_costs) {
            out.push_str(&format!(
                "  {} ({}): {} [{:?}]\n",
                r.logical_id,
                r.resource_type,
                format_currency(r.monthly_cost.amount),
                r.monthly_cost.confidence
            ));
        }
        out.push('\n');
    }

    if !delta.modified_costs.is_empty() {
        out.push_str(&format!("{}\n", "MODIFIED RESOURCES".bold()));
        for m in sorted_modified_costs(&delta.modified_costs) {
            out.push_str(&format!(
                "  {} ({}): {} \u{2192} {} ( {} )\n",
                m.logical_id,
                m.resource_type,
                format_currency(m.old_monthly_cost.amount),
                format_currency(m.new_monthly_cost.amount),
                format_signed_currency(m.cost_delta)
            ));
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::CostDelta;

    #[test]
    fn empty_delta_reports_no_changes() {
        let delta = CostDelta::default();
        let ctx = ReportContext {
            delta: &delta,
            config_summary: None,
            threshold_status: None,
        };
        assert!(render(&ctx).contains("No resource changes detected"));
    }

    #[test]
    fn currency_literals_match_expected_pattern() {
        use crate::pricing::{Confidence, MonthlyCost, ResourceCost};
        let delta = CostDelta {
            total_delta: 12.5,
            currency: "USD".to_string(),
            added_costs: vec![ResourceCost {
                logical_id: "Bucket1".into(),
                resource_type: "AWS::S3::Bucket".into(),
                monthly_cost: MonthlyCost {
                    amount: 12.5,
                    currency: "USD".into(),
                    confidence: Confidence::Medium,
                    assumptions: vec![],
                },
            }],
            removed_costs: vec![],
            modified_costs: vec![],
        };
        let ctx = ReportContext {
            delta: &delta,
            config_summary: None,
            threshold_status: None,
        };
        let rendered = render(&ctx);
        assert!(rendered.contains("$12.50"));
        assert!(rendered.contains("+$12.50"));
    }
}
