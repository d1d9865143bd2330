//! Markdown report for pull-request comments.

use super::{
    format_currency, format_signed_currency, sorted_modified_costs, sorted_resource_costs, top_cost_drivers,
    ReportContext,
};

pub fn render(ctx: &ReportContext) -> String {
    let delta = ctx.delta;
    let mut out = String::new();

    out.push_str("# CloudFormation Cost Delta\n\n");

    if delta.is_empty() {
        out.push_str("No resource changes detected\n");
        return out;
    }

    out.push_str(&format!("**Total monthly delta: {}**\n\n", format_signed_currency(delta.total_delta)));

    if let Some(summary) = &ctx.config_summary {
        out.push_str("<details>\n<summary>Configuration</summary>\n\n");
        out.push_str(&format!("{summary}\n\n"));
        out.push_str("</details>\n\n");
    }

    if let Some(status) = ctx.threshold_status {
        let heading = match status.level {
            crate::threshold::Level::Error => "## :no_entry: Threshold EXCEEDED",
            crate::threshold::Level::Warning => "## :warning: Threshold Warning",
            crate::threshold::Level::None => "## :white_check_mark: Threshold OK",
        };
        out.push_str(&format!("{heading}\n\n{}\n\n", status.message));
    }

    let drivers = top_cost_drivers(delta, 3);
    if !drivers.is_empty() {
        out.push_str("## Top Cost Contributors\n\n| Logical ID | Monthly Impact |\n|---|---|\n");
        for (id, amount) in &drivers {
            out.push_str(&format!("| {id} | {} |\n", format_signed_currency(*amount)));
        }
        out.push('\n');
    }

    if !delta.added_costs.is_empty() {
        out.push_str("## Added Resources\n\n| Logical ID | Type | Monthly Cost |\n|---|---|---|\n");
        for r in sorted_resource_costs(&delta.added_costs) {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                r.logical_id,
                r.resource_type,
                format_currency(r.monthly_cost.amount)
            ));
        }
        out.push('\n');
    }

    if !delta.removed_costs.is_empty() {
        out.push_str("## Removed Resources\n\n| Logical ID | Type | Monthly Cost |\n|---|---|---|\n");
        for r in sorted_resource_costs(&delta.removed_costs) {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                r.logical_id,
                r.resource_type,
                format_currency(r.monthly_cost.amount)
            ));
        }
        out.push('\n');
    }

    if !delta.modified_costs.is_empty() {
        out.push_str("## Modified Resources\n\n| Logical ID | Type | Old | New | Delta |\n|---|---|---|---|---|\n");
        for m in sorted_modified_costs(&delta.modified_costs) {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
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
