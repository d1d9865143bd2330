use super::Calculator;
use crate::config::Config;
use crate::pricing::cache::PriceQueryParams;
use crate::pricing::client::PricingClient;
use crate::pricing::region::location_name;
use crate::pricing::{Confidence, MonthlyCost};
use crate::template::ResourceWithId;
use async_trait::async_trait;

const DEFAULT_INVOCATIONS_PER_MONTH: f64 = 1_000_000.0;
const DEFAULT_DURATION_MS: f64 = 200.0;
const FALLBACK_PRICE_PER_GB_SECOND: f64 = 0.0000166667;
const FALLBACK_PRICE_PER_REQUEST: f64 = 0.0000002;

/// GB-seconds and billable requests for a month of invocations. No free-tier
/// deduction: this prices the resource's own usage, not an account-wide
/// allowance shared with everything else in it.
fn billable_units(memory_mb: f64, invocations: f64, duration_ms: f64) -> (f64, f64) {
    let gb_seconds = invocations * duration_ms / 1000.0 * (memory_mb / 1024.0);
    (gb_seconds, invocations)
}

pub struct LambdaFunctionCalculator;

#[async_trait]
impl Calculator for LambdaFunctionCalculator {
    fn supports(&self, resource_type: &str) -> bool {
        resource_type == "AWS::Lambda::Function"
    }

    async fn calculate_cost(
        &self,
        resource: &ResourceWithId,
        region: &str,
        client: &PricingClient,
        config: &Config,
        _siblings: &[ResourceWithId],
    ) -> MonthlyCost {
        let memory_mb = resource
            .properties
            .get("MemorySize")
            .and_then(|v| v.as_f64())
            .unwrap_or(128.0);

        let invocations = config
            .usage_assumptions
            .lambda_invocations_per_month
            .unwrap_or(DEFAULT_INVOCATIONS_PER_MONTH);
        let duration_ms = config
            .usage_assumptions
            .lambda_avg_duration_ms
            .unwrap_or(DEFAULT_DURATION_MS);

        let (billable_gb_seconds, billable_requests) = billable_units(memory_mb, invocations, duration_ms);

        let compute_params = PriceQueryParams::new(
            "AWSLambda",
            location_name(region),
            vec![("group".to_string(), "AWS-Lambda-Duration".to_string())],
        );
        let request_params = PriceQueryParams::new(
            "AWSLambda",
            location_name(region),
            vec![("group".to_string(), "AWS-Lambda-Requests".to_string())],
        );

        let compute_price = client.get_price(&compute_params).await;
        let request_price = client.get_price(&request_params).await;

        let (price_per_gb_second, price_per_request, confidence, catalog_hit) = match (compute_price, request_price) {
            (Some(c), Some(r)) => (c, r, Confidence::Medium, true),
            _ => (FALLBACK_PRICE_PER_GB_SECOND, FALLBACK_PRICE_PER_REQUEST, Confidence::Low, false),
        };

        let amount = billable_gb_seconds * price_per_gb_second + billable_requests * price_per_request;

        let mut assumptions = vec![format!(
            "Lambda: {invocations:.0} invocations/month at {duration_ms:.0} ms, {memory_mb:.0} MB"
        )];
        if !catalog_hit {
            assumptions.push("catalog unavailable, using fallback per-GB-second and per-request rates".to_string());
        }

        MonthlyCost {
            amount: amount.max(0.0),
            currency: "USD".to_string(),
            confidence,
            assumptions,
        }
    }
}
