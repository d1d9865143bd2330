use super::Calculator;
use crate::config::Config;
use crate::pricing::cache::PriceQueryParams;
use crate::pricing::client::PricingClient;
use crate::pricing::region::location_name;
use crate::pricing::{Confidence, MonthlyCost};
use crate::template::ResourceWithId;
use async_trait::async_trait;

const HOURS_PER_MONTH: f64 = 730.0;
const DEFAULT_DATA_PROCESSED_GB: f64 = 100.0;
const FALLBACK_HOURLY: f64 = 0.045;
const FALLBACK_PER_GB: f64 = 0.045;

pub struct NatGatewayCalculator;

#[async_trait]
impl Calculator for NatGatewayCalculator {
    fn supports(&self, resource_type: &str) -> bool {
        resource_type == "AWS::EC2::NatGateway"
    }

    async fn calculate_cost(
        &self,
        _resource: &ResourceWithId,
        region: &str,
        client: &PricingClient,
        config: &Config,
        _siblings: &[ResourceWithId],
    ) -> MonthlyCost {
        let data_gb = config
            .usage_assumptions
            .nat_gateway_data_processed_gb
            .unwrap_or(DEFAULT_DATA_PROCESSED_GB);

        let hourly_params = PriceQueryParams::new(
            "AmazonVPC",
            location_name(region),
            vec![("group".to_string(), "NGW:NatGateway".to_string())],
        );
        let data_params = PriceQueryParams::new(
            "AmazonVPC",
            location_name(region),
            vec![("group".to_string(), "NGW:NatGatewayData".to_string())],
        );

        let hourly = client.get_price(&hourly_params).await;
        let per_gb = client.get_price(&data_params).await;
        let catalog_hit = hourly.is_some() && per_gb.is_some();

        let amount =
            hourly.unwrap_or(FALLBACK_HOURLY) * HOURS_PER_MONTH + data_gb * per_gb.unwrap_or(FALLBACK_PER_GB);

        let mut assumptions = vec![format!("{data_gb:.0} GB/month data processed")];
        if !catalog_hit {
            assumptions.push("catalog unavailable, using fallback hourly and per-GB rates".to_string());
        }

        MonthlyCost {
            amount,
            currency: "USD".to_string(),
            confidence: if catalog_hit { Confidence::Medium } else { Confidence::Low },
            assumptions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supports_nat_gateway_only() {
        assert!(NatGatewayCalculator.supports("AWS::EC2::NatGateway"));
        assert!(!NatGatewayCalculator.supports("AWS::EC2::InternetGateway"));
    }
}
