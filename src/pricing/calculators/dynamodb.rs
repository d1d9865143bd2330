use super::Calculator;
use crate::config::Config;
use crate::pricing::cache::PriceQueryParams;
use crate::pricing::client::PricingClient;
use crate::pricing::region::location_name;
use crate::pricing::{Confidence, MonthlyCost};
use crate::template::ResourceWithId;
use async_trait::async_trait;

const HOURS_PER_MONTH: f64 = 730.0;
const DEFAULT_RCU: f64 = 5.0;
const DEFAULT_WCU: f64 = 5.0;
const FALLBACK_RCU_HOURLY: f64 = 0.00013;
const FALLBACK_WCU_HOURLY: f64 = 0.00065;

pub struct DynamoDbTableCalculator;

#[async_trait]
impl Calculator for DynamoDbTableCalculator {
    fn supports(&self, resource_type: &str) -> bool {
        resource_type == "AWS::DynamoDB::Table"
    }

    async fn calculate_cost(
        &self,
        resource: &ResourceWithId,
        region: &str,
        client: &PricingClient,
        config: &Config,
        _siblings: &[ResourceWithId],
    ) -> MonthlyCost {
        let billing_mode = resource
            .properties
            .get("BillingMode")
            .and_then(|v| v.as_str())
            .unwrap_or("PROVISIONED");

        if billing_mode == "PAY_PER_REQUEST" {
            return MonthlyCost {
                amount: 0.0,
                currency: "USD".to_string(),
                confidence: Confidence::Low,
                assumptions: vec![
                    "on-demand DynamoDB billing depends on traffic; no static monthly estimate available"
                        .to_string(),
                ],
            };
        }

        let (rcu, wcu) = resource
            .properties
            .get("ProvisionedThroughput")
            .and_then(|v| v.as_object())
            .map(|t| {
                (
                    t.get("ReadCapacityUnits").and_then(|v| v.as_f64()).unwrap_or(DEFAULT_RCU),
                    t.get("WriteCapacityUnits").and_then(|v| v.as_f64()).unwrap_or(DEFAULT_WCU),
                )
            })
            .unwrap_or((
                config.usage_assumptions.dynamodb_read_request_units.unwrap_or(DEFAULT_RCU),
                config.usage_assumptions.dynamodb_write_request_units.unwrap_or(DEFAULT_WCU),
            ));

        let rcu_params = PriceQueryParams::new(
            "AmazonDynamoDB",
            location_name(region),
            vec![("group".to_string(), "DDB-ReadUnits".to_string())],
        );
        let wcu_params = PriceQueryParams::new(
            "AmazonDynamoDB",
            location_name(region),
            vec![("group".to_string(), "DDB-WriteUnits".to_string())],
        );

        let rcu_hourly = client.get_price(&rcu_params).await;
        let wcu_hourly = client.get_price(&wcu_params).await;
        let catalog_hit = rcu_hourly.is_some() && wcu_hourly.is_some();

        let amount = rcu * rcu_hourly.unwrap_or(FALLBACK_RCU_HOURLY) * HOURS_PER_MONTH
            + wcu * wcu_hourly.unwrap_or(FALLBACK_WCU_HOURLY) * HOURS_PER_MONTH;

        let mut assumptions = vec![format!("Provisioned: {rcu:.0} RCU, {wcu:.0} WCU")];
        if !catalog_hit {
            assumptions.push("catalog unavailable, using fallback per-unit rates".to_string());
        }

        MonthlyCost {
            amount,
            currency: "USD".to_string(),
            confidence: if catalog_hit { Confidence::Medium } else { Confidence::Low },
            assumptions,
        }
    }
}
