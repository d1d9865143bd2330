use super::Calculator;
use crate::config::Config;
use crate::pricing::cache::PriceQueryParams;
use crate::pricing::client::PricingClient;
use crate::pricing::region::location_name;
use crate::pricing::{Confidence, MonthlyCost};
use crate::template::ResourceWithId;
use async_trait::async_trait;

const HOURS_PER_MONTH: f64 = 730.0;
const DEFAULT_STORAGE_GB: f64 = 20.0;
const FALLBACK_STORAGE_PRICE_PER_GB: f64 = 0.115;

fn fallback_hourly_rate(instance_class: &str) -> Option<f64> {
    match instance_class {
        "db.t3.micro" => Some(0.017),
        "db.t3.small" => Some(0.034),
        "db.m5.large" => Some(0.171),
        _ => None,
    }
}

pub struct RdsInstanceCalculator;

#[async_trait]
impl Calculator for RdsInstanceCalculator {
    fn supports(&self, resource_type: &str) -> bool {
        resource_type == "AWS::RDS::DBInstance"
    }

    fn can_calculate(&self, resource: &ResourceWithId) -> bool {
        resource.properties.get("DBInstanceClass").and_then(|v| v.as_str()).is_some()
    }

    async fn calculate_cost(
        &self,
        resource: &ResourceWithId,
        region: &str,
        client: &PricingClient,
        _config: &Config,
        _siblings: &[ResourceWithId],
    ) -> MonthlyCost {
        let instance_class = resource
            .properties
            .get("DBInstanceClass")
            .and_then(|v| v.as_str())
            .expect("can_calculate guarantees DBInstanceClass is present");
        let engine = resource
            .properties
            .get("Engine")
            .and_then(|v| v.as_str())
            .unwrap_or("postgres");
        let storage_gb = resource
            .properties
            .get("AllocatedStorage")
            .and_then(|v| v.as_f64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
            .unwrap_or(DEFAULT_STORAGE_GB);

        let instance_params = PriceQueryParams::new(
            "AmazonRDS",
            location_name(region),
            vec![
                ("instanceType".to_string(), instance_class.to_string()),
                ("databaseEngine".to_string(), engine.to_string()),
                ("deploymentOption".to_string(), "Single-AZ".to_string()),
            ],
        );
        let storage_params = PriceQueryParams::new(
            "AmazonRDS",
            location_name(region),
            vec![("usagetype".to_string(), "RDS:GP2-Storage".to_string())],
        );

        let instance_hourly = client.get_price(&instance_params).await;
        let storage_per_gb = client.get_price(&storage_params).await;

        let (instance_cost, confidence, catalog_hit) = match instance_hourly {
            Some(hourly) => (hourly * HOURS_PER_MONTH, Confidence::High, true),
            None => match fallback_hourly_rate(instance_class) {
                Some(hourly) => (hourly * HOURS_PER_MONTH, Confidence::Low, false),
                None => (0.0, Confidence::Unknown, false),
            },
        };

        let storage_cost = storage_gb * storage_per_gb.unwrap_or(FALLBACK_STORAGE_PRICE_PER_GB);

        let mut assumptions = vec![format!(
            "{instance_class} ({engine}), Single-AZ, {storage_gb:.0} GB gp2 storage"
        )];
        if !catalog_hit {
            assumptions.push("catalog unavailable for instance pricing, using fallback rate".to_string());
        }

        MonthlyCost {
            amount: instance_cost + storage_cost,
            currency: "USD".to_string(),
            confidence,
            assumptions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_instance_class() {
        let c = RdsInstanceCalculator;
        let resource = ResourceWithId {
            logical_id: "Db1".into(),
            resource_type: "AWS::RDS::DBInstance".into(),
            properties: serde_json::Map::new(),
        };
        assert!(!c.can_calculate(&resource));
    }
}
