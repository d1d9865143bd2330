use super::Calculator;
use crate::config::Config;
use crate::pricing::cache::PriceQueryParams;
use crate::pricing::client::PricingClient;
use crate::pricing::region::location_name;
use crate::pricing::{Confidence, MonthlyCost};
use crate::template::ResourceWithId;
use async_trait::async_trait;

const HOURS_PER_MONTH: f64 = 730.0;
const ASSUMED_LCU_HOURS: f64 = 10.0;
const FALLBACK_HOURLY: f64 = 0.0225;
const FALLBACK_LCU_HOURLY: f64 = 0.008;

pub struct AlbCalculator;

#[async_trait]
impl Calculator for AlbCalculator {
    fn supports(&self, resource_type: &str) -> bool {
        resource_type == "AWS::ElasticLoadBalancingV2::LoadBalancer"
    }

    fn can_calculate(&self, resource: &ResourceWithId) -> bool {
        resource
            .properties
            .get("Type")
            .and_then(|v| v.as_str())
            .map(|t| t != "network")
            .unwrap_or(true)
    }

    async fn calculate_cost(
        &self,
        _resource: &ResourceWithId,
        region: &str,
        client: &PricingClient,
        _config: &Config,
        _siblings: &[ResourceWithId],
    ) -> MonthlyCost {
        let hourly_params = PriceQueryParams::new(
            "AWSELB",
            location_name(region),
            vec![("group".to_string(), "ELB:Balancer".to_string())],
        );
        let lcu_params = PriceQueryParams::new(
            "AWSELB",
            location_name(region),
            vec![("group".to_string(), "ELB:LCU".to_string())],
        );

        let hourly = client.get_price(&hourly_params).await;
        let lcu_hourly = client.get_price(&lcu_params).await;
        let catalog_hit = hourly.is_some() && lcu_hourly.is_some();

        let amount = hourly.unwrap_or(FALLBACK_HOURLY) * HOURS_PER_MONTH
            + ASSUMED_LCU_HOURS * lcu_hourly.unwrap_or(FALLBACK_LCU_HOURLY) * HOURS_PER_MONTH;

        let mut assumptions = vec![format!("Application Load Balancer, {ASSUMED_LCU_HOURS:.0} LCUs assumed")];
        if !catalog_hit {
            assumptions.push("catalog unavailable, using fallback hourly and LCU rates".to_string());
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
    fn rejects_network_load_balancer() {
        let c = AlbCalculator;
        let mut props = serde_json::Map::new();
        props.insert("Type".to_string(), "network".into());
        let resource = ResourceWithId {
            logical_id: "Nlb1".into(),
            resource_type: "AWS::ElasticLoadBalancingV2::LoadBalancer".into(),
            properties: props,
        };
        assert!(!c.can_calculate(&resource));
    }

    #[test]
    fn accepts_application_load_balancer_by_default() {
        let c = AlbCalculator;
        let resource = ResourceWithId {
            logical_id: "Alb1".into(),
            resource_type: "AWS::ElasticLoadBalancingV2::LoadBalancer".into(),
            properties: serde_json::Map::new(),
        };
        assert!(c.can_calculate(&resource));
    }
}
