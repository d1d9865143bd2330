use super::Calculator;
use crate::config::Config;
use crate::pricing::cache::PriceQueryParams;
use crate::pricing::client::PricingClient;
use crate::pricing::region::location_name;
use crate::pricing::{Confidence, MonthlyCost};
use crate::template::ResourceWithId;
use async_trait::async_trait;

const HOURS_PER_MONTH: f64 = 730.0;

/// Fallback hourly rates used only when the catalog has no entry, keyed by
/// instance type. Deliberately small: most instance types should resolve
/// against the live catalog.
fn fallback_hourly_rate(instance_type: &str) -> Option<f64> {
    match instance_type {
        "t3.micro" => Some(0.0104),
        "t3.small" => Some(0.0208),
        "t3.medium" => Some(0.0416),
        "m5.large" => Some(0.096),
        "m5.xlarge" => Some(0.192),
        _ => None,
    }
}

pub struct Ec2InstanceCalculator;

#[async_trait]
impl Calculator for Ec2InstanceCalculator {
    fn supports(&self, resource_type: &str) -> bool {
        resource_type == "AWS::EC2::Instance"
    }

    fn can_calculate(&self, resource: &ResourceWithId) -> bool {
        resource.properties.get("InstanceType").and_then(|v| v.as_str()).is_some()
    }

    async fn calculate_cost(
        &self,
        resource: &ResourceWithId,
        region: &str,
        client: &PricingClient,
        _config: &Config,
        _siblings: &[ResourceWithId],
    ) -> MonthlyCost {
        let instance_type = resource
            .properties
            .get("InstanceType")
            .and_then(|v| v.as_str())
            .expect("can_calculate guarantees InstanceType is present");

        price_instance_type(instance_type, region, client).await
    }
}

/// Shared by [`Ec2InstanceCalculator`] and the AutoScalingGroup calculator,
/// which resolves its instance type from a sibling LaunchTemplate.
pub(super) async fn price_instance_type(instance_type: &str, region: &str, client: &PricingClient) -> MonthlyCost {
    let params = PriceQueryParams::new(
        "AmazonEC2",
        location_name(region),
        vec![
            ("instanceType".to_string(), instance_type.to_string()),
            ("tenancy".to_string(), "Shared".to_string()),
            ("operatingSystem".to_string(), "Linux".to_string()),
            ("preInstalledSw".to_string(), "NA".to_string()),
            ("capacitystatus".to_string(), "Used".to_string()),
        ],
    );

    match client.get_price(&params).await {
        Some(hourly) => MonthlyCost {
            amount: hourly * HOURS_PER_MONTH,
            currency: "USD".to_string(),
            confidence: Confidence::High,
            assumptions: vec![format!(
                "{instance_type}: {HOURS_PER_MONTH} hours/month, Linux, shared tenancy, on-demand"
            )],
        },
        None => match fallback_hourly_rate(instance_type) {
            Some(hourly) => MonthlyCost {
                amount: hourly * HOURS_PER_MONTH,
                currency: "USD".to_string(),
                confidence: Confidence::Low,
                assumptions: vec![format!(
                    "{instance_type}: catalog unavailable, using fallback rate ${hourly:.4}/hour"
                )],
            },
            None => MonthlyCost::zero_unknown(format!("no pricing data for instance type {instance_type}")),
        },
    }
}
