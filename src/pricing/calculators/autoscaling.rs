//! Auto Scaling group pricing: dereferences a sibling `LaunchTemplate` (or
//! `LaunchConfiguration`) to find the instance type, then prices that
//! instance type for every instance in the `DesiredCapacity`.

use super::ec2::price_instance_type;
use super::Calculator;
use crate::config::Config;
use crate::pricing::client::PricingClient;
use crate::pricing::{Confidence, MonthlyCost};
use crate::template::ResourceWithId;
use async_trait::async_trait;

const DEFAULT_DESIRED_CAPACITY: f64 = 1.0;
const DEFAULT_FALLBACK_INSTANCE_TYPE: &str = "t3.micro";

pub struct AutoScalingGroupCalculator;

#[async_trait]
impl Calculator for AutoScalingGroupCalculator {
    fn supports(&self, resource_type: &str) -> bool {
        resource_type == "AWS::AutoScaling::AutoScalingGroup"
    }

    async fn calculate_cost(
        &self,
        resource: &ResourceWithId,
        region: &str,
        client: &PricingClient,
        _config: &Config,
        siblings: &[ResourceWithId],
    ) -> MonthlyCost {
        let desired_capacity = resource
            .properties
            .get("DesiredCapacity")
            .and_then(|v| v.as_f64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
            .unwrap_or(DEFAULT_DESIRED_CAPACITY);

        let (instance_type, confidence_downgrade) = resolve_instance_type(resource, siblings);

        let mut per_instance = price_instance_type(&instance_type, region, client).await;
        per_instance.amount *= desired_capacity;

        if confidence_downgrade {
            per_instance.confidence = lower(per_instance.confidence);
            per_instance.assumptions.push(format!(
                "referenced launch template not found among sibling resources, defaulted to {DEFAULT_FALLBACK_INSTANCE_TYPE}"
            ));
        }
        per_instance
            .assumptions
            .push(format!("desired capacity: {desired_capacity:.0} instances"));

        per_instance
    }
}

/// Returns the instance type to price and whether a fallback default had to
/// be used because the referenced launch template/config was missing.
fn resolve_instance_type(resource: &ResourceWithId, siblings: &[ResourceWithId]) -> (String, bool) {
    let launch_template_id = resource
        .properties
        .get("LaunchTemplate")
        .and_then(|v| v.as_object())
        .and_then(|t| t.get("LaunchTemplateId").or_else(|| t.get("LaunchTemplateName")))
        .and_then(|v| v.as_str());

    let launch_config_id = resource
        .properties
        .get("LaunchConfigurationName")
        .and_then(|v| v.as_str());

    if let Some(ref_id) = launch_template_id.or(launch_config_id) {
        if let Some(sibling) = siblings.iter().find(|s| s.logical_id == ref_id) {
            let instance_type = sibling
                .properties
                .get("LaunchTemplateData")
                .and_then(|v| v.as_object())
                .and_then(|d| d.get("InstanceType"))
                .or_else(|| sibling.properties.get("InstanceType"))
                .and_then(|v| v.as_str());
            if let Some(instance_type) = instance_type {
                return (instance_type.to_string(), false);
            }
        }
    }

    (DEFAULT_FALLBACK_INSTANCE_TYPE.to_string(), true)
}

fn lower(confidence: Confidence) -> Confidence {
    match confidence {
        Confidence::High => Confidence::Medium,
        Confidence::Medium => Confidence::Low,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launch_template(id: &str, instance_type: &str) -> ResourceWithId {
        let mut data = serde_json::Map::new();
        data.insert("InstanceType".to_string(), instance_type.into());
        let mut props = serde_json::Map::new();
        props.insert("LaunchTemplateData".to_string(), data.into());
        ResourceWithId {
            logical_id: id.to_string(),
            resource_type: "AWS::EC2::LaunchTemplate".to_string(),
            properties: props,
        }
    }

    fn asg_referencing(id: &str) -> ResourceWithId {
        let mut lt_ref = serde_json::Map::new();
        lt_ref.insert("LaunchTemplateId".to_string(), id.into());
        let mut props = serde_json::Map::new();
        props.insert("LaunchTemplate".to_string(), lt_ref.into());
        props.insert("DesiredCapacity".to_string(), "2".into());
        ResourceWithId {
            logical_id: "Asg1".to_string(),
            resource_type: "AWS::AutoScaling::AutoScalingGroup".to_string(),
            properties: props,
        }
    }

    #[test]
    fn resolves_instance_type_from_sibling_launch_template() {
        let asg = asg_referencing("Lt1");
        let siblings = vec![launch_template("Lt1", "m5.large")];
        let (instance_type, downgraded) = resolve_instance_type(&asg, &siblings);
        assert_eq!(instance_type, "m5.large");
        assert!(!downgraded);
    }

    #[test]
    fn falls_back_when_launch_template_missing() {
        let asg = asg_referencing("Missing");
        let (instance_type, downgraded) = resolve_instance_type(&asg, &[]);
        assert_eq!(instance_type, DEFAULT_FALLBACK_INSTANCE_TYPE);
        assert!(downgraded);
    }

    #[test]
    fn confidence_lowers_by_one_tier() {
        assert_eq!(lower(Confidence::High), Confidence::Medium);
        assert_eq!(lower(Confidence::Medium), Confidence::Low);
        assert_eq!(lower(Confidence::Low), Confidence::Low);
    }
}
