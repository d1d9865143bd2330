//! Pluggable per-resource-type cost calculators and the registry that
//! dispatches a resource to the first one that claims it.

mod alb;
mod autoscaling;
mod dynamodb;
mod ec2;
mod lambda;
mod nat_gateway;
mod rds;
mod s3;

use crate::config::Config;
use crate::pricing::{client::PricingClient, MonthlyCost};
use crate::template::ResourceWithId;
use async_trait::async_trait;

/// Implemented once per AWS resource type this crate prices.
#[async_trait]
pub trait Calculator: Send + Sync {
    /// Whether this calculator handles the given CloudFormation resource type.
    fn supports(&self, resource_type: &str) -> bool;

    /// Precondition on the resource's own properties, beyond type matching.
    /// Defaults to always-true; calculators override it when a property is
    /// required to produce a sensible estimate (e.g. an explicit instance type).
    fn can_calculate(&self, _resource: &ResourceWithId) -> bool {
        true
    }

    /// Computes the monthly cost. `siblings` is the full resource list, for
    /// calculators that must dereference another logical id (e.g. an
    /// AutoScalingGroup resolving its LaunchTemplate).
    async fn calculate_cost(
        &self,
        resource: &ResourceWithId,
        region: &str,
        client: &PricingClient,
        config: &Config,
        siblings: &[ResourceWithId],
    ) -> MonthlyCost;
}

/// Returns the built-in calculator registry in first-match-wins order.
pub fn default_registry() -> Vec<Box<dyn Calculator>> {
    vec![
        Box::new(ec2::Ec2InstanceCalculator),
        Box::new(lambda::LambdaFunctionCalculator),
        Box::new(s3::S3BucketCalculator),
        Box::new(rds::RdsInstanceCalculator),
        Box::new(dynamodb::DynamoDbTableCalculator),
        Box::new(nat_gateway::NatGatewayCalculator),
        Box::new(alb::AlbCalculator),
        Box::new(autoscaling::AutoScalingGroupCalculator),
    ]
}

/// Finds the first calculator whose `supports` and `can_calculate` both
/// accept the resource.
pub fn find_calculator<'a>(
    registry: &'a [Box<dyn Calculator>],
    resource: &ResourceWithId,
) -> Option<&'a dyn Calculator> {
    registry
        .iter()
        .find(|c| c.supports(&resource.resource_type) && c.can_calculate(resource))
        .map(|c| c.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_expected_types() {
        let registry = default_registry();
        let types = [
            "AWS::EC2::Instance",
            "AWS::Lambda::Function",
            "AWS::S3::Bucket",
            "AWS::RDS::DBInstance",
            "AWS::DynamoDB::Table",
            "AWS::EC2::NatGateway",
            "AWS::ElasticLoadBalancingV2::LoadBalancer",
            "AWS::AutoScaling::AutoScalingGroup",
        ];
        for t in types {
            assert!(
                registry.iter().any(|c| c.supports(t)),
                "no calculator supports {t}"
            );
        }
    }

    #[test]
    fn unsupported_type_has_no_calculator() {
        let registry = default_registry();
        let resource = ResourceWithId {
            logical_id: "Widget1".into(),
            resource_type: "AWS::Custom::Widget".into(),
            properties: serde_json::Map::new(),
        };
        assert!(find_calculator(&registry, &resource).is_none());
    }
}
