//! Dispatches resources to calculators and assembles the final [`CostDelta`].

use super::calculators::{default_registry, find_calculator, Calculator};
use super::client::PricingClient;
use super::{CostDelta, ModifiedResourceCost, MonthlyCost, ResourceCost};
use crate::config::Config;
use crate::diff::ResourceDiff;
use crate::template::{ResourceWithId, Template};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;

const MAX_CONCURRENT_PRICING_QUERIES: usize = 8;

pub struct PricingService {
    registry: Vec<Box<dyn Calculator>>,
    client: PricingClient,
}

impl PricingService {
    pub fn new(client: PricingClient) -> Self {
        Self {
            registry: default_registry(),
            client,
        }
    }

    /// Prices a single resource, resolving cross-resource references against
    /// the full sibling list.
    pub async fn get_resource_cost(
        &self,
        resource: &ResourceWithId,
        region: &str,
        config: &Config,
        siblings: &[ResourceWithId],
    ) -> MonthlyCost {
        if config.is_excluded(&resource.resource_type) {
            return MonthlyCost::excluded();
        }

        match find_calculator(&self.registry, resource) {
            Some(calculator) => {
                calculator
                    .calculate_cost(resource, region, &self.client, config, siblings)
                    .await
            }
            None => MonthlyCost::zero_unknown(format!(
                "no calculator for resource type {}",
                resource.resource_type
            )),
        }
    }

    /// Prices an entire diff, fanning out pricing queries with bounded
    /// concurrency. Result order is by logical id, not arrival order.
    ///
    /// `base`/`target` are passed through so calculators can resolve
    /// cross-resource references (e.g. an AutoScalingGroup's LaunchTemplate)
    /// even when the referent itself is unchanged and so never appears in
    /// `diff`.
    pub async fn get_cost_delta(
        &self,
        diff: &ResourceDiff,
        base: &Template,
        target: &Template,
        region: &str,
        config: &Config,
    ) -> CostDelta {
        let all_siblings = full_sibling_list(base, target);

        let added_costs = stream::iter(diff.added.iter())
            .map(|r| self.price_addition_or_removal(r, region, config, &all_siblings))
            .buffer_unordered(MAX_CONCURRENT_PRICING_QUERIES)
            .collect::<Vec<_>>()
            .await;

        let removed_costs = stream::iter(diff.removed.iter())
            .map(|r| self.price_addition_or_removal(r, region, config, &all_siblings))
            .buffer_unordered(MAX_CONCURRENT_PRICING_QUERIES)
            .collect::<Vec<_>>()
            .await;

        let modified_costs = stream::iter(diff.modified.iter())
            .map(|m| self.price_modification(m, region, config, &all_siblings))
            .buffer_unordered(MAX_CONCURRENT_PRICING_QUERIES)
            .collect::<Vec<_>>()
            .await;

        let total_delta = added_costs.iter().map(|c| c.monthly_cost.amount).sum::<f64>()
            - removed_costs.iter().map(|c| c.monthly_cost.amount).sum::<f64>()
            + modified_costs.iter().map(|c| c.cost_delta).sum::<f64>();

        CostDelta {
            total_delta,
            currency: "USD".to_string(),
            added_costs,
            removed_costs,
            modified_costs,
        }
    }

    async fn price_addition_or_removal(
        &self,
        resource: &ResourceWithId,
        region: &str,
        config: &Config,
        siblings: &[ResourceWithId],
    ) -> ResourceCost {
        let cost = self.get_resource_cost(resource, region, config, siblings).await;
        ResourceCost {
            logical_id: resource.logical_id.clone(),
            resource_type: resource.resource_type.clone(),
            monthly_cost: cost,
        }
    }

    async fn price_modification(
        &self,
        modified: &crate::diff::ModifiedPair,
        region: &str,
        config: &Config,
        siblings: &[ResourceWithId],
    ) -> ModifiedResourceCost {
        let old_resource = ResourceWithId {
            logical_id: modified.logical_id.clone(),
            resource_type: modified.resource_type.clone(),
            properties: modified.old_properties.clone(),
        };
        let new_resource = ResourceWithId {
            logical_id: modified.logical_id.clone(),
            resource_type: modified.resource_type.clone(),
            properties: modified.new_properties.clone(),
        };

        let old_cost = self.get_resource_cost(&old_resource, region, config, siblings).await;
        let new_cost = self.get_resource_cost(&new_resource, region, config, siblings).await;
        let cost_delta = new_cost.amount - old_cost.amount;

        ModifiedResourceCost {
            logical_id: modified.logical_id.clone(),
            resource_type: modified.resource_type.clone(),
            old_monthly_cost: old_cost,
            new_monthly_cost: new_cost,
            cost_delta,
        }
    }
}

/// The full resource set across both templates, keyed by logical id, with
/// `target`'s definition winning where a resource exists in both (it
/// reflects the post-change state, which is what most cross-references
/// should resolve against). Resources only present in `base` (removed in
/// `target`) are still included, so a removed resource's own references
/// still resolve.
fn full_sibling_list(base: &Template, target: &Template) -> Vec<ResourceWithId> {
    let mut siblings: HashMap<String, ResourceWithId> = HashMap::new();
    for r in base.as_resources_with_id() {
        siblings.insert(r.logical_id.clone(), r);
    }
    for r in target.as_resources_with_id() {
        siblings.insert(r.logical_id.clone(), r);
    }
    siblings.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::cache::CacheManager;
    use tempfile::tempdir;

    fn service() -> PricingService {
        let dir = tempdir().unwrap();
        let cache = CacheManager::new(dir.path());
        PricingService::new(PricingClient::new(cache))
    }

    #[tokio::test]
    async fn excluded_type_short_circuits_to_zero_high_confidence() {
        let svc = service();
        let mut config = Config::default();
        config.excluded_resource_types.push("AWS::S3::Bucket".to_string());
        let resource = ResourceWithId {
            logical_id: "Bucket1".into(),
            resource_type: "AWS::S3::Bucket".into(),
            properties: serde_json::Map::new(),
        };
        let cost = svc.get_resource_cost(&resource, "us-east-1", &config, &[]).await;
        assert_eq!(cost.amount, 0.0);
        assert_eq!(cost.confidence, crate::pricing::Confidence::High);
    }

    #[tokio::test]
    async fn unknown_type_yields_zero_unknown_confidence() {
        let svc = service();
        let config = Config::default();
        let resource = ResourceWithId {
            logical_id: "Widget1".into(),
            resource_type: "AWS::Custom::Widget".into(),
            properties: serde_json::Map::new(),
        };
        let cost = svc.get_resource_cost(&resource, "us-east-1", &config, &[]).await;
        assert_eq!(cost.amount, 0.0);
        assert_eq!(cost.confidence, crate::pricing::Confidence::Unknown);
    }

    #[tokio::test]
    async fn empty_diff_yields_zero_total() {
        let svc = service();
        let config = Config::default();
        let delta = svc
            .get_cost_delta(&ResourceDiff::default(), &Template::default(), &Template::default(), "us-east-1", &config)
            .await;
        assert_eq!(delta.total_delta, 0.0);
        assert!(delta.is_empty());
    }

    #[test]
    fn full_sibling_list_includes_unchanged_base_only_resources() {
        let mut base = Template::default();
        base.resources.insert(
            "Launch1".to_string(),
            crate::template::Resource {
                resource_type: "AWS::EC2::LaunchTemplate".to_string(),
                properties: serde_json::Map::new(),
            },
        );
        let target = Template::default();

        let siblings = full_sibling_list(&base, &target);
        assert!(siblings.iter().any(|r| r.logical_id == "Launch1"));
    }

    #[test]
    fn full_sibling_list_prefers_target_properties_on_conflict() {
        let mut props = serde_json::Map::new();
        props.insert("InstanceType".to_string(), "t3.large".into());
        let mut base = Template::default();
        base.resources.insert(
            "Launch1".to_string(),
            crate::template::Resource {
                resource_type: "AWS::EC2::LaunchTemplate".to_string(),
                properties: serde_json::Map::new(),
            },
        );
        let mut target = Template::default();
        target.resources.insert(
            "Launch1".to_string(),
            crate::template::Resource {
                resource_type: "AWS::EC2::LaunchTemplate".to_string(),
                properties: props,
            },
        );

        let siblings = full_sibling_list(&base, &target);
        let launch = siblings.iter().find(|r| r.logical_id == "Launch1").unwrap();
        assert_eq!(launch.properties.get("InstanceType").unwrap(), "t3.large");
    }
}
