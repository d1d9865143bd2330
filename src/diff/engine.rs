//! Set- and property-equality-based comparison of two templates.

use super::canonical::canonically_equal;
use crate::template::{ResourceWithId, Template};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct ModifiedPair {
    pub logical_id: String,
    pub resource_type: String,
    pub old_properties: serde_json::Map<String, Value>,
    pub new_properties: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceDiff {
    pub added: Vec<ResourceWithId>,
    pub removed: Vec<ResourceWithId>,
    pub modified: Vec<ModifiedPair>,
}

impl ResourceDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Computes the resource-level diff between a base and target template.
///
/// A logical id present on both sides whose `Type` changed is encoded as a
/// removal (old type) paired with an addition (new type) rather than a
/// modification, since a type change is not a like-for-like cost comparison.
pub fn diff(base: &Template, target: &Template) -> ResourceDiff {
    let mut result = ResourceDiff::default();

    for (id, target_resource) in &target.resources {
        match base.resources.get(id) {
            None => result.added.push(ResourceWithId {
                logical_id: id.clone(),
                resource_type: target_resource.resource_type.clone(),
                properties: target_resource.properties.clone(),
            }),
            Some(base_resource) => {
                if base_resource.resource_type != target_resource.resource_type {
                    result.removed.push(ResourceWithId {
                        logical_id: id.clone(),
                        resource_type: base_resource.resource_type.clone(),
                        properties: base_resource.properties.clone(),
                    });
                    result.added.push(ResourceWithId {
                        logical_id: id.clone(),
                        resource_type: target_resource.resource_type.clone(),
                        properties: target_resource.properties.clone(),
                    });
                } else if !canonically_equal(
                    &Value::Object(base_resource.properties.clone()),
                    &Value::Object(target_resource.properties.clone()),
                ) {
                    result.modified.push(ModifiedPair {
                        logical_id: id.clone(),
                        resource_type: target_resource.resource_type.clone(),
                        old_properties: base_resource.properties.clone(),
                        new_properties: target_resource.properties.clone(),
                    });
                }
            }
        }
    }

    for (id, base_resource) in &base.resources {
        if !target.resources.contains_key(id) {
            result.removed.push(ResourceWithId {
                logical_id: id.clone(),
                resource_type: base_resource.resource_type.clone(),
                properties: base_resource.properties.clone(),
            });
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Resource;
    use std::collections::HashMap;

    fn resource(resource_type: &str) -> Resource {
        Resource {
            resource_type: resource_type.to_string(),
            properties: serde_json::Map::new(),
        }
    }

    fn template(entries: &[(&str, Resource)]) -> Template {
        let mut resources = HashMap::new();
        for (id, r) in entries {
            resources.insert(id.to_string(), r.clone());
        }
        Template { resources }
    }

    #[test]
    fn detects_added_resource() {
        let base = template(&[]);
        let target = template(&[("Bucket1", resource("AWS::S3::Bucket"))]);
        let d = diff(&base, &target);
        assert_eq!(d.added.len(), 1);
        assert!(d.removed.is_empty());
        assert!(d.modified.is_empty());
    }

    #[test]
    fn detects_removed_resource() {
        let base = template(&[("Bucket1", resource("AWS::S3::Bucket"))]);
        let target = template(&[]);
        let d = diff(&base, &target);
        assert_eq!(d.removed.len(), 1);
        assert!(d.added.is_empty());
    }

    #[test]
    fn identical_templates_yield_empty_diff() {
        let t = template(&[("Bucket1", resource("AWS::S3::Bucket"))]);
        assert!(diff(&t, &t).is_empty());
    }

    #[test]
    fn property_change_is_modification() {
        let mut changed = resource("AWS::Lambda::Function");
        changed.properties.insert("MemorySize".into(), 1024.into());
        let mut base_r = resource("AWS::Lambda::Function");
        base_r.properties.insert("MemorySize".into(), 128.into());

        let base = template(&[("Fn1", base_r)]);
        let target = template(&[("Fn1", changed)]);
        let d = diff(&base, &target);
        assert_eq!(d.modified.len(), 1);
        assert_eq!(d.modified[0].logical_id, "Fn1");
    }

    #[test]
    fn reordered_properties_are_not_a_modification() {
        let mut base_r = resource("AWS::S3::Bucket");
        base_r.properties.insert("A".into(), 1.into());
        base_r.properties.insert("B".into(), 2.into());
        let mut target_r = resource("AWS::S3::Bucket");
        target_r.properties.insert("B".into(), 2.into());
        target_r.properties.insert("A".into(), 1.into());

        let base = template(&[("Bucket1", base_r)]);
        let target = template(&[("Bucket1", target_r)]);
        assert!(diff(&base, &target).is_empty());
    }

    #[test]
    fn type_change_is_remove_plus_add_on_same_id() {
        let base = template(&[("X", resource("AWS::S3::Bucket"))]);
        let target = template(&[("X", resource("AWS::SQS::Queue"))]);
        let d = diff(&base, &target);
        assert_eq!(d.removed.len(), 1);
        assert_eq!(d.added.len(), 1);
        assert!(d.modified.is_empty());
        assert_eq!(d.removed[0].logical_id, "X");
        assert_eq!(d.added[0].logical_id, "X");
    }

    #[test]
    fn diff_ids_are_disjoint_across_sets() {
        let base = template(&[
            ("Keep", resource("AWS::S3::Bucket")),
            ("Gone", resource("AWS::SQS::Queue")),
        ]);
        let target = template(&[
            ("Keep", resource("AWS::S3::Bucket")),
            ("New", resource("AWS::SNS::Topic")),
        ]);
        let d = diff(&base, &target);
        let added: std::collections::HashSet<_> = d.added.iter().map(|r| &r.logical_id).collect();
        let removed: std::collections::HashSet<_> = d.removed.iter().map(|r| &r.logical_id).collect();
        assert!(added.is_disjoint(&removed));
    }
}
