//! Canonical in-memory form of a CloudFormation template.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A parsed CloudFormation template, reduced to the sections this crate
/// cares about. `Parameters`/`Outputs`/`Mappings` are accepted in the source
/// document but not retained.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Template {
    pub resources: HashMap<String, Resource>,
}

/// A single resource definition, keyed externally by its logical id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    #[serde(rename = "Type")]
    pub resource_type: String,
    #[serde(rename = "Properties", default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

/// A resource paired with its logical id, the parser's primary output shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceWithId {
    pub logical_id: String,
    pub resource_type: String,
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Template {
    pub fn get(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.get(logical_id)
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// All resources paired with their logical id, for calculators that need
    /// to resolve cross-resource references by id.
    pub fn as_resources_with_id(&self) -> Vec<ResourceWithId> {
        self.resources
            .iter()
            .map(|(id, r)| ResourceWithId {
                logical_id: id.clone(),
                resource_type: r.resource_type.clone(),
                properties: r.properties.clone(),
            })
            .collect()
    }
}
