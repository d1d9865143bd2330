//! Parses CloudFormation JSON or YAML text into a [`Template`].

use super::types::{Resource, Template};
use crate::errors::{AnalyzerError, Result};
use serde_json::Value;

/// Parses a CloudFormation document. Tries JSON first, then YAML, since most
/// templates in the wild are JSON and a failed JSON parse is cheap.
pub fn parse(content: &str) -> Result<Template> {
    let value: Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| AnalyzerError::parse(format!("not valid JSON or YAML: {e}")))?,
    };
    parse_value(value)
}

fn parse_value(value: Value) -> Result<Template> {
    let obj = value
        .as_object()
        .ok_or_else(|| AnalyzerError::parse("template root must be a mapping"))?;

    let resources_value = obj
        .get("Resources")
        .ok_or_else(|| AnalyzerError::parse("template is missing a `Resources` section"))?;
    let resources_obj = resources_value
        .as_object()
        .ok_or_else(|| AnalyzerError::parse("`Resources` must be a mapping"))?;

    let mut template = Template::default();
    for (logical_id, def) in resources_obj {
        let resource = parse_resource(logical_id, def)?;
        template.resources.insert(logical_id.clone(), resource);
    }
    Ok(template)
}

fn parse_resource(logical_id: &str, def: &Value) -> Result<Resource> {
    let obj = def
        .as_object()
        .ok_or_else(|| AnalyzerError::parse(format!("resource {logical_id} must be a mapping")))?;

    let resource_type = obj
        .get("Type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AnalyzerError::parse(format!("resource {logical_id} is missing `Type`")))?
        .to_string();

    let properties = obj
        .get("Properties")
        .map(|v| {
            v.as_object()
                .cloned()
                .ok_or_else(|| AnalyzerError::parse(format!("{logical_id}.Properties must be a mapping")))
        })
        .transpose()?
        .unwrap_or_default();

    Ok(Resource {
        resource_type,
        properties,
    })
}
