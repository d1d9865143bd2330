//! Configuration loading: searches upward from the current directory for
//! `.cdk-cost-analyzer.{yml,yaml,json}`, first match wins.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentThresholds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Thresholds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<f64>,
    #[serde(default)]
    pub per_environment: HashMap<String, EnvironmentThresholds>,
}

impl Thresholds {
    /// Resolves the effective thresholds for an environment, falling back to
    /// the global values when no environment-specific override exists.
    pub fn resolve(&self, environment: &str) -> EnvironmentThresholds {
        if let Some(scoped) = self.per_environment.get(environment) {
            EnvironmentThresholds {
                warning: scoped.warning.or(self.warning),
                error: scoped.error.or(self.error),
            }
        } else {
            EnvironmentThresholds {
                warning: self.warning,
                error: self.error,
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UsageAssumptions {
    #[serde(default)]
    pub lambda_invocations_per_month: Option<f64>,
    #[serde(default)]
    pub lambda_avg_duration_ms: Option<f64>,
    #[serde(default)]
    pub s3_storage_gb: Option<f64>,
    #[serde(default)]
    pub nat_gateway_data_processed_gb: Option<f64>,
    #[serde(default)]
    pub dynamodb_read_request_units: Option<f64>,
    #[serde(default)]
    pub dynamodb_write_request_units: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_ttl_hours() -> u64 {
    24
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub region: String,
    pub format: OutputFormat,
    pub environment: String,
    pub thresholds: Thresholds,
    pub usage_assumptions: UsageAssumptions,
    pub excluded_resource_types: Vec<String>,
    pub cache_config: CacheConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: "eu-central-1".to_string(),
            format: OutputFormat::Text,
            environment: "default".to_string(),
            thresholds: Thresholds::default(),
            usage_assumptions: UsageAssumptions::default(),
            excluded_resource_types: Vec::new(),
            cache_config: CacheConfig {
                enabled: true,
                directory: None,
                ttl_hours: 24,
            },
        }
    }
}

impl Config {
    pub fn is_excluded(&self, resource_type: &str) -> bool {
        self.excluded_resource_types.iter().any(|t| t == resource_type)
    }

    pub fn cache_directory(&self) -> PathBuf {
        self.cache_config.directory.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("cdk-cost-analyzer")
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

const CANDIDATE_NAMES: [&str; 3] = [
    ".cdk-cost-analyzer.yml",
    ".cdk-cost-analyzer.yaml",
    ".cdk-cost-analyzer.json",
];

/// Searches `start` and its ancestors for a recognized configuration file
/// name, returning the default configuration if none is found.
pub fn load_from_dir(start: &Path) -> Result<Config, ConfigError> {
    match find_config_file(start) {
        Some(path) => load_from_path(&path),
        None => Ok(Config::default()),
    }
}

fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(d) = dir {
        for name in CANDIDATE_NAMES {
            let candidate = d.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        dir = d.parent();
    }
    None
}

pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    } else {
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_has_sane_values() {
        let cfg = Config::default();
        assert_eq!(cfg.region, "eu-central-1");
        assert_eq!(cfg.format, OutputFormat::Text);
        assert!(cfg.cache_config.enabled);
    }

    #[test]
    fn resolves_environment_threshold_override() {
        let mut thresholds = Thresholds {
            warning: Some(50.0),
            error: Some(100.0),
            per_environment: HashMap::new(),
        };
        thresholds.per_environment.insert(
            "production".to_string(),
            EnvironmentThresholds { warning: Some(10.0), error: None },
        );
        let resolved = thresholds.resolve("production");
        assert_eq!(resolved.warning, Some(10.0));
        assert_eq!(resolved.error, Some(100.0));
    }

    #[test]
    fn unscoped_environment_falls_back_to_global() {
        let thresholds = Thresholds {
            warning: Some(50.0),
            error: Some(100.0),
            per_environment: HashMap::new(),
        };
        let resolved = thresholds.resolve("staging");
        assert_eq!(resolved.warning, Some(50.0));
        assert_eq!(resolved.error, Some(100.0));
    }

    #[test]
    fn loads_yaml_config_from_directory() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(".cdk-cost-analyzer.yml"),
            "region: us-west-2\nformat: json\n",
        )
        .unwrap();
        let cfg = load_from_dir(dir.path()).unwrap();
        assert_eq!(cfg.region, "us-west-2");
        assert_eq!(cfg.format, OutputFormat::Json);
    }

    #[test]
    fn missing_config_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let cfg = load_from_dir(dir.path()).unwrap();
        assert_eq!(cfg.region, Config::default().region);
    }

    #[test]
    fn searches_parent_directories() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(".cdk-cost-analyzer.yml"),
            "region: ap-southeast-2\n",
        )
        .unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        let cfg = load_from_dir(&nested).unwrap();
        assert_eq!(cfg.region, "ap-southeast-2");
    }
}
