//! The `analyze` command: parse, diff, price, evaluate thresholds, report.

use crate::cli::Cli;
use crate::config::Config;
use crate::diff;
use crate::errors::{AnalyzerError, ErrorCategory, Result};
use crate::pricing::cache::CacheManager;
use crate::pricing::client::PricingClient;
use crate::pricing::service::PricingService;
use crate::report::{self, ReportContext};
use crate::template;
use crate::threshold;
use crate::{debug_log, warn_log};

pub struct AnalysisOutcome {
    pub report: String,
    /// Whether the invocation should exit non-zero (an `error`-level
    /// threshold breach).
    pub threshold_failed: bool,
}

pub async fn run(cli: &Cli) -> Result<AnalysisOutcome> {
    crate::logging::init(cli.verbose);

    let start_dir = std::env::current_dir().map_err(AnalyzerError::from)?;
    let mut config = match &cli.config {
        Some(path) => crate::config::load_from_path(path).map_err(|e| AnalyzerError::config(e.to_string()))?,
        None => crate::config::load_from_dir(&start_dir).map_err(|e| AnalyzerError::config(e.to_string()))?,
    };

    if let Some(region) = &cli.region {
        config.region = region.clone();
    }
    if let Some(format) = cli.format {
        config.format = format.into();
    }
    if let Some(environment) = &cli.environment {
        config.environment = environment.clone();
    }

    debug_log!("resolved configuration: region={}, environment={}", config.region, config.environment);

    let base_text = std::fs::read_to_string(&cli.base)
        .map_err(|e| AnalyzerError::new("E_BASE_TEMPLATE", ErrorCategory::IoError, format!("reading {}: {e}", cli.base.display())))?;
    let target_text = std::fs::read_to_string(&cli.target)
        .map_err(|e| AnalyzerError::new("E_TARGET_TEMPLATE", ErrorCategory::IoError, format!("reading {}: {e}", cli.target.display())))?;

    let base = template::parse(&base_text)?;
    let target = template::parse(&target_text)?;

    let resource_diff = diff::diff(&base, &target);

    let cache_dir = config.cache_directory();
    let cache = CacheManager::with_ttl_hours(&cache_dir, config.cache_config.ttl_hours);
    let client = PricingClient::new(cache);
    let service = PricingService::new(client);

    let delta = service
        .get_cost_delta(&resource_diff, &base, &target, &config.region, &config)
        .await;

    for added in &delta.added_costs {
        if added.monthly_cost.confidence == crate::pricing::Confidence::Unknown {
            warn_log!(
                "no calculator for resource type {}, reported as unknown-confidence zero cost",
                added.resource_type
            );
        }
    }
    for modified in &delta.modified_costs {
        if modified.new_monthly_cost.confidence == crate::pricing::Confidence::Unknown {
            warn_log!(
                "no calculator for resource type {}, reported as unknown-confidence zero cost",
                modified.resource_type
            );
        }
    }

    let evaluation = threshold::evaluate(&delta, &config);

    let ctx = ReportContext {
        delta: &delta,
        config_summary: Some(report::config_summary(&config)),
        threshold_status: Some(&evaluation),
    };
    let rendered = report::render(config.format, &ctx);

    Ok(AnalysisOutcome {
        report: rendered,
        threshold_failed: !evaluation.passed,
    })
}
