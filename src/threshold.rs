//! Evaluates a cost delta's total against configured warning/error
//! thresholds, scoped by environment.

use crate::config::Config;
use crate::pricing::CostDelta;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    None,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThresholdEvaluation {
    pub passed: bool,
    pub level: Level,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    pub delta: f64,
    pub message: String,
    pub recommendations: Vec<String>,
}

pub fn evaluate(delta: &CostDelta, config: &Config) -> ThresholdEvaluation {
    let resolved = config.thresholds.resolve(&config.environment);
    let recommendations = top_cost_drivers(delta, 3);

    if let Some(error_threshold) = resolved.error {
        if delta.total_delta >= error_threshold {
            return ThresholdEvaluation {
                passed: false,
                level: Level::Error,
                threshold: Some(error_threshold),
                delta: delta.total_delta,
                message: format!(
                    "monthly cost delta of ${:.2} EXCEEDED the error threshold of ${error_threshold:.2}",
                    delta.total_delta
                ),
                recommendations,
            };
        }
    }

    if let Some(warning_threshold) = resolved.warning {
        if delta.total_delta >= warning_threshold {
            return ThresholdEvaluation {
                passed: true,
                level: Level::Warning,
                threshold: Some(warning_threshold),
                delta: delta.total_delta,
                message: format!(
                    "monthly cost delta of ${:.2} crossed the warning threshold of ${warning_threshold:.2}",
                    delta.total_delta
                ),
                recommendations,
            };
        }
    }

    ThresholdEvaluation {
        passed: true,
        level: Level::None,
        threshold: None,
        delta: delta.total_delta,
        message: format!("monthly cost delta of ${:.2} is within configured limits", delta.total_delta),
        recommendations: Vec::new(),
    }
}

/// The top `n` cost-driving entries, described as human-readable
/// recommendation strings.
fn top_cost_drivers(delta: &CostDelta, n: usize) -> Vec<String> {
    crate::report::top_cost_drivers(delta, n)
        .into_iter()
        .map(|(id, amount)| format!("Consider a smaller configuration for {id} (adds ${amount:.2}/month)"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{Confidence, MonthlyCost, ResourceCost};

    fn delta_with_total(total: f64) -> CostDelta {
        CostDelta {
            total_delta: total,
            currency: "USD".to_string(),
            added_costs: vec![ResourceCost {
                logical_id: "Big1".to_string(),
                resource_type: "AWS::EC2::Instance".to_string(),
                monthly_cost: MonthlyCost {
                    amount: total,
                    currency: "USD".to_string(),
                    confidence: Confidence::High,
                    assumptions: vec![],
                },
            }],
            removed_costs: vec![],
            modified_costs: vec![],
        }
    }

    #[test]
    fn breach_of_error_threshold_fails() {
        let mut config = Config::default();
        config.thresholds.error = Some(100.0);
        let delta = delta_with_total(150.50);
        let eval = evaluate(&delta, &config);
        assert!(!eval.passed);
        assert_eq!(eval.level, Level::Error);
        assert_eq!(eval.threshold, Some(100.0));
        assert!(!eval.recommendations.is_empty());
    }

    #[test]
    fn crossing_only_warning_still_passes() {
        let mut config = Config::default();
        config.thresholds.warning = Some(10.0);
        config.thresholds.error = Some(100.0);
        let delta = delta_with_total(25.0);
        let eval = evaluate(&delta, &config);
        assert!(eval.passed);
        assert_eq!(eval.level, Level::Warning);
    }

    #[test]
    fn no_thresholds_configured_yields_none_level() {
        let config = Config::default();
        let delta = delta_with_total(10_000.0);
        let eval = evaluate(&delta, &config);
        assert!(eval.passed);
        assert_eq!(eval.level, Level::None);
    }

    #[test]
    fn environment_scoped_threshold_takes_precedence() {
        let mut config = Config::default();
        config.environment = "production".to_string();
        config.thresholds.error = Some(1000.0);
        config.thresholds.per_environment.insert(
            "production".to_string(),
            crate::config::EnvironmentThresholds {
                warning: None,
                error: Some(50.0),
            },
        );
        let delta = delta_with_total(75.0);
        let eval = evaluate(&delta, &config);
        assert_eq!(eval.level, Level::Error);
    }
}
