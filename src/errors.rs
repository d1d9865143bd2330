//! Stable, categorized error type shared across the crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad category of an [`AnalyzerError`], used for exit-code mapping and
/// machine-readable output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed or unreadable CloudFormation template.
    ParseError,
    /// A calculator could not price a resource from its inputs alone.
    CalculationError,
    /// Remote pricing catalog unreachable and no cached fallback existed.
    PricingUnavailable,
    /// Configuration file present but invalid.
    ConfigError,
    /// Underlying filesystem/network I/O failure.
    IoError,
    /// Input failed structural validation (duplicate ids, dangling refs).
    ValidationError,
}

/// A stable, categorized error with an optional remediation hint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerError {
    pub id: String,
    pub category: ErrorCategory,
    pub message: String,
    pub hint: Option<String>,
}

impl AnalyzerError {
    pub fn new(id: impl Into<String>, category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category,
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new("E_PARSE", ErrorCategory::ParseError, message)
            .with_hint("Verify the file is valid CloudFormation JSON or YAML")
    }

    pub fn calculation(message: impl Into<String>) -> Self {
        Self::new("E_CALCULATION", ErrorCategory::CalculationError, message)
    }

    pub fn pricing_unavailable(message: impl Into<String>) -> Self {
        Self::new("E_PRICING_UNAVAILABLE", ErrorCategory::PricingUnavailable, message)
            .with_hint("Pricing catalog did not respond; results may use cached or fallback prices")
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new("E_CONFIG", ErrorCategory::ConfigError, message)
            .with_hint("Check configuration file syntax and recognized keys")
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new("E_IO", ErrorCategory::IoError, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("E_VALIDATION", ErrorCategory::ValidationError, message)
    }

    /// Remediation text to surface to the user: the explicit hint if set,
    /// else a generic one derived from the category.
    pub fn generate_hint(&self) -> String {
        if let Some(hint) = &self.hint {
            return hint.clone();
        }
        match self.category {
            ErrorCategory::ParseError => "Verify the template is valid CloudFormation JSON or YAML",
            ErrorCategory::CalculationError => "Check resource properties used by the calculator",
            ErrorCategory::PricingUnavailable => "Retry once the pricing catalog is reachable",
            ErrorCategory::ConfigError => "Check configuration file syntax and required fields",
            ErrorCategory::IoError => "Check file permissions and paths",
            ErrorCategory::ValidationError => "Check for duplicate logical ids or dangling references",
        }
        .to_string()
    }

    pub fn to_machine_format(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| format!(r#"{{"id":"{}","message":"{}"}}"#, self.id, self.message))
    }
}

impl fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n  hint: {hint}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AnalyzerError {}

impl From<std::io::Error> for AnalyzerError {
    fn from(err: std::io::Error) -> Self {
        AnalyzerError::io(err.to_string())
    }
}

impl From<serde_json::Error> for AnalyzerError {
    fn from(err: serde_json::Error) -> Self {
        AnalyzerError::parse(err.to_string())
    }
}

impl From<serde_yaml::Error> for AnalyzerError {
    fn from(err: serde_yaml::Error) -> Self {
        AnalyzerError::parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
