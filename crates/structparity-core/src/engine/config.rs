use super::exceptions::ExceptionTable;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_TOLERANCE: f64 = 0.01;
pub const DEFAULT_DOTS_PER_LINE: usize = 100;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid {name} tolerance: {value} (must be finite and non-negative)")]
    InvalidTolerance { name: &'static str, value: f64 },
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Absolute tolerances for the floating-point header fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub resolution: f64,
    pub cell: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_TOLERANCE,
            cell: DEFAULT_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComparisonConfig {
    pub tolerances: Tolerances,
    pub exceptions: ExceptionTable,
}

#[derive(Default)]
pub struct ComparisonConfigBuilder {
    resolution_tolerance: Option<f64>,
    cell_tolerance: Option<f64>,
    exceptions: Option<ExceptionTable>,
}

impl ComparisonConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolution_tolerance(mut self, tolerance: f64) -> Self {
        self.resolution_tolerance = Some(tolerance);
        self
    }
    pub fn cell_tolerance(mut self, tolerance: f64) -> Self {
        self.cell_tolerance = Some(tolerance);
        self
    }
    pub fn exceptions(mut self, exceptions: ExceptionTable) -> Self {
        self.exceptions = Some(exceptions);
        self
    }

    pub fn build(self) -> Result<ComparisonConfig, ConfigError> {
        let resolution = validate_tolerance(
            "resolution",
            self.resolution_tolerance.unwrap_or(DEFAULT_TOLERANCE),
        )?;
        let cell = validate_tolerance("cell", self.cell_tolerance.unwrap_or(DEFAULT_TOLERANCE))?;
        Ok(ComparisonConfig {
            tolerances: Tolerances { resolution, cell },
            exceptions: self.exceptions.unwrap_or_default(),
        })
    }
}

fn validate_tolerance(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidTolerance { name, value })
    }
}

/// What the batch does when an entry cannot be fetched or does not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first failing entry.
    #[default]
    Abort,
    /// Record the failure and continue with the next entry.
    Collect,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown failure policy: '{0}' (expected 'abort' or 'collect')")]
pub struct ParseFailurePolicyError(pub String);

impl FromStr for FailurePolicy {
    type Err = ParseFailurePolicyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "collect" => Ok(FailurePolicy::Collect),
            _ => Err(ParseFailurePolicyError(s.to_string())),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Abort => f.write_str("abort"),
            FailurePolicy::Collect => f.write_str("collect"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub failure_policy: FailurePolicy,
    /// Fetch both representations of one entry concurrently.
    pub parallel_fetch: bool,
    pub dots_per_line: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            parallel_fetch: false,
            dots_per_line: DEFAULT_DOTS_PER_LINE,
        }
    }
}

#[derive(Default)]
pub struct BatchConfigBuilder {
    failure_policy: Option<FailurePolicy>,
    parallel_fetch: Option<bool>,
    dots_per_line: Option<usize>,
}

impl BatchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }
    pub fn parallel_fetch(mut self, enabled: bool) -> Self {
        self.parallel_fetch = Some(enabled);
        self
    }
    pub fn dots_per_line(mut self, n: usize) -> Self {
        self.dots_per_line = Some(n);
        self
    }

    pub fn build(self) -> Result<BatchConfig, ConfigError> {
        let dots_per_line = self.dots_per_line.unwrap_or(DEFAULT_DOTS_PER_LINE);
        if dots_per_line == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "dots_per_line",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(BatchConfig {
            failure_policy: self
                .failure_policy
                .ok_or(ConfigError::MissingParameter("failure_policy"))?,
            parallel_fetch: self.parallel_fetch.unwrap_or(false),
            dots_per_line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_builder_applies_default_tolerances() {
        let config = ComparisonConfigBuilder::new().build().unwrap();
        assert_eq!(config.tolerances, Tolerances::default());
        assert_eq!(config.tolerances.resolution, 0.01);
        assert!(config.exceptions.is_empty());
    }

    #[test]
    fn comparison_builder_rejects_negative_and_nan_tolerances() {
        let err = ComparisonConfigBuilder::new()
            .cell_tolerance(-0.5)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidTolerance {
                name: "cell",
                value: -0.5
            }
        );
        assert!(
            ComparisonConfigBuilder::new()
                .resolution_tolerance(f64::NAN)
                .build()
                .is_err()
        );
    }

    #[test]
    fn batch_builder_requires_failure_policy() {
        let err = BatchConfigBuilder::new().build().unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("failure_policy"));
    }

    #[test]
    fn batch_builder_rejects_zero_dots_per_line() {
        let err = BatchConfigBuilder::new()
            .failure_policy(FailurePolicy::Collect)
            .dots_per_line(0)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "dots_per_line",
                ..
            }
        ));
    }

    #[test]
    fn batch_builder_fills_defaults() {
        let config = BatchConfigBuilder::new()
            .failure_policy(FailurePolicy::Abort)
            .build()
            .unwrap();
        assert_eq!(config, BatchConfig::default());
    }

    #[test]
    fn failure_policy_parses_case_insensitively() {
        assert_eq!("Collect".parse::<FailurePolicy>(), Ok(FailurePolicy::Collect));
        assert_eq!(" abort ".parse::<FailurePolicy>(), Ok(FailurePolicy::Abort));
        assert!("retry".parse::<FailurePolicy>().is_err());
    }
}
