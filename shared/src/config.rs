//! Configuration for the metrics calculations
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. An optional TOML file
//! 3. Environment variables (prefix: FITTRACK__)

use crate::errors::MetricsError;
use crate::health_metrics::{UnknownActivityLevel, DEFAULT_CALORIE_ADJUSTMENT_KCAL};
use crate::strength::RecommendationConfig;
use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Tunables for the metrics calculations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// How unrecognised activity level strings are handled
    pub unknown_activity_level: UnknownActivityLevel,
    pub recommendation: RecommendationConfig,
    /// Daily deficit/surplus for the lose/gain calorie targets
    pub calorie_adjustment_kcal: f64,
    /// First day of the "current-week" period
    pub week_starts_on: Weekday,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            unknown_activity_level: UnknownActivityLevel::default(),
            recommendation: RecommendationConfig::default(),
            calorie_adjustment_kcal: DEFAULT_CALORIE_ADJUSTMENT_KCAL,
            week_starts_on: Weekday::Mon,
        }
    }
}

impl MetricsConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. `path` (TOML, skipped when missing)
    /// 3. Environment variables with FITTRACK__ prefix,
    ///    e.g. FITTRACK__RECOMMENDATION__WEIGHT_INCREMENT=1.25
    pub fn load(path: &str) -> Result<Self, MetricsError> {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&MetricsConfig::default())?)
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("FITTRACK")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize::<Self>()?.checked()
    }

    /// Build configuration from an embedded TOML document layered over the defaults
    pub fn from_toml(contents: &str) -> Result<Self, MetricsError> {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&MetricsConfig::default())?)
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?;

        config.try_deserialize::<Self>()?.checked()
    }

    /// Reject tunables the calculators cannot work with
    fn checked(self) -> Result<Self, MetricsError> {
        if !self.calorie_adjustment_kcal.is_finite() || self.calorie_adjustment_kcal < 0.0 {
            return Err(MetricsError::Validation(
                "calorie_adjustment_kcal must be a non-negative number".to_string(),
            ));
        }
        self.recommendation.check()?;
        Ok(self)
    }
}
