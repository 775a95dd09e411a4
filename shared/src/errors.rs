//! Error types for the FitTrack metrics library

use thiserror::Error;

/// Errors raised while parsing caller input or loading configuration.
///
/// Arithmetic never fails; these only surface at string boundaries and
/// when a policy explicitly asks for rejection.
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Unknown weight unit: {0}")]
    UnknownWeightUnit(String),

    #[error("Unknown height unit: {0}")]
    UnknownHeightUnit(String),

    #[error("Unknown activity level: {0}")]
    UnknownActivityLevel(String),

    #[error("Unknown biological sex: {0}")]
    UnknownSex(String),

    #[error("Unknown period: {0}")]
    UnknownPeriod(String),

    #[error("Period '{0}' requires an explicit start and end date")]
    MissingExplicitRange(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Result alias used across the library
pub type MetricsResult<T> = Result<T, MetricsError>;
