//! FitTrack Shared Library
//!
//! Pure health and strength metric calculations shared by the WASM module
//! and any other client: unit conversion, BMI, BMR/TDEE, one-rep max and
//! progression, date-range resolution and the derived metrics snapshot.

pub mod config;
pub mod errors;
pub mod health_metrics;
pub mod periods;
pub mod snapshot;
pub mod strength;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use crate::config::MetricsConfig;
pub use errors::*;
pub use health_metrics::*;
pub use periods::*;
pub use snapshot::*;
pub use strength::*;

// Export units module items (canonical source for unit types)
pub use units::*;
