//! Shared fixtures for the integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use fittrack_shared::{
    ActivityLevel, BiologicalSex, BodyMetricsInput, HeightMeasurement, WeightMeasurement,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install a test subscriber once; later calls are no-ops
pub fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fittrack_shared=debug".into());

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 30 year old male, 80 kg, 180 cm, moderately active
pub fn reference_profile() -> BodyMetricsInput {
    BodyMetricsInput {
        weight: WeightMeasurement::kg(80.0),
        height: HeightMeasurement::cm(180.0),
        age_years: 30,
        sex: BiologicalSex::Male,
        activity_level: ActivityLevel::ModeratelyActive,
    }
}
