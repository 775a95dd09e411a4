//! FitTrack WASM Module
//!
//! WebAssembly bindings over `fittrack-shared` so the browser screens can
//! call the metric calculations directly.
//!
//! Everything here is total: strings that fail to parse degrade to a
//! sentinel (`0`, `"-"` or `None`) instead of throwing into JavaScript.
//! Structured results cross the boundary as JSON strings.

use chrono::NaiveDate;
use fittrack_shared::{
    health_metrics, periods, snapshot, strength, units, BodyMetricsInput, DateRange,
    MetricsConfig, Period, SetData, SetReps, WeightLogEntry, WeightMeasurement,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Convert a weight into the other unit ("kg" <-> "lb"), full precision
#[wasm_bindgen]
pub fn convert_weight(value: f64, from_unit: &str) -> f64 {
    match from_unit.parse() {
        Ok(unit) => units::convert_weight(value, unit),
        Err(_) => 0.0,
    }
}

/// Convert a height into the other unit ("cm" <-> "ft", ft given as total inches)
#[wasm_bindgen]
pub fn convert_height(value: f64, from_unit: &str) -> f64 {
    match from_unit.parse() {
        Ok(unit) => units::convert_height(value, unit),
        Err(_) => 0.0,
    }
}

#[wasm_bindgen]
pub fn format_height(value: f64, unit: &str) -> String {
    match unit.parse() {
        Ok(unit) => units::format_height(value, unit),
        Err(_) => "-".to_string(),
    }
}

/// Calculate BMI from weight (kg) and height (cm)
#[wasm_bindgen]
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    health_metrics::calculate_bmi(weight_kg, height_cm)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BmiClassification {
    category: &'static str,
    color_token: &'static str,
}

/// Classify a BMI value, returns `{"category": .., "colorToken": ..}`
#[wasm_bindgen]
pub fn classify_bmi(bmi: f64) -> String {
    let category = health_metrics::classify_bmi(bmi);
    let classification = BmiClassification {
        category: category.description(),
        color_token: category.color_token(),
    };
    serde_json::to_string(&classification).unwrap_or_default()
}

/// Mifflin-St Jeor BMR; unknown sex yields 0
#[wasm_bindgen]
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, sex: &str) -> f64 {
    match sex.parse() {
        Ok(sex) => health_metrics::calculate_bmr(weight_kg, height_cm, age_years, sex),
        Err(_) => 0.0,
    }
}

/// TDEE for an activity level string, using the default unknown-level policy
#[wasm_bindgen]
pub fn calculate_tdee(bmr: f64, activity_level: &str) -> f64 {
    let policy = MetricsConfig::default().unknown_activity_level;
    health_metrics::calculate_tdee_for(bmr, activity_level, policy).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> f64 {
    strength::estimate_one_rep_max(weight, reps)
}

/// Classify a logged set, returns "improvement", "regression", "plateau" or nothing
#[wasm_bindgen]
pub fn classify_progression(
    weight: Option<f64>,
    reps: Option<u32>,
    previous_weight: Option<f64>,
    previous_reps: Option<u32>,
    is_logged: bool,
) -> Option<String> {
    let set = SetData {
        weight,
        reps: SetReps::Bilateral { reps },
        previous_weight,
        previous_reps,
        is_logged,
    };
    strength::classify_progression(&set).map(|progression| progression.as_str().to_string())
}

/// Suggest the blank field of a half-filled set, "-" when there is nothing to suggest
#[wasm_bindgen]
pub fn recommend_next_set_value(
    weight: Option<f64>,
    reps: Option<u32>,
    previous_weight: Option<f64>,
    previous_reps: Option<u32>,
    previous_1rm: f64,
) -> String {
    let set = SetData {
        weight,
        reps: SetReps::Bilateral { reps },
        previous_weight,
        previous_reps,
        is_logged: false,
    };
    let config = MetricsConfig::default().recommendation;
    strength::recommend_next_set_value(&set, previous_1rm, &config).to_string()
}

/// Resolve a period token into `{"startDate": .., "endDate": ..}`.
///
/// Dates are ISO `YYYY-MM-DD`; `dataset_json` is a JSON array of such dates
/// and is only used by the "all" period.
#[wasm_bindgen]
pub fn resolve_date_range(
    period_token: &str,
    today: &str,
    start_date: Option<String>,
    end_date: Option<String>,
    dataset_json: Option<String>,
) -> Option<String> {
    let today: NaiveDate = today.parse().ok()?;
    let explicit = match (start_date, end_date) {
        (Some(start), Some(end)) => Some(DateRange::new(start.parse().ok()?, end.parse().ok()?)),
        _ => None,
    };
    let dataset: Vec<NaiveDate> = match dataset_json {
        Some(json) => serde_json::from_str(&json).ok()?,
        None => Vec::new(),
    };

    let period = Period::from_token(period_token, explicit).ok()?;
    let week_starts_on = MetricsConfig::default().week_starts_on;
    let range = periods::resolve_date_range(&period, today, &dataset, week_starts_on);
    serde_json::to_string(&range).ok()
}

/// Compose the metrics snapshot from JSON profile, goal and weight logs
#[wasm_bindgen]
pub fn metrics_snapshot(
    input_json: &str,
    goal_json: Option<String>,
    logs_json: Option<String>,
) -> Option<String> {
    let input: BodyMetricsInput = serde_json::from_str(input_json).ok()?;
    let goal: Option<WeightMeasurement> = match goal_json {
        Some(json) => Some(serde_json::from_str(&json).ok()?),
        None => None,
    };
    let logs: Vec<WeightLogEntry> = match logs_json {
        Some(json) => serde_json::from_str(&json).ok()?,
        None => Vec::new(),
    };

    let snapshot = snapshot::compose_snapshot(&input, goal, &logs, &MetricsConfig::default());
    serde_json::to_string(&snapshot).ok()
}
