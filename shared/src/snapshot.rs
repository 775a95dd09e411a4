//! Derived per-user metrics snapshot
//!
//! Screens used to read current weight, BMI, BMR and friends from a shared
//! client store. Here the caller passes the profile and weight logs in and
//! gets a fresh snapshot back; nothing is cached between calls.

use crate::config::MetricsConfig;
use crate::health_metrics::{
    calculate_bmi_result, calculate_daily_water_ml, calculate_energy, calorie_targets,
    ActivityLevel, BiologicalSex, BmiResult, CalorieTargets, EnergyExpenditure, HealthProfile,
};
use crate::strength::Progression;
use crate::units::{finite_or_zero, round_to, HeightMeasurement, WeightMeasurement, WeightUnit};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Profile form values, in whatever units the user picked
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyMetricsInput {
    pub weight: WeightMeasurement,
    pub height: HeightMeasurement,
    pub age_years: u32,
    pub sex: BiologicalSex,
    #[serde(default)]
    pub activity_level: ActivityLevel,
}

impl BodyMetricsInput {
    /// Normalise to the SI profile used by the calculators
    pub fn to_profile(&self) -> HealthProfile {
        HealthProfile {
            height_cm: self.height.to_cm(),
            weight_kg: self.weight.to_kg(),
            age_years: self.age_years,
            sex: self.sex,
            activity_level: self.activity_level,
        }
    }
}

/// One weight-log record as fetched from the server
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightLogEntry {
    pub date: NaiveDate,
    pub weight: WeightMeasurement,
}

/// Everything the profile and dashboard screens display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Unit the user entered their weight in
    pub display_unit: WeightUnit,
    pub current_weight_kg: f64,
    pub goal_weight_kg: Option<f64>,
    pub bmi: BmiResult,
    pub energy: EnergyExpenditure,
    pub calorie_targets: CalorieTargets,
    /// Average change per week across the logs, kg
    pub weekly_change_kg: Option<f64>,
    pub goal_progress_percent: Option<f64>,
    pub daily_water_ml: u32,
}

impl MetricsSnapshot {
    /// Current weight in the user's display unit, two decimals
    pub fn current_weight_display(&self) -> f64 {
        round_to(self.display_unit.from_kg(self.current_weight_kg), 2)
    }
}

/// Compose the snapshot from the profile, an optional goal and the weight log.
///
/// The most recent log entry wins over the profile weight. BMR/TDEE/BMI are
/// computed from that current weight.
pub fn compose_snapshot(
    input: &BodyMetricsInput,
    goal: Option<WeightMeasurement>,
    logs: &[WeightLogEntry],
    config: &MetricsConfig,
) -> MetricsSnapshot {
    let mut sorted: Vec<&WeightLogEntry> = logs.iter().collect();
    sorted.sort_by_key(|entry| entry.date);

    let current_weight_kg = sorted
        .last()
        .map(|entry| entry.weight.to_kg())
        .unwrap_or_else(|| input.weight.to_kg());

    let mut profile = input.to_profile();
    profile.weight_kg = current_weight_kg;

    let energy = calculate_energy(&profile);
    let goal_weight_kg = goal.map(|g| g.to_kg()).filter(|kg| *kg > 0.0);
    let start_weight_kg = sorted.first().map(|entry| entry.weight.to_kg());

    let goal_progress_percent = match (start_weight_kg, goal_weight_kg) {
        (Some(start), Some(goal)) => goal_progress_percent(start, current_weight_kg, goal),
        _ => None,
    };

    debug!(
        entries = logs.len(),
        current_weight_kg,
        tdee = energy.tdee,
        "Composed metrics snapshot"
    );

    MetricsSnapshot {
        display_unit: input.weight.unit,
        current_weight_kg,
        goal_weight_kg,
        bmi: calculate_bmi_result(current_weight_kg, profile.height_cm),
        energy,
        calorie_targets: calorie_targets(
            energy.tdee,
            config.calorie_adjustment_kcal,
            input.weight.unit,
        ),
        weekly_change_kg: weekly_rate_of_change(logs),
        goal_progress_percent,
        daily_water_ml: calculate_daily_water_ml(current_weight_kg, profile.activity_level),
    }
}

/// Average weight change per week between the first and last log, in kg.
///
/// `None` with fewer than two entries or when they all fall on one day.
pub fn weekly_rate_of_change(logs: &[WeightLogEntry]) -> Option<f64> {
    let first = logs.iter().min_by_key(|entry| entry.date)?;
    let last = logs.iter().max_by_key(|entry| entry.date)?;

    let days = (last.date - first.date).num_days();
    if days <= 0 {
        return None;
    }
    let change = last.weight.to_kg() - first.weight.to_kg();
    Some(round_to(change / days as f64 * 7.0, 2))
}

/// Share of the way from `start` to `goal` already covered, 0-100, two decimals
pub fn goal_progress_percent(start_kg: f64, current_kg: f64, goal_kg: f64) -> Option<f64> {
    let start_kg = finite_or_zero(start_kg);
    let current_kg = finite_or_zero(current_kg);
    let goal_kg = finite_or_zero(goal_kg);
    if goal_kg <= 0.0 {
        return None;
    }

    let total = start_kg - goal_kg;
    if total == 0.0 {
        return Some(if current_kg == goal_kg { 100.0 } else { 0.0 });
    }
    let covered = (start_kg - current_kg) / total * 100.0;
    Some(round_to(covered.clamp(0.0, 100.0), 2))
}

/// Colour-code a weight-log change relative to the goal direction.
///
/// Moving toward the goal is an improvement, away is a regression, no change
/// is a plateau. Without a goal there is no direction to judge.
pub fn classify_weight_change(
    previous_kg: f64,
    current_kg: f64,
    goal_kg: Option<f64>,
) -> Option<Progression> {
    let goal = goal_kg.map(finite_or_zero).filter(|kg| *kg > 0.0)?;
    let previous_distance = (finite_or_zero(previous_kg) - goal).abs();
    let current_distance = (finite_or_zero(current_kg) - goal).abs();
    // Smaller distance to goal is better, so compare reversed
    Some(Progression::between(-previous_distance, -current_distance))
}
