//! Strength training calculations
//!
//! Provides the Epley one-rep-max estimate used for personal records and
//! set-by-set progression, plus the "what do I need to beat last time"
//! recommendation shown next to a partially filled set.

use crate::errors::MetricsError;
use crate::units::{finite_or_zero, round_to};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use validator::Validate;

/// Whether an exercise is performed with both limbs together or one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Laterality {
    #[default]
    Bilateral,
    Unilateral,
}

/// Rep counts entered for a set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "laterality", rename_all = "snake_case")]
pub enum SetReps {
    Bilateral {
        reps: Option<u32>,
    },
    Unilateral {
        left: Option<u32>,
        right: Option<u32>,
    },
}

impl Default for SetReps {
    fn default() -> Self {
        SetReps::Bilateral { reps: None }
    }
}

impl SetReps {
    pub fn bilateral(reps: u32) -> Self {
        SetReps::Bilateral { reps: Some(reps) }
    }

    pub fn unilateral(left: u32, right: u32) -> Self {
        SetReps::Unilateral {
            left: Some(left),
            right: Some(right),
        }
    }

    pub fn laterality(&self) -> Laterality {
        match self {
            SetReps::Bilateral { .. } => Laterality::Bilateral,
            SetReps::Unilateral { .. } => Laterality::Unilateral,
        }
    }

    /// Reps used for 1RM purposes.
    ///
    /// A unilateral set counts as its weaker side; a side left blank is
    /// ignored.
    pub fn effective(&self) -> Option<u32> {
        match *self {
            SetReps::Bilateral { reps } => reps,
            SetReps::Unilateral { left, right } => match (left, right) {
                (Some(l), Some(r)) => Some(l.min(r)),
                (Some(side), None) | (None, Some(side)) => Some(side),
                (None, None) => None,
            },
        }
    }
}

/// One set entry during a logging session
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SetData {
    /// Weight entered for this set, `None` while blank
    pub weight: Option<f64>,
    #[serde(default)]
    pub reps: SetReps,
    /// Same set position from the previous session
    pub previous_weight: Option<f64>,
    pub previous_reps: Option<u32>,
    #[serde(default)]
    pub is_logged: bool,
}

impl SetData {
    /// Current weight, treating NaN and non-positive values as blank
    fn current_weight(&self) -> Option<f64> {
        self.weight
            .map(finite_or_zero)
            .filter(|weight| *weight > 0.0)
    }

    /// Estimated 1RM of the current values, if both are filled in
    pub fn one_rep_max(&self) -> Option<f64> {
        let weight = self.current_weight()?;
        let reps = self.reps.effective()?;
        Some(estimate_one_rep_max(weight, reps))
    }
}

/// Estimate one-rep-max with the Epley formula: weight × (1 + reps/30)
///
/// Rounded to two decimals. Non-finite weight yields 0.
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> f64 {
    let weight = finite_or_zero(weight);
    round_to(weight * (1.0 + reps as f64 / 30.0), 2)
}

/// Estimated 1RM of the previous session's set at this position
pub fn previous_one_rep_max(set: &SetData) -> Option<f64> {
    let weight = set.previous_weight.map(finite_or_zero)?;
    let reps = set.previous_reps?;
    Some(estimate_one_rep_max(weight, reps))
}

// ============================================================================
// Progression
// ============================================================================

/// Outcome of comparing a logged set against the previous session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Progression {
    Improvement,
    Regression,
    Plateau,
}

impl Progression {
    /// Indicator colour shown next to the set
    pub fn color_token(&self) -> &'static str {
        match self {
            Progression::Improvement => "green",
            Progression::Regression => "red",
            Progression::Plateau => "blue",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Progression::Improvement => "improvement",
            Progression::Regression => "regression",
            Progression::Plateau => "plateau",
        }
    }

    /// Compare two estimates
    pub fn between(previous: f64, current: f64) -> Self {
        if current > previous {
            Progression::Improvement
        } else if current < previous {
            Progression::Regression
        } else {
            Progression::Plateau
        }
    }
}

impl fmt::Display for Progression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a set against the previous session's set at the same position.
///
/// Only logged sets are classified. Returns `None` when the set is not
/// logged or either side of the comparison is incomplete.
pub fn classify_progression(set: &SetData) -> Option<Progression> {
    if !set.is_logged {
        return None;
    }
    let current = set.one_rep_max()?;
    let previous = previous_one_rep_max(set)?;
    Some(Progression::between(previous, current))
}

// ============================================================================
// Personal Records
// ============================================================================

/// Best estimated 1RM across the logged sets of a session
pub fn best_one_rep_max(sets: &[SetData]) -> Option<f64> {
    sets.iter()
        .filter(|set| set.is_logged)
        .filter_map(SetData::one_rep_max)
        .fold(None, |best, value| match best {
            Some(b) if b >= value => Some(b),
            _ => Some(value),
        })
}

/// Whether a logged set beats the historical best 1RM
pub fn is_personal_record(set: &SetData, historical_best: Option<f64>) -> bool {
    if !set.is_logged {
        return false;
    }
    match (set.one_rep_max(), historical_best) {
        (Some(current), Some(best)) => current > best,
        (Some(current), None) => current > 0.0,
        (None, _) => false,
    }
}

// ============================================================================
// Next-set Recommendation
// ============================================================================

/// Upper bound on plate increments tried by a weight suggestion
const MAX_WEIGHT_STEPS: u32 = 10_000;

/// Tuning for [`recommend_next_set_value`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Smallest plate jump for weight suggestions
    #[validate(range(min = 0.01, max = 1000.0, message = "must be between 0.01 and 1000"))]
    pub weight_increment: f64,
    /// Weight suggestions never exceed this multiple of the previous weight
    #[validate(range(min = 1.0, max = 100.0, message = "must be between 1 and 100"))]
    pub weight_cap_multiplier: f64,
    /// Upper bound for rep suggestions
    #[validate(range(min = 1, max = 1000, message = "must be between 1 and 1000"))]
    pub max_reps: u32,
}

impl RecommendationConfig {
    /// Range-check the tunables; NaN and infinities are rejected too
    pub fn check(&self) -> Result<(), MetricsError> {
        if !self.weight_increment.is_finite() || !self.weight_cap_multiplier.is_finite() {
            return Err(MetricsError::Validation(
                "recommendation: weight_increment and weight_cap_multiplier must be finite"
                    .to_string(),
            ));
        }
        self.validate()
            .map_err(|errors| MetricsError::Validation(errors.to_string()))
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            weight_increment: 2.5,
            weight_cap_multiplier: 3.0,
            max_reps: 100,
        }
    }
}

/// Value to show in the empty field of a half-filled set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Recommendation {
    Reps(u32),
    Weight(f64),
    None,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Reps(reps) => write!(f, "{}", reps),
            Recommendation::Weight(weight) => write!(f, "{}", weight),
            Recommendation::None => write!(f, "-"),
        }
    }
}

/// Suggest the missing value of a partially filled set so that its projected
/// 1RM strictly beats `previous_1rm`.
///
/// - weight entered, reps blank: solve Epley for reps, clamped to
///   `1..=max_reps`; falls back to the previous rep count when the weight
///   alone already beats the previous 1RM
/// - reps entered, weight blank: search upward in plate increments, capped
///   at `weight_cap_multiplier` × previous weight
/// - anything else: [`Recommendation::None`]
pub fn recommend_next_set_value(
    set: &SetData,
    previous_1rm: f64,
    config: &RecommendationConfig,
) -> Recommendation {
    let previous_1rm = finite_or_zero(previous_1rm);
    if previous_1rm <= 0.0 {
        return Recommendation::None;
    }

    match (set.current_weight(), set.reps.effective()) {
        (Some(weight), None) => recommend_reps(weight, previous_1rm, set.previous_reps, config),
        (None, Some(reps)) => recommend_weight(reps, previous_1rm, set.previous_weight, config),
        _ => Recommendation::None,
    }
}

fn recommend_reps(
    weight: f64,
    previous_1rm: f64,
    previous_reps: Option<u32>,
    config: &RecommendationConfig,
) -> Recommendation {
    let raw = (30.0 * (previous_1rm / weight - 1.0)).ceil();
    if raw <= 0.0 {
        debug!(weight, previous_1rm, "Weight alone beats previous 1RM");
        return previous_reps.map_or(Recommendation::None, Recommendation::Reps);
    }

    let max_reps = config.max_reps.max(1);
    let mut reps = raw.min(max_reps as f64) as u32;
    // ceil() lands exactly on the previous 1RM when the division is exact
    if estimate_one_rep_max(weight, reps) <= previous_1rm && reps < max_reps {
        reps += 1;
    }
    Recommendation::Reps(reps)
}

fn recommend_weight(
    reps: u32,
    previous_1rm: f64,
    previous_weight: Option<f64>,
    config: &RecommendationConfig,
) -> Recommendation {
    let increment = if config.weight_increment.is_finite() && config.weight_increment > 0.0 {
        config.weight_increment
    } else {
        RecommendationConfig::default().weight_increment
    };
    let cap_base = previous_weight
        .map(finite_or_zero)
        .filter(|weight| *weight > 0.0)
        .unwrap_or(previous_1rm);
    let cap = cap_base * finite_or_zero(config.weight_cap_multiplier);

    let start = previous_1rm / (1.0 + reps as f64 / 30.0);
    let mut weight = (start / increment).ceil() * increment;

    let mut steps = 0;
    while estimate_one_rep_max(weight, reps) <= previous_1rm {
        let next = weight + increment;
        steps += 1;
        // Increments below the float resolution of `weight` never advance
        if next <= weight || steps > MAX_WEIGHT_STEPS {
            debug!(reps, previous_1rm, increment, "Weight suggestion did not converge");
            return Recommendation::None;
        }
        weight = next;
        if weight > cap {
            debug!(reps, previous_1rm, cap, "Weight suggestion hit the cap");
            return Recommendation::None;
        }
    }

    if !weight.is_finite() || weight > cap {
        return Recommendation::None;
    }
    Recommendation::Weight(round_to(weight, 2))
}
