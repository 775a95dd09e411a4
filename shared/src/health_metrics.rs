//! Health metrics calculations module
//!
//! BMI with its category, BMR (Mifflin-St Jeor), TDEE with activity
//! multipliers, calorie targets and a daily water goal.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: All calculations are pure, no side effects
//! 2. **Total**: Degenerate input (zero, NaN) yields 0 instead of panicking
//! 3. **Explicit fallbacks**: Unknown activity strings go through an
//!    [`UnknownActivityLevel`] policy rather than silently becoming NaN

use crate::errors::MetricsError;
use crate::units::{finite_or_zero, round_to, WeightUnit};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ============================================================================
// Profile Types
// ============================================================================

/// Biological sex for health calculations
/// Note: This is used for physiological calculations only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiologicalSex {
    Male,
    Female,
}

impl std::str::FromStr for BiologicalSex {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(BiologicalSex::Male),
            "female" | "f" => Ok(BiologicalSex::Female),
            _ => Err(MetricsError::UnknownSex(s.to_string())),
        }
    }
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    #[default]
    Sedentary,
    /// Light exercise 1-3 days/week
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise, physical job
    ExtraActive,
}

impl ActivityLevel {
    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise",
            ActivityLevel::LightlyActive => "Light exercise 1-3 days/week",
            ActivityLevel::ModeratelyActive => "Moderate exercise 3-5 days/week",
            ActivityLevel::VeryActive => "Hard exercise 6-7 days/week",
            ActivityLevel::ExtraActive => "Very hard exercise or physical job",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtraActive => "extra_active",
        }
    }
}

impl std::str::FromStr for ActivityLevel {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "lightly_active" => Ok(ActivityLevel::LightlyActive),
            "moderately_active" => Ok(ActivityLevel::ModeratelyActive),
            "very_active" => Ok(ActivityLevel::VeryActive),
            "extra_active" => Ok(ActivityLevel::ExtraActive),
            _ => Err(MetricsError::UnknownActivityLevel(s.to_string())),
        }
    }
}

/// What to do with an activity level string that does not parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnknownActivityLevel {
    /// Multiplier of 1.0, so TDEE equals BMR
    #[default]
    Neutral,
    /// Treat as sedentary (1.2)
    Sedentary,
    /// Return [`MetricsError::UnknownActivityLevel`]
    Reject,
}

/// User profile data needed for health calculations (SI units)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthProfile {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age_years: u32,
    pub sex: BiologicalSex,
    pub activity_level: ActivityLevel,
}

// ============================================================================
// BMI Calculations
// ============================================================================

/// BMI category classification (WHO bands)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Get the BMI range for this category
    pub fn range(&self) -> (f64, f64) {
        match self {
            BmiCategory::Underweight => (0.0, 18.5),
            BmiCategory::Normal => (18.5, 25.0),
            BmiCategory::Overweight => (25.0, 30.0),
            BmiCategory::Obese => (30.0, f64::INFINITY),
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    /// Display colour used by the UI badge. Presentation only.
    pub fn color_token(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "blue",
            BmiCategory::Normal => "green",
            BmiCategory::Overweight => "amber",
            BmiCategory::Obese => "red",
        }
    }
}

/// BMI calculation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    /// BMI value, one decimal
    pub bmi: f64,
    pub category: BmiCategory,
    pub category_color: String,
    /// Healthy weight range in kg for this height
    pub healthy_weight_range_kg: (f64, f64),
}

/// Calculate BMI from weight and height
///
/// Formula: BMI = weight(kg) / height(m)², rounded to one decimal.
/// Returns 0 when either input is non-positive or not finite.
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let weight_kg = finite_or_zero(weight_kg);
    let height_cm = finite_or_zero(height_cm);
    if weight_kg <= 0.0 || height_cm <= 0.0 {
        debug!(weight_kg, height_cm, "BMI requested with empty input");
        return 0.0;
    }
    // weight * 10_000 / cm² keeps the common cases exact in f64
    round_to(weight_kg * 10_000.0 / (height_cm * height_cm), 1)
}

/// Classify BMI into category
///
/// Each band is half-open, `[lower, upper)`. Non-finite input counts as 0.
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    let bmi = finite_or_zero(bmi);
    [
        BmiCategory::Underweight,
        BmiCategory::Normal,
        BmiCategory::Overweight,
    ]
    .into_iter()
    .find(|category| bmi < category.range().1)
    .unwrap_or(BmiCategory::Obese)
}

/// Calculate healthy weight range for a given height
///
/// Based on BMI 18.5-25 (normal range)
pub fn healthy_weight_range_kg(height_cm: f64) -> (f64, f64) {
    let height_m = finite_or_zero(height_cm).max(0.0) / 100.0;
    let height_m_sq = height_m * height_m;
    (round_to(18.5 * height_m_sq, 1), round_to(25.0 * height_m_sq, 1))
}

/// Calculate complete BMI result
pub fn calculate_bmi_result(weight_kg: f64, height_cm: f64) -> BmiResult {
    let bmi = calculate_bmi(weight_kg, height_cm);
    let category = classify_bmi(bmi);

    BmiResult {
        bmi,
        category,
        category_color: category.color_token().to_string(),
        healthy_weight_range_kg: healthy_weight_range_kg(height_cm),
    }
}

// ============================================================================
// BMR and TDEE Calculations
// ============================================================================

/// Default calorie deficit/surplus for weight change targets
pub const DEFAULT_CALORIE_ADJUSTMENT_KCAL: f64 = 500.0;

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor equation
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
///
/// Rounded to whole kcal/day.
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, sex: BiologicalSex) -> f64 {
    let base = 10.0 * finite_or_zero(weight_kg) + 6.25 * finite_or_zero(height_cm)
        - 5.0 * age_years as f64;
    let bmr = match sex {
        BiologicalSex::Male => base + 5.0,
        BiologicalSex::Female => base - 161.0,
    };
    bmr.round()
}

/// Resolve an activity level string to its multiplier under `policy`
pub fn activity_multiplier(level: &str, policy: UnknownActivityLevel) -> Result<f64, MetricsError> {
    match level.parse::<ActivityLevel>() {
        Ok(level) => Ok(level.multiplier()),
        Err(err) => match policy {
            UnknownActivityLevel::Neutral => {
                warn!(activity_level = level, "Unknown activity level, using neutral multiplier");
                Ok(1.0)
            }
            UnknownActivityLevel::Sedentary => {
                warn!(activity_level = level, "Unknown activity level, treating as sedentary");
                Ok(ActivityLevel::Sedentary.multiplier())
            }
            UnknownActivityLevel::Reject => Err(err),
        },
    }
}

/// Calculate Total Daily Energy Expenditure
///
/// TDEE = round(BMR × Activity Multiplier)
pub fn calculate_tdee(bmr: f64, level: ActivityLevel) -> f64 {
    (finite_or_zero(bmr) * level.multiplier()).round()
}

/// Calculate TDEE from an activity level string
pub fn calculate_tdee_for(
    bmr: f64,
    level: &str,
    policy: UnknownActivityLevel,
) -> Result<f64, MetricsError> {
    let multiplier = activity_multiplier(level, policy)?;
    Ok((finite_or_zero(bmr) * multiplier).round())
}

/// Daily energy expenditure, kcal/day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyExpenditure {
    pub bmr: f64,
    pub tdee: f64,
}

/// Calculate BMR and TDEE for a profile
pub fn calculate_energy(profile: &HealthProfile) -> EnergyExpenditure {
    let bmr = calculate_bmr(
        profile.weight_kg,
        profile.height_cm,
        profile.age_years,
        profile.sex,
    );
    EnergyExpenditure {
        bmr,
        tdee: calculate_tdee(bmr, profile.activity_level),
    }
}

/// Calorie targets derived from TDEE
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieTargets {
    pub maintain: f64,
    pub lose: f64,
    pub gain: f64,
    /// Approximate weekly rate shown next to the lose/gain targets
    pub rate_hint: String,
}

/// Calculate calorie targets around TDEE
///
/// The adjustment is fixed regardless of unit system; the rate hint is a
/// display approximation, not separately computed.
pub fn calorie_targets(tdee: f64, adjustment_kcal: f64, display_unit: WeightUnit) -> CalorieTargets {
    let tdee = finite_or_zero(tdee);
    let rate_hint = match display_unit {
        WeightUnit::Lb => "~1 lb/week",
        WeightUnit::Kg => "~0.5 kg/week",
    };

    CalorieTargets {
        maintain: tdee,
        lose: tdee - adjustment_kcal,
        gain: tdee + adjustment_kcal,
        rate_hint: rate_hint.to_string(),
    }
}

// ============================================================================
// Hydration Calculations
// ============================================================================

/// Calculate recommended daily water intake
///
/// Base formula: 30ml per kg of body weight, adjusted for activity level
pub fn calculate_daily_water_ml(weight_kg: f64, activity_level: ActivityLevel) -> u32 {
    let base_ml = finite_or_zero(weight_kg).max(0.0) * 30.0;
    let adjusted = match activity_level {
        ActivityLevel::Sedentary => base_ml,
        ActivityLevel::LightlyActive => base_ml * 1.1,
        ActivityLevel::ModeratelyActive => base_ml * 1.2,
        ActivityLevel::VeryActive => base_ml * 1.3,
        ActivityLevel::ExtraActive => base_ml * 1.4,
    };
    adjusted.round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    // =========================================================================
    // BMI Tests
    // =========================================================================

    #[test]
    fn test_bmi_calculation() {
        assert_eq!(calculate_bmi(70.0, 175.0), 22.9);
        assert_eq!(calculate_bmi(72.5, 200.0), 18.1);
        assert_eq!(calculate_bmi(56.0, 160.0), 21.9);
    }

    #[test]
    fn test_bmi_boundary_examples() {
        let result = calculate_bmi_result(72.5, 200.0);
        assert_eq!(result.category, BmiCategory::Underweight);
        assert_eq!(result.category_color, "blue");

        let result = calculate_bmi_result(56.0, 160.0);
        assert_eq!(result.category, BmiCategory::Normal);
        assert_eq!(result.category_color, "green");
    }

    #[rstest]
    #[case(0.0, 175.0)]
    #[case(70.0, 0.0)]
    #[case(f64::NAN, 175.0)]
    #[case(70.0, f64::NAN)]
    #[case(70.0, -10.0)]
    fn test_bmi_degenerate_input(#[case] weight: f64, #[case] height: f64) {
        assert_eq!(calculate_bmi(weight, height), 0.0);
    }

    #[rstest]
    #[case(17.0, BmiCategory::Underweight)]
    #[case(18.4, BmiCategory::Underweight)]
    #[case(18.5, BmiCategory::Normal)]
    #[case(24.9, BmiCategory::Normal)]
    #[case(25.0, BmiCategory::Overweight)]
    #[case(29.9, BmiCategory::Overweight)]
    #[case(30.0, BmiCategory::Obese)]
    #[case(42.0, BmiCategory::Obese)]
    fn test_bmi_categories(#[case] bmi: f64, #[case] expected: BmiCategory) {
        assert_eq!(classify_bmi(bmi), expected);
    }

    #[test]
    fn test_category_ranges_match_classification() {
        for category in [
            BmiCategory::Underweight,
            BmiCategory::Normal,
            BmiCategory::Overweight,
            BmiCategory::Obese,
        ] {
            let (lower, upper) = category.range();
            assert_eq!(classify_bmi(lower), category);
            if upper.is_finite() {
                assert_ne!(classify_bmi(upper), category);
            }
        }
        assert_eq!(classify_bmi(f64::NAN), BmiCategory::Underweight);
    }

    #[test]
    fn test_category_colors_distinct() {
        let colors = [
            BmiCategory::Underweight.color_token(),
            BmiCategory::Normal.color_token(),
            BmiCategory::Overweight.color_token(),
            BmiCategory::Obese.color_token(),
        ];
        assert_eq!(colors, ["blue", "green", "amber", "red"]);
    }

    #[test]
    fn test_healthy_weight_range() {
        // For 175cm, healthy range should be ~56.7-76.6 kg
        let (min, max) = healthy_weight_range_kg(175.0);
        assert!((min - 56.7).abs() < 0.5);
        assert!((max - 76.6).abs() < 0.5);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: BMI is always positive for valid inputs
        #[test]
        fn prop_bmi_positive(weight in 20.0f64..500.0, height in 100.0f64..250.0) {
            prop_assert!(calculate_bmi(weight, height) > 0.0);
        }

        /// Property: Heavier weight = higher BMI (same height)
        #[test]
        fn prop_bmi_increases_with_weight(
            weight1 in 50.0f64..100.0,
            weight2 in 101.0f64..150.0,
            height in 150.0f64..200.0
        ) {
            let bmi1 = calculate_bmi(weight1, height);
            let bmi2 = calculate_bmi(weight2, height);
            prop_assert!(bmi2 > bmi1);
        }

        /// Property: Same inputs, same output
        #[test]
        fn prop_bmi_idempotent(weight in 20.0f64..300.0, height in 100.0f64..250.0) {
            prop_assert_eq!(calculate_bmi_result(weight, height), calculate_bmi_result(weight, height));
        }
    }

    // =========================================================================
    // BMR/TDEE Tests
    // =========================================================================

    #[test]
    fn test_bmr_mifflin() {
        assert_eq!(calculate_bmr(80.0, 180.0, 30, BiologicalSex::Male), 1780.0);
        // 10*60 + 6.25*165 - 150 - 161 = 1320.25
        assert_eq!(calculate_bmr(60.0, 165.0, 30, BiologicalSex::Female), 1320.0);
    }

    #[test]
    fn test_tdee_and_targets() {
        let tdee = calculate_tdee(1780.0, ActivityLevel::ModeratelyActive);
        assert_eq!(tdee, 2759.0);

        let targets = calorie_targets(tdee, DEFAULT_CALORIE_ADJUSTMENT_KCAL, WeightUnit::Kg);
        assert_eq!(targets.lose, 2259.0);
        assert_eq!(targets.gain, 3259.0);
        assert_eq!(targets.maintain, 2759.0);
        assert_eq!(targets.rate_hint, "~0.5 kg/week");

        let targets = calorie_targets(tdee, DEFAULT_CALORIE_ADJUSTMENT_KCAL, WeightUnit::Lb);
        assert_eq!(targets.rate_hint, "~1 lb/week");
    }

    #[test]
    fn test_calculate_energy() {
        let profile = HealthProfile {
            height_cm: 180.0,
            weight_kg: 80.0,
            age_years: 30,
            sex: BiologicalSex::Male,
            activity_level: ActivityLevel::ModeratelyActive,
        };
        let energy = calculate_energy(&profile);
        assert_eq!(energy, EnergyExpenditure { bmr: 1780.0, tdee: 2759.0 });
    }

    #[rstest]
    #[case("sedentary", 1.2)]
    #[case("lightly_active", 1.375)]
    #[case("Moderately_Active", 1.55)]
    #[case("very-active", 1.725)]
    #[case("extra active", 1.9)]
    fn test_activity_multiplier_known(#[case] level: &str, #[case] expected: f64) {
        for policy in [
            UnknownActivityLevel::Neutral,
            UnknownActivityLevel::Sedentary,
            UnknownActivityLevel::Reject,
        ] {
            assert_eq!(activity_multiplier(level, policy).unwrap(), expected);
        }
    }

    #[test]
    fn test_unknown_activity_level_policies() {
        assert_eq!(
            calculate_tdee_for(1780.0, "couch", UnknownActivityLevel::Neutral).unwrap(),
            1780.0
        );
        assert_eq!(
            calculate_tdee_for(1780.0, "couch", UnknownActivityLevel::Sedentary).unwrap(),
            2136.0
        );
        assert!(matches!(
            calculate_tdee_for(1780.0, "couch", UnknownActivityLevel::Reject),
            Err(MetricsError::UnknownActivityLevel(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: Male BMR > Female BMR (same stats)
        #[test]
        fn prop_male_bmr_higher(
            weight in 50.0f64..100.0,
            height in 160.0f64..190.0,
            age in 20u32..60
        ) {
            let bmr_male = calculate_bmr(weight, height, age, BiologicalSex::Male);
            let bmr_female = calculate_bmr(weight, height, age, BiologicalSex::Female);
            prop_assert!(bmr_male > bmr_female);
        }

        /// Property: TDEE > BMR (activity multiplier > 1)
        #[test]
        fn prop_tdee_greater_than_bmr(bmr in 1000.0f64..3000.0) {
            prop_assert!(calculate_tdee(bmr, ActivityLevel::Sedentary) > bmr);
        }
    }

    // =========================================================================
    // Hydration Tests
    // =========================================================================

    #[test]
    fn test_hydration_calculation() {
        assert_eq!(calculate_daily_water_ml(70.0, ActivityLevel::Sedentary), 2100);
        assert_eq!(calculate_daily_water_ml(70.0, ActivityLevel::VeryActive), 2730);
        assert_eq!(calculate_daily_water_ml(f64::NAN, ActivityLevel::VeryActive), 0);
    }

    #[test]
    fn test_sex_parsing() {
        assert_eq!("Male".parse::<BiologicalSex>().unwrap(), BiologicalSex::Male);
        assert_eq!("female".parse::<BiologicalSex>().unwrap(), BiologicalSex::Female);
        assert!("other".parse::<BiologicalSex>().is_err());
    }
}
