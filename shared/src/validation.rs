//! Input validation functions
//!
//! Range checks for the profile and set-logging forms. Uses both custom
//! validators and the `validator` crate for derive macros.

use crate::errors::MetricsError;
use crate::health_metrics::{ActivityLevel, BiologicalSex};
use crate::snapshot::BodyMetricsInput;
use crate::units::{HeightMeasurement, HeightUnit, WeightMeasurement, WeightUnit};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Validate a weight value in any unit
pub fn validate_weight(value: f64) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if value < 0.0 {
        return Err("Weight cannot be negative".to_string());
    }
    Ok(())
}

/// Validate a height value in any unit
pub fn validate_height(value: f64) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err("Height must be a valid number".to_string());
    }
    if value <= 0.0 {
        return Err("Height must be greater than zero".to_string());
    }
    Ok(())
}

/// Valid activity levels
pub const VALID_ACTIVITY_LEVELS: &[&str] = &[
    "sedentary",
    "lightly_active",
    "moderately_active",
    "very_active",
    "extra_active",
];

/// Validate activity level
pub fn validate_activity_level(level: &str) -> Result<(), String> {
    level.parse::<ActivityLevel>().map(|_| ()).map_err(|_| {
        format!(
            "Invalid activity level. Must be one of: {}",
            VALID_ACTIVITY_LEVELS.join(", ")
        )
    })
}

/// Validate biological sex
pub fn validate_biological_sex(sex: &str) -> Result<(), String> {
    sex.parse::<BiologicalSex>()
        .map(|_| ())
        .map_err(|_| "Invalid biological sex. Must be one of: male, female".to_string())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "weight" => "Current Weight",
        "goal_weight" => "Goal Weight",
        "height" | "height_cm" => "Height",
        "age_years" => "Age",
        "sex" | "biological_sex" => "Biological Sex",
        "activity_level" => "Activity Level",
        "weight_unit" => "Weight Unit",
        "height_unit" => "Height Unit",
        "reps" => "Reps",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

impl From<ValidationError> for MetricsError {
    fn from(err: ValidationError) -> Self {
        MetricsError::Validation(err.user_message())
    }
}

// ============================================================================
// Profile Form
// ============================================================================

/// Raw profile form as submitted by the onboarding and profile-edit screens
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfileForm {
    #[validate(range(min = 0.0, max = 1500.0, message = "must be between 0 and 1500"))]
    pub weight: f64,
    pub weight_unit: String,
    #[validate(range(min = 0.1, max = 400.0, message = "must be between 0.1 and 400"))]
    pub height: f64,
    pub height_unit: String,
    #[validate(range(max = 150, message = "cannot exceed 150 years"))]
    pub age_years: u32,
    pub sex: String,
    pub activity_level: String,
}

impl ProfileForm {
    /// Validate every field and convert to typed input.
    ///
    /// Unknown units, sex or activity level are rejected here; the lenient
    /// activity fallback only applies to bare strings passed to the TDEE
    /// calculator.
    pub fn to_input(&self) -> Result<BodyMetricsInput, MetricsError> {
        self.validate()
            .map_err(|errors| MetricsError::Validation(errors.to_string()))?;

        validate_weight(self.weight).map_err(|msg| ValidationError::new("weight", &msg))?;
        validate_height(self.height).map_err(|msg| ValidationError::new("height", &msg))?;

        let weight_unit: WeightUnit = self.weight_unit.parse()?;
        let height_unit: HeightUnit = self.height_unit.parse()?;

        Ok(BodyMetricsInput {
            weight: WeightMeasurement::new(self.weight, weight_unit),
            height: HeightMeasurement::new(self.height, height_unit),
            age_years: self.age_years,
            sex: self.sex.parse()?,
            activity_level: self.activity_level.parse()?,
        })
    }
}
