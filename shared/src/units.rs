//! Unit conversion module
//!
//! Weight and height values arrive from profile and weight-log forms in the
//! user's preferred unit. Everything downstream (BMI, BMR, 1RM comparisons)
//! works in kilograms and centimetres, so conversion happens at the edges.
//!
//! Conversions return full precision. Call sites round to whatever their
//! screen needs: profile edits round to whole numbers, goal tracking to two
//! decimals (see [`round_to`]).

use crate::errors::MetricsError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pounds per kilogram
pub const LB_PER_KG: f64 = 2.20462;
/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.453592;
/// Inches per centimetre
pub const IN_PER_CM: f64 = 0.393701;
/// Centimetres per inch
pub const CM_PER_IN: f64 = 2.54;

/// Replace NaN and infinities with zero
#[inline]
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let value = finite_or_zero(value);
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

// ============================================================================
// Weight Units
// ============================================================================

/// Weight unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

impl WeightUnit {
    /// The unit a value in this unit converts into
    pub fn other(&self) -> Self {
        match self {
            WeightUnit::Kg => WeightUnit::Lb,
            WeightUnit::Lb => WeightUnit::Kg,
        }
    }

    /// Convert from this unit to kilograms
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => finite_or_zero(value),
            WeightUnit::Lb => convert_weight(value, WeightUnit::Lb),
        }
    }

    /// Convert from kilograms to this unit
    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            WeightUnit::Kg => finite_or_zero(kg),
            WeightUnit::Lb => convert_weight(kg, WeightUnit::Kg),
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lb => "lb",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for WeightUnit {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilogram" | "kilograms" => Ok(WeightUnit::Kg),
            "lb" | "lbs" | "pound" | "pounds" => Ok(WeightUnit::Lb),
            _ => Err(MetricsError::UnknownWeightUnit(s.to_string())),
        }
    }
}

/// Convert a weight into the other unit.
///
/// kg -> lb multiplies by 2.20462, lb -> kg by 0.453592. Non-finite input
/// yields 0.
pub fn convert_weight(value: f64, from: WeightUnit) -> f64 {
    let value = finite_or_zero(value);
    match from {
        WeightUnit::Kg => value * LB_PER_KG,
        WeightUnit::Lb => value * KG_PER_LB,
    }
}

/// A weight value tagged with its unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightMeasurement {
    pub value: f64,
    pub unit: WeightUnit,
}

impl WeightMeasurement {
    pub fn new(value: f64, unit: WeightUnit) -> Self {
        Self { value, unit }
    }

    pub fn kg(value: f64) -> Self {
        Self::new(value, WeightUnit::Kg)
    }

    pub fn lb(value: f64) -> Self {
        Self::new(value, WeightUnit::Lb)
    }

    /// Normalise to kilograms
    pub fn to_kg(&self) -> f64 {
        self.unit.to_kg(self.value)
    }

    /// Express this weight in `unit`
    pub fn in_unit(&self, unit: WeightUnit) -> f64 {
        unit.from_kg(self.to_kg())
    }
}

// ============================================================================
// Height Units
// ============================================================================

/// Height unit preference
///
/// `Ft` values are carried as total inches; the feet/inches split only
/// exists for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeightUnit {
    #[default]
    Cm,
    Ft,
}

impl HeightUnit {
    pub fn other(&self) -> Self {
        match self {
            HeightUnit::Cm => HeightUnit::Ft,
            HeightUnit::Ft => HeightUnit::Cm,
        }
    }

    /// Convert from this unit to centimeters
    pub fn to_cm(&self, value: f64) -> f64 {
        match self {
            HeightUnit::Cm => finite_or_zero(value),
            HeightUnit::Ft => convert_height(value, HeightUnit::Ft),
        }
    }

    /// Convert from centimeters to this unit
    pub fn from_cm(&self, cm: f64) -> f64 {
        match self {
            HeightUnit::Cm => finite_or_zero(cm),
            HeightUnit::Ft => convert_height(cm, HeightUnit::Cm),
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            HeightUnit::Cm => "cm",
            HeightUnit::Ft => "ft/in",
        }
    }
}

impl fmt::Display for HeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for HeightUnit {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cm" | "centimeter" | "centimeters" => Ok(HeightUnit::Cm),
            "ft" | "feet" | "ft/in" | "in" | "inch" | "inches" => Ok(HeightUnit::Ft),
            _ => Err(MetricsError::UnknownHeightUnit(s.to_string())),
        }
    }
}

/// Convert a height into the other unit.
///
/// cm -> inches multiplies by 0.393701, inches -> cm by 2.54.
pub fn convert_height(value: f64, from: HeightUnit) -> f64 {
    let value = finite_or_zero(value);
    match from {
        HeightUnit::Cm => value * IN_PER_CM,
        HeightUnit::Ft => value * CM_PER_IN,
    }
}

/// A height value tagged with its unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightMeasurement {
    pub value: f64,
    pub unit: HeightUnit,
}

impl HeightMeasurement {
    pub fn new(value: f64, unit: HeightUnit) -> Self {
        Self { value, unit }
    }

    pub fn cm(value: f64) -> Self {
        Self::new(value, HeightUnit::Cm)
    }

    pub fn inches(total_inches: f64) -> Self {
        Self::new(total_inches, HeightUnit::Ft)
    }

    /// Normalise to centimetres
    pub fn to_cm(&self) -> f64 {
        self.unit.to_cm(self.value)
    }
}

// ============================================================================
// Height Display Helper
// ============================================================================

/// Represents height in feet and inches for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeetInchesHeight {
    pub feet: u32,
    pub inches: u32,
}

impl FeetInchesHeight {
    /// Split total inches into whole feet and rounded inches
    pub fn from_total_inches(total_inches: f64) -> Self {
        let total = finite_or_zero(total_inches).max(0.0).round() as u32;
        Self {
            feet: total / 12,
            inches: total % 12,
        }
    }

    pub fn to_total_inches(&self) -> u32 {
        self.feet * 12 + self.inches
    }
}

impl fmt::Display for FeetInchesHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ft {} in", self.feet, self.inches)
    }
}

/// Format a height for display: "X ft Y in" for total inches, "X cm" otherwise
pub fn format_height(value: f64, unit: HeightUnit) -> String {
    match unit {
        HeightUnit::Ft => FeetInchesHeight::from_total_inches(value).to_string(),
        HeightUnit::Cm => format!("{} cm", round_to(value, 0).max(0.0)),
    }
}
