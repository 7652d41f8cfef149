use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::errors::{ensure_finite, CalcError, CalcResult};

// Angle unit used by the trigonometric functions
// Serialized with the short legacy tags so persisted snapshots stay readable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AngleMode {
    #[default]
    #[serde(rename = "rad")]
    Radians,
    #[serde(rename = "deg")]
    Degrees,
    #[serde(rename = "grad")]
    Gradians,
}

impl AngleMode {
    /// Convert an angle expressed in this mode to radians
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            AngleMode::Radians => angle,
            AngleMode::Degrees => angle * std::f64::consts::PI / 180.0,
            AngleMode::Gradians => angle * std::f64::consts::PI / 200.0,
        }
    }

    /// Convert radians back to this mode
    pub fn from_radians(self, radians: f64) -> f64 {
        match self {
            AngleMode::Radians => radians,
            AngleMode::Degrees => radians * 180.0 / std::f64::consts::PI,
            AngleMode::Gradians => radians * 200.0 / std::f64::consts::PI,
        }
    }

    /// Indicator label ("RAD", "DEG", "GRAD")
    pub fn label(self) -> &'static str {
        match self {
            AngleMode::Radians => "RAD",
            AngleMode::Degrees => "DEG",
            AngleMode::Gradians => "GRAD",
        }
    }
}

impl FromStr for AngleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rad" | "radians" => Ok(AngleMode::Radians),
            "deg" | "degrees" => Ok(AngleMode::Degrees),
            "grad" | "gradians" => Ok(AngleMode::Gradians),
            _ => Err(format!("Unknown angle mode: {}", s)),
        }
    }
}

/// Binary operators that can be pending between two operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
}

impl Operator {
    /// Symbol used in the expression trace
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "−",
            Operator::Mul => "×",
            Operator::Div => "÷",
            Operator::Pow => "^",
            Operator::Mod => "mod",
        }
    }

    /// Map a typed operator character to an operator
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' | '−' => Some(Operator::Sub),
            '*' | '×' => Some(Operator::Mul),
            '/' | '÷' => Some(Operator::Div),
            '^' => Some(Operator::Pow),
            _ => None,
        }
    }

    /// Apply the operator to `(lhs, rhs)`
    ///
    /// Division by an exact zero is reported as `DivisionByZero`; any other
    /// non-finite outcome is a `MathError`.
    pub fn apply(self, lhs: f64, rhs: f64) -> CalcResult<f64> {
        let result = match self {
            Operator::Add => lhs + rhs,
            Operator::Sub => lhs - rhs,
            Operator::Mul => lhs * rhs,
            Operator::Div => {
                if rhs == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                lhs / rhs
            }
            Operator::Pow => lhs.powf(rhs),
            // Remainder keeps the sign of the dividend
            Operator::Mod => lhs % rhs,
        };
        ensure_finite(result)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// A committed calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    // Older snapshots carry no id; give those a fresh one
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub expression: String,
    pub result: f64,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(expression: impl Into<String>, result: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            expression: expression.into(),
            result,
            timestamp: Utc::now(),
        }
    }
}

/// A conversion the user chose to keep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRecord {
    pub from_value: f64,
    pub from_unit: String,
    pub to_value: f64,
    pub to_unit: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversionRecord {
    pub fn new(from_value: f64, from_unit: impl Into<String>, to_value: f64, to_unit: impl Into<String>) -> Self {
        Self {
            from_value,
            from_unit: from_unit.into(),
            to_value,
            to_unit: to_unit.into(),
            timestamp: Utc::now(),
        }
    }

    /// "<from> <unit> = <to> <unit>" line used for clipboard text
    pub fn to_line(&self) -> String {
        format!("{} {} = {} {}", self.from_value, self.from_unit, self.to_value, self.to_unit)
    }
}

/// Everything that survives a restart
///
/// Field names match the legacy stored layout. Missing fields fall back to
/// their defaults individually.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
    pub memory: f64,
    pub history: Vec<HistoryEntry>,
    pub conversion_history: Vec<ConversionRecord>,
    pub angle_mode: AngleMode,
    pub theme: Theme,
}
