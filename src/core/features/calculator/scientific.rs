//! Scientific functions and constants
//!
//! Trigonometric functions take their argument in the current angle mode and
//! inverse trigonometric functions return their result in it. Every other
//! function ignores the angle mode.

use serde::{Deserialize, Serialize};

use crate::shared::errors::{ensure_finite, CalcError, CalcResult};
use crate::shared::format::format_number;
use crate::shared::types::{AngleMode, Operator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScientificFunction {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Log,
    Ln,
    Exp,
    Sqrt,
    Cbrt,
    Fact,
    Abs,
    Pi,
    E,
    Rand,
    Pow,
    Mod,
}

impl ScientificFunction {
    pub const ALL: [ScientificFunction; 24] = [
        ScientificFunction::Sin,
        ScientificFunction::Cos,
        ScientificFunction::Tan,
        ScientificFunction::Asin,
        ScientificFunction::Acos,
        ScientificFunction::Atan,
        ScientificFunction::Sinh,
        ScientificFunction::Cosh,
        ScientificFunction::Tanh,
        ScientificFunction::Asinh,
        ScientificFunction::Acosh,
        ScientificFunction::Atanh,
        ScientificFunction::Log,
        ScientificFunction::Ln,
        ScientificFunction::Exp,
        ScientificFunction::Sqrt,
        ScientificFunction::Cbrt,
        ScientificFunction::Fact,
        ScientificFunction::Abs,
        ScientificFunction::Pi,
        ScientificFunction::E,
        ScientificFunction::Rand,
        ScientificFunction::Pow,
        ScientificFunction::Mod,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScientificFunction::Sin => "sin",
            ScientificFunction::Cos => "cos",
            ScientificFunction::Tan => "tan",
            ScientificFunction::Asin => "asin",
            ScientificFunction::Acos => "acos",
            ScientificFunction::Atan => "atan",
            ScientificFunction::Sinh => "sinh",
            ScientificFunction::Cosh => "cosh",
            ScientificFunction::Tanh => "tanh",
            ScientificFunction::Asinh => "asinh",
            ScientificFunction::Acosh => "acosh",
            ScientificFunction::Atanh => "atanh",
            ScientificFunction::Log => "log",
            ScientificFunction::Ln => "ln",
            ScientificFunction::Exp => "exp",
            ScientificFunction::Sqrt => "sqrt",
            ScientificFunction::Cbrt => "cbrt",
            ScientificFunction::Fact => "fact",
            ScientificFunction::Abs => "abs",
            ScientificFunction::Pi => "pi",
            ScientificFunction::E => "e",
            ScientificFunction::Rand => "rand",
            ScientificFunction::Pow => "pow",
            ScientificFunction::Mod => "mod",
        }
    }

    /// Look a function up by name or symbol
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "√" => return Some(ScientificFunction::Sqrt),
            "∛" => return Some(ScientificFunction::Cbrt),
            "π" => return Some(ScientificFunction::Pi),
            "!" | "factorial" => return Some(ScientificFunction::Fact),
            _ => {}
        }
        let lower = name.to_lowercase();
        Self::ALL.into_iter().find(|f| f.name() == lower)
    }

    /// Functions that capture an operand and wait for a second one
    pub fn deferred_operator(self) -> Option<Operator> {
        match self {
            ScientificFunction::Pow => Some(Operator::Pow),
            ScientificFunction::Mod => Some(Operator::Mod),
            _ => None,
        }
    }

    /// Functions that ignore the current entry
    pub fn is_nullary(self) -> bool {
        matches!(self, ScientificFunction::Pi | ScientificFunction::E | ScientificFunction::Rand)
    }

    /// Compute the function for `value`
    ///
    /// Fails with `MathError` on a NaN or infinite result and with
    /// `InvalidInput` for a factorial outside its domain.
    pub fn evaluate(self, value: f64, mode: AngleMode) -> CalcResult<f64> {
        let result = match self {
            ScientificFunction::Sin => mode.to_radians(value).sin(),
            ScientificFunction::Cos => mode.to_radians(value).cos(),
            ScientificFunction::Tan => mode.to_radians(value).tan(),
            ScientificFunction::Asin => mode.from_radians(value.asin()),
            ScientificFunction::Acos => mode.from_radians(value.acos()),
            ScientificFunction::Atan => mode.from_radians(value.atan()),
            ScientificFunction::Sinh => value.sinh(),
            ScientificFunction::Cosh => value.cosh(),
            ScientificFunction::Tanh => value.tanh(),
            ScientificFunction::Asinh => value.asinh(),
            ScientificFunction::Acosh => value.acosh(),
            ScientificFunction::Atanh => value.atanh(),
            ScientificFunction::Log => value.log10(),
            ScientificFunction::Ln => value.ln(),
            ScientificFunction::Exp => value.exp(),
            ScientificFunction::Sqrt => value.sqrt(),
            ScientificFunction::Cbrt => value.cbrt(),
            ScientificFunction::Fact => factorial(value)?,
            ScientificFunction::Abs => value.abs(),
            ScientificFunction::Pi => std::f64::consts::PI,
            ScientificFunction::E => std::f64::consts::E,
            ScientificFunction::Rand => rand::random::<f64>(),
            ScientificFunction::Pow | ScientificFunction::Mod => {
                return Err(CalcError::InvalidInput(format!("{} needs a second operand", self.name())));
            }
        };
        ensure_finite(result)
    }

    /// Function-call style label for the expression trace
    pub fn label(self, value: f64) -> String {
        let v = format_number(value);
        match self {
            ScientificFunction::Exp => format!("e^({})", v),
            ScientificFunction::Sqrt => format!("√({})", v),
            ScientificFunction::Cbrt => format!("∛({})", v),
            ScientificFunction::Fact => format!("{}!", v),
            ScientificFunction::Abs => format!("|{}|", v),
            ScientificFunction::Pi => "π".to_string(),
            ScientificFunction::E => "e".to_string(),
            ScientificFunction::Rand => "rand()".to_string(),
            ScientificFunction::Pow => format!("{} ^ ", v),
            ScientificFunction::Mod => format!("{} mod ", v),
            _ => format!("{}({})", self.name(), v),
        }
    }
}

/// n! for non-negative integral `n`
///
/// No upper bound: large inputs overflow to infinity, which callers reject
/// through their finite-result check.
pub fn factorial(n: f64) -> CalcResult<f64> {
    if n < 0.0 || n.fract() != 0.0 || !n.is_finite() {
        return Err(CalcError::InvalidInput(format!("factorial of {}", format_number(n))));
    }
    if n == 0.0 || n == 1.0 {
        return Ok(1.0);
    }
    let mut result = 1.0;
    let mut i = 2.0;
    while i <= n {
        result *= i;
        i += 1.0;
        if result.is_infinite() {
            break;
        }
    }
    Ok(result)
}

/// Entries of the constants panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constant {
    Pi,
    Euler,
    GoldenRatio,
    Sqrt2,
    Sqrt3,
    SpeedOfLight,
    Gravity,
    Gravitational,
}

impl Constant {
    pub const ALL: [Constant; 8] = [
        Constant::Pi,
        Constant::Euler,
        Constant::GoldenRatio,
        Constant::Sqrt2,
        Constant::Sqrt3,
        Constant::SpeedOfLight,
        Constant::Gravity,
        Constant::Gravitational,
    ];

    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::Euler => std::f64::consts::E,
            Constant::GoldenRatio => (1.0 + 5f64.sqrt()) / 2.0,
            Constant::Sqrt2 => std::f64::consts::SQRT_2,
            Constant::Sqrt3 => 3f64.sqrt(),
            Constant::SpeedOfLight => 299_792_458.0,
            Constant::Gravity => 9.80665,
            Constant::Gravitational => 6.67430e-11,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Constant::Pi => "π",
            Constant::Euler => "e",
            Constant::GoldenRatio => "φ",
            Constant::Sqrt2 => "√2",
            Constant::Sqrt3 => "√3",
            Constant::SpeedOfLight => "c",
            Constant::Gravity => "g",
            Constant::Gravitational => "G",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "π (Pi)",
            Constant::Euler => "e (Euler's)",
            Constant::GoldenRatio => "φ (Golden Ratio)",
            Constant::Sqrt2 => "√2",
            Constant::Sqrt3 => "√3",
            Constant::SpeedOfLight => "c (Light Speed)",
            Constant::Gravity => "g (Gravity)",
            Constant::Gravitational => "G (Gravitational)",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Constant::Pi => "Ratio of circle circumference to diameter",
            Constant::Euler => "Base of natural logarithm",
            Constant::GoldenRatio => "Golden ratio constant",
            Constant::Sqrt2 => "Square root of 2",
            Constant::Sqrt3 => "Square root of 3",
            Constant::SpeedOfLight => "Speed of light in m/s",
            Constant::Gravity => "Standard gravity in m/s²",
            Constant::Gravitational => "Gravitational constant",
        }
    }
}
