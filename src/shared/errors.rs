//! Engine error kinds
//!
//! Every failure the arithmetic engine, the scientific functions or the
//! free-text evaluator can produce. All variants are recoverable: the engine
//! resets its display state and hands the error back so the presentation
//! layer can show the message.

use thiserror::Error;
use serde::Serialize;

/// Calculation errors surfaced by the engine
///
/// The `Display` text of each variant is the short message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum CalcError {
    /// Right operand of a division was exactly zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Result was NaN or not finite (overflow, domain errors, ...)
    #[error("Math Error")]
    MathError,

    /// Argument outside a function's domain (e.g. factorial of -1)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Free-text expression could not be parsed or evaluated
    #[error("Invalid expression")]
    InvalidExpression(String),
}

impl CalcError {
    /// Detail attached to the error, if any (for logs, not for display)
    pub fn detail(&self) -> Option<&str> {
        match self {
            CalcError::InvalidInput(msg) | CalcError::InvalidExpression(msg) => Some(msg),
            _ => None,
        }
    }
}

// Helper type alias for engine results
pub type CalcResult<T> = Result<T, CalcError>;

/// Reject NaN and infinite values
pub fn ensure_finite(value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::MathError)
    }
}
