//! Number formatting helpers
//!
//! `format_number` is the canonical text for a value stored in the entry or
//! written into an expression trace. The `format_*_value` helpers are for the
//! presentation layer only; the engine never parses their output.

/// Canonical text for a number
///
/// Shortest round-trip representation, switching to exponent notation for
/// very large or very small magnitudes. Negative zero prints as "0".
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let abs = value.abs();
    if value.is_finite() && (abs >= 1e21 || abs < 1e-6) {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}

/// Text for the main display
///
/// Exponential with 8 fractional digits at |v| >= 1e12 or 0 < |v| < 1e-6,
/// otherwise the entry text capped at 10 decimals. Entries that are not
/// numbers yet (e.g. "(") pass through unchanged.
pub fn format_display_value(entry: &str) -> String {
    let Ok(value) = entry.trim().parse::<f64>() else {
        return entry.to_string();
    };
    if !value.is_finite() {
        return entry.to_string();
    }

    let abs = value.abs();
    if abs >= 1e12 || (abs < 1e-6 && value != 0.0) {
        return exponential(value, 8).replace('e', " × 10^");
    }

    match entry.split_once('.') {
        Some((_, decimals)) if decimals.len() > 10 => format!("{:.10}", value),
        _ => entry.to_string(),
    }
}

/// Text for a conversion result
///
/// Exponential with 6 fractional digits at |v| >= 1e6 or 0 < |v| < 1e-6,
/// otherwise fixed 6 decimals with trailing zeros removed.
pub fn format_conversion_value(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e6 || (abs < 1e-6 && value != 0.0) {
        return exponential(value, 6);
    }

    let fixed = format!("{:.6}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn exponential(value: f64, digits: usize) -> String {
    format!("{:.*e}", digits, value)
}
