use crate::core::history::{History, MAX_CONVERSION_HISTORY_SIZE};
use crate::shared::error::{AppError, AppResult};
use crate::shared::format::format_conversion_value;
use crate::shared::types::ConversionRecord;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Unit Registry
// ============================================================================

/// Unit categories offered by the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    Length,
    Area,
    Volume,
    Mass,
    Temperature,
    Digital,
    Time,
    Speed,
}

impl UnitCategory {
    pub const ALL: [UnitCategory; 8] = [
        UnitCategory::Length,
        UnitCategory::Area,
        UnitCategory::Volume,
        UnitCategory::Mass,
        UnitCategory::Temperature,
        UnitCategory::Digital,
        UnitCategory::Time,
        UnitCategory::Speed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UnitCategory::Length => "length",
            UnitCategory::Area => "area",
            UnitCategory::Volume => "volume",
            UnitCategory::Mass => "mass",
            UnitCategory::Temperature => "temperature",
            UnitCategory::Digital => "digital",
            UnitCategory::Time => "time",
            UnitCategory::Speed => "speed",
        }
    }

    /// Units of this category, in menu order
    pub fn units(self) -> &'static [UnitDefinition] {
        UNIT_REGISTRY.get(&self).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        UnitCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| AppError::Validation(format!("Unknown unit category: {}", s)))
    }
}

/// Temperature scales; related to each other affinely, not by a factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureKind {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureKind {
    pub fn to_celsius(self, value: f64) -> f64 {
        match self {
            TemperatureKind::Celsius => value,
            TemperatureKind::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            TemperatureKind::Kelvin => value - 273.15,
        }
    }

    pub fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            TemperatureKind::Celsius => celsius,
            TemperatureKind::Fahrenheit => (celsius * 9.0 / 5.0) + 32.0,
            TemperatureKind::Kelvin => celsius + 273.15,
        }
    }
}

/// How a unit relates to its category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum UnitScale {
    /// Multiplier to the category's base unit (base = 1)
    Factor(f64),
    Temperature(TemperatureKind),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitDefinition {
    pub symbol: &'static str,
    pub name: &'static str,
    pub category: UnitCategory,
    pub scale: UnitScale,
}

fn linear(category: UnitCategory, units: &[(&'static str, &'static str, f64)]) -> Vec<UnitDefinition> {
    units
        .iter()
        .map(|&(name, symbol, factor)| UnitDefinition {
            symbol,
            name,
            category,
            scale: UnitScale::Factor(factor),
        })
        .collect()
}

/// Thread-safe unit registry initialized on first use
static UNIT_REGISTRY: Lazy<HashMap<UnitCategory, Vec<UnitDefinition>>> = Lazy::new(|| {
    let mut registry = HashMap::new();

    // Base: meter
    registry.insert(UnitCategory::Length, linear(UnitCategory::Length, &[
        ("Meter", "m", 1.0),
        ("Kilometer", "km", 1000.0),
        ("Centimeter", "cm", 0.01),
        ("Millimeter", "mm", 0.001),
        ("Mile", "mi", 1609.344),
        ("Yard", "yd", 0.9144),
        ("Foot", "ft", 0.3048),
        ("Inch", "in", 0.0254),
    ]));

    // Base: square meter
    registry.insert(UnitCategory::Area, linear(UnitCategory::Area, &[
        ("Square Meter", "m²", 1.0),
        ("Square Kilometer", "km²", 1_000_000.0),
        ("Square Mile", "mi²", 2_589_988.11),
        ("Acre", "ac", 4046.86),
        ("Hectare", "ha", 10_000.0),
        ("Square Foot", "ft²", 0.092903),
        ("Square Inch", "in²", 0.00064516),
    ]));

    // Base: cubic meter
    registry.insert(UnitCategory::Volume, linear(UnitCategory::Volume, &[
        ("Cubic Meter", "m³", 1.0),
        ("Liter", "L", 0.001),
        ("Milliliter", "mL", 0.000001),
        ("Gallon (US)", "gal", 0.00378541),
        ("Cubic Foot", "ft³", 0.0283168),
        ("Cubic Inch", "in³", 0.0000163871),
    ]));

    // Base: kilogram
    registry.insert(UnitCategory::Mass, linear(UnitCategory::Mass, &[
        ("Kilogram", "kg", 1.0),
        ("Gram", "g", 0.001),
        ("Pound", "lb", 0.453592),
        ("Ounce", "oz", 0.0283495),
        ("Stone", "st", 6.35029),
        ("Metric Ton", "t", 1000.0),
    ]));

    registry.insert(UnitCategory::Temperature, vec![
        UnitDefinition {
            symbol: "°C", name: "Celsius", category: UnitCategory::Temperature,
            scale: UnitScale::Temperature(TemperatureKind::Celsius),
        },
        UnitDefinition {
            symbol: "°F", name: "Fahrenheit", category: UnitCategory::Temperature,
            scale: UnitScale::Temperature(TemperatureKind::Fahrenheit),
        },
        UnitDefinition {
            symbol: "K", name: "Kelvin", category: UnitCategory::Temperature,
            scale: UnitScale::Temperature(TemperatureKind::Kelvin),
        },
    ]);

    // Base: byte, binary prefixes
    registry.insert(UnitCategory::Digital, linear(UnitCategory::Digital, &[
        ("Byte", "B", 1.0),
        ("Kilobyte", "KB", 1024.0),
        ("Megabyte", "MB", 1_048_576.0),
        ("Gigabyte", "GB", 1_073_741_824.0),
        ("Terabyte", "TB", 1_099_511_627_776.0),
        ("Petabyte", "PB", 1_125_899_906_842_624.0),
    ]));

    // Base: second; a month is 30 days, a year 365
    registry.insert(UnitCategory::Time, linear(UnitCategory::Time, &[
        ("Second", "s", 1.0),
        ("Minute", "min", 60.0),
        ("Hour", "hr", 3600.0),
        ("Day", "day", 86_400.0),
        ("Week", "week", 604_800.0),
        ("Month", "month", 2_592_000.0),
        ("Year", "year", 31_536_000.0),
    ]));

    // Base: meters per second
    registry.insert(UnitCategory::Speed, linear(UnitCategory::Speed, &[
        ("Meters/Second", "m/s", 1.0),
        ("Kilometers/Hour", "km/h", 0.277778),
        ("Miles/Hour", "mph", 0.44704),
        ("Feet/Second", "ft/s", 0.3048),
        ("Knot", "kn", 0.514444),
    ]));

    registry
});

/// Look a unit up by symbol or name within a category
///
/// An exact symbol match wins; otherwise symbol and name are compared
/// case-insensitively.
pub fn find_unit(category: UnitCategory, key: &str) -> AppResult<&'static UnitDefinition> {
    let units = category.units();
    let key = key.trim();
    units
        .iter()
        .find(|u| u.symbol == key)
        .or_else(|| {
            units.iter().find(|u| u.symbol.eq_ignore_ascii_case(key) || u.name.eq_ignore_ascii_case(key))
        })
        .ok_or_else(|| AppError::Validation(format!("Unknown {} unit: {}", category, key)))
}

// ============================================================================
// Conversion
// ============================================================================

/// Convert `magnitude` between two units of one category
///
/// Linear units go through the shared base unit; temperatures go through
/// Celsius. Mixing a linear unit with a temperature cannot happen for units
/// taken from one category and returns the magnitude unchanged.
pub fn convert_value(from: &UnitDefinition, to: &UnitDefinition, magnitude: f64) -> f64 {
    match (from.scale, to.scale) {
        (UnitScale::Factor(from_factor), UnitScale::Factor(to_factor)) => {
            magnitude * from_factor / to_factor
        }
        (UnitScale::Temperature(from_kind), UnitScale::Temperature(to_kind)) => {
            to_kind.from_celsius(from_kind.to_celsius(magnitude))
        }
        _ => {
            tracing::warn!(
                "[UnitConverter] Mismatched scales for {} → {}, passing value through",
                from.symbol, to.symbol
            );
            magnitude
        }
    }
}

/// Convert by category and unit symbol or name
pub fn convert(category: UnitCategory, from: &str, to: &str, magnitude: f64) -> AppResult<f64> {
    let from_def = find_unit(category, from)?;
    let to_def = find_unit(category, to)?;
    let result = convert_value(from_def, to_def, magnitude);
    tracing::debug!(
        "[UnitConverter] {} {} → {} {}",
        magnitude, from_def.symbol, result, to_def.symbol
    );
    Ok(result)
}

/// One-click preset pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuickConversion {
    pub label: &'static str,
    pub category: UnitCategory,
    pub from: &'static str,
    pub to: &'static str,
}

pub const QUICK_CONVERSIONS: [QuickConversion; 6] = [
    QuickConversion { label: "km → mi", category: UnitCategory::Length, from: "Kilometer", to: "Mile" },
    QuickConversion { label: "°C → °F", category: UnitCategory::Temperature, from: "Celsius", to: "Fahrenheit" },
    QuickConversion { label: "kg → lb", category: UnitCategory::Mass, from: "Kilogram", to: "Pound" },
    QuickConversion { label: "L → gal", category: UnitCategory::Volume, from: "Liter", to: "Gallon (US)" },
    QuickConversion { label: "m → ft", category: UnitCategory::Length, from: "Meter", to: "Foot" },
    QuickConversion { label: "MB → GB", category: UnitCategory::Digital, from: "Megabyte", to: "Gigabyte" },
];

// ============================================================================
// Converter widget state
// ============================================================================

/// Selection, input and history of the conversion widget
pub struct Converter {
    category: UnitCategory,
    from: &'static UnitDefinition,
    to: &'static UnitDefinition,
    input: f64,
    history: History<ConversionRecord>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    pub fn new() -> Self {
        Self::with_history_capacity(MAX_CONVERSION_HISTORY_SIZE)
    }

    /// Starts on length, first unit to second, with an input of 1
    pub fn with_history_capacity(capacity: usize) -> Self {
        let units = UnitCategory::Length.units();
        Self {
            category: UnitCategory::Length,
            from: &units[0],
            to: &units[1],
            input: 1.0,
            history: History::with_capacity(capacity),
        }
    }

    pub fn category(&self) -> UnitCategory {
        self.category
    }

    pub fn from_unit(&self) -> &'static UnitDefinition {
        self.from
    }

    pub fn to_unit(&self) -> &'static UnitDefinition {
        self.to
    }

    pub fn input(&self) -> f64 {
        self.input
    }

    pub fn history(&self) -> &History<ConversionRecord> {
        &self.history
    }

    /// Switch category; selection falls back to its first two units
    pub fn set_category(&mut self, category: UnitCategory) {
        let units = category.units();
        self.category = category;
        self.from = &units[0];
        self.to = units.get(1).unwrap_or(&units[0]);
    }

    pub fn set_from(&mut self, unit: &str) -> AppResult<()> {
        self.from = find_unit(self.category, unit)?;
        Ok(())
    }

    pub fn set_to(&mut self, unit: &str) -> AppResult<()> {
        self.to = find_unit(self.category, unit)?;
        Ok(())
    }

    /// Non-finite input counts as 0, like an empty input field
    pub fn set_input(&mut self, value: f64) {
        self.input = if value.is_finite() { value } else { 0.0 };
    }

    pub fn result(&self) -> f64 {
        convert_value(self.from, self.to, self.input)
    }

    pub fn formatted_result(&self) -> String {
        format_conversion_value(self.result())
    }

    /// Exchange the units and feed the previous result back in as input
    pub fn swap(&mut self) {
        let previous = self.result();
        std::mem::swap(&mut self.from, &mut self.to);
        self.set_input(previous);
    }

    pub fn apply_quick(&mut self, quick: &QuickConversion) -> AppResult<()> {
        let from = find_unit(quick.category, quick.from)?;
        let to = find_unit(quick.category, quick.to)?;
        self.category = quick.category;
        self.from = from;
        self.to = to;
        tracing::debug!("[UnitConverter] Quick conversion: {}", quick.label);
        Ok(())
    }

    /// Keep the current conversion in history
    pub fn save_conversion(&mut self) -> ConversionRecord {
        let record = ConversionRecord::new(self.input, self.from.symbol, self.result(), self.to.symbol);
        self.history.push(record.clone());
        record
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn restore_history(&mut self, records: Vec<ConversionRecord>) {
        self.history = History::from_items(records, self.history.capacity());
    }
}
