use serde::{Deserialize, Serialize};
use super::types::{AngleMode, ConversionRecord, Theme};

/// State changes the presentation layer re-renders on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")] // Tagged enum for easier frontend parsing
pub enum AppEvent {
    #[serde(rename = "display://changed")]
    DisplayChanged { entry: String, expression: String },

    #[serde(rename = "history://updated")]
    HistoryUpdated(usize),

    #[serde(rename = "memory://changed")]
    MemoryChanged(f64),

    #[serde(rename = "angle-mode://changed")]
    AngleModeChanged(AngleMode),

    #[serde(rename = "theme://changed")]
    ThemeChanged(Theme),

    #[serde(rename = "conversion://added")]
    ConversionAdded(ConversionRecord),

    #[serde(rename = "conversion://cleared")]
    ConversionHistoryCleared,

    #[serde(rename = "error://raised")]
    Error(String),

    #[serde(rename = "timer://completed")]
    TimerCompleted,
}
