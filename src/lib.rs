//! Calculator widget core
//!
//! Arithmetic engine, scientific functions, free-text evaluation, unit
//! conversion, stopwatch and countdown timer, with snapshot persistence.
//! There is no rendering here: a presentation layer drives [`CalculatorApp`]
//! and re-renders on the [`AppEvent`]s it emits.

pub mod core;
pub mod shared;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use crate::core::app::CalculatorApp;
pub use crate::core::features::calculator::scientific::{Constant, ScientificFunction};
pub use crate::core::features::calculator::{Calculator, CalculatorState};
pub use crate::core::features::stopwatch::Stopwatch;
pub use crate::core::features::timer::CountdownTimer;
pub use crate::core::features::unit_converter::{convert, Converter, UnitCategory};
pub use crate::core::keymap::{route_key, Command, KeyPress};
pub use crate::shared::error::{AppError, AppResult};
pub use crate::shared::errors::{CalcError, CalcResult};
pub use crate::shared::events::AppEvent;
pub use crate::shared::settings::AppSettings;

/// Install the global tracing subscriber
///
/// Filter comes from `RUST_LOG`, defaulting to `info`. Calling this more than
/// once is harmless; later calls keep the first subscriber.
pub fn init_logging() {
    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_ok() {
        tracing::info!("[Logging] Initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging();
        init_logging();
    }
}
