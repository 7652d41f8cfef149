//! Composition root
//!
//! `CalculatorApp` owns every widget plus the snapshot store and settings. The
//! host constructs it explicitly and drives it from its event loop; after each
//! state change an [`AppEvent`] is emitted so a presentation adapter can
//! re-render.

use std::sync::Arc;

use crate::core::features::calculator::Calculator;
use crate::core::features::stopwatch::Stopwatch;
use crate::core::features::timer::CountdownTimer;
use crate::core::features::unit_converter::{Converter, QuickConversion, UnitCategory};
use crate::core::keymap::{route_key, Command, KeyPress};
use crate::core::storage::{default_storage, Storage};
use crate::shared::emit::EventEmitter;
use crate::shared::error::AppResult;
use crate::shared::errors::CalcResult;
use crate::shared::events::AppEvent;
use crate::shared::settings::AppSettings;
use crate::shared::types::{AngleMode, ConversionRecord, Snapshot, Theme};

/// What the adapter has seen, to decide which events a change warrants
struct Observed {
    entry: String,
    expression: String,
    memory: f64,
    history_len: usize,
    latest_history: Option<uuid::Uuid>,
}

pub struct CalculatorApp {
    settings: AppSettings,
    storage: Arc<dyn Storage>,
    events: EventEmitter,
    theme: Theme,
    calculator: Calculator,
    converter: Converter,
    stopwatch: Stopwatch,
    timer: CountdownTimer,
}

impl CalculatorApp {
    pub fn new(settings: AppSettings, storage: Arc<dyn Storage>) -> Self {
        let events = EventEmitter::new();
        let mut calculator = Calculator::with_history_capacity(settings.limits.history_capacity);
        calculator.set_angle_mode(settings.preferences.default_angle_mode);

        Self {
            theme: settings.preferences.theme,
            calculator,
            converter: Converter::with_history_capacity(settings.limits.conversion_history),
            stopwatch: Stopwatch::new(settings.clock.stopwatch_tick()),
            timer: CountdownTimer::new(
                settings.clock.timer_tick(),
                settings.clock.default_timer_seconds,
                events.clone(),
            ),
            events,
            storage,
            settings,
        }
    }

    /// Load settings and the on-disk store, then restore the last snapshot
    pub async fn bootstrap() -> Self {
        let settings = AppSettings::load().await.unwrap_or_else(|e| {
            tracing::warn!("[CalculatorApp] Failed to load settings: {}, using defaults", e);
            AppSettings::default()
        });
        let mut app = Self::new(settings, default_storage());
        app.restore();
        app
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<AppEvent> {
        self.events.subscribe()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    pub fn stopwatch_mut(&mut self) -> &mut Stopwatch {
        &mut self.stopwatch
    }

    pub fn timer_mut(&mut self) -> &mut CountdownTimer {
        &mut self.timer
    }

    // ------------------------------------------------------------------
    // Calculator
    // ------------------------------------------------------------------

    /// Run a calculator command and publish the resulting changes
    pub fn press(&mut self, command: Command) -> CalcResult<()> {
        let before = self.observe();
        let outcome = self.calculator.dispatch(command);
        self.publish(before, outcome.as_ref().err().map(|e| e.to_string()));
        outcome
    }

    /// Route a physical key; `None` when the key has no binding
    pub fn handle_key(&mut self, press: KeyPress) -> Option<CalcResult<()>> {
        route_key(press).map(|command| self.press(command))
    }

    pub fn evaluate_expression(&mut self, text: &str) -> CalcResult<f64> {
        let before = self.observe();
        let outcome = self.calculator.evaluate_expression(text);
        self.publish(before, outcome.as_ref().err().map(|e| e.to_string()));
        outcome
    }

    pub fn recall_history(&mut self, index: usize) -> bool {
        let before = self.observe();
        let found = self.calculator.recall_history(index);
        self.publish(before, None);
        found
    }

    pub fn set_angle_mode(&mut self, mode: AngleMode) {
        if self.calculator.angle_mode() == mode {
            return;
        }
        self.calculator.set_angle_mode(mode);
        self.events.emit(AppEvent::AngleModeChanged(mode));
        self.persist();
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.events.emit(AppEvent::ThemeChanged(self.theme));
        self.persist();
        self.theme
    }

    pub fn clear_history(&mut self) {
        self.calculator.clear_history();
        self.events.emit(AppEvent::HistoryUpdated(0));
        self.persist();
    }

    /// Clear calculation and conversion history
    pub fn clear_all_history(&mut self) {
        self.calculator.clear_history();
        self.converter.clear_history();
        self.events.emit(AppEvent::HistoryUpdated(0));
        self.events.emit(AppEvent::ConversionHistoryCleared);
        self.persist();
    }

    // ------------------------------------------------------------------
    // Converter
    // ------------------------------------------------------------------

    pub fn set_conversion_category(&mut self, category: UnitCategory) {
        self.converter.set_category(category);
    }

    pub fn set_conversion_units(&mut self, from: &str, to: &str) -> AppResult<()> {
        self.converter.set_from(from)?;
        self.converter.set_to(to)
    }

    pub fn set_conversion_input(&mut self, value: f64) {
        self.converter.set_input(value);
    }

    pub fn swap_conversion_units(&mut self) {
        self.converter.swap();
    }

    pub fn apply_quick_conversion(&mut self, quick: &QuickConversion) -> AppResult<()> {
        self.converter.apply_quick(quick)
    }

    pub fn clear_conversion_history(&mut self) {
        self.converter.clear_history();
        self.events.emit(AppEvent::ConversionHistoryCleared);
        self.persist();
    }

    pub fn save_conversion(&mut self) -> ConversionRecord {
        let record = self.converter.save_conversion();
        self.events.emit(AppEvent::ConversionAdded(record.clone()));
        self.persist();
        record
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Everything that survives a restart; history is cut to the persisted limit
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            memory: self.calculator.memory(),
            history: self.calculator.history().newest(self.settings.limits.persisted_history),
            conversion_history: self.converter.history().items().to_vec(),
            angle_mode: self.calculator.angle_mode(),
            theme: self.theme,
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.storage.save_snapshot(&self.snapshot())
    }

    /// Apply the stored snapshot, or the configured defaults when there is none
    ///
    /// Returns whether stored state was found.
    pub fn restore(&mut self) -> bool {
        let stored = match self.storage.load_snapshot() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("[CalculatorApp] Failed to read snapshot: {}, using defaults", e);
                None
            }
        };
        let found = stored.is_some();
        let snapshot = stored.unwrap_or_else(|| Snapshot {
            angle_mode: self.settings.preferences.default_angle_mode,
            theme: self.settings.preferences.theme,
            ..Snapshot::default()
        });

        self.calculator.restore(snapshot.memory, snapshot.history, snapshot.angle_mode);
        self.converter.restore_history(snapshot.conversion_history);
        self.theme = snapshot.theme;

        tracing::info!(
            "[CalculatorApp] Restored {} history entries, {} conversions",
            self.calculator.history().len(),
            self.converter.history().len()
        );
        self.events.emit(AppEvent::HistoryUpdated(self.calculator.history().len()));
        self.events.emit(AppEvent::MemoryChanged(self.calculator.memory()));
        self.events.emit(AppEvent::AngleModeChanged(self.calculator.angle_mode()));
        self.events.emit(AppEvent::ThemeChanged(self.theme));
        self.emit_display();
        found
    }

    /// Save, logging instead of failing; used after every durable change
    fn persist(&self) {
        if let Err(e) = self.save() {
            tracing::warn!("[CalculatorApp] Failed to save snapshot: {}", e);
        }
    }

    fn observe(&self) -> Observed {
        Observed {
            entry: self.calculator.current_entry().to_string(),
            expression: self.calculator.expression().to_string(),
            memory: self.calculator.memory(),
            history_len: self.calculator.history().len(),
            latest_history: self.calculator.history().latest().map(|e| e.id),
        }
    }

    fn publish(&self, before: Observed, error: Option<String>) {
        if let Some(message) = error {
            self.events.emit(AppEvent::Error(message));
        }

        let mut durable_change = false;
        if self.calculator.history().latest().map(|e| e.id) != before.latest_history
            || self.calculator.history().len() != before.history_len
        {
            self.events.emit(AppEvent::HistoryUpdated(self.calculator.history().len()));
            durable_change = true;
        }
        if self.calculator.memory() != before.memory {
            self.events.emit(AppEvent::MemoryChanged(self.calculator.memory()));
            durable_change = true;
        }
        if self.calculator.current_entry() != before.entry || self.calculator.expression() != before.expression {
            self.emit_display();
        }
        if durable_change {
            self.persist();
        }
    }

    fn emit_display(&self) {
        self.events.emit(AppEvent::DisplayChanged {
            entry: self.calculator.current_entry().to_string(),
            expression: self.calculator.expression().to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::keymap::Key;
    use crate::core::storage::InMemoryStorage;
    use crate::shared::errors::CalcError;
    use crate::shared::types::Operator;

    fn app_with(storage: Arc<dyn Storage>) -> CalculatorApp {
        CalculatorApp::new(AppSettings::default(), storage)
    }

    fn type_keys(app: &mut CalculatorApp, keys: &str) {
        for c in keys.chars() {
            let press = match c {
                '\n' => KeyPress::plain(Key::Enter),
                c => KeyPress::char(c),
            };
            let _ = app.handle_key(press);
        }
    }

    #[test]
    fn test_keyboard_session() {
        let mut app = app_with(Arc::new(InMemoryStorage::new()));
        type_keys(&mut app, "12+30\n");
        assert_eq!(app.calculator().current_entry(), "42");
        assert_eq!(app.calculator().expression(), "12 + 30");
        assert!(app.handle_key(KeyPress::char('?')).is_none());
    }

    #[test]
    fn test_save_restore_round_trip() {
        let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
        let mut app = app_with(storage.clone());
        for i in 0..25 {
            app.press(Command::ClearAll).unwrap();
            type_keys(&mut app, &format!("{}*2\n", i));
        }
        app.press(Command::MemoryAdd).unwrap();
        app.set_angle_mode(AngleMode::Degrees);
        app.set_conversion_category(UnitCategory::Temperature);
        app.set_conversion_input(100.0);
        app.save_conversion();
        app.toggle_theme();
        app.save().unwrap();

        let mut restored = app_with(storage);
        assert!(restored.restore());
        assert_eq!(restored.calculator().memory(), 48.0);
        assert_eq!(restored.calculator().angle_mode(), AngleMode::Degrees);
        assert_eq!(restored.theme(), Theme::Dark);
        assert_eq!(restored.calculator().history().len(), 20);
        assert_eq!(
            restored.calculator().history().items(),
            &app.calculator().history().items()[..20]
        );
        assert_eq!(restored.converter().history().items(), app.converter().history().items());
        assert_eq!(restored.converter().history().latest().unwrap().to_value, 212.0);
    }

    #[test]
    fn test_restore_defaults_on_missing_or_corrupt_data() {
        let mut app = app_with(Arc::new(InMemoryStorage::new()));
        assert!(!app.restore());
        assert_eq!(app.calculator().memory(), 0.0);
        assert_eq!(app.calculator().angle_mode(), AngleMode::Radians);
        assert!(app.calculator().history().is_empty());

        let mut app = app_with(Arc::new(InMemoryStorage::with_raw("{not json")));
        assert!(!app.restore());
        assert_eq!(app.theme(), Theme::Light);
        assert!(app.converter().history().is_empty());
    }

    #[test]
    fn test_restore_legacy_payload() {
        let raw = r#"{
            "memory": 7,
            "history": [{"expression": "3 + 4", "result": 7, "timestamp": "2024-05-01T10:00:00Z", "formattedTime": "10:00"}],
            "conversionHistory": [{"fromValue": 1, "fromUnit": "km", "toValue": 0.621371, "toUnit": "mi", "timestamp": "2024-05-01T10:00:00Z"}],
            "angleMode": "grad",
            "theme": "dark"
        }"#;
        let mut app = app_with(Arc::new(InMemoryStorage::with_raw(raw)));
        assert!(app.restore());
        assert_eq!(app.calculator().memory(), 7.0);
        assert_eq!(app.calculator().angle_mode(), AngleMode::Gradians);
        assert_eq!(app.calculator().history().latest().unwrap().expression, "3 + 4");
        assert_eq!(app.converter().history().latest().unwrap().to_unit, "mi");
        assert_eq!(app.theme(), Theme::Dark);
    }

    #[test]
    fn test_history_changes_are_persisted() {
        let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
        let mut app = app_with(storage.clone());
        type_keys(&mut app, "2^10\n");

        let stored = storage.load_snapshot().unwrap().unwrap();
        assert_eq!(stored.history.len(), 1);
        assert_eq!(stored.history[0].result, 1024.0);
    }

    #[test]
    fn test_clear_all_history() {
        let mut app = app_with(Arc::new(InMemoryStorage::new()));
        type_keys(&mut app, "1+1\n");
        app.save_conversion();
        app.clear_all_history();
        assert!(app.calculator().history().is_empty());
        assert!(app.converter().history().is_empty());
    }

    #[test]
    fn test_clearing_conversions_is_persisted() {
        let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
        let mut app = app_with(storage.clone());
        let mut rx = app.subscribe();

        app.set_conversion_category(UnitCategory::Length);
        app.set_conversion_units("km", "mi").unwrap();
        app.set_conversion_input(10.0);
        app.save_conversion();
        assert_eq!(storage.load_snapshot().unwrap().unwrap().conversion_history.len(), 1);

        app.clear_conversion_history();
        assert!(app.converter().history().is_empty());
        assert!(storage.load_snapshot().unwrap().unwrap().conversion_history.is_empty());

        let mut saw_cleared = false;
        while let Ok(event) = rx.try_recv() {
            saw_cleared |= event == AppEvent::ConversionHistoryCleared;
        }
        assert!(saw_cleared);
        assert!(app.set_conversion_units("km", "kg").is_err());
    }

    #[tokio::test]
    async fn test_events_follow_state_changes() {
        let mut app = app_with(Arc::new(InMemoryStorage::new()));
        let mut rx = app.subscribe();

        app.press(Command::Digit('8')).unwrap();
        assert_eq!(
            rx.recv().await.unwrap(),
            AppEvent::DisplayChanged { entry: "8".into(), expression: String::new() }
        );

        app.press(Command::Operator(Operator::Div)).unwrap();
        app.press(Command::Digit('0')).unwrap();
        let outcome = app.press(Command::Commit);
        assert_eq!(outcome, Err(CalcError::DivisionByZero));

        let mut saw_error = false;
        while let Ok(event) = rx.try_recv() {
            if event == AppEvent::Error("Division by zero".into()) {
                saw_error = true;
            }
            assert!(!matches!(event, AppEvent::HistoryUpdated(_)));
        }
        assert!(saw_error);
        assert_eq!(app.calculator().current_entry(), "0");

        app.toggle_theme();
        assert_eq!(rx.recv().await.unwrap(), AppEvent::ThemeChanged(Theme::Dark));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_completion_reaches_app_events() {
        let mut settings = AppSettings::default();
        settings.clock.default_timer_seconds = 2;
        let mut app = CalculatorApp::new(settings, Arc::new(InMemoryStorage::new()));
        let mut rx = app.subscribe();

        app.timer_mut().start().await;
        loop {
            if rx.recv().await.unwrap() == AppEvent::TimerCompleted {
                break;
            }
        }
        assert_eq!(app.timer_mut().remaining_seconds(), 0);
    }
}
