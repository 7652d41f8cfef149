//! Arithmetic engine
//!
//! Turns discrete button and key events into a running result. All state lives
//! in [`CalculatorState`]; every operation runs to completion synchronously
//! and never touches the presentation layer. Failures reset the display to
//! idle and are returned to the caller, who decides how to show them.

pub mod expression;
pub mod scientific;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::history::{History, MAX_HISTORY_SIZE};
use crate::core::keymap::Command;
use crate::shared::errors::{CalcError, CalcResult};
use crate::shared::format::format_number;
use crate::shared::types::{AngleMode, HistoryEntry, Operator};

use scientific::{Constant, ScientificFunction};

// Longest numeric prefix of an entry, the way a lenient float parser reads it
static RE_NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
        .expect("Failed to compile numeric prefix pattern")
});

/// Read an entry as a number
///
/// Trailing garbage is ignored ("12)" reads as 12); text without a numeric
/// prefix (e.g. "(") reads as NaN.
pub fn parse_entry(entry: &str) -> f64 {
    RE_NUMERIC_PREFIX
        .find(entry)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Transient and persistent calculator state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorState {
    pub current_entry: String,
    pub expression: String,
    pub pending_operand: Option<f64>,
    pub pending_operator: Option<Operator>,
    pub awaiting_fresh_entry: bool,
    pub angle_mode: AngleMode,
    pub memory_register: f64,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            current_entry: "0".to_string(),
            expression: String::new(),
            pending_operand: None,
            pending_operator: None,
            awaiting_fresh_entry: false,
            angle_mode: AngleMode::default(),
            memory_register: 0.0,
        }
    }
}

impl CalculatorState {
    /// Back to idle; angle mode and memory are untouched
    fn reset_transient(&mut self) {
        self.current_entry = "0".to_string();
        self.expression.clear();
        self.pending_operand = None;
        self.pending_operator = None;
        self.awaiting_fresh_entry = false;
    }
}

pub struct Calculator {
    state: CalculatorState,
    history: History<HistoryEntry>,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::with_history_capacity(MAX_HISTORY_SIZE)
    }

    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            state: CalculatorState::default(),
            history: History::with_capacity(capacity),
        }
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn current_entry(&self) -> &str {
        &self.state.current_entry
    }

    pub fn expression(&self) -> &str {
        &self.state.expression
    }

    pub fn memory(&self) -> f64 {
        self.state.memory_register
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.state.angle_mode
    }

    pub fn history(&self) -> &History<HistoryEntry> {
        &self.history
    }

    /// Current entry read as a number (NaN if it does not parse)
    pub fn entry_value(&self) -> f64 {
        parse_entry(&self.state.current_entry)
    }

    /// Load persisted values; the transient display state starts idle
    pub fn restore(&mut self, memory: f64, history: Vec<HistoryEntry>, angle_mode: AngleMode) {
        self.state = CalculatorState {
            angle_mode,
            memory_register: if memory.is_finite() { memory } else { 0.0 },
            ..CalculatorState::default()
        };
        self.history = History::from_items(history, self.history.capacity());
    }

    // ------------------------------------------------------------------
    // Entry
    // ------------------------------------------------------------------

    pub fn input_digit(&mut self, digit: char) {
        if !digit.is_ascii_digit() {
            tracing::debug!("[Calculator] Ignoring non-digit input '{}'", digit);
            return;
        }
        if self.state.awaiting_fresh_entry {
            self.state.current_entry = digit.to_string();
            self.state.awaiting_fresh_entry = false;
        } else if self.state.current_entry == "0" {
            self.state.current_entry = digit.to_string();
        } else {
            self.state.current_entry.push(digit);
        }
    }

    pub fn input_decimal_point(&mut self) {
        if self.state.awaiting_fresh_entry {
            self.state.current_entry = "0.".to_string();
            self.state.awaiting_fresh_entry = false;
        } else if !self.state.current_entry.contains('.') {
            self.state.current_entry.push('.');
        }
    }

    /// Raw parenthesis entry
    ///
    /// The character is appended as text; an entry that no longer starts with
    /// a number reads as NaN and the next operation on it fails.
    pub fn input_parenthesis(&mut self, paren: char) {
        if paren != '(' && paren != ')' {
            return;
        }
        if self.state.awaiting_fresh_entry {
            self.state.current_entry = paren.to_string();
            self.state.awaiting_fresh_entry = false;
        } else {
            self.state.current_entry.push(paren);
        }
    }

    pub fn toggle_sign(&mut self) {
        let value = self.entry_value();
        if value.is_finite() {
            self.state.current_entry = format_number(-value);
        }
    }

    pub fn percentage(&mut self) {
        let value = self.entry_value();
        if value.is_finite() {
            self.state.current_entry = format_number(value / 100.0);
        }
    }

    /// Drop the last character; never leaves the entry empty
    pub fn backspace(&mut self) {
        let entry = &mut self.state.current_entry;
        if entry.chars().count() > 1 {
            entry.pop();
            if entry.as_str() == "-" {
                *entry = "0".to_string();
            }
        } else {
            *entry = "0".to_string();
        }
    }

    pub fn clear_entry(&mut self) {
        self.state.current_entry = "0".to_string();
    }

    /// Reset the display state; memory and history survive
    pub fn clear_all(&mut self) {
        self.state.reset_transient();
        tracing::debug!("[Calculator] Cleared");
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Capture the entry as the left operand of `op`
    ///
    /// A pending operation that already has its right operand is folded
    /// first, and the folded result becomes the new left operand.
    pub fn input_operator(&mut self, op: Operator) -> CalcResult<()> {
        if self.state.pending_operator.is_some() && !self.state.awaiting_fresh_entry {
            self.commit()?;
        }

        let value = self.entry_value();
        self.state.pending_operand = Some(value);
        self.state.pending_operator = Some(op);
        self.state.awaiting_fresh_entry = true;
        self.state.expression = format!("{} {} ", format_number(value), op.symbol());
        tracing::debug!("[Calculator] Pending: {}", self.state.expression.trim_end());
        Ok(())
    }

    /// Finalize the pending operation ("equals")
    ///
    /// Does nothing when no operation is pending.
    pub fn commit(&mut self) -> CalcResult<()> {
        let (Some(op), Some(lhs)) = (self.state.pending_operator, self.state.pending_operand) else {
            return Ok(());
        };
        let rhs = self.entry_value();

        let result = match op.apply(lhs, rhs) {
            Ok(result) => result,
            Err(e) => return Err(self.fail(e)),
        };

        let expression = format!("{} {} {}", format_number(lhs), op.symbol(), format_number(rhs));
        tracing::debug!("[Calculator] {} = {}", expression, result);
        self.record(expression, result);
        self.state.pending_operand = None;
        self.state.pending_operator = None;
        Ok(())
    }

    /// Apply a scientific function to the entry
    ///
    /// `pow` and `mod` take a second operand and behave like operator entry.
    pub fn apply_function(&mut self, function: ScientificFunction) -> CalcResult<()> {
        if let Some(op) = function.deferred_operator() {
            return self.input_operator(op);
        }

        let value = self.entry_value();
        let result = match function.evaluate(value, self.state.angle_mode) {
            Ok(result) => result,
            Err(e) => return Err(self.fail(e)),
        };

        let expression = function.label(value);
        tracing::debug!("[Calculator] {} = {}", expression, result);
        self.record(expression, result);
        Ok(())
    }

    /// Evaluate free text typed into the expression editor
    ///
    /// On success the text becomes the expression, the result becomes the
    /// entry, and the calculation lands in history.
    pub fn evaluate_expression(&mut self, text: &str) -> CalcResult<f64> {
        match expression::evaluate(text, self.state.angle_mode) {
            Ok(result) => {
                self.record(text.trim().to_string(), result);
                self.state.pending_operand = None;
                self.state.pending_operator = None;
                Ok(result)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub fn insert_constant(&mut self, constant: Constant) {
        self.state.current_entry = format_number(constant.value());
        self.state.expression = constant.symbol().to_string();
        self.state.awaiting_fresh_entry = true;
    }

    pub fn set_angle_mode(&mut self, mode: AngleMode) {
        self.state.angle_mode = mode;
        tracing::debug!("[Calculator] Angle mode: {}", mode.label());
    }

    /// Load a past calculation back into the display
    ///
    /// Returns false when there is no entry at `index` (0 = newest).
    pub fn recall_history(&mut self, index: usize) -> bool {
        let Some(entry) = self.history.get(index) else {
            return false;
        };
        self.state.current_entry = format_number(entry.result);
        self.state.expression = entry.expression.clone();
        self.state.awaiting_fresh_entry = true;
        true
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        tracing::debug!("[Calculator] History cleared");
    }

    // ------------------------------------------------------------------
    // Memory
    // ------------------------------------------------------------------

    pub fn memory_clear(&mut self) {
        self.state.memory_register = 0.0;
    }

    /// Load memory into the entry; the next digit appends to it
    pub fn memory_recall(&mut self) {
        self.state.current_entry = format_number(self.state.memory_register);
        self.state.awaiting_fresh_entry = false;
    }

    pub fn memory_add(&mut self) {
        self.adjust_memory(1.0);
    }

    pub fn memory_subtract(&mut self) {
        self.adjust_memory(-1.0);
    }

    fn adjust_memory(&mut self, sign: f64) {
        let value = self.entry_value();
        let updated = self.state.memory_register + sign * value;
        if updated.is_finite() {
            self.state.memory_register = updated;
        } else {
            tracing::warn!(
                "[Calculator] Ignoring memory update with entry '{}'",
                self.state.current_entry
            );
        }
    }

    /// Run a routed key command
    pub fn dispatch(&mut self, command: Command) -> CalcResult<()> {
        match command {
            Command::Digit(d) => self.input_digit(d),
            Command::DecimalPoint => self.input_decimal_point(),
            Command::Parenthesis(p) => self.input_parenthesis(p),
            Command::Operator(op) => return self.input_operator(op),
            Command::Commit => return self.commit(),
            Command::Function(f) => return self.apply_function(f),
            Command::InsertConstant(c) => self.insert_constant(c),
            Command::ClearAll => self.clear_all(),
            Command::ClearEntry => self.clear_entry(),
            Command::Backspace => self.backspace(),
            Command::ToggleSign => self.toggle_sign(),
            Command::Percentage => self.percentage(),
            Command::MemoryClear => self.memory_clear(),
            Command::MemoryRecall => self.memory_recall(),
            Command::MemoryAdd => self.memory_add(),
            Command::MemorySubtract => self.memory_subtract(),
        }
        Ok(())
    }

    /// Publish a successful result: entry, expression and history
    fn record(&mut self, expression: String, result: f64) {
        self.state.current_entry = format_number(result);
        self.state.expression = expression.clone();
        self.state.awaiting_fresh_entry = true;
        self.history.push(HistoryEntry::new(expression, result));
    }

    /// Abandon the computation in progress
    fn fail(&mut self, error: CalcError) -> CalcError {
        tracing::warn!(
            "[Calculator] {} (entry '{}'{})",
            error,
            self.state.current_entry,
            error.detail().map(|d| format!(", {}", d)).unwrap_or_default()
        );
        self.state.reset_transient();
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn enter(calc: &mut Calculator, digits: &str) {
        for c in digits.chars() {
            if c == '.' {
                calc.input_decimal_point();
            } else {
                calc.input_digit(c);
            }
        }
    }

    fn run(lhs: &str, op: Operator, rhs: &str) -> (Calculator, CalcResult<()>) {
        let mut calc = Calculator::new();
        enter(&mut calc, lhs);
        calc.input_operator(op).unwrap();
        enter(&mut calc, rhs);
        let outcome = calc.commit();
        (calc, outcome)
    }

    #[test]
    fn test_commit_closed_form() {
        let cases = [
            ("2", Operator::Add, "3", 5.0),
            ("2", Operator::Sub, "3", -1.0),
            ("4", Operator::Mul, "2.5", 10.0),
            ("9", Operator::Div, "3", 3.0),
            ("2", Operator::Pow, "10", 1024.0),
            ("7", Operator::Mod, "3", 1.0),
        ];
        for (lhs, op, rhs, expected) in cases {
            let (calc, outcome) = run(lhs, op, rhs);
            assert_eq!(outcome, Ok(()));
            assert_eq!(calc.entry_value(), expected, "{} {:?} {}", lhs, op, rhs);
            assert!(calc.state().pending_operator.is_none());
            assert!(calc.state().awaiting_fresh_entry);
        }
    }

    #[test]
    fn test_commit_sets_expression_and_history() {
        let (calc, _) = run("2", Operator::Add, "3");
        assert_eq!(calc.current_entry(), "5");
        assert_eq!(calc.expression(), "2 + 3");
        assert_eq!(calc.history().len(), 1);
        assert_eq!(calc.history().latest().unwrap().expression, "2 + 3");
        assert_eq!(calc.history().latest().unwrap().result, 5.0);
    }

    #[test]
    fn test_commit_without_pending_is_noop() {
        let mut calc = Calculator::new();
        enter(&mut calc, "42");
        assert_eq!(calc.commit(), Ok(()));
        assert_eq!(calc.current_entry(), "42");
        assert!(calc.history().is_empty());
    }

    #[test]
    fn test_division_by_zero_resets_and_keeps_memory_and_history() {
        let mut calc = Calculator::new();
        enter(&mut calc, "8");
        calc.memory_add();
        calc.input_operator(Operator::Add).unwrap();
        enter(&mut calc, "1");
        calc.commit().unwrap();
        let history_before = calc.history().clone();

        calc.input_operator(Operator::Div).unwrap();
        enter(&mut calc, "0");
        assert_eq!(calc.commit(), Err(CalcError::DivisionByZero));

        assert_eq!(calc.memory(), 8.0);
        assert_eq!(calc.history(), &history_before);
        assert_eq!(calc.current_entry(), "0");
        assert_eq!(calc.expression(), "");
        assert!(calc.state().pending_operator.is_none());
        assert!(calc.state().pending_operand.is_none());
    }

    #[test]
    fn test_math_error_on_non_finite() {
        let (calc, outcome) = run("0", Operator::Pow, "-1");
        assert_eq!(outcome, Err(CalcError::MathError));
        assert_eq!(calc.current_entry(), "0");
        assert!(calc.history().is_empty());
    }

    #[test]
    fn test_chained_operator_folds_first() {
        let mut calc = Calculator::new();
        enter(&mut calc, "2");
        calc.input_operator(Operator::Add).unwrap();
        enter(&mut calc, "3");
        calc.input_operator(Operator::Mul).unwrap();

        assert_eq!(calc.current_entry(), "5");
        assert_eq!(calc.state().pending_operand, Some(5.0));
        assert_eq!(calc.state().pending_operator, Some(Operator::Mul));
        assert_eq!(calc.expression(), "5 × ");
        assert_eq!(calc.history().latest().unwrap().expression, "2 + 3");

        enter(&mut calc, "4");
        calc.commit().unwrap();
        assert_eq!(calc.entry_value(), 20.0);
    }

    #[test]
    fn test_operator_replaced_while_awaiting() {
        let mut calc = Calculator::new();
        enter(&mut calc, "6");
        calc.input_operator(Operator::Add).unwrap();
        calc.input_operator(Operator::Sub).unwrap();
        assert!(calc.history().is_empty());
        assert_eq!(calc.state().pending_operator, Some(Operator::Sub));
        enter(&mut calc, "2");
        calc.commit().unwrap();
        assert_eq!(calc.entry_value(), 4.0);
    }

    #[test]
    fn test_history_capped_at_fifty() {
        let mut calc = Calculator::new();
        for i in 0..51 {
            calc.clear_all();
            enter(&mut calc, &i.to_string());
            calc.input_operator(Operator::Add).unwrap();
            enter(&mut calc, "0");
            calc.commit().unwrap();
        }
        assert_eq!(calc.history().len(), 50);
        assert_eq!(calc.history().latest().unwrap().result, 50.0);
        assert!(calc.history().items().iter().all(|e| e.expression != "0 + 0"));
    }

    #[test]
    fn test_digit_entry() {
        let mut calc = Calculator::new();
        enter(&mut calc, "007");
        assert_eq!(calc.current_entry(), "7");
        enter(&mut calc, "5");
        assert_eq!(calc.current_entry(), "75");
    }

    #[test]
    fn test_decimal_point_once() {
        let mut calc = Calculator::new();
        enter(&mut calc, "1.2");
        calc.input_decimal_point();
        enter(&mut calc, "5");
        assert_eq!(calc.current_entry(), "1.25");

        calc.input_operator(Operator::Add).unwrap();
        calc.input_decimal_point();
        assert_eq!(calc.current_entry(), "0.");
        assert!(!calc.state().awaiting_fresh_entry);
    }

    #[test]
    fn test_backspace() {
        let mut calc = Calculator::new();
        enter(&mut calc, "7");
        calc.backspace();
        assert_eq!(calc.current_entry(), "0");
        calc.backspace();
        assert_eq!(calc.current_entry(), "0");

        enter(&mut calc, "123");
        calc.backspace();
        assert_eq!(calc.current_entry(), "12");

        calc.toggle_sign();
        calc.backspace();
        calc.backspace();
        assert_eq!(calc.current_entry(), "0");
    }

    #[test]
    fn test_toggle_sign_and_percentage() {
        let mut calc = Calculator::new();
        enter(&mut calc, "50");
        calc.toggle_sign();
        assert_eq!(calc.current_entry(), "-50");
        calc.percentage();
        assert_eq!(calc.current_entry(), "-0.5");

        calc.clear_entry();
        calc.toggle_sign();
        assert_eq!(calc.current_entry(), "0");
    }

    #[test]
    fn test_clear_all_keeps_memory_and_history() {
        let (mut calc, _) = run("2", Operator::Add, "3");
        calc.memory_add();
        calc.input_operator(Operator::Mul).unwrap();
        calc.clear_all();

        assert_eq!(calc.state().current_entry, "0");
        assert_eq!(calc.state().expression, "");
        assert!(calc.state().pending_operator.is_none());
        assert!(!calc.state().awaiting_fresh_entry);
        assert_eq!(calc.memory(), 5.0);
        assert_eq!(calc.history().len(), 1);
    }

    #[test]
    fn test_memory_operations() {
        let mut calc = Calculator::new();
        enter(&mut calc, "10");
        calc.memory_add();
        calc.memory_add();
        calc.clear_entry();
        enter(&mut calc, "5");
        calc.memory_subtract();
        assert_eq!(calc.memory(), 15.0);

        calc.input_operator(Operator::Add).unwrap();
        calc.memory_recall();
        assert_eq!(calc.current_entry(), "15");
        assert!(!calc.state().awaiting_fresh_entry);
        enter(&mut calc, "1");
        assert_eq!(calc.current_entry(), "151");

        calc.memory_clear();
        assert_eq!(calc.memory(), 0.0);
    }

    #[test]
    fn test_apply_function_records_label() {
        let mut calc = Calculator::new();
        calc.set_angle_mode(AngleMode::Degrees);
        enter(&mut calc, "30");
        calc.apply_function(ScientificFunction::Sin).unwrap();
        assert!(approx(calc.entry_value(), 0.5));
        assert_eq!(calc.expression(), "sin(30)");
        assert_eq!(calc.history().latest().unwrap().expression, "sin(30)");
        assert!(calc.state().awaiting_fresh_entry);
    }

    #[test]
    fn test_function_failures_reset_display() {
        let mut calc = Calculator::new();
        enter(&mut calc, "2.5");
        assert!(matches!(calc.apply_function(ScientificFunction::Fact), Err(CalcError::InvalidInput(_))));
        assert_eq!(calc.current_entry(), "0");

        calc.toggle_sign();
        enter(&mut calc, "4");
        calc.toggle_sign();
        assert_eq!(calc.apply_function(ScientificFunction::Sqrt), Err(CalcError::MathError));
        assert!(calc.history().is_empty());
    }

    #[test]
    fn test_pow_and_mod_defer() {
        let mut calc = Calculator::new();
        enter(&mut calc, "2");
        calc.apply_function(ScientificFunction::Pow).unwrap();
        assert_eq!(calc.expression(), "2 ^ ");
        enter(&mut calc, "8");
        calc.commit().unwrap();
        assert_eq!(calc.entry_value(), 256.0);

        calc.clear_all();
        enter(&mut calc, "17");
        calc.apply_function(ScientificFunction::Mod).unwrap();
        assert_eq!(calc.expression(), "17 mod ");
        enter(&mut calc, "5");
        calc.commit().unwrap();
        assert_eq!(calc.entry_value(), 2.0);
        assert_eq!(calc.expression(), "17 mod 5");
    }

    #[test]
    fn test_nullary_functions() {
        let mut calc = Calculator::new();
        calc.apply_function(ScientificFunction::Pi).unwrap();
        assert!(approx(calc.entry_value(), std::f64::consts::PI));
        assert_eq!(calc.expression(), "π");

        calc.apply_function(ScientificFunction::Rand).unwrap();
        assert!((0.0..1.0).contains(&calc.entry_value()));
        assert_eq!(calc.expression(), "rand()");
    }

    #[test]
    fn test_parenthesis_entry() {
        let mut calc = Calculator::new();
        calc.input_parenthesis('(');
        assert_eq!(calc.current_entry(), "0(");
        assert_eq!(calc.entry_value(), 0.0);

        calc.input_operator(Operator::Add).unwrap();
        calc.input_parenthesis('(');
        assert_eq!(calc.current_entry(), "(");
        assert!(calc.entry_value().is_nan());
        assert_eq!(calc.commit(), Err(CalcError::MathError));
    }

    #[test]
    fn test_parse_entry_is_lenient() {
        assert_eq!(parse_entry("12)"), 12.0);
        assert_eq!(parse_entry("0."), 0.0);
        assert_eq!(parse_entry("-3.5e2"), -350.0);
        assert_eq!(parse_entry("1.5e"), 1.5);
        assert!(parse_entry("(").is_nan());
        assert!(parse_entry("").is_nan());
    }

    #[test]
    fn test_evaluate_expression() {
        let mut calc = Calculator::new();
        let result = calc.evaluate_expression("√(16) + 3^2").unwrap();
        assert_eq!(result, 13.0);
        assert_eq!(calc.current_entry(), "13");
        assert_eq!(calc.expression(), "√(16) + 3^2");
        assert_eq!(calc.history().len(), 1);

        assert!(matches!(calc.evaluate_expression("2 +"), Err(CalcError::InvalidExpression(_))));
        assert_eq!(calc.current_entry(), "0");
        assert_eq!(calc.history().len(), 1);
    }

    #[test]
    fn test_insert_constant_and_recall_history() {
        let mut calc = Calculator::new();
        calc.insert_constant(Constant::SpeedOfLight);
        assert_eq!(calc.current_entry(), "299792458");
        assert_eq!(calc.expression(), "c");

        let (mut calc, _) = run("6", Operator::Mul, "7");
        calc.clear_all();
        assert!(calc.recall_history(0));
        assert_eq!(calc.current_entry(), "42");
        assert_eq!(calc.expression(), "6 × 7");
        assert!(!calc.recall_history(5));
    }

    #[test]
    fn test_restore() {
        let mut calc = Calculator::with_history_capacity(50);
        let history: Vec<_> = (0..30).map(|i| HistoryEntry::new("x", i as f64)).collect();
        calc.restore(12.5, history, AngleMode::Gradians);
        assert_eq!(calc.memory(), 12.5);
        assert_eq!(calc.angle_mode(), AngleMode::Gradians);
        assert_eq!(calc.history().len(), 30);
        assert_eq!(calc.current_entry(), "0");
    }

    #[test]
    fn test_dispatch() {
        let mut calc = Calculator::new();
        for command in [
            Command::Digit('1'),
            Command::Digit('2'),
            Command::Operator(Operator::Div),
            Command::Digit('4'),
            Command::Commit,
        ] {
            calc.dispatch(command).unwrap();
        }
        assert_eq!(calc.entry_value(), 3.0);

        calc.dispatch(Command::MemoryAdd).unwrap();
        calc.dispatch(Command::ClearAll).unwrap();
        calc.dispatch(Command::MemoryRecall).unwrap();
        assert_eq!(calc.current_entry(), "3");
    }
}
