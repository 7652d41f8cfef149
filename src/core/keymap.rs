//! Keyboard routing table
//!
//! Maps a physical key press to a calculator [`Command`]. Pure lookup; the
//! calculator executes commands through `Calculator::dispatch`.

use serde::{Deserialize, Serialize};

use crate::core::features::calculator::scientific::{Constant, ScientificFunction};
use crate::shared::types::Operator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self { key, modifiers: Modifiers::default() }
    }

    pub fn char(c: char) -> Self {
        Self::plain(Key::Char(c))
    }

    pub fn ctrl(c: char) -> Self {
        Self {
            key: Key::Char(c),
            modifiers: Modifiers { ctrl: true, ..Modifiers::default() },
        }
    }

    pub fn shift(c: char) -> Self {
        Self {
            key: Key::Char(c),
            modifiers: Modifiers { shift: true, ..Modifiers::default() },
        }
    }
}

/// Every action the calculator pad can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "arg", rename_all = "camelCase")]
pub enum Command {
    Digit(char),
    DecimalPoint,
    Parenthesis(char),
    Operator(Operator),
    Commit,
    Function(ScientificFunction),
    InsertConstant(Constant),
    ClearAll,
    ClearEntry,
    Backspace,
    ToggleSign,
    Percentage,
    MemoryClear,
    MemoryRecall,
    MemoryAdd,
    MemorySubtract,
}

/// Route a key press; `None` for keys without a binding
///
/// Bindings are checked in a fixed order: digits, decimal point, operators,
/// editing keys, then Ctrl/Cmd memory shortcuts, then Shift functions.
pub fn route_key(press: KeyPress) -> Option<Command> {
    let c = match press.key {
        Key::Enter => return Some(Command::Commit),
        Key::Escape => return Some(Command::ClearAll),
        Key::Backspace => return Some(Command::Backspace),
        Key::Char(c) => c,
    };

    match c {
        '0'..='9' => return Some(Command::Digit(c)),
        '.' | ',' => return Some(Command::DecimalPoint),
        '+' | '-' | '*' | '/' | '^' => return Operator::from_char(c).map(Command::Operator),
        '=' => return Some(Command::Commit),
        '%' => return Some(Command::Percentage),
        '(' | ')' => return Some(Command::Parenthesis(c)),
        _ => {}
    }

    let mods = press.modifiers;
    if mods.ctrl || mods.meta {
        // Memory clear wins over copy on Ctrl+C
        return match c.to_ascii_lowercase() {
            'm' => Some(Command::MemoryAdd),
            'r' => Some(Command::MemoryRecall),
            'c' => Some(Command::MemoryClear),
            _ => None,
        };
    }

    if mods.shift {
        let function = match c {
            'S' => ScientificFunction::Sin,
            'C' => ScientificFunction::Cos,
            'T' => ScientificFunction::Tan,
            'L' => ScientificFunction::Log,
            'N' => ScientificFunction::Ln,
            'E' => ScientificFunction::Exp,
            'Q' => ScientificFunction::Sqrt,
            'R' => ScientificFunction::Cbrt,
            '!' => ScientificFunction::Fact,
            'P' => return Some(Command::InsertConstant(Constant::Pi)),
            _ => return None,
        };
        return Some(Command::Function(function));
    }

    None
}
