//! This module defines the core data structures and types used throughout the crate,
//! including the table representation, symbol patterns, operations, step results and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::Rule;

/// A tape symbol. Usually a single character, but multi-character tokens are legal.
pub type Symbol = String;

/// The default blank symbol used on the tape.
pub const DEFAULT_BLANK_SYMBOL: &str = " ";
/// Pattern marker matching every vocabulary symbol (blank excluded).
pub const ANY_SYMBOL: &str = "*";
/// Prefix marking a symbol excluded by a Not-set pattern.
pub const NOT_PREFIX: char = '!';
/// Prefix of generated state names (`q0`, `q1`, ...).
pub const STATE_PREFIX: &str = "q";
/// Prefix of interned symbol names (`S0`, `S1`, ...).
pub const SYMBOL_PREFIX: &str = "S";
/// The maximum number of steps `run_to_halt` executes before giving up.
pub const MAX_EXECUTION_STEPS: usize = 10000;

/// A transition table, either flat or abbreviated (containing macro invocations).
///
/// Besides its rows, a table carries everything needed to set up a machine: the initial
/// tape, the starting state, the vocabulary used to expand `*` and `!x` patterns, and the
/// blank symbol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Table {
    /// An optional human readable name.
    #[serde(default)]
    pub name: String,
    /// Transition rows, in priority order.
    pub rows: Vec<Row>,
    /// The initial tape content. The head starts on the first square.
    #[serde(default)]
    pub tape: Vec<Symbol>,
    /// The starting state. Defaults to the state of the first row.
    #[serde(default)]
    pub start: Option<String>,
    /// The possible-symbols vocabulary, blank excluded.
    #[serde(default)]
    pub symbols: Vec<Symbol>,
    /// The blank symbol.
    #[serde(default = "default_blank")]
    pub blank: Symbol,
}

fn default_blank() -> Symbol {
    DEFAULT_BLANK_SYMBOL.to_string()
}

impl Default for Table {
    fn default() -> Self {
        Self {
            name: String::new(),
            rows: Vec::new(),
            tape: Vec::new(),
            start: None,
            symbols: Vec::new(),
            blank: default_blank(),
        }
    }
}

impl Table {
    /// Creates a table from rows, with every other setting left at its default.
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Sets the possible-symbols vocabulary.
    pub fn with_symbols<S: Into<Symbol>>(mut self, symbols: impl IntoIterator<Item = S>) -> Self {
        self.symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the initial tape.
    pub fn with_tape<S: Into<Symbol>>(mut self, tape: impl IntoIterator<Item = S>) -> Self {
        self.tape = tape.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the starting state.
    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    /// Overrides the blank symbol.
    pub fn with_blank(mut self, blank: impl Into<Symbol>) -> Self {
        self.blank = blank.into();
        self
    }

    /// Returns the state a machine built from this table starts in.
    pub fn starting_state(&self) -> Option<&str> {
        self.start
            .as_deref()
            .or_else(|| self.rows.first().map(|row| row.state.as_str()))
    }

    /// Returns the vocabulary followed by the blank symbol, skipping a blank listed in the vocabulary.
    pub fn symbols_with_blank(&self) -> Vec<Symbol> {
        self.symbols
            .iter()
            .filter(|symbol| **symbol != self.blank)
            .cloned()
            .chain(std::iter::once(self.blank.clone()))
            .collect()
    }
}

/// A single transition row: `(state, symbol patterns, operations, final state)`.
///
/// Rows of the same state are independent. A row applies when any of its patterns
/// matches the scanned symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// The state (m-configuration) this row belongs to.
    pub state: String,
    /// Patterns tested against the scanned symbol.
    pub symbols: Vec<SymbolPattern>,
    /// Operations applied in order when the row fires.
    pub operations: Vec<Operation>,
    /// The state the machine moves to afterwards.
    pub final_state: String,
}

impl Row {
    pub fn new<P: Into<SymbolPattern>>(
        state: impl Into<String>,
        symbols: impl IntoIterator<Item = P>,
        operations: impl IntoIterator<Item = Operation>,
        final_state: impl Into<String>,
    ) -> Self {
        Self {
            state: state.into(),
            symbols: symbols.into_iter().map(Into::into).collect(),
            operations: operations.into_iter().collect(),
            final_state: final_state.into(),
        }
    }

    /// Builds a row from the string grammar used by table files.
    ///
    /// # Returns
    ///
    /// * `Err(TabulaError::InvalidOperation)` if an operation string is malformed.
    pub fn parse(
        state: &str,
        symbols: &[&str],
        operations: &[&str],
        final_state: &str,
    ) -> Result<Self, TabulaError> {
        Ok(Self {
            state: state.to_string(),
            symbols: symbols.iter().map(|s| SymbolPattern::from(*s)).collect(),
            operations: operations
                .iter()
                .map(|op| op.parse())
                .collect::<Result<_, _>>()?,
            final_state: final_state.to_string(),
        })
    }

    /// Returns the symbols excluded by the `!x` entries of this row.
    pub fn excluded(&self) -> Vec<&str> {
        self.symbols
            .iter()
            .filter_map(|pattern| match pattern {
                SymbolPattern::Not(symbol) => Some(symbol.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Checks whether this row applies to the scanned symbol.
    ///
    /// An exact entry matches first, blank included. `*` and Not-sets only ever
    /// match non-blank symbols.
    pub fn matches(&self, scanned: &str, blank: &str) -> bool {
        if self
            .symbols
            .iter()
            .any(|p| matches!(p, SymbolPattern::Symbol(s) if s == scanned))
        {
            return true;
        }

        if scanned == blank {
            return false;
        }

        if self.symbols.contains(&SymbolPattern::Any) {
            return true;
        }

        let excluded = self.excluded();
        !excluded.is_empty() && !excluded.contains(&scanned)
    }
}

/// One entry of a row's symbol column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SymbolPattern {
    /// An exact symbol (the blank symbol included).
    Symbol(Symbol),
    /// `*`: every non-blank symbol.
    Any,
    /// `!x`: one exclusion of the row's Not-set.
    Not(Symbol),
}

impl SymbolPattern {
    pub fn is_wildcard(&self) -> bool {
        !matches!(self, SymbolPattern::Symbol(_))
    }
}

impl From<&str> for SymbolPattern {
    fn from(value: &str) -> Self {
        if value == ANY_SYMBOL {
            return SymbolPattern::Any;
        }
        match value.strip_prefix(NOT_PREFIX) {
            Some(excluded) if !excluded.is_empty() => SymbolPattern::Not(excluded.to_string()),
            _ => SymbolPattern::Symbol(value.to_string()),
        }
    }
}

impl From<String> for SymbolPattern {
    fn from(value: String) -> Self {
        SymbolPattern::from(value.as_str())
    }
}

impl From<SymbolPattern> for String {
    fn from(value: SymbolPattern) -> Self {
        value.to_string()
    }
}

impl fmt::Display for SymbolPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolPattern::Symbol(symbol) => f.write_str(symbol),
            SymbolPattern::Any => f.write_str(ANY_SYMBOL),
            SymbolPattern::Not(symbol) => write!(f, "{NOT_PREFIX}{symbol}"),
        }
    }
}

/// An operation performed on the scanned square.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operation {
    /// `L`: move the head one square to the left.
    Left,
    /// `R`: move the head one square to the right.
    Right,
    /// `E`: erase the scanned square.
    Erase,
    /// `P<symbol>`: print a symbol on the scanned square.
    Print(Symbol),
}

impl Operation {
    pub fn print(symbol: impl Into<Symbol>) -> Self {
        Operation::Print(symbol.into())
    }
}

impl FromStr for Operation {
    type Err = TabulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(Operation::Left),
            "R" => Ok(Operation::Right),
            "E" => Ok(Operation::Erase),
            _ => match s.strip_prefix('P') {
                Some(symbol) if !symbol.is_empty() => Ok(Operation::Print(symbol.to_string())),
                _ => Err(TabulaError::InvalidOperation(s.to_string())),
            },
        }
    }
}

impl TryFrom<String> for Operation {
    type Error = TabulaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Operation> for String {
    fn from(value: Operation) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Left => f.write_str("L"),
            Operation::Right => f.write_str("R"),
            Operation::Erase => f.write_str("E"),
            Operation::Print(symbol) => write!(f, "P{symbol}"),
        }
    }
}

/// Represents the possible head movements of a canonical row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// The operation realising this movement, if any.
    pub fn operation(self) -> Option<Operation> {
        match self {
            Direction::Left => Some(Operation::Left),
            Direction::Right => Some(Operation::Right),
            Direction::Stay => None,
        }
    }
}

/// Represents the outcome of a machine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The machine performed a step and continues execution.
    Continue,
    /// No row matched the current state and scanned symbol. Halting is permanent.
    Halt,
}

/// Represents the errors that can occur while building, compiling, encoding or loading tables.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TabulaError {
    /// Indicates a malformed macro invocation.
    #[error("Invocation parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates an operation string outside `R`, `L`, `E` and `P<symbol>`.
    #[error("Invalid operation: {0:?}")]
    InvalidOperation(String),
    /// Indicates a description number that does not follow the standard grammar.
    #[error("Not a well-formed description number: {0}")]
    MalformedDescriptionNumber(String),
    /// Indicates a standard description that does not follow the standard grammar.
    #[error("Not a well-formed standard description: {0}")]
    MalformedStandardDescription(String),
    /// Indicates an error during the validation of a table.
    #[error("Table validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
    /// Indicates that a table could not be (de)serialized.
    #[error("Table format error: {0}")]
    FormatError(String),
}

impl From<serde_json::Error> for TabulaError {
    fn from(error: serde_json::Error) -> Self {
        TabulaError::FormatError(error.to_string())
    }
}
