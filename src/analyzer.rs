//! This module provides functions for analyzing tables to detect common errors before they
//! are run, compiled or standardized. This includes checks for the table's structure, its
//! starting state, the vocabulary needed by wildcard patterns and the initial tape symbols.
//!
//! Rows that could both apply to the same state and symbol are not reported: the first one
//! in table order wins.

use crate::types::{Row, Symbol, SymbolPattern, TabulaError, Table};
use std::collections::HashSet;

/// Represents the errors that can be found during the analysis of a table.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// Indicates that the explicit starting state is not the state of any row.
    InvalidStartState(String),
    /// Indicates rows using `*` or `!x` in a table without a vocabulary.
    MissingVocabulary(Vec<String>),
    /// Indicates that the initial tape contains symbols outside the vocabulary.
    InvalidTapeSymbols(Vec<Symbol>),
    /// Indicates structural problems with the table (no rows, empty names, etc.).
    StructuralError(String),
}

impl From<AnalysisError> for TabulaError {
    /// Converts an `AnalysisError` into a `TabulaError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::InvalidStartState(state) => {
                TabulaError::ValidationError(format!("Invalid start state: {}", state))
            }
            AnalysisError::MissingVocabulary(states) => TabulaError::ValidationError(format!(
                "Wildcard patterns need a vocabulary, used in states: {:?}",
                states
            )),
            AnalysisError::InvalidTapeSymbols(symbols) => TabulaError::ValidationError(format!(
                "Initial tape contains symbols outside the vocabulary: {:?}",
                symbols
            )),
            AnalysisError::StructuralError(msg) => TabulaError::ValidationError(msg),
        }
    }
}

/// Analyzes a table for structural and logical errors.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(TabulaError::ValidationError)` describing the first violated rule.
pub fn analyze(table: &Table) -> Result<(), TabulaError> {
    warn_unknown_symbols(table);

    [
        check_structure,
        check_valid_start_state,
        check_vocabulary,
        check_tape_symbols,
    ]
    .iter()
    .find_map(|f| f(table).err())
    .map_or(Ok(()), |error| Err(error.into()))
}

/// Checks basic structural requirements of the table.
///
/// This validates that:
/// - The table has at least one row
/// - The blank symbol is not empty
/// - No row has an empty state, final state or symbol column
fn check_structure(table: &Table) -> Result<(), AnalysisError> {
    if table.rows.is_empty() {
        return Err(AnalysisError::StructuralError("No rows defined".to_string()));
    }

    if table.blank.is_empty() {
        return Err(AnalysisError::StructuralError(
            "The blank symbol is empty".to_string(),
        ));
    }

    for (i, row) in table.rows.iter().enumerate() {
        if row.state.trim().is_empty() || row.final_state.trim().is_empty() {
            return Err(AnalysisError::StructuralError(format!(
                "Row {} has an empty state name",
                i
            )));
        }

        if row.symbols.is_empty() {
            return Err(AnalysisError::StructuralError(format!(
                "Row {} of state '{}' has no symbols",
                i, row.state
            )));
        }
    }

    Ok(())
}

/// Checks whether an explicit starting state is the state of some row.
fn check_valid_start_state(table: &Table) -> Result<(), AnalysisError> {
    match &table.start {
        Some(start) if !table.rows.iter().any(|row| &row.state == start) => {
            Err(AnalysisError::InvalidStartState(start.clone()))
        }
        _ => Ok(()),
    }
}

/// Checks that `*` and `!x` patterns have a vocabulary to expand to.
fn check_vocabulary(table: &Table) -> Result<(), AnalysisError> {
    if !table.symbols.is_empty() {
        return Ok(());
    }

    let mut states: Vec<String> = table
        .rows
        .iter()
        .filter(|row| row.symbols.iter().any(SymbolPattern::is_wildcard))
        .map(|row| row.state.clone())
        .collect();

    if !states.is_empty() {
        states.dedup();
        return Err(AnalysisError::MissingVocabulary(states));
    }

    Ok(())
}

/// Checks that every symbol of the initial tape is in the vocabulary or blank.
///
/// Tables without a vocabulary accept any tape.
fn check_tape_symbols(table: &Table) -> Result<(), AnalysisError> {
    if table.symbols.is_empty() {
        return Ok(());
    }

    let known: HashSet<&Symbol> = table
        .symbols
        .iter()
        .chain(std::iter::once(&table.blank))
        .collect();

    let mut unknown: Vec<Symbol> = table
        .tape
        .iter()
        .filter(|symbol| !known.contains(symbol))
        .cloned()
        .collect();

    if !unknown.is_empty() {
        unknown.sort();
        unknown.dedup();
        return Err(AnalysisError::InvalidTapeSymbols(unknown));
    }

    Ok(())
}

/// Logs exact patterns and prints that fall outside the vocabulary.
///
/// These are legal (they may be macro parameters) but are often typos in flat tables.
fn warn_unknown_symbols(table: &Table) {
    if table.symbols.is_empty() {
        return;
    }

    let known: HashSet<&str> = table
        .symbols
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(table.blank.as_str()))
        .collect();

    for row in &table.rows {
        for symbol in literals(row) {
            if !known.contains(symbol) {
                log::warn!("state {:?} uses {:?} outside the vocabulary", row.state, symbol);
            }
        }
    }
}

fn literals(row: &Row) -> impl Iterator<Item = &str> {
    row.symbols.iter().filter_map(|pattern| match pattern {
        SymbolPattern::Symbol(symbol) | SymbolPattern::Not(symbol) => Some(symbol.as_str()),
        SymbolPattern::Any => None,
    })
}
