//! This module canonicalizes flat tables into standard form.
//!
//! A standard table has exactly one symbol, one print and one move per row, with states
//! renamed `q1, q2, ...` and symbols interned as `S0` (blank), `S1, S2, ...`. Rows that
//! perform several prints or moves are split across hidden intermediate states.

use crate::analyzer::analyze;
use crate::encoder::{
    description_number, standard_description, DescriptionNumber, StandardDescription,
    StandardRow,
};
use crate::tape::Tape;
use crate::types::{
    Direction, Operation, Row, Symbol, SymbolPattern, TabulaError, Table, STATE_PREFIX,
    SYMBOL_PREFIX,
};
use std::collections::HashMap;

/// Bidirectional map between interned indices (`S<k>`) and original symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolMap {
    originals: Vec<Symbol>,
    indices: HashMap<Symbol, usize>,
}

impl SymbolMap {
    /// Returns the index of `symbol`, assigning the next free one on first sight.
    fn intern(&mut self, symbol: &str) -> usize {
        if let Some(&index) = self.indices.get(symbol) {
            return index;
        }
        let index = self.originals.len();
        self.originals.push(symbol.to_string());
        self.indices.insert(symbol.to_string(), index);
        index
    }

    pub fn index(&self, original: &str) -> Option<usize> {
        self.indices.get(original).copied()
    }

    pub fn original(&self, index: usize) -> Option<&str> {
        self.originals.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    /// Iterates over `(S<k>, original)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (String, &str)> {
        self.originals
            .iter()
            .enumerate()
            .map(|(k, original)| (format!("{SYMBOL_PREFIX}{k}"), original.as_str()))
    }

    /// Replaces every interned symbol with its original value and concatenates the result.
    ///
    /// Squares that are not interned symbols are kept as they are.
    pub fn translate<'a>(&self, squares: impl IntoIterator<Item = &'a Symbol>) -> String {
        squares
            .into_iter()
            .map(|square| {
                square
                    .strip_prefix(SYMBOL_PREFIX)
                    .and_then(|k| k.parse::<usize>().ok())
                    .and_then(|k| self.original(k))
                    .unwrap_or(square.as_str())
            })
            .collect()
    }

    pub fn translate_tape(&self, tape: &Tape) -> String {
        self.translate(tape.symbols())
    }
}

/// The standard form of a flat table.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardTable {
    /// The runnable canonical table.
    pub table: Table,
    /// Maps the interned symbols of `table` back to the original ones.
    pub symbol_map: SymbolMap,
    /// The canonical rows, in the order of the standard description.
    pub rows: Vec<StandardRow>,
    pub standard_description: StandardDescription,
    pub description_number: DescriptionNumber,
}

/// Canonicalizes a flat table.
///
/// The table is validated with the analyzer first. States are numbered in order of first
/// appearance (a row's state, then its final state), hidden states share the same counter.
///
/// # Returns
///
/// * `Ok(StandardTable)` with the canonical table, its symbol map and its encodings.
/// * `Err(TabulaError::ValidationError)` if the table fails analysis.
pub fn standardize(table: &Table) -> Result<StandardTable, TabulaError> {
    analyze(table)?;
    Ok(Standardizer::new(table).standardize())
}

/// What the print slot of a canonical row writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Print {
    /// Rewrites the scanned symbol.
    Keep,
    Symbol(usize),
}

impl Print {
    fn resolve(self, scanned: usize) -> usize {
        match self {
            Print::Keep => scanned,
            Print::Symbol(symbol) => symbol,
        }
    }
}

/// Interning state of one canonicalization.
struct Standardizer<'t> {
    table: &'t Table,
    symbols: SymbolMap,
    states: HashMap<String, usize>,
    next_state: usize,
    rows: Vec<StandardRow>,
    hidden: usize,
}

impl<'t> Standardizer<'t> {
    fn new(table: &'t Table) -> Self {
        let mut symbols = SymbolMap::default();
        symbols.intern(&table.blank);

        Self {
            table,
            symbols,
            states: HashMap::new(),
            next_state: 1,
            rows: Vec::new(),
            hidden: 0,
        }
    }

    fn standardize(mut self) -> StandardTable {
        let source = self.table;

        for row in &source.rows {
            self.standardize_row(row);
        }

        let start = source
            .start
            .as_deref()
            .map(|start| format!("{STATE_PREFIX}{}", self.state(start)));

        let tape: Vec<Symbol> = source
            .tape
            .iter()
            .map(|square| format!("{SYMBOL_PREFIX}{}", self.symbols.intern(square)))
            .collect();

        log::debug!(
            "standardized {} rows into {} canonical rows ({} hidden states, {} symbols)",
            source.rows.len(),
            self.rows.len(),
            self.hidden,
            self.symbols.len()
        );

        let standard_description = standard_description(&self.rows);
        let description_number = description_number(&standard_description);

        let mut table = Table::from_standard_rows(&self.rows);
        table.name = source.name.clone();
        table.tape = tape;
        table.start = start;
        table.symbols = (1..self.symbols.len())
            .map(|k| format!("{SYMBOL_PREFIX}{k}"))
            .collect();

        StandardTable {
            table,
            symbol_map: self.symbols,
            rows: self.rows,
            standard_description,
            description_number,
        }
    }

    fn standardize_row(&mut self, row: &Row) {
        let scanned = self.expand_symbols(&row.symbols);
        let pairs = self.split_operations(&row.operations);
        let state = self.state(&row.state);
        let final_state = self.state(&row.final_state);

        for symbol in scanned {
            let mut current = state;

            for (i, &(print, movement)) in pairs.iter().enumerate() {
                let next = if i + 1 == pairs.len() {
                    final_state
                } else {
                    self.hidden_state()
                };

                if i == 0 {
                    self.emit(current, symbol, print, movement, next);
                } else {
                    // A hidden state continues whatever it scans.
                    for hidden_symbol in self.vocabulary() {
                        self.emit(current, hidden_symbol, print, movement, next);
                    }
                }

                current = next;
            }
        }
    }

    fn emit(
        &mut self,
        state: usize,
        symbol: usize,
        print: Print,
        movement: Direction,
        final_state: usize,
    ) {
        self.rows.push(StandardRow {
            state,
            symbol,
            print: print.resolve(symbol),
            movement,
            final_state,
        });
    }

    /// Interns the vocabulary followed by blank.
    fn vocabulary(&mut self) -> Vec<usize> {
        self.table
            .symbols_with_blank()
            .iter()
            .map(|symbol| self.symbols.intern(symbol))
            .collect()
    }

    /// Expands a symbol column into distinct interned symbols, in first-seen order.
    ///
    /// `*` stands for every vocabulary symbol. All `!x` entries of the column form one
    /// Not-set, expanded once. Blank only appears when listed explicitly.
    fn expand_symbols(&mut self, patterns: &[SymbolPattern]) -> Vec<usize> {
        let excluded: Vec<&Symbol> = patterns
            .iter()
            .filter_map(|pattern| match pattern {
                SymbolPattern::Not(symbol) => Some(symbol),
                _ => None,
            })
            .collect();

        let vocabulary: Vec<&Symbol> = self
            .table
            .symbols
            .iter()
            .filter(|symbol| **symbol != self.table.blank)
            .collect();

        let mut originals: Vec<&Symbol> = Vec::new();
        let mut not_expanded = false;

        for pattern in patterns {
            match pattern {
                SymbolPattern::Symbol(symbol) => originals.push(symbol),
                SymbolPattern::Any => originals.extend(vocabulary.iter().copied()),
                SymbolPattern::Not(_) if !not_expanded => {
                    not_expanded = true;
                    originals.extend(
                        vocabulary
                            .iter()
                            .copied()
                            .filter(|symbol| !excluded.contains(symbol)),
                    );
                }
                SymbolPattern::Not(_) => {}
            }
        }

        let mut expanded = Vec::new();
        for original in originals {
            let index = self.symbols.intern(original);
            if !expanded.contains(&index) {
                expanded.push(index);
            }
        }
        expanded
    }

    /// Splits an operation sequence into print/move pairs.
    ///
    /// A move with no print before it rewrites the scanned symbol. A print is paired with the
    /// move right after it, if any. An empty sequence rewrites the scanned symbol and stays.
    fn split_operations(&mut self, operations: &[Operation]) -> Vec<(Print, Direction)> {
        let mut pairs: Vec<(Print, Direction)> = Vec::new();
        let mut open = false;

        for operation in operations {
            let movement = match operation {
                Operation::Left => Direction::Left,
                Operation::Right => Direction::Right,
                Operation::Erase | Operation::Print(_) => {
                    let symbol = match operation {
                        Operation::Print(symbol) => symbol.as_str(),
                        _ => self.table.blank.as_str(),
                    };
                    pairs.push((Print::Symbol(self.symbols.intern(symbol)), Direction::Stay));
                    open = true;
                    continue;
                }
            };

            match pairs.last_mut() {
                Some(pair) if open => pair.1 = movement,
                _ => pairs.push((Print::Keep, movement)),
            }
            open = false;
        }

        if pairs.is_empty() {
            pairs.push((Print::Keep, Direction::Stay));
        }
        pairs
    }

    /// Returns the canonical index of a named state.
    fn state(&mut self, name: &str) -> usize {
        if let Some(&index) = self.states.get(name) {
            return index;
        }
        let index = self.allocate();
        self.states.insert(name.to_string(), index);
        index
    }

    /// Allocates a fresh state index that no name refers to.
    fn hidden_state(&mut self) -> usize {
        self.hidden += 1;
        self.allocate()
    }

    fn allocate(&mut self) -> usize {
        let index = self.next_state;
        self.next_state += 1;
        index
    }
}
