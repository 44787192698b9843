//! This module compiles abbreviated tables into flat tables.
//!
//! Rows of an abbreviated table may be named by macro invocations (`f(C, B, a)`) and may
//! jump to invocations (`f(e1(C, B, a), B, a)`). Compilation expands every invocation that
//! is reachable from the plain rows into concrete rows named `q0`, `q1`, ..., one name per
//! distinct call signature. Signatures are expanded at most once, which makes recursive
//! definitions terminate.

use crate::parser::{parse, Invocation};
use crate::types::{Operation, Row, Symbol, SymbolPattern, TabulaError, Table, STATE_PREFIX};
use std::collections::HashMap;

/// Compiles an abbreviated table into a flat table.
///
/// The vocabulary, blank symbol and initial tape carry over unchanged. An explicit starting
/// state is compiled like any other invocation.
///
/// # Returns
///
/// * `Ok(Table)` containing only plain state names.
/// * `Err(TabulaError::ParseError)` if a state name or final state is not a valid invocation.
pub fn compile(table: &Table) -> Result<Table, TabulaError> {
    AbbreviatedTable::new(table)?.compile()
}

/// One row of the abbreviated table, with its invocations parsed.
struct Definition<'t> {
    head: Invocation,
    params: Vec<String>,
    final_state: Invocation,
    row: &'t Row,
}

/// An abbreviated table prepared for compilation.
pub struct AbbreviatedTable<'t> {
    table: &'t Table,
    definitions: Vec<Definition<'t>>,
    /// Definitions indexed by macro name and arity, in table order.
    signatures: HashMap<(String, usize), Vec<usize>>,
    /// The vocabulary followed by blank.
    vocabulary: Vec<Symbol>,
}

impl<'t> AbbreviatedTable<'t> {
    /// Parses every state name and final state of `table`.
    pub fn new(table: &'t Table) -> Result<Self, TabulaError> {
        let mut definitions = Vec::with_capacity(table.rows.len());
        let mut signatures: HashMap<(String, usize), Vec<usize>> = HashMap::new();

        for (i, row) in table.rows.iter().enumerate() {
            let head = parse(&row.state, &table.blank)?;
            let final_state = parse(&row.final_state, &table.blank)?;
            let params = head.args.iter().map(|arg| arg.to_string()).collect();

            signatures
                .entry((head.name.clone(), head.arity()))
                .or_default()
                .push(i);

            definitions.push(Definition {
                head,
                params,
                final_state,
                row,
            });
        }

        Ok(Self {
            table,
            definitions,
            signatures,
            vocabulary: table.symbols_with_blank(),
        })
    }

    /// Expands every plain row, then the starting state, and collects the flat rows.
    pub fn compile(&self) -> Result<Table, TabulaError> {
        let mut expansion = Expansion::new(self);

        for definition in self.definitions.iter().filter(|d| d.head.is_leaf()) {
            expansion.interpret(&definition.head);
        }

        let start = match &self.table.start {
            Some(start) => Some(expansion.interpret(&parse(start, &self.table.blank)?)),
            None => None,
        };

        log::debug!(
            "compiled {} rows into {} rows over {} signatures",
            self.table.rows.len(),
            expansion.rows.len(),
            expansion.names.len()
        );

        Ok(Table {
            name: self.table.name.clone(),
            rows: expansion.into_rows(),
            tape: self.table.tape.clone(),
            start,
            symbols: self.table.symbols.clone(),
            blank: self.table.blank.clone(),
        })
    }

    /// Returns the definitions matching a macro name and arity, in table order.
    fn matching(&self, invocation: &Invocation) -> impl Iterator<Item = &Definition<'t>> {
        self.signatures
            .get(&(invocation.name.clone(), invocation.arity()))
            .into_iter()
            .flatten()
            .map(|&i| &self.definitions[i])
    }

    /// Returns the symbol parameter of a definition, if its symbol column is one.
    ///
    /// A symbol parameter is a single exact symbol that is neither in the vocabulary
    /// (blank included) nor one of the definition's declared parameters.
    fn symbol_parameter<'d>(&self, definition: &'d Definition) -> Option<&'d str> {
        match definition.row.symbols.as_slice() {
            [SymbolPattern::Symbol(symbol)]
                if !self.vocabulary.contains(symbol) && !definition.params.contains(symbol) =>
            {
                Some(symbol.as_str())
            }
            _ => None,
        }
    }
}

type Bindings = HashMap<String, Invocation>;

/// Definitions still to be expanded for one named invocation.
struct Frame<'a, 't> {
    index: usize,
    pending: std::vec::IntoIter<(&'a Definition<'t>, Bindings)>,
}

/// Mutable state of one compilation: assigned names, pending expansions and emitted rows.
///
/// Expansion is depth first over an explicit stack, so states are numbered in the order
/// they are first reached and deep chains of invocations do not grow the call stack.
struct Expansion<'a, 't> {
    table: &'a AbbreviatedTable<'t>,
    /// Call signature to assigned state index.
    names: HashMap<String, usize>,
    stack: Vec<Frame<'a, 't>>,
    rows: Vec<(usize, Row)>,
}

impl<'a, 't> Expansion<'a, 't> {
    fn new(table: &'a AbbreviatedTable<'t>) -> Self {
        Self {
            table,
            names: HashMap::new(),
            stack: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Returns the plain state name of an invocation, expanding everything it reaches.
    fn interpret(&mut self, invocation: &Invocation) -> String {
        let name = self.visit(invocation);
        self.drain();
        name
    }

    /// Names an invocation. On first sight its definitions are scheduled for expansion.
    fn visit(&mut self, invocation: &Invocation) -> String {
        let signature = invocation.to_string();
        if let Some(&index) = self.names.get(&signature) {
            return state_name(index);
        }

        let index = self.names.len();
        self.names.insert(signature, index);

        let pending = self.instances(invocation).into_iter();
        self.stack.push(Frame { index, pending });

        state_name(index)
    }

    /// Emits rows until no scheduled definition is left.
    fn drain(&mut self) {
        while let Some(frame) = self.stack.last_mut() {
            let index = frame.index;
            let Some((definition, bindings)) = frame.pending.next() else {
                self.stack.pop();
                continue;
            };

            let final_state = self.visit(&definition.final_state.substitute(&bindings));
            self.rows.push((index, instantiate(definition, &bindings, index, final_state)));
        }
    }

    /// Pairs every definition matching `invocation` with its parameter bindings. A
    /// definition with a symbol parameter yields one pair per symbol, blank included.
    fn instances(&self, invocation: &Invocation) -> Vec<(&'a Definition<'t>, Bindings)> {
        let table = self.table;
        let mut instances = Vec::new();

        for definition in table.matching(invocation) {
            let bindings: Bindings = definition
                .params
                .iter()
                .cloned()
                .zip(invocation.args.iter().cloned())
                .collect();

            match table.symbol_parameter(definition) {
                Some(parameter) => {
                    for symbol in &table.vocabulary {
                        let mut bound = bindings.clone();
                        bound.insert(parameter.to_string(), Invocation::leaf(symbol.as_str()));
                        instances.push((definition, bound));
                    }
                }
                None => instances.push((definition, bindings)),
            }
        }

        instances
    }

    /// Orders the rows by state index, keeping table order within a state.
    fn into_rows(mut self) -> Vec<Row> {
        self.rows.sort_by_key(|(index, _)| *index);
        self.rows.into_iter().map(|(_, row)| row).collect()
    }
}

/// Builds the flat row of `definition` under the given bindings.
fn instantiate(
    definition: &Definition,
    bindings: &Bindings,
    index: usize,
    final_state: String,
) -> Row {
    Row {
        state: state_name(index),
        symbols: definition
            .row
            .symbols
            .iter()
            .map(|pattern| substitute_pattern(pattern, bindings))
            .collect(),
        operations: definition
            .row
            .operations
            .iter()
            .map(|operation| substitute_operation(operation, bindings))
            .collect(),
        final_state,
    }
}

fn state_name(index: usize) -> String {
    format!("{STATE_PREFIX}{index}")
}

fn substitute_symbol(symbol: &str, bindings: &Bindings) -> Symbol {
    bindings
        .get(symbol)
        .map(|value| value.to_string())
        .unwrap_or_else(|| symbol.to_string())
}

/// Substitutes the payload of a pattern. `*` and the `!` marker are kept.
fn substitute_pattern(
    pattern: &SymbolPattern,
    bindings: &Bindings,
) -> SymbolPattern {
    match pattern {
        SymbolPattern::Symbol(symbol) => SymbolPattern::Symbol(substitute_symbol(symbol, bindings)),
        SymbolPattern::Not(symbol) => SymbolPattern::Not(substitute_symbol(symbol, bindings)),
        SymbolPattern::Any => SymbolPattern::Any,
    }
}

fn substitute_operation(
    operation: &Operation,
    bindings: &Bindings,
) -> Operation {
    match operation {
        Operation::Print(symbol) => Operation::Print(substitute_symbol(symbol, bindings)),
        other => other.clone(),
    }
}
