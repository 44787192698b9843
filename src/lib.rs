//! This crate provides table-driven tape machines in the style of Turing's 1936 paper.
//! It includes modules for running flat transition tables, compiling abbreviated tables
//! (rows named by parameterized m-functions) into flat ones, canonicalizing flat tables
//! into standard form, and encoding standard tables as description numbers.

pub mod analyzer;
pub mod compiler;
pub mod encoder;
pub mod library;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod standard;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the abbreviated table compiler.
pub use compiler::{compile, AbbreviatedTable};
/// Re-exports the standard description and description number codec.
pub use encoder::{
    decode, description_number, standard_description, DescriptionNumber, StandardDescription,
    StandardRow,
};
/// Re-exports the `TableLoader` struct from the loader module.
pub use loader::TableLoader;
/// Re-exports the `Machine` struct from the machine module.
pub use machine::Machine;
/// Re-exports the invocation parser.
pub use parser::{parse, Invocation};
/// Re-exports `TableInfo` and `TableManager` from the programs module.
pub use programs::{TableInfo, TableManager};
/// Re-exports the canonicalizer.
pub use standard::{standardize, StandardTable, SymbolMap};
pub use tape::Tape;
/// Re-exports the table vocabulary from the types module.
pub use types::{
    Direction, Operation, Row, Step, Symbol, SymbolPattern, TabulaError, Table,
    DEFAULT_BLANK_SYMBOL, MAX_EXECUTION_STEPS,
};
