//! Embedded example tables, parsed and validated once on first use.

use crate::loader::TableLoader;
use crate::types::{TabulaError, Table};

const TABLE_TEXTS: [&str; 3] = [
    include_str!("../tables/alternating.json"),
    include_str!("../tables/alternating-short.json"),
    include_str!("../tables/growing-ones.json"),
];

lazy_static::lazy_static! {
    static ref TABLES: Result<Vec<Table>, TabulaError> = load_all(&TABLE_TEXTS);
}

/// Loads every text as a table, stopping at the first one that fails.
fn load_all(texts: &[&str]) -> Result<Vec<Table>, TabulaError> {
    let tables = texts
        .iter()
        .map(|text| TableLoader::load_table_from_string(text))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!("loaded {} embedded tables", tables.len());
    Ok(tables)
}

pub struct TableManager;

impl TableManager {
    /// Returns every embedded table, in catalog order.
    ///
    /// # Returns
    ///
    /// * `Err(TabulaError)` if an embedded table fails to parse or validate. The error is
    ///   the same on every call.
    pub fn tables() -> Result<&'static [Table], TabulaError> {
        TABLES.as_deref().map_err(Clone::clone)
    }

    pub fn get_table_count() -> Result<usize, TabulaError> {
        Ok(Self::tables()?.len())
    }

    pub fn get_table_by_index(index: usize) -> Result<&'static Table, TabulaError> {
        Self::tables()?.get(index).ok_or_else(|| {
            TabulaError::ValidationError(format!("Table index {} out of range", index))
        })
    }

    pub fn get_table_by_name(name: &str) -> Result<&'static Table, TabulaError> {
        Self::tables()?
            .iter()
            .find(|table| table.name == name)
            .ok_or_else(|| TabulaError::ValidationError(format!("Table '{}' not found", name)))
    }

    pub fn list_table_names() -> Result<Vec<&'static str>, TabulaError> {
        Ok(Self::tables()?
            .iter()
            .map(|table| table.name.as_str())
            .collect())
    }

    /// Summarizes the table at `index`.
    pub fn get_table_info(index: usize) -> Result<TableInfo, TabulaError> {
        let table = Self::get_table_by_index(index)?;

        let mut states: Vec<&str> = table.rows.iter().map(|row| row.state.as_str()).collect();
        states.sort_unstable();
        states.dedup();

        Ok(TableInfo {
            index,
            name: table.name.clone(),
            start: table.starting_state().unwrap_or_default().to_string(),
            symbols: table.symbols.clone(),
            state_count: states.len(),
            row_count: table.rows.len(),
        })
    }

    /// Indices of the tables whose name contains `query`, ignoring case.
    pub fn search_tables(query: &str) -> Result<Vec<usize>, TabulaError> {
        let query = query.to_lowercase();

        Ok(Self::tables()?
            .iter()
            .enumerate()
            .filter(|(_, table)| table.name.to_lowercase().contains(&query))
            .map(|(index, _)| index)
            .collect())
    }

    /// The JSON source of the table at `index`.
    pub fn get_table_text_by_index(index: usize) -> Result<&'static str, TabulaError> {
        TABLE_TEXTS.get(index).copied().ok_or_else(|| {
            TabulaError::ValidationError(format!("Table text index {} out of range", index))
        })
    }
}

#[derive(Debug, Clone)]
pub struct TableInfo {
    pub index: usize,
    pub name: String,
    pub start: String,
    pub symbols: Vec<String>,
    pub state_count: usize,
    pub row_count: usize,
}
