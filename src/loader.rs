//! This module provides the `TableLoader` struct, responsible for loading tables from JSON
//! files and strings.

use crate::analyzer::analyze;
use crate::types::{TabulaError, Table};
use std::fs;
use std::path::{Path, PathBuf};

/// `TableLoader` is a utility struct for loading tables.
/// It provides methods to load tables from individual files, from string content,
/// and to discover and load all `.json` files within a specified directory.
/// Every loaded table is checked with the analyzer.
pub struct TableLoader;

impl TableLoader {
    /// Loads a single table from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Table)` if the file is successfully read, deserialized and validated.
    /// * `Err(TabulaError::FileError)` if the file cannot be read.
    /// * `Err(TabulaError::FormatError)` if the file content is not a valid table.
    /// * `Err(TabulaError::ValidationError)` if the table fails analysis.
    pub fn load_table(path: &Path) -> Result<Table, TabulaError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TabulaError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_table_from_string(&content)
    }

    /// Loads a single table from JSON content.
    pub fn load_table_from_string(content: &str) -> Result<Table, TabulaError> {
        let table: Table = serde_json::from_str(content)?;
        analyze(&table)?;
        Ok(table)
    }

    /// Loads all table files (`.json` extension) from a given directory.
    ///
    /// Directories and other files are skipped. Each element of the result is either the
    /// path and table of one file, or the error that occurred while loading it.
    pub fn load_tables(directory: &Path) -> Vec<Result<(PathBuf, Table), TabulaError>> {
        if !directory.exists() {
            return vec![Err(TabulaError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TabulaError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| !path.is_dir() && path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        paths
            .into_iter()
            .map(|path| match Self::load_table(&path) {
                Ok(table) => Ok((path, table)),
                Err(e) => Err(TabulaError::FileError(format!(
                    "Failed to load table from {}: {}",
                    path.display(),
                    e
                ))),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Operation, SymbolPattern};
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const ALTERNATING: &str = r#"{
        "name": "Alternating",
        "symbols": ["0", "1"],
        "rows": [
            {"state": "b", "symbols": [" "], "operations": ["P0", "R"], "final_state": "c"},
            {"state": "c", "symbols": [" "], "operations": ["R"], "final_state": "e"},
            {"state": "e", "symbols": [" "], "operations": ["P1", "R"], "final_state": "k"},
            {"state": "k", "symbols": [" "], "operations": ["R"], "final_state": "b"}
        ]
    }"#;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_valid_table() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "alternating.json", ALTERNATING);

        let table = TableLoader::load_table(&path).unwrap();
        assert_eq!(table.name, "Alternating");
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.blank, " ");
        assert_eq!(table.start, None);
        assert_eq!(
            table.rows[0].operations,
            vec![Operation::print("0"), Operation::Right]
        );
    }

    #[test]
    fn test_load_patterns() {
        let table = TableLoader::load_table_from_string(
            r#"{"symbols": ["a", "b"], "blank": "_", "tape": ["a"],
                "rows": [{"state": "s", "symbols": ["*", "!a", "_"], "operations": [], "final_state": "s"}]}"#,
        )
        .unwrap();

        assert_eq!(table.blank, "_");
        assert_eq!(
            table.rows[0].symbols,
            vec![
                SymbolPattern::Any,
                SymbolPattern::Not("a".to_string()),
                SymbolPattern::Symbol("_".to_string())
            ]
        );
    }

    #[test]
    fn test_load_invalid_json() {
        let result = TableLoader::load_table_from_string("This is not a valid table");
        assert!(matches!(result, Err(TabulaError::FormatError(_))));
    }

    #[test]
    fn test_load_invalid_operation() {
        let result = TableLoader::load_table_from_string(
            r#"{"rows": [{"state": "b", "symbols": [" "], "operations": ["X"], "final_state": "b"}]}"#,
        );
        assert!(matches!(result, Err(TabulaError::FormatError(_))));
    }

    #[test]
    fn test_load_table_failing_analysis() {
        let result = TableLoader::load_table_from_string(r#"{"rows": []}"#);
        assert!(matches!(result, Err(TabulaError::ValidationError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = TableLoader::load_table(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(TabulaError::FileError(_))));
    }

    #[test]
    fn test_load_tables_from_directory() {
        let dir = tempdir().unwrap();

        write(dir.path(), "valid.json", ALTERNATING);
        write(dir.path(), "invalid.json", "This is not a valid table");
        write(dir.path(), "ignored.txt", "This file should be ignored");

        let results = TableLoader::load_tables(dir.path());
        assert_eq!(results.len(), 2);

        // Sorted by path: invalid.json first.
        assert!(results[0].is_err());
        let (path, table) = results[1].as_ref().unwrap();
        assert!(path.ends_with("valid.json"));
        assert_eq!(table.name, "Alternating");
    }

    #[test]
    fn test_load_tables_missing_directory() {
        let dir = tempdir().unwrap();
        let results = TableLoader::load_tables(&dir.path().join("nope"));
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(TabulaError::FileError(_))));
    }
}
