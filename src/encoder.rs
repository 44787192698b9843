//! This module converts canonical rows to and from their standard description (S.D.) and
//! description number (D.N.).
//!
//! Every canonical row `(q<n>, S<s>) -> (P S<p>, M, q<f>)` is written as
//! `;D A^n D C^s D C^p M D A^f`, where `M` is one of `L`, `R` or `N`. The description number
//! replaces `A C D L R N ;` with the digits `1` to `7`.

use crate::types::{
    Direction, Operation, Row, SymbolPattern, TabulaError, Table, STATE_PREFIX, SYMBOL_PREFIX,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

const STATE_MARK: char = 'A';
const SYMBOL_MARK: char = 'C';
const DELIMITER: char = 'D';
const SEPARATOR: char = ';';

lazy_static! {
    static ref STANDARD_DESCRIPTION: Regex = Regex::new(r"^(?:;DA+DC*DC*[LRN]DA+)+$").unwrap();
    static ref DESCRIPTION_NUMBER: Regex = Regex::new(r"^(?:731+32*32*[456]31+)+$").unwrap();
}

/// A row of a canonical table, by index: in state `q<state>` scanning `S<symbol>`, print
/// `S<print>`, move, then go to `q<final_state>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StandardRow {
    pub state: usize,
    pub symbol: usize,
    pub print: usize,
    pub movement: Direction,
    pub final_state: usize,
}

impl StandardRow {
    /// Converts this row into a runnable row of `q<n>` states and `S<k>` symbols.
    pub fn to_row(&self) -> Row {
        let mut operations = vec![Operation::Print(symbol_name(self.print))];
        operations.extend(self.movement.operation());

        Row {
            state: state_name(self.state),
            symbols: vec![SymbolPattern::Symbol(symbol_name(self.symbol))],
            operations,
            final_state: state_name(self.final_state),
        }
    }
}

/// A standard description such as `;DADDCRDAA`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StandardDescription(String);

/// A description number such as `731332531`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DescriptionNumber(String);

impl StandardDescription {
    /// Wraps `description` after checking it against the standard grammar.
    pub fn parse(description: &str) -> Result<Self, TabulaError> {
        if !STANDARD_DESCRIPTION.is_match(description) {
            return Err(TabulaError::MalformedStandardDescription(
                description.to_string(),
            ));
        }
        Ok(Self(description.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reads the canonical rows back out of the description.
    pub fn rows(&self) -> Result<Vec<StandardRow>, TabulaError> {
        self.0
            .split(SEPARATOR)
            .skip(1)
            .map(|record| self.parse_record(record))
            .collect()
    }

    /// Parses one record, without its leading separator: `D A^n D C^s D C^p M D A^f`.
    fn parse_record(&self, record: &str) -> Result<StandardRow, TabulaError> {
        let malformed = || TabulaError::MalformedStandardDescription(self.0.clone());

        let fields: Vec<&str> = record.split(DELIMITER).collect();
        let [_, state, symbol, print_and_move, final_state] = fields.as_slice() else {
            return Err(malformed());
        };

        let (print, movement) = match print_and_move.char_indices().last() {
            Some((i, 'L')) => (&print_and_move[..i], Direction::Left),
            Some((i, 'R')) => (&print_and_move[..i], Direction::Right),
            Some((i, 'N')) => (&print_and_move[..i], Direction::Stay),
            _ => return Err(malformed()),
        };

        Ok(StandardRow {
            state: count(state, STATE_MARK).ok_or_else(malformed)?,
            symbol: count(symbol, SYMBOL_MARK).ok_or_else(malformed)?,
            print: count(print, SYMBOL_MARK).ok_or_else(malformed)?,
            movement,
            final_state: count(final_state, STATE_MARK).ok_or_else(malformed)?,
        })
    }
}

impl DescriptionNumber {
    /// Wraps `number` after checking it against the description number grammar.
    pub fn parse(number: &str) -> Result<Self, TabulaError> {
        if !DESCRIPTION_NUMBER.is_match(number) {
            return Err(TabulaError::MalformedDescriptionNumber(number.to_string()));
        }
        Ok(Self(number.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StandardDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DescriptionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StandardDescription {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DescriptionNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns the length of `field` if it consists only of `mark`.
fn count(field: &str, mark: char) -> Option<usize> {
    field.chars().all(|c| c == mark).then_some(field.len())
}

fn state_name(index: usize) -> String {
    format!("{STATE_PREFIX}{index}")
}

fn symbol_name(index: usize) -> String {
    format!("{SYMBOL_PREFIX}{index}")
}

/// Serializes canonical rows into their standard description.
///
/// Every record starts with `;`, so the first row is prefixed as well.
pub fn standard_description(rows: &[StandardRow]) -> StandardDescription {
    let mut description = String::new();

    for row in rows {
        description.push(SEPARATOR);
        description.push(DELIMITER);
        description.extend(std::iter::repeat(STATE_MARK).take(row.state));
        description.push(DELIMITER);
        description.extend(std::iter::repeat(SYMBOL_MARK).take(row.symbol));
        description.push(DELIMITER);
        description.extend(std::iter::repeat(SYMBOL_MARK).take(row.print));
        description.push(match row.movement {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'N',
        });
        description.push(DELIMITER);
        description.extend(std::iter::repeat(STATE_MARK).take(row.final_state));
    }

    StandardDescription(description)
}

/// Converts a standard description into its description number.
pub fn description_number(description: &StandardDescription) -> DescriptionNumber {
    let digits = description
        .0
        .chars()
        .filter_map(|c| match c {
            'A' => Some('1'),
            'C' => Some('2'),
            'D' => Some('3'),
            'L' => Some('4'),
            'R' => Some('5'),
            'N' => Some('6'),
            ';' => Some('7'),
            _ => None,
        })
        .collect();

    DescriptionNumber(digits)
}

/// Converts a description number back into its standard description.
pub fn standard_description_of(number: &DescriptionNumber) -> Result<StandardDescription, TabulaError> {
    let malformed = || TabulaError::MalformedDescriptionNumber(number.0.clone());

    let description = number
        .0
        .chars()
        .map(|c| match c {
            '1' => Ok('A'),
            '2' => Ok('C'),
            '3' => Ok('D'),
            '4' => Ok('L'),
            '5' => Ok('R'),
            '6' => Ok('N'),
            '7' => Ok(';'),
            _ => Err(malformed()),
        })
        .collect::<Result<String, _>>()?;

    StandardDescription::parse(&description).map_err(|_| malformed())
}

/// Decodes a description number into canonical rows.
///
/// # Returns
///
/// * `Ok(Vec<StandardRow>)` in record order.
/// * `Err(TabulaError::MalformedDescriptionNumber)` if `number` does not follow the grammar.
///   Nothing is reconstructed in that case.
pub fn decode(number: &DescriptionNumber) -> Result<Vec<StandardRow>, TabulaError> {
    if !DESCRIPTION_NUMBER.is_match(&number.0) {
        return Err(TabulaError::MalformedDescriptionNumber(number.0.clone()));
    }
    standard_description_of(number)?.rows()
}

impl Table {
    /// Builds a runnable canonical table from standard rows.
    ///
    /// The blank is `S0` and the vocabulary runs from `S1` up to the highest symbol index
    /// used by any row.
    pub fn from_standard_rows(rows: &[StandardRow]) -> Table {
        let widest = rows
            .iter()
            .map(|row| row.symbol.max(row.print))
            .max()
            .unwrap_or(0);

        Table::new(rows.iter().map(StandardRow::to_row).collect())
            .with_symbols((1..=widest).map(symbol_name))
            .with_blank(symbol_name(0))
    }

    /// Decodes a description number into a runnable canonical table.
    pub fn from_description_number(number: &str) -> Result<Table, TabulaError> {
        let rows = decode(&DescriptionNumber::parse(number)?)?;
        log::debug!("decoded {} canonical rows", rows.len());
        Ok(Table::from_standard_rows(&rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::Machine;

    const ALTERNATING_SD: &str = ";DADDCRDAA;DAADDRDAAA;DAAADDCCRDAAAA;DAAAADDRDA";
    const ALTERNATING_DN: &str = "73133253117311335311173111332253111173111133531";

    fn alternating_rows() -> Vec<StandardRow> {
        let row = |state, print, final_state| StandardRow {
            state,
            symbol: 0,
            print,
            movement: Direction::Right,
            final_state,
        };
        vec![row(1, 1, 2), row(2, 0, 3), row(3, 2, 4), row(4, 0, 1)]
    }

    #[test]
    fn test_standard_description() {
        let description = standard_description(&alternating_rows());
        assert_eq!(description.as_str(), ALTERNATING_SD);
    }

    #[test]
    fn test_description_number() {
        let description = standard_description(&alternating_rows());
        assert_eq!(description_number(&description).as_str(), ALTERNATING_DN);
    }

    #[test]
    fn test_decode() {
        let number = DescriptionNumber::parse(ALTERNATING_DN).unwrap();
        assert_eq!(decode(&number).unwrap(), alternating_rows());
    }

    #[test]
    fn test_decode_then_encode_is_identity() {
        for number in [ALTERNATING_DN, "731332531", "7313325311731133243117311133263111"] {
            let parsed = DescriptionNumber::parse(number).unwrap();
            let rows = decode(&parsed).unwrap();
            let description = standard_description(&rows);
            assert_eq!(description_number(&description), parsed);
        }
    }

    #[test]
    fn test_decode_left_and_stay_moves() {
        let number = DescriptionNumber::parse("7313325311731133243117311133263111").unwrap();
        let rows = decode(&number).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].movement, Direction::Left);
        assert_eq!(rows[2].movement, Direction::Stay);
        assert_eq!(rows[2].final_state, 3);
    }

    #[test]
    fn test_decode_rejects_missing_final_separator() {
        let number = "73133253117311332411731113326311";
        let malformed = TabulaError::MalformedDescriptionNumber(number.to_string());

        assert_eq!(DescriptionNumber::parse(number), Err(malformed.clone()));
        assert_eq!(decode(&DescriptionNumber(number.to_string())), Err(malformed));
        assert!(Table::from_description_number(number).is_err());
    }

    #[test]
    fn test_malformed_description_number() {
        for number in ["1", "", "7313325", "731332531x", "8", "7313325317"] {
            assert_eq!(
                DescriptionNumber::parse(number),
                Err(TabulaError::MalformedDescriptionNumber(number.to_string()))
            );
        }
    }

    #[test]
    fn test_malformed_standard_description() {
        assert!(StandardDescription::parse(";DADDCR").is_err());
        assert!(StandardDescription::parse("DADDCRDA").is_err());
        assert!(StandardDescription::parse(ALTERNATING_SD).is_ok());
    }

    #[test]
    fn test_standard_description_rows() {
        let description = StandardDescription::parse(";DAADCCDCLDAAA").unwrap();
        assert_eq!(
            description.rows().unwrap(),
            vec![StandardRow {
                state: 2,
                symbol: 2,
                print: 1,
                movement: Direction::Left,
                final_state: 3,
            }]
        );
    }

    #[test]
    fn test_from_standard_rows() {
        let table = Table::from_standard_rows(&alternating_rows());
        assert_eq!(table.blank, "S0");
        assert_eq!(table.symbols, vec!["S1", "S2"]);
        assert_eq!(
            table.rows[0],
            Row::parse("q1", &["S0"], &["PS1", "R"], "q2").unwrap()
        );
    }

    #[test]
    fn test_stay_has_no_move() {
        let row = StandardRow {
            state: 1,
            symbol: 1,
            print: 1,
            movement: Direction::Stay,
            final_state: 1,
        };
        assert_eq!(row.to_row().operations, vec![Operation::print("S1")]);
    }

    #[test]
    fn test_run_decoded_machine() {
        let table = Table::from_description_number("731332531").unwrap();
        let mut machine = Machine::new(table).unwrap();
        assert_eq!(machine.run(100), 100);
        assert!(machine.tape_string().starts_with("S1S1S1S1S1S1S1"));
    }

    #[test]
    fn test_reject_before_decoding() {
        assert_eq!(
            Table::from_description_number("1"),
            Err(TabulaError::MalformedDescriptionNumber("1".to_string()))
        );
    }
}
