//! A logically two-way-infinite tape backed by a lazily extended deque.

use crate::types::Symbol;
use std::collections::VecDeque;
use std::fmt;

/// The machine's tape.
///
/// Positions are logical and may be negative: position 0 is the first square of the
/// initial tape. Squares are materialised with the blank symbol when touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    squares: VecDeque<Symbol>,
    /// Number of squares materialised left of position 0.
    offset: usize,
    blank: Symbol,
}

impl Tape {
    pub fn new(content: &[Symbol], blank: impl Into<Symbol>) -> Self {
        Self {
            squares: content.iter().cloned().collect(),
            offset: 0,
            blank: blank.into(),
        }
    }

    pub fn blank(&self) -> &str {
        &self.blank
    }

    /// Leftmost materialised position.
    pub fn start(&self) -> isize {
        -(self.offset as isize)
    }

    /// One past the rightmost materialised position.
    pub fn end(&self) -> isize {
        self.start() + self.squares.len() as isize
    }

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    /// Materialises every square between the current ends and `position`.
    pub fn touch(&mut self, position: isize) {
        while position < self.start() {
            self.squares.push_front(self.blank.clone());
            self.offset += 1;
        }
        while position >= self.end() {
            self.squares.push_back(self.blank.clone());
        }
    }

    /// Reads the square at `position`, extending the tape if needed.
    pub fn read(&mut self, position: isize) -> &str {
        self.touch(position);
        &self.squares[self.index(position)]
    }

    /// Reads the square at `position` without extending the tape.
    pub fn peek(&self, position: isize) -> &str {
        if position < self.start() || position >= self.end() {
            return &self.blank;
        }
        &self.squares[self.index(position)]
    }

    /// Writes `symbol` at `position`, extending the tape if needed.
    pub fn write(&mut self, position: isize, symbol: impl Into<Symbol>) {
        self.touch(position);
        let index = self.index(position);
        self.squares[index] = symbol.into();
    }

    pub fn erase(&mut self, position: isize) {
        let blank = self.blank.clone();
        self.write(position, blank);
    }

    /// Iterates over the materialised squares from left to right.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.squares.iter()
    }

    fn index(&self, position: isize) -> usize {
        (position - self.start()) as usize
    }
}

/// Concatenates all squares in position order, without separators.
impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.squares.iter().try_for_each(|square| f.write_str(square))
    }
}
