//! This module defines the `Machine` struct, which executes a flat transition table
//! against a two-way-unbounded tape. It handles the machine's state, the scanned square,
//! symbol matching and the application of operation sequences.

use crate::tape::Tape;
use crate::types::{Operation, Row, Step, Symbol, TabulaError, Table, MAX_EXECUTION_STEPS};

/// Represents a table-driven tape machine.
///
/// This struct encapsulates the current state, the tape, the scanned square and the
/// halted flag, together with the (read-only) table driving the machine.
#[derive(Debug, Clone)]
pub struct Machine {
    state: String,
    tape: Tape,
    head: isize,
    halted: bool,
    table: Table,
    step_count: usize,
}

impl Machine {
    /// Creates a new `Machine` from a flat `Table`.
    ///
    /// The machine starts in the table's starting state, or in the state of its first row
    /// when no starting state is given, scanning position 0 of the initial tape.
    ///
    /// # Returns
    ///
    /// * `Err(TabulaError::ValidationError)` if the table has neither rows nor a starting state.
    pub fn new(table: Table) -> Result<Self, TabulaError> {
        let state = table
            .starting_state()
            .ok_or_else(|| {
                TabulaError::ValidationError(
                    "Table has no rows and no starting state".to_string(),
                )
            })?
            .to_string();

        Ok(Self {
            state,
            tape: Tape::new(&table.tape, table.blank.clone()),
            head: 0,
            halted: false,
            table,
            step_count: 0,
        })
    }

    /// Executes a single step of the machine's computation.
    ///
    /// The first row of the current state matching the scanned symbol fires: its operations
    /// are applied in order and the machine moves to the row's final state.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a row fired.
    /// * `Step::Halt` if no row matched. The machine stays halted and later steps are no-ops.
    pub fn step(&mut self) -> Step {
        if self.halted {
            return Step::Halt;
        }

        self.tape.touch(self.head);

        let row = match self.transition().cloned() {
            Some(row) => row,
            None => {
                log::trace!(
                    "halted in state {:?} scanning {:?}",
                    self.state,
                    self.tape.peek(self.head)
                );
                self.halted = true;
                return Step::Halt;
            }
        };

        for operation in &row.operations {
            self.perform(operation);
        }

        self.state = row.final_state;
        self.step_count += 1;

        log::trace!("{:>6}: {}", self.step_count, self.complete_configuration());

        Step::Continue
    }

    /// Runs the machine for at most `steps` steps.
    ///
    /// # Returns
    ///
    /// The number of steps actually executed. A value lower than `steps` means the machine halted.
    pub fn run(&mut self, steps: usize) -> usize {
        let mut executed = 0;
        while executed < steps {
            if self.step() == Step::Halt {
                break;
            }
            executed += 1;
        }
        executed
    }

    /// Runs the machine until it halts or reaches `MAX_EXECUTION_STEPS`.
    pub fn run_to_halt(&mut self) -> Step {
        self.run(MAX_EXECUTION_STEPS);
        if self.halted {
            Step::Halt
        } else {
            Step::Continue
        }
    }

    /// Applies one operation at the scanned square.
    fn perform(&mut self, operation: &Operation) {
        self.tape.touch(self.head);
        match operation {
            Operation::Right => self.head += 1,
            Operation::Left => self.head -= 1,
            Operation::Erase => self.tape.erase(self.head),
            Operation::Print(symbol) => self.tape.write(self.head, symbol.as_str()),
        }
    }

    /// Finds the row that fires next, if any.
    ///
    /// Rows of the current state are scanned in table order and the first one matching the
    /// scanned symbol wins, so ambiguous tables resolve deterministically.
    pub fn transition(&self) -> Option<&Row> {
        let scanned = self.scanned();
        let blank = self.tape.blank();

        self.table
            .rows
            .iter()
            .filter(|row| row.state == self.state)
            .find(|row| row.matches(scanned, blank))
    }

    /// Returns the symbol on the scanned square.
    pub fn scanned(&self) -> &str {
        self.tape.peek(self.head)
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the position of the scanned square. It may be negative.
    pub fn head(&self) -> isize {
        self.head
    }

    /// Checks if the machine has halted.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Returns the total number of steps executed.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the tape as a string, concatenating all squares without separators.
    pub fn tape_string(&self) -> String {
        self.tape.to_string()
    }

    /// Returns the complete configuration: the tape with the current state name written
    /// immediately before the scanned square.
    ///
    /// For the tape `ee0 0` scanned at position 2 in state `o` this is `eeo0 0`.
    pub fn complete_configuration(&self) -> String {
        let mut configuration = String::new();

        if self.head < self.tape.start() {
            configuration.push_str(&self.state);
        }

        for (position, square) in (self.tape.start()..).zip(self.tape.symbols()) {
            if position == self.head {
                configuration.push_str(&self.state);
            }
            configuration.push_str(square);
        }

        if self.head >= self.tape.end() {
            configuration.push_str(&self.state);
        }

        configuration
    }

    /// Replaces the tape content and moves the head back to position 0.
    pub fn set_tape(&mut self, content: &[Symbol]) {
        self.tape = Tape::new(content, self.table.blank.clone());
        self.head = 0;
    }

    /// Resets the machine to its initial configuration.
    pub fn reset(&mut self) {
        self.state = self
            .table
            .starting_state()
            .map(str::to_string)
            .unwrap_or_default();
        self.tape = Tape::new(&self.table.tape, self.table.blank.clone());
        self.head = 0;
        self.halted = false;
        self.step_count = 0;
    }
}
