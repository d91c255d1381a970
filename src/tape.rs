//! The tape of a single-tape Turing machine. Cell 0 always holds the left endmarker, the tape
//! grows to the right on demand, and every read, write and move is recorded in an execution
//! trace.

use crate::types::{Direction, Fault, BLANK_SYMBOL, LEFT_ENDMARKER};
use std::fmt;

/// One recorded tape operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Read(String),
    Write(String),
    Move(Direction),
}

/// A tape with its head and execution trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<String>,
    head: usize,
    events: Vec<TraceEvent>,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Tape {
    /// Creates a tape holding the left endmarker followed by `input`, head on the endmarker.
    pub fn new<I>(input: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut cells = vec![LEFT_ENDMARKER.to_string()];
        cells.extend(input);

        Self {
            cells,
            head: 0,
            events: Vec::new(),
        }
    }

    /// Reads the symbol under the head.
    pub fn read(&mut self) -> &str {
        self.events
            .push(TraceEvent::Read(self.cells[self.head].clone()));
        &self.cells[self.head]
    }

    /// Writes `symbol` under the head. Cell 0 only accepts the left endmarker.
    pub fn write(&mut self, symbol: &str) -> Result<(), Fault> {
        if self.head == 0 && symbol != LEFT_ENDMARKER {
            return Err(Fault::EndmarkerOverwritten(symbol.to_string()));
        }

        self.events.push(TraceEvent::Write(symbol.to_string()));
        self.cells[self.head] = symbol.to_string();
        Ok(())
    }

    /// Moves the head one cell, extending the tape with a blank when it leaves the touched part.
    pub fn shift(&mut self, direction: Direction) -> Result<(), Fault> {
        match direction {
            Direction::Right => {
                if self.head == self.cells.len() - 1 {
                    self.cells.push(BLANK_SYMBOL.to_string());
                }
                self.head += 1;
            }
            Direction::Left => {
                if self.head == 0 {
                    return Err(Fault::FellOffTape);
                }
                self.head -= 1;
            }
        }

        self.events.push(TraceEvent::Move(direction));
        Ok(())
    }

    pub fn head(&self) -> usize {
        self.head
    }

    /// The finite part of the tape touched so far.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Renders the execution trace, e.g. `- ⊢ + ⊢ > - a + b >`.
    pub fn trace(&self) -> String {
        let mut trace = String::new();
        for event in &self.events {
            match event {
                TraceEvent::Read(symbol) => {
                    trace.push_str("- ");
                    trace.push_str(symbol);
                }
                TraceEvent::Write(symbol) => {
                    trace.push_str(" + ");
                    trace.push_str(symbol);
                }
                TraceEvent::Move(direction) => {
                    trace.push(' ');
                    trace.push_str(direction.token());
                    trace.push(' ');
                }
            }
        }

        match trace.strip_suffix(' ') {
            Some(stripped) => stripped.to_string(),
            None => trace,
        }
    }
}

impl fmt::Display for Tape {
    /// Two lines: the cells followed by an endless run of blanks, and a caret under the head.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cells = Vec::with_capacity(self.cells.len());
        let mut marks = Vec::with_capacity(self.cells.len());

        for (index, symbol) in self.cells.iter().enumerate() {
            cells.push(symbol.clone());
            if index == self.head {
                marks.push("^".to_string());
            } else {
                marks.push(" ".repeat(symbol.chars().count()));
            }
        }

        writeln!(
            f,
            "{} {b} {b} {b} ...",
            cells.join(" "),
            b = BLANK_SYMBOL
        )?;
        write!(f, "{}", marks.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_tape_starts_with_endmarker() {
        let tape = Tape::new(input(&["a", "b"]));

        assert_eq!(tape.cells(), &input(&[LEFT_ENDMARKER, "a", "b"])[..]);
        assert_eq!(tape.head(), 0);
        assert!(tape.events().is_empty());
    }

    #[test]
    fn test_right_move_extends_with_blank() {
        let mut tape = Tape::default();

        tape.shift(Direction::Right).unwrap();

        assert_eq!(tape.head(), 1);
        assert_eq!(tape.cells(), &input(&[LEFT_ENDMARKER, BLANK_SYMBOL])[..]);
    }

    #[test]
    fn test_left_move_off_tape() {
        let mut tape = Tape::new(input(&["a"]));

        assert_eq!(tape.shift(Direction::Left), Err(Fault::FellOffTape));
        assert_eq!(tape.head(), 0);
    }

    #[test]
    fn test_endmarker_cannot_be_overwritten() {
        let mut tape = Tape::new(input(&["a"]));

        assert_eq!(
            tape.write("a"),
            Err(Fault::EndmarkerOverwritten("a".to_string()))
        );
        assert_eq!(tape.cells()[0], LEFT_ENDMARKER);

        assert!(tape.write(LEFT_ENDMARKER).is_ok());
    }

    #[test]
    fn test_trace_rendering() {
        let mut tape = Tape::new(input(&["a"]));

        tape.read();
        tape.write(LEFT_ENDMARKER).unwrap();
        tape.shift(Direction::Right).unwrap();
        tape.read();
        tape.write("b").unwrap();
        tape.shift(Direction::Left).unwrap();

        assert_eq!(tape.trace(), "- ⊢ + ⊢ > - a + b <");
        assert_eq!(tape.events().len(), 6);
    }

    #[test]
    fn test_display() {
        let mut tape = Tape::new(input(&["a"]));
        tape.shift(Direction::Right).unwrap();

        assert_eq!(tape.to_string(), "⊢ a ⊔ ⊔ ⊔ ...\n  ^");
    }
}
