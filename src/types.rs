//! This module defines the data types shared by the finite automaton, pushdown automaton and
//! Turing machine engines: reserved symbols, head directions, acceptance policies and the
//! error types reported at construction time and while running.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::analyzer::AnalysisError;

/// The blank symbol filling the unvisited part of a Turing machine tape.
pub const BLANK_SYMBOL: &str = "⊔";
/// The symbol permanently occupying the leftmost cell of a Turing machine tape.
pub const LEFT_ENDMARKER: &str = "⊢";
/// The sentinel a pushdown automaton's stack starts with.
pub const STACK_BOTTOM: &str = "⊥";
/// Printable form of the empty marker (no stack symbol / nothing pushed).
pub const EMPTY_MARKER: &str = "ϵ";
/// Number of steps a Turing machine may take before it is assumed not to halt.
pub const DEFAULT_MAX_STEPS: usize = 1000;

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    #[serde(alias = "L", alias = "<")]
    Left,
    /// Move the head one position to the right.
    #[serde(alias = "R", alias = ">")]
    Right,
}

impl Direction {
    /// The token used for this movement in an execution trace.
    pub fn token(self) -> &'static str {
        match self {
            Direction::Left => "<",
            Direction::Right => ">",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "L"),
            Direction::Right => write!(f, "R"),
        }
    }
}

/// Decides whether a pushdown automaton accepts once its whole input is consumed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptancePolicy {
    /// Accept iff the current state is a final state.
    #[default]
    FinalState,
    /// Accept iff the stack is empty.
    EmptyStack,
}

/// Coarse category of an error, used as the prefix of every diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    State,
    Transition,
    Tape,
    Input,
    Logic,
    Machine,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::State => "StateError",
            ErrorKind::Transition => "TransitionError",
            ErrorKind::Tape => "TapeError",
            ErrorKind::Input => "InputError",
            ErrorKind::Logic => "LogicError",
            ErrorKind::Machine => "MachineError",
        };
        f.write_str(name)
    }
}

/// An unrecoverable fault of a running Turing machine.
///
/// Faults describe bugs in the simulated machine rather than rejected input. Once a
/// machine faults it stays faulted until it is reset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("InputError: the machine has no input, call set_input first")]
    NoInput,
    #[error("InputError: input symbol '{0}' not in the input alphabet")]
    InvalidInput(String),
    #[error(
        "LogicError: the machine has taken more than {0} steps without entering the accept or \
         reject state, it is unlikely to halt"
    )]
    NonHalting(usize),
    #[error(
        "MachineError: state '{state}' has no transition for tape symbol '{symbol}', the machine \
         has stalled"
    )]
    Stalled { state: String, symbol: String },
    #[error("TapeError: the machine tried to overwrite the left endmarker with '{0}'")]
    EndmarkerOverwritten(String),
    #[error("TapeError: the head moved off the left end of the tape")]
    FellOffTape,
    #[error("MachineError: the run stopped in state '{0}', which is neither accepting nor rejecting")]
    Undecided(String),
}

impl Fault {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Fault::NoInput | Fault::InvalidInput(_) => ErrorKind::Input,
            Fault::NonHalting(_) => ErrorKind::Logic,
            Fault::EndmarkerOverwritten(_) | Fault::FellOffTape => ErrorKind::Tape,
            Fault::Stalled { .. } | Fault::Undecided(_) => ErrorKind::Machine,
        }
    }
}

/// Represents the errors reported by the engines and the tooling built on them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    /// The static description of a machine violates one or more invariants.
    #[error("Invalid machine specification: {}", describe(.0))]
    Validation(Vec<AnalysisError>),
    /// A Turing machine faulted while running.
    #[error(transparent)]
    Fault(#[from] Fault),
    /// The trace lexer met a character no token starts with.
    #[error("InputError: unexpected character {0:?} at offset {1}")]
    UnexpectedCharacter(char, usize),
    /// A machine definition could not be deserialized.
    #[error("Definition parsing error: {0}")]
    ParseError(String),
    /// A machine definition was requested as the wrong kind of engine.
    #[error("Machine '{name}' is a {found}, not a {expected}")]
    KindMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Machine '{0}' not found")]
    NotFound(String),
    /// Indicates an error related to file system operations, such as reading trace files.
    #[error("File error: {0}")]
    FileError(String),
}

impl AutomatonError {
    /// The categories of the violated invariants, or of the fault.
    pub fn kinds(&self) -> Vec<ErrorKind> {
        match self {
            AutomatonError::Validation(errors) => errors.iter().map(AnalysisError::kind).collect(),
            AutomatonError::Fault(fault) => vec![fault.kind()],
            AutomatonError::UnexpectedCharacter(..) => vec![ErrorKind::Input],
            _ => Vec::new(),
        }
    }
}

fn describe(errors: &[AnalysisError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
