//! This crate provides simulation engines for three abstract machines: deterministic finite
//! automata, pushdown automata and single-tape Turing machines. On top of the engines it offers
//! tooling for Turing machine execution traces: a lexer, a pushdown verification pipeline and
//! input/output extraction, plus a catalog of built-in machine definitions.

pub mod analyzer;
pub mod fa;
pub mod lexer;
pub mod loader;
pub mod machine;
pub mod pda;
pub mod programs;
pub mod reverse;
pub mod state;
pub mod tape;
pub mod types;
pub mod verifier;

/// Re-exports the validation entry points and `AnalysisError` from the analyzer module.
pub use analyzer::{analyze_fa, analyze_pda, analyze_tm, AnalysisError};
pub use fa::{FaSpec, FiniteAutomaton};
pub use lexer::{CharClass, Lexeme, TraceLexer};
/// Re-exports the `Loader` struct from the loader module.
pub use loader::Loader;
pub use machine::{Status, TmRule, TmSpec, TuringMachine};
pub use pda::{PdaSpec, PushdownAutomaton, Relation, Stack};
/// Re-exports the built-in machine catalog.
pub use programs::{Definition, MachineCatalog, MachineInfo, DEFINITIONS};
pub use reverse::{extract_input, extract_output};
pub use tape::{Tape, TraceEvent};
/// Re-exports shared constants and error types from the types module.
pub use types::{
    AcceptancePolicy, AutomatonError, Direction, ErrorKind, Fault, BLANK_SYMBOL,
    DEFAULT_MAX_STEPS, EMPTY_MARKER, LEFT_ENDMARKER, STACK_BOTTOM,
};
pub use verifier::{verify_file_io, TraceVerifier, Verdict};
