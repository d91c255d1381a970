//! Trace checkers built on the engines: the file-I/O system call checker and the three-stage
//! pushdown verification of tokenized Turing machine traces.

use crate::fa::FiniteAutomaton;
use crate::pda::PushdownAutomaton;
use crate::programs::{MachineCatalog, TRACE_ENDMARKER, TRACE_POSITION, TRACE_STEPS};
use crate::types::AutomatonError;
use std::fmt;
use tracing::debug;

/// Checks that a sequence of system calls handles a single file properly.
///
/// The trace is proper when every call has a transition and the automaton does not end in a
/// final (error) state.
pub fn verify_file_io<S: AsRef<str>>(automaton: &mut FiniteAutomaton, trace: &[S]) -> bool {
    automaton.reset();

    for call in trace {
        if !automaton.transition(call.as_ref()) {
            return false;
        }
    }

    !automaton.is_final()
}

/// Outcome of verifying one tokenized trace. The first failing stage decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    /// The tokens do not form read, symbol, write, symbol, move steps.
    MalformedSteps,
    /// The head moves left of the left endmarker.
    LeavesTape,
    /// Something other than the left endmarker is written to cell 0.
    OverwritesEndmarker,
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        *self == Verdict::Valid
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Verdict::Valid => "valid",
            Verdict::MalformedSteps => "malformed steps",
            Verdict::LeavesTape => "head leaves the tape",
            Verdict::OverwritesEndmarker => "left endmarker overwritten",
        };
        write!(f, "{}", text)
    }
}

pub struct TraceVerifier {
    steps: PushdownAutomaton,
    position: PushdownAutomaton,
    endmarker: PushdownAutomaton,
}

impl TraceVerifier {
    /// Creates a verifier from the built-in `trace-steps`, `trace-position` and
    /// `trace-endmarker` automata.
    pub fn new() -> Result<Self, AutomatonError> {
        Ok(Self::from_parts(
            MachineCatalog::pda(TRACE_STEPS)?,
            MachineCatalog::pda(TRACE_POSITION)?,
            MachineCatalog::pda(TRACE_ENDMARKER)?,
        ))
    }

    pub fn from_parts(
        steps: PushdownAutomaton,
        position: PushdownAutomaton,
        endmarker: PushdownAutomaton,
    ) -> Self {
        Self {
            steps,
            position,
            endmarker,
        }
    }

    pub fn verify<S: AsRef<str>>(&mut self, tokens: &[S]) -> Verdict {
        if !self.verify_steps(tokens) {
            return Verdict::MalformedSteps;
        }

        self.position.reset();
        if !self.position.transition_all(tokens) {
            return Verdict::LeavesTape;
        }

        self.endmarker.reset();
        if !self.endmarker.transition_all(tokens) {
            return Verdict::OverwritesEndmarker;
        }

        Verdict::Valid
    }

    // Stops at the first token without a relation.
    fn verify_steps<S: AsRef<str>>(&mut self, tokens: &[S]) -> bool {
        self.steps.reset();

        for (index, token) in tokens.iter().enumerate() {
            if !self.steps.transition(token.as_ref()) {
                debug!("Step check failed at token {} ({})", index, token.as_ref());
                return false;
            }
        }

        self.steps.is_final()
    }

    /// Returns the indices of the traces that pass every stage, in input order.
    pub fn valid_traces<S: AsRef<str>>(&mut self, traces: &[Vec<S>]) -> Vec<usize> {
        traces
            .iter()
            .enumerate()
            .filter(|(_, tokens)| self.verify(tokens.as_slice()).is_valid())
            .map(|(index, _)| index)
            .collect()
    }
}
