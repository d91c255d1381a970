//! This module defines the `FiniteAutomaton` engine: a deterministic finite automaton without
//! auxiliary memory, driven one input symbol at a time.

use crate::analyzer::analyze_fa;
use crate::state::{StateId, States};
use crate::types::AutomatonError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// The static description of a finite automaton.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaSpec {
    /// Human readable name of the automaton.
    #[serde(default)]
    pub name: String,
    /// The finite set of states.
    pub states: Vec<String>,
    /// The input alphabet.
    pub alphabet: Vec<String>,
    /// Sparse transition table: state -> input symbol -> successor state.
    #[serde(default)]
    pub transitions: HashMap<String, HashMap<String, String>>,
    /// The start state.
    pub start: String,
    /// The final states.
    #[serde(default)]
    pub finals: Vec<String>,
}

/// A deterministic finite automaton.
#[derive(Debug, Clone)]
pub struct FiniteAutomaton {
    name: String,
    states: States<String, StateId>,
    alphabet: Vec<String>,
    finals: HashSet<StateId>,
    start: StateId,
    current: StateId,
    verbose: bool,
}

impl FiniteAutomaton {
    /// Creates a new `FiniteAutomaton` from a specification, validating it first.
    ///
    /// # Returns
    ///
    /// * `Ok(FiniteAutomaton)` positioned at the start state.
    /// * `Err(AutomatonError::Validation)` if the specification is inconsistent.
    pub fn new(spec: FaSpec) -> Result<Self, AutomatonError> {
        analyze_fa(&spec)?;

        let mut states = States::from_names(&spec.states);
        for (source, table) in &spec.transitions {
            let id = states.require(source)?;
            for (symbol, target) in table {
                let target = states.require(target)?;
                states.get_mut(id).insert(symbol.clone(), target);
            }
        }

        let finals = spec
            .finals
            .iter()
            .map(|state| states.require(state))
            .collect::<Result<HashSet<_>, _>>()?;
        let start = states.require(&spec.start)?;

        Ok(Self {
            name: spec.name,
            states,
            alphabet: spec.alphabet,
            finals,
            start,
            current: start,
            verbose: false,
        })
    }

    /// Enables or disables diagnostics for transitions that do not exist.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Follows the transition for `symbol` from the current state.
    ///
    /// Returns `false` and leaves the state untouched if no such transition exists.
    pub fn transition(&mut self, symbol: &str) -> bool {
        match self.states.get(self.current).get(symbol) {
            Some(&next) => {
                if self.verbose {
                    debug!(
                        "{} --{}--> {}",
                        self.states.name(self.current),
                        symbol,
                        self.states.name(next)
                    );
                }
                self.current = next;
                true
            }
            None => {
                if self.verbose {
                    warn!(
                        "State '{}' has no transition for symbol '{}', transition could not be performed",
                        self.states.name(self.current),
                        symbol
                    );
                }
                false
            }
        }
    }

    /// Checks whether the current state is a final state.
    pub fn is_final(&self) -> bool {
        self.finals.contains(&self.current)
    }

    /// Returns to the start state.
    pub fn reset(&mut self) {
        self.current = self.start;
    }

    /// Returns the name of the current state.
    pub fn state(&self) -> &str {
        self.states.name(self.current)
    }

    pub fn start_state(&self) -> &str {
        self.states.name(self.start)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alphabet(&self) -> &[String] {
        &self.alphabet
    }

    pub fn states(&self) -> &States<String, StateId> {
        &self.states
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// START -open-> FD, FD -read/write-> FD, FD -close-> START, nothing else.
    fn create_file_io_spec() -> FaSpec {
        let mut transitions = HashMap::new();
        transitions.insert(
            "START".to_string(),
            HashMap::from([("open".to_string(), "FD".to_string())]),
        );
        transitions.insert(
            "FD".to_string(),
            HashMap::from([
                ("read".to_string(), "FD".to_string()),
                ("write".to_string(), "FD".to_string()),
                ("close".to_string(), "START".to_string()),
            ]),
        );

        FaSpec {
            name: "File IO".to_string(),
            states: strings(&["START", "FD"]),
            alphabet: strings(&["open", "read", "write", "close"]),
            transitions,
            start: "START".to_string(),
            finals: Vec::new(),
        }
    }

    #[test]
    fn test_fa_creation() {
        let fa = FiniteAutomaton::new(create_file_io_spec()).unwrap();

        assert_eq!(fa.state(), "START");
        assert_eq!(fa.name(), "File IO");
        assert_eq!(fa.states().transition_count(), 4);
        assert!(!fa.is_final());
    }

    #[test]
    fn test_proper_file_handling() {
        let mut fa = FiniteAutomaton::new(create_file_io_spec()).unwrap();

        let trace = ["open", "read", "write", "write", "close", "open", "close"];
        for symbol in trace {
            assert!(fa.transition(symbol), "transition on '{}' failed", symbol);
        }

        assert_eq!(fa.state(), "START");
        assert!(!fa.is_final());
    }

    #[test]
    fn test_undefined_transition_leaves_state() {
        let mut fa = FiniteAutomaton::new(create_file_io_spec()).unwrap();
        fa.set_verbose(true);

        assert!(fa.transition("open"));
        assert!(!fa.transition("open"));
        assert_eq!(fa.state(), "FD");

        assert!(!fa.transition("not-a-symbol"));
        assert_eq!(fa.state(), "FD");
    }

    #[test]
    fn test_final_and_reset() {
        let mut spec = create_file_io_spec();
        spec.finals = strings(&["FD"]);
        let mut fa = FiniteAutomaton::new(spec).unwrap();

        fa.transition("open");
        assert!(fa.is_final());

        fa.reset();
        fa.reset();
        assert_eq!(fa.state(), "START");
        assert!(!fa.is_final());
    }

    #[test]
    fn test_deterministic_replay() {
        let mut fa = FiniteAutomaton::new(create_file_io_spec()).unwrap();
        let trace = ["open", "close", "close", "open", "read"];

        let first: Vec<bool> = trace.iter().map(|s| fa.transition(s)).collect();
        let first_state = fa.state().to_string();

        fa.reset();
        let second: Vec<bool> = trace.iter().map(|s| fa.transition(s)).collect();

        assert_eq!(first, second);
        assert_eq!(first, vec![true, true, false, true, true]);
        assert_eq!(fa.state(), first_state);
    }

    #[test]
    fn test_invalid_spec_is_rejected() {
        let mut spec = create_file_io_spec();
        spec.start = "MISSING".to_string();

        assert!(matches!(
            FiniteAutomaton::new(spec),
            Err(AutomatonError::Validation(_))
        ));
    }

    #[test]
    fn test_spec_from_json() {
        let spec: FaSpec = serde_json::from_str(
            r#"{
                "states": ["even", "odd"],
                "alphabet": ["1"],
                "transitions": {"even": {"1": "odd"}, "odd": {"1": "even"}},
                "start": "even",
                "finals": ["even"]
            }"#,
        )
        .unwrap();
        let mut fa = FiniteAutomaton::new(spec).unwrap();

        fa.transition("1");
        fa.transition("1");
        assert!(fa.is_final());
    }
}
