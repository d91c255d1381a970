//! This module defines the `TuringMachine` struct, which simulates a single-tape Turing machine
//! with explicit accept and reject states. It handles input loading, single steps, runs to
//! completion and the faults a badly designed machine can run into.

use crate::analyzer::analyze_tm;
use crate::state::{StateId, States};
use crate::tape::Tape;
use crate::types::{AutomatonError, Direction, Fault, DEFAULT_MAX_STEPS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

/// A single transition rule: in `state` reading `read`, write `write`, move, enter `next`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmRule {
    pub state: String,
    pub read: String,
    pub next: String,
    pub write: String,
    pub direction: Direction,
}

impl TmRule {
    pub fn new(state: &str, read: &str, next: &str, write: &str, direction: Direction) -> Self {
        Self {
            state: state.to_string(),
            read: read.to_string(),
            next: next.to_string(),
            write: write.to_string(),
            direction,
        }
    }
}

impl fmt::Display for TmRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(({}, {}), ({}, {}, {}))",
            self.state, self.read, self.next, self.write, self.direction
        )
    }
}

fn default_max_steps() -> usize {
    DEFAULT_MAX_STEPS
}

/// The static description of a Turing machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmSpec {
    #[serde(default)]
    pub name: String,
    pub states: Vec<String>,
    pub input_alphabet: Vec<String>,
    /// Must contain the blank and the left endmarker, and every input symbol.
    pub tape_alphabet: Vec<String>,
    #[serde(default)]
    pub transitions: Vec<TmRule>,
    pub start: String,
    pub accept: String,
    pub reject: String,
    /// Steps allowed before the machine is assumed not to halt.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

/// Where a Turing machine stands in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Accepted,
    Rejected,
    /// A fault stopped the run; only a reset or new input clears it.
    Faulted,
}

/// A single-tape Turing machine.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    name: String,
    states: States<String, (StateId, String, Direction)>,
    input_alphabet: HashSet<String>,
    start: StateId,
    accept: StateId,
    reject: StateId,
    current: StateId,
    tape: Tape,
    input: Option<Vec<String>>,
    step_count: usize,
    max_steps: usize,
    fault: Option<Fault>,
    verbose: bool,
}

impl TuringMachine {
    /// Creates a new `TuringMachine` from a specification, validating it first.
    ///
    /// The machine starts without input; call [`TuringMachine::set_input`] before stepping.
    pub fn new(spec: TmSpec) -> Result<Self, AutomatonError> {
        analyze_tm(&spec)?;

        let mut states = States::from_names(&spec.states);
        for rule in spec.transitions {
            let source = states.require(&rule.state)?;
            let next = states.require(&rule.next)?;
            states
                .get_mut(source)
                .insert(rule.read, (next, rule.write, rule.direction));
        }

        let start = states.require(&spec.start)?;
        let accept = states.require(&spec.accept)?;
        let reject = states.require(&spec.reject)?;

        Ok(Self {
            name: spec.name,
            states,
            input_alphabet: spec.input_alphabet.into_iter().collect(),
            start,
            accept,
            reject,
            current: start,
            tape: Tape::default(),
            input: None,
            step_count: 0,
            max_steps: spec.max_steps,
            fault: None,
            verbose: false,
        })
    }

    /// Enables or disables logging of every step and of steps attempted after halting.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Validates `input` (one symbol per character), stores it and resets the machine.
    pub fn set_input(&mut self, input: &str) -> Result<(), Fault> {
        let symbols: Vec<String> = input.chars().map(String::from).collect();

        if let Some(invalid) = symbols.iter().find(|s| !self.input_alphabet.contains(*s)) {
            return Err(Fault::InvalidInput(invalid.clone()));
        }

        self.input = Some(symbols);
        self.reset();

        if self.verbose {
            debug!("Input specified: {}", input);
            debug!("New tape:\n{}", self.tape);
        }

        Ok(())
    }

    /// Resets the state, the tape (to the current input), the step count and any fault.
    pub fn reset(&mut self) {
        self.tape = Tape::new(self.input.clone().unwrap_or_default());
        self.current = self.start;
        self.step_count = 0;
        self.fault = None;
    }

    /// Executes a single step.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if a transition was taken.
    /// * `Ok(false)` if the machine had already accepted or rejected; nothing changes.
    /// * `Err(Fault)` if the machine has no input, exceeded its step bound, stalled, tried to
    ///   overwrite the left endmarker or moved off the tape. The fault sticks until reset.
    pub fn transition(&mut self) -> Result<bool, Fault> {
        if self.input.is_none() {
            return Err(Fault::NoInput);
        }

        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        if self.has_halted() {
            if self.verbose {
                warn!(
                    "The machine has already entered the {} state, no transition was made",
                    if self.current == self.accept {
                        "accept"
                    } else {
                        "reject"
                    }
                );
            }
            return Ok(false);
        }

        self.step().map(|()| true).map_err(|fault| {
            self.fault = Some(fault.clone());
            fault
        })
    }

    fn step(&mut self) -> Result<(), Fault> {
        if self.step_count > self.max_steps {
            return Err(Fault::NonHalting(self.max_steps));
        }

        let symbol = self.tape.read().to_string();
        let state = self.states.get(self.current);
        let (next, write, direction) =
            state
                .get(symbol.as_str())
                .cloned()
                .ok_or_else(|| Fault::Stalled {
                    state: state.name().to_string(),
                    symbol: symbol.clone(),
                })?;

        self.tape.write(&write)?;
        self.tape.shift(direction)?;

        if self.verbose {
            debug!(
                "Made transition using (({}, {}), ({}, {}, {}))",
                self.states.name(self.current),
                symbol,
                self.states.name(next),
                write,
                direction
            );
            debug!("New tape:\n{}", self.tape);
        }

        self.current = next;
        self.step_count += 1;

        Ok(())
    }

    /// Steps until the machine accepts or rejects.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if the input was accepted, `Ok(false)` if it was rejected.
    /// * `Err(Fault)` if any step faulted.
    pub fn transition_all(&mut self) -> Result<bool, Fault> {
        while self.transition()? {}

        match self.status() {
            Status::Accepted => Ok(true),
            Status::Rejected => Ok(false),
            _ => Err(Fault::Undecided(self.state().to_string())),
        }
    }

    /// Checks whether the machine is in its accept or reject state.
    pub fn has_halted(&self) -> bool {
        self.current == self.accept || self.current == self.reject
    }

    pub fn status(&self) -> Status {
        if self.fault.is_some() {
            Status::Faulted
        } else if self.current == self.accept {
            Status::Accepted
        } else if self.current == self.reject {
            Status::Rejected
        } else {
            Status::Running
        }
    }

    /// Returns the fault that stopped the run, if any.
    pub fn fault(&self) -> Option<&Fault> {
        self.fault.as_ref()
    }

    /// The execution trace so far, without its trailing separator.
    pub fn execution_trace(&self) -> String {
        self.tape.trace()
    }

    /// The finite part of the tape touched so far; everything to its right is blank.
    pub fn tape_contents(&self) -> &[String] {
        self.tape.cells()
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn head(&self) -> usize {
        self.tape.head()
    }

    /// Returns the name of the current state.
    pub fn state(&self) -> &str {
        self.states.name(self.current)
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn states(&self) -> &States<String, (StateId, String, Direction)> {
        &self.states
    }
}
