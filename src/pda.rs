//! This module defines the `PushdownAutomaton` engine. Its transition relation is keyed by the
//! input symbol together with the symbol popped from the stack, and every failed lookup is
//! rolled back so the stack stays consistent when transitions are probed one by one.

use crate::analyzer::analyze_pda;
use crate::state::{StateId, States};
use crate::types::{AcceptancePolicy, AutomatonError, EMPTY_MARKER, STACK_BOTTOM};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

/// One entry of the transition relation: `((state, input, pop), (next, push))`.
///
/// `pop == None` matches only an empty stack and an empty `push` pushes nothing; both play
/// the role of the empty marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub state: String,
    pub input: String,
    #[serde(default, deserialize_with = "deserialize_pop")]
    pub pop: Option<String>,
    pub next: String,
    /// Symbols to push, written top first.
    #[serde(default, deserialize_with = "deserialize_push")]
    pub push: Vec<String>,
}

// A written `ϵ` is the empty marker, not a stack symbol.
fn deserialize_pop<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let pop = Option::<String>::deserialize(deserializer)?;
    Ok(pop.filter(|symbol| symbol != EMPTY_MARKER))
}

fn deserialize_push<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let push = Vec::<String>::deserialize(deserializer)?;
    Ok(push
        .into_iter()
        .filter(|symbol| symbol != EMPTY_MARKER)
        .collect())
}

impl Relation {
    pub fn new(state: &str, input: &str, pop: Option<&str>, next: &str, push: &[&str]) -> Self {
        Self {
            state: state.to_string(),
            input: input.to_string(),
            pop: pop.filter(|s| *s != EMPTY_MARKER).map(str::to_string),
            next: next.to_string(),
            push: push
                .iter()
                .filter(|s| **s != EMPTY_MARKER)
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let push = if self.push.is_empty() {
            EMPTY_MARKER.to_string()
        } else {
            self.push.join(" ")
        };
        write!(
            f,
            "(({}, {}, {}), ({}, [{}]))",
            self.state,
            self.input,
            self.pop.as_deref().unwrap_or(EMPTY_MARKER),
            self.next,
            push
        )
    }
}

/// The static description of a pushdown automaton.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdaSpec {
    #[serde(default)]
    pub name: String,
    pub states: Vec<String>,
    pub input_alphabet: Vec<String>,
    pub stack_alphabet: Vec<String>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    pub start: String,
    #[serde(default)]
    pub finals: Vec<String>,
    /// How acceptance is decided by `transition_all`.
    #[serde(default)]
    pub policy: AcceptancePolicy,
}

/// The stack of a pushdown automaton. The top is the last element of the underlying vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    symbols: Vec<String>,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Stack {
    /// Creates a stack holding only the bottom sentinel.
    pub fn new() -> Self {
        Self {
            symbols: vec![STACK_BOTTOM.to_string()],
        }
    }

    /// Removes the top symbol; `None` stands for the empty marker.
    pub fn pop(&mut self) -> Option<String> {
        self.symbols.pop()
    }

    pub fn push(&mut self, symbol: String) {
        self.symbols.push(symbol);
    }

    /// Pushes a sequence written top first, so `symbols[0]` ends up on top.
    pub fn push_all(&mut self, symbols: &[String]) {
        self.symbols.extend(symbols.iter().rev().cloned());
    }

    pub fn top(&self) -> Option<&str> {
        self.symbols.last().map(String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The stack contents, bottom first.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let top_first: Vec<&str> = self.symbols.iter().rev().map(String::as_str).collect();
        write!(f, "top -> {}", top_first.join(" "))
    }
}

type RelationKey = (String, Option<String>);

/// A pushdown automaton with a configurable acceptance policy.
#[derive(Debug, Clone)]
pub struct PushdownAutomaton {
    name: String,
    states: States<RelationKey, (StateId, Vec<String>)>,
    finals: HashSet<StateId>,
    start: StateId,
    current: StateId,
    stack: Stack,
    policy: AcceptancePolicy,
    verbose: bool,
}

impl PushdownAutomaton {
    /// Creates a new `PushdownAutomaton` from a specification, validating it first.
    ///
    /// The relation is split per source state so a step is a single keyed lookup.
    pub fn new(spec: PdaSpec) -> Result<Self, AutomatonError> {
        analyze_pda(&spec)?;

        let mut states = States::from_names(&spec.states);
        for relation in spec.relations {
            let source = states.require(&relation.state)?;
            let next = states.require(&relation.next)?;
            states
                .get_mut(source)
                .insert((relation.input, relation.pop), (next, relation.push));
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
            finals,
            start,
            current: start,
            stack: Stack::new(),
            policy: spec.policy,
            verbose: false,
        })
    }

    /// Enables or disables logging of every relation used and every missed lookup.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Tries to consume `symbol` from the current configuration.
    ///
    /// The top of the stack is popped first and looked up together with `symbol`. When no
    /// relation matches, the popped symbol is pushed back and `false` is returned.
    pub fn transition(&mut self, symbol: &str) -> bool {
        let key = (symbol.to_string(), self.stack.pop());

        let Some((next, push)) = self.states.get(self.current).get(&key) else {
            if self.verbose {
                warn!(
                    "State '{}' has no transition for input symbol '{}' and top stack symbol '{}', no changes were made",
                    self.states.name(self.current),
                    symbol,
                    key.1.as_deref().unwrap_or(EMPTY_MARKER)
                );
            }
            if let Some(top) = key.1 {
                self.stack.push(top);
            }
            return false;
        };

        let previous = self.current;
        self.current = *next;
        self.stack.push_all(push);

        if self.verbose {
            debug!(
                "Made transition using relation (({}, {}, {}), ({}, [{}]))",
                self.states.name(previous),
                symbol,
                key.1.as_deref().unwrap_or(EMPTY_MARKER),
                self.states.name(self.current),
                push.join(" ")
            );
            debug!(
                "State: '{}' | Stack: {}",
                self.states.name(self.current),
                self.stack
            );
        }

        true
    }

    /// Runs the automaton over the complete input and decides acceptance.
    ///
    /// Symbols without an applicable relation are skipped; the configuration they were met
    /// in carries over to the next symbol.
    pub fn transition_all<I>(&mut self, symbols: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for symbol in symbols {
            self.transition(symbol.as_ref());
        }

        self.is_accepted()
    }

    /// Applies the acceptance policy to the current configuration.
    pub fn is_accepted(&self) -> bool {
        match self.policy {
            AcceptancePolicy::FinalState => self.is_final(),
            AcceptancePolicy::EmptyStack => self.is_empty(),
        }
    }

    /// Checks whether the current state is a final state.
    pub fn is_final(&self) -> bool {
        self.finals.contains(&self.current)
    }

    /// Checks whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Restores the start state and a stack holding only the bottom sentinel.
    pub fn reset(&mut self) {
        self.current = self.start;
        self.stack = Stack::new();
    }

    pub fn state(&self) -> &str {
        self.states.name(self.current)
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn policy(&self) -> AcceptancePolicy {
        self.policy
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn states(&self) -> &States<RelationKey, (StateId, Vec<String>)> {
        &self.states
    }
}
