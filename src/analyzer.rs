//! This module validates machine specifications before an engine is built from them. Every
//! check runs, and all violations are reported together so a broken definition can be fixed
//! in one pass.

use crate::fa::FaSpec;
use crate::machine::TmSpec;
use crate::pda::PdaSpec;
use crate::types::{AutomatonError, ErrorKind, BLANK_SYMBOL, EMPTY_MARKER, LEFT_ENDMARKER};
use std::collections::HashSet;
use thiserror::Error;

/// Represents the invariant violations that can be found in a machine specification.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum AnalysisError {
    /// The state set lists a state more than once.
    #[error("StateError: Q contains duplicates: {0:?}")]
    DuplicateStates(Vec<String>),
    /// A designated state (start, final, accept, reject) is not in the state set.
    #[error("StateError: {role} state(s) {states:?} not in Q")]
    UnknownStates {
        role: &'static str,
        states: Vec<String>,
    },
    /// Transitions leave from or lead to states that are not in the state set.
    #[error("TransitionError: transitions reference states not in Q: {0:?}")]
    UndefinedStates(Vec<String>),
    /// Transitions use symbols outside of the alphabet they must come from.
    #[error("TransitionError: symbols not in the {alphabet}: {symbols:?}")]
    UnknownSymbols {
        alphabet: &'static str,
        symbols: Vec<String>,
    },
    /// Two transitions share a left-hand side, so the machine would not be deterministic.
    #[error("TransitionError: conflicting transitions for {0:?}")]
    ConflictingTransitions(Vec<String>),
    /// The tape alphabet lacks a symbol every Turing machine relies on.
    #[error("MachineError: {role} '{symbol}' should be an element of the tape alphabet")]
    MissingTapeSymbol {
        role: &'static str,
        symbol: &'static str,
    },
    /// The input alphabet is not a subset of the tape alphabet.
    #[error("MachineError: the tape alphabet does not contain input symbols {0:?}")]
    InputNotInTapeAlphabet(Vec<String>),
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::DuplicateStates(_) | AnalysisError::UnknownStates { .. } => {
                ErrorKind::State
            }
            AnalysisError::UndefinedStates(_)
            | AnalysisError::UnknownSymbols { .. }
            | AnalysisError::ConflictingTransitions(_) => ErrorKind::Transition,
            AnalysisError::MissingTapeSymbol { .. } | AnalysisError::InputNotInTapeAlphabet(_) => {
                ErrorKind::Machine
            }
        }
    }
}

impl From<AnalysisError> for AutomatonError {
    fn from(error: AnalysisError) -> Self {
        AutomatonError::Validation(vec![error])
    }
}

type Check<T> = fn(&T) -> Result<(), AnalysisError>;

/// Runs every check against `spec` and gathers the violations.
fn run_checks<T>(spec: &T, checks: &[Check<T>]) -> Result<(), AutomatonError> {
    let errors = checks
        .iter()
        .filter_map(|check| check(spec).err())
        .collect::<Vec<_>>();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AutomatonError::Validation(errors))
    }
}

/// Analyzes a finite automaton specification.
///
/// # Returns
///
/// * `Ok(())` if the specification is sound.
/// * `Err(AutomatonError::Validation)` listing every violated invariant otherwise.
pub fn analyze_fa(spec: &FaSpec) -> Result<(), AutomatonError> {
    let checks: &[Check<FaSpec>] = &[
        |s: &FaSpec| check_unique_states(&s.states),
        |s: &FaSpec| check_known_states("start", &s.states, std::slice::from_ref(&s.start)),
        |s: &FaSpec| check_known_states("final", &s.states, &s.finals),
        check_fa_states,
        check_fa_symbols,
    ];

    run_checks(spec, checks)
}

/// Analyzes a pushdown automaton specification.
pub fn analyze_pda(spec: &PdaSpec) -> Result<(), AutomatonError> {
    let checks: &[Check<PdaSpec>] = &[
        |s: &PdaSpec| check_unique_states(&s.states),
        |s: &PdaSpec| check_known_states("start", &s.states, std::slice::from_ref(&s.start)),
        |s: &PdaSpec| check_known_states("final", &s.states, &s.finals),
        check_pda_states,
        check_pda_input_symbols,
        check_pda_stack_symbols,
        check_pda_determinism,
    ];

    run_checks(spec, checks)
}

/// Analyzes a Turing machine specification.
pub fn analyze_tm(spec: &TmSpec) -> Result<(), AutomatonError> {
    let checks: &[Check<TmSpec>] = &[
        |s: &TmSpec| check_tape_symbol(s, "blank symbol", BLANK_SYMBOL),
        |s: &TmSpec| check_tape_symbol(s, "left endmarker", LEFT_ENDMARKER),
        |s: &TmSpec| check_unique_states(&s.states),
        |s: &TmSpec| check_known_states("start", &s.states, std::slice::from_ref(&s.start)),
        |s: &TmSpec| check_known_states("accept", &s.states, std::slice::from_ref(&s.accept)),
        |s: &TmSpec| check_known_states("reject", &s.states, std::slice::from_ref(&s.reject)),
        check_tm_states,
        check_tm_symbols,
        check_tm_determinism,
        check_input_subset,
    ];

    run_checks(spec, checks)
}

fn check_unique_states(states: &[String]) -> Result<(), AnalysisError> {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<String> = states
        .iter()
        .filter(|state| !seen.insert(state.as_str()))
        .cloned()
        .collect();

    if !duplicates.is_empty() {
        duplicates.sort();
        duplicates.dedup();
        return Err(AnalysisError::DuplicateStates(duplicates));
    }

    Ok(())
}

fn check_known_states(
    role: &'static str,
    states: &[String],
    candidates: &[String],
) -> Result<(), AnalysisError> {
    let unknown: Vec<String> = candidates
        .iter()
        .filter(|state| !states.contains(state))
        .cloned()
        .collect();

    if !unknown.is_empty() {
        return Err(AnalysisError::UnknownStates {
            role,
            states: unknown,
        });
    }

    Ok(())
}

/// Collects the descriptions of references that fail `known`, sorted for deterministic output.
fn unknown_references<'a, I>(references: I, known: &[String]) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let mut unknown: Vec<String> = references
        .into_iter()
        .filter(|(name, _)| !known.iter().any(|k| k == name))
        .map(|(_, description)| description)
        .collect();
    unknown.sort();
    unknown.dedup();
    unknown
}

fn check_fa_states(spec: &FaSpec) -> Result<(), AnalysisError> {
    let sources = spec
        .transitions
        .keys()
        .map(|state| (state.as_str(), format!("'{state}'")));
    let targets = spec.transitions.iter().flat_map(|(state, table)| {
        table
            .iter()
            .map(move |(symbol, next)| (next.as_str(), format!("{state} --{symbol}--> {next}")))
    });

    let undefined = unknown_references(sources.chain(targets), &spec.states);
    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedStates(undefined));
    }

    Ok(())
}

fn check_fa_symbols(spec: &FaSpec) -> Result<(), AnalysisError> {
    let symbols = spec.transitions.iter().flat_map(|(state, table)| {
        table
            .keys()
            .map(move |symbol| (symbol.as_str(), format!("'{symbol}' for state '{state}'")))
    });

    let unknown = unknown_references(symbols, &spec.alphabet);
    if !unknown.is_empty() {
        return Err(AnalysisError::UnknownSymbols {
            alphabet: "input alphabet",
            symbols: unknown,
        });
    }

    Ok(())
}

fn check_pda_states(spec: &PdaSpec) -> Result<(), AnalysisError> {
    let references = spec.relations.iter().flat_map(|relation| {
        [
            (relation.state.as_str(), relation.to_string()),
            (relation.next.as_str(), relation.to_string()),
        ]
    });

    let undefined = unknown_references(references, &spec.states);
    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedStates(undefined));
    }

    Ok(())
}

fn check_pda_input_symbols(spec: &PdaSpec) -> Result<(), AnalysisError> {
    let symbols = spec.relations.iter().map(|relation| {
        (
            relation.input.as_str(),
            format!("'{}' in {}", relation.input, relation),
        )
    });

    let unknown = unknown_references(symbols, &spec.input_alphabet);
    if !unknown.is_empty() {
        return Err(AnalysisError::UnknownSymbols {
            alphabet: "input alphabet",
            symbols: unknown,
        });
    }

    Ok(())
}

fn check_pda_stack_symbols(spec: &PdaSpec) -> Result<(), AnalysisError> {
    let symbols = spec.relations.iter().flat_map(|relation| {
        relation
            .pop
            .iter()
            .chain(relation.push.iter())
            .map(move |symbol| (symbol.as_str(), format!("'{symbol}' in {relation}")))
    });

    let unknown = unknown_references(symbols, &spec.stack_alphabet);
    if !unknown.is_empty() {
        return Err(AnalysisError::UnknownSymbols {
            alphabet: "stack alphabet",
            symbols: unknown,
        });
    }

    Ok(())
}

fn check_pda_determinism(spec: &PdaSpec) -> Result<(), AnalysisError> {
    let mut seen = HashSet::new();
    let mut conflicts: Vec<String> = spec
        .relations
        .iter()
        .filter(|relation| {
            !seen.insert((
                relation.state.as_str(),
                relation.input.as_str(),
                relation.pop.as_deref(),
            ))
        })
        .map(|relation| {
            format!(
                "({}, {}, {})",
                relation.state,
                relation.input,
                relation.pop.as_deref().unwrap_or(EMPTY_MARKER)
            )
        })
        .collect();

    if !conflicts.is_empty() {
        conflicts.sort();
        conflicts.dedup();
        return Err(AnalysisError::ConflictingTransitions(conflicts));
    }

    Ok(())
}

fn check_tape_symbol(
    spec: &TmSpec,
    role: &'static str,
    symbol: &'static str,
) -> Result<(), AnalysisError> {
    if !spec.tape_alphabet.iter().any(|s| s == symbol) {
        return Err(AnalysisError::MissingTapeSymbol { role, symbol });
    }

    Ok(())
}

fn check_tm_states(spec: &TmSpec) -> Result<(), AnalysisError> {
    let references = spec.transitions.iter().flat_map(|rule| {
        [
            (rule.state.as_str(), rule.to_string()),
            (rule.next.as_str(), rule.to_string()),
        ]
    });

    let undefined = unknown_references(references, &spec.states);
    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedStates(undefined));
    }

    Ok(())
}

fn check_tm_symbols(spec: &TmSpec) -> Result<(), AnalysisError> {
    let symbols = spec.transitions.iter().flat_map(|rule| {
        [
            (rule.read.as_str(), format!("'{}' in {}", rule.read, rule)),
            (rule.write.as_str(), format!("'{}' in {}", rule.write, rule)),
        ]
    });

    let unknown = unknown_references(symbols, &spec.tape_alphabet);
    if !unknown.is_empty() {
        return Err(AnalysisError::UnknownSymbols {
            alphabet: "tape alphabet",
            symbols: unknown,
        });
    }

    Ok(())
}

fn check_tm_determinism(spec: &TmSpec) -> Result<(), AnalysisError> {
    let mut seen = HashSet::new();
    let mut conflicts: Vec<String> = spec
        .transitions
        .iter()
        .filter(|rule| !seen.insert((rule.state.as_str(), rule.read.as_str())))
        .map(|rule| format!("({}, {})", rule.state, rule.read))
        .collect();

    if !conflicts.is_empty() {
        conflicts.sort();
        conflicts.dedup();
        return Err(AnalysisError::ConflictingTransitions(conflicts));
    }

    Ok(())
}

fn check_input_subset(spec: &TmSpec) -> Result<(), AnalysisError> {
    let missing: Vec<String> = spec
        .input_alphabet
        .iter()
        .filter(|symbol| !spec.tape_alphabet.contains(symbol))
        .cloned()
        .collect();

    if !missing.is_empty() {
        return Err(AnalysisError::InputNotInTapeAlphabet(missing));
    }

    Ok(())
}
