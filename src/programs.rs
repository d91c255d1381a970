use crate::fa::{FaSpec, FiniteAutomaton};
use crate::machine::{TmSpec, TuringMachine};
use crate::pda::{PdaSpec, PushdownAutomaton};
use crate::types::AutomatonError;
use serde::{Deserialize, Serialize};
use tracing::error;

pub const FILE_IO: &str = "file-io";
pub const TRACE_LEXER: &str = "trace-lexer";
pub const TRACE_STEPS: &str = "trace-steps";
pub const TRACE_POSITION: &str = "trace-position";
pub const TRACE_ENDMARKER: &str = "trace-endmarker";
pub const BINARY_COMPLEMENT: &str = "binary-complement";
pub const EVEN_LENGTH: &str = "even-length";

// Built-in machine definitions
const DEFINITION_TEXTS: [&str; 7] = [
    include_str!("../machines/file-io.json"),
    include_str!("../machines/trace-lexer.json"),
    include_str!("../machines/trace-steps.json"),
    include_str!("../machines/trace-position.json"),
    include_str!("../machines/trace-endmarker.json"),
    include_str!("../machines/binary-complement.json"),
    include_str!("../machines/even-length.json"),
];

/// A machine definition of any kind, tagged by `"kind"` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Definition {
    Fa(FaSpec),
    Pda(PdaSpec),
    Tm(TmSpec),
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Definition::Fa(spec) => &spec.name,
            Definition::Pda(spec) => &spec.name,
            Definition::Tm(spec) => &spec.name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Definition::Fa(_) => "fa",
            Definition::Pda(_) => "pda",
            Definition::Tm(_) => "tm",
        }
    }

    pub fn state_count(&self) -> usize {
        match self {
            Definition::Fa(spec) => spec.states.len(),
            Definition::Pda(spec) => spec.states.len(),
            Definition::Tm(spec) => spec.states.len(),
        }
    }

    pub fn transition_count(&self) -> usize {
        match self {
            Definition::Fa(spec) => spec.transitions.values().map(|table| table.len()).sum(),
            Definition::Pda(spec) => spec.relations.len(),
            Definition::Tm(spec) => spec.transitions.len(),
        }
    }

    /// Builds the engine for this definition and checks it, discarding the engine.
    pub fn validate(&self) -> Result<(), AutomatonError> {
        match self.clone() {
            Definition::Fa(spec) => FiniteAutomaton::new(spec).map(|_| ()),
            Definition::Pda(spec) => PushdownAutomaton::new(spec).map(|_| ()),
            Definition::Tm(spec) => TuringMachine::new(spec).map(|_| ()),
        }
    }
}

lazy_static::lazy_static! {
    pub static ref DEFINITIONS: Vec<Definition> = DEFINITION_TEXTS
        .iter()
        .filter_map(|text| match serde_json::from_str::<Definition>(text) {
            Ok(definition) => Some(definition),
            Err(e) => {
                error!("Failed to parse built-in machine definition: {}", e);
                None
            }
        })
        .collect();
}

/// Read-only access to the built-in machine definitions.
pub struct MachineCatalog;

impl MachineCatalog {
    /// Get the number of built-in definitions
    pub fn count() -> usize {
        DEFINITIONS.len()
    }

    /// Get a definition by its index
    pub fn get_by_index(index: usize) -> Result<&'static Definition, AutomatonError> {
        DEFINITIONS
            .get(index)
            .ok_or_else(|| AutomatonError::NotFound(format!("#{}", index)))
    }

    /// Get a definition by its name
    pub fn get_by_name(name: &str) -> Result<&'static Definition, AutomatonError> {
        DEFINITIONS
            .iter()
            .find(|definition| definition.name() == name)
            .ok_or_else(|| AutomatonError::NotFound(name.to_string()))
    }

    pub fn list_names() -> Vec<String> {
        DEFINITIONS
            .iter()
            .map(|definition| definition.name().to_string())
            .collect()
    }

    /// Get information about a definition by its index
    pub fn get_info(index: usize) -> Result<MachineInfo, AutomatonError> {
        let definition = Self::get_by_index(index)?;

        Ok(MachineInfo {
            index,
            name: definition.name().to_string(),
            kind: definition.kind(),
            state_count: definition.state_count(),
            transition_count: definition.transition_count(),
        })
    }

    /// Search for definitions whose name contains `query`, ignoring case
    pub fn search(query: &str) -> Vec<usize> {
        let query = query.to_lowercase();

        DEFINITIONS
            .iter()
            .enumerate()
            .filter(|(_, definition)| definition.name().to_lowercase().contains(&query))
            .map(|(index, _)| index)
            .collect()
    }

    /// Builds the finite automaton named `name`.
    pub fn fa(name: &str) -> Result<FiniteAutomaton, AutomatonError> {
        match Self::get_by_name(name)? {
            Definition::Fa(spec) => FiniteAutomaton::new(spec.clone()),
            other => Err(Self::mismatch(name, "fa", other)),
        }
    }

    /// Builds the pushdown automaton named `name`.
    pub fn pda(name: &str) -> Result<PushdownAutomaton, AutomatonError> {
        match Self::get_by_name(name)? {
            Definition::Pda(spec) => PushdownAutomaton::new(spec.clone()),
            other => Err(Self::mismatch(name, "pda", other)),
        }
    }

    /// Builds the Turing machine named `name`.
    pub fn tm(name: &str) -> Result<TuringMachine, AutomatonError> {
        match Self::get_by_name(name)? {
            Definition::Tm(spec) => TuringMachine::new(spec.clone()),
            other => Err(Self::mismatch(name, "tm", other)),
        }
    }

    fn mismatch(name: &str, expected: &'static str, found: &Definition) -> AutomatonError {
        AutomatonError::KindMismatch {
            name: name.to_string(),
            expected,
            found: found.kind(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MachineInfo {
    pub index: usize,
    pub name: String,
    pub kind: &'static str,
    pub state_count: usize,
    pub transition_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_definitions_parse() {
        assert_eq!(MachineCatalog::count(), DEFINITION_TEXTS.len());
    }

    #[test]
    fn test_all_definitions_are_valid() {
        for index in 0..MachineCatalog::count() {
            let definition = MachineCatalog::get_by_index(index).unwrap();
            assert!(
                definition.validate().is_ok(),
                "Definition '{}' is invalid: {:?}",
                definition.name(),
                definition.validate()
            );
        }
    }

    #[test]
    fn test_list_names() {
        let names = MachineCatalog::list_names();

        for name in [
            FILE_IO,
            TRACE_LEXER,
            TRACE_STEPS,
            TRACE_POSITION,
            TRACE_ENDMARKER,
            BINARY_COMPLEMENT,
            EVEN_LENGTH,
        ] {
            assert!(names.contains(&name.to_string()), "missing '{}'", name);
        }
    }

    #[test]
    fn test_get_by_index_and_name() {
        assert!(MachineCatalog::get_by_index(0).is_ok());
        assert!(matches!(
            MachineCatalog::get_by_index(999),
            Err(AutomatonError::NotFound(_))
        ));

        let definition = MachineCatalog::get_by_name(TRACE_STEPS).unwrap();
        assert_eq!(definition.kind(), "pda");
        assert!(MachineCatalog::get_by_name("Nonexistent").is_err());
    }

    #[test]
    fn test_get_info() {
        let index = MachineCatalog::search(FILE_IO)[0];
        let info = MachineCatalog::get_info(index).unwrap();

        assert_eq!(info.name, FILE_IO);
        assert_eq!(info.kind, "fa");
        assert_eq!(info.state_count, 2);
        assert_eq!(info.transition_count, 4);

        assert!(MachineCatalog::get_info(999).is_err());
    }

    #[test]
    fn test_search() {
        assert_eq!(MachineCatalog::search("TRACE").len(), 4);
        assert_eq!(MachineCatalog::search("length").len(), 1);
        assert!(MachineCatalog::search("nonexistent").is_empty());
    }

    #[test]
    fn test_typed_construction() {
        assert!(MachineCatalog::fa(TRACE_LEXER).is_ok());
        assert!(MachineCatalog::pda(TRACE_ENDMARKER).is_ok());
        assert!(MachineCatalog::tm(EVEN_LENGTH).is_ok());

        assert_eq!(
            MachineCatalog::tm(FILE_IO).unwrap_err(),
            AutomatonError::KindMismatch {
                name: FILE_IO.to_string(),
                expected: "tm",
                found: "fa",
            }
        );
    }

    #[test]
    fn test_sample_machines_run() {
        let mut machine = MachineCatalog::tm(EVEN_LENGTH).unwrap();

        machine.set_input("0110").unwrap();
        assert_eq!(machine.transition_all(), Ok(true));

        machine.set_input("011").unwrap();
        assert_eq!(machine.transition_all(), Ok(false));

        machine.set_input("").unwrap();
        assert_eq!(machine.transition_all(), Ok(true));
    }
}
