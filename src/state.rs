//! States shared by the three engines. A state is a name plus a transition table that is local
//! to it, keyed by exactly what the engine looks up at run time.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::analyzer::AnalysisError;

/// Index of a state inside its machine.
pub type StateId = usize;

/// A named state owning its outgoing transitions.
#[derive(Debug, Clone)]
pub struct State<K, V> {
    name: String,
    table: HashMap<K, V>,
}

impl<K: Eq + Hash, V> State<K, V> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up the transition taken on `key`, e.g. a `&str` for a `String` keyed table.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get(key)
    }

    /// Number of outgoing transitions.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.table.insert(key, value)
    }
}

/// The full state set of a machine, addressable by id or by name.
#[derive(Debug, Clone)]
pub struct States<K, V> {
    states: Vec<State<K, V>>,
    index: HashMap<String, StateId>,
}

impl<K: Eq + Hash, V> States<K, V> {
    /// Creates one state without transitions per name, in order.
    pub fn from_names(names: &[String]) -> Self {
        let states: Vec<State<K, V>> = names.iter().map(State::new).collect();
        let index = names
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id))
            .collect();

        Self { states, index }
    }

    pub fn id(&self, name: &str) -> Option<StateId> {
        self.index.get(name).copied()
    }

    /// Resolves a state name, reporting an unknown one as a transition error.
    pub fn require(&self, name: &str) -> Result<StateId, AnalysisError> {
        self.id(name)
            .ok_or_else(|| AnalysisError::UndefinedStates(vec![name.to_string()]))
    }

    pub fn get(&self, id: StateId) -> &State<K, V> {
        &self.states[id]
    }

    pub(crate) fn get_mut(&mut self, id: StateId) -> &mut State<K, V> {
        &mut self.states[id]
    }

    pub fn name(&self, id: StateId) -> &str {
        self.states[id].name()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Total number of transitions over all states.
    pub fn transition_count(&self) -> usize {
        self.states.iter().map(State::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_states_are_indexed_in_order() {
        let states: States<String, StateId> = States::from_names(&names(&["q0", "q1"]));

        assert_eq!(states.len(), 2);
        assert_eq!(states.id("q1"), Some(1));
        assert_eq!(states.name(0), "q0");
        assert_eq!(states.id("missing"), None);
    }

    #[test]
    fn test_require_unknown_state() {
        let states: States<String, StateId> = States::from_names(&names(&["q0"]));

        assert_eq!(
            states.require("q9"),
            Err(AnalysisError::UndefinedStates(vec!["q9".to_string()]))
        );
    }

    #[test]
    fn test_local_table() {
        let mut states: States<String, StateId> = States::from_names(&names(&["q0", "q1"]));
        states.get_mut(0).insert("a".to_string(), 1);

        assert_eq!(states.get(0).get("a"), Some(&1));
        assert_eq!(states.get(0).get(&"a".to_string()), Some(&1));
        assert_eq!(states.get(0).get("b"), None);
        assert!(states.get(1).is_empty());
        assert_eq!(states.transition_count(), 1);
    }
}
