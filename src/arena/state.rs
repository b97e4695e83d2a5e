//! State storage and per-state rollback.

use crate::error::{EngineError, Result};
use crate::types::{Sequence, StateId, StateView};
use crate::versioned::Versioned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One automaton state. Every mutable field is versioned.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct State {
    /// Length of the longest substring in the class.
    pub length: Versioned<usize>,

    /// Suffix link; `None` only for the root.
    pub link: Versioned<Option<StateId>>,

    /// Outgoing edges. A latest value of `None` means no live edge.
    pub transitions: BTreeMap<char, Versioned<Option<StateId>>>,

    /// True until the class is proven to occur more than once.
    pub unmarked: Versioned<bool>,

    /// Number of distinct root paths reaching this state.
    pub weight: Versioned<u64>,

    /// Append that allocated this state.
    pub born: Sequence,
}

impl State {
    fn root() -> Self {
        let at = Sequence::GENESIS;
        Self {
            length: Versioned::new(at, 0),
            link: Versioned::new(at, None),
            transitions: BTreeMap::new(),
            unmarked: Versioned::new(at, true),
            weight: Versioned::new(at, 1),
            born: at,
        }
    }

    /// Live target on `symbol`, if any.
    pub fn transition(&self, symbol: char) -> Option<StateId> {
        self.transitions.get(&symbol).and_then(|cell| *cell.get())
    }

    /// Point the edge on `symbol` at `target` as of `at`.
    pub fn set_transition(&mut self, at: Sequence, symbol: char, target: StateId) {
        self.transitions
            .entry(symbol)
            .or_insert_with(|| Versioned::new(Sequence::GENESIS, None))
            .set(at, Some(target));
    }

    /// Live edges ordered by symbol.
    pub fn live_transitions(&self) -> impl Iterator<Item = (char, StateId)> + '_ {
        self.transitions
            .iter()
            .filter_map(|(symbol, cell)| cell.get().map(|target| (*symbol, target)))
    }

    /// Undo every write stamped at or after `at`.
    pub fn rollback(&mut self, at: Sequence) -> usize {
        let mut removed = self.length.rollback(at)
            + self.link.rollback(at)
            + self.unmarked.rollback(at)
            + self.weight.rollback(at);
        for cell in self.transitions.values_mut() {
            removed += cell.rollback(at);
        }
        removed
    }

    /// Version entries held by this state.
    pub fn depth(&self) -> usize {
        self.length.depth()
            + self.link.depth()
            + self.unmarked.depth()
            + self.weight.depth()
            + self.transitions.values().map(Versioned::depth).sum::<usize>()
    }
}

/// Append-only store of states.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateArena {
    states: Vec<State>,
}

impl StateArena {
    /// Create an arena holding only the root.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an arena with room for `capacity` states besides the root.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut states = Vec::with_capacity(capacity + 1);
        states.push(State::root());
        Self { states }
    }

    /// Allocate a fresh terminal state of `length` at `at`.
    ///
    /// The suffix link starts at the root and is fixed later in the same
    /// append, which coalesces into the base entry.
    pub fn create_terminal(&mut self, at: Sequence, length: usize) -> StateId {
        self.push(State {
            length: Versioned::new(at, length),
            link: Versioned::new(at, Some(StateId::ROOT)),
            transitions: BTreeMap::new(),
            unmarked: Versioned::new(at, true),
            weight: Versioned::new(at, 0),
            born: at,
        })
    }

    /// Allocate a clone of `source` with a shorter `length` at `at`.
    ///
    /// The clone copies the source's current live transitions and suffix
    /// link, starts with zero weight and is already marked.
    pub fn create_clone(&mut self, at: Sequence, source: StateId, length: usize) -> Result<StateId> {
        let source = self.state(source)?;
        let transitions = source
            .live_transitions()
            .map(|(symbol, target)| (symbol, Versioned::new(at, Some(target))))
            .collect();
        let link = *source.link.get();

        Ok(self.push(State {
            length: Versioned::new(at, length),
            link: Versioned::new(at, link),
            transitions,
            unmarked: Versioned::new(at, false),
            weight: Versioned::new(at, 0),
            born: at,
        }))
    }

    fn push(&mut self, state: State) -> StateId {
        let id = StateId(self.states.len() as u32);
        self.states.push(state);
        id
    }

    pub fn state(&self, id: StateId) -> Result<&State> {
        self.states
            .get(id.index())
            .ok_or(EngineError::UnknownState(id))
    }

    pub fn state_mut(&mut self, id: StateId) -> Result<&mut State> {
        self.states
            .get_mut(id.index())
            .ok_or(EngineError::UnknownState(id))
    }

    /// Roll back every field of `id` stamped at or after `at`.
    pub fn revert(&mut self, id: StateId, at: Sequence) -> Result<usize> {
        Ok(self.state_mut(id)?.rollback(at))
    }

    /// Snapshot of the current field values of `id`.
    pub fn view(&self, id: StateId) -> Result<StateView> {
        let state = self.state(id)?;
        Ok(StateView {
            id,
            length: *state.length.get(),
            link: *state.link.get(),
            unmarked: *state.unmarked.get(),
            weight: *state.weight.get(),
            transitions: state.live_transitions().collect(),
            born: state.born,
        })
    }

    /// States ever allocated, root included.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states
            .iter()
            .enumerate()
            .map(|(index, state)| (StateId(index as u32), state))
    }
}

impl Default for StateArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_arena_has_root() {
        let arena = StateArena::new();
        assert_eq!(arena.len(), 1);

        let root = arena.view(StateId::ROOT).unwrap();
        assert_eq!(root.length, 0);
        assert_eq!(root.link, None);
        assert_eq!(root.weight, 1);
        assert!(root.transitions.is_empty());
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut arena = StateArena::new();
        let a = arena.create_terminal(Sequence(1), 1);
        let b = arena.create_terminal(Sequence(2), 2);
        assert_eq!(a, StateId(1));
        assert_eq!(b, StateId(2));
    }

    #[test]
    fn test_unknown_state() {
        let arena = StateArena::new();
        assert!(matches!(
            arena.state(StateId(42)),
            Err(EngineError::UnknownState(StateId(42)))
        ));
    }

    #[test]
    fn test_clone_copies_live_transitions() {
        let mut arena = StateArena::new();
        let a = arena.create_terminal(Sequence(1), 1);
        let b = arena.create_terminal(Sequence(2), 2);
        {
            let source = arena.state_mut(a).unwrap();
            source.set_transition(Sequence(2), 'x', b);
            source.link.set(Sequence(2), Some(StateId::ROOT));
        }

        let clone = arena.create_clone(Sequence(3), a, 1).unwrap();
        let view = arena.view(clone).unwrap();
        assert_eq!(view.transitions, vec![('x', b)]);
        assert_eq!(view.link, Some(StateId::ROOT));
        assert!(!view.unmarked);
        assert_eq!(view.weight, 0);
        assert_eq!(view.born, Sequence(3));
    }

    #[test]
    fn test_revert_restores_transitions() {
        let mut arena = StateArena::new();
        let a = arena.create_terminal(Sequence(1), 1);
        arena
            .state_mut(StateId::ROOT)
            .unwrap()
            .set_transition(Sequence(1), 'a', a);
        assert_eq!(arena.state(StateId::ROOT).unwrap().transition('a'), Some(a));

        let removed = arena.revert(StateId::ROOT, Sequence(1)).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(arena.state(StateId::ROOT).unwrap().transition('a'), None);
        assert!(arena.view(StateId::ROOT).unwrap().transitions.is_empty());
    }
}
