//! Core types for the automaton engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a state in the arena. Ids are never reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateId(pub u32);

impl StateId {
    /// The root state, representing the empty string.
    pub const ROOT: StateId = StateId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateId({})", self.0)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of live appends. Doubles as the version stamp of field writes:
/// the append that moves the automaton from `Sequence(k)` to `Sequence(k + 1)`
/// writes every entry at `Sequence(k + 1)`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Sequence(pub u64);

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seq({})", self.0)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Sequence {
    /// Stamp of entries that exist before any append (root, field bases).
    pub const GENESIS: Sequence = Sequence(0);

    pub fn next(self) -> Self {
        Sequence(self.0 + 1)
    }

    pub fn prev(self) -> Option<Self> {
        if self.0 > 0 {
            Some(Sequence(self.0 - 1))
        } else {
            None
        }
    }
}

/// Read-only view of one state's current field values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StateView {
    pub id: StateId,
    pub length: usize,
    pub link: Option<StateId>,
    pub unmarked: bool,
    pub weight: u64,
    /// Live transitions, ordered by symbol.
    pub transitions: Vec<(char, StateId)>,
    /// Append that allocated this state.
    pub born: Sequence,
}

/// One state of a [`CanonicalGraph`], addressed by BFS position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CanonicalState {
    pub length: usize,
    pub link: Option<usize>,
    pub unmarked: bool,
    pub weight: u64,
    pub transitions: Vec<(char, usize)>,
}

/// The structure reachable from the root with ids renumbered in BFS order
/// (transitions visited by ascending symbol). Two automata over the same
/// string compare equal regardless of the ids their histories allocated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CanonicalGraph {
    pub states: Vec<CanonicalState>,
    pub active: usize,
    pub total: u64,
}

/// Engine statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AutomatonStats {
    /// Live appends (current string length).
    pub live_len: u64,
    /// States ever allocated, root included.
    pub states_allocated: u64,
    /// Allocated states born from appends that were later undone.
    pub stale_states: u64,
    /// Version entries held across all fields of all states.
    pub field_entries: u64,
    /// Current count of distinct substrings occurring at least twice.
    pub total: u64,
}
