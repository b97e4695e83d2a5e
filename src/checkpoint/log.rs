//! Stack of per-append checkpoints.

use crate::types::{Sequence, StateId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// States touched by one live append.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Stamp of every entry the append wrote.
    pub sequence: Sequence,

    /// Symbol that was appended.
    pub symbol: char,

    /// Each touched state, registered once.
    pub touched: BTreeSet<StateId>,
}

impl Checkpoint {
    pub fn new(sequence: Sequence, symbol: char) -> Self {
        Self {
            sequence,
            symbol,
            touched: BTreeSet::new(),
        }
    }

    /// Register `id` as written. Idempotent.
    pub fn touch(&mut self, id: StateId) {
        self.touched.insert(id);
    }
}

/// Stack of checkpoints, bottom is the first live append.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointLog {
    entries: Vec<Checkpoint>,
}

impl CheckpointLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Push the checkpoint of a completed append.
    ///
    /// Its sequence must follow the current top.
    pub fn push(&mut self, checkpoint: Checkpoint) {
        debug_assert_eq!(checkpoint.sequence, self.head().next());
        self.entries.push(checkpoint);
    }

    /// Remove and return the most recent checkpoint.
    pub fn pop(&mut self) -> Option<Checkpoint> {
        self.entries.pop()
    }

    /// Sequence of the most recent live append, `GENESIS` when empty.
    pub fn head(&self) -> Sequence {
        Sequence(self.entries.len() as u64)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.entries.iter()
    }

    /// The live string, one symbol per checkpoint.
    pub fn text(&self) -> String {
        self.entries.iter().map(|checkpoint| checkpoint.symbol).collect()
    }

    /// Checkpoints are contiguous from sequence 1.
    pub fn is_contiguous(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(index, checkpoint)| checkpoint.sequence == Sequence(index as u64 + 1))
    }
}
