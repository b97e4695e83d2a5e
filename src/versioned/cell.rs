//! The versioned cell primitive.

use crate::types::Sequence;
use serde::{Deserialize, Serialize};

/// A value with a rollback-able history.
///
/// The base entry is written when the cell is created and is never rolled
/// back; an undone append that created the cell leaves it unreachable rather
/// than empty. Entries are strictly increasing in sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioned<T> {
    base: (Sequence, T),
    edits: Vec<(Sequence, T)>,
}

impl<T> Versioned<T> {
    /// Create a cell holding `value` as of `at`.
    pub fn new(at: Sequence, value: T) -> Self {
        Self {
            base: (at, value),
            edits: Vec::new(),
        }
    }

    /// Latest value.
    pub fn get(&self) -> &T {
        match self.edits.last() {
            Some((_, value)) => value,
            None => &self.base.1,
        }
    }

    /// Sequence of the latest entry.
    pub fn stamp(&self) -> Sequence {
        match self.edits.last() {
            Some((at, _)) => *at,
            None => self.base.0,
        }
    }

    /// Write `value` at `at`, overwriting the latest entry if it carries the
    /// same stamp. Returns true when a new entry was pushed.
    pub fn set(&mut self, at: Sequence, value: T) -> bool {
        debug_assert!(at >= self.stamp(), "write at {:?} behind {:?}", at, self.stamp());
        if let Some(last) = self.edits.last_mut() {
            if last.0 == at {
                last.1 = value;
                return false;
            }
        } else if self.base.0 == at {
            self.base.1 = value;
            return false;
        }
        self.edits.push((at, value));
        true
    }

    /// Drop every entry stamped at or after `at`, keeping the base.
    /// Returns the number of entries removed.
    pub fn rollback(&mut self, at: Sequence) -> usize {
        let keep = self.edits.partition_point(|(stamp, _)| *stamp < at);
        let removed = self.edits.len() - keep;
        self.edits.truncate(keep);
        removed
    }

    /// Entries currently held, base included.
    pub fn depth(&self) -> usize {
        1 + self.edits.len()
    }
}

impl<T: Clone> Versioned<T> {
    /// Read-modify-write at `at`.
    pub fn update(&mut self, at: Sequence, f: impl FnOnce(&T) -> T) -> bool {
        let value = f(self.get());
        self.set(at, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_latest() {
        let mut cell = Versioned::new(Sequence(0), 10);
        assert_eq!(*cell.get(), 10);

        cell.set(Sequence(1), 11);
        cell.set(Sequence(3), 13);
        assert_eq!(*cell.get(), 13);
        assert_eq!(cell.stamp(), Sequence(3));
        assert_eq!(cell.depth(), 3);
    }

    #[test]
    fn test_same_stamp_writes_coalesce() {
        let mut cell = Versioned::new(Sequence(0), 0u64);
        assert!(cell.set(Sequence(2), 1));
        assert!(!cell.set(Sequence(2), 2));
        assert!(!cell.update(Sequence(2), |v| v + 5));
        assert_eq!(*cell.get(), 7);
        assert_eq!(cell.depth(), 2);
    }

    #[test]
    fn test_write_at_birth_overwrites_base() {
        let mut cell = Versioned::new(Sequence(4), None::<u32>);
        assert!(!cell.set(Sequence(4), Some(9)));
        assert_eq!(cell.depth(), 1);
        assert_eq!(*cell.get(), Some(9));
    }

    #[test]
    fn test_rollback_pops_to_previous_value() {
        let mut cell = Versioned::new(Sequence(0), 'a');
        cell.set(Sequence(1), 'b');
        cell.set(Sequence(2), 'c');

        assert_eq!(cell.rollback(Sequence(2)), 1);
        assert_eq!(*cell.get(), 'b');

        // Nothing stamped at 2 any more.
        assert_eq!(cell.rollback(Sequence(2)), 0);
        assert_eq!(*cell.get(), 'b');
    }

    #[test]
    fn test_rollback_never_drops_base() {
        let mut cell = Versioned::new(Sequence(3), 1);
        cell.set(Sequence(5), 2);
        assert_eq!(cell.rollback(Sequence(1)), 1);
        assert_eq!(*cell.get(), 1);
        assert_eq!(cell.depth(), 1);
    }

    #[test]
    fn test_rewrite_after_rollback() {
        let mut cell = Versioned::new(Sequence(0), 0);
        cell.set(Sequence(1), 1);
        cell.rollback(Sequence(1));
        assert!(cell.set(Sequence(1), 2));
        assert_eq!(*cell.get(), 2);
    }
}
