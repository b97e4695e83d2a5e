//! Versioned cells.
//!
//! Every mutable field of the automaton is a small append-only log of
//! `(Sequence, value)` entries. Writes stamp the current sequence and reads
//! see the latest entry, so undoing the most recent append is a pop.

mod cell;

pub use cell::Versioned;
