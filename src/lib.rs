//! # recur
//!
//! An online, undoable suffix automaton that reports, after every edit, how
//! many distinct substrings of the current string occur at least twice.
//!
//! ## Core Concepts
//!
//! - **States**: Equivalence classes of substrings, stored in an append-only arena
//! - **Versioned fields**: Every mutable field keeps a `(sequence, value)` history
//! - **Checkpoints**: One per live append, naming the states it wrote
//! - **Undo**: Pops the top checkpoint and rolls back exactly those states
//!
//! ## Example
//!
//! ```
//! use recur::Automaton;
//!
//! let mut automaton = Automaton::new();
//! assert_eq!(automaton.append('a')?, 0);
//! assert_eq!(automaton.append('a')?, 1);
//! assert_eq!(automaton.append('b')?, 1);
//! assert_eq!(automaton.undo()?, 1);
//! assert_eq!(automaton.undo()?, 0);
//! # Ok::<(), recur::EngineError>(())
//! ```

pub mod arena;
pub mod automaton;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod session;
pub mod snapshot;
pub mod types;
pub mod versioned;

// Re-exports
pub use arena::{State, StateArena};
pub use automaton::Automaton;
pub use checkpoint::{Checkpoint, CheckpointLog};
pub use config::{Alphabet, EngineConfig, SessionConfig};
pub use error::{EngineError, Result};
pub use session::SessionSummary;
pub use types::*;
pub use versioned::Versioned;
