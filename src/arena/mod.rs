//! State arena.
//!
//! States live in one append-only vector and refer to each other by
//! [`StateId`](crate::types::StateId). Nothing is ever freed: states created
//! by an append that is later undone stay allocated but unreachable.

mod state;

pub use state::{State, StateArena};
