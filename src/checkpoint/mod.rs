//! Checkpoint log.
//!
//! One checkpoint per live append, recording which states that append wrote.
//! Undo pops the top checkpoint and rolls back exactly those states.

mod log;

pub use log::{Checkpoint, CheckpointLog};
