//! The undoable suffix automaton.

use crate::arena::StateArena;
use crate::checkpoint::{Checkpoint, CheckpointLog};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::types::{AutomatonStats, CanonicalGraph, CanonicalState, Sequence, StateId, StateView};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, trace, warn};

/// Online suffix automaton over an append/undo stream.
///
/// After every operation [`Automaton::total`] is the number of distinct
/// substrings of the current string that occur at least twice.
///
/// Every field write made by an append is stamped with that append's
/// [`Sequence`] and the touched states are recorded in a [`Checkpoint`], so
/// [`Automaton::undo`] restores the exact prior state rather than an
/// equivalent one.
///
/// Memory only grows within a session: states allocated by undone appends
/// are never reclaimed. Capacity is bounded by twice the number of appends
/// ever performed, undone ones included (see [`AutomatonStats::stale_states`]).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Automaton {
    config: EngineConfig,

    arena: StateArena,

    checkpoints: CheckpointLog,

    /// `heads[k]` is the terminal state after `k` live appends.
    heads: Vec<StateId>,

    /// `totals[k]` is the answer after `k` live appends.
    totals: Vec<u64>,
}

impl Automaton {
    /// Empty automaton with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let hint = config.capacity_hint;
        let mut heads = Vec::with_capacity(hint + 1);
        heads.push(StateId::ROOT);
        let mut totals = Vec::with_capacity(hint + 1);
        totals.push(0);

        Self {
            arena: StateArena::with_capacity(hint.saturating_mul(2)),
            checkpoints: CheckpointLog::with_capacity(hint),
            heads,
            totals,
            config,
        }
    }

    /// Discard every state and all history.
    pub fn reset(&mut self) {
        *self = Self::with_config(self.config.clone());
    }

    /// Discard everything and switch to `config`.
    pub fn reset_with(&mut self, config: EngineConfig) {
        *self = Self::with_config(config);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of live appends.
    pub fn now(&self) -> Sequence {
        self.checkpoints.head()
    }

    /// Length of the current string.
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Distinct substrings of the current string occurring at least twice.
    pub fn total(&self) -> u64 {
        self.totals.last().copied().unwrap_or(0)
    }

    /// Terminal state of the whole current string.
    pub fn active(&self) -> StateId {
        self.heads.last().copied().unwrap_or(StateId::ROOT)
    }

    pub fn root(&self) -> StateId {
        StateId::ROOT
    }

    /// The current string.
    pub fn text(&self) -> String {
        self.checkpoints.text()
    }

    /// Current field values of one state.
    pub fn state(&self, id: StateId) -> Result<StateView> {
        self.arena.view(id)
    }

    /// Append `symbol` and return the updated total.
    ///
    /// A symbol outside the configured alphabet is rejected before any write.
    pub fn append(&mut self, symbol: char) -> Result<u64> {
        self.check_symbol(symbol)?;

        let at = self.now().next();
        let mut checkpoint = Checkpoint::new(at, symbol);

        let (fresh, delta) = match self.grow(&mut checkpoint, symbol) {
            Ok(grown) => grown,
            Err(e) => {
                // Nothing was committed; drop every write this append made.
                for id in &checkpoint.touched {
                    self.arena.revert(*id, at)?;
                }
                warn!(seq = at.0, ?symbol, error = %e, "append rolled back");
                return Err(e);
            }
        };

        let total = self.total() + delta;
        self.heads.push(fresh);
        self.totals.push(total);
        self.checkpoints.push(checkpoint);

        debug!(seq = at.0, ?symbol, state = fresh.0, delta, total, "append");
        Ok(total)
    }

    /// Extend the automaton by `symbol`, registering every write in
    /// `checkpoint`. Returns the new terminal state and the total delta.
    fn grow(&mut self, checkpoint: &mut Checkpoint, symbol: char) -> Result<(StateId, u64)> {
        let at = checkpoint.sequence;
        let last = self.active();
        let length = *self.arena.state(last)?.length.get() + 1;
        let fresh = self.arena.create_terminal(at, length);
        checkpoint.touch(fresh);

        // Every suffix without an edge on `symbol` now reaches `fresh`.
        let mut cur = Some(last);
        let mut reaching = 0u64;
        while let Some(id) = cur {
            let state = self.arena.state_mut(id)?;
            if state.transition(symbol).is_some() {
                break;
            }
            reaching += *state.weight.get();
            state.set_transition(at, symbol, fresh);
            checkpoint.touch(id);
            cur = *state.link.get();
        }
        self.arena.state_mut(fresh)?.weight.set(at, reaching);

        let mut delta = 0;
        let link = match cur {
            None => StateId::ROOT,
            Some(from) => {
                let (from_length, target) = {
                    let state = self.arena.state(from)?;
                    let target = state.transition(symbol).ok_or_else(|| {
                        EngineError::Corruption(format!("state {} lost its edge on {:?}", from, symbol))
                    })?;
                    (*state.length.get(), target)
                };

                let target_state = self.arena.state_mut(target)?;
                if *target_state.length.get() == from_length + 1 {
                    if *target_state.unmarked.get() {
                        target_state.unmarked.set(at, false);
                        checkpoint.touch(target);
                        delta = *target_state.weight.get();
                    }
                    target
                } else {
                    let (clone, exposed) =
                        self.split(checkpoint, from, from_length, target, symbol)?;
                    delta = exposed;
                    clone
                }
            }
        };
        self.arena.state_mut(fresh)?.link.set(at, Some(link));
        Ok((fresh, delta))
    }

    /// Append every character of `text`, returning the final total.
    ///
    /// The whole string is validated first; on error nothing is appended.
    pub fn extend(&mut self, text: &str) -> Result<u64> {
        for symbol in text.chars() {
            self.check_symbol(symbol)?;
        }
        for symbol in text.chars() {
            self.append(symbol)?;
        }
        Ok(self.total())
    }

    /// Revert the most recent append and return the total that applied
    /// before it.
    pub fn undo(&mut self) -> Result<u64> {
        let Some(checkpoint) = self.checkpoints.pop() else {
            warn!("undo on empty automaton");
            return Err(EngineError::Underflow);
        };

        let mut removed = 0;
        for id in &checkpoint.touched {
            removed += self.arena.revert(*id, checkpoint.sequence)?;
        }
        self.heads.pop();
        self.totals.pop();

        let total = self.total();
        debug!(
            seq = checkpoint.sequence.0,
            symbol = ?checkpoint.symbol,
            states = checkpoint.touched.len(),
            entries = removed,
            total,
            "undo"
        );
        Ok(total)
    }

    /// Split `target` so that the class reached from `from` on `symbol` has
    /// length `from_length + 1`. Returns the clone and the total delta.
    fn split(
        &mut self,
        checkpoint: &mut Checkpoint,
        from: StateId,
        from_length: usize,
        target: StateId,
        symbol: char,
    ) -> Result<(StateId, u64)> {
        let at = checkpoint.sequence;
        let clone = self.arena.create_clone(at, target, from_length + 1)?;
        checkpoint.touch(clone);

        self.arena.state_mut(target)?.link.set(at, Some(clone));
        checkpoint.touch(target);

        // Redirect the shorter suffixes and move their weight with them.
        let mut cur = Some(from);
        let mut moved = 0u64;
        while let Some(id) = cur {
            let state = self.arena.state_mut(id)?;
            if state.transition(symbol) != Some(target) {
                break;
            }
            moved += *state.weight.get();
            state.set_transition(at, symbol, clone);
            checkpoint.touch(id);
            cur = *state.link.get();
        }
        self.arena.state_mut(clone)?.weight.set(at, moved);

        let target_state = self.arena.state_mut(target)?;
        let remaining = target_state.weight.get().checked_sub(moved).ok_or_else(|| {
            EngineError::Corruption(format!("weight of state {} underflowed on split", target))
        })?;
        target_state.weight.set(at, remaining);

        let exposed = if *target_state.unmarked.get() { moved } else { 0 };
        trace!(seq = at.0, target = target.0, clone = clone.0, moved, exposed, "split");
        Ok((clone, exposed))
    }

    fn check_symbol(&self, symbol: char) -> Result<()> {
        let alphabet = self.config.alphabet;
        if alphabet.contains(symbol) {
            Ok(())
        } else {
            warn!(?symbol, %alphabet, "rejected symbol");
            Err(EngineError::InvalidSymbol { symbol, alphabet })
        }
    }

    /// States reachable from the root, in BFS order over ascending symbols.
    fn reachable(&self) -> Result<Vec<StateId>> {
        let mut order = vec![StateId::ROOT];
        let mut seen = HashSet::from([StateId::ROOT]);
        let mut queue = VecDeque::from([StateId::ROOT]);

        while let Some(id) = queue.pop_front() {
            for (_, target) in self.arena.state(id)?.live_transitions() {
                if seen.insert(target) {
                    order.push(target);
                    queue.push_back(target);
                }
            }
        }
        Ok(order)
    }

    /// Structure reachable from the root with ids renumbered in BFS order.
    pub fn graph(&self) -> Result<CanonicalGraph> {
        let order = self.reachable()?;
        let index: HashMap<StateId, usize> =
            order.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let position = |id: StateId| {
            index.get(&id).copied().ok_or_else(|| {
                EngineError::Corruption(format!("state {} is linked but unreachable", id))
            })
        };

        let mut states = Vec::with_capacity(order.len());
        for id in &order {
            let view = self.arena.view(*id)?;
            states.push(CanonicalState {
                length: view.length,
                link: view.link.map(position).transpose()?,
                unmarked: view.unmarked,
                weight: view.weight,
                transitions: view
                    .transitions
                    .iter()
                    .map(|(symbol, target)| position(*target).map(|i| (*symbol, i)))
                    .collect::<Result<_>>()?,
            });
        }

        Ok(CanonicalGraph {
            states,
            active: position(self.active())?,
            total: self.total(),
        })
    }

    pub fn stats(&self) -> Result<AutomatonStats> {
        let live = self.reachable()?.len();
        let allocated = self.arena.len();
        Ok(AutomatonStats {
            live_len: self.len() as u64,
            states_allocated: allocated as u64,
            stale_states: (allocated - live) as u64,
            field_entries: self.arena.iter().map(|(_, state)| state.depth() as u64).sum(),
            total: self.total(),
        })
    }

    /// Check the bookkeeping vectors agree with each other. Used after
    /// decoding a snapshot.
    pub(crate) fn validate(&self) -> Result<()> {
        let live = self.checkpoints.len();
        if self.heads.len() != live + 1 || self.totals.len() != live + 1 {
            return Err(EngineError::Corruption(format!(
                "{} checkpoints but {} heads and {} totals",
                live,
                self.heads.len(),
                self.totals.len()
            )));
        }
        if !self.checkpoints.is_contiguous() {
            return Err(EngineError::Corruption("checkpoint sequences are not contiguous".into()));
        }
        if self.heads.first() != Some(&StateId::ROOT) || self.totals.first() != Some(&0) {
            return Err(EngineError::Corruption("history does not start at the root".into()));
        }
        let allocated = self.arena.len();
        let known = |id: StateId, what: &str| {
            if id.index() < allocated {
                Ok(())
            } else {
                Err(EngineError::Corruption(format!(
                    "{} refers to unallocated state {}",
                    what, id
                )))
            }
        };

        for id in &self.heads {
            known(*id, "history head")?;
        }
        for checkpoint in self.checkpoints.iter() {
            for id in &checkpoint.touched {
                known(*id, "checkpoint")?;
            }
        }

        // Lengths are written once at creation, so every state (stale ones
        // included) keeps strictly shortening links.
        for (id, state) in self.arena.iter() {
            for (symbol, target) in state.live_transitions() {
                known(target, &format!("edge {:?} of state {}", symbol, id))?;
            }
            match (*state.link.get(), id == StateId::ROOT) {
                (None, true) => {}
                (None, false) => {
                    return Err(EngineError::Corruption(format!(
                        "state {} has no suffix link",
                        id
                    )));
                }
                (Some(_), true) => {
                    return Err(EngineError::Corruption("root has a suffix link".into()));
                }
                (Some(link), false) => {
                    known(link, &format!("suffix link of state {}", id))?;
                    let link_length = *self.arena.state(link)?.length.get();
                    let length = *state.length.get();
                    if link_length >= length {
                        return Err(EngineError::Corruption(format!(
                            "suffix link {} -> {} does not shorten ({} >= {})",
                            id, link, link_length, length
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for Automaton {
    fn default() -> Self {
        Self::new()
    }
}
