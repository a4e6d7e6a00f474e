//! Shared telop table
//!
//! The compiled definition list and the per-telop match states, shared
//! between the matcher (log thread) and the lifecycle manager (render
//! context). Definitions swap atomically on reload; match states live in a
//! concurrent map keyed by telop id so unrelated telops never contend on a
//! common lock.

use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;
use tracing::info;

use super::definition::TelopDefinition;
use super::matching::ActiveTelop;
use super::state::TelopMatchState;

pub struct TelopTable {
    telops: ArcSwap<Vec<Arc<ActiveTelop>>>,
    states: DashMap<i64, TelopMatchState>,
}

impl Default for TelopTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TelopTable {
    pub fn new() -> Self {
        Self {
            telops: ArcSwap::from_pointee(Vec::new()),
            states: DashMap::new(),
        }
    }

    /// Replace the definition list, compiling matchers once.
    ///
    /// Match states of removed telops are left in place; the lifecycle
    /// manager destroys them (persisting positions) on its close pass.
    pub fn set_definitions(&self, definitions: Vec<TelopDefinition>) {
        let compiled: Vec<Arc<ActiveTelop>> = definitions
            .into_iter()
            .map(|def| Arc::new(ActiveTelop::compile(def)))
            .collect();
        info!(telops = compiled.len(), "telop definitions loaded");
        self.telops.store(Arc::new(compiled));
    }

    /// Current compiled definitions (cheap clone of the Arc list).
    pub fn telops(&self) -> Arc<Vec<Arc<ActiveTelop>>> {
        self.telops.load_full()
    }

    pub fn find(&self, id: i64) -> Option<Arc<ActiveTelop>> {
        self.telops.load().iter().find(|t| t.id() == id).cloned()
    }

    /// Run `f` against the match state for `id`, creating it empty on first
    /// reference. Only this telop's map shard is locked.
    pub fn with_state<R>(&self, id: i64, f: impl FnOnce(&mut TelopMatchState) -> R) -> R {
        let mut entry = self.states.entry(id).or_default();
        f(entry.value_mut())
    }

    /// Snapshot of a telop's match state, if one exists.
    pub fn state(&self, id: i64) -> Option<TelopMatchState> {
        self.states.get(&id).map(|s| s.value().clone())
    }

    /// Destroy the match state for a closed telop.
    pub fn remove_state(&self, id: i64) {
        self.states.remove(&id);
    }
}
