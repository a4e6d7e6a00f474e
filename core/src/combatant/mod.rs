//! Combatant state: model, snapshot store, poller, and name substitution
//!
//! This module owns the always-consistent view of the external combatant
//! table. The poller rebuilds the whole table every round and publishes it
//! atomically; everything downstream reads immutable snapshots.

pub mod job;
mod model;
mod poller;
mod resolver;
mod snapshot;

pub use job::{JobInfo, Role};
pub use model::{Combatant, EntityKind};
pub use poller::{AdaptiveInterval, CombatantPoller};
pub use resolver::replace_party_member_names;
pub use snapshot::{CombatantSnapshot, PartyRoleGroup, SnapshotStore};
