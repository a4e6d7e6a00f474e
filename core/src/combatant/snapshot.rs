//! Combatant snapshot store
//!
//! The poller publishes a wholly new [`CombatantSnapshot`] every round; the
//! store swaps it in atomically. Readers always see a combatant table and a
//! party id list from the same fetch round, without ever blocking on the
//! fetch itself.

use std::sync::Arc;

use arc_swap::ArcSwap;
use hashbrown::HashMap;

use crate::combatant::job::Role;
use crate::combatant::model::Combatant;

/// Point-in-time view of the combatant table and party membership.
///
/// Immutable once published. `party_ids` comes from a separate source call
/// than the table, so it may reference ids the table does not contain; those
/// are filtered at read time, never treated as an error.
#[derive(Debug, Default)]
pub struct CombatantSnapshot {
    combatants: Vec<Combatant>,
    index: HashMap<u32, usize>,
    party_ids: Vec<u32>,
    tick: u64,
}

impl CombatantSnapshot {
    pub fn new(combatants: Vec<Combatant>, party_ids: Vec<u32>, tick: u64) -> Self {
        let index = combatants
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id, i))
            .collect();
        Self {
            combatants,
            index,
            party_ids,
            tick,
        }
    }

    pub fn get(&self, id: u32) -> Option<&Combatant> {
        self.index.get(&id).map(|&i| &self.combatants[i])
    }

    /// Combatants in source order
    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn party_ids(&self) -> &[u32] {
        &self.party_ids
    }

    /// Monotonic poll round counter (0 = the empty initial snapshot)
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    /// The local player: the source always reports it as the first row.
    pub fn player(&self) -> Option<&Combatant> {
        self.combatants.first()
    }

    /// Party members in `party_ids` order, dropping ids without a matching
    /// combatant in this snapshot.
    pub fn party(&self) -> Vec<&Combatant> {
        self.party_ids
            .iter()
            .filter_map(|&id| self.get(id))
            .collect()
    }
}

/// Party grouped by role, in fixed display order
#[derive(Debug, Clone)]
pub struct PartyRoleGroup {
    pub role: Role,
    pub label: &'static str,
    pub members: Vec<Combatant>,
}

/// Atomically replaceable holder for the current snapshot.
pub struct SnapshotStore {
    current: ArcSwap<CombatantSnapshot>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    /// Store starting with an empty snapshot (tick 0).
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(CombatantSnapshot::default()),
        }
    }

    /// Replace the current snapshot. Readers holding the previous one keep a
    /// consistent view until they drop it.
    pub fn publish(&self, snapshot: CombatantSnapshot) {
        self.current.store(Arc::new(snapshot));
    }

    /// Current snapshot. Cheap; safe to call from any thread.
    pub fn snapshot(&self) -> Arc<CombatantSnapshot> {
        self.current.load_full()
    }

    /// Owned copy of the current party, in party order.
    pub fn party(&self) -> Vec<Combatant> {
        self.snapshot().party().into_iter().cloned().collect()
    }

    /// Owned copy of the local player, if the source has reported one.
    pub fn player(&self) -> Option<Combatant> {
        self.snapshot().player().cloned()
    }

    /// Party grouped by role (tanks, melee, range, magic, healers), omitting
    /// empty groups.
    pub fn party_by_role(&self) -> Vec<PartyRoleGroup> {
        let snapshot = self.snapshot();
        let party = snapshot.party();

        let groups = [
            (Role::Tank, "TANK"),
            (Role::MeleeDps, "MELEE"),
            (Role::RangeDps, "RANGE"),
            (Role::MagicDps, "MAGIC"),
            (Role::Healer, "HEALER"),
        ];

        groups
            .into_iter()
            .filter_map(|(role, label)| {
                let members: Vec<Combatant> = party
                    .iter()
                    .filter(|c| c.role() == role)
                    .map(|c| (*c).clone())
                    .collect();
                (!members.is_empty()).then_some(PartyRoleGroup {
                    role,
                    label,
                    members,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::RawCombatant;

    fn combatant(id: u32, name: &str, job: u8) -> Combatant {
        Combatant::from_raw(RawCombatant {
            id,
            job,
            kind: 1,
            name: name.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn party_preserves_id_order_and_drops_stale_ids() {
        let snapshot = CombatantSnapshot::new(
            vec![
                combatant(1, "Alice Wonder", 24),
                combatant(2, "Bob Builder", 21),
                combatant(3, "Carol Singer", 25),
            ],
            // 99 has no combatant row: stale party id from a racing fetch
            vec![3, 99, 1],
            1,
        );

        let party = snapshot.party();
        let names: Vec<&str> = party.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Carol Singer", "Alice Wonder"]);
    }

    #[test]
    fn publish_replaces_whole_snapshot() {
        let store = SnapshotStore::new();
        assert_eq!(store.snapshot().tick(), 0);
        assert!(store.party().is_empty());

        store.publish(CombatantSnapshot::new(
            vec![combatant(1, "Alice Wonder", 24)],
            vec![1],
            1,
        ));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.tick(), 1);
        assert_eq!(store.party().len(), 1);

        // A reader holding the old Arc keeps its consistent pair
        store.publish(CombatantSnapshot::new(Vec::new(), Vec::new(), 2));
        assert_eq!(snapshot.tick(), 1);
        assert_eq!(snapshot.party().len(), 1);
        assert_eq!(store.snapshot().tick(), 2);
    }

    #[test]
    fn reader_never_sees_mixed_rounds() {
        // Each published round pairs combatant ids and party ids by tick;
        // a reader must always observe a matching pair.
        let store = Arc::new(SnapshotStore::new());
        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for tick in 1..200u64 {
                    let id = tick as u32;
                    store.publish(CombatantSnapshot::new(
                        vec![combatant(id, "Alice Wonder", 24)],
                        vec![id],
                        tick,
                    ));
                }
            })
        };

        for _ in 0..500 {
            let snapshot = store.snapshot();
            if snapshot.tick() == 0 {
                continue;
            }
            assert_eq!(snapshot.party_ids(), [snapshot.tick() as u32]);
            assert_eq!(snapshot.party().len(), 1);
        }
        writer.join().unwrap();
    }

    #[test]
    fn player_is_first_row() {
        let store = SnapshotStore::new();
        assert!(store.player().is_none());

        store.publish(CombatantSnapshot::new(
            vec![combatant(7, "Alice Wonder", 24), combatant(8, "Bob Builder", 21)],
            vec![],
            1,
        ));
        assert_eq!(store.player().unwrap().id, 7);
    }

    #[test]
    fn party_by_role_groups_in_display_order() {
        let store = SnapshotStore::new();
        store.publish(CombatantSnapshot::new(
            vec![
                combatant(1, "Alice Wonder", 24), // WHM healer
                combatant(2, "Bob Builder", 21),  // WAR tank
                combatant(3, "Carol Singer", 25), // BLM magic
            ],
            vec![1, 2, 3],
            1,
        ));

        let groups = store.party_by_role();
        let labels: Vec<&str> = groups.iter().map(|g| g.label).collect();
        assert_eq!(labels, vec!["TANK", "MAGIC", "HEALER"]);
        assert_eq!(groups[0].members[0].name, "Bob Builder");
    }
}
