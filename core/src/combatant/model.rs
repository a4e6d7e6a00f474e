//! Immutable combatant model
//!
//! Built once per poll round from the telemetry source's raw rows and never
//! mutated afterwards; a new poll replaces the whole table. Identity across
//! rounds is not guaranteed by the source, so nothing here should be cached
//! past the snapshot that carries it.

use crate::combatant::job::{self, Role};
use crate::telemetry::RawCombatant;

/// Entity type discriminator as reported by the telemetry source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntityKind {
    Player,
    Monster,
    Npc,
    #[default]
    Unknown,
}

impl EntityKind {
    /// Decode the source's type byte
    pub fn from_raw(kind: u8) -> Self {
        match kind {
            1 => EntityKind::Player,
            2 => EntityKind::Monster,
            3 => EntityKind::Npc,
            _ => EntityKind::Unknown,
        }
    }
}

/// One combatant at the time of a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Combatant {
    pub id: u32,
    /// Owning entity id (pet -> owner), 0 when independent
    pub owner_id: u32,
    pub job: u8,
    pub kind: EntityKind,
    pub level: u32,
    pub current_hp: i32,
    pub max_hp: i32,
    pub current_mp: i32,
    pub max_mp: i32,
    pub current_tp: i32,

    /// Full display name
    pub name: String,
    /// `Alice Wonder` -> `Alice W.`
    pub name_fi: String,
    /// `Alice Wonder` -> `A. Wonder`
    pub name_if: String,
    /// `Alice Wonder` -> `A. W.`
    pub name_ii: String,
}

impl Combatant {
    /// Translate a raw telemetry row into the immutable model.
    ///
    /// The abbreviated name forms are precomputed here so the party name
    /// resolver is a pure string-replace pass.
    pub fn from_raw(raw: RawCombatant) -> Self {
        let kind = EntityKind::from_raw(raw.kind);
        let (name_fi, name_if, name_ii) = abbreviate(&raw.name, kind);

        Self {
            id: raw.id,
            owner_id: raw.owner_id,
            job: raw.job,
            kind,
            level: raw.level,
            current_hp: raw.current_hp,
            max_hp: raw.max_hp,
            current_mp: raw.current_mp,
            max_mp: raw.max_mp,
            current_tp: raw.current_tp,
            name: raw.name,
            name_fi,
            name_if,
            name_ii,
        }
    }

    /// Three-letter job tag, empty for unknown job codes
    pub fn job_tag(&self) -> &'static str {
        job::job_tag(self.job)
    }

    /// Party role derived from the job code
    pub fn role(&self) -> Role {
        job::job_role(self.job)
    }
}

/// Compute the three abbreviated forms of a combatant name.
///
/// Player names are `First Last`; everything else (and single-word player
/// names) keeps the full name in all three forms so substitution never
/// invents abbreviations for monsters or pets.
fn abbreviate(name: &str, kind: EntityKind) -> (String, String, String) {
    if kind == EntityKind::Player {
        let mut parts = name.split_whitespace();
        if let (Some(first), Some(last), None) = (parts.next(), parts.next(), parts.next())
            && let (Some(f), Some(l)) = (first.chars().next(), last.chars().next())
        {
            return (
                format!("{first} {l}."),
                format!("{f}. {last}"),
                format!("{f}. {l}."),
            );
        }
    }
    (name.to_string(), name.to_string(), name.to_string())
}
