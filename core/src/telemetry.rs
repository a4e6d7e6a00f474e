//! Adapter boundary to the external combatant telemetry source.
//!
//! The engine never talks to a game process directly. Whatever integration
//! mechanism the host environment offers (memory scanner, companion plugin,
//! network feed) is wrapped behind [`TelemetrySource`], and its loosely-typed
//! output is translated once into [`RawCombatant`] transfer structs at this
//! boundary.

use thiserror::Error;

/// One combatant row as delivered by the telemetry source.
///
/// Field layout mirrors the source's scan output; translation into the
/// immutable [`crate::combatant::Combatant`] model happens in the poller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCombatant {
    pub id: u32,
    /// Owning entity id for pets and gauges, 0 for independent combatants
    pub owner_id: u32,
    pub job: u8,
    /// Entity type discriminator byte as reported by the source
    pub kind: u8,
    pub level: u32,
    pub current_hp: i32,
    pub max_hp: i32,
    pub current_mp: i32,
    pub max_mp: i32,
    pub current_tp: i32,
    pub name: String,
}

/// Errors raised by a telemetry source.
///
/// Both variants are recoverable: the poller logs them and backs off, it
/// never terminates on a source failure.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("telemetry source is not attached")]
    Unavailable,

    #[error("failed to fetch {what} from telemetry source")]
    Fetch {
        what: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Narrow interface the snapshot poller consumes.
///
/// Implementations must be cheap to probe via `is_available`; the poller
/// calls it every tick before fetching anything.
pub trait TelemetrySource: Send + Sync {
    /// Whether the source process is attached, initialized and visible.
    fn is_available(&self) -> bool;

    /// Full combatant table for this poll round.
    fn fetch_combatants(&self) -> Result<Vec<RawCombatant>, TelemetryError>;

    /// Current party member ids, in party order.
    ///
    /// Fetched separately from the combatant table; ids with no matching
    /// combatant in the same round are possible and tolerated downstream.
    fn fetch_party_ids(&self) -> Result<Vec<u32>, TelemetryError>;
}

/// Source that is never available.
///
/// Used when no telemetry integration is attached: the matching engine keeps
/// running against static keyword/pattern logic, party-name substitution
/// simply never rewrites anything.
#[derive(Debug, Default)]
pub struct DetachedSource;

impl TelemetrySource for DetachedSource {
    fn is_available(&self) -> bool {
        false
    }

    fn fetch_combatants(&self) -> Result<Vec<RawCombatant>, TelemetryError> {
        Err(TelemetryError::Unavailable)
    }

    fn fetch_party_ids(&self) -> Result<Vec<u32>, TelemetryError> {
        Err(TelemetryError::Unavailable)
    }
}
