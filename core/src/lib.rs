pub mod audio;
pub mod combatant;
pub mod config;
pub mod settings;
pub mod telemetry;
pub mod telops;

// Re-exports for convenience
pub use audio::{AudioPlayer, NullAudio};
pub use combatant::{
    AdaptiveInterval, Combatant, CombatantPoller, CombatantSnapshot, EntityKind, Role,
    SnapshotStore, replace_party_member_names,
};
pub use config::AppConfigExt;
pub use settings::SettingsHandle;
pub use telemetry::{DetachedSource, RawCombatant, TelemetryError, TelemetrySource};
pub use telop_types::{AppConfig, NameStyle, OverlaySettings, TelopPosition};
pub use telops::{
    PositionSink, SurfaceFactory, TelopDefinition, TelopError, TelopMatchState,
    TelopOverlayManager, TelopSurface, TelopTable, TickerMatcher, load_telops_from_dir,
};
