//! Shared configuration types for the telop overlay engine
//!
//! This crate contains the serializable settings shared between the engine
//! (telop-core) and its hosts. Persistence lives in telop-core; these types
//! only describe the data.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─────────────────────────────────────────────────────────────────────────────
// Party Name Display
// ─────────────────────────────────────────────────────────────────────────────

/// How party member names are rewritten inside telop messages.
///
/// `Alice Wonder` has three abbreviated forms: `Alice W.` (full-initial),
/// `A. Wonder` (initial-full) and `A. W.` (initial-initial).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameStyle {
    /// Rewrite any abbreviated form back to the full name
    #[default]
    FullName,
    /// `Alice Wonder` -> `Alice W.`
    FullInitial,
    /// `Alice Wonder` -> `A. Wonder`
    InitialFull,
    /// `Alice Wonder` -> `A. W.`
    InitialInitial,
}

// ─────────────────────────────────────────────────────────────────────────────
// Overlay Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// Screen position of a telop window, persisted across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TelopPosition {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
}

impl TelopPosition {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Overlay Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Runtime display toggles for the telop overlays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlaySettings {
    /// Master visibility switch for every overlay
    #[serde(default = "default_true")]
    pub overlay_visible: bool,

    /// Keep telops on screen while the overlay is enabled, ignoring the
    /// per-telop delay/display window (layout/editing mode)
    #[serde(default)]
    pub telop_always_visible: bool,

    /// Let mouse events pass through the overlay windows
    #[serde(default)]
    pub click_through: bool,

    /// Party member name rewriting applied to telop messages
    #[serde(default)]
    pub name_style: NameStyle,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            overlay_visible: true,
            telop_always_visible: false,
            click_through: false,
            name_style: NameStyle::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Application Config
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level application configuration, persisted as one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory containing live combat log files
    #[serde(default)]
    pub log_directory: String,

    /// Directory containing telop definition TOML files
    #[serde(default)]
    pub telop_directory: String,

    /// Base interval between combatant snapshot polls, in milliseconds.
    /// The poller corrects this by the observed fetch cost.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default)]
    pub overlay: OverlaySettings,

    /// Last known screen position per telop id, written back when a telop
    /// window closes. Keys are stringified ids (TOML maps require string
    /// keys).
    #[serde(default)]
    pub positions: HashMap<String, TelopPosition>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_directory: String::new(),
            telop_directory: String::new(),
            poll_interval_ms: default_poll_interval_ms(),
            overlay: OverlaySettings::default(),
            positions: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Config with a specific log directory (used for platform defaults)
    pub fn with_log_directory(log_directory: String) -> Self {
        Self {
            log_directory,
            ..Self::default()
        }
    }

    /// Persisted position for a telop id
    pub fn position_of(&self, id: i64) -> Option<TelopPosition> {
        self.positions.get(&id.to_string()).copied()
    }

    /// Record a telop's position for persistence
    pub fn set_position(&mut self, id: i64, position: TelopPosition) {
        self.positions.insert(id.to_string(), position);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Serde Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    30
}
