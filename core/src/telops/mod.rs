//! Telop system
//!
//! This module provides:
//! - **Definitions**: Templates that describe telops (loaded from TOML)
//! - **Matching**: Per-line evaluation of primary and force-hide conditions
//! - **Lifecycle**: Timed show/hide of one overlay window per telop
//!
//! The matcher and the lifecycle manager share a [`TelopTable`]; the matcher
//! writes per-telop match state as log lines arrive, the lifecycle manager
//! turns that state into surface updates on each refresh tick.

mod definition;
mod error;
mod lifecycle;
mod loader;
mod matcher;
mod matching;
mod state;
mod surface;
mod table;

#[cfg(test)]
mod matcher_tests;


pub use definition::{TelopConfig, TelopDefinition};
pub use error::TelopError;
pub use lifecycle::TelopOverlayManager;
pub use loader::{load_telops_from_dir, load_telops_from_file};
pub use matcher::TickerMatcher;
pub use matching::{ActiveTelop, PrimaryMatch};
pub use state::TelopMatchState;
pub use surface::{PositionSink, SurfaceFactory, TelopSurface};
pub use table::TelopTable;
