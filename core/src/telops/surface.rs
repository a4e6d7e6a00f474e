//! Rendering and persistence collaborator boundaries
//!
//! The engine never creates windows itself. The host supplies a
//! [`SurfaceFactory`]; the lifecycle manager computes visibility and applies
//! it through [`TelopSurface`] on whatever single-threaded context the host
//! calls `refresh` from. Position persistence goes through [`PositionSink`],
//! batched once per close pass.

use std::time::Duration;

use telop_types::TelopPosition;

use super::definition::TelopDefinition;
use super::error::TelopError;

/// One renderable telop window.
pub trait TelopSurface: Send {
    fn set_text(&mut self, text: &str);

    fn set_visible(&mut self, visible: bool);

    /// Start the countdown animation over the display window
    fn start_progress(&mut self, duration: Duration);

    fn position(&self) -> TelopPosition;

    fn set_position(&mut self, position: TelopPosition);

    /// Let mouse events pass through the window
    fn set_click_through(&mut self, enabled: bool);

    /// Whether the user is currently dragging this window
    fn is_dragging(&self) -> bool {
        false
    }

    fn close(&mut self);
}

/// Creates surfaces on first refresh of a telop id.
pub trait SurfaceFactory: Send {
    fn create(&mut self, definition: &TelopDefinition) -> Box<dyn TelopSurface>;
}

/// Write path into the configuration collaborator for closed-telop positions.
pub trait PositionSink {
    /// Persist the final positions of a close pass. Called at most once per
    /// pass, with every closed telop in the batch.
    fn persist_positions(&mut self, positions: &[(i64, TelopPosition)]) -> Result<(), TelopError>;
}
