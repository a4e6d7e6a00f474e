//! Console-backed collaborators
//!
//! Stand-ins for the rendering and audio layers: a surface that reports
//! telop state transitions through the terminal, an audio sink that logs its
//! cues, and a confy-backed position store. Real windowing and playback live
//! outside the engine; these exercise the same interfaces.

use telop_core::config::AppConfigExt;
use telop_core::telops::{PositionSink, SurfaceFactory, TelopSurface};
use telop_core::{AudioPlayer, TelopDefinition, TelopError};
use telop_types::{AppConfig, TelopPosition};
use tracing::{debug, info};

pub struct ConsoleSurface {
    id: i64,
    title: String,
    text: String,
    visible: bool,
    position: TelopPosition,
}

impl TelopSurface for ConsoleSurface {
    fn set_text(&mut self, text: &str) {
        if self.visible && self.text != text {
            info!(telop_id = self.id, title = %self.title, text, "telop text updated");
        }
        self.text = text.to_string();
    }

    fn set_visible(&mut self, visible: bool) {
        if visible && !self.visible {
            info!(telop_id = self.id, title = %self.title, text = %self.text, "telop shown");
        } else if !visible && self.visible {
            info!(telop_id = self.id, title = %self.title, "telop hidden");
        }
        self.visible = visible;
    }

    fn start_progress(&mut self, duration: std::time::Duration) {
        debug!(
            telop_id = self.id,
            secs = duration.as_secs_f64(),
            "telop progress started"
        );
    }

    fn position(&self) -> TelopPosition {
        self.position
    }

    fn set_position(&mut self, position: TelopPosition) {
        self.position = position;
    }

    fn set_click_through(&mut self, _enabled: bool) {}

    fn close(&mut self) {
        debug!(telop_id = self.id, title = %self.title, "telop window closed");
    }
}

pub struct ConsoleSurfaceFactory;

impl SurfaceFactory for ConsoleSurfaceFactory {
    fn create(&mut self, definition: &TelopDefinition) -> Box<dyn TelopSurface> {
        Box::new(ConsoleSurface {
            id: definition.id,
            title: definition.title.clone(),
            text: String::new(),
            visible: false,
            position: definition.position(),
        })
    }
}

/// Audio sink that reports cues instead of playing them.
pub struct ConsoleAudio;

impl AudioPlayer for ConsoleAudio {
    fn play(&self, cue: &str) {
        info!(cue, "audio cue");
    }
}

/// Position persistence backed by the application config.
pub struct PositionStore {
    config: AppConfig,
}

impl PositionStore {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

impl PositionSink for PositionStore {
    fn persist_positions(&mut self, positions: &[(i64, TelopPosition)]) -> Result<(), TelopError> {
        for &(id, position) in positions {
            self.config.set_position(id, position);
        }
        self.config.clone().save();
        debug!(count = positions.len(), "telop positions persisted");
        Ok(())
    }
}
