//! Hot-swappable overlay settings
//!
//! The matcher and the lifecycle manager both read display settings on every
//! pass; the host replaces them atomically when the user changes config.

use std::sync::Arc;

use arc_swap::ArcSwap;
use telop_types::OverlaySettings;

pub struct SettingsHandle {
    current: ArcSwap<OverlaySettings>,
}

impl Default for SettingsHandle {
    fn default() -> Self {
        Self::new(OverlaySettings::default())
    }
}

impl SettingsHandle {
    pub fn new(settings: OverlaySettings) -> Self {
        Self {
            current: ArcSwap::from_pointee(settings),
        }
    }

    pub fn load(&self) -> Arc<OverlaySettings> {
        self.current.load_full()
    }

    pub fn store(&self, settings: OverlaySettings) {
        self.current.store(Arc::new(settings));
    }
}
