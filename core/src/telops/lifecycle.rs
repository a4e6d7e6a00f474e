//! Telop overlay lifecycle
//!
//! Owns one surface handle per telop id and drives it through
//! `Unmounted -> Mounted(Hidden|Visible) -> PendingClose -> Closed`.
//! Visibility is computed from the match state's timestamp plus the
//! definition's delay/display window; closing is deferred so garbage
//! collection and user-initiated close-all funnel through the same pass,
//! which persists final positions in one batch.
//!
//! All surface mutation happens on the caller's context: the host is
//! expected to call `refresh`/`execute_close` from its single rendering
//! task and marshal nothing else.

use std::sync::Arc;

use chrono::NaiveDateTime;
use hashbrown::{HashMap, HashSet};
use telop_types::{OverlaySettings, TelopPosition};
use tracing::{debug, info, warn};

use crate::audio::{AudioPlayer, play_cue};
use crate::settings::SettingsHandle;

use super::matching::ActiveTelop;
use super::surface::{PositionSink, SurfaceFactory, TelopSurface};
use super::table::TelopTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandleState {
    Hidden,
    Visible,
    PendingClose,
}

struct TelopHandle {
    surface: Box<dyn TelopSurface>,
    state: HandleState,
}

impl TelopHandle {
    /// Show; true when this call transitioned the handle from hidden.
    fn show(&mut self) -> bool {
        let was_hidden = self.state == HandleState::Hidden;
        if was_hidden {
            self.surface.set_visible(true);
            self.state = HandleState::Visible;
        }
        was_hidden
    }

    fn hide(&mut self) {
        if self.state == HandleState::Visible {
            self.surface.set_visible(false);
            self.state = HandleState::Hidden;
        }
    }
}

pub struct TelopOverlayManager {
    table: Arc<TelopTable>,
    settings: Arc<SettingsHandle>,
    audio: Arc<dyn AudioPlayer>,
    factory: Box<dyn SurfaceFactory>,
    handles: HashMap<i64, TelopHandle>,
}

impl TelopOverlayManager {
    pub fn new(
        table: Arc<TelopTable>,
        settings: Arc<SettingsHandle>,
        audio: Arc<dyn AudioPlayer>,
        factory: Box<dyn SurfaceFactory>,
    ) -> Self {
        Self {
            table,
            settings,
            audio,
            factory,
            handles: HashMap::new(),
        }
    }

    /// Recompute and apply visibility for every defined telop.
    pub fn refresh(&mut self, now: NaiveDateTime) {
        let telops = self.table.telops();
        let settings = self.settings.load();
        for telop in telops.iter() {
            refresh_one(
                &mut self.handles,
                &mut *self.factory,
                &self.table,
                self.audio.as_ref(),
                &settings,
                telop,
                now,
            );
        }
    }

    /// Recompute a single telop immediately (match notification path).
    pub fn refresh_telop(&mut self, id: i64, now: NaiveDateTime) {
        if let Some(telop) = self.table.find(id) {
            let settings = self.settings.load();
            refresh_one(
                &mut self.handles,
                &mut *self.factory,
                &self.table,
                self.audio.as_ref(),
                &settings,
                &telop,
                now,
            );
        }
    }

    /// Mark every handle whose definition no longer exists for close.
    pub fn garbage_collect(&mut self) {
        let telops = self.table.telops();
        let live: HashSet<i64> = telops.iter().map(|t| t.id()).collect();

        for (&id, handle) in self.handles.iter_mut() {
            if !live.contains(&id) && handle.state != HandleState::PendingClose {
                debug!(telop_id = id, "telop definition gone, deferring close");
                handle.state = HandleState::PendingClose;
            }
        }
    }

    /// Mark every handle for close (overlay-wide hide toggle). The actual
    /// teardown happens on the next [`Self::execute_close`] pass.
    pub fn close_telops(&mut self) {
        for handle in self.handles.values_mut() {
            handle.state = HandleState::PendingClose;
        }
    }

    /// Hide every mounted telop without closing it.
    pub fn hide_telops(&mut self) {
        for handle in self.handles.values_mut() {
            if handle.state != HandleState::PendingClose {
                handle.hide();
            }
        }
    }

    /// Close every `PendingClose` handle: persist its final position, tear
    /// down the surface, and destroy the match state. One batched persist
    /// call follows the whole pass.
    pub fn execute_close(&mut self, sink: &mut dyn PositionSink) {
        let pending: Vec<i64> = self
            .handles
            .iter()
            .filter(|(_, h)| h.state == HandleState::PendingClose)
            .map(|(&id, _)| id)
            .collect();

        if pending.is_empty() {
            return;
        }

        let mut closed = Vec::with_capacity(pending.len());
        for id in pending {
            if let Some(mut handle) = self.handles.remove(&id) {
                let position = handle.surface.position();
                handle.surface.close();
                self.table.remove_state(id);
                closed.push((id, position));
            }
        }

        info!(closed = closed.len(), "telop windows closed");
        if let Err(e) = sink.persist_positions(&closed) {
            warn!(error = %e, "failed to persist telop positions");
        }
    }

    /// Last known position for a telop: the live surface if mounted, the
    /// tracked state otherwise, the definition as a final fallback.
    pub fn location(&self, id: i64) -> Option<TelopPosition> {
        if let Some(handle) = self.handles.get(&id) {
            return Some(handle.surface.position());
        }
        if let Some(state) = self.table.state(id) {
            return Some(state.position);
        }
        self.table.find(id).map(|t| t.def.position())
    }

    /// Move a telop window (or pre-position an unmounted one).
    pub fn set_location(&mut self, id: i64, position: TelopPosition) {
        if let Some(handle) = self.handles.get_mut(&id) {
            handle.surface.set_position(position);
        }
        self.table.with_state(id, |s| s.position = position);
    }

    /// Number of live handles (pending-close included until executed).
    pub fn mounted(&self) -> usize {
        self.handles.len()
    }
}

fn refresh_one(
    handles: &mut HashMap<i64, TelopHandle>,
    factory: &mut dyn SurfaceFactory,
    table: &TelopTable,
    audio: &dyn AudioPlayer,
    settings: &OverlaySettings,
    telop: &ActiveTelop,
    now: NaiveDateTime,
) {
    let id = telop.id();

    let handle = handles.entry(id).or_insert_with(|| {
        let mut surface = factory.create(&telop.def);
        surface.set_position(telop.def.position());
        surface.set_click_through(settings.click_through);
        surface.set_visible(false);
        debug!(telop_id = id, title = %telop.def.title, "telop window mounted");
        TelopHandle {
            surface,
            state: HandleState::Hidden,
        }
    });

    if handle.state == HandleState::PendingClose {
        return;
    }

    // Track the live position so it survives past the display window
    let position = handle.surface.position();
    table.with_state(id, |state| state.position = position);

    let state = table.state(id).unwrap_or_default();

    // Layout mode: keep everything on screen, no timing. Force-hide is
    // still honored here.
    if settings.overlay_visible && settings.telop_always_visible {
        if state.force_hide {
            handle.hide();
            table.with_state(id, |s| s.clear_display());
            return;
        }
        if !handle.surface.is_dragging() {
            let text = if state.message.is_empty() {
                &telop.def.message
            } else {
                &state.message
            };
            handle.surface.set_text(text);
            if handle.show() && telop.def.progress_bar_enabled {
                handle.surface.start_progress(telop.def.display_duration());
            }
        }
        return;
    }

    let Some(matched_at) = state.matched_at else {
        handle.hide();
        if !state.message.is_empty() {
            table.with_state(id, |s| s.message.clear());
        }
        return;
    };

    if state.force_hide {
        handle.hide();
        table.with_state(id, |s| s.clear_display());
        return;
    }

    let start = matched_at + chrono::Duration::milliseconds((telop.def.delay_secs * 1000.0) as i64);
    let end = start + chrono::Duration::milliseconds((telop.def.display_secs * 1000.0) as i64);

    if start <= now && now <= end {
        handle.surface.set_text(&state.message);
        if handle.show() {
            if telop.def.progress_bar_enabled {
                handle.surface.start_progress(telop.def.display_duration());
            }
            // Window-open notification, once per match
            if !state.delay_fired {
                table.with_state(id, |s| s.delay_fired = true);
                play_cue(audio, telop.def.delay_sound.as_deref());
                play_cue(audio, telop.def.delay_tts.as_deref());
            }
        }
    } else {
        handle.hide();
        if now > end {
            // One-shot expiry: only a new match re-arms the window
            table.with_state(id, |s| s.clear_display());
        }
    }
}
