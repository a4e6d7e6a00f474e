//! Per-telop runtime match state
//!
//! One [`TelopMatchState`] exists per telop id, created empty on first
//! reference. The matcher writes it on every match; the lifecycle manager
//! reads it each refresh and clears it when the display window elapses or a
//! force-hide lands. It is destroyed (position persisted) when its telop
//! definition disappears.

use chrono::NaiveDateTime;
use telop_types::TelopPosition;

#[derive(Debug, Clone, Default)]
pub struct TelopMatchState {
    /// When the primary condition last matched (None = never / expired)
    pub matched_at: Option<NaiveDateTime>,

    /// Resolved message text; accumulates when the definition appends
    pub message: String,

    /// The log line that produced the current match
    pub matched_log: String,

    /// Secondary condition fired: suppress display regardless of the window
    pub force_hide: bool,

    /// Whether the window-open notification already fired for this match
    pub delay_fired: bool,

    /// Last known screen position, updated from the surface each refresh
    pub position: TelopPosition,
}

impl TelopMatchState {
    /// Record a primary match.
    ///
    /// Replaces or appends the message per `add_message`, arms the display
    /// window from `now`, and clears any pending force-hide and the
    /// window-open latch.
    pub fn record_match(
        &mut self,
        now: NaiveDateTime,
        message: &str,
        log_line: &str,
        add_message: bool,
    ) {
        if !add_message || self.message.is_empty() {
            self.message = message.to_string();
        } else {
            self.message.push('\n');
            self.message.push_str(message);
        }

        self.matched_at = Some(now);
        self.matched_log = log_line.to_string();
        self.force_hide = false;
        self.delay_fired = false;
    }

    /// Clear the display window (expiry or force-hide); a later re-match
    /// re-arms from its own timestamp.
    pub fn clear_display(&mut self) {
        self.matched_at = None;
        self.message.clear();
    }
}
