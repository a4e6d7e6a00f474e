//! Log line matching against the telop table
//!
//! Lines are processed in arrival order; for each line every active telop is
//! evaluated independently and in parallel. A telop only ever writes its own
//! match state, so the pass shares nothing across telop ids beyond the
//! snapshot it reads. Within a batch, a later line's match overwrites an
//! earlier one for the same telop (the state records the current match, not
//! a history).

use std::sync::Arc;

use chrono::NaiveDateTime;
use rayon::prelude::*;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::audio::{AudioPlayer, play_cue};
use crate::combatant::{SnapshotStore, replace_party_member_names};
use crate::settings::SettingsHandle;

use super::matching::ActiveTelop;
use super::table::TelopTable;

pub struct TickerMatcher {
    table: Arc<TelopTable>,
    snapshots: Arc<SnapshotStore>,
    settings: Arc<SettingsHandle>,
    audio: Arc<dyn AudioPlayer>,
    /// Telop ids whose visibility should be recomputed immediately
    wake: UnboundedSender<i64>,
}

impl TickerMatcher {
    pub fn new(
        table: Arc<TelopTable>,
        snapshots: Arc<SnapshotStore>,
        settings: Arc<SettingsHandle>,
        audio: Arc<dyn AudioPlayer>,
        wake: UnboundedSender<i64>,
    ) -> Self {
        Self {
            table,
            snapshots,
            settings,
            audio,
            wake,
        }
    }

    /// Match a batch of newly arrived log lines against every telop.
    pub fn match_lines(&self, lines: &[String], now: NaiveDateTime) {
        if lines.is_empty() {
            return;
        }

        let telops = self.table.telops();
        if telops.is_empty() {
            return;
        }

        let player = self.snapshots.player();
        let player_tag = player.as_ref().map(|p| p.job_tag());

        for line in lines {
            let line_upper = line.to_uppercase();

            telops.par_iter().for_each(|telop| {
                self.match_one(telop, line, &line_upper, player_tag, now);
            });
        }
    }

    fn match_one(
        &self,
        telop: &ActiveTelop,
        line: &str,
        line_upper: &str,
        player_tag: Option<&str>,
        now: NaiveDateTime,
    ) {
        // Condition gate: skips the hide condition too
        if !telop.is_active(player_tag) {
            return;
        }

        if let Some(matched) = telop.try_match(line, line_upper) {
            let party = self.snapshots.party();
            let style = self.settings.load().name_style;
            let message = replace_party_member_names(&matched.message, &party, style);

            self.table.with_state(telop.id(), |state| {
                state.record_match(now, &message, line, telop.def.add_message);
            });

            debug!(telop_id = telop.id(), title = %telop.def.title, "telop matched");

            play_cue(self.audio.as_ref(), telop.def.match_sound.as_deref());
            play_cue(self.audio.as_ref(), matched.tts.as_deref());

            // Receiver gone just means no one wants immediate refreshes
            let _ = self.wake.send(telop.id());
            return;
        }

        if telop.try_match_hide(line, line_upper) {
            self.table.with_state(telop.id(), |state| {
                state.force_hide = true;
            });
            debug!(telop_id = telop.id(), "telop force-hide matched");
            let _ = self.wake.send(telop.id());
        }
    }
}
