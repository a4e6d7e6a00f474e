//! Tests for log line matching
//!
//! Verifies primary/force-hide evaluation, condition gating, message
//! resolution and the immediate-refresh notifications.

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use crate::audio::AudioPlayer;
use crate::combatant::{Combatant, CombatantSnapshot, SnapshotStore};
use crate::settings::SettingsHandle;
use crate::telemetry::RawCombatant;
use telop_types::{NameStyle, OverlaySettings};

use super::{TelopDefinition, TelopTable, TickerMatcher};

/// Audio sink that records every cue it is asked to play
#[derive(Default)]
struct RecordingAudio {
    cues: Mutex<Vec<String>>,
}

impl AudioPlayer for RecordingAudio {
    fn play(&self, cue: &str) {
        self.cues.lock().unwrap().push(cue.to_string());
    }
}

fn make_telop(id: i64, keyword: &str, message: &str) -> TelopDefinition {
    TelopDefinition {
        id,
        title: format!("telop {id}"),
        enabled: true,
        keyword: keyword.to_string(),
        keyword_to_hide: String::new(),
        regex_enabled: false,
        regex_to_hide_enabled: false,
        message: message.to_string(),
        add_message: false,
        delay_secs: 0.0,
        display_secs: 2.0,
        match_sound: None,
        match_tts: None,
        delay_sound: None,
        delay_tts: None,
        progress_bar_enabled: true,
        left: 0.0,
        top: 0.0,
        jobs: Vec::new(),
    }
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(20, 0, 0)
        .unwrap()
}

struct Fixture {
    table: Arc<TelopTable>,
    snapshots: Arc<SnapshotStore>,
    settings: Arc<SettingsHandle>,
    audio: Arc<RecordingAudio>,
    matcher: TickerMatcher,
    wake_rx: UnboundedReceiver<i64>,
}

fn fixture(telops: Vec<TelopDefinition>) -> Fixture {
    let table = Arc::new(TelopTable::new());
    table.set_definitions(telops);

    let snapshots = Arc::new(SnapshotStore::new());
    let settings = Arc::new(SettingsHandle::new(OverlaySettings::default()));
    let audio = Arc::new(RecordingAudio::default());
    let (wake_tx, wake_rx) = unbounded_channel();

    let matcher = TickerMatcher::new(
        Arc::clone(&table),
        Arc::clone(&snapshots),
        Arc::clone(&settings),
        Arc::clone(&audio) as Arc<dyn AudioPlayer>,
        wake_tx,
    );

    Fixture {
        table,
        snapshots,
        settings,
        audio,
        matcher,
        wake_rx,
    }
}

fn combatant(id: u32, name: &str, job: u8) -> Combatant {
    Combatant::from_raw(RawCombatant {
        id,
        job,
        kind: 1,
        name: name.to_string(),
        ..Default::default()
    })
}

fn lines(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

#[test]
fn literal_match_is_case_insensitive_and_records_state() {
    let mut fx = fixture(vec![make_telop(1, "boss", "INCOMING")]);

    fx.matcher.match_lines(&lines(&["The BOSS appears."]), now());

    let state = fx.table.state(1).expect("state created on match");
    assert_eq!(state.matched_at, Some(now()));
    assert_eq!(state.message, "INCOMING");
    assert_eq!(state.matched_log, "The BOSS appears.");
    assert!(!state.force_hide);

    assert_eq!(fx.wake_rx.try_recv(), Ok(1));
}

#[test]
fn no_match_creates_no_state() {
    let mut fx = fixture(vec![make_telop(1, "boss", "INCOMING")]);

    fx.matcher.match_lines(&lines(&["all quiet on the front"]), now());

    assert!(fx.table.state(1).is_none());
    assert!(fx.wake_rx.try_recv().is_err());
}

#[test]
fn whitespace_keyword_never_matches() {
    let fx = fixture(vec![make_telop(1, "   ", "never")]);
    fx.matcher.match_lines(&lines(&["anything at all"]), now());
    assert!(fx.table.state(1).is_none());
}

#[test]
fn party_names_are_rewritten_in_the_resolved_message() {
    let fx = fixture(vec![make_telop(1, "stack", "stack on Alice Wonder")]);
    fx.snapshots.publish(CombatantSnapshot::new(
        vec![combatant(1, "Alice Wonder", 24)],
        vec![1],
        1,
    ));
    fx.settings.store(OverlaySettings {
        name_style: NameStyle::FullInitial,
        ..OverlaySettings::default()
    });

    fx.matcher.match_lines(&lines(&["STACK markers appear"]), now());

    assert_eq!(fx.table.state(1).unwrap().message, "stack on Alice W.");
}

#[test]
fn regex_match_expands_captures_and_speaks() {
    let mut telop = make_telop(1, r"(?<target>\w+ \w+) suffers Doom", "cleanse ${target}");
    telop.regex_enabled = true;
    telop.match_sound = Some("doom.wav".to_string());
    telop.match_tts = Some("cleanse ${target}".to_string());
    let fx = fixture(vec![telop]);

    fx.matcher
        .match_lines(&lines(&["Bob Builder suffers Doom"]), now());

    let state = fx.table.state(1).unwrap();
    assert_eq!(state.message, "cleanse Bob Builder");

    let cues = fx.audio.cues.lock().unwrap();
    assert_eq!(*cues, vec!["doom.wav".to_string(), "cleanse Bob Builder".to_string()]);
}

#[test]
fn hide_match_only_sets_force_hide() {
    let mut telop = make_telop(1, "casts Meteor", "RUN");
    telop.keyword_to_hide = "meteor fades".to_string();
    let mut fx = fixture(vec![telop]);

    fx.matcher.match_lines(&lines(&["The Meteor fades away"]), now());

    let state = fx.table.state(1).unwrap();
    assert!(state.force_hide);
    assert!(state.matched_at.is_none());
    assert!(state.message.is_empty());
    assert!(fx.audio.cues.lock().unwrap().is_empty());
    assert_eq!(fx.wake_rx.try_recv(), Ok(1));
}

#[test]
fn primary_match_wins_over_hide_for_the_same_line() {
    // Both conditions match the line; the primary match short-circuits the
    // hide evaluation for this (line, telop) pair.
    let mut telop = make_telop(1, "meteor", "RUN");
    telop.keyword_to_hide = "meteor".to_string();
    let fx = fixture(vec![telop]);

    fx.matcher.match_lines(&lines(&["Meteor falls"]), now());

    let state = fx.table.state(1).unwrap();
    assert_eq!(state.matched_at, Some(now()));
    assert!(!state.force_hide);
}

#[test]
fn rematch_clears_a_pending_force_hide() {
    let mut telop = make_telop(1, "casts Meteor", "RUN");
    telop.keyword_to_hide = "meteor fades".to_string();
    let fx = fixture(vec![telop]);

    fx.matcher.match_lines(&lines(&["The Meteor fades away"]), now());
    assert!(fx.table.state(1).unwrap().force_hide);

    fx.matcher.match_lines(&lines(&["Boss casts Meteor"]), now());
    let state = fx.table.state(1).unwrap();
    assert!(!state.force_hide);
    assert_eq!(state.matched_at, Some(now()));
}

#[test]
fn disabled_telop_skips_both_conditions() {
    let mut telop = make_telop(1, "boss", "INCOMING");
    telop.enabled = false;
    telop.keyword_to_hide = "boss".to_string();
    let fx = fixture(vec![telop]);

    fx.matcher.match_lines(&lines(&["boss appears"]), now());

    assert!(fx.table.state(1).is_none());
}

#[test]
fn job_gate_skips_hide_evaluation_too() {
    let mut telop = make_telop(1, "buster", "MITIGATE");
    telop.jobs = vec!["PLD".to_string()];
    telop.keyword_to_hide = "buster ends".to_string();
    let fx = fixture(vec![telop]);

    // Player is a WHM (job 24): the PLD-gated telop must not even force-hide
    fx.snapshots.publish(CombatantSnapshot::new(
        vec![combatant(1, "Alice Wonder", 24)],
        vec![1],
        1,
    ));
    fx.matcher
        .match_lines(&lines(&["buster ends", "buster incoming"]), now());
    assert!(fx.table.state(1).is_none());

    // Same lines with a PLD player match normally
    fx.snapshots.publish(CombatantSnapshot::new(
        vec![combatant(1, "Alice Wonder", 19)],
        vec![1],
        2,
    ));
    fx.matcher.match_lines(&lines(&["buster incoming"]), now());
    assert_eq!(fx.table.state(1).unwrap().message, "MITIGATE");
}

#[test]
fn later_line_in_a_batch_overwrites_the_earlier_match() {
    let fx = fixture(vec![make_telop(1, "boss", "INCOMING")]);

    fx.matcher
        .match_lines(&lines(&["boss stirs", "boss charges"]), now());

    assert_eq!(fx.table.state(1).unwrap().matched_log, "boss charges");
}

#[test]
fn accumulate_mode_joins_matches_with_newlines() {
    let mut telop = make_telop(1, "adds", "ADDS");
    telop.add_message = true;
    let fx = fixture(vec![telop]);

    fx.matcher
        .match_lines(&lines(&["adds spawn east", "adds spawn west"]), now());

    assert_eq!(fx.table.state(1).unwrap().message, "ADDS\nADDS");
}

#[test]
fn every_telop_is_evaluated_independently() {
    let fx = fixture(vec![
        make_telop(1, "meteor", "RUN"),
        make_telop(2, "doom", "CLEANSE"),
        make_telop(3, "unrelated", "NOPE"),
    ]);

    fx.matcher
        .match_lines(&lines(&["Meteor and DOOM at once"]), now());

    assert!(fx.table.state(1).is_some());
    assert!(fx.table.state(2).is_some());
    assert!(fx.table.state(3).is_none());
}
