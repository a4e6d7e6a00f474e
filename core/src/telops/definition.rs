//! Telop definition types
//!
//! Definitions are templates loaded from TOML config files that describe
//! what to match in the log stream and how the resulting telop behaves.

use serde::{Deserialize, Serialize};
use telop_types::TelopPosition;

/// Definition of one telop (loaded from config)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelopDefinition {
    /// Unique identifier for this telop
    pub id: i64,

    /// Display title shown on the telop window
    pub title: String,

    /// Whether this telop is currently enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    // ─── Matching ───────────────────────────────────────────────────────────
    /// Literal keyword, or a regular expression when `regex_enabled` is set.
    /// Blank means "no primary condition configured".
    #[serde(default)]
    pub keyword: String,

    /// Secondary condition that force-hides the telop when it matches
    #[serde(default)]
    pub keyword_to_hide: String,

    /// Treat `keyword` as a regular expression
    #[serde(default)]
    pub regex_enabled: bool,

    /// Treat `keyword_to_hide` as a regular expression
    #[serde(default)]
    pub regex_to_hide_enabled: bool,

    // ─── Message ────────────────────────────────────────────────────────────
    /// Message template. With a regex keyword, capture references (`$1`,
    /// `${name}`) are expanded from the matched line.
    #[serde(default)]
    pub message: String,

    /// Append matches (newline-joined) instead of replacing the message
    #[serde(default)]
    pub add_message: bool,

    // ─── Timing ─────────────────────────────────────────────────────────────
    /// Seconds between the match and the telop becoming visible
    #[serde(default)]
    pub delay_secs: f64,

    /// Seconds the telop stays visible once shown
    #[serde(default = "default_display_secs")]
    pub display_secs: f64,

    // ─── Notification ───────────────────────────────────────────────────────
    /// Sound file played on match
    pub match_sound: Option<String>,

    /// Text spoken on match. With a regex keyword, capture references are
    /// expanded from the matched line.
    pub match_tts: Option<String>,

    /// Sound file played when the display window opens (after the delay)
    pub delay_sound: Option<String>,

    /// Text spoken when the display window opens
    pub delay_tts: Option<String>,

    // ─── Display ────────────────────────────────────────────────────────────
    /// Animate a countdown over the display window
    #[serde(default = "default_true")]
    pub progress_bar_enabled: bool,

    /// Initial window position
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,

    // ─── Conditions ─────────────────────────────────────────────────────────
    /// Only match while the local player has one of these job tags
    /// (empty = unconditional)
    #[serde(default)]
    pub jobs: Vec<String>,
}

impl TelopDefinition {
    /// Initial position from the definition file
    pub fn position(&self) -> TelopPosition {
        TelopPosition::new(self.left, self.top)
    }

    /// Display window length
    pub fn display_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.display_secs.max(0.0))
    }
}

/// File-level container: one TOML file holds any number of `[[telop]]` entries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelopConfig {
    #[serde(default, rename = "telop")]
    pub telops: Vec<TelopDefinition>,
}

// ═══════════════════════════════════════════════════════════════════════════
// Serde Helpers
// ═══════════════════════════════════════════════════════════════════════════

fn default_true() -> bool {
    true
}

fn default_display_secs() -> f64 {
    2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_telop_config() {
        let toml = r#"
[[telop]]
id = 1
title = "Raid wide"
keyword = "uses Meteor"
message = "SPREAD"
display_secs = 5.0
"#;
        let config: TelopConfig = toml::from_str(toml).expect("failed to parse TOML");
        assert_eq!(config.telops.len(), 1);

        let telop = &config.telops[0];
        assert_eq!(telop.id, 1);
        assert!(telop.enabled);
        assert!(!telop.regex_enabled);
        assert!(!telop.add_message);
        assert_eq!(telop.delay_secs, 0.0);
        assert_eq!(telop.display_secs, 5.0);
        assert!(telop.progress_bar_enabled);
        assert!(telop.jobs.is_empty());
    }

    #[test]
    fn parse_full_telop_config() {
        let toml = r#"
[[telop]]
id = 7
title = "Tank buster"
keyword = "(?<target>\\w+ \\w+) suffers the effect of Vulnerability"
regex_enabled = true
keyword_to_hide = "Vulnerability fades"
message = "BUSTER on ${target}"
add_message = true
delay_secs = 1.5
display_secs = 4.0
match_tts = "buster on ${target}"
delay_sound = "alarm.wav"
jobs = ["PLD", "WAR"]
left = 120.0
top = 300.0
"#;
        let config: TelopConfig = toml::from_str(toml).expect("failed to parse TOML");
        let telop = &config.telops[0];
        assert!(telop.regex_enabled);
        assert!(telop.add_message);
        assert_eq!(telop.jobs, vec!["PLD", "WAR"]);
        assert_eq!(telop.position(), telop_types::TelopPosition::new(120.0, 300.0));
        assert_eq!(telop.display_duration(), std::time::Duration::from_secs(4));
    }
}
