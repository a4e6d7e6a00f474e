//! Compiled telop matchers
//!
//! A [`TelopDefinition`] is compiled once into an [`ActiveTelop`]: regex
//! keywords become compiled patterns, literal keywords are pre-uppercased
//! for case-insensitive containment. A pattern that fails to compile is
//! logged and degrades to the literal path, matching the error taxonomy for
//! invalid configured patterns.

use regex::Regex;
use tracing::warn;

use super::definition::TelopDefinition;

/// Outcome of a primary match: the expanded message and optional TTS text.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryMatch {
    pub message: String,
    pub tts: Option<String>,
}

/// A telop definition with its matchers compiled.
#[derive(Debug)]
pub struct ActiveTelop {
    pub def: TelopDefinition,
    regex: Option<Regex>,
    regex_to_hide: Option<Regex>,
    keyword_upper: String,
    keyword_to_hide_upper: String,
}

impl ActiveTelop {
    pub fn compile(def: TelopDefinition) -> Self {
        let regex = def
            .regex_enabled
            .then(|| compile_pattern(def.id, "keyword", &def.keyword))
            .flatten();
        let regex_to_hide = def
            .regex_to_hide_enabled
            .then(|| compile_pattern(def.id, "keyword_to_hide", &def.keyword_to_hide))
            .flatten();

        // Literal comparison uppercases both sides once
        let keyword_upper = if regex.is_some() {
            String::new()
        } else {
            def.keyword.trim().to_uppercase()
        };
        let keyword_to_hide_upper = if regex_to_hide.is_some() {
            String::new()
        } else {
            def.keyword_to_hide.trim().to_uppercase()
        };

        Self {
            def,
            regex,
            regex_to_hide,
            keyword_upper,
            keyword_to_hide_upper,
        }
    }

    pub fn id(&self) -> i64 {
        self.def.id
    }

    /// Whether this telop may match at all right now.
    ///
    /// A disabled telop, or one whose job filter excludes the current
    /// player's job, is skipped entirely: neither the primary nor the hide
    /// condition is evaluated.
    pub fn is_active(&self, player_job_tag: Option<&str>) -> bool {
        if !self.def.enabled {
            return false;
        }
        if self.def.jobs.is_empty() {
            return true;
        }
        match player_job_tag {
            Some(tag) => self.def.jobs.iter().any(|j| j.eq_ignore_ascii_case(tag)),
            None => false,
        }
    }

    /// Evaluate the primary condition against one log line.
    ///
    /// `line_upper` is the caller's pre-uppercased copy, shared across
    /// telops. The pattern path expands capture references into the message
    /// template and the TTS text; the literal path uses both verbatim.
    pub fn try_match(&self, line: &str, line_upper: &str) -> Option<PrimaryMatch> {
        if let Some(regex) = &self.regex {
            let caps = regex.captures(line)?;

            let mut message = String::new();
            caps.expand(&self.def.message, &mut message);

            let tts = self.def.match_tts.as_ref().map(|template| {
                let mut tts = String::new();
                caps.expand(template, &mut tts);
                tts
            });

            return Some(PrimaryMatch { message, tts });
        }

        if self.keyword_upper.is_empty() {
            return None;
        }
        line_upper.contains(&self.keyword_upper).then(|| PrimaryMatch {
            message: self.def.message.clone(),
            tts: self.def.match_tts.clone(),
        })
    }

    /// Evaluate the force-hide condition against one log line.
    pub fn try_match_hide(&self, line: &str, line_upper: &str) -> bool {
        if let Some(regex) = &self.regex_to_hide {
            return regex.is_match(line);
        }
        if self.keyword_to_hide_upper.is_empty() {
            return false;
        }
        line_upper.contains(&self.keyword_to_hide_upper)
    }
}

/// Compile a configured pattern, degrading to "no pattern" on failure.
fn compile_pattern(id: i64, field: &str, pattern: &str) -> Option<Regex> {
    if pattern.trim().is_empty() {
        return None;
    }
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            warn!(telop_id = id, field, error = %e, "invalid telop pattern, falling back to literal matching");
            None
        }
    }
}
