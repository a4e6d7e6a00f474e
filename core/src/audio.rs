//! Audio collaborator boundary.
//!
//! A cue is either a path to a sound file or free text for the host's
//! text-to-speech engine; the player decides which it got. Playback itself
//! lives outside the engine.

/// Sink for match/delay notification cues.
pub trait AudioPlayer: Send + Sync {
    /// Play a cue. Blank cues are ignored by implementations.
    fn play(&self, cue: &str);
}

/// Player that discards every cue (tests, headless runs).
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioPlayer for NullAudio {
    fn play(&self, _cue: &str) {}
}

/// Play an optional cue, skipping `None` and blank strings.
pub fn play_cue(player: &dyn AudioPlayer, cue: Option<&str>) {
    if let Some(cue) = cue
        && !cue.trim().is_empty()
    {
        player.play(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting(AtomicUsize);

    impl AudioPlayer for Counting {
        fn play(&self, _cue: &str) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn play_cue_skips_blank_and_missing_cues() {
        let player = Counting::default();
        play_cue(&player, None);
        play_cue(&player, Some(""));
        play_cue(&player, Some("   "));
        assert_eq!(player.0.load(Ordering::SeqCst), 0);

        play_cue(&player, Some("alarm.wav"));
        assert_eq!(player.0.load(Ordering::SeqCst), 1);

        // The null player accepts anything and does nothing
        NullAudio.play("spoken text");
    }
}
