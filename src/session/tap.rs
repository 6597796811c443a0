//! Tap handling
//!
//! One call per click on the character: advances the fast-tap streak,
//! score, tap cycle and picks the slap sound.

use super::state::{GameSession, ImageSet, Phase, Session};
use crate::consts::*;
use crate::error::SessionError;

/// Slap sound to play for a tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundVariant {
    /// Regular slap
    Standard,
    /// One-shot slap for the first fast-tap streak of a round
    Alternate,
}

/// Result of a single tap, consumed by the feedback layer
#[derive(Debug, Clone, PartialEq)]
pub struct TapOutcome {
    pub score: u64,
    pub tap_count: u32,
    pub fast_tap_count: u32,
    /// Image set after this tap
    pub image_set: ImageSet,
    /// This tap switched the round to image set 2
    pub unlocked_image_set: bool,
    /// None once the streak is past the threshold and the variant has fired
    pub sound: Option<SoundVariant>,
}

/// Apply one tap at `now_ms` to `session`
pub fn apply_tap(session: &mut Session, now_ms: f64) -> TapOutcome {
    // Fast-tap streak
    let fast = session
        .last_tap_ms
        .is_some_and(|last| now_ms - last < FAST_TAP_WINDOW_MS);
    session.fast_tap_count = if fast {
        session.fast_tap_count + 1
    } else {
        1
    };
    session.last_tap_ms = Some(now_ms);

    // Tap cycle; the first wraparound switches to image set 2 for the round
    let mut unlocked_image_set = false;
    session.tap_count += 1;
    if session.tap_count >= TAPS_PER_CYCLE {
        session.tap_count = 0;
        unlocked_image_set = session.image_set == ImageSet::First;
        session.image_set = ImageSet::Second;
    }

    session.score += TAP_SCORE;

    let sound = if session.fast_tap_count >= FAST_TAP_THRESHOLD {
        if session.slap_variant_played {
            None
        } else {
            session.slap_variant_played = true;
            Some(SoundVariant::Alternate)
        }
    } else {
        Some(SoundVariant::Standard)
    };

    TapOutcome {
        score: session.score,
        tap_count: session.tap_count,
        fast_tap_count: session.fast_tap_count,
        image_set: session.image_set,
        unlocked_image_set,
        sound,
    }
}

impl GameSession {
    /// Register a tap. Only valid while playing.
    pub fn register_tap(&mut self, now_ms: f64) -> Result<TapOutcome, SessionError> {
        self.require(Phase::Playing, "tap")?;
        let outcome = apply_tap(self.session_mut(), now_ms);
        if outcome.unlocked_image_set {
            log::debug!("Image set 2 unlocked at score {}", outcome.score);
        }
        Ok(outcome)
    }
}
