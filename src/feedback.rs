//! Per-tap feedback
//!
//! A tap produces a [`TapFeedback`] plan: immediate sink commands plus
//! deferred one-shot tasks. The dispatcher runs the plan against its sinks
//! and schedules the tasks (`setTimeout` on web, [`TimerQueue`] headless).
//! Deferred tasks are independent of each other and of later taps.
//!
//! [`TimerQueue`]: crate::platform::TimerQueue

use crate::consts::*;
use crate::error::PlaybackError;
use crate::session::{ImageSet, SoundVariant, TapOutcome};
use crate::settings::Settings;

/// Idle character, image set 1
pub const IDLE_IMAGE: &str = "assets/before.png";
/// Idle character, image set 2
pub const IDLE_IMAGE_2: &str = "assets/before2.png";
/// Struck character (both sets)
pub const STRUCK_IMAGE: &str = "assets/after.png";

pub const SLAP_SOUND: &str = "assets/slap.mp3.wav";
pub const ALT_SLAP_SOUND: &str = "assets/slap 2.wav";

/// Glyph of the transient slipper marker
pub const MARKER_GLYPH: &str = "\u{1FA74}";
/// Text popped at the tap point
pub const FLOATING_TEXT: &str = "+10";

/// Tap position relative to the game frame (CSS pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Character pose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    Idle,
    Struck,
}

/// Asset path for a pose within an image set
pub fn image_asset(set: ImageSet, state: ImageState) -> &'static str {
    match (state, set) {
        (ImageState::Struck, _) => STRUCK_IMAGE,
        (ImageState::Idle, ImageSet::First) => IDLE_IMAGE,
        (ImageState::Idle, ImageSet::Second) => IDLE_IMAGE_2,
    }
}

impl SoundVariant {
    pub fn asset(&self) -> &'static str {
        match self {
            SoundVariant::Standard => SLAP_SOUND,
            SoundVariant::Alternate => ALT_SLAP_SOUND,
        }
    }
}

pub type MarkerId = u32;

/// Work to run when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Show the idle pose of whatever image set is active at fire time
    RevertImage,
    StopShake,
    RemoveMarker(MarkerId),
}

/// A deferred task with its delay from the tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    pub delay_ms: u32,
    pub task: Deferred,
}

/// Everything a single tap asks the sinks to do
#[derive(Debug, Clone, PartialEq)]
pub struct TapFeedback {
    pub outcome: TapOutcome,
    pub image_set: ImageSet,
    /// None when the round is silent for this tap or audio is muted
    pub sound: Option<SoundVariant>,
    pub volume: f32,
    pub marker: MarkerId,
    pub at: Point,
    pub shake: bool,
    pub scheduled: Vec<Scheduled>,
}

/// Build the feedback plan for a tap
pub fn plan_tap(outcome: TapOutcome, at: Point, marker: MarkerId, settings: &Settings) -> TapFeedback {
    let volume = settings.effective_volume();
    let sound = outcome.sound.filter(|_| volume > 0.0);
    let shake = settings.effective_screen_shake();

    let mut scheduled = vec![Scheduled {
        delay_ms: IMAGE_REVERT_MS,
        task: Deferred::RevertImage,
    }];
    scheduled.push(Scheduled {
        delay_ms: MARKER_TTL_MS,
        task: Deferred::RemoveMarker(marker),
    });
    if shake {
        scheduled.push(Scheduled {
            delay_ms: SHAKE_MS,
            task: Deferred::StopShake,
        });
    }

    TapFeedback {
        image_set: outcome.image_set,
        outcome,
        sound,
        volume,
        marker,
        at,
        shake,
        scheduled,
    }
}

/// Displays the character image
pub trait ImageSink {
    fn show_image(&mut self, set: ImageSet, state: ImageState);
}

/// Plays slap sounds. Errors are logged by the caller and never stop a tap.
pub trait SoundSink {
    fn play_sound(&mut self, variant: SoundVariant, volume: f32) -> Result<(), PlaybackError>;
}

/// Transient per-tap effects
pub trait MarkerSink {
    fn spawn_marker(&mut self, id: MarkerId, at: Point);
    fn remove_marker(&mut self, id: MarkerId);
    fn set_shake(&mut self, on: bool);
    fn pop_text(&mut self, at: Point);
}

/// All feedback collaborators
pub trait FeedbackSinks: ImageSink + SoundSink + MarkerSink {}

impl<T: ImageSink + SoundSink + MarkerSink> FeedbackSinks for T {}

impl TapFeedback {
    /// Run the immediate part of the plan
    pub fn apply<S: FeedbackSinks + ?Sized>(&self, sinks: &mut S) {
        sinks.show_image(self.image_set, ImageState::Struck);

        if let Some(variant) = self.sound {
            if let Err(e) = sinks.play_sound(variant, self.volume) {
                log::warn!("Slap sound skipped: {}", e);
            }
        }

        sinks.spawn_marker(self.marker, self.at);
        if self.shake {
            sinks.set_shake(true);
        }
        sinks.pop_text(self.at);
    }
}

impl Deferred {
    /// Run a fired task; `current_set` is the image set active right now
    pub fn apply<S: FeedbackSinks + ?Sized>(&self, current_set: ImageSet, sinks: &mut S) {
        match *self {
            Deferred::RevertImage => sinks.show_image(current_set, ImageState::Idle),
            Deferred::StopShake => sinks.set_shake(false),
            Deferred::RemoveMarker(id) => sinks.remove_marker(id),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{RecordingSinks, SinkEvent};
    use super::*;

    fn outcome(image_set: ImageSet, sound: Option<SoundVariant>) -> TapOutcome {
        TapOutcome {
            score: 10,
            tap_count: 1,
            fast_tap_count: 1,
            image_set,
            unlocked_image_set: false,
            sound,
        }
    }

    #[test]
    fn test_image_assets() {
        assert_eq!(image_asset(ImageSet::First, ImageState::Idle), IDLE_IMAGE);
        assert_eq!(image_asset(ImageSet::Second, ImageState::Idle), IDLE_IMAGE_2);
        assert_eq!(image_asset(ImageSet::Second, ImageState::Struck), STRUCK_IMAGE);
        assert_eq!(SoundVariant::Alternate.asset(), ALT_SLAP_SOUND);
    }

    #[test]
    fn test_plan_schedules_timers() {
        let plan = plan_tap(
            outcome(ImageSet::First, Some(SoundVariant::Standard)),
            Point::new(12.0, 34.0),
            7,
            &Settings::default(),
        );
        assert_eq!(plan.sound, Some(SoundVariant::Standard));
        assert!(plan.shake);
        assert_eq!(
            plan.scheduled,
            vec![
                Scheduled {
                    delay_ms: 120,
                    task: Deferred::RevertImage
                },
                Scheduled {
                    delay_ms: 400,
                    task: Deferred::RemoveMarker(7)
                },
                Scheduled {
                    delay_ms: 120,
                    task: Deferred::StopShake
                },
            ]
        );
    }

    #[test]
    fn test_apply_runs_sinks_in_order() {
        let plan = plan_tap(
            outcome(ImageSet::Second, Some(SoundVariant::Alternate)),
            Point::default(),
            1,
            &Settings::default(),
        );
        let mut sinks = RecordingSinks::default();
        plan.apply(&mut sinks);
        assert_eq!(
            sinks.take(),
            vec![
                SinkEvent::Image(ImageSet::Second, ImageState::Struck),
                SinkEvent::Sound(SoundVariant::Alternate),
                SinkEvent::Spawn(1),
                SinkEvent::Shake(true),
                SinkEvent::Text,
            ]
        );
    }

    #[test]
    fn test_muted_and_reduced_motion() {
        let settings = Settings {
            muted: true,
            reduced_motion: true,
            ..Settings::default()
        };
        let plan = plan_tap(
            outcome(ImageSet::First, Some(SoundVariant::Standard)),
            Point::default(),
            3,
            &settings,
        );
        assert_eq!(plan.sound, None);
        assert!(!plan.shake);
        assert!(!plan.scheduled.iter().any(|s| s.task == Deferred::StopShake));

        let mut sinks = RecordingSinks::default();
        plan.apply(&mut sinks);
        assert_eq!(
            sinks.take(),
            vec![
                SinkEvent::Image(ImageSet::First, ImageState::Struck),
                SinkEvent::Spawn(3),
                SinkEvent::Text,
            ]
        );
    }

    #[test]
    fn test_plan_carries_volume() {
        let mut settings = Settings::default();
        settings.set_volume(0.25);
        let plan = plan_tap(
            outcome(ImageSet::First, Some(SoundVariant::Standard)),
            Point::default(),
            4,
            &settings,
        );
        assert_eq!(plan.volume, 0.25);
        assert_eq!(plan.sound, Some(SoundVariant::Standard));

        settings.set_volume(0.0);
        let plan = plan_tap(
            outcome(ImageSet::First, Some(SoundVariant::Standard)),
            Point::default(),
            5,
            &settings,
        );
        assert_eq!(plan.sound, None);
    }

    #[test]
    fn test_playback_failure_does_not_interrupt() {
        let plan = plan_tap(
            outcome(ImageSet::First, Some(SoundVariant::Standard)),
            Point::default(),
            2,
            &Settings::default(),
        );
        let mut sinks = RecordingSinks {
            broken_audio: true,
            ..Default::default()
        };
        plan.apply(&mut sinks);
        let events = sinks.take();
        assert!(!events.iter().any(|e| matches!(e, SinkEvent::Sound(_))));
        assert!(events.contains(&SinkEvent::Spawn(2)));
        assert!(events.contains(&SinkEvent::Text));
    }

    #[test]
    fn test_deferred_revert_uses_current_set() {
        let mut sinks = RecordingSinks::default();
        Deferred::RevertImage.apply(ImageSet::Second, &mut sinks);
        Deferred::RemoveMarker(9).apply(ImageSet::Second, &mut sinks);
        Deferred::StopShake.apply(ImageSet::First, &mut sinks);
        assert_eq!(
            sinks.take(),
            vec![
                SinkEvent::Image(ImageSet::Second, ImageState::Idle),
                SinkEvent::Remove(9),
                SinkEvent::Shake(false),
            ]
        );
    }
}
