//! Game controller
//!
//! Owns all game state and exposes one method per user action. The web
//! front-end (or a headless driver) calls these from its event handlers.

use crate::error::SessionError;
use crate::feedback::{Deferred, FeedbackSinks, MarkerId, Point, TapFeedback, plan_tap};
use crate::leaderboard::{Leaderboard, LeaderboardStore, LeaderboardView};
use crate::platform::{Clock, KeyValueStore};
use crate::session::{GameSession, Phase, Session};
use crate::settings::Settings;

/// Prompt shown before wiping the leaderboard
pub const RESET_PROMPT: &str =
    "Are you sure you want to reset the leaderboard? This cannot be undone.";

/// Asks the player a yes/no question
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Shown on the round-over screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummary {
    pub score: u64,
    /// Leaderboard rank, None if the score didn't place
    pub rank: Option<usize>,
}

/// Game instance holding all state
pub struct Game<S: KeyValueStore, C: Clock> {
    session: GameSession,
    leaderboard: LeaderboardStore<S>,
    settings: Settings,
    clock: C,
    next_marker_id: MarkerId,
}

impl<S: KeyValueStore, C: Clock> Game<S, C> {
    /// Load persisted leaderboard and settings; waits for a nickname
    pub fn new(store: S, clock: C) -> Self {
        let settings = Settings::load(&store);
        let leaderboard = LeaderboardStore::load(store);
        Self {
            session: GameSession::new(),
            leaderboard,
            settings,
            clock,
            next_marker_id: 1,
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn session(&self) -> &Session {
        self.session.session()
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        self.leaderboard.board()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Nickname entered; starts the first round
    pub fn start(&mut self, nickname: &str) -> Result<(), SessionError> {
        self.session.start(nickname)
    }

    /// Click on the game frame. Returns None outside a round.
    pub fn tap(&mut self, at: Point) -> Option<TapFeedback> {
        let now = self.clock.now_ms();
        match self.session.register_tap(now) {
            Ok(outcome) => {
                let marker = self.next_marker_id;
                self.next_marker_id = self.next_marker_id.wrapping_add(1);
                Some(plan_tap(outcome, at, marker, &self.settings))
            }
            Err(e) => {
                log::debug!("Tap ignored: {}", e);
                None
            }
        }
    }

    /// Finish the round and record a positive score
    pub fn end_round(&mut self) -> Result<RoundSummary, SessionError> {
        let score = self.session.end_round()?;
        let rank = if score > 0 {
            let nickname = self.session.session().nickname.clone();
            self.leaderboard.submit(&nickname, score, &self.clock)
        } else {
            None
        };
        Ok(RoundSummary { score, rank })
    }

    /// "New Round" button: records the round in progress (if it scored),
    /// then starts over
    pub fn new_round(&mut self) -> Result<Option<RoundSummary>, SessionError> {
        let summary = if self.phase() == Phase::Playing && self.session().score > 0 {
            Some(self.end_round()?)
        } else {
            None
        };
        self.session.reset()?;
        Ok(summary)
    }

    /// "Play Again" on the round-over screen
    pub fn play_again(&mut self) -> Result<(), SessionError> {
        self.session.reset()
    }

    pub fn leaderboard_view(&self) -> LeaderboardView {
        self.leaderboard.render()
    }

    /// Wipe the leaderboard if the player confirms. Returns whether it was
    /// cleared.
    pub fn reset_leaderboard<F: Confirm + ?Sized>(&mut self, confirm: &mut F) -> bool {
        if !confirm.confirm(RESET_PROMPT) {
            log::info!("Leaderboard reset cancelled");
            return false;
        }
        self.leaderboard.clear();
        true
    }

    /// Run a fired feedback timer
    pub fn run_deferred<F: FeedbackSinks + ?Sized>(&self, task: Deferred, sinks: &mut F) {
        task.apply(self.session().image_set, sinks);
    }

    /// Mute button. Returns the new muted state.
    pub fn toggle_mute(&mut self) -> bool {
        self.update_settings(|s| s.muted = !s.muted);
        self.settings.muted
    }

    /// Reduced-motion button. Returns the new state.
    pub fn toggle_reduced_motion(&mut self) -> bool {
        self.update_settings(|s| s.reduced_motion = !s.reduced_motion);
        self.settings.reduced_motion
    }

    /// Volume slider (0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.update_settings(|s| s.set_volume(volume));
    }

    /// Change and persist settings
    fn update_settings(&mut self, update: impl FnOnce(&mut Settings)) {
        update(&mut self.settings);
        self.settings.save(self.leaderboard.store());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::ImageState;
    use crate::feedback::testing::{RecordingSinks, SinkEvent};
    use crate::leaderboard::STORAGE_KEY;
    use crate::platform::{ManualClock, MemoryStore, TimerQueue};
    use crate::session::{ImageSet, SoundVariant};

    fn game() -> (Game<MemoryStore, ManualClock>, MemoryStore) {
        let store = MemoryStore::new();
        let game = Game::new(store.clone(), ManualClock::new("6/1/2025"));
        (game, store)
    }

    /// Tap `n` times, `gap_ms` apart
    fn tap_n(game: &mut Game<MemoryStore, ManualClock>, n: usize, gap_ms: f64) -> Vec<TapFeedback> {
        (0..n)
            .map(|_| {
                game.clock().advance(gap_ms);
                game.tap(Point::new(50.0, 50.0)).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_taps_ignored_before_start() {
        let (mut game, _) = game();
        assert_eq!(game.phase(), Phase::AwaitingNickname);
        assert!(game.tap(Point::default()).is_none());
        assert_eq!(game.start("  "), Err(SessionError::EmptyNickname));
        assert!(game.tap(Point::default()).is_none());
    }

    #[test]
    fn test_round_over_records_score() {
        let (mut game, store) = game();
        game.start("ana").unwrap();
        tap_n(&mut game, 5, 1000.0);

        let summary = game.end_round().unwrap();
        assert_eq!(
            summary,
            RoundSummary {
                score: 50,
                rank: Some(1)
            }
        );
        assert!(game.tap(Point::default()).is_none());

        let entry = &game.leaderboard().entries()[0];
        assert_eq!(entry.nickname, "ana");
        assert_eq!(entry.date, "6/1/2025");
        assert!(store.get_item(STORAGE_KEY).unwrap().is_some());
    }

    #[test]
    fn test_zero_score_round_not_recorded() {
        let (mut game, _) = game();
        game.start("ana").unwrap();
        assert_eq!(
            game.end_round().unwrap(),
            RoundSummary {
                score: 0,
                rank: None
            }
        );
        assert!(game.leaderboard().is_empty());
    }

    #[test]
    fn test_new_round_saves_progress_and_resets() {
        let (mut game, _) = game();
        game.start("ana").unwrap();
        tap_n(&mut game, 12, 100.0);
        assert_eq!(game.session().image_set, ImageSet::Second);

        let summary = game.new_round().unwrap();
        assert_eq!(summary.map(|s| s.score), Some(120));
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.session().score, 0);
        assert_eq!(game.session().image_set, ImageSet::First);
        assert_eq!(game.leaderboard().len(), 1);

        // Nothing scored: no new entry
        assert_eq!(game.new_round().unwrap(), None);
        assert_eq!(game.leaderboard().len(), 1);
    }

    #[test]
    fn test_play_again_after_round_over() {
        let (mut game, _) = game();
        game.start("ana").unwrap();
        tap_n(&mut game, 2, 1000.0);
        game.end_round().unwrap();

        // New Round from the round-over screen doesn't record twice
        assert_eq!(game.new_round().unwrap(), None);
        assert_eq!(game.leaderboard().len(), 1);

        game.end_round().unwrap();
        game.play_again().unwrap();
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.session().nickname, "ana");
    }

    #[test]
    fn test_leaderboard_survives_reload() {
        let (mut game, store) = game();
        for (name, taps) in [("ana", 3), ("bo", 7), ("cy", 5)] {
            game.start(name).unwrap();
            tap_n(&mut game, taps, 1000.0);
            game.end_round().unwrap();
        }

        let reloaded = Game::new(store, ManualClock::new("6/2/2025"));
        assert_eq!(reloaded.leaderboard(), game.leaderboard());
        let LeaderboardView::Ranked(rows) = reloaded.leaderboard_view() else {
            panic!("expected ranked view");
        };
        assert_eq!(rows[0].nickname, "bo");
        assert_eq!(rows[2].score, 30);
    }

    #[test]
    fn test_reset_leaderboard_needs_confirmation() {
        let (mut game, store) = game();
        game.start("ana").unwrap();
        tap_n(&mut game, 1, 1000.0);
        game.end_round().unwrap();

        let mut asked = Vec::new();
        let mut decline = |prompt: &str| {
            asked.push(prompt.to_string());
            false
        };
        assert!(!game.reset_leaderboard(&mut decline));
        assert_eq!(asked, vec![RESET_PROMPT.to_string()]);
        assert_eq!(game.leaderboard().len(), 1);

        assert!(game.reset_leaderboard(&mut |_: &str| true));
        assert!(game.leaderboard().is_empty());
        assert_eq!(store.get_item(STORAGE_KEY).unwrap(), None);
        assert!(matches!(
            game.leaderboard_view(),
            LeaderboardView::Empty { .. }
        ));
    }

    #[test]
    fn test_fast_streak_plays_alternate_once() {
        let (mut game, _) = game();
        game.start("ana").unwrap();
        let sounds: Vec<Option<SoundVariant>> =
            tap_n(&mut game, 7, 100.0).iter().map(|f| f.sound).collect();
        assert_eq!(sounds[4], Some(SoundVariant::Alternate));
        assert!(sounds[5..].iter().all(Option::is_none));
    }

    #[test]
    fn test_timers_revert_to_current_image_set() {
        let (mut game, _) = game();
        game.start("ana").unwrap();
        let mut sinks = RecordingSinks::default();
        let mut timers = TimerQueue::new();

        // Ten quick taps; timers from early taps fire after the unlock
        for _ in 0..10 {
            game.clock().advance(50.0);
            let fb = game.tap(Point::default()).unwrap();
            fb.apply(&mut sinks);
            let now = game.clock().now_ms();
            for s in &fb.scheduled {
                timers.schedule(now, s.delay_ms, s.task);
            }
            for task in timers.drain_due(now) {
                game.run_deferred(task, &mut sinks);
            }
        }
        sinks.take();

        game.clock().advance(1000.0);
        for task in timers.drain_due(game.clock().now_ms()) {
            game.run_deferred(task, &mut sinks);
        }
        assert!(timers.is_empty());

        let events = sinks.take();
        assert!(events.contains(&SinkEvent::Image(ImageSet::Second, ImageState::Idle)));
        assert!(!events.contains(&SinkEvent::Image(ImageSet::First, ImageState::Idle)));
        assert!(events.contains(&SinkEvent::Remove(10)));
        assert_eq!(events.last(), Some(&SinkEvent::Remove(10)));
    }

    #[test]
    fn test_settings_controls_persist() {
        let (mut game, store) = game();
        assert!(game.toggle_mute());
        assert!(game.toggle_reduced_motion());
        game.set_volume(0.4);

        let reloaded = Game::new(store.clone(), ManualClock::new("6/1/2025"));
        assert!(reloaded.settings().muted);
        assert!(reloaded.settings().reduced_motion);
        assert_eq!(reloaded.settings().volume, 0.4);

        let mut game = reloaded;
        game.start("ana").unwrap();
        let fb = game.tap(Point::default()).unwrap();
        assert_eq!(fb.outcome.sound, Some(SoundVariant::Standard));
        assert_eq!(fb.sound, None);
        assert!(!fb.shake);

        // Unmute: the next round's first tap plays at the slider volume
        assert!(!game.toggle_mute());
        assert!(!game.toggle_reduced_motion());
        game.new_round().unwrap();
        game.clock().advance(1000.0);
        let fb = game.tap(Point::default()).unwrap();
        assert_eq!(fb.sound, Some(SoundVariant::Standard));
        assert_eq!(fb.volume, 0.4);
        assert!(fb.shake);
        assert!(!Game::new(store, ManualClock::new("6/1/2025")).settings().muted);
    }

    #[test]
    fn test_default_volume_is_full() {
        let (mut game, _) = game();
        game.start("ana").unwrap();
        let fb = game.tap(Point::default()).unwrap();
        assert_eq!(fb.volume, 1.0);
    }
}
