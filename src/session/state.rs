//! Session state and phase transitions

use crate::error::SessionError;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nickname modal is showing
    AwaitingNickname,
    /// Taps score points
    Playing,
    /// Round ended, summary showing
    RoundOver,
}

/// Character image tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSet {
    #[default]
    First,
    /// Unlocked by the first tap-counter wraparound of a round
    Second,
}

impl ImageSet {
    /// 1-based tier number
    pub fn number(&self) -> u8 {
        match self {
            ImageSet::First => 1,
            ImageSet::Second => 2,
        }
    }
}

/// Per-round state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub nickname: String,
    pub score: u64,
    /// Taps since the last wraparound (0..TAPS_PER_CYCLE)
    pub tap_count: u32,
    pub image_set: ImageSet,
    /// Length of the current fast-tap streak
    pub fast_tap_count: u32,
    /// Clock reading of the previous tap (None before the first tap)
    pub last_tap_ms: Option<f64>,
    /// Alternate slap already played this round
    pub slap_variant_played: bool,
    pub active: bool,
}

impl Session {
    /// Fresh, active round for `nickname`
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            active: true,
            ..Default::default()
        }
    }
}

/// Phase machine wrapping the current [`Session`]
#[derive(Debug, Clone)]
pub struct GameSession {
    phase: Phase,
    session: Session,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            phase: Phase::AwaitingNickname,
            session: Session::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Nickname of the current player, once one has been entered
    pub fn nickname(&self) -> Option<&str> {
        match self.phase {
            Phase::AwaitingNickname => None,
            _ => Some(self.session.nickname.as_str()),
        }
    }

    /// Start playing as `nickname` (trimmed). Valid from any phase.
    pub fn start(&mut self, nickname: &str) -> Result<(), SessionError> {
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(SessionError::EmptyNickname);
        }
        self.session = Session::new(nickname);
        self.phase = Phase::Playing;
        log::info!("Round started for {}", nickname);
        Ok(())
    }

    /// End the round in progress, returning the final score
    pub fn end_round(&mut self) -> Result<u64, SessionError> {
        self.require(Phase::Playing, "end a round")?;
        self.session.active = false;
        self.phase = Phase::RoundOver;
        log::info!("Round over - final score {}", self.session.score);
        Ok(self.session.score)
    }

    /// Clear all counters and start a new round for the same player
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.phase == Phase::AwaitingNickname {
            return Err(SessionError::InvalidState {
                action: "reset",
                phase: self.phase,
            });
        }
        let nickname = std::mem::take(&mut self.session.nickname);
        self.session = Session::new(nickname);
        self.phase = Phase::Playing;
        log::debug!("Round reset");
        Ok(())
    }

    pub(crate) fn require(&self, phase: Phase, action: &'static str) -> Result<(), SessionError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                action,
                phase: self.phase,
            })
        }
    }
}
