//! Flippa Slap - tap the character, climb the leaderboard
//!
//! Core modules:
//! - `session`: Round state machine (score, fast-tap streak, image sets)
//! - `leaderboard`: Top-10 ranked scores persisted to LocalStorage
//! - `feedback`: Per-tap image/sound/marker commands and deferred timers
//! - `game`: Controller wiring session, leaderboard, settings and clock
//! - `platform`: Browser/native platform abstraction (storage, time)
//! - `persistence`: Typed JSON load/save over the storage layer

pub mod error;
pub mod feedback;
pub mod game;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;

#[cfg(target_arch = "wasm32")]
pub mod audio;

pub use error::{PlaybackError, SessionError, StorageError};
pub use game::{Confirm, Game, RoundSummary};
pub use leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardStore, LeaderboardView};
pub use session::{GameSession, ImageSet, Phase, Session, SoundVariant, TapOutcome};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Points awarded per tap, regardless of speed
    pub const TAP_SCORE: u64 = 10;

    /// Taps closer together than this extend the fast-tap streak
    pub const FAST_TAP_WINDOW_MS: f64 = 300.0;
    /// Streak length that triggers the alternate slap sound
    pub const FAST_TAP_THRESHOLD: u32 = 5;

    /// Taps per cycle; the first wraparound unlocks image set 2
    pub const TAPS_PER_CYCLE: u32 = 10;

    /// Struck image shown for this long before reverting to idle
    pub const IMAGE_REVERT_MS: u32 = 120;
    /// Screen shake duration
    pub const SHAKE_MS: u32 = 120;
    /// Slipper marker lifetime
    pub const MARKER_TTL_MS: u32 = 400;

    /// Maximum number of leaderboard entries kept
    pub const MAX_LEADERBOARD_ENTRIES: usize = 10;
}
