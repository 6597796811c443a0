//! Round state machine
//!
//! All tap logic lives here. This module must stay pure:
//! - Time only arrives as an argument
//! - No storage, DOM or audio dependencies

pub mod state;
pub mod tap;

pub use state::{GameSession, ImageSet, Phase, Session};
pub use tap::{SoundVariant, TapOutcome, apply_tap};
