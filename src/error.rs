//! Error types
//!
//! Only `SessionError::EmptyNickname` ever reaches the player. Storage and
//! playback failures are logged and degraded locally.

use thiserror::Error;

use crate::session::Phase;

/// Round state machine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Nickname was empty or whitespace
    #[error("please enter a nickname")]
    EmptyNickname,
    /// Operation not valid in the current phase
    #[error("cannot {action} while {phase:?}")]
    InvalidState {
        action: &'static str,
        phase: Phase,
    },
}

/// Key-value storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// No storage backend (private browsing, no window, ...)
    #[error("storage unavailable")]
    Unavailable,
    #[error("failed to read `{key}`: {reason}")]
    Read { key: String, reason: String },
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
    /// Stored value is not valid JSON for the expected type
    #[error("malformed value under `{key}`: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode value for `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Sound playback errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Audio element could not be created
    #[error("audio unavailable: {0}")]
    Unavailable(String),
    /// Browser refused or failed to play the asset
    #[error("playback rejected for {asset}: {reason}")]
    Rejected { asset: String, reason: String },
}
