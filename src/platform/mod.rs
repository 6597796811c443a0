//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, in-memory elsewhere)
//! - Time (monotonic clock, calendar date, headless timer queue)

pub mod storage;
pub mod time;

pub use storage::{KeyValueStore, MemoryStore};
pub use time::{Clock, ManualClock, TimerQueue};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
#[cfg(target_arch = "wasm32")]
pub use time::BrowserClock;
#[cfg(not(target_arch = "wasm32"))]
pub use time::SystemClock;
