//! Clocks and headless timers

use std::cell::Cell;

/// Time source for the game.
///
/// `now_ms` must be monotonic; only differences between readings matter.
pub trait Clock {
    /// Milliseconds since an arbitrary origin
    fn now_ms(&self) -> f64;
    /// Today's date as shown on the leaderboard (M/D/YYYY)
    fn local_date(&self) -> String;
}

/// Browser clock: `performance.now()` with a `Date.now()` fallback
#[cfg(target_arch = "wasm32")]
pub struct BrowserClock {
    performance: Option<web_sys::Performance>,
}

#[cfg(target_arch = "wasm32")]
impl BrowserClock {
    pub fn new() -> Self {
        Self {
            performance: web_sys::window().and_then(|w| w.performance()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for BrowserClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl Clock for BrowserClock {
    fn now_ms(&self) -> f64 {
        match &self.performance {
            Some(p) => p.now(),
            None => js_sys::Date::now(),
        }
    }

    fn local_date(&self) -> String {
        let date = js_sys::Date::new_0();
        format!(
            "{}/{}/{}",
            date.get_month() + 1,
            date.get_date(),
            date.get_full_year()
        )
    }
}

/// Native clock backed by `Instant` and the local timezone
#[cfg(not(target_arch = "wasm32"))]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn local_date(&self) -> String {
        chrono::Local::now().format("%-m/%-d/%Y").to_string()
    }
}

/// Hand-driven clock for tests and scripted runs
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<f64>,
    date: String,
}

impl ManualClock {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            now: Cell::new(0.0),
            date: date.into(),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }

    fn local_date(&self) -> String {
        self.date.clone()
    }
}

#[derive(Debug)]
struct Pending<T> {
    due_ms: f64,
    seq: u64,
    task: T,
}

/// One-shot timers fired by advancing time explicitly.
///
/// Headless stand-in for `setTimeout`: tasks due at the same instant fire
/// in scheduling order.
#[derive(Debug)]
pub struct TimerQueue<T> {
    pending: Vec<Pending<T>>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }

    /// Schedule `task` to fire `delay_ms` after `now_ms`
    pub fn schedule(&mut self, now_ms: f64, delay_ms: u32, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            due_ms: now_ms + delay_ms as f64,
            seq,
            task,
        });
    }

    /// Remove and return every task due at or before `now_ms`
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<T> {
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.due_ms <= now_ms);
        self.pending = rest;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|p| p.task).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
