//! Slideshow timer
//!
//! A deadline checked from the UI frame loop rather than a thread: `poll`
//! reports when the next swap is due and `time_until_tick` tells the event
//! loop when to wake up again.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideshowState {
    Stopped,
    Running,
}

#[derive(Debug, Clone)]
pub struct Slideshow {
    state: SlideshowState,
    interval: Duration,
    next_tick: Option<Instant>,
}

impl Slideshow {
    pub fn new(interval: Duration) -> Self {
        Self {
            state: SlideshowState::Stopped,
            interval,
            next_tick: None,
        }
    }

    pub fn state(&self) -> SlideshowState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SlideshowState::Running
    }

    /// Start ticking; the first tick is one interval after `now`
    pub fn play(&mut self, now: Instant) {
        if !self.is_running() {
            self.state = SlideshowState::Running;
            self.next_tick = Some(now + self.interval);
        }
    }

    pub fn pause(&mut self) {
        self.state = SlideshowState::Stopped;
        self.next_tick = None;
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.is_running() {
            self.pause();
        } else {
            self.play(now);
        }
    }

    /// Text for the play/pause button
    pub fn label(&self) -> &'static str {
        match self.state {
            SlideshowState::Stopped => "Play",
            SlideshowState::Running => "Pause",
        }
    }

    /// Returns true once per elapsed interval while running
    ///
    /// Missed ticks (e.g. a stalled frame loop) are not replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_tick {
            Some(due) if self.is_running() && now >= due => {
                self.next_tick = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    /// Time left before the next tick, if running
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.next_tick
            .filter(|_| self.is_running())
            .map(|due| due.saturating_duration_since(now))
    }
}
