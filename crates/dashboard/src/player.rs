//! Scrubber over the time-step list.
//!
//! Playback runs once through the list: each tick past the step delay
//! advances the index, and advancing off the end wraps to the first step and
//! pauses. Stepping and jumping never change the play state. An empty list
//! disables every control.

use foundation::time::Time;
use runtime::timer::Deadline;
use serde::Serialize;

/// Delay between automatic advances.
pub const STEP_DELAY_S: f64 = 0.5;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayState {
    Paused,
    Playing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeStepPlayer {
    len: usize,
    index: usize,
    hover: Option<usize>,
    state: PlayState,
    deadline: Deadline,
    delay_s: f64,
}

impl TimeStepPlayer {
    pub fn new(len: usize) -> Self {
        Self::with_delay(len, STEP_DELAY_S)
    }

    pub fn with_delay(len: usize, delay_s: f64) -> Self {
        Self {
            len,
            index: 0,
            hover: None,
            state: PlayState::Paused,
            deadline: Deadline::new(),
            delay_s,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_enabled(&self) -> bool {
        self.len > 0
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn hover(&self) -> Option<usize> {
        self.hover
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    pub fn toggle(&mut self, now: Time) {
        if !self.is_enabled() {
            return;
        }
        match self.state {
            PlayState::Paused => {
                self.state = PlayState::Playing;
                self.deadline.arm(now, self.delay_s);
            }
            PlayState::Playing => self.pause(),
        }
    }

    pub fn pause(&mut self) {
        self.state = PlayState::Paused;
        self.deadline.cancel();
    }

    /// Advances once the step delay has elapsed. Returns `true` when the
    /// index changed.
    pub fn tick(&mut self, now: Time) -> bool {
        if !self.is_enabled() {
            return false;
        }
        let before = self.index;
        self.index = self.index.min(self.len - 1);

        if self.is_playing() && self.deadline.fire(now) {
            if self.index + 1 >= self.len {
                self.index = 0;
                self.pause();
            } else {
                self.index += 1;
                self.deadline.arm(now, self.delay_s);
            }
        }
        self.index != before
    }

    pub fn step_forward(&mut self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.set_index((self.index + 1).min(self.len - 1))
    }

    pub fn step_backward(&mut self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.set_index(self.index.saturating_sub(1))
    }

    /// Scrubber click. Out-of-range steps land on the last one.
    pub fn jump(&mut self, index: usize) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.set_index(index.min(self.len - 1))
    }

    pub fn set_hover(&mut self, index: usize) {
        if index < self.len {
            self.hover = Some(index);
        }
    }

    pub fn clear_hover(&mut self) {
        self.hover = None;
    }

    /// Clamps the index and hover to the new list. An empty list also stops
    /// playback.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.index = 0;
            self.hover = None;
            self.pause();
            return;
        }
        self.index = self.index.min(len - 1);
        self.hover = self.hover.filter(|h| *h < len);
    }

    /// Filled fraction of the scrubber track.
    pub fn progress(&self) -> f64 {
        fraction(self.index, self.len)
    }

    pub fn hover_progress(&self) -> Option<f64> {
        self.hover.map(|h| fraction(h, self.len))
    }

    fn set_index(&mut self, index: usize) -> bool {
        let changed = self.index != index;
        self.index = index;
        changed
    }
}

fn fraction(index: usize, len: usize) -> f64 {
    if len <= 1 {
        0.0
    } else {
        index as f64 / (len - 1) as f64
    }
}
