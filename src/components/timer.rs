// Counts a number of seconds and then fires its callback, once.
use std::fmt;

use crate::components::animation::validate_duration;
use crate::error::FrameworkError;

pub type TimerCallback = Box<dyn FnMut()>;

pub struct Timer {
    duration: f32,
    elapsed: f32,
    finished: bool,
    callback: Option<TimerCallback>,
}

impl Timer {
    pub fn new(duration: f32, callback: impl FnMut() + 'static) -> Result<Self, FrameworkError> {
        Ok(Timer {
            duration: validate_duration(duration)?,
            elapsed: 0.0,
            finished: false,
            callback: Some(Box::new(callback)),
        })
    }

    /// A timer with nothing to call; only `is_finished` tells it fired.
    pub fn silent(duration: f32) -> Result<Self, FrameworkError> {
        Ok(Timer {
            duration: validate_duration(duration)?,
            elapsed: 0.0,
            finished: false,
            callback: None,
        })
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Seconds left before firing, never negative.
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }

    pub fn update(&mut self, dt: f32) {
        if self.finished {
            return;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.finished = true;
            if let Some(callback) = self.callback.as_mut() {
                callback();
            }
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.finished = false;
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("duration", &self.duration)
            .field("elapsed", &self.elapsed)
            .field("finished", &self.finished)
            .finish()
    }
}
