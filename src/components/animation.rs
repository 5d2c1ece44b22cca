//! Progress-driven timed callbacks.
//!
//! An [`Animation`] accumulates time and reports progress in `[0, 1]` to an
//! optional callback every update. When a run completes the callback receives
//! exactly `1.0`; a looping animation then restarts from zero, a one-shot one
//! stops until [`Animation::reset`].
//!
//! Loop restarts discard the time that overshot the duration rather than
//! carrying it into the next cycle, so a large `dt` makes a looping animation
//! drift behind wall-clock time.
//!
//! Progress can be shaped with an [`Easing`] curve before it reaches the
//! callback; the default is [`Easing::Linear`].

use std::fmt;

use crate::error::FrameworkError;

/// Easing functions for smooth interpolation.
///
/// These functions transform a linear `t` value (0.0 to 1.0) to create
/// different acceleration/deceleration curves. Every curve maps 0 to 0 and
/// 1 to 1.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed (no easing).
    #[default]
    Linear,
    /// Starts slow, accelerates (quadratic).
    QuadIn,
    /// Starts fast, decelerates (quadratic).
    QuadOut,
    /// Slow start and end (quadratic).
    QuadInOut,
    /// Starts slow, accelerates (cubic).
    CubicIn,
    /// Starts fast, decelerates (cubic).
    CubicOut,
    /// Slow start and end (cubic).
    CubicInOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => t * (2.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let p = t - 1.0;
                p * p * p + 1.0
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let p = 2.0 * t - 2.0;
                    0.5 * p * p * p + 1.0
                }
            }
        }
    }
}

/// Callback receiving the (eased) progress in `[0, 1]`.
pub type ProgressCallback = Box<dyn FnMut(f32)>;

pub(crate) fn validate_duration(duration: f32) -> Result<f32, FrameworkError> {
    if duration.is_finite() && duration > 0.0 {
        Ok(duration)
    } else {
        Err(FrameworkError::InvalidDuration(duration))
    }
}

/// Timed progress callback, optionally looping.
pub struct Animation {
    duration: f32,
    elapsed: f32,
    looping: bool,
    running: bool,
    easing: Easing,
    callback: Option<ProgressCallback>,
}

impl Animation {
    /// Create a running, non-looping animation without a callback.
    pub fn new(duration: f32) -> Result<Self, FrameworkError> {
        Ok(Animation {
            duration: validate_duration(duration)?,
            elapsed: 0.0,
            looping: false,
            running: true,
            easing: Easing::Linear,
            callback: None,
        })
    }

    pub fn with_loop(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn on_progress(mut self, callback: impl FnMut(f32) + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.elapsed / self.duration
    }

    /// Advance by `dt` and report progress. Does nothing once a one-shot run
    /// has completed.
    pub fn update(&mut self, dt: f32) {
        if !self.running {
            return;
        }
        self.elapsed += dt;

        if self.elapsed >= self.duration {
            self.elapsed = self.duration;
            self.notify(1.0);
            if self.looping {
                self.elapsed = 0.0;
            } else {
                self.running = false;
            }
        } else {
            let progress = self.elapsed / self.duration;
            self.notify(self.easing.apply(progress));
        }
    }

    /// Rewind to zero and start running again.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
    }

    fn notify(&mut self, progress: f32) {
        if let Some(callback) = self.callback.as_mut() {
            callback(progress);
        }
    }
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("duration", &self.duration)
            .field("elapsed", &self.elapsed)
            .field("looping", &self.looping)
            .field("running", &self.running)
            .field("easing", &self.easing)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
