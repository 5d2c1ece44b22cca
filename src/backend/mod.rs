//! Host collaborators that own the window, poll input and present frames.
//!
//! The core never opens a window. A [`Host`] feeds it a frame delta and an
//! input snapshot, and renders the draw commands a frame produced:
//!
//! - [`headless::HeadlessHost`] runs a fixed number of frames at a fixed delta
//!   and keeps the last frame for inspection. Always available.
//! - `raylib::RaylibHost` opens a real window (feature `raylib`).
//!
//! [`run`] is the main loop shared by both.

pub mod headless;
#[cfg(feature = "raylib")]
pub mod raylib;

use log::info;

use crate::error::FrameError;
use crate::game::{Engine, Game};
use crate::math::Color;
use crate::resources::context::AppContext;
use crate::resources::drawqueue::DrawCommand;

/// The rendering/input layer the core calls through.
pub trait Host {
    /// Whether the main loop should stop before the next frame.
    fn should_close(&self) -> bool;

    /// Refresh the input snapshot and window size, and return the raw delta
    /// in seconds for the coming frame.
    fn begin_frame(&mut self, ctx: &mut AppContext) -> f32;

    /// Clear to `clear` and render `commands` in order.
    fn present(&mut self, clear: Color, commands: &[DrawCommand]);
}

/// Drive `engine` on `host` until the host closes or the game asks to quit.
///
/// Returns the number of frames run. Only an `init` failure is returned as an
/// error; per-frame errors are logged by the engine.
pub fn run<H: Host, G: Game>(host: &mut H, engine: &mut Engine<G>) -> Result<u64, FrameError> {
    engine.init()?;
    let mut frames: u64 = 0;
    while !host.should_close() && !engine.quit_requested() {
        let dt = host.begin_frame(engine.context_mut());
        let commands = engine.frame(dt);
        host.present(engine.context().clear_color(), &commands);
        frames += 1;
    }
    engine.shutdown();
    info!("Main loop finished after {} frame(s)", frames);
    Ok(frames)
}
