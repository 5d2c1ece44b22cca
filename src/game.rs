//! The three-phase frame contract and the driver that enforces it.
//!
//! A [`Game`] is initialised once, then every frame receives `update(dt)`
//! followed by `draw()`. The [`Engine`] owns the game and its [`AppContext`] and
//! is the only caller of those hooks, so the phases never overlap or re-enter.
//!
//! # Frame
//!
//! 1. Clamp the host delta to be non-negative and scale it by
//!    [`WorldTime::time_scale`](crate::resources::worldtime::WorldTime).
//! 2. Clear the draw queue.
//! 3. `update(dt)`; an error is logged and the frame continues.
//! 4. `draw()`; an error is logged and the frame continues.
//! 5. The host takes the queued draw commands and presents them.
//!
//! `init` failures are returned: a game that cannot initialise does not run.

use log::{debug, error, info};

use crate::error::FrameError;
use crate::resources::context::AppContext;
use crate::resources::drawqueue::DrawCommand;
use crate::resources::scenemanager::{Scene, SceneManager};

/// Entry points a game exposes to the host driver.
pub trait Game {
    /// Called once before the first frame.
    fn init(&mut self, ctx: &mut AppContext) -> Result<(), FrameError>;

    /// Simulation phase (`loop(dt)` on the host side).
    fn update(&mut self, ctx: &mut AppContext, dt: f32) -> Result<(), FrameError>;

    /// Draw phase (`window()` on the host side).
    fn draw(&mut self, ctx: &mut AppContext) -> Result<(), FrameError>;

    /// Called once after the last frame.
    fn shutdown(&mut self, _ctx: &mut AppContext) -> Result<(), FrameError> {
        Ok(())
    }
}

/// A [`Game`] whose phases are delegated to a [`SceneManager`].
#[derive(Debug)]
pub struct SceneGame {
    pub scenes: SceneManager,
    initial: String,
}

impl SceneGame {
    pub fn new(scenes: SceneManager, initial: impl Into<String>) -> Self {
        SceneGame {
            scenes,
            initial: initial.into(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, scene: impl Scene + 'static) {
        self.scenes.register(name, scene);
    }
}

impl Game for SceneGame {
    fn init(&mut self, ctx: &mut AppContext) -> Result<(), FrameError> {
        let initial = self.initial.clone();
        self.scenes.enter(&initial, ctx)
    }

    fn update(&mut self, ctx: &mut AppContext, dt: f32) -> Result<(), FrameError> {
        self.scenes.update(ctx, dt)
    }

    fn draw(&mut self, ctx: &mut AppContext) -> Result<(), FrameError> {
        self.scenes.draw(ctx)
    }

    fn shutdown(&mut self, ctx: &mut AppContext) -> Result<(), FrameError> {
        self.scenes.shutdown(ctx)
    }
}

/// Drives a [`Game`] through `init`, then `update`/`draw` once per frame.
#[derive(Debug)]
pub struct Engine<G: Game> {
    game: G,
    ctx: AppContext,
    initialized: bool,
    failed_frames: u64,
}

impl<G: Game> Engine<G> {
    pub fn new(game: G, ctx: AppContext) -> Self {
        Engine {
            game,
            ctx,
            initialized: false,
            failed_frames: 0,
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut AppContext {
        &mut self.ctx
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Frames in which `update` or `draw` reported an error.
    pub fn failed_frames(&self) -> u64 {
        self.failed_frames
    }

    /// Run the game's `init`. Calling it again is a no-op.
    pub fn init(&mut self) -> Result<(), FrameError> {
        if self.initialized {
            debug!("Engine already initialized");
            return Ok(());
        }
        self.game.init(&mut self.ctx)?;
        self.initialized = true;
        info!("Game initialized");
        Ok(())
    }

    /// Run one frame and return the draw commands it produced.
    pub fn frame(&mut self, raw_dt: f32) -> Vec<DrawCommand> {
        if !self.initialized {
            error!("frame() called before init(); skipping");
            return Vec::new();
        }
        let dt = self.ctx.time.advance(raw_dt);
        self.ctx.draw.clear();

        let mut failed = false;
        if let Err(e) = self.game.update(&mut self.ctx, dt) {
            error!("Error in update: {}", e);
            failed = true;
        }
        if let Err(e) = self.game.draw(&mut self.ctx) {
            error!("Error in draw: {}", e);
            failed = true;
        }
        if failed {
            self.failed_frames += 1;
        }
        self.ctx.draw.drain()
    }

    pub fn quit_requested(&self) -> bool {
        self.ctx.quit_requested()
    }

    /// Run the game's `shutdown` hook.
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        if let Err(e) = self.game.shutdown(&mut self.ctx) {
            error!("Error in shutdown: {}", e);
        }
        self.initialized = false;
        info!(
            "Game shut down after {} frame(s), {} with errors",
            self.ctx.time.frame_count, self.failed_frames
        );
    }

    pub fn into_parts(self) -> (G, AppContext) {
        (self.game, self.ctx)
    }
}
