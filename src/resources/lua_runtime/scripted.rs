//! [`Game`] implementation backed by a Lua script.
//!
//! Maps the frame contract onto the script's globals: `init()`, `loop(dt)` and
//! `window()`. A global the script does not define is skipped. Before each call
//! the runtime snapshot is refreshed from the context, and after it the queued
//! [`HostCmd`]s are applied, including those issued before a Lua error.

use std::path::Path;

use log::debug;
use mlua::prelude::*;

use super::commands::HostCmd;
use super::runtime::LuaRuntime;
use crate::error::FrameError;
use crate::game::Game;
use crate::resources::context::AppContext;

pub struct ScriptedGame {
    runtime: LuaRuntime,
}

impl ScriptedGame {
    /// Wrap a runtime whose script has already been loaded.
    pub fn new(runtime: LuaRuntime) -> Self {
        ScriptedGame { runtime }
    }

    /// Load the script at `path` into a fresh runtime.
    pub fn from_path(path: &Path) -> Result<Self, FrameError> {
        let runtime = LuaRuntime::new().map_err(script_error)?;
        runtime.run_script(path).map_err(script_error)?;
        Ok(Self::new(runtime))
    }

    /// Load in-memory script source into a fresh runtime.
    pub fn from_source(source: &str, name: &str) -> Result<Self, FrameError> {
        let runtime = LuaRuntime::new().map_err(script_error)?;
        runtime.run_source(source, name).map_err(script_error)?;
        Ok(Self::new(runtime))
    }

    pub fn runtime(&self) -> &LuaRuntime {
        &self.runtime
    }

    fn call<A: IntoLuaMulti>(
        &self,
        name: &str,
        args: A,
        ctx: &mut AppContext,
    ) -> Result<(), FrameError> {
        if !self.runtime.has_function(name) {
            debug!("Script has no {}(); skipping", name);
            return Ok(());
        }
        self.runtime.update_snapshot(ctx);
        let result = self.runtime.call_function::<_, ()>(name, args);
        self.apply_commands(ctx);
        result.map_err(script_error)
    }

    fn apply_commands(&self, ctx: &mut AppContext) {
        for cmd in self.runtime.drain_commands() {
            match cmd {
                HostCmd::Draw(command) => ctx.draw.push(command),
                HostCmd::SetClearColor { r, g, b } => ctx.set_clear_color(r, g, b),
                HostCmd::Quit => ctx.request_quit(),
            }
        }
    }
}

fn script_error(e: LuaError) -> FrameError {
    FrameError::Script(e.to_string())
}

impl Game for ScriptedGame {
    fn init(&mut self, ctx: &mut AppContext) -> Result<(), FrameError> {
        self.call("init", (), ctx)
    }

    fn update(&mut self, ctx: &mut AppContext, dt: f32) -> Result<(), FrameError> {
        self.call("loop", dt, ctx)
    }

    fn draw(&mut self, ctx: &mut AppContext) -> Result<(), FrameError> {
        self.call("window", (), ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Color;
    use crate::resources::drawqueue::DrawCommand;

    #[test]
    fn test_missing_globals_are_skipped() {
        let mut game = ScriptedGame::from_source("x = 1", "empty").unwrap();
        let mut ctx = AppContext::default();
        assert!(game.init(&mut ctx).is_ok());
        assert!(game.update(&mut ctx, 0.1).is_ok());
        assert!(game.draw(&mut ctx).is_ok());
        assert!(ctx.draw.is_empty());
    }

    #[test]
    fn test_commands_reach_context() {
        let mut game = ScriptedGame::from_source(
            r#"
            function init() graphics.setClearColor(0, 0, 1) end
            function window() draw.line(0, 0, 10, 10, 1, 1, 1) end
            "#,
            "cmds",
        )
        .unwrap();
        let mut ctx = AppContext::default();
        game.init(&mut ctx).unwrap();
        game.draw(&mut ctx).unwrap();
        assert_eq!(ctx.clear_color(), Color::BLUE);
        assert_eq!(
            ctx.draw.commands(),
            &[DrawCommand::Line {
                x1: 0.0,
                y1: 0.0,
                x2: 10.0,
                y2: 10.0,
                color: Color::WHITE
            }]
        );
    }

    #[test]
    fn test_lua_error_becomes_script_error() {
        let mut game = ScriptedGame::from_source(
            r#"function loop(dt) draw.text("before", 0, 0); error("kaboom") end"#,
            "err",
        )
        .unwrap();
        let mut ctx = AppContext::default();
        let err = game.update(&mut ctx, 0.1).unwrap_err();
        assert!(matches!(err, FrameError::Script(ref msg) if msg.contains("kaboom")));
        assert_eq!(ctx.draw.len(), 1);
    }

    #[test]
    fn test_syntax_error_fails_to_load() {
        assert!(ScriptedGame::from_source("function (", "bad").is_err());
    }
}
