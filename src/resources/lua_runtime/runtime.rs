//! Lua runtime core implementation.
//!
//! This module contains the `LuaRuntime` struct which owns the Lua interpreter
//! and registers the host primitive surface as global tables:
//!
//! | Global     | Functions                                                   |
//! |------------|-------------------------------------------------------------|
//! | `draw`     | `rect`, `circle`, `line`, `text`                            |
//! | `keyboard` | `isDown(name)`                                              |
//! | `mouse`    | `x()`, `y()`                                                |
//! | `graphics` | `setClearColor(r, g, b)`, `getClearColor()`, `getWindowSize()` |
//! | `engine`   | `log`, `log_info`, `log_warn`, `log_error`, `quit`          |
//!
//! Reads (`keyboard`, `mouse`, `graphics.get*`) come from a snapshot refreshed
//! with [`LuaRuntime::update_snapshot`]. Writes are queued as [`HostCmd`]s and
//! taken with [`LuaRuntime::drain_commands`].

use std::cell::{Cell, RefCell};
use std::path::Path;

use log::{error, info, warn};
use mlua::prelude::*;

use super::commands::HostCmd;
use crate::math::Color;
use crate::resources::context::{AppContext, DEFAULT_CLEAR_COLOR};
use crate::resources::drawqueue::DrawCommand;
use crate::resources::input::InputState;
use crate::resources::windowsize::WindowSize;

/// Shared state accessible from Lua function closures.
/// This is stored in Lua's app_data and allows Lua functions to queue commands.
struct LuaAppData {
    commands: RefCell<Vec<HostCmd>>,
    input: RefCell<InputState>,
    window: Cell<WindowSize>,
    clear_color: Cell<Color>,
}

/// Owner of the Lua interpreter state.
///
/// Not `Send`: the Lua state lives on the thread that drives the frame loop.
pub struct LuaRuntime {
    lua: Lua,
}

fn push_cmd(lua: &Lua, cmd: HostCmd) -> LuaResult<()> {
    lua.app_data_ref::<LuaAppData>()
        .ok_or_else(|| LuaError::runtime("LuaAppData not found"))?
        .commands
        .borrow_mut()
        .push(cmd);
    Ok(())
}

fn color(r: f32, g: f32, b: f32, a: Option<f32>) -> Color {
    Color::rgba(r, g, b, a.unwrap_or(1.0))
}

impl LuaRuntime {
    /// Creates a new Lua runtime and registers the host API.
    ///
    /// # Errors
    ///
    /// Returns an error if Lua initialization or API registration fails.
    pub fn new() -> LuaResult<Self> {
        let lua = Lua::new();

        lua.set_app_data(LuaAppData {
            commands: RefCell::new(Vec::new()),
            input: RefCell::new(InputState::default()),
            window: Cell::new(WindowSize::default()),
            clear_color: Cell::new(DEFAULT_CLEAR_COLOR),
        });

        let runtime = Self { lua };
        runtime.register_engine_api()?;
        runtime.register_draw_api()?;
        runtime.register_input_api()?;
        runtime.register_graphics_api()?;
        Ok(runtime)
    }

    /// Registers the `engine` table with logging and quit.
    fn register_engine_api(&self) -> LuaResult<()> {
        let engine = self.lua.create_table()?;

        // engine.log(message) - General purpose logging
        engine.set(
            "log",
            self.lua.create_function(|_, msg: String| {
                info!(target: "lua", "{}", msg);
                Ok(())
            })?,
        )?;
        engine.set(
            "log_info",
            self.lua.create_function(|_, msg: String| {
                info!(target: "lua", "{}", msg);
                Ok(())
            })?,
        )?;
        engine.set(
            "log_warn",
            self.lua.create_function(|_, msg: String| {
                warn!(target: "lua", "{}", msg);
                Ok(())
            })?,
        )?;
        engine.set(
            "log_error",
            self.lua.create_function(|_, msg: String| {
                error!(target: "lua", "{}", msg);
                Ok(())
            })?,
        )?;

        // engine.quit() - stop the main loop after this frame
        engine.set(
            "quit",
            self.lua
                .create_function(|lua, ()| push_cmd(lua, HostCmd::Quit))?,
        )?;

        self.lua.globals().set("engine", engine)?;
        Ok(())
    }

    /// Registers `draw.rect/circle/line/text`. Alpha is optional and defaults to 1.
    fn register_draw_api(&self) -> LuaResult<()> {
        let draw = self.lua.create_table()?;

        draw.set(
            "rect",
            self.lua.create_function(
                |lua, (x, y, w, h, r, g, b, a): (f32, f32, f32, f32, f32, f32, f32, Option<f32>)| {
                    push_cmd(
                        lua,
                        HostCmd::Draw(DrawCommand::Rect {
                            x,
                            y,
                            w,
                            h,
                            color: color(r, g, b, a),
                        }),
                    )
                },
            )?,
        )?;

        draw.set(
            "circle",
            self.lua.create_function(
                |lua, (x, y, radius, r, g, b, a): (f32, f32, f32, f32, f32, f32, Option<f32>)| {
                    push_cmd(
                        lua,
                        HostCmd::Draw(DrawCommand::Circle {
                            x,
                            y,
                            radius,
                            color: color(r, g, b, a),
                        }),
                    )
                },
            )?,
        )?;

        draw.set(
            "line",
            self.lua.create_function(
                |lua,
                 (x1, y1, x2, y2, r, g, b, a): (
                    f32,
                    f32,
                    f32,
                    f32,
                    f32,
                    f32,
                    f32,
                    Option<f32>,
                )| {
                    push_cmd(
                        lua,
                        HostCmd::Draw(DrawCommand::Line {
                            x1,
                            y1,
                            x2,
                            y2,
                            color: color(r, g, b, a),
                        }),
                    )
                },
            )?,
        )?;

        draw.set(
            "text",
            self.lua
                .create_function(|lua, (text, x, y): (String, f32, f32)| {
                    push_cmd(lua, HostCmd::Draw(DrawCommand::Text { text, x, y }))
                })?,
        )?;

        self.lua.globals().set("draw", draw)?;
        Ok(())
    }

    /// Registers `keyboard.isDown` and `mouse.x/y`, read from the snapshot.
    fn register_input_api(&self) -> LuaResult<()> {
        let keyboard = self.lua.create_table()?;
        keyboard.set(
            "isDown",
            self.lua.create_function(|lua, name: String| {
                Ok(lua
                    .app_data_ref::<LuaAppData>()
                    .map(|data| data.input.borrow().is_down_by_name(&name))
                    .unwrap_or(false))
            })?,
        )?;
        self.lua.globals().set("keyboard", keyboard)?;

        let mouse = self.lua.create_table()?;
        mouse.set(
            "x",
            self.lua.create_function(|lua, ()| {
                Ok(lua
                    .app_data_ref::<LuaAppData>()
                    .map(|data| data.input.borrow().mouse.x)
                    .unwrap_or(0.0))
            })?,
        )?;
        mouse.set(
            "y",
            self.lua.create_function(|lua, ()| {
                Ok(lua
                    .app_data_ref::<LuaAppData>()
                    .map(|data| data.input.borrow().mouse.y)
                    .unwrap_or(0.0))
            })?,
        )?;
        self.lua.globals().set("mouse", mouse)?;
        Ok(())
    }

    /// Registers the `graphics` table.
    fn register_graphics_api(&self) -> LuaResult<()> {
        let graphics = self.lua.create_table()?;

        graphics.set(
            "setClearColor",
            self.lua
                .create_function(|lua, (r, g, b): (f32, f32, f32)| {
                    let data = lua
                        .app_data_ref::<LuaAppData>()
                        .ok_or_else(|| LuaError::runtime("LuaAppData not found"))?;
                    // Visible to getClearColor within the same call.
                    data.clear_color.set(Color::rgb(r, g, b).clamped());
                    data.commands
                        .borrow_mut()
                        .push(HostCmd::SetClearColor { r, g, b });
                    Ok(())
                })?,
        )?;

        graphics.set(
            "getClearColor",
            self.lua.create_function(|lua, ()| {
                let c = lua
                    .app_data_ref::<LuaAppData>()
                    .map(|data| data.clear_color.get())
                    .unwrap_or(DEFAULT_CLEAR_COLOR);
                let table = lua.create_table()?;
                table.set("r", c.r)?;
                table.set("g", c.g)?;
                table.set("b", c.b)?;
                Ok(table)
            })?,
        )?;

        graphics.set(
            "getWindowSize",
            self.lua.create_function(|lua, ()| {
                let size = lua
                    .app_data_ref::<LuaAppData>()
                    .map(|data| data.window.get())
                    .unwrap_or_default();
                let table = lua.create_table()?;
                table.set("width", size.width)?;
                table.set("height", size.height)?;
                Ok(table)
            })?,
        )?;

        self.lua.globals().set("graphics", graphics)?;
        Ok(())
    }

    /// Copies input, window size and clear color from the context so that
    /// Lua reads see the current frame.
    pub fn update_snapshot(&self, ctx: &AppContext) {
        if let Some(data) = self.lua.app_data_ref::<LuaAppData>() {
            *data.input.borrow_mut() = ctx.input.clone();
            data.window.set(ctx.window_size());
            data.clear_color.set(ctx.clear_color());
        }
    }

    /// Drains all queued host commands, in the order Lua issued them.
    pub fn drain_commands(&self) -> Vec<HostCmd> {
        self.lua
            .app_data_ref::<LuaAppData>()
            .map(|data| data.commands.borrow_mut().drain(..).collect())
            .unwrap_or_default()
    }

    /// Loads and executes a Lua script from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the script has syntax/runtime errors.
    pub fn run_script(&self, path: &Path) -> LuaResult<()> {
        let script = std::fs::read_to_string(path).map_err(LuaError::external)?;
        self.lua
            .load(&script)
            .set_name(path.display().to_string())
            .exec()
    }

    /// Executes Lua source held in memory. `name` appears in error messages.
    pub fn run_source(&self, source: &str, name: &str) -> LuaResult<()> {
        self.lua.load(source).set_name(name).exec()
    }

    /// Calls a global Lua function by name with the given arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the function doesn't exist or execution fails.
    pub fn call_function<A, R>(&self, name: &str, args: A) -> LuaResult<R>
    where
        A: IntoLuaMulti,
        R: FromLuaMulti,
    {
        let func: LuaFunction = self.lua.globals().get(name)?;
        func.call(args)
    }

    /// Checks if a global function exists.
    pub fn has_function(&self, name: &str) -> bool {
        self.lua.globals().get::<LuaFunction>(name).is_ok()
    }

    /// Returns a reference to the underlying Lua state.
    pub fn lua(&self) -> &Lua {
        &self.lua
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::input::Key;

    fn runtime() -> LuaRuntime {
        LuaRuntime::new().unwrap()
    }

    #[test]
    fn test_globals_are_registered() {
        let rt = runtime();
        for table in ["draw", "keyboard", "mouse", "graphics", "engine"] {
            let value: LuaValue = rt.lua().globals().get(table).unwrap();
            assert!(value.is_table(), "{table} missing");
        }
    }

    #[test]
    fn test_draw_calls_are_queued_in_order() {
        let rt = runtime();
        rt.run_source(
            r#"
            draw.rect(1, 2, 3, 4, 1, 0, 0)
            draw.circle(5, 6, 7, 0, 1, 0, 0.5)
            draw.text("hi", 8, 9)
            "#,
            "draw_test",
        )
        .unwrap();
        let cmds = rt.drain_commands();
        assert_eq!(cmds.len(), 3);
        assert_eq!(
            cmds[0],
            HostCmd::Draw(DrawCommand::Rect {
                x: 1.0,
                y: 2.0,
                w: 3.0,
                h: 4.0,
                color: Color::RED
            })
        );
        assert_eq!(
            cmds[1],
            HostCmd::Draw(DrawCommand::Circle {
                x: 5.0,
                y: 6.0,
                radius: 7.0,
                color: Color::rgba(0.0, 1.0, 0.0, 0.5)
            })
        );
        assert!(rt.drain_commands().is_empty());
    }

    #[test]
    fn test_input_reads_snapshot() {
        let rt = runtime();
        let mut ctx = AppContext::default();
        ctx.input.set_key(Key::Space, true);
        ctx.input.set_mouse(12.0, 34.0);
        rt.update_snapshot(&ctx);

        let space: bool = rt
            .lua()
            .load(r#"return keyboard.isDown("space")"#)
            .eval()
            .unwrap();
        let bogus: bool = rt
            .lua()
            .load(r#"return keyboard.isDown("f13")"#)
            .eval()
            .unwrap();
        let (mx, my): (f32, f32) = rt.lua().load("return mouse.x(), mouse.y()").eval().unwrap();
        assert!(space);
        assert!(!bogus);
        assert_eq!((mx, my), (12.0, 34.0));
    }

    #[test]
    fn test_graphics_tables() {
        let rt = runtime();
        let (w, h): (u32, u32) = rt
            .lua()
            .load("local s = graphics.getWindowSize(); return s.width, s.height")
            .eval()
            .unwrap();
        assert_eq!((w, h), (1280, 720));

        let r: f32 = rt
            .lua()
            .load("graphics.setClearColor(0.5, 0, 0); return graphics.getClearColor().r")
            .eval()
            .unwrap();
        assert_eq!(r, 0.5);
        assert_eq!(
            rt.drain_commands(),
            vec![HostCmd::SetClearColor {
                r: 0.5,
                g: 0.0,
                b: 0.0
            }]
        );
    }

    #[test]
    fn test_has_and_call_function() {
        let rt = runtime();
        rt.run_source("function double(x) return x * 2 end", "fn_test")
            .unwrap();
        assert!(rt.has_function("double"));
        assert!(!rt.has_function("triple"));
        let v: i64 = rt.call_function("double", 21).unwrap();
        assert_eq!(v, 42);
        assert!(rt.call_function::<_, ()>("triple", ()).is_err());
    }

    #[test]
    fn test_engine_quit_is_queued() {
        let rt = runtime();
        rt.run_source("engine.log('bye'); engine.quit()", "quit_test")
            .unwrap();
        assert_eq!(rt.drain_commands(), vec![HostCmd::Quit]);
    }
}
