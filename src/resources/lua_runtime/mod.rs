//! Lua scripting layer for scripted games.
//!
//! A script drives the game through the same three entry points a native
//! [`Game`](crate::game::Game) has: global functions `init()`, `loop(dt)` and
//! `window()`. The host primitive surface is registered as Lua globals.
//!
//! # Architecture
//!
//! - [`commands`] - Commands Lua queues for Rust to apply after each call
//! - [`runtime`] - The interpreter and the global tables it registers
//! - [`scripted`] - [`ScriptedGame`], the `Game` implementation over a script
//!
//! # Example
//!
//! ```lua
//! local x = 0
//!
//! function init()
//!     graphics.setClearColor(0, 0, 0.2)
//! end
//!
//! function loop(dt)
//!     if keyboard.isDown("right") then x = x + 100 * dt end
//! end
//!
//! function window()
//!     draw.rect(x, 100, 32, 32, 1, 0.5, 0)
//!     draw.text("x = " .. math.floor(x), 10, 10)
//! end
//! ```

mod commands;
mod runtime;
mod scripted;

pub use commands::HostCmd;
pub use runtime::LuaRuntime;
pub use scripted::ScriptedGame;
