//! Long-lived state carried by the application context.
//!
//! Overview
//! - `camera2d` – world/screen transform with position and zoom
//! - `context` – `AppContext`, passed through every frame phase
//! - `drawqueue` – recorded host draw calls
//! - `gameconfig` – INI-backed window and run settings
//! - `input` – per-frame keyboard and mouse snapshot
//! - `lua_runtime` – Lua scripting of the frame contract (feature `lua`)
//! - `scenemanager` – named scenes with one active at a time
//! - `windowsize` – current window dimensions in pixels
//! - `worldtime` – simulation time and delta
pub mod camera2d;
pub mod context;
pub mod drawqueue;
pub mod gameconfig;
pub mod input;
#[cfg(feature = "lua")]
pub mod lua_runtime;
pub mod scenemanager;
pub mod windowsize;
pub mod worldtime;
