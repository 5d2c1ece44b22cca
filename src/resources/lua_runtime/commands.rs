//! Commands Lua queues for the host surface.
//!
//! Lua functions never touch the [`AppContext`](crate::resources::context::AppContext)
//! directly. They push a [`HostCmd`] into the runtime's app data, and the
//! caller applies the queue once the Lua call has returned.

use crate::resources::drawqueue::DrawCommand;

/// A host-side effect requested by a script.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCmd {
    /// `draw.rect/circle/line/text`
    Draw(DrawCommand),
    /// `graphics.setClearColor(r, g, b)`
    SetClearColor { r: f32, g: f32, b: f32 },
    /// `engine.quit()`
    Quit,
}
