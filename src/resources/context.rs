//! Application context passed through every frame phase.
//!
//! [`AppContext`] replaces process-wide globals: it is built once at startup,
//! handed `&mut` to `init`, `update` and `draw`, and dropped at shutdown. It
//! carries the host primitive surface (draw queue, input snapshot, clear color,
//! window size), the shared [`Camera`], frame timing, and two pending requests
//! (scene switch and quit) that the driver acts on between phases.

use log::{debug, info};

use crate::math::Color;
use crate::resources::camera2d::Camera;
use crate::resources::drawqueue::DrawQueue;
use crate::resources::input::{InputState, Key};
use crate::resources::windowsize::WindowSize;
use crate::resources::worldtime::WorldTime;

/// Default background, matching the host's initial clear color.
pub const DEFAULT_CLEAR_COLOR: Color = Color::rgb(0.1, 0.1, 0.1);

/// Explicit application state shared by the driver, scenes and components.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub draw: DrawQueue,
    pub input: InputState,
    pub camera: Camera,
    pub window: WindowSize,
    pub time: WorldTime,
    clear_color: Color,
    next_scene: Option<String>,
    quit_requested: bool,
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(WindowSize::default())
    }
}

impl AppContext {
    pub fn new(window: WindowSize) -> Self {
        AppContext {
            draw: DrawQueue::new(),
            input: InputState::default(),
            camera: Camera::default(),
            window,
            time: WorldTime::default(),
            clear_color: DEFAULT_CLEAR_COLOR,
            next_scene: None,
            quit_requested: false,
        }
    }

    // draw.*

    pub fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.draw.rect(x, y, w, h, color);
    }

    pub fn draw_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        self.draw.circle(x, y, radius, color);
    }

    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color) {
        self.draw.line(x1, y1, x2, y2, color);
    }

    pub fn draw_text(&mut self, text: impl Into<String>, x: f32, y: f32) {
        self.draw.text(text, x, y);
    }

    // keyboard.* / mouse.*

    pub fn is_key_down(&self, key: Key) -> bool {
        self.input.is_down(key)
    }

    pub fn mouse_x(&self) -> f32 {
        self.input.mouse.x
    }

    pub fn mouse_y(&self) -> f32 {
        self.input.mouse.y
    }

    // graphics.*

    pub fn set_clear_color(&mut self, r: f32, g: f32, b: f32) {
        self.clear_color = Color::rgb(r, g, b).clamped();
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn window_size(&self) -> WindowSize {
        self.window
    }

    /// Ask the scene manager to switch scenes once the current update returns.
    /// A later request in the same frame replaces an earlier one.
    pub fn request_scene(&mut self, name: impl Into<String>) {
        let name = name.into();
        debug!("Scene switch to \"{}\" requested", name);
        self.next_scene = Some(name);
    }

    pub fn take_scene_request(&mut self) -> Option<String> {
        self.next_scene.take()
    }

    pub fn request_quit(&mut self) {
        info!("Quit requested");
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::drawqueue::DrawCommand;

    #[test]
    fn test_defaults_match_host() {
        let ctx = AppContext::default();
        assert_eq!(ctx.clear_color(), DEFAULT_CLEAR_COLOR);
        assert_eq!(ctx.window_size(), WindowSize::new(1280, 720));
        assert!(!ctx.quit_requested());
    }

    #[test]
    fn test_draw_calls_are_recorded() {
        let mut ctx = AppContext::default();
        ctx.draw_rect(1.0, 2.0, 3.0, 4.0, Color::RED);
        ctx.draw_text("hello", 5.0, 6.0);
        assert_eq!(ctx.draw.len(), 2);
        assert_eq!(
            ctx.draw.commands()[1],
            DrawCommand::Text {
                text: "hello".into(),
                x: 5.0,
                y: 6.0
            }
        );
    }

    #[test]
    fn test_scene_request_is_taken_once() {
        let mut ctx = AppContext::default();
        ctx.request_scene("a");
        ctx.request_scene("b");
        assert_eq!(ctx.take_scene_request().as_deref(), Some("b"));
        assert_eq!(ctx.take_scene_request(), None);
    }

    #[test]
    fn test_set_clear_color_clamps() {
        let mut ctx = AppContext::default();
        ctx.set_clear_color(2.0, 0.5, -1.0);
        assert_eq!(ctx.clear_color(), Color::rgb(1.0, 0.5, 0.0));
    }
}
