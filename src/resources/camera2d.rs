//! Shared 2D camera.
//!
//! A pure affine transform: translation by `position` followed by uniform
//! `zoom`. There is no rotation. [`Camera::world_to_screen`] and
//! [`Camera::screen_to_world`] are exact inverses for any positive zoom.

use crate::error::FrameworkError;
use crate::math::Vector2;
use crate::resources::drawqueue::DrawCommand;
use crate::resources::input::InputState;

/// World/screen transform held by the application context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vector2,
    zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            position: Vector2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn new(position: Vector2, zoom: f32) -> Result<Self, FrameworkError> {
        let mut camera = Camera::default();
        camera.set_position(position);
        camera.set_zoom(zoom)?;
        Ok(camera)
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_position(&mut self, position: Vector2) {
        self.position = position;
    }

    /// Set the zoom factor. Non-positive or non-finite values are rejected and
    /// leave the camera unchanged.
    pub fn set_zoom(&mut self, zoom: f32) -> Result<(), FrameworkError> {
        if !(zoom.is_finite() && zoom > 0.0) {
            return Err(FrameworkError::InvalidZoom(zoom));
        }
        self.zoom = zoom;
        Ok(())
    }

    /// `(w - p) * z`
    pub fn world_to_screen(&self, world: Vector2) -> Vector2 {
        world.sub(self.position).scale(self.zoom)
    }

    /// `s / z + p`
    pub fn screen_to_world(&self, screen: Vector2) -> Vector2 {
        screen
            .div(Vector2::new(self.zoom, self.zoom))
            .add(self.position)
    }

    /// Mouse cursor in world coordinates.
    pub fn mouse_world(&self, input: &InputState) -> Vector2 {
        self.screen_to_world(input.mouse)
    }

    /// Map a command recorded in world coordinates to screen coordinates.
    /// Sizes scale with zoom; text keeps its size.
    pub fn project(&self, command: DrawCommand) -> DrawCommand {
        let to_screen = |x: f32, y: f32| self.world_to_screen(Vector2::new(x, y));
        match command {
            DrawCommand::Rect { x, y, w, h, color } => {
                let p = to_screen(x, y);
                DrawCommand::Rect {
                    x: p.x,
                    y: p.y,
                    w: w * self.zoom,
                    h: h * self.zoom,
                    color,
                }
            }
            DrawCommand::Circle {
                x,
                y,
                radius,
                color,
            } => {
                let p = to_screen(x, y);
                DrawCommand::Circle {
                    x: p.x,
                    y: p.y,
                    radius: radius * self.zoom,
                    color,
                }
            }
            DrawCommand::Line {
                x1,
                y1,
                x2,
                y2,
                color,
            } => {
                let (a, b) = (to_screen(x1, y1), to_screen(x2, y2));
                DrawCommand::Line {
                    x1: a.x,
                    y1: a.y,
                    x2: b.x,
                    y2: b.y,
                    color,
                }
            }
            DrawCommand::Text { text, x, y } => {
                let p = to_screen(x, y);
                DrawCommand::Text { text, x: p.x, y: p.y }
            }
        }
    }
}
