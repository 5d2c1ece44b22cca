//! Windowed host on top of raylib.
//!
//! Opens the window from [`GameConfig`], maps the fixed key vocabulary to raylib
//! key codes, and renders each frame's [`DrawCommand`]s in issue order inside a
//! single `begin_drawing` scope. Escape is not bound as the exit key so games
//! can handle it themselves.

use ::raylib::prelude::{
    Color as RlColor, KeyboardKey, RaylibDraw, RaylibHandle, RaylibThread, Vector2 as RlVector2,
};
use log::info;

use crate::backend::Host;
use crate::math::Color;
use crate::resources::context::AppContext;
use crate::resources::drawqueue::DrawCommand;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::Key;
use crate::resources::windowsize::WindowSize;

const TEXT_SIZE: i32 = 20;

pub struct RaylibHost {
    rl: RaylibHandle,
    thread: RaylibThread,
}

impl RaylibHost {
    pub fn new(config: &GameConfig) -> Self {
        let mut builder = ::raylib::init();
        builder
            .size(config.window_width as i32, config.window_height as i32)
            .resizable()
            .title(&config.title);
        if config.vsync {
            builder.vsync();
        }
        let (mut rl, thread) = builder.build();
        rl.set_target_fps(config.target_fps);
        // Disable ESC to exit
        rl.set_exit_key(None);
        info!(
            "Opened {}x{} window \"{}\"",
            config.window_width, config.window_height, config.title
        );
        RaylibHost { rl, thread }
    }
}

fn key_code(key: Key) -> KeyboardKey {
    match key {
        Key::Up => KeyboardKey::KEY_UP,
        Key::Down => KeyboardKey::KEY_DOWN,
        Key::Left => KeyboardKey::KEY_LEFT,
        Key::Right => KeyboardKey::KEY_RIGHT,
        Key::W => KeyboardKey::KEY_W,
        Key::A => KeyboardKey::KEY_A,
        Key::S => KeyboardKey::KEY_S,
        Key::D => KeyboardKey::KEY_D,
        Key::Space => KeyboardKey::KEY_SPACE,
        Key::Escape => KeyboardKey::KEY_ESCAPE,
    }
}

fn to_rl(color: Color) -> RlColor {
    let c = color.clamped();
    RlColor::new(
        (c.r * 255.0).round() as u8,
        (c.g * 255.0).round() as u8,
        (c.b * 255.0).round() as u8,
        (c.a * 255.0).round() as u8,
    )
}

impl Host for RaylibHost {
    fn should_close(&self) -> bool {
        self.rl.window_should_close()
    }

    fn begin_frame(&mut self, ctx: &mut AppContext) -> f32 {
        for key in Key::ALL {
            ctx.input.set_key(key, self.rl.is_key_down(key_code(key)));
        }
        let mouse = self.rl.get_mouse_position();
        ctx.input.set_mouse(mouse.x, mouse.y);
        ctx.window = WindowSize::new(
            self.rl.get_screen_width().max(0) as u32,
            self.rl.get_screen_height().max(0) as u32,
        );
        self.rl.get_frame_time()
    }

    fn present(&mut self, clear: Color, commands: &[DrawCommand]) {
        let mut d = self.rl.begin_drawing(&self.thread);
        d.clear_background(to_rl(clear));
        for command in commands {
            match command {
                DrawCommand::Rect { x, y, w, h, color } => {
                    d.draw_rectangle_v(RlVector2::new(*x, *y), RlVector2::new(*w, *h), to_rl(*color));
                }
                DrawCommand::Circle {
                    x,
                    y,
                    radius,
                    color,
                } => {
                    d.draw_circle_v(RlVector2::new(*x, *y), *radius, to_rl(*color));
                }
                DrawCommand::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    color,
                } => {
                    d.draw_line_v(RlVector2::new(*x1, *y1), RlVector2::new(*x2, *y2), to_rl(*color));
                }
                DrawCommand::Text { text, x, y } => {
                    d.draw_text(text, *x as i32, *y as i32, TEXT_SIZE, RlColor::WHITE);
                }
            }
        }
    }
}
