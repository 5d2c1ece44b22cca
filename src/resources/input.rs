//! Per-frame keyboard and mouse snapshot.
//!
//! The host backend fills an [`InputState`] before each `update` so that game
//! code can query `keyboard.isDown` and `mouse.x/y` without touching the window
//! layer. Only a fixed vocabulary of keys is tracked.

use log::debug;

use crate::math::Vector2;

/// Keys the framework exposes to games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
    Space,
    Escape,
}

impl Key {
    pub const ALL: [Key; 10] = [
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Space,
        Key::Escape,
    ];

    /// Parse a key name as used by scripts (`"up"`, `"space"`, `"a"`...).
    pub fn from_name(name: &str) -> Option<Key> {
        match name {
            "up" => Some(Key::Up),
            "down" => Some(Key::Down),
            "left" => Some(Key::Left),
            "right" => Some(Key::Right),
            "w" => Some(Key::W),
            "a" => Some(Key::A),
            "s" => Some(Key::S),
            "d" => Some(Key::D),
            "space" => Some(Key::Space),
            "escape" => Some(Key::Escape),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Key::Up => "up",
            Key::Down => "down",
            Key::Left => "left",
            Key::Right => "right",
            Key::W => "w",
            Key::A => "a",
            Key::S => "s",
            Key::D => "d",
            Key::Space => "space",
            Key::Escape => "escape",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Snapshot of the tracked keys and the mouse cursor.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    down: [bool; Key::ALL.len()],
    /// Cursor position in drawing coordinates.
    pub mouse: Vector2,
}

impl InputState {
    pub fn set_key(&mut self, key: Key, down: bool) {
        self.down[key.index()] = down;
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.down[key.index()]
    }

    /// Name-based lookup. Names outside the vocabulary are never down.
    pub fn is_down_by_name(&self, name: &str) -> bool {
        match Key::from_name(name) {
            Some(key) => self.is_down(key),
            None => {
                debug!("unknown key name \"{}\"", name);
                false
            }
        }
    }

    pub fn set_mouse(&mut self, x: f32, y: f32) {
        self.mouse = Vector2::new(x, y);
    }

    /// Release every key.
    pub fn clear_keys(&mut self) {
        self.down = [false; Key::ALL.len()];
    }
}
