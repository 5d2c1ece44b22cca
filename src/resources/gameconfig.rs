//! Game configuration resource.
//!
//! Settings loaded from an INI configuration file. Every key is optional and
//! falls back to the defaults, so a missing or partial file still starts the
//! game with the host's usual window.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 1280
//! height = 720
//! title = Game Framework
//! target_fps = 60
//! vsync = true
//!
//! [graphics]
//! clear_r = 0.1
//! clear_g = 0.1
//! clear_b = 0.1
//!
//! [headless]
//! frames = 600
//! dt = 0.016666668
//! ```

use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::math::Color;
use crate::resources::context::DEFAULT_CLEAR_COLOR;
use crate::resources::windowsize::WindowSize;

/// Default safe values for startup
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_TITLE: &str = "Game Framework";
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_VSYNC: bool = true;
const DEFAULT_HEADLESS_FRAMES: u64 = 600;
const DEFAULT_HEADLESS_DT: f32 = 1.0 / 60.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Window, graphics and headless-run settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    pub title: String,
    /// Target frames per second.
    pub target_fps: u32,
    /// Enable vertical sync.
    pub vsync: bool,
    /// Background color at startup; scripts may change it later.
    pub clear_color: Color,
    /// Frames to run when no window is opened.
    pub headless_frames: u64,
    /// Fixed delta, in seconds, for headless frames.
    pub headless_dt: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            title: DEFAULT_TITLE.to_string(),
            target_fps: DEFAULT_TARGET_FPS,
            vsync: DEFAULT_VSYNC,
            clear_color: DEFAULT_CLEAR_COLOR,
            headless_frames: DEFAULT_HEADLESS_FRAMES,
            headless_dt: DEFAULT_HEADLESS_DT,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);

        info!(
            "Loaded config: {}x{} \"{}\", fps={}, vsync={}, headless {} frame(s) at dt={}",
            self.window_width,
            self.window_height,
            self.title,
            self.target_fps,
            self.vsync,
            self.headless_frames,
            self.headless_dt
        );

        Ok(())
    }

    /// Load configuration from INI text instead of a file.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(title) = config.get("window", "title") {
            self.title = title;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(vsync) = config.getbool("window", "vsync").ok().flatten() {
            self.vsync = vsync;
        }

        // [graphics] section
        let mut clear = self.clear_color;
        if let Some(r) = config.getfloat("graphics", "clear_r").ok().flatten() {
            clear.r = r as f32;
        }
        if let Some(g) = config.getfloat("graphics", "clear_g").ok().flatten() {
            clear.g = g as f32;
        }
        if let Some(b) = config.getfloat("graphics", "clear_b").ok().flatten() {
            clear.b = b as f32;
        }
        self.clear_color = clear.clamped();

        // [headless] section
        if let Some(frames) = config.getuint("headless", "frames").ok().flatten() {
            self.headless_frames = frames;
        }
        if let Some(dt) = config.getfloat("headless", "dt").ok().flatten() {
            self.headless_dt = dt as f32;
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [window] section
        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "title", Some(self.title.clone()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "vsync", Some(self.vsync.to_string()));

        // [graphics] section
        config.set("graphics", "clear_r", Some(self.clear_color.r.to_string()));
        config.set("graphics", "clear_g", Some(self.clear_color.g.to_string()));
        config.set("graphics", "clear_b", Some(self.clear_color.b.to_string()));

        // [headless] section
        config.set("headless", "frames", Some(self.headless_frames.to_string()));
        config.set("headless", "dt", Some(self.headless_dt.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Set window size.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_width = width;
        self.window_height = height;
    }

    /// Get the window size.
    pub fn window_size(&self) -> WindowSize {
        WindowSize::new(self.window_width, self.window_height)
    }
}
