//! Windowless host.
//!
//! Runs at a fixed delta for a bounded number of frames. Input comes from an
//! optional per-frame script instead of hardware, and the last presented frame
//! is kept so it can be inspected or written out as JSON.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use crate::backend::Host;
use crate::math::Color;
use crate::resources::context::AppContext;
use crate::resources::drawqueue::DrawCommand;
use crate::resources::input::InputState;
use crate::resources::windowsize::WindowSize;

/// Scripted input: called with the zero-based frame index before each frame.
pub type InputScript = Box<dyn FnMut(u64, &mut InputState)>;

/// Snapshot of one presented frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameDump {
    pub frame: u64,
    pub clear_color: Color,
    pub window: WindowSize,
    pub commands: Vec<DrawCommand>,
}

pub struct HeadlessHost {
    dt: f32,
    max_frames: Option<u64>,
    frames: u64,
    window: WindowSize,
    input: Option<InputScript>,
    last_frame: Option<FrameDump>,
}

impl HeadlessHost {
    /// Host that runs `max_frames` frames of `dt` seconds each. `None` runs
    /// until the game requests quit.
    pub fn new(dt: f32, max_frames: Option<u64>) -> Self {
        HeadlessHost {
            dt,
            max_frames,
            frames: 0,
            window: WindowSize::default(),
            input: None,
            last_frame: None,
        }
    }

    pub fn with_window(mut self, window: WindowSize) -> Self {
        self.window = window;
        self
    }

    pub fn with_input(mut self, script: impl FnMut(u64, &mut InputState) + 'static) -> Self {
        self.input = Some(Box::new(script));
        self
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> Option<&FrameDump> {
        self.last_frame.as_ref()
    }

    /// Write the last presented frame as pretty JSON.
    pub fn write_last_frame(&self, path: &Path) -> std::io::Result<()> {
        let Some(dump) = &self.last_frame else {
            return Err(std::io::Error::other("no frame has been presented"));
        };
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, dump).map_err(std::io::Error::from)?;
        info!("Wrote frame {} to {}", dump.frame, path.display());
        Ok(())
    }
}

impl Host for HeadlessHost {
    fn should_close(&self) -> bool {
        self.max_frames.is_some_and(|max| self.frames >= max)
    }

    fn begin_frame(&mut self, ctx: &mut AppContext) -> f32 {
        ctx.window = self.window;
        if let Some(script) = self.input.as_mut() {
            script(self.frames, &mut ctx.input);
        }
        self.dt
    }

    fn present(&mut self, clear: Color, commands: &[DrawCommand]) {
        debug!(
            "Headless frame {}: {} draw command(s)",
            self.frames,
            commands.len()
        );
        self.last_frame = Some(FrameDump {
            frame: self.frames,
            clear_color: clear,
            window: self.window,
            commands: commands.to_vec(),
        });
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::run;
    use crate::error::FrameError;
    use crate::game::{Engine, Game};
    use crate::resources::input::Key;

    struct Blinker;

    impl Game for Blinker {
        fn init(&mut self, _ctx: &mut AppContext) -> Result<(), FrameError> {
            Ok(())
        }

        fn update(&mut self, ctx: &mut AppContext, _dt: f32) -> Result<(), FrameError> {
            if ctx.is_key_down(Key::Escape) {
                ctx.request_quit();
            }
            Ok(())
        }

        fn draw(&mut self, ctx: &mut AppContext) -> Result<(), FrameError> {
            let n = ctx.time.frame_count as f32;
            ctx.draw_circle(n, 0.0, 1.0, Color::WHITE);
            Ok(())
        }
    }

    #[test]
    fn test_runs_fixed_frame_count() {
        let mut host = HeadlessHost::new(0.5, Some(4));
        let mut engine = Engine::new(Blinker, AppContext::default());
        let frames = run(&mut host, &mut engine).unwrap();
        assert_eq!(frames, 4);
        assert_eq!(host.frames(), 4);
        assert_eq!(engine.context().time.elapsed, 2.0);
        let last = host.last_frame().unwrap();
        assert_eq!(last.frame, 3);
        assert_eq!(last.commands.len(), 1);
    }

    #[test]
    fn test_scripted_escape_quits() {
        let mut host = HeadlessHost::new(0.1, None).with_input(|frame, input| {
            input.set_key(Key::Escape, frame == 2);
        });
        let mut engine = Engine::new(Blinker, AppContext::default());
        let frames = run(&mut host, &mut engine).unwrap();
        assert_eq!(frames, 3);
    }

    #[test]
    fn test_window_size_is_applied() {
        let mut host = HeadlessHost::new(0.1, Some(1)).with_window(WindowSize::new(320, 200));
        let mut engine = Engine::new(Blinker, AppContext::default());
        run(&mut host, &mut engine).unwrap();
        assert_eq!(engine.context().window_size(), WindowSize::new(320, 200));
    }

    #[test]
    fn test_dump_serializes_commands() {
        let mut host = HeadlessHost::new(0.1, Some(1));
        host.present(Color::BLACK, &[DrawCommand::Text {
            text: "hi".into(),
            x: 1.0,
            y: 2.0,
        }]);
        let json = serde_json::to_value(host.last_frame().unwrap()).unwrap();
        assert_eq!(json["commands"][0]["kind"], "text");
        assert_eq!(json["commands"][0]["text"], "hi");
        assert_eq!(json["window"]["width"], 1280);
    }

    #[test]
    fn test_write_without_frame_fails() {
        let host = HeadlessHost::new(0.1, Some(1));
        assert!(host.write_last_frame(Path::new("unused.json")).is_err());
    }
}
