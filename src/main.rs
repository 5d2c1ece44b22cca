//! scenekit main entry point.
//!
//! Runs either the built-in demo or a Lua script (`--script`, feature `lua`)
//! on one of two hosts:
//!
//! - a raylib window (feature `raylib`)
//! - a headless loop with a fixed delta and frame count (`--headless`, and the
//!   only choice when built without `raylib`)
//!
//! # Running
//!
//! ```sh
//! cargo run --release --features raylib
//! cargo run -- --headless --frames 120 --dump-frame last_frame.json
//! cargo run --features raylib -- --script game.lua
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};

use scenekit::backend::headless::HeadlessHost;
use scenekit::backend::run;
use scenekit::demo;
use scenekit::game::{Engine, Game};
use scenekit::resources::context::AppContext;
use scenekit::resources::gameconfig::GameConfig;

/// scenekit 2D scene framework
#[derive(Parser)]
#[command(version, about = "Runs the scenekit demo or a Lua game script.")]
struct Cli {
    /// INI configuration file. Missing files fall back to defaults.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Run without opening a window.
    #[arg(long)]
    headless: bool,

    /// Frames to run headless (overrides the config file).
    #[arg(long)]
    frames: Option<u64>,

    /// Fixed headless delta in seconds (overrides the config file).
    #[arg(long)]
    dt: Option<f32>,

    /// Write the last headless frame's draw commands to PATH as JSON.
    #[arg(long, value_name = "PATH")]
    dump_frame: Option<PathBuf>,

    /// Lua script defining init(), loop(dt) and window().
    #[cfg(feature = "lua")]
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }
    if let Some(frames) = cli.frames {
        config.headless_frames = frames;
    }
    if let Some(dt) = cli.dt {
        config.headless_dt = dt;
    }

    #[cfg(feature = "lua")]
    if let Some(path) = &cli.script {
        let game = match scenekit::resources::lua_runtime::ScriptedGame::from_path(path) {
            Ok(game) => game,
            Err(e) => {
                eprintln!("Error loading script {}: {e}", path.display());
                std::process::exit(1);
            }
        };
        exit_on_error(run_game(game, &cli, &config));
        return;
    }

    exit_on_error(run_game(demo::build(), &cli, &config));
}

fn exit_on_error(result: Result<(), String>) {
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run_game<G: Game>(game: G, cli: &Cli, config: &GameConfig) -> Result<(), String> {
    let mut ctx = AppContext::new(config.window_size());
    let clear = config.clear_color;
    ctx.set_clear_color(clear.r, clear.g, clear.b);
    let mut engine = Engine::new(game, ctx);

    let headless = cli.headless || !cfg!(feature = "raylib");
    if headless {
        info!(
            "Running headless: {} frame(s) at dt={}",
            config.headless_frames, config.headless_dt
        );
        let mut host = HeadlessHost::new(config.headless_dt, Some(config.headless_frames))
            .with_window(config.window_size());
        run(&mut host, &mut engine).map_err(|e| e.to_string())?;
        if let Some(path) = &cli.dump_frame {
            host.write_last_frame(path)
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        }
        return Ok(());
    }

    #[cfg(feature = "raylib")]
    {
        if cli.dump_frame.is_some() {
            warn!("--dump-frame only applies to headless runs");
        }
        let mut host = scenekit::backend::raylib::RaylibHost::new(config);
        run(&mut host, &mut engine).map_err(|e| e.to_string())?;
    }
    Ok(())
}
