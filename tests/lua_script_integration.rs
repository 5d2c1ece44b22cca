//! Scripted game integration tests.
//!
//! Runs Lua scripts through the engine and the headless host.
//!
//! # Usage
//!
//! ```sh
//! cargo test --test lua_script_integration
//! ```

#![cfg(feature = "lua")]

use std::path::Path;

use scenekit::backend::headless::HeadlessHost;
use scenekit::backend::run;
use scenekit::error::FrameError;
use scenekit::game::Engine;
use scenekit::math::Color;
use scenekit::resources::context::AppContext;
use scenekit::resources::drawqueue::DrawCommand;
use scenekit::resources::input::Key;
use scenekit::resources::lua_runtime::ScriptedGame;

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

const COUNTER: &str = r#"
calls = {}
t = 0

function init()
    table.insert(calls, "init")
end

function loop(dt)
    table.insert(calls, "loop")
    t = t + dt
end

function window()
    table.insert(calls, "window")
    draw.rect(t * 10, 0, 5, 5, 1, 1, 1)
end
"#;

#[test]
fn entry_points_run_in_frame_order() {
    let game = ScriptedGame::from_source(COUNTER, "counter").unwrap();
    let mut engine = Engine::new(game, AppContext::default());
    let mut host = HeadlessHost::new(0.5, Some(2));
    run(&mut host, &mut engine).unwrap();

    let lua = engine.game().runtime().lua();
    let calls: Vec<String> = lua.load("return calls").eval().unwrap();
    assert_eq!(calls, vec!["init", "loop", "window", "loop", "window"]);

    let last = host.last_frame().unwrap();
    let DrawCommand::Rect { x, .. } = last.commands[0] else {
        panic!("expected rect");
    };
    assert!(approx_eq(x, 10.0));
}

#[test]
fn script_sees_keyboard_and_mouse() {
    let script = r#"
    function window()
        if keyboard.isDown("left") then
            draw.circle(mouse.x(), mouse.y(), 4, 1, 0, 0)
        end
    end
    "#;
    let game = ScriptedGame::from_source(script, "input").unwrap();
    let mut engine = Engine::new(game, AppContext::default());
    let mut host = HeadlessHost::new(0.1, Some(3)).with_input(|frame, input| {
        input.set_key(Key::Left, frame == 2);
        input.set_mouse(40.0, 50.0);
    });
    run(&mut host, &mut engine).unwrap();
    assert_eq!(
        host.last_frame().unwrap().commands,
        vec![DrawCommand::Circle {
            x: 40.0,
            y: 50.0,
            radius: 4.0,
            color: Color::RED
        }]
    );
}

#[test]
fn clear_color_and_window_size_round_trip() {
    let script = r#"
    function init()
        graphics.setClearColor(0.25, 0.5, 0.75)
    end
    function window()
        local c = graphics.getClearColor()
        local s = graphics.getWindowSize()
        draw.text(c.r .. "," .. s.width .. "x" .. s.height, 0, 0)
    end
    "#;
    let game = ScriptedGame::from_source(script, "graphics").unwrap();
    let mut engine = Engine::new(game, AppContext::default());
    let mut host = HeadlessHost::new(0.1, Some(1))
        .with_window(scenekit::resources::windowsize::WindowSize::new(800, 600));
    run(&mut host, &mut engine).unwrap();

    let last = host.last_frame().unwrap();
    assert_eq!(last.clear_color, Color::rgb(0.25, 0.5, 0.75));
    assert_eq!(
        last.commands,
        vec![DrawCommand::Text {
            text: "0.25,800x600".into(),
            x: 0.0,
            y: 0.0
        }]
    );
}

#[test]
fn runtime_errors_are_logged_and_frames_continue() {
    let script = r#"
    n = 0
    function loop(dt)
        n = n + 1
        if n % 2 == 0 then error("even frame") end
    end
    function window() draw.text(tostring(n), 0, 0) end
    "#;
    let game = ScriptedGame::from_source(script, "errors").unwrap();
    let mut engine = Engine::new(game, AppContext::default());
    let mut host = HeadlessHost::new(0.1, Some(4));
    assert_eq!(run(&mut host, &mut engine).unwrap(), 4);
    assert_eq!(engine.failed_frames(), 2);
}

#[test]
fn init_error_stops_before_first_frame() {
    let game = ScriptedGame::from_source("function init() error('no') end", "bad_init").unwrap();
    let mut engine = Engine::new(game, AppContext::default());
    let mut host = HeadlessHost::new(0.1, Some(4));
    let err = run(&mut host, &mut engine).unwrap_err();
    assert!(matches!(err, FrameError::Script(_)));
    assert_eq!(host.frames(), 0);
}

#[test]
fn engine_quit_ends_the_loop() {
    let script = r#"
    frames = 0
    function loop(dt)
        frames = frames + 1
        if frames == 3 then engine.quit() end
    end
    "#;
    let game = ScriptedGame::from_source(script, "quit").unwrap();
    let mut engine = Engine::new(game, AppContext::default());
    let mut host = HeadlessHost::new(0.1, None);
    assert_eq!(run(&mut host, &mut engine).unwrap(), 3);
}

#[test]
fn bundled_bounce_script_runs() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/bounce.lua");
    let game = ScriptedGame::from_path(&path).unwrap();
    let mut engine = Engine::new(game, AppContext::default());
    let mut host = HeadlessHost::new(1.0 / 60.0, Some(120));
    run(&mut host, &mut engine).unwrap();
    assert_eq!(engine.failed_frames(), 0);
    assert_eq!(host.last_frame().unwrap().commands.len(), 3);
    assert_eq!(engine.context().clear_color(), Color::rgb(0.05, 0.05, 0.1));
}
