//! Built-in demo game.
//!
//! Two scenes wired through a [`SceneManager`]:
//!
//! - **menu**: a pulsing title driven by a looping [`Animation`] and a short
//!   [`Dialogue`] advanced with Space. Space on the last line starts the game,
//!   Escape quits.
//! - **play**: the player rectangle moves with WASD or the arrow keys and leaves
//!   a particle trail. An enemy circle chases it through an [`Ai`]; contact
//!   emits the `player_hit` [`Signal`] and respawns the enemy in a burst of
//!   particles. A [`Timer`] adds a point every second. Touching the green goal
//!   or pressing Escape returns to the menu. Hovering the mouse over either
//!   actor highlights it.

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, info};

use crate::collision::{circle_circle, point_circle, point_rect, rect_rect};
use crate::components::ai::{Ai, STATE_CHASE};
use crate::components::animation::{Animation, Easing};
use crate::components::dialogue::Dialogue;
use crate::components::particleemitter::ParticleEmitter;
use crate::components::scenenode::{NodeId, NodeKind, SceneNode, SceneTree};
use crate::components::timer::Timer;
use crate::error::FrameError;
use crate::events::signal::{Signal, listener};
use crate::game::SceneGame;
use crate::math::{Color, Vector2};
use crate::resources::camera2d::Camera;
use crate::resources::drawqueue::DrawQueue;
use crate::resources::context::AppContext;
use crate::resources::input::Key;
use crate::resources::scenemanager::{Scene, SceneManager};

pub const MENU: &str = "menu";
pub const PLAY: &str = "play";

const PLAYER_SIZE: f32 = 32.0;
const PLAYER_SPEED: f32 = 220.0;
const ENEMY_RADIUS: f32 = 12.0;
const ENEMY_SPEED: f32 = 120.0;
const ENEMY_SPAWN: Vector2 = Vector2::new(1000.0, 600.0);
const GOAL: (f32, f32, f32, f32) = (1180.0, 40.0, 60.0, 60.0);

/// The demo as a ready-to-run game starting on the menu.
pub fn build() -> SceneGame {
    let mut scenes = SceneManager::new();
    scenes.register(MENU, MenuScene::default());
    scenes.register(PLAY, PlayScene::default());
    SceneGame::new(scenes, MENU)
}

/// Rising-edge detector for a held key.
#[derive(Debug, Default, Clone, Copy)]
struct Edge(bool);

impl Edge {
    fn rising(&mut self, down: bool) -> bool {
        let fired = down && !self.0;
        self.0 = down;
        fired
    }
}

struct MenuState {
    pulse_anim: Animation,
    pulse: Rc<Cell<f32>>,
    intro: Dialogue,
    space: Edge,
    escape: Edge,
}

#[derive(Default)]
struct MenuScene {
    state: Option<MenuState>,
}

impl Scene for MenuScene {
    fn enter(&mut self, ctx: &mut AppContext) -> Result<(), FrameError> {
        ctx.set_clear_color(0.08, 0.08, 0.14);
        let pulse = Rc::new(Cell::new(0.0));
        let sink = pulse.clone();
        let pulse_anim = Animation::new(1.5)?
            .with_loop(true)
            .with_easing(Easing::QuadInOut)
            .on_progress(move |p| sink.set(p));
        self.state = Some(MenuState {
            pulse_anim,
            pulse,
            intro: Dialogue::new([
                "Welcome to scenekit.",
                "Move with WASD or the arrow keys.",
                "Reach the green goal and dodge the red hunter.",
                "Press SPACE to begin.",
            ]),
            // Keys already held while entering do not count as presses.
            space: Edge(ctx.is_key_down(Key::Space)),
            escape: Edge(ctx.is_key_down(Key::Escape)),
        });
        Ok(())
    }

    fn update(&mut self, ctx: &mut AppContext, dt: f32) -> Result<(), FrameError> {
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };
        state.pulse_anim.update(dt);

        if state.escape.rising(ctx.is_key_down(Key::Escape)) {
            ctx.request_quit();
            return Ok(());
        }
        if state.space.rising(ctx.is_key_down(Key::Space)) {
            if state.intro.is_finished() {
                ctx.request_scene(PLAY);
            } else {
                state.intro.next();
                debug!("Dialogue line {}", state.intro.cursor());
            }
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut AppContext) -> Result<(), FrameError> {
        let Some(state) = self.state.as_ref() else {
            return Ok(());
        };
        let (cx, cy) = ctx.window_size().center();
        let width = 240.0 + 120.0 * state.pulse.get();
        ctx.draw_rect(cx - width / 2.0, cy - 160.0, width, 48.0, Color::rgb(0.9, 0.4, 0.1));
        ctx.draw_text("SCENEKIT", cx - 50.0, cy - 146.0);
        state.intro.draw(&mut ctx.draw, cx - 220.0, cy);
        ctx.draw_text("SPACE: next   ESC: quit", cx - 120.0, cy + 200.0);
        Ok(())
    }

    fn exit(&mut self, _ctx: &mut AppContext) -> Result<(), FrameError> {
        self.state = None;
        Ok(())
    }
}

struct PlayState {
    tree: SceneTree,
    world: NodeId,
    hud: NodeId,
    player: NodeId,
    enemy: NodeId,
    score_label: NodeId,
    ai: Ai,
    sparks: ParticleEmitter,
    score_timer: Timer,
    score: Rc<Cell<u32>>,
    hits: Rc<Cell<u32>>,
    on_hit: Signal<u32>,
    escape: Edge,
}

impl PlayState {
    fn new(ctx: &AppContext) -> Result<Self, FrameError> {
        let mut tree = SceneTree::new();
        let world = tree.insert(SceneNode::new_group());
        let (gx, gy, gw, gh) = GOAL;
        let goal = tree.insert(
            SceneNode::new_rect(gx, gy, gw, gh)
                .with_color(Color::GREEN)
                .with_behavior(|node, dt| node.rotation = (node.rotation + 90.0 * dt) % 360.0),
        );
        let player = tree.insert(
            SceneNode::new_rect(100.0, 360.0, PLAYER_SIZE, PLAYER_SIZE).with_color(Color::BLUE),
        );
        let enemy = tree.insert(
            SceneNode::new_circle(ENEMY_SPAWN.x, ENEMY_SPAWN.y, ENEMY_RADIUS).with_color(Color::RED),
        );
        let hud = tree.insert(SceneNode::new_group());
        let score_label = tree.insert(SceneNode::new_label("", 10.0, 10.0));
        tree.add_child(world, goal)?;
        tree.add_child(world, player)?;
        tree.add_child(world, enemy)?;
        tree.add_child(hud, score_label)?;

        let score = Rc::new(Cell::new(0));
        let points = score.clone();
        let score_timer = Timer::new(1.0, move || points.set(points.get() + 1))?;

        let hits = Rc::new(Cell::new(0));
        let mut on_hit = Signal::new("player_hit");
        let counter = hits.clone();
        on_hit.connect(listener(move |damage: &u32| {
            counter.set(counter.get() + damage);
            Ok(())
        }));
        on_hit.connect(listener(|damage: &u32| {
            info!("Player hit for {}", damage);
            Ok(())
        }));

        Ok(PlayState {
            tree,
            world,
            hud,
            player,
            enemy,
            score_label,
            ai: Ai::new(enemy, STATE_CHASE, ENEMY_SPEED),
            sparks: ParticleEmitter::new(Vector2::ZERO),
            score_timer,
            score,
            hits,
            on_hit,
            escape: Edge(ctx.is_key_down(Key::Escape)),
        })
    }

    fn position(&self, id: NodeId) -> Vector2 {
        self.tree.get(id).map(|n| n.position).unwrap_or_default()
    }

    fn set_color(&mut self, id: NodeId, color: Color) {
        if let Some(node) = self.tree.get_mut(id) {
            node.color = color;
        }
    }
}

fn movement_input(ctx: &AppContext) -> Vector2 {
    let axis = |neg: [Key; 2], pos: [Key; 2]| {
        let down = |keys: [Key; 2]| keys.iter().any(|k| ctx.is_key_down(*k));
        (down(pos) as i32 - down(neg) as i32) as f32
    };
    Vector2::new(
        axis([Key::Left, Key::A], [Key::Right, Key::D]),
        axis([Key::Up, Key::W], [Key::Down, Key::S]),
    )
    .normalize()
}

#[derive(Default)]
struct PlayScene {
    state: Option<PlayState>,
}

impl Scene for PlayScene {
    fn enter(&mut self, ctx: &mut AppContext) -> Result<(), FrameError> {
        ctx.set_clear_color(0.05, 0.05, 0.05);
        ctx.camera = Camera::default();
        self.state = Some(PlayState::new(ctx)?);
        Ok(())
    }

    fn update(&mut self, ctx: &mut AppContext, dt: f32) -> Result<(), FrameError> {
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };
        if state.escape.rising(ctx.is_key_down(Key::Escape)) {
            ctx.request_scene(MENU);
            return Ok(());
        }

        let direction = movement_input(ctx);
        if let Some(node) = state.tree.get_mut(state.player) {
            node.position = node.position.add(direction.scale(PLAYER_SPEED * dt));
        }
        let half = PLAYER_SIZE / 2.0;
        let player_pos = state.position(state.player);
        let player_center = player_pos.add(Vector2::new(half, half));

        if direction.length() > 0.0 {
            let trail = direction.scale(-40.0);
            state.sparks.set_position(player_center);
            state
                .sparks
                .emit(1, trail.x, trail.y, 0.5, Color::rgba(0.4, 0.6, 1.0, 0.8));
        }

        state.ai.set_target(player_center);
        state.ai.update(&mut state.tree, dt);
        state.tree.update(state.world, dt);
        state.tree.update(state.hud, dt);
        state.sparks.update(dt);

        state.score_timer.update(dt);
        if state.score_timer.is_finished() {
            state.score_timer.reset();
        }

        let enemy_pos = state.position(state.enemy);
        if circle_circle(
            enemy_pos.x,
            enemy_pos.y,
            ENEMY_RADIUS,
            player_center.x,
            player_center.y,
            half,
        ) {
            state.on_hit.emit(&1)?;
            state.sparks.set_position(enemy_pos);
            state.sparks.emit(20, 0.0, 0.0, 0.6, Color::RED);
            if let Some(enemy) = state.tree.get_mut(state.enemy) {
                enemy.position = ENEMY_SPAWN;
            }
        }

        let (gx, gy, gw, gh) = GOAL;
        if rect_rect(
            player_pos.x,
            player_pos.y,
            PLAYER_SIZE,
            PLAYER_SIZE,
            gx,
            gy,
            gw,
            gh,
        ) {
            info!(
                "Goal reached with score {} and {} hit(s)",
                state.score.get(),
                state.hits.get()
            );
            ctx.request_scene(MENU);
        }

        let mouse = ctx.camera.mouse_world(&ctx.input);
        let player_hover = point_rect(
            mouse.x,
            mouse.y,
            player_pos.x,
            player_pos.y,
            PLAYER_SIZE,
            PLAYER_SIZE,
        );
        let enemy_hover = point_circle(mouse.x, mouse.y, enemy_pos.x, enemy_pos.y, ENEMY_RADIUS);
        let player_color = if player_hover { Color::WHITE } else { Color::BLUE };
        let enemy_color = if enemy_hover { Color::YELLOW } else { Color::RED };
        state.set_color(state.player, player_color);
        state.set_color(state.enemy, enemy_color);

        if let Some(label) = state.tree.get_mut(state.score_label) {
            label.kind = NodeKind::Label {
                text: format!("Score: {}  Hits: {}", state.score.get(), state.hits.get()),
            };
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut AppContext) -> Result<(), FrameError> {
        let Some(state) = self.state.as_ref() else {
            return Ok(());
        };
        // World layer is recorded in world space and projected through the
        // camera; the HUD is already in screen space.
        let mut world = DrawQueue::new();
        state.tree.draw(state.world, &mut world);
        state.sparks.draw(&mut world);
        let enemy = state.position(state.enemy);
        let target = state.ai.steering.target;
        world.line(
            enemy.x,
            enemy.y,
            target.x,
            target.y,
            Color::RED.with_alpha(0.25),
        );
        for command in world.drain() {
            ctx.draw.push(ctx.camera.project(command));
        }
        state.tree.draw(state.hud, &mut ctx.draw);
        Ok(())
    }

    fn exit(&mut self, _ctx: &mut AppContext) -> Result<(), FrameError> {
        self.state = None;
        Ok(())
    }
}
