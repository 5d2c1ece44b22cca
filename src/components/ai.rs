//! Minimal string-tagged steering state machine.
//!
//! An [`Ai`] is bound to one owning [`SceneNode`](crate::components::scenenode::SceneNode)
//! and holds an open-ended state label. Labels are not a closed set: any string
//! is a legal state, and states without behavior simply do nothing.
//!
//! # Architecture
//!
//! - **`"chase"`** is the only built-in behavior: every update the owner moves
//!   toward `steering.target` at `steering.speed` pixels per second. There is no
//!   arrival clamping, so a large `dt` can overshoot the target.
//! - **Custom states** are added per game with [`Ai::on_state`]. A handler
//!   registered for `"chase"` replaces the built-in one.
//! - `"idle"`, `"move"` and any other label without a handler are inert.
//!
//! # Example
//!
//! ```ignore
//! let mut ai = Ai::new(enemy, "idle", 80.0)
//!     .on_state("flee", |node, steering, dt| {
//!         let away = node.position.sub(steering.target).normalize();
//!         node.position = node.position.add(away.scale(steering.speed * dt));
//!     });
//! ai.set_target(player_pos);
//! ai.set_state("chase");
//! ai.update(&mut tree, dt);
//! ```

use std::fmt;

use log::trace;
use rustc_hash::FxHashMap;

use crate::components::scenenode::{NodeId, SceneNode, SceneTree};
use crate::math::Vector2;

pub const STATE_IDLE: &str = "idle";
pub const STATE_MOVE: &str = "move";
pub const STATE_CHASE: &str = "chase";

/// Where the AI is heading and how fast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    pub target: Vector2,
    pub speed: f32,
}

/// Per-state update logic: owner node, steering parameters, delta seconds.
pub type StateHandler = Box<dyn FnMut(&mut SceneNode, &Steering, f32)>;

/// Finite-state steering bound to one scene node.
pub struct Ai {
    owner: NodeId,
    state: String,
    pub steering: Steering,
    handlers: FxHashMap<String, StateHandler>,
}

impl Ai {
    pub fn new(owner: NodeId, state: impl Into<String>, speed: f32) -> Self {
        Ai {
            owner,
            state: state.into(),
            steering: Steering {
                target: Vector2::ZERO,
                speed,
            },
            handlers: FxHashMap::default(),
        }
    }

    /// Register behavior for a state (builder pattern).
    pub fn on_state(
        mut self,
        state: impl Into<String>,
        handler: impl FnMut(&mut SceneNode, &Steering, f32) + 'static,
    ) -> Self {
        self.handlers.insert(state.into(), Box::new(handler));
        self
    }

    pub fn owner(&self) -> NodeId {
        self.owner
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn set_state(&mut self, state: impl Into<String>) {
        let state = state.into();
        if state != self.state {
            trace!("AI {:?}: {} -> {}", self.owner, self.state, state);
        }
        self.state = state;
    }

    pub fn set_target(&mut self, target: Vector2) {
        self.steering.target = target;
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.steering.speed = speed;
    }

    /// Run the current state's behavior on the owner. A missing owner is a no-op.
    pub fn update(&mut self, tree: &mut SceneTree, dt: f32) {
        let Some(node) = tree.get_mut(self.owner) else {
            return;
        };
        if let Some(handler) = self.handlers.get_mut(&self.state) {
            handler(node, &self.steering, dt);
        } else if self.state == STATE_CHASE {
            chase(node, &self.steering, dt);
        }
    }
}

/// Move `node` toward the target along the normalized direction.
pub fn chase(node: &mut SceneNode, steering: &Steering, dt: f32) {
    let to_target = steering.target.sub(node.position);
    if to_target.length() > 0.0 {
        let step = to_target.normalize().scale(steering.speed * dt);
        node.position = node.position.add(step);
    }
}

impl fmt::Debug for Ai {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ai")
            .field("owner", &self.owner)
            .field("state", &self.state)
            .field("steering", &self.steering)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
