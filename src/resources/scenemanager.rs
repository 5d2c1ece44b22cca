//! Named scene registry with a single active scene.
//!
//! Scenes implement [`Scene`], whose four lifecycle hooks all default to no-ops,
//! so a scene only writes the hooks it needs. [`HookScene`] builds a scene out of
//! optional closures and reports which hooks are present.
//!
//! # Switching
//!
//! [`SceneManager::enter`] runs the active scene's `exit` hook, then the new
//! scene's `enter` hook, and only then records the new scene as current. Scenes
//! that want to switch from inside their own `update` call
//! [`AppContext::request_scene`]; the manager applies the request right after
//! that `update` returns.

use std::fmt;

use log::{debug, info, warn};
use rustc_hash::FxHashMap;

use crate::error::{FrameError, SceneError};
use crate::resources::context::AppContext;

/// A game scene. Every hook is optional.
pub trait Scene {
    fn enter(&mut self, _ctx: &mut AppContext) -> Result<(), FrameError> {
        Ok(())
    }

    fn update(&mut self, _ctx: &mut AppContext, _dt: f32) -> Result<(), FrameError> {
        Ok(())
    }

    fn draw(&mut self, _ctx: &mut AppContext) -> Result<(), FrameError> {
        Ok(())
    }

    fn exit(&mut self, _ctx: &mut AppContext) -> Result<(), FrameError> {
        Ok(())
    }
}

/// Lifecycle hook identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    Enter,
    Update,
    Draw,
    Exit,
}

pub type PhaseHook = Box<dyn FnMut(&mut AppContext) -> Result<(), FrameError>>;
pub type UpdateHook = Box<dyn FnMut(&mut AppContext, f32) -> Result<(), FrameError>>;

/// Scene assembled from optional closures.
#[derive(Default)]
pub struct HookScene {
    on_enter: Option<PhaseHook>,
    on_update: Option<UpdateHook>,
    on_draw: Option<PhaseHook>,
    on_exit: Option<PhaseHook>,
}

impl HookScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_enter(
        mut self,
        hook: impl FnMut(&mut AppContext) -> Result<(), FrameError> + 'static,
    ) -> Self {
        self.on_enter = Some(Box::new(hook));
        self
    }

    pub fn on_update(
        mut self,
        hook: impl FnMut(&mut AppContext, f32) -> Result<(), FrameError> + 'static,
    ) -> Self {
        self.on_update = Some(Box::new(hook));
        self
    }

    pub fn on_draw(
        mut self,
        hook: impl FnMut(&mut AppContext) -> Result<(), FrameError> + 'static,
    ) -> Self {
        self.on_draw = Some(Box::new(hook));
        self
    }

    pub fn on_exit(
        mut self,
        hook: impl FnMut(&mut AppContext) -> Result<(), FrameError> + 'static,
    ) -> Self {
        self.on_exit = Some(Box::new(hook));
        self
    }

    pub fn has_hook(&self, hook: Hook) -> bool {
        match hook {
            Hook::Enter => self.on_enter.is_some(),
            Hook::Update => self.on_update.is_some(),
            Hook::Draw => self.on_draw.is_some(),
            Hook::Exit => self.on_exit.is_some(),
        }
    }
}

impl Scene for HookScene {
    fn enter(&mut self, ctx: &mut AppContext) -> Result<(), FrameError> {
        match self.on_enter.as_mut() {
            Some(hook) => hook(ctx),
            None => Ok(()),
        }
    }

    fn update(&mut self, ctx: &mut AppContext, dt: f32) -> Result<(), FrameError> {
        match self.on_update.as_mut() {
            Some(hook) => hook(ctx, dt),
            None => Ok(()),
        }
    }

    fn draw(&mut self, ctx: &mut AppContext) -> Result<(), FrameError> {
        match self.on_draw.as_mut() {
            Some(hook) => hook(ctx),
            None => Ok(()),
        }
    }

    fn exit(&mut self, ctx: &mut AppContext) -> Result<(), FrameError> {
        match self.on_exit.as_mut() {
            Some(hook) => hook(ctx),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for HookScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookScene")
            .field("enter", &self.has_hook(Hook::Enter))
            .field("update", &self.has_hook(Hook::Update))
            .field("draw", &self.has_hook(Hook::Draw))
            .field("exit", &self.has_hook(Hook::Exit))
            .finish()
    }
}

/// Registry of scenes by name, at most one of them active.
#[derive(Default)]
pub struct SceneManager {
    scenes: FxHashMap<String, Box<dyn Scene>>,
    current: Option<String>,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a scene, replacing any scene already registered under `name`.
    ///
    /// Replacing the active scene swaps the object in place without running
    /// any hooks.
    pub fn register(&mut self, name: impl Into<String>, scene: impl Scene + 'static) {
        let name = name.into();
        if self.current.as_deref() == Some(name.as_str()) {
            warn!("Replacing active scene \"{}\" without exit/enter", name);
        }
        if self.scenes.insert(name.clone(), Box::new(scene)).is_some() {
            debug!("Scene \"{}\" overwritten", name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    /// Name of the active scene.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Activate `name`: exit the current scene (if any), enter the new one,
    /// then make it current.
    ///
    /// Unknown names fail without touching the active scene. A failing `exit`
    /// hook aborts the switch and keeps the old scene current; a failing
    /// `enter` hook leaves no scene current.
    pub fn enter(&mut self, name: &str, ctx: &mut AppContext) -> Result<(), FrameError> {
        if !self.scenes.contains_key(name) {
            return Err(SceneError::UnknownScene(name.to_string()).into());
        }

        if let Some(previous) = self.current.clone() {
            if let Some(scene) = self.scenes.get_mut(&previous) {
                scene.exit(ctx)?;
            }
            debug!("Exited scene \"{}\"", previous);
        }
        self.current = None;

        let scene = self
            .scenes
            .get_mut(name)
            .ok_or_else(|| SceneError::UnknownScene(name.to_string()))?;
        scene.enter(ctx)?;
        self.current = Some(name.to_string());
        info!("Entered scene \"{}\"", name);
        Ok(())
    }

    /// Delegate to the active scene's `update`, then apply any switch it requested.
    ///
    /// A requested switch is applied even when `update` fails; the update error
    /// is returned first.
    pub fn update(&mut self, ctx: &mut AppContext, dt: f32) -> Result<(), FrameError> {
        let result = match self.active_mut() {
            Some(scene) => scene.update(ctx, dt),
            None => Ok(()),
        };
        let switched = self.apply_pending(ctx);
        result.and(switched)
    }

    /// Delegate to the active scene's `draw`.
    pub fn draw(&mut self, ctx: &mut AppContext) -> Result<(), FrameError> {
        match self.active_mut() {
            Some(scene) => scene.draw(ctx),
            None => Ok(()),
        }
    }

    /// Switch to a scene requested through the context, if any.
    pub fn apply_pending(&mut self, ctx: &mut AppContext) -> Result<(), FrameError> {
        match ctx.take_scene_request() {
            Some(name) => self.enter(&name, ctx),
            None => Ok(()),
        }
    }

    /// Run the active scene's `exit` hook and leave no scene active.
    pub fn shutdown(&mut self, ctx: &mut AppContext) -> Result<(), FrameError> {
        if let Some(name) = self.current.take() {
            if let Some(scene) = self.scenes.get_mut(&name) {
                scene.exit(ctx)?;
            }
            debug!("Shut down scene \"{}\"", name);
        }
        Ok(())
    }

    fn active_mut(&mut self) -> Option<&mut Box<dyn Scene>> {
        let name = self.current.as_ref()?;
        self.scenes.get_mut(name)
    }
}

impl fmt::Debug for SceneManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneManager")
            .field("scenes", &self.scenes.keys().collect::<Vec<_>>())
            .field("current", &self.current)
            .finish()
    }
}
