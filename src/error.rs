//! Error types surfaced by the framework.
//!
//! Missing optional hooks are never errors; they are absorbed as no-ops. What
//! remains is invalid construction input, bad scene-graph edits, listener
//! failures during a signal emission, and failures reported by a game's frame
//! phases.

use thiserror::Error;

use crate::components::scenenode::NodeId;

/// Boxed error returned by user callbacks (signal listeners, hooks).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Invalid construction or mutation parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameworkError {
    #[error("duration must be a positive number of seconds, got {0}")]
    InvalidDuration(f32),

    #[error("camera zoom must be positive, got {0}")]
    InvalidZoom(f32),
}

/// Scene graph and scene manager failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("node {0:?} does not exist in this tree")]
    UnknownNode(NodeId),

    #[error("node {0:?} cannot be its own child")]
    SelfParent(NodeId),

    #[error("adding {child:?} under {parent:?} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("no scene registered under \"{0}\"")]
    UnknownScene(String),
}

/// A listener failed, aborting the remaining dispatch of one emission.
#[derive(Error, Debug)]
#[error("listener #{index} of signal \"{signal}\" failed: {source}")]
pub struct SignalError {
    pub signal: String,
    pub index: usize,
    #[source]
    pub source: BoxError,
}

/// Failure of one of the game's frame phases.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Signal(#[from] SignalError),

    #[error(transparent)]
    Framework(#[from] FrameworkError),

    #[error("script error: {0}")]
    Script(String),
}
