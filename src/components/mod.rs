//! Components a scene owns and updates.
//!
//! Submodules overview:
//! - [`ai`] – string-tagged steering state machine bound to a node
//! - [`animation`] – timed progress callback with optional looping and easing
//! - [`dialogue`] – linear line cursor over scripted text
//! - [`particleemitter`] – particle emission, motion and pruning
//! - [`scenenode`] – scene graph nodes and the arena that owns them
//! - [`timer`] – one-shot countdown with a completion callback

pub mod ai;
pub mod animation;
pub mod dialogue;
pub mod particleemitter;
pub mod scenenode;
pub mod timer;
