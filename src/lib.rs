//! scenekit library.
//!
//! A small 2D scene and entity framework: a node tree, timed animations and
//! timers, particles, collision predicates, steering AI, signals, a camera, a
//! scene manager and linear dialogue, all driven by a three-phase frame
//! contract (`init`, then `update(dt)` and `draw()` every frame).
//!
//! - [`math`] – `Vector2` and `Color` value types
//! - [`collision`] – stateless geometric predicates
//! - [`components`] – things a scene owns (nodes, animations, timers, ...)
//! - [`events`] – the `Signal` dispatcher
//! - [`resources`] – the application context and the long-lived state it carries
//! - [`game`] – the `Game` trait and the `Engine` frame driver
//! - [`backend`] – host collaborators (headless, raylib)
//! - [`demo`] – built-in demo game

pub mod backend;
pub mod collision;
pub mod components;
pub mod demo;
pub mod error;
pub mod events;
pub mod game;
pub mod math;
pub mod resources;
