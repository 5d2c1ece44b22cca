//! Particle emitter and its particles.
//!
//! A [`ParticleEmitter`] exclusively owns a list of [`Particle`]s. Each
//! [`ParticleEmitter::emit`] call appends exactly `count` new particles; there is
//! no cap on how many are alive at once. Every update moves particles linearly
//! and prunes the ones whose lifetime ran out, in the same call.
//!
//! # How It Works
//!
//! 1. `emit(count, vx, vy, lifetime, color)` spawns particles at the emitter
//!    position plus a random offset in `[-spread, spread]` on each axis, with
//!    velocity `(vx, vy)` plus random jitter in `[-jitter, jitter]`.
//! 2. `update(dt)` advances `position += velocity * dt` and `elapsed += dt`,
//!    then drops every particle with `elapsed >= lifetime`.
//! 3. `draw(queue)` issues one circle per surviving particle. Nothing is
//!    batched, so callers wanting many particles should throttle `emit`.
//!
//! # Example
//!
//! ```ignore
//! let mut sparks = ParticleEmitter::new(Vector2::new(320.0, 180.0));
//! sparks.emit(5, 0.0, -60.0, 1.0, Color::YELLOW);
//! sparks.update(dt);
//! sparks.draw(&mut ctx.draw);
//! ```

use fastrand::Rng;

use crate::math::{Color, Vector2};
use crate::resources::drawqueue::DrawQueue;

/// Default random spawn offset from the emitter position, per axis, in pixels.
pub const DEFAULT_SPREAD: f32 = 5.0;
/// Default random velocity jitter, per axis, in pixels per second.
pub const DEFAULT_JITTER: f32 = 20.0;
/// Radius of the circle drawn for each particle.
pub const PARTICLE_RADIUS: f32 = 2.0;

/// A linearly moving, finite-lifetime visual element.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vector2,
    pub velocity: Vector2,
    pub lifetime: f32,
    pub elapsed: f32,
    pub color: Color,
    pub alive: bool,
}

impl Particle {
    pub fn new(position: Vector2, velocity: Vector2, lifetime: f32, color: Color) -> Self {
        Particle {
            position,
            velocity,
            lifetime,
            elapsed: 0.0,
            color,
            alive: lifetime > 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.position = self.position.add(self.velocity.scale(dt));
        self.elapsed += dt;
        self.alive = self.elapsed < self.lifetime;
    }

    /// Fraction of the lifetime already spent, in `[0, 1]`.
    pub fn age(&self) -> f32 {
        if self.lifetime <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.lifetime).clamp(0.0, 1.0)
        }
    }
}

/// Owner and simulator of a batch of particles.
#[derive(Debug, Clone)]
pub struct ParticleEmitter {
    pub position: Vector2,
    /// Maximum spawn offset from `position`, per axis.
    pub spread: f32,
    /// Maximum velocity jitter, per axis.
    pub jitter: f32,
    particles: Vec<Particle>,
    rng: Rng,
}

impl ParticleEmitter {
    pub fn new(position: Vector2) -> Self {
        ParticleEmitter {
            position,
            spread: DEFAULT_SPREAD,
            jitter: DEFAULT_JITTER,
            particles: Vec::new(),
            rng: Rng::new(),
        }
    }

    /// Emitter with a deterministic random sequence.
    pub fn with_seed(position: Vector2, seed: u64) -> Self {
        ParticleEmitter {
            rng: Rng::with_seed(seed),
            ..Self::new(position)
        }
    }

    pub fn with_spread(mut self, spread: f32) -> Self {
        self.spread = spread.abs();
        self
    }

    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter.abs();
        self
    }

    pub fn set_position(&mut self, position: Vector2) {
        self.position = position;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Append exactly `count` particles.
    pub fn emit(&mut self, count: usize, vx: f32, vy: f32, lifetime: f32, color: Color) {
        self.particles.reserve(count);
        for _ in 0..count {
            let offset = Vector2::new(
                random_f32_range(&mut self.rng, -self.spread, self.spread),
                random_f32_range(&mut self.rng, -self.spread, self.spread),
            );
            let jitter = Vector2::new(
                random_f32_range(&mut self.rng, -self.jitter, self.jitter),
                random_f32_range(&mut self.rng, -self.jitter, self.jitter),
            );
            self.particles.push(Particle::new(
                self.position.add(offset),
                Vector2::new(vx, vy).add(jitter),
                lifetime,
                color,
            ));
        }
    }

    /// Move every particle and prune the expired ones.
    pub fn update(&mut self, dt: f32) {
        for particle in self.particles.iter_mut() {
            particle.update(dt);
        }
        self.particles.retain(|p| p.alive);
    }

    /// One circle per particle, unbatched.
    pub fn draw(&self, draw: &mut DrawQueue) {
        for p in &self.particles {
            draw.circle(p.position.x, p.position.y, PARTICLE_RADIUS, p.color);
        }
    }
}

/// Sample a random f32 in the range [min, max].
/// If the range is smaller than EPSILON, returns min directly.
#[inline]
fn random_f32_range(rng: &mut Rng, min: f32, max: f32) -> f32 {
    let range = max - min;
    if range < f32::EPSILON {
        return min;
    }
    min + rng.f32() * range
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::drawqueue::DrawCommand;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_emit_appends_exact_count() {
        let mut e = ParticleEmitter::with_seed(Vector2::ZERO, 7);
        e.emit(5, 0.0, 0.0, 1.0, Color::WHITE);
        assert_eq!(e.len(), 5);
        e.emit(3, 0.0, 0.0, 1.0, Color::WHITE);
        assert_eq!(e.len(), 8);
    }

    #[test]
    fn test_spawn_within_bounds() {
        let origin = Vector2::new(100.0, 50.0);
        let mut e = ParticleEmitter::with_seed(origin, 99)
            .with_spread(4.0)
            .with_jitter(10.0);
        e.emit(200, 30.0, -30.0, 2.0, Color::RED);
        for p in e.particles() {
            assert!((p.position.x - origin.x).abs() <= 4.0 + EPSILON);
            assert!((p.position.y - origin.y).abs() <= 4.0 + EPSILON);
            assert!((p.velocity.x - 30.0).abs() <= 10.0 + EPSILON);
            assert!((p.velocity.y + 30.0).abs() <= 10.0 + EPSILON);
            assert_eq!(p.color, Color::RED);
            assert!(p.alive);
        }
    }

    #[test]
    fn test_all_pruned_after_lifetime() {
        let mut e = ParticleEmitter::with_seed(Vector2::ZERO, 1);
        e.emit(5, 0.0, 0.0, 1.0, Color::WHITE);
        for _ in 0..4 {
            e.update(0.25);
        }
        assert_eq!(e.len(), 0);
    }

    #[test]
    fn test_partial_pruning() {
        let mut e = ParticleEmitter::with_seed(Vector2::ZERO, 1);
        e.emit(2, 0.0, 0.0, 0.5, Color::WHITE);
        e.emit(3, 0.0, 0.0, 2.0, Color::WHITE);
        e.update(1.0);
        assert_eq!(e.len(), 3);
        assert!(e.particles().iter().all(|p| p.lifetime == 2.0));
    }

    #[test]
    fn test_linear_motion_without_randomness() {
        let mut e = ParticleEmitter::with_seed(Vector2::new(10.0, 10.0), 3)
            .with_spread(0.0)
            .with_jitter(0.0);
        e.emit(1, 4.0, -2.0, 5.0, Color::WHITE);
        e.update(0.5);
        let p = &e.particles()[0];
        assert!(approx_eq(p.position.x, 12.0));
        assert!(approx_eq(p.position.y, 9.0));
        assert!(approx_eq(p.elapsed, 0.5));
        assert!(approx_eq(p.age(), 0.1));
    }

    #[test]
    fn test_draw_one_command_per_particle() {
        let mut e = ParticleEmitter::with_seed(Vector2::ZERO, 5);
        e.emit(4, 0.0, 0.0, 1.0, Color::BLUE);
        let mut q = DrawQueue::new();
        e.draw(&mut q);
        assert_eq!(q.len(), 4);
        assert!(q
            .commands()
            .iter()
            .all(|c| matches!(c, DrawCommand::Circle { radius, .. } if *radius == PARTICLE_RADIUS)));
    }

    #[test]
    fn test_zero_lifetime_pruned_on_next_update() {
        let mut e = ParticleEmitter::with_seed(Vector2::ZERO, 5);
        e.emit(2, 0.0, 0.0, 0.0, Color::WHITE);
        assert_eq!(e.len(), 2);
        e.update(0.0);
        assert!(e.is_empty());
    }
}
