//! Particles and particle pools
//!
//! Sparkler and burst particles share one data type and one integration
//! step; the owning pool picks the physics flavour.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::color::Hsl;
use crate::consts::*;

/// Which extra forces a pool applies after the shared step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Physics {
    /// Light gravity, no drag
    Sparkler,
    /// Gravity, then multiplicative drag
    Explosion,
}

/// A visual particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, decreases by `decay` every tick
    pub life: f32,
    pub max_life: f32,
    pub color: Hsl,
    /// Disc radius (px)
    pub size: f32,
    pub decay: f32,
}

/// Unit vector at a uniformly random angle, scaled by `speed`
#[inline]
fn random_heading(rng: &mut impl Rng, speed: f32) -> Vec2 {
    let angle = rng.random_range(0.0..TAU);
    Vec2::new(angle.cos(), angle.sin()) * speed
}

impl Particle {
    /// Gold/orange/white spark leaving a glyph point
    pub fn sparkler(at: Vec2, rng: &mut impl Rng) -> Self {
        let speed = rng.random_range(0.0..SPARKLER_MAX_SPEED);
        let vel = random_heading(rng, speed);
        let hue = rng.random_range(SPARKLER_HUE_MIN..SPARKLER_HUE_MAX);
        let lightness = rng.random_range(SPARKLER_LIGHTNESS_MIN..SPARKLER_LIGHTNESS_MAX);
        Self {
            pos: at,
            vel,
            life: 1.0,
            max_life: 1.0,
            color: Hsl::new(hue, 100.0, lightness),
            size: rng.random_range(SPARKLER_SIZE_MIN..SPARKLER_SIZE_MAX),
            decay: rng.random_range(SPARKLER_DECAY_MIN..SPARKLER_DECAY_MAX),
        }
    }

    /// Burst particle tinted by the firework's hue
    pub fn explosion(at: Vec2, hue: f32, rng: &mut impl Rng) -> Self {
        let speed = rng.random_range(BURST_SPEED_MIN..BURST_SPEED_MAX);
        let vel = random_heading(rng, speed);
        Self {
            pos: at,
            vel,
            life: 1.0,
            max_life: 1.0,
            color: Hsl::new(hue, 100.0, BURST_LIGHTNESS),
            size: rng.random_range(BURST_SIZE_MIN..BURST_SIZE_MAX),
            decay: rng.random_range(BURST_DECAY_MIN..BURST_DECAY_MAX),
        }
    }

    /// Advance one tick. Returns false once the particle has burnt out.
    #[inline]
    pub fn step(&mut self, physics: Physics) -> bool {
        self.pos += self.vel;
        self.life -= self.decay;
        self.vel.y += PARTICLE_GRAVITY;
        if physics == Physics::Explosion {
            self.vel *= EXPLOSION_DRAG;
        }
        self.is_alive()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Draw opacity
    #[inline]
    pub fn opacity(&self) -> f32 {
        self.life.clamp(0.0, 1.0)
    }
}

/// An unordered pool of particles sharing one physics flavour
///
/// When the pool is full, spawning evicts the oldest particle.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: VecDeque<Particle>,
    physics: Physics,
    capacity: usize,
    evicted: u64,
}

impl ParticleField {
    pub fn new(physics: Physics, capacity: usize) -> Self {
        Self {
            particles: VecDeque::new(),
            physics,
            capacity,
            evicted: 0,
        }
    }

    pub fn physics(&self) -> Physics {
        self.physics
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total particles dropped by the capacity valve
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn push(&mut self, particle: Particle) {
        if self.capacity == 0 {
            self.evicted += 1;
            return;
        }
        while self.particles.len() >= self.capacity {
            self.particles.pop_front();
            self.evicted += 1;
        }
        self.particles.push_back(particle);
    }

    /// Spawn a sparkler at a glyph point
    pub fn spawn_sparkler_at(&mut self, at: Vec2, rng: &mut impl Rng) {
        self.push(Particle::sparkler(at, rng));
    }

    /// Advance every particle one tick and drop the dead ones.
    /// Returns how many were removed.
    pub fn update(&mut self) -> usize {
        let before = self.particles.len();
        let physics = self.physics;
        self.particles.retain_mut(|p| p.step(physics));
        before - self.particles.len()
    }
}
