//! Firework rockets and the manager that launches them

use glam::Vec2;
use rand::Rng;

use super::particle::{Particle, Physics};
use crate::consts::*;

/// Firework lifecycle. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FireworkState {
    /// Climbing toward its target altitude
    Rising,
    /// Burst particles are burning
    Exploded,
    /// Every burst particle has burnt out
    Dead,
}

/// What happened to a firework during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Exploded,
    Died,
}

/// A single rocket and, once exploded, its burst
#[derive(Debug, Clone)]
pub struct Firework {
    pub pos: Vec2,
    pub vel: Vec2,
    pub target_y: f32,
    /// Degrees, 0-360
    pub hue: f32,
    state: FireworkState,
    /// Set on the tick the rocket detonates, cleared by the next step
    just_exploded: bool,
    particles: Vec<Particle>,
}

impl Firework {
    /// Launch from a random point on the bottom edge
    pub fn launch(width: f32, height: f32, rng: &mut impl Rng) -> Self {
        let x = if width > 0.0 {
            rng.random_range(0.0..width)
        } else {
            0.0
        };
        let target_y = height * rng.random_range(TARGET_MIN_FRACTION..=TARGET_MAX_FRACTION);
        let vel = Vec2::new(
            rng.random_range(-ROCKET_MAX_DRIFT..=ROCKET_MAX_DRIFT),
            -rng.random_range(ROCKET_SPEED_MIN..=ROCKET_SPEED_MAX),
        );
        let hue = rng.random_range(0.0..360.0);
        Self::new(Vec2::new(x, height), vel, target_y, hue)
    }

    pub fn new(pos: Vec2, vel: Vec2, target_y: f32, hue: f32) -> Self {
        Self {
            pos,
            vel,
            target_y,
            hue,
            state: FireworkState::Rising,
            just_exploded: false,
            particles: Vec::new(),
        }
    }

    pub fn state(&self) -> FireworkState {
        self.state
    }

    /// Detonated during the last step. That tick still draws as a rising
    /// rocket; the burst shows from the next tick on.
    pub fn just_exploded(&self) -> bool {
        self.just_exploded
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Apex reached or target altitude crossed
    fn should_explode(&self) -> bool {
        self.vel.y >= -APEX_EPSILON || self.pos.y <= self.target_y
    }

    /// Replace the rocket with a radial burst
    fn explode(&mut self, rng: &mut impl Rng) {
        let count = BURST_MIN + rng.random_range(0..BURST_SPREAD);
        self.particles.reserve_exact(count);
        for _ in 0..count {
            self.particles.push(Particle::explosion(self.pos, self.hue, rng));
        }
        self.state = FireworkState::Exploded;
        self.just_exploded = true;
    }

    /// Advance one tick
    pub fn step(&mut self, rng: &mut impl Rng) -> Option<Transition> {
        self.just_exploded = false;
        match self.state {
            FireworkState::Rising => {
                self.pos += self.vel;
                self.vel.y += ROCKET_GRAVITY;
                if self.should_explode() {
                    self.explode(rng);
                    return Some(Transition::Exploded);
                }
                None
            }
            FireworkState::Exploded => {
                self.particles.retain_mut(|p| p.step(Physics::Explosion));
                if self.particles.is_empty() {
                    self.state = FireworkState::Dead;
                    return Some(Transition::Died);
                }
                None
            }
            FireworkState::Dead => None,
        }
    }

    /// Tail end of the rising trail
    pub fn trail_end(&self) -> Vec2 {
        self.pos - self.vel * TRAIL_SCALE
    }
}

/// Per-tick outcome of the manager
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FireworkTick {
    pub launched: bool,
    pub exploded: usize,
    pub died: usize,
}

/// Owns every active firework
#[derive(Debug, Clone)]
pub struct FireworkManager {
    fireworks: Vec<Firework>,
    launch_chance: f64,
    max_active: usize,
}

impl FireworkManager {
    pub fn new(max_active: usize) -> Self {
        Self {
            fireworks: Vec::new(),
            launch_chance: LAUNCH_CHANCE,
            max_active,
        }
    }

    /// Override the per-tick launch probability (0 disables launches)
    pub fn with_launch_chance(mut self, chance: f64) -> Self {
        self.launch_chance = chance.clamp(0.0, 1.0);
        self
    }

    pub fn len(&self) -> usize {
        self.fireworks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fireworks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Firework> {
        self.fireworks.iter()
    }

    pub fn clear(&mut self) {
        self.fireworks.clear();
    }

    /// Add a firework directly (scripted shows and tests)
    pub fn insert(&mut self, firework: Firework) {
        self.fireworks.push(firework);
    }

    /// Live burst particles across all fireworks
    pub fn particle_count(&self) -> usize {
        self.fireworks.iter().map(|f| f.particles.len()).sum()
    }

    /// Maybe launch, then advance every firework and drop the dead ones.
    /// `on_explode` fires once per Rising -> Exploded transition.
    pub fn update(
        &mut self,
        width: f32,
        height: f32,
        rng: &mut impl Rng,
        mut on_explode: impl FnMut(&Firework),
    ) -> FireworkTick {
        let mut result = FireworkTick::default();

        if rng.random_bool(self.launch_chance) && self.fireworks.len() < self.max_active {
            self.fireworks.push(Firework::launch(width, height, rng));
            result.launched = true;
        }

        self.fireworks.retain_mut(|fw| {
            match fw.step(rng) {
                Some(Transition::Exploded) => {
                    result.exploded += 1;
                    on_explode(fw);
                }
                Some(Transition::Died) => result.died += 1,
                None => {}
            }
            fw.state != FireworkState::Dead
        });

        result
    }
}
