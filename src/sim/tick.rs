//! Per-frame simulation tick
//!
//! Advances the simulation by one display frame. Drawing happens afterwards
//! from the resulting state (see `renderer::frame`).

use serde::Serialize;

use super::state::SimState;
use crate::audio::AudioCues;
use crate::consts::*;

/// Counters for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickStats {
    pub emitted: usize,
    pub sparklers_culled: usize,
    pub launched: bool,
    pub exploded: usize,
    pub fireworks_died: usize,
}

/// Advance the simulation by one tick
pub fn tick(state: &mut SimState, cues: &mut dyn AudioCues) -> TickStats {
    state.time_ticks += 1;
    let mut stats = TickStats::default();

    // Emit sparklers from the glyph
    if !state.glyph_points.is_empty() {
        for _ in 0..EMISSION_RATE {
            if let Some(at) = state.glyph_points.choose(&mut state.rng) {
                state.sparklers.spawn_sparkler_at(at, &mut state.rng);
                stats.emitted += 1;
            }
        }
        cues.emit_crackling_cue();
    }

    stats.sparklers_culled = state.sparklers.update();

    let width = state.viewport.width as f32;
    let height = state.viewport.height as f32;
    let fireworks = state.fireworks.update(width, height, &mut state.rng, |fw| {
        log::debug!("Firework exploded at ({:.0}, {:.0}) hue {:.0}", fw.pos.x, fw.pos.y, fw.hue);
        cues.emit_explosion_cue();
    });
    stats.launched = fireworks.launched;
    stats.exploded = fireworks.exploded;
    stats.fireworks_died = fireworks.died;

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{CueCounter, NullCues};
    use crate::renderer::BlockFont;
    use crate::settings::Settings;
    use crate::sim::firework::{Firework, FireworkManager, FireworkState};
    use crate::sim::glyph::GlyphPointSet;
    use crate::sim::state::Viewport;
    use glam::Vec2;

    fn state_800x600(seed: u64) -> SimState {
        SimState::new(seed, Viewport::new(800, 600), &Settings::default(), &mut BlockFont)
    }

    #[test]
    fn test_emits_fixed_rate() {
        let mut state = state_800x600(1);
        let mut cues = CueCounter::default();
        let stats = tick(&mut state, &mut cues);
        assert_eq!(stats.emitted, EMISSION_RATE);
        assert_eq!(cues.crackles, 1);
        // First tick: nothing has had time to burn out
        assert_eq!(state.sparklers.len(), EMISSION_RATE);
    }

    #[test]
    fn test_emitted_sparklers_start_on_glyph() {
        let mut state = state_800x600(2);
        state.fireworks = FireworkManager::new(0);
        tick(&mut state, &mut NullCues);
        // One integration step away from a glyph point
        for p in state.sparklers.iter() {
            let origin = p.pos - p.vel + Vec2::new(0.0, PARTICLE_GRAVITY);
            assert!(
                state
                    .glyph_points
                    .points()
                    .iter()
                    .any(|g| g.distance(origin) < 1e-3)
            );
        }
    }

    #[test]
    fn test_empty_glyph_emits_nothing() {
        let mut state = state_800x600(3);
        state.glyph_points = GlyphPointSet::empty();
        let mut cues = CueCounter::default();
        for _ in 0..10 {
            let stats = tick(&mut state, &mut cues);
            assert_eq!(stats.emitted, 0);
        }
        assert!(state.sparklers.is_empty());
        assert_eq!(cues.crackles, 0);
    }

    #[test]
    fn test_one_explosion_cue_at_tick_50() {
        let mut state = state_800x600(4);
        state.fireworks = FireworkManager::new(48).with_launch_chance(0.0);
        // y after n ticks = 600 - 15n + 0.1n(n-1): 100.2 at 49, 95.0 at 50
        state.fireworks.insert(Firework::new(
            Vec2::new(400.0, 600.0),
            Vec2::new(0.0, -15.0),
            97.5,
            30.0,
        ));

        let mut cues = CueCounter::default();
        for _ in 0..49 {
            tick(&mut state, &mut cues);
            assert_eq!(cues.explosions, 0);
        }
        let stats = tick(&mut state, &mut cues);
        assert_eq!(state.time_ticks, 50);
        assert_eq!(stats.exploded, 1);
        assert_eq!(cues.explosions, 1);

        let fw = state.fireworks.iter().next().unwrap();
        assert_eq!(fw.state(), FireworkState::Exploded);
        assert!(!fw.particles().is_empty());

        for _ in 0..300 {
            tick(&mut state, &mut cues);
        }
        assert_eq!(cues.explosions, 1);
        assert!(state.fireworks.is_empty());
    }

    #[test]
    fn test_cues_match_transitions_over_long_run() {
        let mut state = state_800x600(5);
        let mut cues = CueCounter::default();
        let mut exploded = 0;
        for _ in 0..2000 {
            exploded += tick(&mut state, &mut cues).exploded;
        }
        assert!(exploded > 0);
        assert_eq!(cues.explosions, exploded as u64);
        assert_eq!(cues.crackles, 2000);
    }

    #[test]
    fn test_steady_state_is_bounded() {
        let mut state = state_800x600(2026);
        let mut cues = CueCounter::default();
        let mut counts = Vec::with_capacity(1000);
        for _ in 0..1000 {
            tick(&mut state, &mut cues);
            assert!(state.fireworks.len() < 50);
            counts.push(state.sparklers.len());
        }

        // Mean lifetime for decay ~ U[0.02, 0.07] is about 25 ticks,
        // so the pool hovers around 200 * 25 = 5000.
        let tail = &counts[500..];
        let max = *tail.iter().max().unwrap();
        let min = *tail.iter().min().unwrap();
        assert!((4000..6500).contains(&min), "min {min}");
        assert!((4000..6500).contains(&max), "max {max}");
        // Not growing with tick count
        let early: usize = counts[500..600].iter().sum::<usize>() / 100;
        let late: usize = counts[900..1000].iter().sum::<usize>() / 100;
        assert!(late.abs_diff(early) < 300);
    }

    #[test]
    fn test_low_preset_never_evicts_at_steady_state() {
        let settings = Settings::from_preset(crate::settings::QualityPreset::Low);
        let mut state = SimState::new(31, Viewport::new(800, 600), &settings, &mut BlockFont);
        for _ in 0..1000 {
            tick(&mut state, &mut NullCues);
        }
        assert_eq!(state.sparklers.evicted(), 0);
    }

    #[test]
    fn test_determinism() {
        let mut a = state_800x600(99999);
        let mut b = state_800x600(99999);
        for _ in 0..300 {
            let sa = tick(&mut a, &mut NullCues);
            let sb = tick(&mut b, &mut NullCues);
            assert_eq!(sa, sb);
        }
        assert_eq!(a.sparklers.len(), b.sparklers.len());
        assert_eq!(a.fireworks.len(), b.fireworks.len());
        let pa: Vec<_> = a.sparklers.iter().map(|p| p.pos).collect();
        let pb: Vec<_> = b.sparklers.iter().map(|p| p.pos).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_no_dead_particles_survive_a_tick() {
        let mut state = state_800x600(6);
        for _ in 0..400 {
            tick(&mut state, &mut NullCues);
            assert!(state.sparklers.iter().all(|p| p.life > 0.0));
            for fw in state.fireworks.iter() {
                assert_ne!(fw.state(), FireworkState::Dead);
                assert!(fw.particles().iter().all(|p| p.life > 0.0));
            }
        }
    }
}
