//! One display session
//!
//! `Engine::tick` is the whole per-frame contract: fade, glyph glow,
//! simulation step, particle and firework drawing, draw-state reset. The
//! host calls it once per display refresh and decides when to stop.

use serde::Serialize;

use crate::audio::AudioCues;
use crate::renderer::{self, Surface};
use crate::settings::Settings;
use crate::sim::{self, GlyphRasterizer, SimState, TickStats, Viewport};

/// Running totals for a session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub ticks: u64,
    pub glyph_points: usize,
    pub sparklers_emitted: u64,
    pub fireworks_launched: u64,
    pub explosions: u64,
    pub peak_sparklers: usize,
    pub peak_fireworks: usize,
    pub sparklers_evicted: u64,
    pub live_sparklers: usize,
    pub live_fireworks: usize,
}

impl RunReport {
    fn record(&mut self, stats: &TickStats, state: &SimState) {
        self.ticks = state.time_ticks;
        self.glyph_points = state.glyph_points.len();
        self.sparklers_emitted += stats.emitted as u64;
        self.fireworks_launched += stats.launched as u64;
        self.explosions += stats.exploded as u64;
        self.live_sparklers = state.sparklers.len();
        self.live_fireworks = state.fireworks.len();
        self.peak_sparklers = self.peak_sparklers.max(self.live_sparklers);
        self.peak_fireworks = self.peak_fireworks.max(self.live_fireworks);
        self.sparklers_evicted = state.sparklers.evicted();
    }
}

/// Simulation plus the per-frame draw sequence
pub struct Engine {
    state: SimState,
    running: bool,
    report: RunReport,
}

impl Engine {
    /// Start a session: sample the glyph and set up empty pools
    pub fn new(
        seed: u64,
        width: u32,
        height: u32,
        settings: &Settings,
        rasterizer: &mut dyn GlyphRasterizer,
    ) -> Self {
        let state = SimState::new(seed, Viewport::new(width, height), settings, rasterizer);
        let report = RunReport {
            seed,
            glyph_points: state.glyph_points.len(),
            ..Default::default()
        };
        Self {
            state,
            running: true,
            report,
        }
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimState {
        &mut self.state
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop the session. Idempotent; later ticks do nothing.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Stopping after {} ticks", self.state.time_ticks);
        }
        self.running = false;
    }

    /// Pick up again after `stop` (a page restored from the back/forward
    /// cache). Returns true if the engine was stopped.
    pub fn resume(&mut self) -> bool {
        if self.running {
            return false;
        }
        log::info!("Resuming at tick {}", self.state.time_ticks);
        self.running = true;
        true
    }

    /// New viewport size: resample the glyph and start the pools over
    pub fn resize(&mut self, width: u32, height: u32, rasterizer: &mut dyn GlyphRasterizer) {
        self.state.resize(Viewport::new(width, height), rasterizer);
        self.report.glyph_points = self.state.glyph_points.len();
    }

    /// Run one frame. Returns `None` once stopped.
    pub fn tick(&mut self, surface: &mut dyn Surface, cues: &mut dyn AudioCues) -> Option<TickStats> {
        if !self.running {
            return None;
        }

        renderer::begin_frame(surface, &self.state);
        let stats = sim::tick(&mut self.state, cues);
        renderer::draw_sparklers(surface, &self.state.sparklers);
        renderer::draw_fireworks(surface, &self.state.fireworks);
        renderer::end_frame(surface);

        self.report.record(&stats, &self.state);
        Some(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::CueCounter;
    use crate::renderer::{BlockFont, PixelBuffer};

    fn engine(width: u32, height: u32) -> Engine {
        Engine::new(2026, width, height, &Settings::default(), &mut BlockFont)
    }

    #[test]
    fn test_frames_light_up_the_glyph() {
        let mut engine = engine(320, 240);
        let mut frame = PixelBuffer::new(320, 240);
        let mut cues = CueCounter::default();
        for _ in 0..30 {
            assert!(engine.tick(&mut frame, &mut cues).is_some());
        }
        assert!(frame.mean_luma() > 0.0);
        let bright = (0..240)
            .flat_map(|y| (0..320).map(move |x| (x, y)))
            .filter(|&(x, y)| frame.pixel(x, y)[0] > 0.5)
            .count();
        assert!(bright > 100, "bright {bright}");
        assert_eq!(engine.report().ticks, 30);
        assert_eq!(cues.crackles, 30);
    }

    #[test]
    fn test_trails_fade_once_emission_stops() {
        let mut engine = engine(320, 240);
        let mut frame = PixelBuffer::new(320, 240);
        let mut cues = CueCounter::default();
        for _ in 0..20 {
            engine.tick(&mut frame, &mut cues);
        }
        let lit = frame.mean_luma();

        let state = engine.state_mut();
        state.glyph_points = sim::GlyphPointSet::empty();
        state.sparklers.clear();
        state.fireworks = sim::FireworkManager::new(0);
        for _ in 0..40 {
            engine.tick(&mut frame, &mut cues);
        }
        // Only the faint glyph glow is left: 0.05 fill against a 0.2 fade
        assert!(frame.mean_luma() < lit / 3.0);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut engine = engine(200, 100);
        let mut frame = PixelBuffer::new(200, 100);
        let mut cues = CueCounter::default();
        engine.tick(&mut frame, &mut cues);
        engine.stop();
        engine.stop();
        assert!(!engine.is_running());
        let before = frame.to_rgba8();
        assert!(engine.tick(&mut frame, &mut cues).is_none());
        assert_eq!(engine.state().time_ticks, 1);
        assert_eq!(frame.to_rgba8(), before);
    }

    #[test]
    fn test_resume_after_stop() {
        let mut engine = engine(200, 100);
        let mut frame = PixelBuffer::new(200, 100);
        let mut cues = CueCounter::default();
        assert!(!engine.resume());
        engine.stop();
        assert!(engine.tick(&mut frame, &mut cues).is_none());
        assert!(engine.resume());
        assert!(engine.is_running());
        assert!(engine.tick(&mut frame, &mut cues).is_some());
        assert_eq!(engine.state().time_ticks, 1);
    }

    #[test]
    fn test_zero_viewport_runs_without_fault() {
        let mut engine = engine(0, 0);
        let mut frame = PixelBuffer::new(0, 0);
        let mut cues = CueCounter::default();
        for _ in 0..100 {
            let stats = engine.tick(&mut frame, &mut cues).unwrap();
            assert_eq!(stats.emitted, 0);
        }
        assert_eq!(cues.crackles, 0);
        assert_eq!(engine.state().sparklers.len(), 0);
    }

    #[test]
    fn test_resize_resamples() {
        let mut engine = engine(0, 0);
        assert_eq!(engine.report().glyph_points, 0);
        engine.resize(800, 600, &mut BlockFont);
        assert!(engine.report().glyph_points > 0);
        let mut frame = PixelBuffer::new(800, 600);
        let stats = engine.tick(&mut frame, &mut CueCounter::default()).unwrap();
        assert_eq!(stats.emitted, crate::consts::EMISSION_RATE);
    }

    #[test]
    fn test_report_tracks_peaks() {
        let mut engine = engine(800, 600);
        let mut frame = PixelBuffer::new(800, 600);
        let mut cues = CueCounter::default();
        for _ in 0..200 {
            engine.tick(&mut frame, &mut cues);
        }
        let report = engine.report();
        assert_eq!(report.sparklers_emitted, 200 * 200);
        assert!(report.peak_sparklers >= report.live_sparklers);
        assert_eq!(report.explosions, cues.explosions);
        assert!(report.peak_fireworks < 50);
    }
}
