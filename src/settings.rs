//! Show settings and preferences

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_TEXT;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Sparkler pool cap. Steady state at full emission is about 5000, so
    /// every preset leaves eviction as an overload valve only.
    pub fn max_sparklers(&self) -> usize {
        match self {
            QualityPreset::Low => 6000,
            QualityPreset::Medium => 12_000,
            QualityPreset::High => 24_000,
        }
    }

    /// Active firework cap
    pub fn max_fireworks(&self) -> usize {
        match self {
            QualityPreset::Low => 16,
            QualityPreset::Medium => 48,
            QualityPreset::High => 48,
        }
    }
}

/// Show settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Text the sparkler writes
    pub text: String,
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Audio ===
    /// Sound on/off (off until the user opts in)
    pub audio_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            quality: QualityPreset::Medium,
            audio_enabled: false,
            master_volume: 1.0,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn max_sparklers(&self) -> usize {
        self.quality.max_sparklers()
    }

    pub fn max_fireworks(&self) -> usize {
        self.quality.max_fireworks()
    }
}
