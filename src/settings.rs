//! Presentation preferences
//!
//! Cosmetic choices (smoke trails, fire on crash, plain cars) and volumes.
//! None of this changes the simulation; the presentation and audio layers
//! read it to pick their strategy.

use serde::{Deserialize, Serialize};

/// Visual effect strategy for cars and crashes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EffectStyle {
    /// Sprites only
    Plain,
    /// Exhaust smoke behind every car
    #[default]
    Smoke,
    /// Smoke plus a fire burst on crashes
    Fire,
}

impl EffectStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectStyle::Plain => "Plain",
            EffectStyle::Smoke => "Smoke",
            EffectStyle::Fire => "Fire",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "plain" | "none" => Some(EffectStyle::Plain),
            "smoke" => Some(EffectStyle::Smoke),
            "fire" => Some(EffectStyle::Fire),
            _ => None,
        }
    }

    /// Maximum live particles for this style
    pub fn particle_budget(&self) -> usize {
        match self {
            EffectStyle::Plain => 0,
            EffectStyle::Smoke => 150,
            EffectStyle::Fire => 400,
        }
    }

    /// Particle life lost per second (linear decay)
    pub fn particle_decay_per_sec(&self) -> f32 {
        match self {
            EffectStyle::Plain => 0.0,
            EffectStyle::Smoke => 1.2,
            EffectStyle::Fire => 2.0,
        }
    }

    /// Whether a crash spawns a fire burst
    pub fn crash_fire(&self) -> bool {
        matches!(self, EffectStyle::Fire)
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub effects: EffectStyle,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Engine hum volume (0.0 - 1.0)
    pub engine_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no particles, no screen shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            effects: EffectStyle::Smoke,
            master_volume: 0.8,
            sfx_volume: 1.0,
            engine_volume: 0.5,
            muted: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective gain for one-shot sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Effective gain for the looping engine
    pub fn effective_engine_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.engine_volume).clamp(0.0, 1.0)
        }
    }

    /// Effect style after accessibility overrides
    pub fn effective_effects(&self) -> EffectStyle {
        if self.reduced_motion {
            EffectStyle::Plain
        } else {
            self.effects
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
