//! Audio cues for game events
//!
//! The simulation only emits events. This module turns them into abstract
//! sound cues (beeps, a noise burst, the engine loop) that a platform audio
//! backend can synthesize; no samples or files are involved.

use crate::Settings;
use crate::sim::{GameEvent, GamePhase, TickResult};

/// One sound to play
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundCue {
    /// Enveloped sine tone: `freq` Hz for `secs`, starting `delay` seconds from now
    Beep { freq: f32, secs: f32, delay: f32 },
    /// Decaying white-noise burst
    Noise { secs: f32 },
    /// Start the looping engine hum
    EngineStart,
    /// Stop the engine hum
    EngineStop,
}

/// Countdown number tick
pub const COUNTDOWN_BEEP: SoundCue = SoundCue::Beep {
    freq: 880.0,
    secs: 0.12,
    delay: 0.0,
};

/// GO
pub const GO_BEEP: SoundCue = SoundCue::Beep {
    freq: 1320.0,
    secs: 0.16,
    delay: 0.0,
};

/// Crash noise burst
pub const CRASH_NOISE: SoundCue = SoundCue::Noise { secs: 0.25 };

/// Victory arpeggio (start offset, frequency)
const VICTORY_NOTES: [(f32, f32); 4] = [
    (0.0, 880.0),
    (0.15, 1046.5),
    (0.33, 1318.5),
    (0.65, 1760.0),
];

/// Engine hum frequency range (Hz) mapped from intensity 0..1
pub const ENGINE_IDLE_HZ: f32 = 70.0;
pub const ENGINE_SPAN_HZ: f32 = 120.0;

/// Sound cues for one event
pub fn cues_for(event: &GameEvent) -> Vec<SoundCue> {
    match event {
        GameEvent::CountdownStep { .. } => vec![COUNTDOWN_BEEP],
        GameEvent::CountdownGo => vec![GO_BEEP],
        GameEvent::RaceStarted => vec![SoundCue::EngineStart],
        GameEvent::Crash { .. } => vec![CRASH_NOISE],
        GameEvent::RoundFinished { won: true, .. } => {
            let mut cues = vec![SoundCue::EngineStop];
            cues.extend(VICTORY_NOTES.iter().map(|&(delay, freq)| SoundCue::Beep {
                freq,
                secs: 0.14,
                delay,
            }));
            cues
        }
        GameEvent::RoundFinished { won: false, .. } => vec![SoundCue::EngineStop],
        GameEvent::EnemySpawned { .. }
        | GameEvent::EnemyDespawned { .. }
        | GameEvent::ReturnedToIdle => Vec::new(),
    }
}

/// Engine hum pitch for a given intensity
pub fn engine_frequency(intensity: f32) -> f32 {
    ENGINE_IDLE_HZ + intensity.clamp(0.0, 1.0) * ENGINE_SPAN_HZ
}

/// Platform audio backend
pub trait AudioSink {
    /// Play a one-shot cue at `volume` (0.0 - 1.0)
    fn play(&mut self, cue: SoundCue, volume: f32);

    /// Update the engine loop (called every racing tick)
    fn set_engine(&mut self, intensity: f32, volume: f32);
}

/// Feeds tick results into an [`AudioSink`], honoring the player's settings
pub struct AudioDirector<S: AudioSink> {
    sink: S,
    settings: Settings,
}

impl<S: AudioSink> AudioDirector<S> {
    pub fn new(sink: S, settings: Settings) -> Self {
        Self { sink, settings }
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Play everything one tick asked for
    pub fn handle(&mut self, result: &TickResult) {
        let volume = self.settings.effective_volume();
        if volume > 0.0 {
            for cue in result.events.iter().flat_map(cues_for) {
                self.sink.play(cue, volume);
            }
        }
        if result.phase == GamePhase::Racing {
            self.sink.set_engine(
                result.round.engine_intensity(),
                self.settings.effective_engine_volume(),
            );
        }
    }
}

/// Sink that only logs cues (headless runs)
#[derive(Debug, Default)]
pub struct LogSink {
    /// Cues played so far
    pub played: usize,
}

impl AudioSink for LogSink {
    fn play(&mut self, cue: SoundCue, volume: f32) {
        self.played += 1;
        log::debug!("Audio: {:?} at volume {:.2}", cue, volume);
    }

    fn set_engine(&mut self, intensity: f32, volume: f32) {
        log::trace!(
            "Audio: engine {:.0} Hz at volume {:.2}",
            engine_frequency(intensity),
            volume * (0.2 + 0.8 * intensity)
        );
    }
}
