use bevy_ecs::prelude::*;

use crate::simulation::phase::GamePhase;
use crate::simulation::powers::DreamPowerKind;

/// UI-update calls emitted for the host this frame. Drained into each
/// snapshot; the host maps them onto widgets.
#[derive(Resource, Debug, Default)]
pub struct UiFeed(pub Vec<UiEvent>);

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Score { value: u32, max: u32 },
    TimeRemaining { secs: f32 },
    PowerCharges { kind: DreamPowerKind, charges: u32 },
    PowerExpired { kind: DreamPowerKind },
    StarReveal { shown: u8, total: u8 },
    Narration { text: String },
    Dialogue { speaker: String, text: String },
    SceneReady { scene: String },
    LevelUnlocked { level_id: String },
    PhaseChanged { phase: GamePhase },
}

/// Audio-trigger calls for the host mixer, by cue name.
#[derive(Resource, Debug, Default)]
pub struct AudioQueue(pub Vec<AudioCue>);

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCue {
    Music(String),
    Ambient(String),
    Effect(String),
}

impl AudioQueue {
    pub fn music(&mut self, cue: &str) {
        self.0.push(AudioCue::Music(cue.to_string()));
    }

    pub fn ambient(&mut self, cue: &str) {
        self.0.push(AudioCue::Ambient(cue.to_string()));
    }

    pub fn effect(&mut self, cue: &str) {
        self.0.push(AudioCue::Effect(cue.to_string()));
    }
}
