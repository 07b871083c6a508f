use bevy_ecs::prelude::*;

use crate::simulation::clock::FrameClock;
use crate::simulation::sequence::{SceneStatus, SequenceEvent, SequenceState};
use crate::systems::feedback::{UiEvent, UiFeed};

/// Advances the cooperative sequences each frame and forwards their
/// progress to the UI feed. Sequences keep running in every phase so
/// menu and victory animations still play.
pub fn sequence_tick_system(
    clock: Res<FrameClock>,
    scenes: Res<SceneStatus>,
    mut sequences: ResMut<SequenceState>,
    mut ui: ResMut<UiFeed>,
) {
    for event in sequences.tick(clock.dt, &scenes) {
        match event {
            SequenceEvent::StarShown { shown, total } => {
                ui.0.push(UiEvent::StarReveal { shown, total });
            }
            SequenceEvent::TextCompleted { speaker, text } => {
                ui.0.push(UiEvent::Dialogue { speaker, text });
            }
            SequenceEvent::SceneReady { scene } => {
                ui.0.push(UiEvent::SceneReady { scene });
            }
            SequenceEvent::Finished(channel) => {
                log::debug!("sequence finished on {:?}", channel);
            }
        }
    }
}
