use bevy_ecs::prelude::*;

use crate::core::game::{ActionIntent, ActionQueue, SaveDirty};
use crate::simulation::level::LevelLibrary;
use crate::simulation::narrative::{resolve_choice, NarrativeLibrary, NarrativeState};
use crate::simulation::phase::GamePhase;
use crate::simulation::progress::ProgressRecord;
use crate::simulation::sequence::{Sequence, SequenceState};
use crate::systems::feedback::{AudioQueue, UiEvent, UiFeed};

/// Resolves player choice intents against the authored choice catalog.
pub fn choice_system(
    intents: Res<ActionQueue>,
    phase: Res<GamePhase>,
    library: Res<NarrativeLibrary>,
    levels: Res<LevelLibrary>,
    mut narrative: ResMut<NarrativeState>,
    mut progress: ResMut<ProgressRecord>,
    mut sequences: ResMut<SequenceState>,
    mut ui: ResMut<UiFeed>,
    mut audio: ResMut<AudioQueue>,
    mut dirty: ResMut<SaveDirty>,
) {
    for intent in intents.0.iter() {
        let ActionIntent::Choose { choice_id } = intent else {
            continue;
        };
        if !phase.is_playing() {
            log::warn!("choice {} outside an active level", choice_id);
            continue;
        }

        let Some(resolution) = resolve_choice(&mut narrative, &library, choice_id) else {
            continue;
        };

        sequences.start(Sequence::dialogue("Narrator", resolution.narration.clone()));
        ui.0.push(UiEvent::Narration {
            text: resolution.narration,
        });
        audio.effect("choice_confirm");

        if let Some(level_id) = resolution.unlocked_level {
            if levels.by_id(&level_id).is_none() {
                log::warn!("choice {} unlocks unknown level {}", choice_id, level_id);
            } else if progress.unlock(&level_id) {
                ui.0.push(UiEvent::LevelUnlocked { level_id });
            }
        }
        dirty.0 = true;
    }
}
