use std::collections::HashSet;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::choices::{ChoiceSpec, LevelScript, Milestone};
use crate::rules::traits::TraitScores;

/// Narrative bookkeeping: trait scores, milestone flags, and which choices
/// have already been taken. Persisted with the save blob.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NarrativeState {
    #[serde(default)]
    pub traits: TraitScores,
    #[serde(default)]
    pub helped_stranger: bool,
    #[serde(default)]
    pub solved_riddle: bool,
    #[serde(default)]
    pub created_art: bool,
    #[serde(default)]
    pub resolved: HashSet<String>,
}

impl NarrativeState {
    pub fn set_milestone(&mut self, milestone: Milestone) {
        match milestone {
            Milestone::HelpedStranger => self.helped_stranger = true,
            Milestone::SolvedRiddle => self.solved_riddle = true,
            Milestone::CreatedArt => self.created_art = true,
        }
    }

    pub fn milestone(&self, milestone: Milestone) -> bool {
        match milestone {
            Milestone::HelpedStranger => self.helped_stranger,
            Milestone::SolvedRiddle => self.solved_riddle,
            Milestone::CreatedArt => self.created_art,
        }
    }
}

/// All authored dialogue scripts, indexed per level.
#[derive(Resource, Debug, Default, Clone)]
pub struct NarrativeLibrary {
    pub scripts: Vec<LevelScript>,
}

impl NarrativeLibrary {
    pub fn script_for(&self, level_id: &str) -> Option<&LevelScript> {
        self.scripts.iter().find(|s| s.level_id == level_id)
    }

    /// Choice ids are a single flat namespace across all scripts.
    pub fn find_choice(&self, choice_id: &str) -> Option<&ChoiceSpec> {
        self.scripts
            .iter()
            .flat_map(|s| s.choices.iter())
            .find(|c| c.id == choice_id)
    }
}

/// What a resolved choice hands back to the caller for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceResolution {
    pub narration: String,
    pub unlocked_level: Option<String>,
}

/// Look up a choice and apply its outcome. Unknown ids are logged and
/// ignored, as are choices that were already taken.
pub fn resolve_choice(
    state: &mut NarrativeState,
    library: &NarrativeLibrary,
    choice_id: &str,
) -> Option<ChoiceResolution> {
    let Some(choice) = library.find_choice(choice_id) else {
        log::warn!("ignoring unknown choice id {}", choice_id);
        return None;
    };
    if !state.resolved.insert(choice.id.clone()) {
        log::debug!("choice {} already resolved", choice_id);
        return None;
    }

    let outcome = &choice.outcome;
    state
        .traits
        .apply(outcome.kindness, outcome.logic, outcome.creativity);
    if let Some(milestone) = outcome.milestone {
        state.set_milestone(milestone);
    }

    Some(ChoiceResolution {
        narration: outcome.narration.clone(),
        unlocked_level: outcome.unlocks_level.clone(),
    })
}
