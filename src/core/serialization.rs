use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::simulation::narrative::NarrativeState;
use crate::simulation::powers::DreamPowerState;
use crate::simulation::progress::ProgressRecord;

/// Save state capturing everything that survives across sessions:
/// progress, narrative traits, and dream-power charges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    #[serde(default = "default_save_version")]
    pub version: u32,
    pub progress: ProgressRecord,
    #[serde(default)]
    pub narrative: NarrativeState,
    #[serde(default)]
    pub powers: DreamPowerState,
}

fn default_save_version() -> u32 {
    1
}

impl Default for SaveState {
    fn default() -> Self {
        Self {
            version: default_save_version(),
            progress: ProgressRecord::default(),
            narrative: NarrativeState::default(),
            powers: DreamPowerState::default(),
        }
    }
}

/// Extract a serializable snapshot of the persistent resources.
pub fn extract_state_from_world(world: &World) -> SaveState {
    let progress = world
        .get_resource::<ProgressRecord>()
        .cloned()
        .unwrap_or_default();
    let narrative = world
        .get_resource::<NarrativeState>()
        .cloned()
        .unwrap_or_default();
    let mut powers = world
        .get_resource::<DreamPowerState>()
        .cloned()
        .unwrap_or_default();
    // A power mid-flight does not survive the session.
    powers.active = None;

    SaveState {
        version: default_save_version(),
        progress,
        narrative,
        powers,
    }
}

/// Apply a saved snapshot back into the world.
pub fn apply_state_to_world(state: SaveState, world: &mut World) {
    world.insert_resource(state.progress);
    world.insert_resource(state.narrative);
    world.insert_resource(state.powers);
}

/// Serialize a save state into JSON for persistence.
pub fn save_state_to_json(state: &SaveState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(state)
}

/// Deserialize JSON back into a save state.
pub fn load_state_from_json(data: &str) -> serde_json::Result<SaveState> {
    serde_json::from_str(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::powers::DreamPowerKind;

    #[test]
    fn json_round_trip_preserves_fields() {
        let mut state = SaveState::default();
        state.progress.add_stars(5);
        state.progress.unlock("ocean_depths");
        state.narrative.traits.apply(2, -1, 0);
        state.narrative.helped_stranger = true;
        state.powers.grant(DreamPowerKind::Time, 3);

        let json = save_state_to_json(&state).unwrap();
        let loaded = load_state_from_json(&json).unwrap();
        assert_eq!(state, loaded);
    }

    #[test]
    fn missing_optional_sections_default() {
        let loaded = load_state_from_json(r#"{"progress":{}}"#).unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.narrative, NarrativeState::default());
        assert_eq!(loaded.powers, DreamPowerState::default());
    }

    #[test]
    fn active_power_is_not_extracted() {
        let mut world = World::new();
        let mut powers = DreamPowerState::default();
        powers.grant(DreamPowerKind::Resize, 1);
        powers.activate(DreamPowerKind::Resize);
        world.insert_resource(powers);
        world.insert_resource(ProgressRecord::default());
        world.insert_resource(NarrativeState::default());

        let state = extract_state_from_world(&world);
        assert!(state.powers.active.is_none());
        assert_eq!(state.powers.charges_of(DreamPowerKind::Resize), 0);
    }
}
