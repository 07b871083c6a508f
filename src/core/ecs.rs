use bevy_ecs::prelude::*;
use bevy_ecs::schedule::SystemSet;

use crate::core::game::{ActionQueue, SaveDirty};
use crate::data::choices::load_choice_catalog;
use crate::data::levels::load_level_catalog;
use crate::simulation::clock::{advance_frame_system, FrameClock};
use crate::simulation::level::{LevelLibrary, LevelSession};
use crate::simulation::narrative::{NarrativeLibrary, NarrativeState};
use crate::simulation::phase::GamePhase;
use crate::simulation::powers::DreamPowerState;
use crate::simulation::progress::ProgressRecord;
use crate::simulation::sequence::{SceneStatus, SequenceState};
use crate::systems::feedback::{AudioQueue, UiFeed};
use crate::systems::level::{level_flow_system, level_timer_system, settings_system};
use crate::systems::narrative::choice_system;
use crate::systems::powers::{power_activation_system, power_timer_system};
use crate::systems::puzzles::puzzle_progress_system;
use crate::systems::sequence::sequence_tick_system;

pub const DEFAULT_LEVELS_PATH: &str = "./assets/data/levels.json";
pub const DEFAULT_CHOICES_PATH: &str = "./assets/data/choices.json";

/// Canonical tick ordering for the frame loop.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum TickSet {
    Intake,
    Simulation,
    Time,
    Cleanup,
}

/// Build the ECS world with baseline resources and the authored content.
pub fn create_world(levels: LevelLibrary, scripts: NarrativeLibrary) -> World {
    let mut world = World::new();
    let progress = initial_progress(&levels);
    world.insert_resource(FrameClock::default());
    world.insert_resource(ActionQueue::default());
    world.insert_resource(GamePhase::default());
    world.insert_resource(LevelSession::default());
    world.insert_resource(progress);
    world.insert_resource(NarrativeState::default());
    world.insert_resource(DreamPowerState::default());
    world.insert_resource(SequenceState::default());
    world.insert_resource(SceneStatus::default());
    world.insert_resource(UiFeed::default());
    world.insert_resource(AudioQueue::default());
    world.insert_resource(SaveDirty::default());
    world.insert_resource(levels);
    world.insert_resource(scripts);
    world
}

fn initial_progress(levels: &LevelLibrary) -> ProgressRecord {
    match levels.levels.first() {
        Some(first) => ProgressRecord::new(&first.id),
        None => ProgressRecord::default(),
    }
}

/// Build the system schedule in the canonical order. Intake systems run
/// chained so a completion signal sees the score from puzzle signals that
/// arrived in the same frame.
pub fn create_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.configure_sets(
        (TickSet::Intake, TickSet::Simulation, TickSet::Time, TickSet::Cleanup).chain(),
    );

    schedule.add_systems((
        (
            puzzle_progress_system,
            choice_system,
            power_activation_system,
            settings_system,
            level_flow_system,
        )
            .chain()
            .in_set(TickSet::Intake),
        (level_timer_system, power_timer_system, sequence_tick_system)
            .chain()
            .in_set(TickSet::Simulation),
        advance_frame_system.in_set(TickSet::Time),
    ));

    schedule
}

/// Load the level catalog from the default asset path, degrading to an
/// empty library with a logged warning.
pub fn load_level_library() -> LevelLibrary {
    load_level_library_from(DEFAULT_LEVELS_PATH)
}

pub fn load_level_library_from(path: &str) -> LevelLibrary {
    match load_level_catalog(path) {
        Ok(catalog) => LevelLibrary {
            levels: catalog.levels,
        },
        Err(err) => {
            log::warn!("failed to load levels from {}: {}", path, err);
            LevelLibrary::default()
        }
    }
}

pub fn load_narrative_library() -> NarrativeLibrary {
    load_narrative_library_from(DEFAULT_CHOICES_PATH)
}

pub fn load_narrative_library_from(path: &str) -> NarrativeLibrary {
    match load_choice_catalog(path) {
        Ok(catalog) => NarrativeLibrary {
            scripts: catalog.scripts,
        },
        Err(err) => {
            log::warn!("failed to load choices from {}: {}", path, err);
            NarrativeLibrary::default()
        }
    }
}
