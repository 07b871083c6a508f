use bevy_ecs::prelude::*;

use crate::components::puzzle::Puzzle;
use crate::core::ecs::{create_schedule, create_world, load_level_library, load_narrative_library};
use crate::core::serialization::{apply_state_to_world, extract_state_from_world, SaveState};
use crate::rules::traits::TraitScores;
use crate::save::repository::SaveRepository;
use crate::simulation::clock::FrameClock;
use crate::simulation::level::{LevelLibrary, LevelSession};
use crate::simulation::narrative::{NarrativeLibrary, NarrativeState};
use crate::simulation::phase::GamePhase;
use crate::simulation::powers::{ActivePower, DreamPowerKind, DreamPowerState};
use crate::simulation::progress::ProgressRecord;
use crate::systems::feedback::{AudioCue, AudioQueue, UiEvent, UiFeed};

/// Signals fed into the core each frame. The host engine queues these from
/// gameplay objects, the scene system, and the UI layer.
#[derive(Debug, Clone)]
pub enum ActionIntent {
    StartLevel { index: u32 },
    PuzzleSolved { puzzle_id: String },
    CompleteLevel,
    FailLevel,
    Pause,
    Resume,
    ReturnToMenu,
    Choose { choice_id: String },
    ActivatePower { kind: DreamPowerKind },
    SceneLoaded { scene: String },
    SetMusicVolume(f32),
    SetEffectsVolume(f32),
    SetVibration(bool),
    Wait,
}

/// Resource storing the intents for the next frame.
#[derive(Resource, Default, Debug)]
pub struct ActionQueue(pub Vec<ActionIntent>);

/// Set by systems whose changes must reach the save store; the game
/// wrapper flushes it after each frame.
#[derive(Resource, Default, Debug)]
pub struct SaveDirty(pub bool);

/// Data snapshot returned to the host after each frame.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub frame: u64,
    pub phase: GamePhase,
    pub level: Option<LevelSummary>,
    pub total_stars: u32,
    pub unlocked: Vec<String>,
    pub traits: TraitScores,
    pub active_power: Option<ActivePower>,
    pub power_charges: Vec<(DreamPowerKind, u32)>,
    pub puzzles: Vec<PuzzleSummary>,
    pub ui_events: Vec<UiEvent>,
    pub audio_cues: Vec<AudioCue>,
}

#[derive(Debug, Clone)]
pub struct LevelSummary {
    pub index: u32,
    pub id: String,
    pub name: String,
    pub score: u32,
    pub max_score: u32,
    pub time_remaining: f32,
    pub time_budget: f32,
    pub puzzles_completed: u32,
    pub puzzles_total: u32,
}

#[derive(Debug, Clone)]
pub struct PuzzleSummary {
    pub id: String,
    pub completed: bool,
    pub active: bool,
    pub satisfied_states: u32,
    pub required_states: u32,
}

/// Wrapper around the ECS world, the schedule, and the optional save store.
pub struct Game {
    world: World,
    schedule: Schedule,
    store: Option<Box<dyn SaveRepository>>,
}

impl Game {
    /// Create a game using the catalogs under the default asset paths.
    pub fn new() -> Self {
        Self::with_content(load_level_library(), load_narrative_library())
    }

    /// Create a game from explicit content, bypassing the asset files.
    pub fn with_content(levels: LevelLibrary, scripts: NarrativeLibrary) -> Self {
        Self {
            world: create_world(levels, scripts),
            schedule: create_schedule(),
            store: None,
        }
    }

    /// Attach a save store and pull any existing save data into the world.
    /// A store that cannot be read counts as having no save data.
    pub fn attach_store(&mut self, mut store: Box<dyn SaveRepository>) {
        match store.load_or_init() {
            Ok(state) => self.load_state(state),
            Err(err) => log::warn!("failed to load save data: {}", err),
        }
        self.store = Some(store);
    }

    /// Run one frame with the provided intents and return a snapshot.
    pub fn tick(&mut self, intents: Vec<ActionIntent>) -> Snapshot {
        {
            let mut ui = self.world.resource_mut::<UiFeed>();
            ui.0.clear();
        }
        {
            let mut audio = self.world.resource_mut::<AudioQueue>();
            audio.0.clear();
        }
        {
            let mut queue = self.world.resource_mut::<ActionQueue>();
            queue.0 = intents;
        }

        self.schedule.run(&mut self.world);
        self.flush_save();
        Snapshot::capture(&self.world)
    }

    /// Run one frame with an explicit simulated duration. The debug binary
    /// uses this to fast-forward whole seconds at a time.
    pub fn tick_with_dt(&mut self, intents: Vec<ActionIntent>, dt: f32) -> Snapshot {
        {
            let mut clock = self.world.resource_mut::<FrameClock>();
            clock.dt = dt.max(0.0);
        }
        self.tick(intents)
    }

    fn flush_save(&mut self) {
        let dirty = {
            let mut dirty = self.world.resource_mut::<SaveDirty>();
            std::mem::take(&mut dirty.0)
        };
        if !dirty {
            return;
        }
        let Some(store) = self.store.as_mut() else {
            return;
        };
        let state = extract_state_from_world(&self.world);
        if let Err(err) = store.save_state(&state) {
            log::warn!("failed to persist save data: {}", err);
        }
    }

    /// Extract a serializable save state from the current world.
    pub fn save_state(&self) -> SaveState {
        extract_state_from_world(&self.world)
    }

    /// Apply a saved state back into the live world. The first authored
    /// level is always kept unlocked.
    pub fn load_state(&mut self, state: SaveState) {
        apply_state_to_world(state, &mut self.world);
        let first_id = self
            .world
            .resource::<LevelLibrary>()
            .levels
            .first()
            .map(|level| level.id.clone());
        if let Some(id) = first_id {
            self.world.resource_mut::<ProgressRecord>().unlock(&id);
        }
    }

    pub fn level_library(&self) -> LevelLibrary {
        self.world.resource::<LevelLibrary>().clone()
    }

    pub fn narrative_library(&self) -> NarrativeLibrary {
        self.world.resource::<NarrativeLibrary>().clone()
    }
}

impl Snapshot {
    fn capture(world: &World) -> Self {
        let clock = world.resource::<FrameClock>();
        let phase = *world.resource::<GamePhase>();
        let session = world.resource::<LevelSession>();
        let library = world.resource::<LevelLibrary>();
        let progress = world.resource::<ProgressRecord>();
        let narrative = world.resource::<NarrativeState>();
        let powers = world.resource::<DreamPowerState>();

        let level = session.level_index.and_then(|index| {
            library.get(index).map(|descriptor| LevelSummary {
                index,
                id: descriptor.id.clone(),
                name: descriptor.name.clone(),
                score: session.score,
                max_score: session.max_score,
                time_remaining: session.time_remaining,
                time_budget: session.time_budget,
                puzzles_completed: session.puzzles_completed,
                puzzles_total: session.puzzles_total,
            })
        });

        let mut unlocked: Vec<String> = progress.unlocked.iter().cloned().collect();
        unlocked.sort();

        let mut power_charges: Vec<(DreamPowerKind, u32)> = powers
            .charges
            .iter()
            .map(|(kind, charges)| (*kind, *charges))
            .collect();
        power_charges.sort_by_key(|(kind, _)| kind.label());

        let puzzles = world
            .iter_entities()
            .filter_map(|entity_ref| {
                let puzzle = entity_ref.get::<Puzzle>()?;
                Some(PuzzleSummary {
                    id: puzzle.id.clone(),
                    completed: puzzle.completed,
                    active: puzzle.active,
                    satisfied_states: puzzle.satisfied_states,
                    required_states: puzzle.required_states,
                })
            })
            .collect();

        let ui_events = world
            .get_resource::<UiFeed>()
            .map(|feed| feed.0.clone())
            .unwrap_or_default();
        let audio_cues = world
            .get_resource::<AudioQueue>()
            .map(|queue| queue.0.clone())
            .unwrap_or_default();

        Snapshot {
            frame: clock.frame,
            phase,
            level,
            total_stars: progress.total_stars,
            unlocked,
            traits: narrative.traits,
            active_power: powers.active,
            power_charges,
            puzzles,
            ui_events,
            audio_cues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::choices::{ChoiceOutcome, ChoiceSpec, LevelScript, Milestone};
    use crate::data::levels::{
        LevelDescriptor, LevelTheme, PuzzleSpec, RewardSpec, UnlockRequirement,
    };
    use crate::save::sqlite::SaveDb;

    fn level(id: &str, index: u32, points: &[u32]) -> LevelDescriptor {
        LevelDescriptor {
            id: id.to_string(),
            index,
            name: format!("Level {}", index),
            theme: LevelTheme::Meadow,
            difficulty: 1,
            description: "test level".to_string(),
            unlock: UnlockRequirement::default(),
            reward: RewardSpec::default(),
            time_budget_secs: 100.0,
            max_score: points.iter().sum::<u32>().max(1),
            puzzles: points
                .iter()
                .enumerate()
                .map(|(i, p)| PuzzleSpec {
                    id: format!("{}_p{}", id, i),
                    points: *p,
                    required_states: 1,
                    hints: Vec::new(),
                })
                .collect(),
        }
    }

    fn content() -> (LevelLibrary, NarrativeLibrary) {
        let levels = LevelLibrary {
            levels: vec![
                level("meadow", 0, &[60, 40]),
                level("ocean", 1, &[100]),
            ],
        };
        let scripts = NarrativeLibrary {
            scripts: vec![LevelScript {
                level_id: "meadow".to_string(),
                lines: Vec::new(),
                choices: vec![ChoiceSpec {
                    id: "help_stranger".to_string(),
                    prompt: "Help them?".to_string(),
                    outcome: ChoiceOutcome {
                        narration: "You help.".to_string(),
                        kindness: 2,
                        logic: -1,
                        creativity: 0,
                        milestone: Some(Milestone::HelpedStranger),
                        unlocks_level: None,
                    },
                }],
            }],
        };
        (levels, scripts)
    }

    fn start_and_play(game: &mut Game) {
        game.tick(vec![ActionIntent::StartLevel { index: 0 }]);
    }

    #[test]
    fn completing_a_level_awards_stars_and_unlocks_the_next() {
        let (levels, scripts) = content();
        let mut game = Game::with_content(levels, scripts);
        start_and_play(&mut game);

        game.tick(vec![
            ActionIntent::PuzzleSolved {
                puzzle_id: "meadow_p0".to_string(),
            },
            ActionIntent::PuzzleSolved {
                puzzle_id: "meadow_p1".to_string(),
            },
        ]);
        let snapshot = game.tick(vec![ActionIntent::CompleteLevel]);

        assert_eq!(snapshot.phase, GamePhase::Victory);
        // Full score with nearly the whole budget left is three stars.
        assert_eq!(snapshot.total_stars, 3);
        assert!(snapshot.unlocked.contains(&"ocean".to_string()));
    }

    #[test]
    fn out_of_range_level_start_changes_nothing() {
        let (levels, scripts) = content();
        let mut game = Game::with_content(levels, scripts);
        let snapshot = game.tick(vec![ActionIntent::StartLevel { index: 99 }]);
        assert_eq!(snapshot.phase, GamePhase::Menu);
        assert!(snapshot.level.is_none());
    }

    #[test]
    fn locked_level_cannot_be_started() {
        let (levels, scripts) = content();
        let mut game = Game::with_content(levels, scripts);
        let snapshot = game.tick(vec![ActionIntent::StartLevel { index: 1 }]);
        assert_eq!(snapshot.phase, GamePhase::Menu);
    }

    #[test]
    fn failing_a_level_reaches_game_over_without_persisting() {
        let (levels, scripts) = content();
        let mut game = Game::with_content(levels, scripts);
        let mut store = SaveDb::open_in_memory().unwrap();
        let baseline = store.load_or_init().unwrap();
        game.attach_store(Box::new(store));

        start_and_play(&mut game);
        let snapshot = game.tick(vec![ActionIntent::FailLevel]);
        assert_eq!(snapshot.phase, GamePhase::GameOver);
        assert_eq!(snapshot.total_stars, 0);
        assert_eq!(baseline.progress.total_stars, 0);
    }

    #[test]
    fn pause_freezes_the_level_clock() {
        let (levels, scripts) = content();
        let mut game = Game::with_content(levels, scripts);
        start_and_play(&mut game);

        let before = game
            .tick(vec![ActionIntent::Pause])
            .level
            .unwrap()
            .time_remaining;
        let after = game
            .tick_with_dt(vec![ActionIntent::Wait], 5.0)
            .level
            .unwrap()
            .time_remaining;
        assert_eq!(before, after);
    }

    #[test]
    fn running_out_of_time_is_game_over() {
        let (levels, scripts) = content();
        let mut game = Game::with_content(levels, scripts);
        start_and_play(&mut game);

        let snapshot = game.tick_with_dt(vec![ActionIntent::Wait], 200.0);
        assert_eq!(snapshot.phase, GamePhase::GameOver);
    }

    #[test]
    fn choice_updates_traits_in_snapshot() {
        let (levels, scripts) = content();
        let mut game = Game::with_content(levels, scripts);
        start_and_play(&mut game);

        let snapshot = game.tick(vec![ActionIntent::Choose {
            choice_id: "help_stranger".to_string(),
        }]);
        assert_eq!(snapshot.traits.kindness, 2);
        assert_eq!(snapshot.traits.logic, -1);
    }

    #[test]
    fn save_and_reload_through_the_store_round_trips() {
        let (levels, scripts) = content();
        let mut game = Game::with_content(levels.clone(), scripts.clone());
        game.attach_store(Box::new(SaveDb::open_in_memory().unwrap()));

        start_and_play(&mut game);
        game.tick(vec![ActionIntent::PuzzleSolved {
            puzzle_id: "meadow_p0".to_string(),
        }]);
        game.tick(vec![ActionIntent::CompleteLevel]);
        let saved = game.save_state();

        let mut fresh = Game::with_content(levels, scripts);
        fresh.load_state(saved.clone());
        assert_eq!(fresh.save_state(), saved);
    }

    #[test]
    fn replaying_a_level_keeps_the_best_result() {
        let (levels, scripts) = content();
        let mut game = Game::with_content(levels, scripts);

        start_and_play(&mut game);
        game.tick(vec![
            ActionIntent::PuzzleSolved {
                puzzle_id: "meadow_p0".to_string(),
            },
            ActionIntent::PuzzleSolved {
                puzzle_id: "meadow_p1".to_string(),
            },
        ]);
        game.tick(vec![ActionIntent::CompleteLevel]);
        let first = game.save_state();
        assert_eq!(first.progress.best_stars(0), 3);

        // A sloppier replay still accumulates stars but keeps the record.
        game.tick(vec![ActionIntent::StartLevel { index: 0 }]);
        game.tick(vec![ActionIntent::CompleteLevel]);
        let second = game.save_state();
        assert_eq!(second.progress.best_stars(0), 3);
        assert_eq!(second.progress.total_stars, 4);
    }
}
