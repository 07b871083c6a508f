use bevy_ecs::prelude::*;

use crate::components::puzzle::{LevelObject, Puzzle};
use crate::core::game::{ActionIntent, ActionQueue};
use crate::simulation::level::LevelSession;
use crate::simulation::phase::GamePhase;
use crate::systems::feedback::{AudioQueue, UiEvent, UiFeed};

/// Applies puzzle-solved signals from the gameplay layer and aggregates
/// them into the session score.
pub fn puzzle_progress_system(
    intents: Res<ActionQueue>,
    phase: Res<GamePhase>,
    mut session: ResMut<LevelSession>,
    mut puzzles: Query<&mut Puzzle, With<LevelObject>>,
    mut ui: ResMut<UiFeed>,
    mut audio: ResMut<AudioQueue>,
) {
    for intent in intents.0.iter() {
        let ActionIntent::PuzzleSolved { puzzle_id } = intent else {
            continue;
        };
        if !phase.is_playing() || !session.is_active() {
            log::warn!("puzzle signal {} outside an active level", puzzle_id);
            continue;
        }

        let Some(mut puzzle) = puzzles.iter_mut().find(|p| p.id == *puzzle_id) else {
            log::warn!("ignoring unknown puzzle id {}", puzzle_id);
            continue;
        };

        if puzzle.completed {
            log::debug!("puzzle {} already completed", puzzle_id);
            continue;
        }

        if puzzle.satisfy_state() {
            session.puzzles_completed += 1;
            session.score += puzzle.points;
            ui.0.push(UiEvent::Score {
                value: session.score,
                max: session.max_score,
            });
            audio.effect("puzzle_chime");
        } else {
            audio.effect("puzzle_step");
        }
    }
}
