use std::collections::HashSet;

use bevy_ecs::prelude::*;

use crate::components::puzzle::{LevelObject, Puzzle};
use crate::core::game::{ActionIntent, ActionQueue, SaveDirty};
use crate::rules::scoring::{star_rating, time_ratio};
use crate::rules::unlock::unlock_satisfied;
use crate::simulation::clock::FrameClock;
use crate::simulation::level::{LevelLibrary, LevelSession};
use crate::simulation::narrative::NarrativeLibrary;
use crate::simulation::phase::GamePhase;
use crate::simulation::powers::DreamPowerState;
use crate::simulation::progress::{LevelResult, ProgressRecord};
use crate::simulation::sequence::{SceneStatus, Sequence, SequenceState};
use crate::systems::feedback::{AudioQueue, UiEvent, UiFeed};

/// Level ids the player has actually finished at least once.
fn completed_ids(progress: &ProgressRecord, library: &LevelLibrary) -> HashSet<String> {
    progress
        .results
        .keys()
        .filter_map(|index| library.get(*index))
        .map(|level| level.id.clone())
        .collect()
}

/// Handles the level lifecycle intents: start, complete, fail, pause,
/// resume, return-to-menu, and scene-loaded signals from the host.
pub fn level_flow_system(
    mut commands: Commands,
    intents: Res<ActionQueue>,
    library: Res<LevelLibrary>,
    scripts: Res<NarrativeLibrary>,
    mut phase: ResMut<GamePhase>,
    mut session: ResMut<LevelSession>,
    mut progress: ResMut<ProgressRecord>,
    mut powers: ResMut<DreamPowerState>,
    mut sequences: ResMut<SequenceState>,
    mut scenes: ResMut<SceneStatus>,
    mut ui: ResMut<UiFeed>,
    mut audio: ResMut<AudioQueue>,
    mut dirty: ResMut<SaveDirty>,
    objects: Query<Entity, With<LevelObject>>,
) {
    for intent in intents.0.iter() {
        match intent {
            ActionIntent::StartLevel { index } => {
                let Some(level) = library.get(*index) else {
                    log::warn!("level index {} out of range", index);
                    continue;
                };
                let completed = completed_ids(&progress, &library);
                if !progress.unlocked.contains(&level.id)
                    || !unlock_satisfied(&level.unlock, &completed, progress.total_stars)
                {
                    log::warn!("level {} is still locked", level.id);
                    continue;
                }

                for entity in objects.iter() {
                    commands.entity(entity).despawn();
                }
                for spec in &level.puzzles {
                    commands.spawn((LevelObject, Puzzle::from_spec(spec)));
                }

                session.begin(level);
                progress.current_level = *index;
                *phase = GamePhase::Playing;

                scenes.begin_load(&level.id);
                sequences.start(Sequence::scene_load(level.id.clone()));
                sequences.start(Sequence::screen_fade());
                if let Some(script) = scripts.script_for(&level.id) {
                    if !script.lines.is_empty() {
                        sequences.start(Sequence::dialogue_script(
                            script
                                .lines
                                .iter()
                                .map(|line| (line.speaker.as_str(), line.text.as_str())),
                        ));
                    }
                }
                audio.music(level.theme.music_cue());
                audio.ambient(level.theme.ambient_cue());
                ui.0.push(UiEvent::PhaseChanged { phase: *phase });
                ui.0.push(UiEvent::Score {
                    value: 0,
                    max: level.max_score,
                });
            }
            ActionIntent::CompleteLevel => {
                if !phase.is_playing() || !session.is_active() {
                    log::warn!("level completion signal outside an active level");
                    continue;
                }
                let Some(level) = session.level_index.and_then(|i| library.get(i)) else {
                    continue;
                };

                let stars = star_rating(
                    session.score,
                    level.max_score,
                    session.time_remaining,
                    session.time_budget,
                );
                progress.add_stars(stars as u32);
                progress.record_result(
                    level.index,
                    LevelResult {
                        stars,
                        time_remaining: session.time_remaining,
                    },
                );

                if let Some(next) = library.get(level.index + 1) {
                    if progress.unlock(&next.id) {
                        ui.0.push(UiEvent::LevelUnlocked {
                            level_id: next.id.clone(),
                        });
                    }
                }
                if let Some(kind) = level.reward.power_kind {
                    if level.reward.power_charges > 0 {
                        powers.grant(kind, level.reward.power_charges);
                        ui.0.push(UiEvent::PowerCharges {
                            kind,
                            charges: powers.charges_of(kind),
                        });
                    }
                }

                *phase = GamePhase::Victory;
                sequences.start(Sequence::star_reveal(stars));
                audio.music("music_victory");
                ui.0.push(UiEvent::PhaseChanged { phase: *phase });
                dirty.0 = true;
            }
            ActionIntent::FailLevel => {
                if !phase.is_playing() {
                    log::warn!("level fail signal outside an active level");
                    continue;
                }
                // Failure is terminal for the attempt and never persisted.
                *phase = GamePhase::GameOver;
                audio.effect("sting_game_over");
                ui.0.push(UiEvent::PhaseChanged { phase: *phase });
            }
            ActionIntent::Pause => {
                if phase.try_pause() {
                    ui.0.push(UiEvent::PhaseChanged { phase: *phase });
                } else {
                    log::debug!("pause ignored in phase {:?}", *phase);
                }
            }
            ActionIntent::Resume => {
                if phase.try_resume() {
                    ui.0.push(UiEvent::PhaseChanged { phase: *phase });
                } else {
                    log::debug!("resume ignored in phase {:?}", *phase);
                }
            }
            ActionIntent::ReturnToMenu => {
                for entity in objects.iter() {
                    commands.entity(entity).despawn();
                }
                session.clear();
                *phase = GamePhase::Menu;
                sequences.start(Sequence::screen_fade());
                audio.music("music_menu");
                ui.0.push(UiEvent::PhaseChanged { phase: *phase });
            }
            ActionIntent::SceneLoaded { scene } => {
                scenes.mark_loaded(scene);
            }
            _ => {}
        }
    }
}

/// Applies settings intents and marks the save blob dirty.
pub fn settings_system(
    intents: Res<ActionQueue>,
    mut progress: ResMut<ProgressRecord>,
    mut dirty: ResMut<SaveDirty>,
) {
    for intent in intents.0.iter() {
        match intent {
            ActionIntent::SetMusicVolume(volume) => {
                progress.settings.music_volume = volume.clamp(0.0, 1.0);
                dirty.0 = true;
            }
            ActionIntent::SetEffectsVolume(volume) => {
                progress.settings.effects_volume = volume.clamp(0.0, 1.0);
                dirty.0 = true;
            }
            ActionIntent::SetVibration(enabled) => {
                progress.settings.vibration = *enabled;
                dirty.0 = true;
            }
            _ => {}
        }
    }
}

/// Counts the level clock down while playing. Running out of time is a
/// terminal failure, same as an explicit fail signal.
pub fn level_timer_system(
    clock: Res<FrameClock>,
    mut phase: ResMut<GamePhase>,
    mut session: ResMut<LevelSession>,
    mut ui: ResMut<UiFeed>,
    mut audio: ResMut<AudioQueue>,
) {
    if !phase.is_playing() || !session.is_active() {
        return;
    }
    let before = time_ratio(session.time_remaining, session.time_budget);
    session.time_remaining = (session.time_remaining - clock.dt).max(0.0);
    let after = time_ratio(session.time_remaining, session.time_budget);

    ui.0.push(UiEvent::TimeRemaining {
        secs: session.time_remaining,
    });
    if before >= 0.2 && after < 0.2 {
        audio.effect("clock_warning");
    }
    if session.time_remaining <= 0.0 {
        *phase = GamePhase::GameOver;
        audio.effect("sting_game_over");
        ui.0.push(UiEvent::PhaseChanged { phase: *phase });
    }
}
