use bevy_ecs::prelude::*;

use crate::core::game::{ActionIntent, ActionQueue};
use crate::simulation::clock::FrameClock;
use crate::simulation::phase::GamePhase;
use crate::simulation::powers::DreamPowerState;
use crate::systems::feedback::{AudioQueue, UiEvent, UiFeed};

/// Spends charges on power-activation intents.
pub fn power_activation_system(
    intents: Res<ActionQueue>,
    phase: Res<GamePhase>,
    mut powers: ResMut<DreamPowerState>,
    mut ui: ResMut<UiFeed>,
    mut audio: ResMut<AudioQueue>,
) {
    for intent in intents.0.iter() {
        let ActionIntent::ActivatePower { kind } = intent else {
            continue;
        };
        if !phase.is_playing() {
            log::warn!("power {} activated outside an active level", kind.label());
            continue;
        }
        if powers.activate(*kind) {
            ui.0.push(UiEvent::PowerCharges {
                kind: *kind,
                charges: powers.charges_of(*kind),
            });
            audio.effect(kind.effect_cue());
        } else {
            log::warn!("no {} charges left", kind.label());
        }
    }
}

/// Counts the active power down. Paused levels freeze the timer.
pub fn power_timer_system(
    clock: Res<FrameClock>,
    phase: Res<GamePhase>,
    mut powers: ResMut<DreamPowerState>,
    mut ui: ResMut<UiFeed>,
    mut audio: ResMut<AudioQueue>,
) {
    if !phase.is_playing() {
        return;
    }
    if let Some(kind) = powers.tick(clock.dt) {
        ui.0.push(UiEvent::PowerExpired { kind });
        audio.effect("power_fade");
    }
}
