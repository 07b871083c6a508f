use std::collections::HashMap;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DreamPowerKind {
    Resize,
    Gravity,
    Time,
}

impl DreamPowerKind {
    pub fn label(self) -> &'static str {
        match self {
            DreamPowerKind::Resize => "Resize",
            DreamPowerKind::Gravity => "Gravity",
            DreamPowerKind::Time => "Time",
        }
    }

    /// How long one activation lasts.
    pub fn duration_secs(self) -> f32 {
        match self {
            DreamPowerKind::Resize => 8.0,
            DreamPowerKind::Gravity => 10.0,
            DreamPowerKind::Time => 12.0,
        }
    }

    pub fn effect_cue(self) -> &'static str {
        match self {
            DreamPowerKind::Resize => "power_resize",
            DreamPowerKind::Gravity => "power_gravity",
            DreamPowerKind::Time => "power_time",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivePower {
    pub kind: DreamPowerKind,
    pub remaining_secs: f32,
}

/// Charge counts per power plus the single currently running power.
/// Charges are earned as level rewards; the active timer is frame-driven.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DreamPowerState {
    #[serde(default)]
    pub charges: HashMap<DreamPowerKind, u32>,
    #[serde(default)]
    pub active: Option<ActivePower>,
}

impl DreamPowerState {
    pub fn charges_of(&self, kind: DreamPowerKind) -> u32 {
        self.charges.get(&kind).copied().unwrap_or(0)
    }

    pub fn grant(&mut self, kind: DreamPowerKind, count: u32) {
        *self.charges.entry(kind).or_insert(0) += count;
    }

    /// Spend one charge and start the timer. A power already running is
    /// replaced; its remaining time is simply dropped.
    pub fn activate(&mut self, kind: DreamPowerKind) -> bool {
        let Some(charges) = self.charges.get_mut(&kind) else {
            return false;
        };
        if *charges == 0 {
            return false;
        }
        *charges -= 1;
        self.active = Some(ActivePower {
            kind,
            remaining_secs: kind.duration_secs(),
        });
        true
    }

    /// Advance the active timer. Returns the kind that expired this tick.
    pub fn tick(&mut self, dt: f32) -> Option<DreamPowerKind> {
        let active = self.active.as_mut()?;
        active.remaining_secs -= dt;
        if active.remaining_secs <= 0.0 {
            let kind = active.kind;
            self.active = None;
            return Some(kind);
        }
        None
    }
}
