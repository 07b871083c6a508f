use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FRAME_DT: f32 = 1.0 / 60.0;

/// Global resource tracking the frame-driven timeline. One schedule run is
/// one frame; `dt` is the simulated duration of that frame.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct FrameClock {
    pub frame: u64,
    pub dt: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            frame: 0,
            dt: DEFAULT_FRAME_DT,
        }
    }
}

impl FrameClock {
    pub fn advance(&mut self) {
        self.frame += 1;
    }
}

/// System: advances the frame counter at the end of each tick.
pub fn advance_frame_system(mut clock: ResMut<FrameClock>) {
    clock.advance();
}
