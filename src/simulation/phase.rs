use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Top-level screen state. All transitions run through the helpers so the
/// legality rules live in one place.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    #[default]
    Menu,
    Playing,
    Paused,
    Victory,
    GameOver,
}

impl GamePhase {
    pub fn label(self) -> &'static str {
        match self {
            GamePhase::Menu => "Menu",
            GamePhase::Playing => "Playing",
            GamePhase::Paused => "Paused",
            GamePhase::Victory => "Victory",
            GamePhase::GameOver => "Game Over",
        }
    }

    pub fn is_playing(self) -> bool {
        matches!(self, GamePhase::Playing)
    }

    /// Pause is only legal mid-level.
    pub fn try_pause(&mut self) -> bool {
        if matches!(self, GamePhase::Playing) {
            *self = GamePhase::Paused;
            true
        } else {
            false
        }
    }

    pub fn try_resume(&mut self) -> bool {
        if matches!(self, GamePhase::Paused) {
            *self = GamePhase::Playing;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_only_from_playing() {
        let mut phase = GamePhase::Menu;
        assert!(!phase.try_pause());
        assert_eq!(phase, GamePhase::Menu);

        let mut phase = GamePhase::Playing;
        assert!(phase.try_pause());
        assert_eq!(phase, GamePhase::Paused);
    }

    #[test]
    fn resume_only_from_paused() {
        let mut phase = GamePhase::Victory;
        assert!(!phase.try_resume());

        let mut phase = GamePhase::Paused;
        assert!(phase.try_resume());
        assert_eq!(phase, GamePhase::Playing);
    }
}
