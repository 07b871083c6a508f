use bevy_ecs::prelude::*;

use crate::data::levels::LevelDescriptor;

/// The authored level list, in play order.
#[derive(Resource, Debug, Default, Clone)]
pub struct LevelLibrary {
    pub levels: Vec<LevelDescriptor>,
}

impl LevelLibrary {
    pub fn get(&self, index: u32) -> Option<&LevelDescriptor> {
        self.levels.get(index as usize)
    }

    pub fn by_id(&self, id: &str) -> Option<&LevelDescriptor> {
        self.levels.iter().find(|level| level.id == id)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Runtime state of the level currently being played. Reset on load,
/// cleared when the session ends.
#[derive(Resource, Debug, Clone, Default)]
pub struct LevelSession {
    pub level_index: Option<u32>,
    pub score: u32,
    pub max_score: u32,
    pub time_remaining: f32,
    pub time_budget: f32,
    pub puzzles_total: u32,
    pub puzzles_completed: u32,
}

impl LevelSession {
    pub fn begin(&mut self, level: &LevelDescriptor) {
        self.level_index = Some(level.index);
        self.score = 0;
        self.max_score = level.max_score;
        self.time_remaining = level.time_budget_secs;
        self.time_budget = level.time_budget_secs;
        self.puzzles_total = level.puzzles.len() as u32;
        self.puzzles_completed = 0;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.level_index.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::levels::{LevelTheme, PuzzleSpec, RewardSpec, UnlockRequirement};

    fn level() -> LevelDescriptor {
        LevelDescriptor {
            id: "sky_harbor".to_string(),
            index: 3,
            name: "Sky Harbor".to_string(),
            theme: LevelTheme::Sky,
            difficulty: 3,
            description: "Moor the cloud ships.".to_string(),
            unlock: UnlockRequirement::default(),
            reward: RewardSpec::default(),
            time_budget_secs: 90.0,
            max_score: 80,
            puzzles: vec![PuzzleSpec {
                id: "anchor".to_string(),
                points: 80,
                required_states: 1,
                hints: Vec::new(),
            }],
        }
    }

    #[test]
    fn begin_resets_session() {
        let mut session = LevelSession {
            score: 55,
            ..Default::default()
        };
        session.begin(&level());
        assert_eq!(session.level_index, Some(3));
        assert_eq!(session.score, 0);
        assert_eq!(session.time_remaining, 90.0);
        assert_eq!(session.puzzles_total, 1);
        assert!(session.is_active());
    }

    #[test]
    fn clear_ends_session() {
        let mut session = LevelSession::default();
        session.begin(&level());
        session.clear();
        assert!(!session.is_active());
    }
}
