use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::levels::PuzzleSpec;

/// Marker component for entities owned by the active level session.
/// Everything carrying it is despawned when the level unloads.
#[derive(Component, Debug)]
pub struct LevelObject;

/// Tracking state for one sub-puzzle inside a level.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: String,
    pub completed: bool,
    pub active: bool,
    pub hints: Vec<String>,
    pub required_states: u32,
    pub satisfied_states: u32,
    pub points: u32,
}

impl Puzzle {
    pub fn from_spec(spec: &PuzzleSpec) -> Self {
        Self {
            id: spec.id.clone(),
            completed: false,
            active: false,
            hints: spec.hints.clone(),
            required_states: spec.required_states.max(1),
            satisfied_states: 0,
            points: spec.points,
        }
    }

    /// Register one satisfied sub-state. Returns true when this call
    /// completed the puzzle.
    pub fn satisfy_state(&mut self) -> bool {
        if self.completed {
            return false;
        }
        self.active = true;
        self.satisfied_states += 1;
        if self.satisfied_states >= self.required_states {
            self.completed = true;
            self.active = false;
            return true;
        }
        false
    }

    /// Hint matching the current progress, if the author wrote one.
    pub fn next_hint(&self) -> Option<&str> {
        if self.completed {
            return None;
        }
        self.hints
            .get(self.satisfied_states as usize)
            .or_else(|| self.hints.last())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> PuzzleSpec {
        PuzzleSpec {
            id: "gate".to_string(),
            points: 40,
            required_states: 2,
            hints: vec!["Find the latch.".to_string(), "Lift both bolts.".to_string()],
        }
    }

    #[test]
    fn completes_after_required_states() {
        let mut puzzle = Puzzle::from_spec(&spec());
        assert!(!puzzle.satisfy_state());
        assert!(puzzle.active);
        assert!(puzzle.satisfy_state());
        assert!(puzzle.completed);
        assert!(!puzzle.active);
    }

    #[test]
    fn further_states_after_completion_are_ignored() {
        let mut puzzle = Puzzle::from_spec(&spec());
        puzzle.satisfy_state();
        puzzle.satisfy_state();
        assert!(!puzzle.satisfy_state());
        assert_eq!(puzzle.satisfied_states, 2);
    }

    #[test]
    fn hints_follow_progress() {
        let mut puzzle = Puzzle::from_spec(&spec());
        assert_eq!(puzzle.next_hint(), Some("Find the latch."));
        puzzle.satisfy_state();
        assert_eq!(puzzle.next_hint(), Some("Lift both bolts."));
        puzzle.satisfy_state();
        assert_eq!(puzzle.next_hint(), None);
    }
}
