use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::simulation::powers::DreamPowerKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelCatalog {
    pub schema_version: u32,
    pub levels: Vec<LevelDescriptor>,
}

/// Authored description of one dream level. Immutable after loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDescriptor {
    pub id: String,
    pub index: u32,
    pub name: String,
    pub theme: LevelTheme,
    pub difficulty: u8,
    pub description: String,
    #[serde(default)]
    pub unlock: UnlockRequirement,
    #[serde(default)]
    pub reward: RewardSpec,
    pub time_budget_secs: f32,
    pub max_score: u32,
    #[serde(default)]
    pub puzzles: Vec<PuzzleSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LevelTheme {
    Meadow,
    Ocean,
    Sky,
    Clockwork,
    Nightmare,
}

impl LevelTheme {
    /// Music track the host should fade in when the level starts.
    pub fn music_cue(self) -> &'static str {
        match self {
            LevelTheme::Meadow => "music_meadow",
            LevelTheme::Ocean => "music_ocean",
            LevelTheme::Sky => "music_sky",
            LevelTheme::Clockwork => "music_clockwork",
            LevelTheme::Nightmare => "music_nightmare",
        }
    }

    /// Ambient bed layered under the music.
    pub fn ambient_cue(self) -> &'static str {
        match self {
            LevelTheme::Meadow => "ambient_grass_wind",
            LevelTheme::Ocean => "ambient_deep_water",
            LevelTheme::Sky => "ambient_high_wind",
            LevelTheme::Clockwork => "ambient_ticking",
            LevelTheme::Nightmare => "ambient_low_drone",
        }
    }
}

/// Prerequisites beyond simple membership in the unlocked set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnlockRequirement {
    #[serde(default)]
    pub required_levels: Vec<String>,
    #[serde(default)]
    pub required_stars: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewardSpec {
    #[serde(default)]
    pub power_kind: Option<DreamPowerKind>,
    #[serde(default)]
    pub power_charges: u32,
    #[serde(default)]
    pub blurb: String,
}

/// One sub-puzzle inside a level, authored alongside the level itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleSpec {
    pub id: String,
    pub points: u32,
    #[serde(default = "default_required_states")]
    pub required_states: u32,
    #[serde(default)]
    pub hints: Vec<String>,
}

fn default_required_states() -> u32 {
    1
}

#[derive(Debug)]
pub enum LevelDataError {
    Io { path: String, source: std::io::Error },
    Json { path: String, source: serde_json::Error },
    Validation(String),
}

impl std::fmt::Display for LevelDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelDataError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path, source)
            }
            LevelDataError::Json { path, source } => {
                write!(f, "failed to parse {}: {}", path, source)
            }
            LevelDataError::Validation(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for LevelDataError {}

pub fn load_level_catalog(path: impl AsRef<Path>) -> Result<LevelCatalog, LevelDataError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| LevelDataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let catalog: LevelCatalog =
        serde_json::from_str(&raw).map_err(|source| LevelDataError::Json {
            path: path.display().to_string(),
            source,
        })?;
    catalog.validate()?;
    Ok(catalog)
}

impl LevelCatalog {
    pub fn validate(&self) -> Result<(), LevelDataError> {
        let mut ids = HashSet::new();
        for (position, level) in self.levels.iter().enumerate() {
            if level.id.trim().is_empty() {
                return Err(LevelDataError::Validation(
                    "level id cannot be empty".to_string(),
                ));
            }
            if !ids.insert(level.id.clone()) {
                return Err(LevelDataError::Validation(format!(
                    "duplicate level id {}",
                    level.id
                )));
            }
            if level.index as usize != position {
                return Err(LevelDataError::Validation(format!(
                    "level {} has index {} but sits at position {}",
                    level.id, level.index, position
                )));
            }
            if level.max_score == 0 {
                return Err(LevelDataError::Validation(format!(
                    "level {} has zero max_score",
                    level.id
                )));
            }
            if level.time_budget_secs <= 0.0 {
                return Err(LevelDataError::Validation(format!(
                    "level {} has no time budget",
                    level.id
                )));
            }
            let mut puzzle_ids = HashSet::new();
            for puzzle in &level.puzzles {
                if puzzle.id.trim().is_empty() {
                    return Err(LevelDataError::Validation(format!(
                        "level {} has a puzzle with an empty id",
                        level.id
                    )));
                }
                if !puzzle_ids.insert(puzzle.id.clone()) {
                    return Err(LevelDataError::Validation(format!(
                        "level {} has duplicate puzzle id {}",
                        level.id, puzzle.id
                    )));
                }
                if puzzle.required_states == 0 {
                    return Err(LevelDataError::Validation(format!(
                        "puzzle {} requires zero sub-states",
                        puzzle.id
                    )));
                }
            }
        }
        // Unlock requirements may only reference authored levels.
        for level in &self.levels {
            for required in &level.unlock.required_levels {
                if !ids.contains(required) {
                    return Err(LevelDataError::Validation(format!(
                        "level {} requires unknown level {}",
                        level.id, required
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_level(id: &str, index: u32) -> LevelDescriptor {
        LevelDescriptor {
            id: id.to_string(),
            index,
            name: format!("Level {}", id),
            theme: LevelTheme::Meadow,
            difficulty: 1,
            description: "test".to_string(),
            unlock: UnlockRequirement::default(),
            reward: RewardSpec::default(),
            time_budget_secs: 120.0,
            max_score: 100,
            puzzles: vec![PuzzleSpec {
                id: format!("{}_p1", id),
                points: 100,
                required_states: 1,
                hints: Vec::new(),
            }],
        }
    }

    #[test]
    fn valid_catalog_passes() {
        let catalog = LevelCatalog {
            schema_version: 1,
            levels: vec![sample_level("a", 0), sample_level("b", 1)],
        };
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn duplicate_level_id_rejected() {
        let catalog = LevelCatalog {
            schema_version: 1,
            levels: vec![sample_level("a", 0), sample_level("a", 1)],
        };
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn out_of_order_index_rejected() {
        let catalog = LevelCatalog {
            schema_version: 1,
            levels: vec![sample_level("a", 1)],
        };
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn zero_max_score_rejected() {
        let mut level = sample_level("a", 0);
        level.max_score = 0;
        let catalog = LevelCatalog {
            schema_version: 1,
            levels: vec![level],
        };
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn unknown_unlock_reference_rejected() {
        let mut level = sample_level("a", 0);
        level.unlock.required_levels.push("ghost".to_string());
        let catalog = LevelCatalog {
            schema_version: 1,
            levels: vec![level],
        };
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn catalog_parses_from_json() {
        let raw = r#"{
            "schema_version": 1,
            "levels": [
                {
                    "id": "meadow_arrival",
                    "index": 0,
                    "name": "Arrival in the Meadow",
                    "theme": "MEADOW",
                    "difficulty": 1,
                    "description": "First steps into the dream.",
                    "time_budget_secs": 150,
                    "max_score": 120,
                    "puzzles": [
                        { "id": "gate", "points": 60, "hints": ["Look for the latch."] },
                        { "id": "bridge", "points": 60, "required_states": 2 }
                    ]
                }
            ]
        }"#;
        let catalog: LevelCatalog = serde_json::from_str(raw).unwrap();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.levels[0].puzzles[0].required_states, 1);
        assert_eq!(catalog.levels[0].puzzles[1].required_states, 2);
    }
}
