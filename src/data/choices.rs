use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceCatalog {
    pub schema_version: u32,
    pub scripts: Vec<LevelScript>,
}

/// Dialogue and choices authored for one level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelScript {
    pub level_id: String,
    #[serde(default)]
    pub lines: Vec<DialogueLine>,
    #[serde(default)]
    pub choices: Vec<ChoiceSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueLine {
    pub speaker: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceSpec {
    pub id: String,
    pub prompt: String,
    pub outcome: ChoiceOutcome,
}

/// Fixed result of picking a choice: narration, trait deltas, optional extras.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceOutcome {
    pub narration: String,
    #[serde(default)]
    pub kindness: i32,
    #[serde(default)]
    pub logic: i32,
    #[serde(default)]
    pub creativity: i32,
    #[serde(default)]
    pub milestone: Option<Milestone>,
    #[serde(default)]
    pub unlocks_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Milestone {
    HelpedStranger,
    SolvedRiddle,
    CreatedArt,
}

#[derive(Debug)]
pub enum ChoiceDataError {
    Io { path: String, source: std::io::Error },
    Json { path: String, source: serde_json::Error },
    Validation(String),
}

impl std::fmt::Display for ChoiceDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChoiceDataError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path, source)
            }
            ChoiceDataError::Json { path, source } => {
                write!(f, "failed to parse {}: {}", path, source)
            }
            ChoiceDataError::Validation(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ChoiceDataError {}

pub fn load_choice_catalog(path: impl AsRef<Path>) -> Result<ChoiceCatalog, ChoiceDataError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ChoiceDataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let catalog: ChoiceCatalog =
        serde_json::from_str(&raw).map_err(|source| ChoiceDataError::Json {
            path: path.display().to_string(),
            source,
        })?;
    catalog.validate()?;
    Ok(catalog)
}

impl ChoiceCatalog {
    pub fn validate(&self) -> Result<(), ChoiceDataError> {
        let mut script_ids = HashSet::new();
        // Choice ids form a single namespace: resolution is a flat lookup.
        let mut choice_ids = HashSet::new();
        for script in &self.scripts {
            if script.level_id.trim().is_empty() {
                return Err(ChoiceDataError::Validation(
                    "script level_id cannot be empty".to_string(),
                ));
            }
            if !script_ids.insert(script.level_id.clone()) {
                return Err(ChoiceDataError::Validation(format!(
                    "duplicate script for level {}",
                    script.level_id
                )));
            }
            for choice in &script.choices {
                if choice.id.trim().is_empty() {
                    return Err(ChoiceDataError::Validation(format!(
                        "level {} has a choice with an empty id",
                        script.level_id
                    )));
                }
                if !choice_ids.insert(choice.id.clone()) {
                    return Err(ChoiceDataError::Validation(format!(
                        "duplicate choice id {}",
                        choice.id
                    )));
                }
                if choice.prompt.trim().is_empty() {
                    return Err(ChoiceDataError::Validation(format!(
                        "choice {} missing prompt",
                        choice.id
                    )));
                }
                if choice.outcome.narration.trim().is_empty() {
                    return Err(ChoiceDataError::Validation(format!(
                        "choice {} missing narration",
                        choice.id
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

    fn sample_choice(id: &str) -> ChoiceSpec {
        ChoiceSpec {
            id: id.to_string(),
            prompt: "What now?".to_string(),
            outcome: ChoiceOutcome {
                narration: "Something happens.".to_string(),
                kindness: 1,
                logic: 0,
                creativity: 0,
                milestone: None,
                unlocks_level: None,
            },
        }
    }

    #[test]
    fn duplicate_choice_id_rejected_across_levels() {
        let catalog = ChoiceCatalog {
            schema_version: 1,
            scripts: vec![
                LevelScript {
                    level_id: "a".to_string(),
                    lines: Vec::new(),
                    choices: vec![sample_choice("pick")],
                },
                LevelScript {
                    level_id: "b".to_string(),
                    lines: Vec::new(),
                    choices: vec![sample_choice("pick")],
                },
            ],
        };
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn catalog_parses_from_json() {
        let raw = r#"{
            "schema_version": 1,
            "scripts": [
                {
                    "level_id": "meadow_arrival",
                    "lines": [
                        { "speaker": "Wisp", "text": "You made it." }
                    ],
                    "choices": [
                        {
                            "id": "help_stranger",
                            "prompt": "A stranger struggles with a heavy basket.",
                            "outcome": {
                                "narration": "You carry the basket together.",
                                "kindness": 2,
                                "logic": -1,
                                "milestone": "HELPED_STRANGER"
                            }
                        }
                    ]
                }
            ]
        }"#;
        let catalog: ChoiceCatalog = serde_json::from_str(raw).unwrap();
        assert!(catalog.validate().is_ok());
        let outcome = &catalog.scripts[0].choices[0].outcome;
        assert_eq!(outcome.kindness, 2);
        assert_eq!(outcome.logic, -1);
        assert_eq!(outcome.creativity, 0);
        assert_eq!(outcome.milestone, Some(Milestone::HelpedStranger));
    }
}
