use std::collections::{HashMap, HashSet};

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Best recorded outcome for one level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelResult {
    pub stars: u8,
    pub time_remaining: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettings {
    pub music_volume: f32,
    pub effects_volume: f32,
    pub vibration: bool,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            music_volume: 1.0,
            effects_volume: 1.0,
            vibration: true,
        }
    }
}

/// The player's persistent progress. Created on first run, loaded once at
/// startup, mutated on level completion and settings changes.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    #[serde(default)]
    pub current_level: u32,
    #[serde(default)]
    pub total_stars: u32,
    #[serde(default)]
    pub unlocked: HashSet<String>,
    #[serde(default)]
    pub results: HashMap<u32, LevelResult>,
    #[serde(default)]
    pub settings: PlayerSettings,
}

impl ProgressRecord {
    /// Fresh record with only the given first level open.
    pub fn new(first_level_id: &str) -> Self {
        let mut record = Self::default();
        record.unlocked.insert(first_level_id.to_string());
        record
    }

    /// Total stars only ever go up.
    pub fn add_stars(&mut self, stars: u32) {
        self.total_stars += stars;
    }

    /// Returns true when the level was not unlocked before.
    pub fn unlock(&mut self, level_id: &str) -> bool {
        self.unlocked.insert(level_id.to_string())
    }

    /// Keep the better of the stored and the new result: more stars wins,
    /// equal stars keep the larger remaining time.
    pub fn record_result(&mut self, index: u32, result: LevelResult) {
        let entry = self.results.entry(index).or_insert(result);
        if result.stars > entry.stars
            || (result.stars == entry.stars && result.time_remaining > entry.time_remaining)
        {
            *entry = result;
        }
    }

    pub fn best_stars(&self, index: u32) -> u8 {
        self.results.get(&index).map(|r| r.stars).unwrap_or(0)
    }
}
