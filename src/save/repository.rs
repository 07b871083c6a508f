use crate::core::serialization::SaveState;
use crate::simulation::progress::LevelResult;

/// Storage boundary for the save data. The game talks to this trait; the
/// SQLite implementation lives in `save::sqlite`.
pub trait SaveRepository {
    fn load_or_init(&mut self) -> Result<SaveState, Box<dyn std::error::Error>>;
    fn save_state(&mut self, state: &SaveState) -> Result<(), Box<dyn std::error::Error>>;
    fn level_result(&self, index: u32) -> Result<Option<LevelResult>, Box<dyn std::error::Error>>;
}
