use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::core::serialization::{load_state_from_json, save_state_to_json, SaveState};
use crate::save::repository::SaveRepository;
use crate::simulation::progress::LevelResult;

const SAVE_SCHEMA_VERSION: i64 = 1;

/// Fixed key holding the serialized progress blob.
const PROGRESS_KEY: &str = "progress";

const SAVE_DB_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS save_meta (
  id INTEGER PRIMARY KEY CHECK (id = 1),
  schema_version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS save_entries (
  entry_key TEXT PRIMARY KEY,
  entry_value TEXT NOT NULL
);
"#;

#[derive(Debug)]
pub enum SaveDbError {
    Sqlite(rusqlite::Error),
    Serialize(serde_json::Error),
}

impl std::fmt::Display for SaveDbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveDbError::Sqlite(err) => write!(f, "sqlite error: {}", err),
            SaveDbError::Serialize(err) => write!(f, "serialization error: {}", err),
        }
    }
}

impl std::error::Error for SaveDbError {}

impl From<rusqlite::Error> for SaveDbError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sqlite(err)
    }
}

fn level_key(index: u32) -> String {
    format!("Level_{}", index)
}

fn encode_level_result(result: &LevelResult) -> String {
    format!("{},{}", result.stars, result.time_remaining)
}

/// Parse the comma-joined `stars,time` pair. Anything malformed reads as
/// absent rather than failing the load.
fn parse_level_result(value: &str) -> Option<LevelResult> {
    let (stars, time) = value.split_once(',')?;
    let stars = stars.trim().parse::<u8>().ok()?;
    let time_remaining = time.trim().parse::<f32>().ok()?;
    Some(LevelResult {
        stars,
        time_remaining,
    })
}

/// Key-value save store backed by a single SQLite database. Every write
/// runs in one transaction, so the progress blob and the per-level keys
/// cannot disagree after a crash.
pub struct SaveDb {
    conn: Connection,
}

impl SaveDb {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SaveDbError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, SaveDbError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, SaveDbError> {
        let db = Self { conn };
        db.conn.execute_batch(SAVE_DB_SCHEMA)?;
        db.ensure_meta()?;
        Ok(db)
    }

    fn ensure_meta(&self) -> Result<(), SaveDbError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO save_meta (id, schema_version) VALUES (1, ?1)",
            params![SAVE_SCHEMA_VERSION],
        )?;
        Ok(())
    }

    fn read_entry(&self, key: &str) -> Result<Option<String>, SaveDbError> {
        let value = self
            .conn
            .query_row(
                "SELECT entry_value FROM save_entries WHERE entry_key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Read the progress blob. A missing or unreadable blob is "no save
    /// data", never an error.
    pub fn load_state(&self) -> Result<Option<SaveState>, SaveDbError> {
        let Some(raw) = self.read_entry(PROGRESS_KEY)? else {
            return Ok(None);
        };
        match load_state_from_json(&raw) {
            Ok(state) => Ok(Some(state)),
            Err(err) => {
                log::warn!("discarding unreadable save data: {}", err);
                Ok(None)
            }
        }
    }

    pub fn load_or_init(&mut self) -> Result<SaveState, SaveDbError> {
        if let Some(state) = self.load_state()? {
            Ok(state)
        } else {
            let state = SaveState::default();
            self.save_state(&state)?;
            Ok(state)
        }
    }

    pub fn save_state(&mut self, state: &SaveState) -> Result<(), SaveDbError> {
        let blob = save_state_to_json(state).map_err(SaveDbError::Serialize)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO save_entries (entry_key, entry_value) VALUES (?1, ?2)
             ON CONFLICT(entry_key) DO UPDATE SET entry_value = excluded.entry_value",
            params![PROGRESS_KEY, blob],
        )?;
        tx.execute(
            "DELETE FROM save_entries WHERE entry_key LIKE 'Level\\_%' ESCAPE '\\'",
            [],
        )?;
        for (index, result) in &state.progress.results {
            tx.execute(
                "INSERT INTO save_entries (entry_key, entry_value) VALUES (?1, ?2)",
                params![level_key(*index), encode_level_result(result)],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Read one `Level_<index>` pair directly, for the level-select screen.
    pub fn level_result(&self, index: u32) -> Result<Option<LevelResult>, SaveDbError> {
        let Some(raw) = self.read_entry(&level_key(index))? else {
            return Ok(None);
        };
        let parsed = parse_level_result(&raw);
        if parsed.is_none() {
            log::warn!("malformed level entry {}: {}", level_key(index), raw);
        }
        Ok(parsed)
    }
}

impl SaveRepository for SaveDb {
    fn load_or_init(&mut self) -> Result<SaveState, Box<dyn std::error::Error>> {
        Ok(SaveDb::load_or_init(self)?)
    }

    fn save_state(&mut self, state: &SaveState) -> Result<(), Box<dyn std::error::Error>> {
        Ok(SaveDb::save_state(self, state)?)
    }

    fn level_result(&self, index: u32) -> Result<Option<LevelResult>, Box<dyn std::error::Error>> {
        Ok(SaveDb::level_result(self, index)?)
    }
}
