pub mod puzzle;

pub use puzzle::{LevelObject, Puzzle};
