pub mod feedback;
pub mod level;
pub mod narrative;
pub mod powers;
pub mod puzzles;
pub mod sequence;

pub use feedback::{AudioCue, AudioQueue, UiEvent, UiFeed};
