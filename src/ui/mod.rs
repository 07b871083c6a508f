pub mod summary;

pub use summary::{render_ending, render_feed, render_level_select, render_status};
