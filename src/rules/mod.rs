pub mod scoring;
pub mod traits;
pub mod unlock;

pub use scoring::{score_ratio, star_rating, time_ratio};
pub use traits::{dominant_trait, ending_text, TraitKind, TraitScores};
pub use unlock::unlock_satisfied;
