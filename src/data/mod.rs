pub mod choices;
pub mod levels;

pub use choices::{
    load_choice_catalog, ChoiceCatalog, ChoiceDataError, ChoiceOutcome, ChoiceSpec, DialogueLine,
    LevelScript, Milestone,
};
pub use levels::{
    load_level_catalog, LevelCatalog, LevelDataError, LevelDescriptor, LevelTheme, PuzzleSpec,
    RewardSpec, UnlockRequirement,
};
