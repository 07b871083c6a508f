use serde::{Deserialize, Serialize};

/// Accumulated narrative trait scores. Unbounded in both directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitScores {
    #[serde(default)]
    pub kindness: i32,
    #[serde(default)]
    pub logic: i32,
    #[serde(default)]
    pub creativity: i32,
}

impl TraitScores {
    pub fn apply(&mut self, kindness: i32, logic: i32, creativity: i32) {
        self.kindness += kindness;
        self.logic += logic;
        self.creativity += creativity;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TraitKind {
    Kindness,
    Logic,
    Creativity,
}

impl TraitKind {
    pub fn label(self) -> &'static str {
        match self {
            TraitKind::Kindness => "Kindness",
            TraitKind::Logic => "Logic",
            TraitKind::Creativity => "Creativity",
        }
    }
}

/// Greatest-of-three comparison. Ties resolve in the fixed order
/// kindness, then logic, then creativity.
pub fn dominant_trait(scores: &TraitScores) -> TraitKind {
    let mut best = TraitKind::Kindness;
    let mut best_score = scores.kindness;
    if scores.logic > best_score {
        best = TraitKind::Logic;
        best_score = scores.logic;
    }
    if scores.creativity > best_score {
        best = TraitKind::Creativity;
    }
    best
}

/// Closing narration shown on the ending screen for each dominant trait.
pub fn ending_text(dominant: TraitKind) -> &'static str {
    match dominant {
        TraitKind::Kindness => {
            "The dream softens around you. Every stranger you helped is waiting \
             at the gate, and they carry you home on a river of warm light."
        }
        TraitKind::Logic => {
            "The dream resolves into clean lines. You trace the hidden machinery \
             of it all the way down, and wake with the blueprint still in hand."
        }
        TraitKind::Creativity => {
            "The dream refuses to end quietly. It blooms into colors without \
             names, painted by a hand that looks suspiciously like yours."
        }
    }
}
