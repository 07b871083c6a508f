use std::fmt::Write as _;

use crate::core::game::Snapshot;
use crate::rules::traits::{dominant_trait, ending_text};
use crate::simulation::level::LevelLibrary;
use crate::simulation::narrative::NarrativeState;
use crate::simulation::progress::ProgressRecord;
use crate::systems::feedback::{AudioCue, UiEvent};

/// Render the per-frame status block shown by the debug binary.
pub fn render_status(snapshot: &Snapshot) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "=== {} ===", snapshot.phase.label());
    let _ = writeln!(output, "Frame {} | Stars {}", snapshot.frame, snapshot.total_stars);

    if let Some(level) = &snapshot.level {
        let _ = writeln!(
            output,
            "Level {} \"{}\"  score {}/{}  time {:.1}/{:.1}s  puzzles {}/{}",
            level.index,
            level.name,
            level.score,
            level.max_score,
            level.time_remaining,
            level.time_budget,
            level.puzzles_completed,
            level.puzzles_total,
        );
    }

    for puzzle in &snapshot.puzzles {
        let marker = if puzzle.completed {
            "x"
        } else if puzzle.active {
            "~"
        } else {
            " "
        };
        let _ = writeln!(
            output,
            "  [{}] {} ({}/{})",
            marker, puzzle.id, puzzle.satisfied_states, puzzle.required_states
        );
    }

    let _ = writeln!(
        output,
        "Traits  kindness {}  logic {}  creativity {}",
        snapshot.traits.kindness, snapshot.traits.logic, snapshot.traits.creativity
    );

    if let Some(active) = snapshot.active_power {
        let _ = writeln!(
            output,
            "Power {} active, {:.1}s left",
            active.kind.label(),
            active.remaining_secs
        );
    }
    for (kind, charges) in &snapshot.power_charges {
        let _ = writeln!(output, "  {} charges: {}", kind.label(), charges);
    }

    output
}

/// Render this frame's outbound UI and audio calls.
pub fn render_feed(snapshot: &Snapshot) -> String {
    let mut output = String::new();
    for event in &snapshot.ui_events {
        let line = match event {
            UiEvent::Score { value, max } => format!("score {}/{}", value, max),
            UiEvent::TimeRemaining { secs } => format!("time {:.1}s", secs),
            UiEvent::PowerCharges { kind, charges } => {
                format!("{} charges {}", kind.label(), charges)
            }
            UiEvent::PowerExpired { kind } => format!("{} expired", kind.label()),
            UiEvent::StarReveal { shown, total } => format!("star {}/{}", shown, total),
            UiEvent::Narration { text } => format!("narration: {}", text),
            UiEvent::Dialogue { speaker, text } => format!("{}: {}", speaker, text),
            UiEvent::SceneReady { scene } => format!("scene ready: {}", scene),
            UiEvent::LevelUnlocked { level_id } => format!("unlocked {}", level_id),
            UiEvent::PhaseChanged { phase } => format!("phase -> {}", phase.label()),
        };
        let _ = writeln!(output, "[ui] {}", line);
    }
    for cue in &snapshot.audio_cues {
        let line = match cue {
            AudioCue::Music(name) => format!("music {}", name),
            AudioCue::Ambient(name) => format!("ambient {}", name),
            AudioCue::Effect(name) => format!("effect {}", name),
        };
        let _ = writeln!(output, "[audio] {}", line);
    }
    output
}

/// Render the level-select list with lock state and best results.
pub fn render_level_select(library: &LevelLibrary, progress: &ProgressRecord) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "=== Levels ({} stars) ===", progress.total_stars);
    for level in &library.levels {
        let unlocked = progress.unlocked.contains(&level.id);
        let stars = progress.best_stars(level.index);
        let lock = if unlocked { " " } else { "#" };
        let _ = writeln!(
            output,
            "{} {} {:10} {} (difficulty {}) {}",
            lock,
            level.index,
            level.id,
            "*".repeat(stars as usize),
            level.difficulty,
            level.description,
        );
    }
    output
}

/// Render the ending screen for the accumulated narrative state.
pub fn render_ending(narrative: &NarrativeState) -> String {
    let dominant = dominant_trait(&narrative.traits);
    let mut output = String::new();
    let _ = writeln!(output, "=== Ending: {} ===", dominant.label());
    let _ = writeln!(output, "{}", ending_text(dominant));
    if narrative.helped_stranger {
        let _ = writeln!(output, "+ You helped a stranger along the way.");
    }
    if narrative.solved_riddle {
        let _ = writeln!(output, "+ You solved the deep riddle.");
    }
    if narrative.created_art {
        let _ = writeln!(output, "+ You left art behind in the dream.");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::traits::TraitScores;

    #[test]
    fn ending_mentions_milestones() {
        let narrative = NarrativeState {
            traits: TraitScores {
                kindness: 4,
                logic: 1,
                creativity: 0,
            },
            helped_stranger: true,
            ..Default::default()
        };
        let text = render_ending(&narrative);
        assert!(text.contains("Kindness"));
        assert!(text.contains("stranger"));
    }
}
