use std::collections::{HashMap, HashSet, VecDeque};

use bevy_ecs::prelude::*;

/// One cooperative sequence may run per channel; starting another on the
/// same channel cancels whatever was pending there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceChannel {
    Transition,
    Dialogue,
    StarReveal,
    SceneLoad,
}

const ALL_CHANNELS: [SequenceChannel; 4] = [
    SequenceChannel::Transition,
    SequenceChannel::Dialogue,
    SequenceChannel::StarReveal,
    SequenceChannel::SceneLoad,
];

#[derive(Debug, Clone)]
pub enum SequenceStep {
    Fade { remaining_secs: f32 },
    Hold { remaining_secs: f32 },
    TypeText {
        speaker: String,
        text: String,
        chars_shown: usize,
        secs_per_char: f32,
        accum: f32,
    },
    RevealStars {
        shown: u8,
        total: u8,
        secs_between: f32,
        accum: f32,
    },
    AwaitScene { scene: String },
}

#[derive(Debug, Clone)]
pub struct Sequence {
    pub channel: SequenceChannel,
    pub steps: VecDeque<SequenceStep>,
}

const FADE_SECS: f32 = 0.6;
const SECS_PER_CHAR: f32 = 0.04;
const SECS_BETWEEN_STARS: f32 = 0.8;

impl Sequence {
    /// Screen crossfade used for menu and level transitions.
    pub fn screen_fade() -> Self {
        Self {
            channel: SequenceChannel::Transition,
            steps: VecDeque::from([SequenceStep::Fade {
                remaining_secs: FADE_SECS,
            }]),
        }
    }

    /// Typewriter reveal for one dialogue or narration line.
    pub fn dialogue(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: SequenceChannel::Dialogue,
            steps: VecDeque::from([SequenceStep::TypeText {
                speaker: speaker.into(),
                text: text.into(),
                chars_shown: 0,
                secs_per_char: SECS_PER_CHAR,
                accum: 0.0,
            }]),
        }
    }

    /// Typewriter reveal for a whole script, with a beat between lines.
    pub fn dialogue_script<'a>(lines: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut steps = VecDeque::new();
        for (speaker, text) in lines {
            steps.push_back(SequenceStep::TypeText {
                speaker: speaker.to_string(),
                text: text.to_string(),
                chars_shown: 0,
                secs_per_char: SECS_PER_CHAR,
                accum: 0.0,
            });
            steps.push_back(SequenceStep::Hold {
                remaining_secs: FADE_SECS,
            });
        }
        Self {
            channel: SequenceChannel::Dialogue,
            steps,
        }
    }

    /// Victory-screen star reveal, one star at a time.
    pub fn star_reveal(total: u8) -> Self {
        Self {
            channel: SequenceChannel::StarReveal,
            steps: VecDeque::from([
                SequenceStep::Hold {
                    remaining_secs: FADE_SECS,
                },
                SequenceStep::RevealStars {
                    shown: 0,
                    total,
                    secs_between: SECS_BETWEEN_STARS,
                    accum: 0.0,
                },
            ]),
        }
    }

    /// Fade out, then poll until the host reports the scene loaded. A load
    /// that never finishes stalls this channel indefinitely.
    pub fn scene_load(scene: impl Into<String>) -> Self {
        Self {
            channel: SequenceChannel::SceneLoad,
            steps: VecDeque::from([
                SequenceStep::Fade {
                    remaining_secs: FADE_SECS,
                },
                SequenceStep::AwaitScene {
                    scene: scene.into(),
                },
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SequenceEvent {
    StarShown { shown: u8, total: u8 },
    TextCompleted { speaker: String, text: String },
    SceneReady { scene: String },
    Finished(SequenceChannel),
}

/// Which scenes the host engine has reported as loaded.
#[derive(Resource, Debug, Default)]
pub struct SceneStatus {
    loaded: HashSet<String>,
}

impl SceneStatus {
    pub fn mark_loaded(&mut self, scene: &str) {
        self.loaded.insert(scene.to_string());
    }

    pub fn begin_load(&mut self, scene: &str) {
        self.loaded.remove(scene);
    }

    pub fn is_loaded(&self, scene: &str) -> bool {
        self.loaded.contains(scene)
    }
}

/// Pending sequences, advanced once per frame.
#[derive(Resource, Debug, Default)]
pub struct SequenceState {
    active: HashMap<SequenceChannel, Sequence>,
}

impl SequenceState {
    /// Returns true when a pending sequence on the channel was replaced.
    pub fn start(&mut self, sequence: Sequence) -> bool {
        self.active.insert(sequence.channel, sequence).is_some()
    }

    pub fn cancel(&mut self, channel: SequenceChannel) -> bool {
        self.active.remove(&channel).is_some()
    }

    pub fn is_idle(&self, channel: SequenceChannel) -> bool {
        !self.active.contains_key(&channel)
    }

    /// Advance every pending sequence by one frame. At most one step
    /// completes per channel per frame.
    pub fn tick(&mut self, dt: f32, scenes: &SceneStatus) -> Vec<SequenceEvent> {
        let mut events = Vec::new();
        for channel in ALL_CHANNELS {
            let Some(sequence) = self.active.get_mut(&channel) else {
                continue;
            };
            let mut step_done = false;
            if let Some(step) = sequence.steps.front_mut() {
                match step {
                    SequenceStep::Fade { remaining_secs }
                    | SequenceStep::Hold { remaining_secs } => {
                        *remaining_secs -= dt;
                        step_done = *remaining_secs <= 0.0;
                    }
                    SequenceStep::TypeText {
                        speaker,
                        text,
                        chars_shown,
                        secs_per_char,
                        accum,
                    } => {
                        let total_chars = text.chars().count();
                        *accum += dt;
                        while *accum >= *secs_per_char && *chars_shown < total_chars {
                            *accum -= *secs_per_char;
                            *chars_shown += 1;
                        }
                        if *chars_shown >= total_chars {
                            events.push(SequenceEvent::TextCompleted {
                                speaker: speaker.clone(),
                                text: text.clone(),
                            });
                            step_done = true;
                        }
                    }
                    SequenceStep::RevealStars {
                        shown,
                        total,
                        secs_between,
                        accum,
                    } => {
                        *accum += dt;
                        if *accum >= *secs_between && *shown < *total {
                            *accum = 0.0;
                            *shown += 1;
                            events.push(SequenceEvent::StarShown {
                                shown: *shown,
                                total: *total,
                            });
                        }
                        step_done = *shown >= *total;
                    }
                    SequenceStep::AwaitScene { scene } => {
                        if scenes.is_loaded(scene) {
                            events.push(SequenceEvent::SceneReady {
                                scene: scene.clone(),
                            });
                            step_done = true;
                        }
                    }
                }
            } else {
                step_done = true;
            }

            if step_done {
                sequence.steps.pop_front();
                if sequence.steps.is_empty() {
                    self.active.remove(&channel);
                    events.push(SequenceEvent::Finished(channel));
                }
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_finishes_after_its_duration() {
        let mut state = SequenceState::default();
        let scenes = SceneStatus::default();
        state.start(Sequence::screen_fade());
        assert!(state.tick(0.3, &scenes).is_empty());
        let events = state.tick(0.4, &scenes);
        assert_eq!(
            events,
            vec![SequenceEvent::Finished(SequenceChannel::Transition)]
        );
        assert!(state.is_idle(SequenceChannel::Transition));
    }

    #[test]
    fn dialogue_types_out_then_completes() {
        let mut state = SequenceState::default();
        let scenes = SceneStatus::default();
        state.start(Sequence::dialogue("Wisp", "Hi"));
        // Two characters at 0.04s each finish within a tenth of a second.
        let events = state.tick(0.1, &scenes);
        assert!(events.contains(&SequenceEvent::TextCompleted {
            speaker: "Wisp".to_string(),
            text: "Hi".to_string(),
        }));
        assert!(events.contains(&SequenceEvent::Finished(SequenceChannel::Dialogue)));
    }

    #[test]
    fn stars_reveal_one_per_interval() {
        let mut state = SequenceState::default();
        let scenes = SceneStatus::default();
        state.start(Sequence::star_reveal(2));
        state.tick(1.0, &scenes); // hold
        let first = state.tick(0.9, &scenes);
        assert_eq!(
            first,
            vec![SequenceEvent::StarShown { shown: 1, total: 2 }]
        );
        let second = state.tick(0.9, &scenes);
        assert!(second.contains(&SequenceEvent::StarShown { shown: 2, total: 2 }));
    }

    #[test]
    fn scene_load_waits_for_the_host() {
        let mut state = SequenceState::default();
        let mut scenes = SceneStatus::default();
        scenes.begin_load("ocean_depths");
        state.start(Sequence::scene_load("ocean_depths"));
        state.tick(1.0, &scenes); // fade
        assert!(state.tick(5.0, &scenes).is_empty());
        assert!(state.tick(5.0, &scenes).is_empty());
        scenes.mark_loaded("ocean_depths");
        let events = state.tick(0.1, &scenes);
        assert!(events.contains(&SequenceEvent::SceneReady {
            scene: "ocean_depths".to_string(),
        }));
    }

    #[test]
    fn scripts_play_line_by_line() {
        let mut state = SequenceState::default();
        let scenes = SceneStatus::default();
        state.start(Sequence::dialogue_script(vec![
            ("Wisp", "Hello"),
            ("Wisp", "Again"),
        ]));
        let mut texts = Vec::new();
        for _ in 0..40 {
            for event in state.tick(0.5, &scenes) {
                if let SequenceEvent::TextCompleted { text, .. } = event {
                    texts.push(text);
                }
            }
            if state.is_idle(SequenceChannel::Dialogue) {
                break;
            }
        }
        assert_eq!(texts, vec!["Hello".to_string(), "Again".to_string()]);
    }

    #[test]
    fn new_sequence_replaces_pending_one() {
        let mut state = SequenceState::default();
        state.start(Sequence::dialogue("Wisp", "First line"));
        assert!(state.start(Sequence::dialogue("Wisp", "Second line")));
    }
}
