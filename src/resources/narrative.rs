//! Narrative sequences and the state of the ones currently running.
//!
//! Sequences are data, loaded from JSON into a [`SequenceLibrary`]:
//!
//! ```json
//! {
//!   "sequences": [
//!     {
//!       "name": "aquarium",
//!       "steps": [
//!         { "step": "voice", "name": "aquarium_intro" },
//!         { "step": "choice", "first": "Stay", "second": "Leave",
//!           "on_first":  [ { "step": "voice", "name": "aquarium_stay" } ],
//!           "on_second": [ { "step": "door", "door": "exit", "action": "open" } ] },
//!         { "step": "music", "name": "theme", "wait": false }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! A [`RunningSequence`] is a stack of [`Frame`]s (the sequence itself,
//! choice branches and nested `run` sequences) plus what it is currently
//! waiting for. The driver lives in [`crate::systems::narrative`].

use bevy_ecs::prelude::Resource;
use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::path::Path;
use std::sync::Arc;

use crate::events::choice::ChoiceRequest;
use crate::events::door::DoorAction;
use crate::resources::tasks::CancelToken;

fn default_true() -> bool {
    true
}

/// One narrative step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Play a voice line on every speaker and wait for it to end.
    Voice { name: String },
    /// Start non-positional music, optionally waiting for it.
    Music {
        name: String,
        #[serde(default)]
        wait: bool,
    },
    Wait { seconds: f32 },
    /// Offer two options and continue with the chosen branch.
    Choice {
        first: String,
        second: String,
        #[serde(default)]
        on_first: Vec<Step>,
        #[serde(default)]
        on_second: Vec<Step>,
    },
    Door { door: String, action: DoorAction },
    Flag { name: String },
    Cue { name: String },
    /// Run another sequence inline under a nested task.
    Run { sequence: String },
    StopAudio {
        #[serde(default = "default_true")]
        fade: bool,
        #[serde(default)]
        pitch_down: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSequence {
    pub name: String,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SequenceFile {
    sequences: Vec<NarrativeSequence>,
}

/// Named sequences available to `start_sequence` and `run` steps.
#[derive(Resource, Debug, Clone, Default)]
pub struct SequenceLibrary {
    sequences: FxHashMap<String, Arc<Vec<Step>>>,
}

impl SequenceLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        let file: SequenceFile = serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse narrative: {}", e))?;
        let mut library = Self::new();
        for sequence in file.sequences {
            library.insert(sequence);
        }
        Ok(library)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read narrative {:?}: {}", path, e))?;
        let library = Self::from_json(&json)?;
        info!("Loaded {} narrative sequences from {:?}", library.len(), path);
        Ok(library)
    }

    pub fn insert(&mut self, sequence: NarrativeSequence) {
        self.sequences
            .insert(sequence.name, Arc::new(sequence.steps));
    }

    pub fn get(&self, name: &str) -> Option<Arc<Vec<Step>>> {
        self.sequences.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

/// A list of steps being executed.
#[derive(Debug, Clone)]
pub struct Frame {
    pub steps: Arc<Vec<Step>>,
    pub next: usize,
    pub token: CancelToken,
    /// Task released when the frame completes; `None` for choice branches.
    pub task: Option<String>,
}

impl Frame {
    pub fn new(steps: Arc<Vec<Step>>, token: CancelToken, task: Option<String>) -> Self {
        Self {
            steps,
            next: 0,
            token,
            task,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.next >= self.steps.len()
    }
}

/// What a suspended sequence resumes on.
#[derive(Debug, Clone)]
pub enum Wait {
    Ready,
    /// The named sound started with this serial stops being live.
    Sound(u64),
    /// `WorldTime::elapsed` reaches the deadline.
    Until(f32),
    /// A reply to this choice request.
    Choice {
        request: ChoiceRequest,
        branches: [Arc<Vec<Step>>; 2],
    },
}

#[derive(Debug, Clone)]
pub struct RunningSequence {
    pub name: String,
    pub root: CancelToken,
    pub frames: SmallVec<[Frame; 4]>,
    pub wait: Wait,
}

impl RunningSequence {
    pub fn new(name: impl Into<String>, steps: Arc<Vec<Step>>, token: CancelToken) -> Self {
        let name = name.into();
        let mut frames = SmallVec::new();
        frames.push(Frame::new(steps, token.clone(), Some(name.clone())));
        Self {
            name,
            root: token,
            frames,
            wait: Wait::Ready,
        }
    }
}

/// Sequences currently in flight.
#[derive(Resource, Debug, Default)]
pub struct NarrativeRunner {
    pub running: Vec<RunningSequence>,
    next_choice_id: u64,
}

impl NarrativeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_choice_id(&mut self) -> u64 {
        self.next_choice_id += 1;
        self.next_choice_id
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.running
            .iter()
            .any(|s| s.name == name && !s.root.cancelled())
    }

    /// Choice id the named sequence is waiting on, if any.
    pub fn pending_choice(&self, name: &str) -> Option<u64> {
        self.running.iter().find_map(|s| match &s.wait {
            Wait::Choice { request, .. } if s.name == name => Some(request.id),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_steps() {
        let library = SequenceLibrary::from_json(
            r#"{ "sequences": [ { "name": "intro", "steps": [
                { "step": "voice", "name": "hello" },
                { "step": "wait", "seconds": 0.5 },
                { "step": "choice", "first": "Yes", "second": "No",
                  "on_second": [ { "step": "flag", "name": "refused" } ] },
                { "step": "door", "door": "lobby", "action": "unlock" },
                { "step": "stop_audio" }
            ] } ] }"#,
        )
        .unwrap();
        let steps = library.get("intro").unwrap();
        assert_eq!(steps.len(), 5);
        assert_eq!(
            steps[0],
            Step::Voice {
                name: "hello".into()
            }
        );
        match &steps[2] {
            Step::Choice {
                on_first, on_second, ..
            } => {
                assert!(on_first.is_empty());
                assert_eq!(on_second.len(), 1);
            }
            other => panic!("unexpected step {:?}", other),
        }
        assert_eq!(
            steps[3],
            Step::Door {
                door: "lobby".into(),
                action: DoorAction::Unlock
            }
        );
        assert_eq!(
            steps[4],
            Step::StopAudio {
                fade: true,
                pitch_down: false
            }
        );
    }

    #[test]
    fn unknown_step_is_an_error() {
        let result =
            SequenceLibrary::from_json(r#"{ "sequences": [ { "name": "x", "steps": [ { "step": "dance" } ] } ] }"#);
        assert!(result.is_err());
    }

    #[test]
    fn cancelled_sequence_is_not_running() {
        let token = CancelToken::new();
        let mut runner = NarrativeRunner::new();
        runner
            .running
            .push(RunningSequence::new("a", Arc::new(Vec::new()), token.clone()));
        assert!(runner.is_running("a"));
        token.cancel();
        assert!(!runner.is_running("a"));
    }
}
