//! Narrative task orchestrator.
//!
//! Sequences run cooperatively inside the frame: a sequence executes steps
//! until one suspends it (a voice line, a timed wait, a choice) and resumes
//! on a later frame once that wait resolves. Before every step the sequence
//! consults its cancellation token:
//! - the root token cancelled means the sequence was preempted; it is dropped
//!   without side effects and without [`SequenceCompleted`];
//! - a nested `run` frame whose token was cancelled is dropped on its own and
//!   its parent carries on.
//!
//! [`start_sequence`] is the entry point for trigger callbacks: it clears
//! every active task and all cued audio, registers the new sequence under its
//! name and runs it up to its first suspension.
use bevy_ecs::prelude::*;
use bevy_ecs::system::{SystemParam, SystemState};
use log::{debug, info, warn};
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::events::choice::{ChoiceReply, ChoiceRequest};
use crate::events::door::DoorCommand;
use crate::events::narrative::{NarrativeCue, SequenceCompleted};
use crate::resources::narrative::{
    Frame, NarrativeRunner, RunningSequence, SequenceLibrary, Step, Wait,
};
use crate::resources::tasks::{ActiveTasks, CancelToken};
use crate::resources::worldsignals::WorldSignals;
use crate::systems::audio::AudioContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Suspended,
    Completed,
    Abandoned,
}

#[derive(SystemParam)]
pub struct NarrativeContext<'w, 's> {
    pub runner: ResMut<'w, NarrativeRunner>,
    pub library: Res<'w, SequenceLibrary>,
    pub tasks: ResMut<'w, ActiveTasks>,
    pub signals: ResMut<'w, WorldSignals>,
    pub audio: AudioContext<'w, 's>,
    pub choice_requests: MessageWriter<'w, ChoiceRequest>,
    pub choice_replies: MessageReader<'w, 's, ChoiceReply>,
    pub commands: Commands<'w, 's>,
}

impl NarrativeContext<'_, '_> {
    /// Stop all cued audio with a fade and cancel every active task.
    pub fn clear_tasks(&mut self) {
        self.audio.stop_all_custom_sounds(true, false);
        self.tasks.clear();
    }

    /// Preempt whatever runs and start `name`. Returns `false` when no such
    /// sequence exists, in which case nothing is touched.
    pub fn start(&mut self, name: &str) -> bool {
        let Some(steps) = self.library.get(name) else {
            warn!("narrative sequence '{}' not found", name);
            return false;
        };
        self.clear_tasks();
        let token = self.tasks.push(name);
        info!("narrative '{}' started", name);
        let mut sequence = RunningSequence::new(name, steps, token);
        let outcome = self.drive(&mut sequence, &FxHashMap::default());
        self.finish(sequence, outcome);
        true
    }

    fn finish(&mut self, sequence: RunningSequence, outcome: Outcome) {
        match outcome {
            Outcome::Suspended => self.runner.running.push(sequence),
            Outcome::Completed => {
                info!("narrative '{}' completed", sequence.name);
                self.commands.trigger(SequenceCompleted {
                    name: sequence.name,
                });
            }
            Outcome::Abandoned => {
                debug!("narrative '{}' abandoned", sequence.name);
            }
        }
    }

    /// Resume every running sequence whose wait has resolved.
    pub fn resume_all(&mut self) {
        let replies: FxHashMap<u64, usize> = self
            .choice_replies
            .read()
            .map(|reply| (reply.request, reply.index))
            .collect();
        let running = std::mem::take(&mut self.runner.running);
        for mut sequence in running {
            let outcome = self.drive(&mut sequence, &replies);
            self.finish(sequence, outcome);
        }
    }

    /// Run `sequence` until it suspends, completes or turns out cancelled.
    fn drive(
        &mut self,
        sequence: &mut RunningSequence,
        replies: &FxHashMap<u64, usize>,
    ) -> Outcome {
        loop {
            if sequence.root.cancelled() {
                return Outcome::Abandoned;
            }
            let mut pruned = false;
            while sequence
                .frames
                .last()
                .is_some_and(|frame| frame.token.cancelled())
            {
                if let Some(frame) = sequence.frames.pop() {
                    debug!(
                        "narrative '{}': nested {:?} cancelled",
                        sequence.name, frame.task
                    );
                }
                pruned = true;
            }
            if pruned {
                sequence.wait = Wait::Ready;
            }

            if !self.resolve_wait(sequence, replies) {
                return Outcome::Suspended;
            }

            let Some(frame) = sequence.frames.last_mut() else {
                return Outcome::Completed;
            };
            if frame.is_exhausted() {
                if let Some(Frame {
                    task: Some(task),
                    token,
                    ..
                }) = sequence.frames.pop()
                {
                    self.tasks.release(&task, &token);
                }
                continue;
            }
            let step = frame.steps[frame.next].clone();
            frame.next += 1;
            let token = frame.token.clone();
            sequence.wait = self.execute(sequence, step, token);
        }
    }

    /// `true` once the current wait no longer blocks.
    fn resolve_wait(
        &mut self,
        sequence: &mut RunningSequence,
        replies: &FxHashMap<u64, usize>,
    ) -> bool {
        let resolved = match &sequence.wait {
            Wait::Ready => return true,
            Wait::Sound(serial) => !self.audio.sounds.is_live(*serial),
            Wait::Until(deadline) => self.audio.time.elapsed >= *deadline,
            Wait::Choice { request, branches } => match replies.get(&request.id) {
                Some(&index) if index < branches.len() => {
                    let branch = branches[index].clone();
                    let token = sequence
                        .frames
                        .last()
                        .map(|f| f.token.clone())
                        .unwrap_or_else(|| sequence.root.clone());
                    info!(
                        "narrative '{}': choice {} -> {}",
                        sequence.name, request.id, index
                    );
                    sequence.frames.push(Frame::new(branch, token, None));
                    true
                }
                Some(&index) => {
                    warn!(
                        "narrative '{}': ignoring choice index {} for request {}, asking again",
                        sequence.name, index, request.id
                    );
                    self.choice_requests.write(request.clone());
                    false
                }
                None => false,
            },
        };
        if resolved {
            sequence.wait = Wait::Ready;
        }
        resolved
    }

    fn execute(
        &mut self,
        sequence: &mut RunningSequence,
        step: Step,
        token: CancelToken,
    ) -> Wait {
        match step {
            Step::Voice { name } => match self.audio.play_voice_line(&name) {
                Some(serial) => Wait::Sound(serial),
                None => Wait::Ready,
            },
            Step::Music { name, wait } => match self.audio.play_music(&name) {
                Some(serial) if wait => Wait::Sound(serial),
                _ => Wait::Ready,
            },
            Step::Wait { seconds } => {
                if seconds > 0.0 {
                    Wait::Until(self.audio.time.elapsed + seconds)
                } else {
                    Wait::Ready
                }
            }
            Step::Choice {
                first,
                second,
                on_first,
                on_second,
            } => {
                let request = ChoiceRequest {
                    id: self.runner.next_choice_id(),
                    first,
                    second,
                };
                self.choice_requests.write(request.clone());
                Wait::Choice {
                    request,
                    branches: [Arc::new(on_first), Arc::new(on_second)],
                }
            }
            Step::Door { door, action } => {
                self.commands.trigger(DoorCommand { door, action });
                Wait::Ready
            }
            Step::Flag { name } => {
                self.signals.set_flag(name);
                Wait::Ready
            }
            Step::Cue { name } => {
                self.commands.trigger(NarrativeCue { name });
                Wait::Ready
            }
            Step::Run { sequence: nested } => {
                match self.library.get(&nested) {
                    Some(steps) => {
                        let child = self.tasks.push_child(nested.as_str(), &token);
                        sequence.frames.push(Frame::new(steps, child, Some(nested)));
                    }
                    None => warn!("nested sequence '{}' not found", nested),
                }
                Wait::Ready
            }
            Step::StopAudio { fade, pitch_down } => {
                self.audio.stop_all_custom_sounds(fade, pitch_down);
                Wait::Ready
            }
        }
    }
}

/// Resume running sequences. Runs once per frame, after audio and subtitles.
pub fn narrative_system(mut narrative: NarrativeContext) {
    narrative.resume_all();
}

fn with_narrative<R>(world: &mut World, f: impl FnOnce(&mut NarrativeContext) -> R) -> R {
    let mut state: SystemState<NarrativeContext> = SystemState::new(world);
    let result = {
        let mut narrative = state.get_mut(world);
        f(&mut narrative)
    };
    state.apply(world);
    result
}

/// Preempt the running narrative and start `name`.
pub fn start_sequence(world: &mut World, name: &str) -> bool {
    with_narrative(world, |narrative| narrative.start(name))
}

/// Stop cued audio and cancel every active task.
pub fn clear_tasks(world: &mut World) {
    with_narrative(world, |narrative| narrative.clear_tasks());
}
