//! Named sounds currently owned by the experience, and their subtitle loops.
//!
//! Every voice line, music cue or ambient sound started through
//! [`AudioContext`](crate::systems::audio::AudioContext) is recorded here
//! under its name. A sound may own several engine instances (one per
//! speaker); the first instance is the reference clock for its
//! [`CueLoop`].
//!
//! # Cue loop
//!
//! The loop acts when its pending timer is due, or earlier when the playback
//! position has left what the timer was waiting for (a seek, a loop wrap or
//! the sound vanishing). On each firing it reads the playback position and:
//! - before the next cue: schedules a timer for the remaining wait;
//! - inside `[start, end)`: shows the text and schedules hide + advance at `end`;
//! - past `end`: advances immediately and re-evaluates without delay.
//!
//! A position behind the last one seen rewinds the loop to the first cue not
//! yet over. It finishes (hiding any visible text) once every cue is consumed
//! or the sound disappears. Dropping the loop drops its timer.

use arrayvec::ArrayVec;
use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;

use crate::resources::audio::InstanceId;
use crate::resources::captions::Cue;

/// Pending loop timer, a deadline in world seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueTimer {
    pub fire_at: f32,
    /// Hide the visible cue and advance before re-evaluating.
    pub hide_current: bool,
}

/// Change the subtitle box must apply.
#[derive(Debug, Clone, PartialEq)]
pub enum CueChange {
    Show(String),
    Hide,
}

/// Self-rescheduling cue-timing loop for one sound.
#[derive(Debug, Clone)]
pub struct CueLoop {
    cues: Vec<Cue>,
    index: usize,
    visible: bool,
    timer: Option<CueTimer>,
    done: bool,
    last_position: f32,
}

impl CueLoop {
    /// New loop whose first evaluation is due at `now`.
    pub fn new(cues: Vec<Cue>, now: f32) -> Self {
        Self {
            cues,
            index: 0,
            visible: false,
            timer: Some(CueTimer {
                fire_at: now,
                hide_current: false,
            }),
            done: false,
            last_position: 0.0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn timer(&self) -> Option<CueTimer> {
        self.timer
    }

    /// Run the loop if its timer is due or playback moved under it.
    ///
    /// `position` is the reference instance's playback position, `None` when
    /// the instance no longer exists. Returns the display changes in order.
    pub fn poll(&mut self, now: f32, position: Option<f32>) -> ArrayVec<CueChange, 2> {
        let mut changes = ArrayVec::new();
        let Some(timer) = self.timer else {
            return changes;
        };
        let rewound = position.is_some_and(|p| p < self.last_position);
        if now < timer.fire_at && !rewound && !self.overtaken(position) {
            if let Some(position) = position {
                self.last_position = position;
            }
            return changes;
        }
        self.timer = None;

        let Some(position) = position else {
            self.finish(&mut changes);
            return changes;
        };
        self.last_position = position;

        if rewound {
            if self.visible {
                self.visible = false;
                changes.push(CueChange::Hide);
            }
            self.index = self
                .cues
                .iter()
                .position(|cue| position < cue.end)
                .unwrap_or(self.cues.len());
        } else if timer.hide_current {
            if self.visible {
                self.visible = false;
                changes.push(CueChange::Hide);
            }
            self.index += 1;
        }

        loop {
            let Some(cue) = self.cues.get(self.index) else {
                self.finish(&mut changes);
                break;
            };
            if position < cue.start {
                self.timer = Some(CueTimer {
                    fire_at: now + (cue.start - position),
                    hide_current: false,
                });
                break;
            }
            if position < cue.end {
                self.visible = true;
                changes.push(CueChange::Show(cue.text.clone()));
                self.timer = Some(CueTimer {
                    fire_at: now + (cue.end - position),
                    hide_current: true,
                });
                break;
            }
            // Skipped, e.g. after a seek.
            self.index += 1;
        }
        changes
    }

    /// Playback already reached what the pending timer waits for.
    fn overtaken(&self, position: Option<f32>) -> bool {
        let Some(position) = position else {
            return true;
        };
        match self.cues.get(self.index) {
            Some(cue) if self.visible => position >= cue.end,
            Some(cue) => position >= cue.start,
            None => false,
        }
    }

    fn finish(&mut self, changes: &mut ArrayVec<CueChange, 2>) {
        if self.visible {
            self.visible = false;
            changes.push(CueChange::Hide);
        }
        self.timer = None;
        self.done = true;
    }
}

/// A named sound and the engine instances backing it.
#[derive(Debug, Clone)]
pub struct CustomSound {
    pub name: String,
    /// Unique per start; lets waiters tell a replay from the sound they started.
    pub serial: u64,
    pub instances: Vec<InstanceId>,
    pub cues: Option<CueLoop>,
    /// Reference instance reached its end.
    pub finished: bool,
}

impl CustomSound {
    pub fn primary(&self) -> Option<InstanceId> {
        self.instances.first().copied()
    }

    /// Finished and no subtitle work left.
    pub fn is_spent(&self) -> bool {
        self.finished && self.cues.as_ref().map(|c| c.is_done()).unwrap_or(true)
    }
}

/// Currently owned sounds by name.
#[derive(Resource, Debug, Default)]
pub struct CustomSounds {
    sounds: FxHashMap<String, CustomSound>,
    next_serial: u64,
}

impl CustomSounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sound, returning its serial. The caller must have removed any
    /// previous sound with the same name.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        instances: Vec<InstanceId>,
        cues: Option<CueLoop>,
    ) -> u64 {
        self.next_serial += 1;
        let name = name.into();
        self.sounds.insert(
            name.clone(),
            CustomSound {
                name,
                serial: self.next_serial,
                instances,
                cues,
                finished: false,
            },
        );
        self.next_serial
    }

    pub fn get(&self, name: &str) -> Option<&CustomSound> {
        self.sounds.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut CustomSound> {
        self.sounds.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<CustomSound> {
        self.sounds.remove(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.sounds.keys().cloned().collect()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CustomSound> {
        self.sounds.values_mut()
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Whether the sound started with `serial` is still present and playing.
    pub fn is_live(&self, serial: u64) -> bool {
        self.sounds
            .values()
            .any(|s| s.serial == serial && !s.finished)
    }
}
