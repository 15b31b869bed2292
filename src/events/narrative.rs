//! Narrative lifecycle events.
//!
//! [`SequenceCompleted`] is triggered only when a sequence runs its last step
//! naturally; cancelled sequences end silently. [`NarrativeCue`] is a beat
//! marker emitted by `cue` steps so the host can hook lighting, camera or
//! scene changes to the story without the narrative knowing about them.
//!
//! ```ignore
//! world.add_observer(|trigger: On<NarrativeCue>| {
//!     if trigger.event().name == "lights_down" {
//!         // dim the tank
//!     }
//! });
//! ```

use bevy_ecs::prelude::*;

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SequenceCompleted {
    pub name: String,
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct NarrativeCue {
    pub name: String,
}
