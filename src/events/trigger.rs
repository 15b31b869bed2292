//! Trigger volume entry event.
//!
//! Triggered by [`crate::systems::triggers::trigger_volume_system`] right
//! before a volume's own callback runs. Fires at most once per volume.

use bevy_ecs::prelude::*;

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct TriggerFired {
    pub name: String,
}
