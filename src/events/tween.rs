//! Tween completion event.

use bevy_ecs::prelude::*;

/// A position
/// tween reached its end on `entity`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TweenFinished {
    pub entity: Entity,
}
