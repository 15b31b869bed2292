use bevy_ecs::prelude::Component;

/// Marks the visitor's body. Trigger volumes and doors measure against the
/// [`Transform3D`](super::transform::Transform3D) of the single entity carrying it.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Player;
