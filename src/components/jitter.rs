use bevy_ecs::prelude::Component;
use glam::Vec3;

/// "Buggy object" glitch: each frame the entity is displaced from `base` by
/// a random offset of at most `amplitude` per axis.
///
/// Driven by [`crate::systems::framehooks::jitter_hook`].
#[derive(Component, Clone, Copy, Debug)]
pub struct Jitter {
    pub base: Vec3,
    pub amplitude: f32,
}

impl Jitter {
    pub fn new(base: Vec3, amplitude: f32) -> Self {
        Self { base, amplitude }
    }
}
