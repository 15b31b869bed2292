//! Per-frame hook execution and the jitter hook.
use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::components::jitter::Jitter;
use crate::components::transform::Transform3D;
use crate::resources::framehooks::FrameHooks;
use crate::resources::worldtime::WorldTime;

/// Run every registered hook in order with the current frame delta.
pub fn run_frame_hooks(world: &mut World) {
    let dt = world.resource::<WorldTime>().delta;
    world.resource_scope(|world, mut hooks: Mut<FrameHooks>| {
        hooks.run_all(world, dt);
    });
}

/// Displace every [`Jitter`] entity from its base by a fresh random offset.
pub fn jitter_hook(world: &mut World, _dt: f32) {
    let mut query = world.query::<(&Jitter, &mut Transform3D)>();
    for (jitter, mut transform) in query.iter_mut(world) {
        let offset = Vec3::new(
            fastrand::f32() * 2.0 - 1.0,
            fastrand::f32() * 2.0 - 1.0,
            fastrand::f32() * 2.0 - 1.0,
        ) * jitter.amplitude;
        transform.translation = jitter.base + offset;
    }
}
