use bevy_ecs::prelude::*;

use crate::components::transform::{Transform3D, Velocity3D};
use crate::resources::worldtime::WorldTime;

/// Integrate [`Velocity3D`] into translation.
pub fn movement_system(mut query: Query<(&mut Transform3D, &Velocity3D)>, time: Res<WorldTime>) {
    for (mut transform, velocity) in query.iter_mut() {
        transform.translation += velocity.0 * time.delta;
    }
}
