//! Trigger volume evaluation.
use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::components::player::Player;
use crate::components::transform::Transform3D;
use crate::events::trigger::TriggerFired;
use crate::resources::triggerregistry::TriggerRegistry;

/// Test the player position against every untriggered volume and run the
/// entry callbacks of those it is inside, in registration order.
///
/// Callbacks run synchronously with exclusive world access, after
/// [`TriggerFired`] for the same volume. Without a player nothing happens.
pub fn trigger_volume_system(world: &mut World) {
    let player = {
        let mut query = world.query_filtered::<&Transform3D, With<Player>>();
        match query.iter(world).next() {
            Some(transform) => transform.translation,
            None => {
                debug!("trigger_volume_system: no player");
                return;
            }
        }
    };
    let fired = world.resource_mut::<TriggerRegistry>().tick(player);
    for (name, callback) in fired {
        info!("trigger '{}' entered at {}", name, player);
        world.trigger(TriggerFired { name });
        callback(world);
        world.flush();
    }
}
