//! Animated collision synchronizer.
//!
//! Keeps a physics body behind every collidable render mesh:
//! 1. colliders whose source mesh is gone are reaped with their body;
//! 2. collidable meshes seen for the first time get a kinematic trimesh
//!    built from world-space geometry, and an [`AnimatedCollider`] entity;
//! 3. on throttled ticks, colliders flagged `recreate` are refreshed from
//!    the mesh's current geometry through the configured strategy.
//!
//! Degenerate geometry never produces a body. A first build is retried on
//! the next tick; a refresh keeps the previous body until the next cycle.
use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::animatedcollider::AnimatedCollider;
use crate::components::rendermesh::{Animated, Collidable, ColliderBuilt, RenderMesh};
use crate::components::transform::Transform3D;
use crate::resources::collidersync::ColliderSync;
use crate::resources::physics::{BodyDesc, Physics};

pub fn animated_collider_system(
    mut commands: Commands,
    mut physics: ResMut<Physics>,
    mut sync: ResMut<ColliderSync>,
    fresh: Query<
        (Entity, &RenderMesh, &Transform3D, Has<Animated>),
        (With<Collidable>, Without<ColliderBuilt>),
    >,
    meshes: Query<(&RenderMesh, &Transform3D)>,
    mut colliders: Query<(Entity, &mut AnimatedCollider)>,
) {
    for (entity, collider) in colliders.iter() {
        if meshes.contains(collider.source) {
            continue;
        }
        if let Some(body) = collider.body {
            physics.remove_body(body);
        }
        debug!("collider {:?} reaped, source {:?} gone", entity, collider.source);
        commands.entity(entity).try_despawn();
    }

    if sync.tick() {
        for (entity, mut collider) in colliders.iter_mut() {
            if !collider.recreate {
                continue;
            }
            let Ok((mesh, transform)) = meshes.get(collider.source) else {
                continue;
            };
            let Some(geometry) = mesh.world_geometry(&transform.matrix()) else {
                warn!(
                    "collider {:?}: degenerate geometry, keeping previous body",
                    entity
                );
                continue;
            };
            let body = sync.strategy().refresh(&mut **physics, collider.body, geometry);
            collider.body = body;
        }
    }

    for (entity, mesh, transform, animated) in fresh.iter() {
        let Some(geometry) = mesh.world_geometry(&transform.matrix()) else {
            warn!("mesh {:?}: degenerate geometry, collider deferred", entity);
            continue;
        };
        let body = physics.add_body(BodyDesc::kinematic_trimesh(
            geometry.vertices,
            geometry.triangles,
        ));
        debug!(
            "mesh {:?}: collider body {:?} (animated={})",
            entity, body, animated
        );
        commands.spawn(AnimatedCollider {
            source: entity,
            body: Some(body),
            recreate: animated,
        });
        commands.entity(entity).insert(ColliderBuilt);
    }
}
