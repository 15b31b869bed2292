use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::components::transform::{Transform3D, Velocity3D};
use crate::components::walkroute::WalkRoute;
use crate::resources::worldtime::WorldTime;

/// Point each walker's velocity at its next waypoint, snapping onto a
/// waypoint it would reach this frame.
pub fn walk_route_system(
    time: Res<WorldTime>,
    mut query: Query<(&mut Transform3D, &mut Velocity3D, &mut WalkRoute)>,
) {
    for (mut transform, mut velocity, mut route) in query.iter_mut() {
        let Some(target) = route.target() else {
            velocity.0 = Vec3::ZERO;
            continue;
        };
        let to_target = target - transform.translation;
        let step = route.speed * time.delta;
        if to_target.length() <= step {
            transform.translation = target;
            velocity.0 = Vec3::ZERO;
            route.next += 1;
        } else {
            velocity.0 = to_target.normalize() * route.speed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::movement::movement_system;

    #[test]
    fn walker_reaches_every_waypoint() {
        let mut world = World::new();
        world.insert_resource(WorldTime {
            delta: 0.1,
            ..Default::default()
        });
        let walker = world
            .spawn((
                Transform3D::default(),
                Velocity3D::default(),
                WalkRoute::new(vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 1.0)], 5.0),
            ))
            .id();
        let mut schedule = Schedule::default();
        schedule.add_systems((walk_route_system, movement_system).chain());
        for _ in 0..20 {
            schedule.run(&mut world);
        }
        let route = world.get::<WalkRoute>(walker).unwrap();
        assert!(route.is_finished());
        let position = world.get::<Transform3D>(walker).unwrap().translation;
        assert!((position - Vec3::new(1.0, 0.0, 1.0)).length() < 1e-4);
    }
}
