use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Scripted walk through a list of waypoints at constant speed.
///
/// Steered by [`crate::systems::walkroute::walk_route_system`], which writes
/// the entity's [`Velocity3D`](super::transform::Velocity3D).
#[derive(Component, Clone, Debug)]
pub struct WalkRoute {
    pub waypoints: Vec<Vec3>,
    pub speed: f32,
    pub next: usize,
}

impl WalkRoute {
    pub fn new(waypoints: Vec<Vec3>, speed: f32) -> Self {
        Self {
            waypoints,
            speed,
            next: 0,
        }
    }

    pub fn target(&self) -> Option<Vec3> {
        self.waypoints.get(self.next).copied()
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.waypoints.len()
    }
}
