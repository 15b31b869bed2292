//! Throttle and strategy for animated collider rebuilds.
//!
//! [`ColliderSync`] counts ticks and tells the synchronizer when a rebuild
//! cycle is due. How a body follows new geometry is delegated to a
//! [`ColliderStrategy`]; the shipped [`RebuildStrategy`] destroys the old
//! body and builds a fresh kinematic trimesh.

use bevy_ecs::prelude::Resource;

use crate::components::rendermesh::WorldGeometry;
use crate::resources::physics::{BodyDesc, BodyHandle, PhysicsWorld};

/// Decides how a collider body follows its render mesh.
pub trait ColliderStrategy: Send + Sync {
    /// Replace or update `current` so it matches `geometry`. Returns the
    /// handle the collider should own afterwards.
    fn refresh(
        &self,
        physics: &mut dyn PhysicsWorld,
        current: Option<BodyHandle>,
        geometry: WorldGeometry,
    ) -> Option<BodyHandle>;
}

/// Wholesale replacement: remove the old body, add a new zero-mass
/// kinematic trimesh.
#[derive(Debug, Default, Clone, Copy)]
pub struct RebuildStrategy;

impl ColliderStrategy for RebuildStrategy {
    fn refresh(
        &self,
        physics: &mut dyn PhysicsWorld,
        current: Option<BodyHandle>,
        geometry: WorldGeometry,
    ) -> Option<BodyHandle> {
        if let Some(old) = current {
            physics.remove_body(old);
        }
        Some(physics.add_body(BodyDesc::kinematic_trimesh(
            geometry.vertices,
            geometry.triangles,
        )))
    }
}

/// Rebuild cadence and strategy.
#[derive(Resource)]
pub struct ColliderSync {
    /// Rebuild every `interval` ticks (1 = every tick).
    pub interval: u32,
    counter: u32,
    strategy: Box<dyn ColliderStrategy>,
}

impl Default for ColliderSync {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ColliderSync {
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            counter: 0,
            strategy: Box::new(RebuildStrategy),
        }
    }

    pub fn with_strategy(mut self, strategy: impl ColliderStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    pub fn strategy(&self) -> &dyn ColliderStrategy {
        self.strategy.as_ref()
    }

    /// Advance the counter; `true` when this tick is a rebuild tick.
    pub fn tick(&mut self) -> bool {
        self.counter += 1;
        if self.counter >= self.interval {
            self.counter = 0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::physics::BodyStore;
    use glam::Vec3;

    #[test]
    fn interval_one_rebuilds_every_tick() {
        let mut sync = ColliderSync::new(1);
        assert!(sync.tick());
        assert!(sync.tick());
    }

    #[test]
    fn interval_three_rebuilds_every_third_tick() {
        let mut sync = ColliderSync::new(3);
        let due: Vec<bool> = (0..6).map(|_| sync.tick()).collect();
        assert_eq!(due, vec![false, false, true, false, false, true]);
    }

    #[test]
    fn rebuild_strategy_replaces_body() {
        let mut store = BodyStore::new();
        let geometry = WorldGeometry {
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Z],
            triangles: vec![[0, 1, 2]],
        };
        let first = RebuildStrategy.refresh(&mut store, None, geometry.clone());
        let second = RebuildStrategy.refresh(&mut store, first, geometry);
        assert_ne!(first, second);
        assert_eq!(store.body_count(), 1);
        assert!(store.body(first.unwrap()).is_none());
    }
}
