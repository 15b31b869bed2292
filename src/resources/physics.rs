//! Physics world seam.
//!
//! The engine never simulates; it only adds and removes bodies and reads them
//! back. [`PhysicsWorld`] is the collaborator interface, [`Physics`] the ECS
//! resource holding the injected implementation, and [`BodyStore`] a
//! bookkeeping-only implementation used by the headless binary and tests.

use bevy_ecs::prelude::Resource;
use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;
use std::ops::{Deref, DerefMut};

/// Opaque identifier of a body inside a [`PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u64);

/// Collision shape of a body.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Box { half_extents: Vec3 },
    TriMesh {
        vertices: Vec<Vec3>,
        triangles: Vec<[u32; 3]>,
    },
}

/// Everything needed to create a body. Every body the engine creates is
/// kinematic: moved by the engine, unaffected by forces.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub shape: Shape,
    pub mass: f32,
    pub position: Vec3,
    pub rotation: Quat,
}

impl BodyDesc {
    /// Zero-mass kinematic box centered at `position`.
    pub fn kinematic_box(half_extents: Vec3, position: Vec3, rotation: Quat) -> Self {
        Self {
            shape: Shape::Box { half_extents },
            mass: 0.0,
            position,
            rotation,
        }
    }

    /// Zero-mass kinematic triangle mesh already expressed in world space.
    pub fn kinematic_trimesh(vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            shape: Shape::TriMesh {
                vertices,
                triangles,
            },
            mass: 0.0,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Body bookkeeping interface of the physics collaborator.
pub trait PhysicsWorld: Send + Sync {
    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle;
    /// Returns `false` when `handle` was not present.
    fn remove_body(&mut self, handle: BodyHandle) -> bool;
    fn body(&self, handle: BodyHandle) -> Option<&BodyDesc>;
    fn body_count(&self) -> usize;
}

/// Injected physics world.
#[derive(Resource)]
pub struct Physics(pub Box<dyn PhysicsWorld>);

impl Physics {
    pub fn new(world: impl PhysicsWorld + 'static) -> Self {
        Physics(Box::new(world))
    }
}

impl Deref for Physics {
    type Target = dyn PhysicsWorld;
    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl DerefMut for Physics {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}

/// Physics world that only records bodies.
#[derive(Debug, Default)]
pub struct BodyStore {
    next_id: u64,
    bodies: FxHashMap<u64, BodyDesc>,
}

impl BodyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PhysicsWorld for BodyStore {
    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        self.next_id += 1;
        self.bodies.insert(self.next_id, desc);
        BodyHandle(self.next_id)
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        self.bodies.remove(&handle.0).is_some()
    }

    fn body(&self, handle: BodyHandle) -> Option<&BodyDesc> {
        self.bodies.get(&handle.0)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_never_reused() {
        let mut store = BodyStore::new();
        let a = store.add_body(BodyDesc::kinematic_box(Vec3::ONE, Vec3::ZERO, Quat::IDENTITY));
        assert!(store.remove_body(a));
        let b = store.add_body(BodyDesc::kinematic_box(Vec3::ONE, Vec3::ZERO, Quat::IDENTITY));
        assert_ne!(a, b);
        assert_eq!(store.body_count(), 1);
    }

    #[test]
    fn removing_twice_reports_absence() {
        let mut store = BodyStore::new();
        let a = store.add_body(BodyDesc::kinematic_trimesh(vec![], vec![]));
        assert!(store.remove_body(a));
        assert!(!store.remove_body(a));
        assert!(store.body(a).is_none());
    }
}
