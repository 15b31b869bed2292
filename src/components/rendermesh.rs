//! Render-owned mesh geometry and collision tags.
//!
//! The renderer owns [`RenderMesh`] and rewrites `positions` whenever a
//! skinned or morphed mesh deforms. The collision synchronizer only reads it.
//!
//! Tags:
//! - [`Collidable`] – the mesh gets a triangulated physics body on first sight
//! - [`Animated`] – the body is rebuilt periodically from the current geometry
//! - [`ColliderBuilt`] – set by the synchronizer once the first body exists

use bevy_ecs::prelude::*;
use glam::{Mat4, Vec3};

/// Triangle mesh in local space.
#[derive(Component, Clone, Debug, Default)]
pub struct RenderMesh {
    /// Current (possibly deformed) vertex positions.
    pub positions: Vec<Vec3>,
    /// Triangle list indices into `positions`.
    pub indices: Vec<u32>,
}

/// World-space triangle soup extracted from a [`RenderMesh`].
#[derive(Clone, Debug, PartialEq)]
pub struct WorldGeometry {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl RenderMesh {
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Extract world-space geometry by applying `world` to every vertex.
    ///
    /// Returns `None` for degenerate input: no vertices, no complete triangle,
    /// or an index out of range.
    pub fn world_geometry(&self, world: &Mat4) -> Option<WorldGeometry> {
        if self.positions.is_empty() || self.indices.len() < 3 {
            return None;
        }
        let count = self.positions.len() as u32;
        let mut triangles = Vec::with_capacity(self.indices.len() / 3);
        for tri in self.indices.chunks_exact(3) {
            if tri.iter().any(|&i| i >= count) {
                return None;
            }
            triangles.push([tri[0], tri[1], tri[2]]);
        }
        let vertices = self
            .positions
            .iter()
            .map(|p| world.transform_point3(*p))
            .collect();
        Some(WorldGeometry {
            vertices,
            triangles,
        })
    }
}

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Collidable;

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Animated;

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct ColliderBuilt;
