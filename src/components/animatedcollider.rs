use bevy_ecs::prelude::*;

use crate::resources::physics::BodyHandle;

/// Physics body derived from a render mesh.
///
/// Lives on its own entity so the render object can disappear without
/// notice: `source` is a weak link and the synchronizer reaps the collider
/// (and its body) once the source no longer carries a
/// [`RenderMesh`](super::rendermesh::RenderMesh).
#[derive(Component, Clone, Debug)]
pub struct AnimatedCollider {
    pub source: Entity,
    pub body: Option<BodyHandle>,
    /// Rebuild the body from current geometry on every throttled tick.
    pub recreate: bool,
}
