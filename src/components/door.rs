//! Sliding door pairs.
//!
//! A door pair is a container entity carrying [`DoorPair`] and the pair's
//! world [`Transform3D`](super::transform::Transform3D), plus two leaf
//! entities carrying [`DoorLeaf`], a local-offset `Transform3D` and a
//! [`TweenPosition`](super::tween::TweenPosition) that slides them.
//!
//! # State machine
//!
//! ```text
//! Closed -> Opening -> Open -> Closing -> Closed
//! ```
//!
//! Leaf bodies exist only while the door rests (`Closed` or `Open`). Both are
//! removed when motion starts and rebuilt from the settled pose when the
//! tweens finish.
//!
//! See [`crate::systems::door`] for the transition logic.

use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::resources::physics::BodyHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    Closed,
    Opening,
    Open,
    Closing,
}

impl DoorState {
    pub fn is_animating(self) -> bool {
        matches!(self, DoorState::Opening | DoorState::Closing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafSide {
    Left,
    Right,
}

/// Door pair state, geometry and the bodies it owns.
#[derive(Component, Clone, Debug)]
pub struct DoorPair {
    pub name: String,
    pub left_leaf: Entity,
    pub right_leaf: Entity,
    pub state: DoorState,
    pub left_body: Option<BodyHandle>,
    pub right_body: Option<BodyHandle>,
    /// Gate for proximity auto-open only; manual open/close ignores it.
    pub can_open: bool,
    pub width: f32,
    pub height: f32,
    pub thickness: f32,
    /// Horizontal distance below which the player opens the door.
    pub proximity: f32,
    /// Tween duration in seconds.
    pub duration: f32,
}

impl DoorPair {
    /// Half extents of one leaf's box body.
    pub fn leaf_half_extents(&self) -> Vec3 {
        Vec3::new(self.width * 0.25, self.height * 0.5, self.thickness * 0.5)
    }

    pub fn bodies_present(&self) -> bool {
        self.left_body.is_some() && self.right_body.is_some()
    }

    pub fn bodies_absent(&self) -> bool {
        self.left_body.is_none() && self.right_body.is_none()
    }
}

/// One moving panel of a door pair.
#[derive(Component, Clone, Copy, Debug)]
pub struct DoorLeaf {
    pub door: Entity,
    pub side: LeafSide,
    /// Offset from the container while closed.
    pub closed_offset: Vec3,
    /// Offset from the container while open.
    pub open_offset: Vec3,
}

impl DoorLeaf {
    /// Closed and open offsets for a leaf of a pair `width` wide that slides
    /// `slide` units sideways.
    pub fn new(door: Entity, side: LeafSide, width: f32, slide: f32) -> Self {
        let sign = match side {
            LeafSide::Left => -1.0,
            LeafSide::Right => 1.0,
        };
        let closed_offset = Vec3::new(sign * width * 0.25, 0.0, 0.0);
        let open_offset = closed_offset + Vec3::new(sign * slide, 0.0, 0.0);
        Self {
            door,
            side,
            closed_offset,
            open_offset,
        }
    }
}
