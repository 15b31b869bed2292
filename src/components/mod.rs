//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities in
//! the experience: poses, render meshes and their colliders, door pairs,
//! speakers, and animation helpers.
//!
//! Submodules overview:
//! - [`animatedcollider`] – physics body rebuilt from a render mesh
//! - [`door`] – door pair state machine data and door leaves
//! - [`jitter`] – random per-frame displacement for glitching props
//! - [`player`] – marker for the visitor's body
//! - [`rendermesh`] – render-owned geometry and collision tags
//! - [`speaker`] – audio emitter used for spatial voice playback
//! - [`transform`] – 3D pose and velocity
//! - [`walkroute`] – scripted waypoint walking for the headless visitor
//! - [`tween`] – animated interpolation of translation

pub mod animatedcollider;
pub mod door;
pub mod jitter;
pub mod player;
pub mod rendermesh;
pub mod speaker;
pub mod transform;
pub mod tween;
pub mod walkroute;
