//! Engine systems.
//!
//! This module groups all ECS systems that advance the experience each
//! frame. [`crate::game::build_update_schedule`] chains them in order.
//!
//! Submodules overview
//! - [`audio`] – named spatial sounds on top of the audio engine
//! - [`choices`] – choice message queues and the reply bridge
//! - [`collidersync`] – build, refresh and reap animated colliders
//! - [`door`] – door pair state machine
//! - [`framehooks`] – run named per-frame hooks, jitter
//! - [`movement`] – integrate positions from velocities and time
//! - [`narrative`] – run and resume narrative sequences
//! - [`subtitles`] – caption cue polling and the subtitle box
//! - [`time`] – update simulation time and delta
//! - [`triggers`] – fire trigger volumes the player entered
//! - [`tween`] – animate translations over time
//! - [`walkroute`] – steer the visitor along its waypoints

pub mod audio;
pub mod choices;
pub mod collidersync;
pub mod door;
pub mod framehooks;
pub mod movement;
pub mod narrative;
pub mod subtitles;
pub mod time;
pub mod triggers;
pub mod tween;
pub mod walkroute;
