//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution: the physics and audio backends,
//! timing, configuration, registries and narrative bookkeeping. Each
//! submodule documents the semantics and intended usage of its resource(s).
//!
//! Overview
//! - `audio` – audio engine abstraction and the simulated backend
//! - `captions` – caption file loading and WebVTT parsing
//! - `choices` – channel bridge carrying choice replies back from the UI
//! - `collidersync` – refresh interval and strategy for animated colliders
//! - `customsounds` – named sounds currently playing and their cue loops
//! - `experienceconfig` – tunables loaded from the INI file and the CLI
//! - `framehooks` – named per-frame callbacks
//! - `media` – registry of playable media and their captions
//! - `narrative` – sequence scripts and the sequences currently running
//! - `physics` – physics world abstraction and the in-memory body store
//! - `subtitles` – the single visible subtitle and its owner
//! - `tasks` – named cancellable tasks
//! - `triggerregistry` – one-shot trigger volumes
//! - `worldsignals` – flags and strings set by the narrative
//! - `worldtime` – simulation time and delta
pub mod audio;
pub mod captions;
pub mod choices;
pub mod collidersync;
pub mod customsounds;
pub mod experienceconfig;
pub mod framehooks;
pub mod media;
pub mod narrative;
pub mod physics;
pub mod subtitles;
pub mod tasks;
pub mod triggerregistry;
pub mod worldsignals;
pub mod worldtime;
