//! Event and message types exchanged across systems.
//!
//! Observer events (`Event`) fire synchronously through `world.trigger` or
//! `commands.trigger`; messages (`Message`) are queued and read once per
//! frame after their queue is updated.
//!
//! Submodules:
//! - [`audio`] – named sound lifecycle messages
//! - [`choice`] – choice requests for the UI and the replies coming back
//! - [`door`] – manual door control and its observer
//! - [`narrative`] – sequence completion and beat markers
//! - [`subtitle`] – subtitle box show/hide messages
//! - [`trigger`] – trigger volume entry
//! - [`tween`] – tween completion
pub mod audio;
pub mod choice;
pub mod door;
pub mod narrative;
pub mod subtitle;
pub mod trigger;
pub mod tween;
