//! Notifications about named sounds.
//!
//! Written by [`crate::systems::audio`] whenever a named sound starts, ends
//! on its own, is stopped, or fails to start. Narrative waits do not depend
//! on these messages; they are for hosts and diagnostics.

use bevy_ecs::message::Message;

#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum AudioMessage {
    /// At least one instance is playing.
    Started { name: String },
    /// The reference instance reached its end.
    Finished { name: String },
    /// Every instance failed to start.
    PlayFailed { name: String, error: String },
    /// Stopped or replaced before finishing.
    Stopped { name: String },
}
