//! Subtitle box updates.
//!
//! The core never draws text; it writes [`SubtitleMessage`]s that a UI layer
//! turns into a visible caption. The current state is also mirrored in
//! [`SubtitleDisplay`](crate::resources::subtitles::SubtitleDisplay).

use bevy_ecs::message::Message;

#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum SubtitleMessage {
    Show { sound: String, text: String },
    Hide { sound: String },
}
