//! Binary player choices.
//!
//! A narrative `choice` step writes a [`ChoiceRequest`]. The UI answers by
//! sending a [`ChoiceReply`] through
//! [`ChoiceBridge`](crate::resources::choices::ChoiceBridge); the reply is
//! drained into the ECS message queue each frame.

use bevy_ecs::message::Message;

/// Ask the UI to present two options.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct ChoiceRequest {
    pub id: u64,
    pub first: String,
    pub second: String,
}

/// Selected option for a request; `index` is 0 or 1.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceReply {
    pub request: u64,
    pub index: usize,
}
