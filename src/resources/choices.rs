//! Channel bridge between the UI and the narrative.
//!
//! The UI may live on another thread. It reads
//! [`ChoiceRequest`](crate::events::choice::ChoiceRequest) messages and
//! answers through [`ChoiceBridge::responder`]. Replies are drained into
//! `Messages<ChoiceReply>` each frame by
//! [`crate::systems::choices::poll_choice_replies`].

use crate::events::choice::{ChoiceReply, ChoiceRequest};
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};

#[derive(Resource)]
pub struct ChoiceBridge {
    pub tx_reply: Sender<ChoiceReply>,
    pub rx_reply: Receiver<ChoiceReply>,
}

impl ChoiceBridge {
    /// A sender the UI keeps to answer choices.
    pub fn responder(&self) -> Sender<ChoiceReply> {
        self.tx_reply.clone()
    }
}

/// Create the reply channel and register the choice message queues.
pub fn setup_choices(world: &mut World) {
    let (tx_reply, rx_reply) = unbounded::<ChoiceReply>();
    world.insert_resource(ChoiceBridge { tx_reply, rx_reply });
    world.insert_resource(Messages::<ChoiceRequest>::default());
    world.insert_resource(Messages::<ChoiceReply>::default());
}
