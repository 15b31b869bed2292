//! Choice message plumbing.
use bevy_ecs::prelude::*;

use crate::events::choice::{ChoiceReply, ChoiceRequest};
use crate::resources::choices::ChoiceBridge;

/// Drain replies sent by the UI into `Messages<ChoiceReply>`.
pub fn poll_choice_replies(bridge: Res<ChoiceBridge>, mut writer: MessageWriter<ChoiceReply>) {
    writer.write_batch(bridge.rx_reply.try_iter());
}

pub fn update_choice_requests(mut msgs: ResMut<Messages<ChoiceRequest>>) {
    msgs.update();
}

pub fn update_choice_replies(mut msgs: ResMut<Messages<ChoiceReply>>) {
    msgs.update();
}
