//! Manual door control.
//!
//! Emitting a [`DoorCommand`] runs [`door_command_observer`], which looks the
//! door up by name and applies the action. Manual open and close bypass the
//! door's `can_open` gate but are still no-ops mid-animation or when the
//! door already rests in the requested state.
use crate::systems::door::DoorContext;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorAction {
    Open,
    Close,
    /// Disable proximity auto-open.
    Lock,
    /// Re-enable proximity auto-open.
    Unlock,
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct DoorCommand {
    pub door: String,
    pub action: DoorAction,
}

pub fn door_command_observer(trigger: On<DoorCommand>, mut doors: DoorContext) {
    let command = trigger.event();
    let Some(entity) = doors.find(&command.door) else {
        warn!("door command for unknown door '{}'", command.door);
        return;
    };
    match command.action {
        DoorAction::Open => {
            doors.open_animated(entity);
        }
        DoorAction::Close => {
            doors.close_animated(entity);
        }
        DoorAction::Lock => doors.set_can_open(entity, false),
        DoorAction::Unlock => doors.set_can_open(entity, true),
    }
}
