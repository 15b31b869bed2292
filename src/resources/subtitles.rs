//! The single on-screen subtitle box.
//!
//! Only one caption is visible at a time. Each entry remembers which sound
//! put it there so a late hide from another sound cannot clear it.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleDisplay {
    current: Option<(String, String)>,
}

impl SubtitleDisplay {
    pub fn show(&mut self, sound: impl Into<String>, text: impl Into<String>) {
        self.current = Some((sound.into(), text.into()));
    }

    /// Clear the box if `sound` owns it. Returns whether it was cleared.
    pub fn hide(&mut self, sound: &str) -> bool {
        if self.current.as_ref().is_some_and(|(owner, _)| owner == sound) {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.current.as_ref().map(|(_, text)| text.as_str())
    }

    pub fn owner(&self) -> Option<&str> {
        self.current.as_ref().map(|(owner, _)| owner.as_str())
    }
}
