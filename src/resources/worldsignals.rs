//! Global story flags.
//!
//! Narrative `flag` steps and trigger callbacks record progress here
//! ("aquarium_visited", "door_unlocked", ...).

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, Default, Resource)]
pub struct WorldSignals {
    /// Presence-only flags; a key being present means "true".
    pub flags: FxHashSet<String>,
}

impl WorldSignals {
    pub fn set_flag(&mut self, key: impl Into<String>) {
        self.flags.insert(key.into());
    }

    pub fn clear_flag(&mut self, key: &str) {
        self.flags.remove(key);
    }

    pub fn has_flag(&self, key: &str) -> bool {
        self.flags.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_presence_only() {
        let mut signals = WorldSignals::default();
        assert!(!signals.has_flag("aquarium_visited"));
        signals.set_flag("aquarium_visited");
        assert!(signals.has_flag("aquarium_visited"));
        signals.clear_flag("aquarium_visited");
        assert!(!signals.has_flag("aquarium_visited"));
    }
}
