//! Trigger volume registry.
//!
//! Invisible axis-aligned regions that fire a one-shot callback the first
//! time the player stands inside them. Volumes are never removed: a consumed
//! volume keeps its geometry for debug drawing and simply stops testing.
//!
//! The registry is ticked by
//! [`trigger_volume_system`](crate::systems::triggers::trigger_volume_system),
//! which runs the returned callbacks with full world access.

use bevy_ecs::prelude::*;
use glam::Vec3;
use std::fmt;

/// One-shot entry callback. Receives the whole world so it can start
/// narrative sequences, spawn, or touch any resource.
pub type TriggerCallback = Box<dyn FnOnce(&mut World) + Send + Sync>;

/// Axis-aligned trigger region.
pub struct TriggerVolume {
    pub name: String,
    pub center: Vec3,
    pub half_extents: Vec3,
    /// Flips to `true` on first entry and never back.
    pub triggered: bool,
    on_enter: Option<TriggerCallback>,
}

impl TriggerVolume {
    /// Boundary-inclusive containment test.
    pub fn contains(&self, point: Vec3) -> bool {
        let min = self.center - self.half_extents;
        let max = self.center + self.half_extents;
        point.x >= min.x
            && point.x <= max.x
            && point.y >= min.y
            && point.y <= max.y
            && point.z >= min.z
            && point.z <= max.z
    }
}

impl fmt::Debug for TriggerVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerVolume")
            .field("name", &self.name)
            .field("center", &self.center)
            .field("half_extents", &self.half_extents)
            .field("triggered", &self.triggered)
            .finish()
    }
}

/// Ordered set of trigger volumes.
#[derive(Resource, Default, Debug)]
pub struct TriggerRegistry {
    volumes: Vec<TriggerVolume>,
}

impl TriggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a box of the given full `width`/`height`/`depth` centered at
    /// `center`. Returns its registration index.
    pub fn register_trigger(
        &mut self,
        name: impl Into<String>,
        center: Vec3,
        width: f32,
        height: f32,
        depth: f32,
        on_enter: impl FnOnce(&mut World) + Send + Sync + 'static,
    ) -> usize {
        self.volumes.push(TriggerVolume {
            name: name.into(),
            center,
            half_extents: Vec3::new(width, height, depth) * 0.5,
            triggered: false,
            on_enter: Some(Box::new(on_enter)),
        });
        self.volumes.len() - 1
    }

    /// All volumes in registration order, consumed ones included.
    pub fn volumes(&self) -> &[TriggerVolume] {
        &self.volumes
    }

    pub fn is_triggered(&self, name: &str) -> bool {
        self.volumes
            .iter()
            .any(|v| v.name == name && v.triggered)
    }

    /// Test every untriggered volume against `player`.
    ///
    /// Volumes that contain the player are marked triggered and their
    /// callbacks handed back in registration order for the caller to run.
    pub fn tick(&mut self, player: Vec3) -> Vec<(String, TriggerCallback)> {
        let mut fired = Vec::new();
        for volume in self.volumes.iter_mut() {
            if volume.triggered || !volume.contains(player) {
                continue;
            }
            volume.triggered = true;
            if let Some(callback) = volume.on_enter.take() {
                fired.push((volume.name.clone(), callback));
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut World) {}

    #[test]
    fn boundary_counts_as_inside() {
        let mut registry = TriggerRegistry::new();
        registry.register_trigger("edge", Vec3::ZERO, 2.0, 2.0, 2.0, noop);
        assert!(registry.volumes()[0].contains(Vec3::new(1.0, -1.0, 1.0)));
        assert!(!registry.volumes()[0].contains(Vec3::new(1.0001, 0.0, 0.0)));
    }

    #[test]
    fn tick_fires_once_and_keeps_volume() {
        let mut registry = TriggerRegistry::new();
        registry.register_trigger("a", Vec3::ZERO, 2.0, 2.0, 2.0, noop);
        assert_eq!(registry.tick(Vec3::ZERO).len(), 1);
        assert!(registry.tick(Vec3::ZERO).is_empty());
        assert_eq!(registry.volumes().len(), 1);
        assert!(registry.is_triggered("a"));
    }

    #[test]
    fn overlapping_volumes_fire_in_registration_order() {
        let mut registry = TriggerRegistry::new();
        registry.register_trigger("second_big", Vec3::ZERO, 10.0, 10.0, 10.0, noop);
        registry.register_trigger("first_small", Vec3::ZERO, 1.0, 1.0, 1.0, noop);
        let names: Vec<String> = registry
            .tick(Vec3::ZERO)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["second_big", "first_small"]);
    }
}
