//! Ordered per-frame update hooks.
//!
//! Hooks run once per frame, in registration order, with exclusive world
//! access and the scaled frame delta. Registering a name that already exists
//! replaces that hook in place.
//!
//! Executed by [`crate::systems::framehooks::run_frame_hooks`].

use bevy_ecs::prelude::*;

pub type FrameHook = Box<dyn FnMut(&mut World, f32) + Send + Sync>;

#[derive(Resource, Default)]
pub struct FrameHooks {
    hooks: Vec<(String, FrameHook)>,
}

impl FrameHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        name: impl Into<String>,
        hook: impl FnMut(&mut World, f32) + Send + Sync + 'static,
    ) {
        let name = name.into();
        let hook: FrameHook = Box::new(hook);
        match self.hooks.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = hook,
            None => self.hooks.push((name, hook)),
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.hooks.len();
        self.hooks.retain(|(n, _)| n != name);
        self.hooks.len() != before
    }

    pub fn names(&self) -> Vec<&str> {
        self.hooks.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub(crate) fn run_all(&mut self, world: &mut World, dt: f32) {
        for (_, hook) in self.hooks.iter_mut() {
            hook(world, dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacing_keeps_position() {
        let mut hooks = FrameHooks::new();
        hooks.add("a", |_, _| {});
        hooks.add("b", |_, _| {});
        hooks.add("a", |_, _| {});
        assert_eq!(hooks.names(), vec!["a", "b"]);
        assert!(hooks.remove("a"));
        assert!(!hooks.remove("a"));
        assert_eq!(hooks.names(), vec!["b"]);
    }
}
