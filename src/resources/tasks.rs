//! Active narrative tasks and cooperative cancellation.
//!
//! A running narrative sequence owns a [`CancelToken`]. Every step that
//! resumes after a suspension point (audio end, timed wait, player choice)
//! asks its token whether it was cancelled and abandons the chain if so.
//! Tokens nest: a child token reports cancelled when its parent is.
//!
//! [`ActiveTasks`] maps task names to tokens. Removing a name cancels its
//! token; [`ActiveTasks::clear`] is the hard boundary used when a new major
//! sequence starts.

use bevy_ecs::prelude::Resource;
use log::debug;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag with an optional parent.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    parent: Option<Box<CancelToken>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token cancelled together with `self`, but cancellable on its own.
    pub fn child(&self) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            parent: Some(Box::new(self.clone())),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
            || self.parent.as_ref().map(|p| p.cancelled()).unwrap_or(false)
    }

    /// Same underlying flag.
    pub fn same_as(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.flag, &other.flag)
    }
}

/// Named active tasks.
#[derive(Resource, Debug, Default)]
pub struct ActiveTasks {
    tasks: FxHashMap<String, CancelToken>,
}

impl ActiveTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` with a fresh root token, cancelling any previous
    /// holder of the name.
    pub fn push(&mut self, name: impl Into<String>) -> CancelToken {
        self.insert(name.into(), CancelToken::new())
    }

    /// Register `name` with a token nested under `parent`.
    pub fn push_child(&mut self, name: impl Into<String>, parent: &CancelToken) -> CancelToken {
        self.insert(name.into(), parent.child())
    }

    fn insert(&mut self, name: String, token: CancelToken) -> CancelToken {
        if let Some(previous) = self.tasks.insert(name.clone(), token.clone()) {
            previous.cancel();
        }
        debug!("task '{}' active", name);
        token
    }

    pub fn check_active_task(&self, name: &str) -> bool {
        self.tasks
            .get(name)
            .map(|t| !t.cancelled())
            .unwrap_or(false)
    }

    /// Remove `name` and cancel its token.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.tasks.remove(name) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Remove `name` only if it is still held by `token`. Used by sequences
    /// finishing naturally so they never drop a newer holder of their name.
    pub fn release(&mut self, name: &str, token: &CancelToken) -> bool {
        if self.tasks.get(name).is_some_and(|t| t.same_as(token)) {
            self.tasks.remove(name);
            true
        } else {
            false
        }
    }

    /// Cancel and drop every task.
    pub fn clear(&mut self) {
        for (name, token) in self.tasks.drain() {
            token.cancel();
            debug!("task '{}' cancelled", name);
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tasks.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_follows_parent() {
        let parent = CancelToken::new();
        let child = parent.child();
        assert!(!child.cancelled());
        parent.cancel();
        assert!(child.cancelled());
    }

    #[test]
    fn child_cancel_leaves_parent_alone() {
        let parent = CancelToken::new();
        let child = parent.child();
        child.cancel();
        assert!(child.cancelled());
        assert!(!parent.cancelled());
    }

    #[test]
    fn clear_cancels_every_token() {
        let mut tasks = ActiveTasks::new();
        let a = tasks.push("a");
        let b = tasks.push("b");
        tasks.clear();
        assert!(a.cancelled() && b.cancelled());
        assert!(!tasks.check_active_task("a"));
        assert!(tasks.is_empty());
    }

    #[test]
    fn pushing_same_name_cancels_previous_holder() {
        let mut tasks = ActiveTasks::new();
        let first = tasks.push("aquarium");
        let second = tasks.push("aquarium");
        assert!(first.cancelled());
        assert!(!second.cancelled());
        assert!(!tasks.release("aquarium", &first));
        assert!(tasks.check_active_task("aquarium"));
        assert!(tasks.release("aquarium", &second));
        assert!(!tasks.check_active_task("aquarium"));
    }

    #[test]
    fn nested_task_reports_inactive_when_parent_cancelled() {
        let mut tasks = ActiveTasks::new();
        let parent = tasks.push("outer");
        tasks.push_child("inner", &parent);
        tasks.remove("outer");
        assert!(!tasks.check_active_task("inner"));
    }
}
