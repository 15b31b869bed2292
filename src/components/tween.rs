//! Tween component for animated interpolation.
//!
//! [`TweenPosition`] animates an entity's
//! [`Transform3D::translation`](super::transform::Transform3D) between two
//! points once, along one of several [`Easing`] curves. Door leaves keep an idle tween around permanently and restart it for each
//! open or close motion.
//!
//! See [`crate::systems::tween`] for the update system.

use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Easing functions for smooth interpolation.
///
/// These functions transform a linear `t` value (0.0 to 1.0) to create
/// different acceleration/deceleration curves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed (no easing).
    Linear,
    /// Starts slow, accelerates (quadratic).
    QuadIn,
    /// Starts fast, decelerates (quadratic).
    QuadOut,
    /// Slow start and end (quadratic).
    QuadInOut,
    /// Starts slow, accelerates (cubic).
    CubicIn,
    /// Starts fast, decelerates (cubic).
    CubicOut,
    /// Slow start and end (cubic).
    CubicInOut,
}

/// Animates an entity's translation between two points.
///
/// The tween interpolates `from` to `to` over `duration` seconds using the
/// specified `easing` function, then stops.
#[derive(Component, Clone, Debug)]
pub struct TweenPosition {
    /// Starting position.
    pub from: Vec3,
    /// Ending position.
    pub to: Vec3,
    /// Duration in seconds.
    pub duration: f32,
    /// Easing function to use.
    pub easing: Easing,
    /// Whether the tween is currently playing.
    pub playing: bool,
    /// Current time within the tween.
    pub time: f32,
}

impl TweenPosition {
    pub fn new(from: Vec3, to: Vec3, duration: f32) -> Self {
        TweenPosition {
            from,
            to,
            duration,
            easing: Easing::Linear,
            playing: true,
            time: 0.0,
        }
    }

    /// A finished tween resting at `at`.
    pub fn idle(at: Vec3) -> Self {
        TweenPosition {
            playing: false,
            ..Self::new(at, at, 0.0)
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Play again from `from` to `to`, keeping the easing.
    pub fn restart(&mut self, from: Vec3, to: Vec3, duration: f32) {
        self.from = from;
        self.to = to;
        self.duration = duration;
        self.time = 0.0;
        self.playing = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_position_new() {
        let tw = TweenPosition::new(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0), 2.0);
        assert_eq!(tw.to, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(tw.easing, Easing::Linear);
        assert!(tw.playing);
        assert_eq!(tw.time, 0.0);
    }

    #[test]
    fn test_idle_tween_is_stopped_at_target() {
        let tw = TweenPosition::idle(Vec3::X);
        assert!(!tw.playing);
        assert_eq!(tw.from, Vec3::X);
        assert_eq!(tw.to, Vec3::X);
    }

    #[test]
    fn test_restart_keeps_easing() {
        let mut tw = TweenPosition::idle(Vec3::ZERO).with_easing(Easing::CubicInOut);
        tw.restart(Vec3::ZERO, Vec3::Y, 1.5);
        assert!(tw.playing);
        assert_eq!(tw.time, 0.0);
        assert_eq!(tw.duration, 1.5);
        assert_eq!(tw.easing, Easing::CubicInOut);
    }
}
