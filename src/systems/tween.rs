//! Position tween system.
//!
//! [`tween_position_system`] advances every playing
//! [`TweenPosition`](crate::components::tween::TweenPosition), writes the
//! eased position into [`Transform3D::translation`] and triggers
//! [`TweenFinished`] when a tween reaches its end. Door leaves rely
//! on that final write landing exactly on the target.

use crate::components::transform::Transform3D;
use crate::components::tween::{Easing, TweenPosition};
use crate::events::tween::TweenFinished;
use crate::resources::worldtime::WorldTime;
use bevy_ecs::prelude::*;

/// Apply an easing function to a normalized time value.
///
/// The input `t` is clamped to [0.0, 1.0] and transformed according to the
/// easing curve.
pub(crate) fn ease(e: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match e {
        Easing::Linear => t,
        Easing::QuadIn => t * t,
        Easing::QuadOut => t * (2.0 - t),
        Easing::QuadInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                -1.0 + (4.0 - 2.0 * t) * t
            }
        }
        Easing::CubicIn => t * t * t,
        Easing::CubicOut => {
            let p = t - 1.0;
            p * p * p + 1.0
        }
        Easing::CubicInOut => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                let p = 2.0 * t - 2.0;
                0.5 * p * p * p + 1.0
            }
        }
    }
}

/// Advance tween time, stopping at `duration`.
pub(crate) fn advance(time: &mut f32, duration: f32, playing: &mut bool, dt: f32) {
    *time += dt;
    if *time >= duration {
        *playing = false;
        *time = time.clamp(0.0, duration);
    }
}

/// Animate translations from [`TweenPosition`] components.
pub fn tween_position_system(
    world_time: Res<WorldTime>,
    mut query: Query<(Entity, &mut Transform3D, &mut TweenPosition)>,
    mut commands: Commands,
) {
    let dt = world_time.delta.max(0.0);
    for (entity, mut transform, mut tw) in query.iter_mut() {
        if !tw.playing {
            continue;
        }
        let duration = tw.duration;
        if duration <= 0.0 {
            tw.playing = false;
            transform.translation = tw.to;
            commands.trigger(TweenFinished { entity });
            continue;
        }
        let mut t = tw.time;
        let mut playing = tw.playing;
        advance(&mut t, duration, &mut playing, dt);
        tw.time = t;
        tw.playing = playing;
        let eased = ease(tw.easing, tw.time / duration);
        transform.translation = tw.from.lerp(tw.to, eased);
        if !playing {
            commands.trigger(TweenFinished { entity });
        }
    }
}
