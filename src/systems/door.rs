//! Door pair state machine.
//!
//! Each tick [`door_system`] evaluates every door once:
//! - `Opening`/`Closing`: when both leaf tweens have stopped, snap the
//!   leaves, rebuild both leaf bodies from the settled pose and rest in
//!   `Open`/`Closed`;
//! - `Closed`: start opening when the player is within `proximity` on the
//!   horizontal plane and the door allows it (`can_open`);
//! - `Open`: start closing once the player is beyond `proximity`.
//!
//! Starting a motion removes both leaf bodies and restarts the leaf tweens
//! from wherever the leaves are towards the target offsets. Run this system
//! after [`crate::systems::tween::tween_position_system`].
use bevy_ecs::prelude::*;
use bevy_ecs::system::{SystemParam, SystemState};
use glam::Vec3;
use log::{debug, info};

use crate::components::door::{DoorLeaf, DoorPair, DoorState, LeafSide};
use crate::components::player::Player;
use crate::components::transform::Transform3D;
use crate::components::tween::{Easing, TweenPosition};
use crate::resources::experienceconfig::ExperienceConfig;
use crate::resources::physics::{BodyDesc, BodyHandle, Physics, PhysicsWorld};

type LeafItem = (
    &'static DoorLeaf,
    &'static mut Transform3D,
    &'static mut TweenPosition,
);

/// Thickness of a leaf's box body.
const LEAF_THICKNESS: f32 = 0.1;

/// Doors, their leaves and the physics world.
#[derive(SystemParam)]
pub struct DoorContext<'w, 's> {
    pub physics: ResMut<'w, Physics>,
    pub doors: Query<
        'w,
        's,
        (Entity, &'static mut DoorPair, &'static Transform3D),
        Without<DoorLeaf>,
    >,
    pub leaves: Query<'w, 's, LeafItem, Without<DoorPair>>,
}

impl DoorContext<'_, '_> {
    pub fn find(&self, name: &str) -> Option<Entity> {
        self.doors
            .iter()
            .find(|(_, pair, _)| pair.name == name)
            .map(|(entity, _, _)| entity)
    }

    /// Open from `Closed`. Ignores `can_open`. Returns whether motion started.
    pub fn open_animated(&mut self, door: Entity) -> bool {
        self.state_of(door) == Some(DoorState::Closed)
            && self.begin_motion(door, DoorState::Opening)
    }

    /// Close from `Open`. Returns whether motion started.
    pub fn close_animated(&mut self, door: Entity) -> bool {
        self.state_of(door) == Some(DoorState::Open)
            && self.begin_motion(door, DoorState::Closing)
    }

    pub fn state_of(&self, door: Entity) -> Option<DoorState> {
        self.doors.get(door).ok().map(|(_, pair, _)| pair.state)
    }

    pub fn set_can_open(&mut self, door: Entity, can_open: bool) {
        if let Ok((_, mut pair, _)) = self.doors.get_mut(door) {
            pair.can_open = can_open;
        }
    }

    fn begin_motion(&mut self, door: Entity, state: DoorState) -> bool {
        let Ok((_, mut pair, _)) = self.doors.get_mut(door) else {
            return false;
        };
        for body in [pair.left_body.take(), pair.right_body.take()]
            .into_iter()
            .flatten()
        {
            self.physics.remove_body(body);
        }
        pair.state = state;
        let opening = state == DoorState::Opening;
        for leaf_entity in [pair.left_leaf, pair.right_leaf] {
            if let Ok((leaf, transform, mut tween)) = self.leaves.get_mut(leaf_entity) {
                let target = if opening {
                    leaf.open_offset
                } else {
                    leaf.closed_offset
                };
                tween.restart(transform.translation, target, pair.duration);
            }
        }
        info!("door '{}' -> {:?}", pair.name, state);
        true
    }

    fn leaves_stopped(&self, pair: &DoorPair) -> bool {
        [pair.left_leaf, pair.right_leaf].iter().all(|&leaf| {
            self.leaves
                .get(leaf)
                .map(|(_, _, tween)| !tween.playing)
                .unwrap_or(true)
        })
    }

    fn settle(&mut self, door: Entity) {
        let Ok((_, mut pair, container)) = self.doors.get_mut(door) else {
            return;
        };
        let open = pair.state == DoorState::Opening;
        let half = pair.leaf_half_extents();
        for leaf_entity in [pair.left_leaf, pair.right_leaf] {
            let Ok((leaf, mut transform, _)) = self.leaves.get_mut(leaf_entity) else {
                continue;
            };
            let offset = if open {
                leaf.open_offset
            } else {
                leaf.closed_offset
            };
            transform.translation = offset;
            let body = leaf_body(&mut **self.physics, container, half, offset);
            match leaf.side {
                LeafSide::Left => pair.left_body = Some(body),
                LeafSide::Right => pair.right_body = Some(body),
            }
        }
        pair.state = if open {
            DoorState::Open
        } else {
            DoorState::Closed
        };
        info!("door '{}' settled {:?}", pair.name, pair.state);
    }

    /// One evaluation of every door. `player` is `None` when no player exists.
    pub fn update(&mut self, player: Option<Vec3>) {
        let doors: Vec<Entity> = self.doors.iter().map(|(e, _, _)| e).collect();
        for door in doors {
            let Ok((_, pair, container)) = self.doors.get(door) else {
                continue;
            };
            let state = pair.state;
            let stopped = state.is_animating() && self.leaves_stopped(pair);
            let distance = player.map(|p| container.horizontal_distance(p));
            let (proximity, can_open) = (pair.proximity, pair.can_open);
            match (state, distance) {
                (DoorState::Opening | DoorState::Closing, _) => {
                    if stopped {
                        self.settle(door);
                    }
                }
                (DoorState::Closed, Some(distance)) => {
                    if distance < proximity && can_open {
                        debug!("door {:?}: player at {:.2}", door, distance);
                        self.begin_motion(door, DoorState::Opening);
                    }
                }
                (DoorState::Open, Some(distance)) => {
                    if distance > proximity {
                        self.begin_motion(door, DoorState::Closing);
                    }
                }
                _ => {}
            }
        }
    }
}

fn leaf_body(
    physics: &mut dyn PhysicsWorld,
    container: &Transform3D,
    half_extents: Vec3,
    offset: Vec3,
) -> BodyHandle {
    physics.add_body(BodyDesc::kinematic_box(
        half_extents,
        container.transform_point(offset),
        container.rotation,
    ))
}

pub fn door_system(
    mut doors: DoorContext,
    player: Query<&Transform3D, (With<Player>, Without<DoorLeaf>, Without<DoorPair>)>,
) {
    let player = player.iter().next().map(|t| t.translation);
    doors.update(player);
}

/// Spawn a closed door pair at `pose` with bodies for both leaves.
pub fn spawn_door_pair(
    world: &mut World,
    name: impl Into<String>,
    pose: Transform3D,
    width: f32,
    height: f32,
    config: &ExperienceConfig,
) -> Entity {
    let door = world.spawn_empty().id();
    let left = DoorLeaf::new(door, LeafSide::Left, width, config.door_slide);
    let right = DoorLeaf::new(door, LeafSide::Right, width, config.door_slide);
    let mut spawn_leaf = |leaf: DoorLeaf| {
        world
            .spawn((
                leaf,
                Transform3D::from_translation(leaf.closed_offset),
                TweenPosition::idle(leaf.closed_offset).with_easing(Easing::QuadInOut),
            ))
            .id()
    };
    let left_leaf = spawn_leaf(left);
    let right_leaf = spawn_leaf(right);

    let mut pair = DoorPair {
        name: name.into(),
        left_leaf,
        right_leaf,
        state: DoorState::Closed,
        left_body: None,
        right_body: None,
        can_open: true,
        width,
        height,
        thickness: LEAF_THICKNESS,
        proximity: config.door_proximity,
        duration: config.door_duration,
    };
    let half = pair.leaf_half_extents();
    {
        let mut physics = world.resource_mut::<Physics>();
        pair.left_body = Some(leaf_body(&mut **physics, &pose, half, left.closed_offset));
        pair.right_body = Some(leaf_body(&mut **physics, &pose, half, right.closed_offset));
    }
    info!("door '{}' spawned at {}", pair.name, pose.translation);
    world.entity_mut(door).insert((pair, pose));
    door
}

fn with_doors<R>(world: &mut World, f: impl FnOnce(&mut DoorContext) -> R) -> R {
    let mut state: SystemState<DoorContext> = SystemState::new(world);
    let result = {
        let mut doors = state.get_mut(world);
        f(&mut doors)
    };
    state.apply(world);
    result
}

/// Manual open, as used by scripts and tests.
pub fn open_door(world: &mut World, door: Entity) -> bool {
    with_doors(world, |doors| doors.open_animated(door))
}

/// Manual close, as used by scripts and tests.
pub fn close_door(world: &mut World, door: Entity) -> bool {
    with_doors(world, |doors| doors.close_animated(door))
}
