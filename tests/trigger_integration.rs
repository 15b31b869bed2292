//! Trigger volumes evaluated by the frame schedule.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::Vec3;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use undertow::components::player::Player;
use undertow::components::transform::Transform3D;
use undertow::events::trigger::TriggerFired;
use undertow::game::{install_engine, run_frame};
use undertow::resources::audio::{AudioDevice, SimulatedAudio};
use undertow::resources::captions::{CaptionLibrary, MemoryCaptions};
use undertow::resources::experienceconfig::ExperienceConfig;
use undertow::resources::physics::{BodyStore, Physics};
use undertow::resources::triggerregistry::TriggerRegistry;
use undertow::resources::worldsignals::WorldSignals;
use undertow::systems::triggers::trigger_volume_system;

fn make_world() -> (World, Schedule) {
    let mut world = World::new();
    install_engine(
        &mut world,
        ExperienceConfig::new(),
        Physics::new(BodyStore::new()),
        AudioDevice::new(SimulatedAudio::new()),
        CaptionLibrary::new(MemoryCaptions::new()),
    );
    let mut schedule = Schedule::default();
    schedule.add_systems(trigger_volume_system);
    (world, schedule)
}

fn move_player(world: &mut World, player: Entity, to: Vec3) {
    world.get_mut::<Transform3D>(player).unwrap().translation = to;
}

#[test]
fn fires_once_and_never_again_on_reentry() {
    let (mut world, mut schedule) = make_world();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    world.resource_mut::<TriggerRegistry>().register_trigger(
        "aquarium",
        Vec3::new(-40.0, 1.0, -5.0),
        40.0,
        7.0,
        20.0,
        move |_world| {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    );
    let player = world
        .spawn((Player, Transform3D::from_xyz(-40.0, 1.0, -5.0)))
        .id();

    run_frame(&mut world, &mut schedule, 0.1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(world.resource::<TriggerRegistry>().is_triggered("aquarium"));

    move_player(&mut world, player, Vec3::new(-40.0, 1.0, -20.0));
    run_frame(&mut world, &mut schedule, 0.1);
    move_player(&mut world, player, Vec3::new(-40.0, 1.0, -5.0));
    run_frame(&mut world, &mut schedule, 0.1);
    run_frame(&mut world, &mut schedule, 0.1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // The consumed volume keeps its geometry.
    let registry = world.resource::<TriggerRegistry>();
    assert_eq!(registry.volumes().len(), 1);
    assert_eq!(registry.volumes()[0].half_extents, Vec3::new(20.0, 3.5, 10.0));
}

#[test]
fn outside_until_the_boundary_is_reached() {
    let (mut world, mut schedule) = make_world();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    world.resource_mut::<TriggerRegistry>().register_trigger(
        "gate",
        Vec3::ZERO,
        2.0,
        2.0,
        2.0,
        move |_world| {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    );
    let player = world
        .spawn((Player, Transform3D::from_xyz(1.5, 0.0, 0.0)))
        .id();
    run_frame(&mut world, &mut schedule, 0.1);
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    move_player(&mut world, player, Vec3::new(1.0, 1.0, -1.0));
    run_frame(&mut world, &mut schedule, 0.1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn overlapping_volumes_fire_in_registration_order() {
    let (mut world, mut schedule) = make_world();
    let order = Arc::new(Mutex::new(Vec::new()));
    {
        let mut registry = world.resource_mut::<TriggerRegistry>();
        for name in ["first", "second", "third"] {
            let sink = order.clone();
            registry.register_trigger(name, Vec3::ZERO, 4.0, 4.0, 4.0, move |_world| {
                sink.lock().unwrap().push(format!("callback:{}", name));
            });
        }
    }
    let sink = order.clone();
    world.add_observer(move |trigger: On<TriggerFired>| {
        sink.lock()
            .unwrap()
            .push(format!("event:{}", trigger.event().name));
    });
    world.spawn((Player, Transform3D::default()));

    run_frame(&mut world, &mut schedule, 0.1);
    assert_eq!(
        *order.lock().unwrap(),
        vec![
            "event:first",
            "callback:first",
            "event:second",
            "callback:second",
            "event:third",
            "callback:third",
        ]
    );
}

#[test]
fn nothing_fires_without_a_player() {
    let (mut world, mut schedule) = make_world();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    world.resource_mut::<TriggerRegistry>().register_trigger(
        "everywhere",
        Vec3::ZERO,
        1000.0,
        1000.0,
        1000.0,
        move |_world| {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    );
    run_frame(&mut world, &mut schedule, 0.1);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert!(!world.resource::<TriggerRegistry>().is_triggered("everywhere"));
}

#[test]
fn callbacks_get_full_world_access() {
    let (mut world, mut schedule) = make_world();
    world.resource_mut::<TriggerRegistry>().register_trigger(
        "lobby",
        Vec3::ZERO,
        2.0,
        2.0,
        2.0,
        |world| {
            world.resource_mut::<WorldSignals>().set_flag("entered_lobby");
            world.spawn(Transform3D::from_xyz(9.0, 9.0, 9.0));
        },
    );
    world.spawn((Player, Transform3D::default()));
    run_frame(&mut world, &mut schedule, 0.1);

    assert!(world.resource::<WorldSignals>().has_flag("entered_lobby"));
    let spawned = world
        .query::<&Transform3D>()
        .iter(&world)
        .filter(|t| t.translation == Vec3::splat(9.0))
        .count();
    assert_eq!(spawned, 1);
}
