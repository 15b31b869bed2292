//! End-to-end run of the bundled walk-through.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use std::sync::{Arc, Mutex};

use undertow::components::door::{DoorPair, DoorState};
use undertow::events::narrative::{NarrativeCue, SequenceCompleted};
use undertow::game::{
    build_update_schedule, caption_library, demo_choice_responder, install_engine, load_media,
    load_narrative, run_frame, setup_demo,
};
use undertow::resources::audio::{AudioDevice, SimulatedAudio};
use undertow::resources::experienceconfig::ExperienceConfig;
use undertow::resources::physics::{BodyStore, Physics};
use undertow::resources::tasks::ActiveTasks;
use undertow::resources::triggerregistry::TriggerRegistry;
use undertow::resources::worldsignals::WorldSignals;

#[test]
fn walk_through_reaches_the_credits() {
    let config = ExperienceConfig::new();
    let mut world = World::new();
    let captions = caption_library(&config);
    let media = load_media(&config);
    let narrative = load_narrative(&config);
    assert!(narrative.get("aquarium").is_some());
    install_engine(
        &mut world,
        config,
        Physics::new(BodyStore::new()),
        AudioDevice::new(SimulatedAudio::new()),
        captions,
    );
    world.insert_resource(media);
    world.insert_resource(narrative);

    let completed = Arc::new(Mutex::new(Vec::new()));
    let sink = completed.clone();
    world.add_observer(move |trigger: On<SequenceCompleted>| {
        sink.lock().unwrap().push(trigger.event().name.clone());
    });
    let cues = Arc::new(Mutex::new(Vec::new()));
    let sink = cues.clone();
    world.add_observer(move |trigger: On<NarrativeCue>| {
        sink.lock().unwrap().push(trigger.event().name.clone());
    });

    setup_demo(&mut world);
    let mut update = build_update_schedule();
    update.add_systems(demo_choice_responder);

    for _ in 0..(60 * 40) {
        run_frame(&mut world, &mut update, 1.0 / 60.0);
    }

    let triggers = world.resource::<TriggerRegistry>();
    assert!(triggers.is_triggered("aquarium"));
    assert!(triggers.is_triggered("tunnel"));

    let signals = world.resource::<WorldSignals>();
    assert!(signals.has_flag("stayed_at_tank"));
    assert!(signals.has_flag("aquarium_visited"));

    assert_eq!(
        *completed.lock().unwrap(),
        vec!["aquarium".to_string(), "tunnel".to_string()]
    );
    assert_eq!(
        *cues.lock().unwrap(),
        vec!["lights_down".to_string(), "credits".to_string()]
    );
    assert!(world.resource::<ActiveTasks>().is_empty());

    let mut doors = world.query::<&DoorPair>();
    for pair in doors.iter(&world) {
        assert_eq!(pair.state, DoorState::Closed, "door '{}'", pair.name);
        assert!(pair.bodies_present());
    }
    // Four door leaves, the kelp and the floor triangle.
    assert_eq!(world.resource::<Physics>().body_count(), 6);
}
