//! Engine assembly and the demo scene.
//!
//! [`install_engine`] inserts every resource, message queue and observer the
//! systems expect, with the collaborators (physics, audio engine, captions)
//! passed in by the host. [`build_update_schedule`] returns the per-frame
//! schedule in its fixed order:
//!
//! ```text
//! message queues -> frame hooks -> trigger volumes -> collider sync
//!   -> movement/tweens -> doors -> audio pump -> subtitles -> narrative
//! ```
//!
//! [`setup_demo`] builds the underwater walk-through used by the binary.

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{info, warn};

use crate::components::door::DoorPair;
use crate::components::jitter::Jitter;
use crate::components::player::Player;
use crate::components::rendermesh::{Animated, Collidable, RenderMesh};
use crate::components::speaker::SpeakerSource;
use crate::components::transform::{Transform3D, Velocity3D};
use crate::components::walkroute::WalkRoute;
use crate::events::audio::AudioMessage;
use crate::events::choice::{ChoiceReply, ChoiceRequest};
use crate::events::door::door_command_observer;
use crate::events::subtitle::SubtitleMessage;
use crate::resources::audio::AudioDevice;
use crate::resources::captions::{CaptionLibrary, FsCaptions, MemoryCaptions};
use crate::resources::choices::{ChoiceBridge, setup_choices};
use crate::resources::collidersync::ColliderSync;
use crate::resources::customsounds::CustomSounds;
use crate::resources::experienceconfig::ExperienceConfig;
use crate::resources::framehooks::FrameHooks;
use crate::resources::media::MediaStore;
use crate::resources::narrative::{NarrativeRunner, SequenceLibrary};
use crate::resources::physics::Physics;
use crate::resources::subtitles::SubtitleDisplay;
use crate::resources::tasks::ActiveTasks;
use crate::resources::triggerregistry::TriggerRegistry;
use crate::resources::worldsignals::WorldSignals;
use crate::resources::worldtime::WorldTime;
use crate::systems::audio::{pump_audio_system, update_audio_messages};
use crate::systems::choices::{poll_choice_replies, update_choice_replies, update_choice_requests};
use crate::systems::collidersync::animated_collider_system;
use crate::systems::door::{door_system, spawn_door_pair};
use crate::systems::framehooks::{jitter_hook, run_frame_hooks};
use crate::systems::movement::movement_system;
use crate::systems::narrative::{narrative_system, start_sequence};
use crate::systems::subtitles::{subtitle_system, update_subtitle_messages};
use crate::systems::time::update_world_time;
use crate::systems::triggers::trigger_volume_system;
use crate::systems::tween::tween_position_system;
use crate::systems::walkroute::walk_route_system;

const DEMO_MEDIA: &str = include_str!("../assets/media.json");
const DEMO_NARRATIVE: &str = include_str!("../assets/narrative.json");
const DEMO_CAPTIONS: [(&str, &str); 3] = [
    (
        "aquarium_intro.vtt",
        include_str!("../assets/captions/aquarium_intro.vtt"),
    ),
    (
        "aquarium_stay.vtt",
        include_str!("../assets/captions/aquarium_stay.vtt"),
    ),
    (
        "tunnel_voice.vtt",
        include_str!("../assets/captions/tunnel_voice.vtt"),
    ),
];

/// Insert resources, message queues and observers.
///
/// The media registry and sequence library start empty unless already
/// present; hosts insert their own afterwards.
pub fn install_engine(
    world: &mut World,
    config: ExperienceConfig,
    physics: Physics,
    audio: AudioDevice,
    captions: CaptionLibrary,
) {
    world.insert_resource(WorldTime::default());
    world.insert_resource(ColliderSync::new(config.rebuild_interval));
    world.insert_resource(config);
    world.insert_resource(physics);
    world.insert_resource(audio);
    world.insert_resource(captions);
    world.insert_resource(CustomSounds::new());
    world.insert_resource(SubtitleDisplay::default());
    world.init_resource::<MediaStore>();
    world.init_resource::<SequenceLibrary>();
    world.insert_resource(NarrativeRunner::new());
    world.insert_resource(ActiveTasks::new());
    world.insert_resource(WorldSignals::default());
    world.insert_resource(TriggerRegistry::new());
    world.insert_resource(FrameHooks::new());
    world.insert_resource(Messages::<AudioMessage>::default());
    world.insert_resource(Messages::<SubtitleMessage>::default());
    setup_choices(world);

    world.spawn(Observer::new(door_command_observer));
    world.flush();
}

pub fn build_update_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(
        (
            update_audio_messages,
            update_subtitle_messages,
            update_choice_requests,
            update_choice_replies,
            poll_choice_replies,
            run_frame_hooks,
            trigger_volume_system,
            animated_collider_system,
            walk_route_system,
            movement_system,
            tween_position_system,
            door_system,
            pump_audio_system,
            subtitle_system,
            narrative_system,
        )
            .chain(),
    );
    update
}

/// Advance time by `dt` and run one frame.
pub fn run_frame(world: &mut World, schedule: &mut Schedule, dt: f32) {
    update_world_time(world, dt);
    schedule.run(world);
}

/// Media registry from the configured file, or the bundled demo registry.
pub fn load_media(config: &ExperienceConfig) -> MediaStore {
    MediaStore::load_from_file(&config.media_path).unwrap_or_else(|e| {
        warn!("{}; using bundled media registry", e);
        MediaStore::from_json(DEMO_MEDIA).unwrap_or_default()
    })
}

/// Sequence library from the configured file, or the bundled demo script.
pub fn load_narrative(config: &ExperienceConfig) -> SequenceLibrary {
    SequenceLibrary::load_from_file(&config.narrative_path).unwrap_or_else(|e| {
        warn!("{}; using bundled narrative", e);
        SequenceLibrary::from_json(DEMO_NARRATIVE).unwrap_or_default()
    })
}

/// Caption files below the configured directory, or the bundled captions.
pub fn caption_library(config: &ExperienceConfig) -> CaptionLibrary {
    if config.captions_dir.is_dir() {
        return CaptionLibrary::new(FsCaptions::new(&config.captions_dir));
    }
    warn!(
        "captions directory {:?} missing; using bundled captions",
        config.captions_dir
    );
    let captions = DEMO_CAPTIONS
        .iter()
        .fold(MemoryCaptions::new(), |captions, (path, text)| {
            captions.with(*path, *text)
        });
    CaptionLibrary::new(captions)
}

/// Flat strip of quads along X, `segments` wide, one unit tall.
fn kelp_mesh(segments: u32) -> RenderMesh {
    let mut positions = Vec::new();
    for i in 0..=segments {
        let x = i as f32 * 0.5;
        positions.push(Vec3::new(x, 0.0, 0.0));
        positions.push(Vec3::new(x, 3.0, 0.0));
    }
    let mut indices = Vec::new();
    for i in 0..segments {
        let a = i * 2;
        indices.extend_from_slice(&[a, a + 1, a + 2, a + 1, a + 3, a + 2]);
    }
    RenderMesh::new(positions, indices)
}

/// Sway the top vertices of every animated mesh.
fn kelp_sway_hook(world: &mut World, _dt: f32) {
    let elapsed = world.resource::<WorldTime>().elapsed;
    let mut query = world.query_filtered::<&mut RenderMesh, With<Animated>>();
    for mut mesh in query.iter_mut(world) {
        for (i, position) in mesh.positions.iter_mut().enumerate() {
            if position.y > 0.0 {
                position.z = (elapsed * 1.5 + i as f32 * 0.3).sin() * 0.4;
            }
        }
    }
}

/// Spawn the walk-through: visitor, speakers, doors, kelp, props, triggers
/// and frame hooks.
pub fn setup_demo(world: &mut World) {
    let config = world.resource::<ExperienceConfig>().clone();

    world.spawn((
        Player,
        Transform3D::from_xyz(0.0, 1.0, 10.0),
        Velocity3D::default(),
        WalkRoute::new(
            vec![
                Vec3::new(-12.0, 1.0, 2.0),
                Vec3::new(-40.0, 1.0, -5.0),
                Vec3::new(-40.0, 1.0, -20.0),
                Vec3::new(-52.0, 1.0, -32.0),
                Vec3::new(-52.0, 1.0, -45.0),
            ],
            4.0,
        ),
    ));

    for (name, position) in [
        ("tank_left", Vec3::new(-50.0, 2.5, -8.0)),
        ("tank_right", Vec3::new(-30.0, 2.5, -8.0)),
        ("tunnel", Vec3::new(-52.0, 2.5, -40.0)),
    ] {
        world.spawn((SpeakerSource::new(name), Transform3D::from_translation(position)));
    }

    spawn_door_pair(
        world,
        "lobby",
        Transform3D::from_xyz(-12.0, 0.0, 0.0),
        2.0,
        3.0,
        &config,
    );
    let tunnel_gate = spawn_door_pair(
        world,
        "tunnel_gate",
        Transform3D::from_xyz(-52.0, 0.0, -32.0).with_yaw_degrees(90.0),
        2.5,
        3.0,
        &config,
    );
    if let Some(mut gate) = world.get_mut::<DoorPair>(tunnel_gate) {
        gate.can_open = false;
    }

    world.spawn((
        kelp_mesh(6),
        Transform3D::from_xyz(-45.0, 0.0, -12.0),
        Collidable,
        Animated,
    ));
    world.spawn((
        RenderMesh::new(
            vec![
                Vec3::new(-1.0, 0.0, -1.0),
                Vec3::new(1.0, 0.0, -1.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
            vec![0, 1, 2],
        ),
        Transform3D::from_xyz(-40.0, 0.0, -5.0),
        Collidable,
    ));

    for base in [Vec3::new(-36.0, 1.2, -9.0), Vec3::new(-44.0, 0.8, -2.0)] {
        world.spawn((Jitter::new(base, 0.05), Transform3D::from_translation(base)));
    }

    {
        let mut triggers = world.resource_mut::<TriggerRegistry>();
        triggers.register_trigger(
            "aquarium",
            Vec3::new(-40.0, 1.0, -5.0),
            40.0,
            7.0,
            20.0,
            |world| {
                start_sequence(world, "aquarium");
            },
        );
        triggers.register_trigger(
            "tunnel",
            Vec3::new(-52.0, 1.0, -42.0),
            8.0,
            7.0,
            8.0,
            |world| {
                start_sequence(world, "tunnel");
            },
        );
    }

    {
        let mut hooks = world.resource_mut::<FrameHooks>();
        hooks.add("kelp_sway", kelp_sway_hook);
        hooks.add("jitter", jitter_hook);
    }
    info!("demo scene ready");
}

/// Headless stand-in for the choice UI: always answers with the first
/// option.
pub fn demo_choice_responder(
    mut requests: MessageReader<ChoiceRequest>,
    bridge: Res<ChoiceBridge>,
) {
    for request in requests.read() {
        info!(
            "choice {}: '{}' / '{}' -> '{}'",
            request.id, request.first, request.second, request.first
        );
        if let Err(e) = bridge.tx_reply.send(ChoiceReply {
            request: request.id,
            index: 0,
        }) {
            warn!("choice {}: reply not delivered: {}", request.id, e);
        }
    }
}
