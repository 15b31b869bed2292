//! Spatial playback and subtitle cue synchronization.

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemState;
use glam::Vec3;

use undertow::components::speaker::SpeakerSource;
use undertow::components::transform::Transform3D;
use undertow::events::audio::AudioMessage;
use undertow::events::subtitle::SubtitleMessage;
use undertow::game::{build_update_schedule, install_engine, run_frame};
use undertow::resources::audio::{AudioDevice, SimulatedAudio};
use undertow::resources::captions::{CaptionLibrary, MemoryCaptions};
use undertow::resources::customsounds::CustomSounds;
use undertow::resources::experienceconfig::ExperienceConfig;
use undertow::resources::media::{MediaEntry, MediaKind, MediaStore};
use undertow::resources::physics::{BodyStore, Physics};
use undertow::resources::subtitles::SubtitleDisplay;
use undertow::systems::audio::{AudioContext, SpatialOptions};

const DT: f32 = 0.1;

const LECTURE_VTT: &str = "WEBVTT

00:00:00.000 --> 00:00:02.000
A

00:00:02.000 --> 00:00:04.000
B
";

const ONE_VTT: &str = "WEBVTT

00:00.000 --> 00:01.000
first
";

const TWO_VTT: &str = "WEBVTT

00:00.000 --> 00:03.000
second
";

#[derive(Resource, Default)]
struct Recorded {
    shown: Vec<String>,
    audio: Vec<AudioMessage>,
}

fn record_messages(
    mut subtitles: MessageReader<SubtitleMessage>,
    mut audio: MessageReader<AudioMessage>,
    mut recorded: ResMut<Recorded>,
) {
    for message in subtitles.read() {
        if let SubtitleMessage::Show { text, .. } = message {
            recorded.shown.push(text.clone());
        }
    }
    recorded.audio.extend(audio.read().cloned());
}

fn make_world(audio: SimulatedAudio) -> (World, Schedule) {
    let captions = MemoryCaptions::new()
        .with("lecture.vtt", LECTURE_VTT)
        .with("one.vtt", ONE_VTT)
        .with("two.vtt", TWO_VTT);
    let mut world = World::new();
    install_engine(
        &mut world,
        ExperienceConfig::new(),
        Physics::new(BodyStore::new()),
        AudioDevice::new(audio),
        CaptionLibrary::new(captions),
    );
    let mut media = MediaStore::new();
    media.insert(
        "lecture",
        MediaEntry::audio("audio/lecture.ogg")
            .with_duration_ms(6000)
            .with_captions("lecture.vtt"),
    );
    media.insert(
        "one",
        MediaEntry::audio("audio/one.ogg")
            .with_duration_ms(5000)
            .with_captions("one.vtt"),
    );
    media.insert(
        "two",
        MediaEntry::audio("audio/two.ogg")
            .with_duration_ms(5000)
            .with_captions("two.vtt"),
    );
    media.insert("chime", MediaEntry::audio("audio/chime.ogg").with_duration_ms(1000));
    media.insert(
        "broken",
        MediaEntry::audio("audio/broken.ogg").with_captions("missing.vtt"),
    );
    media.insert(
        "tank_feed",
        MediaEntry {
            kind: MediaKind::Video,
            ..MediaEntry::audio("video/tank_feed.mp4").with_duration_ms(4000)
        },
    );
    world.insert_resource(media);
    world.init_resource::<Recorded>();

    let mut schedule = build_update_schedule();
    schedule.add_systems(record_messages.after(undertow::systems::narrative::narrative_system));
    (world, schedule)
}

fn with_audio<R>(world: &mut World, f: impl FnOnce(&mut AudioContext) -> R) -> R {
    let mut state: SystemState<AudioContext> = SystemState::new(world);
    let result = {
        let mut audio = state.get_mut(world);
        f(&mut audio)
    };
    state.apply(world);
    result
}

fn run_for(world: &mut World, schedule: &mut Schedule, seconds: f32) {
    let frames = (seconds / DT).round() as usize;
    for _ in 0..frames {
        run_frame(world, schedule, DT);
    }
}

fn subtitle(world: &World) -> Option<String> {
    world
        .resource::<SubtitleDisplay>()
        .text()
        .map(str::to_string)
}

#[test]
fn seek_past_a_cue_skips_it() {
    let (mut world, mut schedule) = make_world(SimulatedAudio::new());
    assert!(with_audio(&mut world, |audio| audio.play_voice_line("lecture")).is_some());

    let primary = world
        .resource::<CustomSounds>()
        .get("lecture")
        .and_then(|s| s.primary())
        .unwrap();
    assert!(world.resource_mut::<AudioDevice>().seek(primary, 3.0));

    run_frame(&mut world, &mut schedule, DT);
    assert_eq!(subtitle(&world).as_deref(), Some("B"));
    assert_eq!(world.resource::<Recorded>().shown, vec!["B".to_string()]);
}

#[test]
fn seek_while_a_cue_is_visible_switches_on_the_next_frame() {
    let (mut world, mut schedule) = make_world(SimulatedAudio::new());
    with_audio(&mut world, |audio| audio.play_voice_line("lecture"));
    run_frame(&mut world, &mut schedule, DT);
    assert_eq!(subtitle(&world).as_deref(), Some("A"));

    let primary = world
        .resource::<CustomSounds>()
        .get("lecture")
        .and_then(|s| s.primary())
        .unwrap();
    assert!(world.resource_mut::<AudioDevice>().seek(primary, 3.0));

    run_frame(&mut world, &mut schedule, DT);
    assert_eq!(subtitle(&world).as_deref(), Some("B"));
    assert_eq!(
        world.resource::<Recorded>().shown,
        vec!["A".to_string(), "B".to_string()]
    );

    // Back to the start: "A" again without waiting out "B".
    assert!(world.resource_mut::<AudioDevice>().seek(primary, 0.5));
    run_frame(&mut world, &mut schedule, DT);
    assert_eq!(subtitle(&world).as_deref(), Some("A"));
}

#[test]
fn cues_follow_playback() {
    let (mut world, mut schedule) = make_world(SimulatedAudio::new());
    with_audio(&mut world, |audio| audio.play_voice_line("lecture"));

    run_for(&mut world, &mut schedule, 0.5);
    assert_eq!(subtitle(&world).as_deref(), Some("A"));
    run_for(&mut world, &mut schedule, 2.0);
    assert_eq!(subtitle(&world).as_deref(), Some("B"));
    run_for(&mut world, &mut schedule, 2.0);
    assert_eq!(subtitle(&world), None);
    assert_eq!(
        world.resource::<Recorded>().shown,
        vec!["A".to_string(), "B".to_string()]
    );
    let sounds = world.resource::<CustomSounds>();
    assert!(sounds.get("lecture").unwrap().cues.as_ref().unwrap().is_done());
}

#[test]
fn only_the_owner_hides_the_subtitle() {
    let (mut world, mut schedule) = make_world(SimulatedAudio::new());
    with_audio(&mut world, |audio| audio.play_voice_line("one"));
    run_frame(&mut world, &mut schedule, DT);
    assert_eq!(subtitle(&world).as_deref(), Some("first"));

    with_audio(&mut world, |audio| audio.play_voice_line("two"));
    run_frame(&mut world, &mut schedule, DT);
    assert_eq!(subtitle(&world).as_deref(), Some("second"));
    assert_eq!(world.resource::<SubtitleDisplay>().owner(), Some("two"));

    // "one" ends its cue here but no longer owns the box.
    run_for(&mut world, &mut schedule, 1.5);
    assert_eq!(subtitle(&world).as_deref(), Some("second"));

    run_for(&mut world, &mut schedule, 2.0);
    assert_eq!(subtitle(&world), None);
}

#[test]
fn stopping_a_sound_clears_its_subtitle_for_good() {
    let (mut world, mut schedule) = make_world(SimulatedAudio::new());
    with_audio(&mut world, |audio| audio.play_voice_line("lecture"));
    run_frame(&mut world, &mut schedule, DT);
    assert_eq!(subtitle(&world).as_deref(), Some("A"));

    assert!(with_audio(&mut world, |audio| audio.stop_sound("lecture", None)));
    assert_eq!(subtitle(&world), None);
    assert!(world.resource::<CustomSounds>().get("lecture").is_none());

    run_for(&mut world, &mut schedule, 5.0);
    assert_eq!(subtitle(&world), None);
    let recorded = world.resource::<Recorded>();
    assert_eq!(recorded.shown, vec!["A".to_string()]);
    assert!(recorded.audio.contains(&AudioMessage::Stopped {
        name: "lecture".into()
    }));
}

#[test]
fn replaying_a_name_restarts_its_cues() {
    let (mut world, mut schedule) = make_world(SimulatedAudio::new());
    let first = with_audio(&mut world, |audio| audio.play_voice_line("lecture")).unwrap();
    run_for(&mut world, &mut schedule, 2.5);
    assert_eq!(subtitle(&world).as_deref(), Some("B"));

    let second = with_audio(&mut world, |audio| audio.play_voice_line("lecture")).unwrap();
    assert_ne!(first, second);
    assert_eq!(subtitle(&world), None);
    assert_eq!(world.resource::<CustomSounds>().len(), 1);

    run_frame(&mut world, &mut schedule, DT);
    assert_eq!(subtitle(&world).as_deref(), Some("A"));
}

#[test]
fn one_instance_per_speaker() {
    let (mut world, _) = make_world(SimulatedAudio::new());
    for x in [-5.0, 0.0, 5.0] {
        world.spawn((
            SpeakerSource::new("wall"),
            Transform3D::from_translation(Vec3::new(x, 2.0, 0.0)),
        ));
    }
    with_audio(&mut world, |audio| audio.play_voice_line("chime"));
    with_audio(&mut world, |audio| audio.play_music("lecture"));

    let sounds = world.resource::<CustomSounds>();
    let chime = sounds.get("chime").unwrap();
    assert_eq!(chime.instances.len(), 3);
    let music = sounds.get("lecture").unwrap();
    assert_eq!(music.instances.len(), 1);
}

#[test]
fn no_speakers_falls_back_to_a_single_instance() {
    let (mut world, _) = make_world(SimulatedAudio::new());
    let serial = with_audio(&mut world, |audio| {
        audio.play_on_all_speakers(
            "custom",
            "audio/custom.ogg",
            SpatialOptions::new().with_duration(2.0),
        )
    });
    assert!(serial.is_some());
    assert_eq!(
        world.resource::<CustomSounds>().get("custom").unwrap().instances.len(),
        1
    );
}

#[test]
fn failed_playback_is_reported_and_not_recorded() {
    let (mut world, mut schedule) =
        make_world(SimulatedAudio::new().reject("audio/chime.ogg"));
    assert!(with_audio(&mut world, |audio| audio.play_voice_line("chime")).is_none());
    assert!(world.resource::<CustomSounds>().is_empty());
    run_frame(&mut world, &mut schedule, DT);
    assert!(world
        .resource::<Recorded>()
        .audio
        .iter()
        .any(|m| matches!(m, AudioMessage::PlayFailed { name, .. } if name == "chime")));
}

#[test]
fn video_entries_are_not_played_as_audio() {
    let (mut world, mut schedule) = make_world(SimulatedAudio::new());
    assert!(with_audio(&mut world, |audio| audio.play_voice_line("tank_feed")).is_none());
    assert!(with_audio(&mut world, |audio| audio.play_music("tank_feed")).is_none());
    assert!(world.resource::<CustomSounds>().is_empty());
    run_frame(&mut world, &mut schedule, DT);
    assert!(world.resource::<Recorded>().audio.is_empty());
}

#[test]
fn missing_captions_do_not_block_playback() {
    let (mut world, _) = make_world(SimulatedAudio::new());
    assert!(with_audio(&mut world, |audio| audio.play_voice_line("broken")).is_some());
    let sound = world.resource::<CustomSounds>().get("broken").unwrap();
    assert!(sound.cues.is_none());
}

#[test]
fn finished_sounds_are_retired() {
    let (mut world, mut schedule) = make_world(SimulatedAudio::new());
    with_audio(&mut world, |audio| audio.play_voice_line("chime"));
    run_for(&mut world, &mut schedule, 1.5);
    assert!(world.resource::<CustomSounds>().is_empty());
    let recorded = world.resource::<Recorded>();
    assert!(recorded.audio.contains(&AudioMessage::Started {
        name: "chime".into()
    }));
    assert!(recorded.audio.contains(&AudioMessage::Finished {
        name: "chime".into()
    }));
    assert!(!recorded.audio.contains(&AudioMessage::Stopped {
        name: "chime".into()
    }));
}
