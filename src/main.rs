//! Undertow headless runner.
//!
//! Builds the ECS world with the in-memory physics store and the simulated
//! audio engine, spawns the underwater walk-through and steps it at a fixed
//! rate. The visitor follows a scripted route through the aquarium hall and
//! into the tunnel; trigger volumes start narrative sequences, doors open and
//! close around the visitor and subtitles follow the voice lines.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --frames 2400
//! RUST_LOG=debug cargo run -- --config assets/config.ini
//! ```

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

use undertow::components::door::DoorPair;
use undertow::game::{
    build_update_schedule, caption_library, demo_choice_responder, install_engine, load_media,
    load_narrative, run_frame, setup_demo,
};
use undertow::resources::audio::{AudioDevice, SimulatedAudio};
use undertow::resources::experienceconfig::ExperienceConfig;
use undertow::resources::physics::{BodyStore, Physics};
use undertow::resources::subtitles::SubtitleDisplay;
use undertow::resources::triggerregistry::TriggerRegistry;
use undertow::resources::worldsignals::WorldSignals;
use undertow::resources::worldtime::WorldTime;

/// Undertow immersive experience, headless
#[derive(Parser)]
#[command(version, about = "Runs the Undertow walk-through without a window.")]
struct Cli {
    /// Path to the INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./assets/config.ini")]
    config: PathBuf,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 2400)]
    frames: u32,

    /// Fixed frame step in seconds. Overrides `[frame] dt` from the config.
    #[arg(long)]
    dt: Option<f32>,

    /// Write the default configuration to `--config` and exit.
    #[arg(long)]
    write_default_config: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = ExperienceConfig::with_path(&cli.config);
    if cli.write_default_config {
        match config.save_to_file() {
            Ok(()) => info!("default configuration written to {}", cli.config.display()),
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        }
        return;
    }
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }
    if let Some(dt) = cli.dt.filter(|dt| *dt > 0.0) {
        config.frame_dt = dt;
    }
    let dt = config.frame_dt;

    let mut world = World::new();
    let captions = caption_library(&config);
    let media = load_media(&config);
    let narrative = load_narrative(&config);
    info!(
        "{} media entries, {} narrative sequences",
        media.len(),
        narrative.len()
    );
    install_engine(
        &mut world,
        config,
        Physics::new(BodyStore::new()),
        AudioDevice::new(SimulatedAudio::new()),
        captions,
    );
    world.insert_resource(media);
    world.insert_resource(narrative);
    setup_demo(&mut world);

    let mut update = build_update_schedule();
    update.add_systems(demo_choice_responder);

    let mut last_caption: Option<String> = None;
    for _ in 0..cli.frames {
        run_frame(&mut world, &mut update, dt);
        let caption = world
            .resource::<SubtitleDisplay>()
            .text()
            .map(str::to_string);
        if caption != last_caption {
            if let Some(text) = &caption {
                info!("[subtitle] {}", text);
            }
            last_caption = caption;
        }
    }

    summarize(&mut world);
}

fn summarize(world: &mut World) {
    let time = world.resource::<WorldTime>();
    info!(
        "simulated {} frame(s), {:.2}s",
        time.frame_count, time.elapsed
    );
    let triggers = world.resource::<TriggerRegistry>();
    for volume in triggers.volumes() {
        info!("trigger '{}': fired={}", volume.name, volume.triggered);
    }
    let mut doors = world.query::<&DoorPair>();
    for pair in doors.iter(world) {
        info!(
            "door '{}': {:?}, bodies present={}",
            pair.name,
            pair.state,
            pair.bodies_present()
        );
    }
    info!(
        "physics bodies: {}",
        world.resource::<Physics>().body_count()
    );
    let signals = world.resource::<WorldSignals>();
    let mut flags: Vec<&String> = signals.flags.iter().collect();
    flags.sort();
    info!("flags: {:?}", flags);
}
