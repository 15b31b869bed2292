//! Experience configuration resource.
//!
//! Tunables for doors, collider rebuilds, spatial audio and asset paths,
//! loaded from an INI file. Defaults are safe for startup when the file is
//! missing or incomplete.
//!
//! # Configuration File Format
//!
//! ```ini
//! [doors]
//! proximity = 4.0
//! slide = 1.0
//! duration = 1.2
//!
//! [colliders]
//! rebuild_interval = 1
//!
//! [audio]
//! ref_distance = 2.0
//! max_distance = 30.0
//! rolloff = 1.0
//! fade_seconds = 1.0
//!
//! [paths]
//! media = ./assets/media.json
//! narrative = ./assets/narrative.json
//! captions = ./assets/captions
//!
//! [frame]
//! dt = 0.016
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

const DEFAULT_DOOR_PROXIMITY: f32 = 4.0;
const DEFAULT_DOOR_SLIDE: f32 = 1.0;
const DEFAULT_DOOR_DURATION: f32 = 1.2;
const DEFAULT_REBUILD_INTERVAL: u32 = 1;
const DEFAULT_REF_DISTANCE: f32 = 2.0;
const DEFAULT_MAX_DISTANCE: f32 = 30.0;
const DEFAULT_ROLLOFF: f32 = 1.0;
const DEFAULT_FADE_SECONDS: f32 = 1.0;
const DEFAULT_FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_CONFIG_PATH: &str = "./assets/config.ini";
const DEFAULT_MEDIA_PATH: &str = "./assets/media.json";
const DEFAULT_NARRATIVE_PATH: &str = "./assets/narrative.json";
const DEFAULT_CAPTIONS_DIR: &str = "./assets/captions";

/// Experience configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct ExperienceConfig {
    /// Horizontal distance at which doors open for the player.
    pub door_proximity: f32,
    /// How far each leaf slides when opening.
    pub door_slide: f32,
    /// Open/close tween duration in seconds.
    pub door_duration: f32,
    /// Rebuild animated colliders every N ticks.
    pub rebuild_interval: u32,
    /// Distance at which spatial attenuation starts.
    pub ref_distance: f32,
    /// Distance beyond which spatial sound stops attenuating.
    pub max_distance: f32,
    /// Attenuation rolloff factor.
    pub rolloff: f32,
    /// Fade applied when cued audio is cleared.
    pub fade_seconds: f32,
    /// Fixed step used by the headless runner.
    pub frame_dt: f32,
    pub media_path: PathBuf,
    pub narrative_path: PathBuf,
    pub captions_dir: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExperienceConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            door_proximity: DEFAULT_DOOR_PROXIMITY,
            door_slide: DEFAULT_DOOR_SLIDE,
            door_duration: DEFAULT_DOOR_DURATION,
            rebuild_interval: DEFAULT_REBUILD_INTERVAL,
            ref_distance: DEFAULT_REF_DISTANCE,
            max_distance: DEFAULT_MAX_DISTANCE,
            rolloff: DEFAULT_ROLLOFF,
            fade_seconds: DEFAULT_FADE_SECONDS,
            frame_dt: DEFAULT_FRAME_DT,
            media_path: PathBuf::from(DEFAULT_MEDIA_PATH),
            narrative_path: PathBuf::from(DEFAULT_NARRATIVE_PATH),
            captions_dir: PathBuf::from(DEFAULT_CAPTIONS_DIR),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);

        info!(
            "Loaded config: door proximity={} slide={} duration={}s, rebuild every {} tick(s), falloff ref={} max={} rolloff={}",
            self.door_proximity,
            self.door_slide,
            self.door_duration,
            self.rebuild_interval,
            self.ref_distance,
            self.max_distance,
            self.rolloff
        );

        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        let float = |section: &str, key: &str| config.getfloat(section, key).ok().flatten();

        // [doors] section
        if let Some(v) = float("doors", "proximity") {
            self.door_proximity = v as f32;
        }
        if let Some(v) = float("doors", "slide") {
            self.door_slide = v as f32;
        }
        if let Some(v) = float("doors", "duration") {
            self.door_duration = v as f32;
        }

        // [colliders] section
        if let Some(v) = config.getuint("colliders", "rebuild_interval").ok().flatten() {
            self.rebuild_interval = u32::try_from(v).unwrap_or(u32::MAX).max(1);
        }

        // [audio] section
        if let Some(v) = float("audio", "ref_distance") {
            self.ref_distance = v as f32;
        }
        if let Some(v) = float("audio", "max_distance") {
            self.max_distance = v as f32;
        }
        if let Some(v) = float("audio", "rolloff") {
            self.rolloff = v as f32;
        }
        if let Some(v) = float("audio", "fade_seconds") {
            self.fade_seconds = v as f32;
        }

        // [paths] section
        if let Some(p) = config.get("paths", "media") {
            self.media_path = PathBuf::from(p);
        }
        if let Some(p) = config.get("paths", "narrative") {
            self.narrative_path = PathBuf::from(p);
        }
        if let Some(p) = config.get("paths", "captions") {
            self.captions_dir = PathBuf::from(p);
        }

        // [frame] section
        if let Some(v) = float("frame", "dt") {
            if v > 0.0 {
                self.frame_dt = v as f32;
            }
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("doors", "proximity", Some(self.door_proximity.to_string()));
        config.set("doors", "slide", Some(self.door_slide.to_string()));
        config.set("doors", "duration", Some(self.door_duration.to_string()));

        config.set(
            "colliders",
            "rebuild_interval",
            Some(self.rebuild_interval.to_string()),
        );

        config.set("audio", "ref_distance", Some(self.ref_distance.to_string()));
        config.set("audio", "max_distance", Some(self.max_distance.to_string()));
        config.set("audio", "rolloff", Some(self.rolloff.to_string()));
        config.set("audio", "fade_seconds", Some(self.fade_seconds.to_string()));

        config.set(
            "paths",
            "media",
            Some(self.media_path.display().to_string()),
        );
        config.set(
            "paths",
            "narrative",
            Some(self.narrative_path.display().to_string()),
        );
        config.set(
            "paths",
            "captions",
            Some(self.captions_dir.display().to_string()),
        );

        config.set("frame", "dt", Some(self.frame_dt.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
