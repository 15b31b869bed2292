//! Named media registry.
//!
//! Narrative steps refer to audio and video by id; [`MediaStore`] resolves
//! those ids to paths and playback flags. The registry is loaded from JSON:
//!
//! ```json
//! {
//!   "aquarium_intro": {
//!     "type": "audio",
//!     "path": "audio/aquarium_intro.ogg",
//!     "loop": false,
//!     "muted": false,
//!     "duration_ms": 6500,
//!     "captions": "aquarium_intro.vtt"
//!   }
//! }
//! ```

use bevy_ecs::prelude::Resource;
use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

/// One registry entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaEntry {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub path: String,
    #[serde(default, rename = "loop")]
    pub looped: bool,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    /// Caption resource, relative to the configured captions directory.
    #[serde(default)]
    pub captions: Option<String>,
}

impl MediaEntry {
    pub fn audio(path: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Audio,
            path: path.into(),
            looped: false,
            muted: false,
            duration_ms: None,
            captions: None,
        }
    }

    pub fn with_duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    pub fn with_captions(mut self, captions: impl Into<String>) -> Self {
        self.captions = Some(captions.into());
        self
    }

    pub fn looped(mut self) -> Self {
        self.looped = true;
        self
    }

    pub fn duration_seconds(&self) -> Option<f32> {
        self.duration_ms.map(|ms| ms as f32 / 1000.0)
    }
}

/// Media entries keyed by id.
#[derive(Resource, Debug, Clone, Default)]
pub struct MediaStore {
    entries: FxHashMap<String, MediaEntry>,
}

impl MediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        let entries: FxHashMap<String, MediaEntry> =
            serde_json::from_str(json).map_err(|e| format!("Failed to parse media registry: {}", e))?;
        Ok(Self { entries })
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read media registry {:?}: {}", path, e))?;
        let store = Self::from_json(&json)?;
        info!("Loaded {} media entries from {:?}", store.len(), path);
        Ok(store)
    }

    pub fn insert(&mut self, id: impl Into<String>, entry: MediaEntry) {
        self.entries.insert(id.into(), entry);
    }

    pub fn get(&self, id: &str) -> Option<&MediaEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entries_with_defaults() {
        let store = MediaStore::from_json(
            r#"{
                "intro": { "type": "audio", "path": "intro.ogg", "duration_ms": 2500, "captions": "intro.vtt" },
                "loop_bg": { "type": "audio", "path": "bg.ogg", "loop": true },
                "tank": { "type": "video", "path": "tank.mp4", "muted": true }
            }"#,
        )
        .unwrap();
        let intro = store.get("intro").unwrap();
        assert_eq!(intro.kind, MediaKind::Audio);
        assert!(!intro.looped);
        assert_eq!(intro.duration_seconds(), Some(2.5));
        assert_eq!(intro.captions.as_deref(), Some("intro.vtt"));
        assert!(store.get("loop_bg").unwrap().looped);
        assert_eq!(store.get("tank").unwrap().kind, MediaKind::Video);
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(MediaStore::from_json("{ not json").is_err());
    }
}
