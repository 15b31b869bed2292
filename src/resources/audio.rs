//! Audio engine seam.
//!
//! [`AudioEngine`] is the low-level playback collaborator: positional
//! playback, stop with fade, and playback-position queries. The ECS reaches
//! it through the [`AudioDevice`] resource. [`SimulatedAudio`] is a
//! clock-driven engine without a sound card, used by the headless runner and
//! by tests (it can seek and can be told to reject specific paths).
//!
//! Higher-level bookkeeping of named sounds lives in
//! [`crate::resources::customsounds`].

use bevy_ecs::prelude::Resource;
use glam::Vec3;
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};
use std::ops::{Deref, DerefMut};

/// Identifier of one playing instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

/// Distance attenuation parameters for positional sounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Falloff {
    pub ref_distance: f32,
    pub max_distance: f32,
    pub rolloff: f32,
}

impl Default for Falloff {
    fn default() -> Self {
        Self {
            ref_distance: 1.0,
            max_distance: 10_000.0,
            rolloff: 1.0,
        }
    }
}

/// Fade applied when stopping an instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeOut {
    pub seconds: f32,
    /// Ramp the pitch down while fading.
    pub pitch_down: bool,
}

/// A single playback request.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayRequest {
    pub path: String,
    /// World position; `None` plays non-positional.
    pub position: Option<Vec3>,
    pub falloff: Falloff,
    pub looped: bool,
    pub muted: bool,
    pub volume: f32,
    /// Known length in seconds, if the media registry provides it.
    pub duration: Option<f32>,
}

impl PlayRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            position: None,
            falloff: Falloff::default(),
            looped: false,
            muted: false,
            volume: 1.0,
            duration: None,
        }
    }
}

/// Low-level playback collaborator.
pub trait AudioEngine: Send + Sync {
    /// Start playback. Errors cover decode failures and autoplay refusals.
    fn play(&mut self, request: &PlayRequest) -> Result<InstanceId, String>;
    /// Stop an instance, immediately or with a fade. Unknown ids are ignored.
    fn stop(&mut self, id: InstanceId, fade: Option<FadeOut>);
    /// Current playback position in seconds; `None` once the instance is gone.
    fn position(&self, id: InstanceId) -> Option<f32>;
    fn is_playing(&self, id: InstanceId) -> bool;
    /// Jump to `seconds`. Returns `false` for unknown ids.
    fn seek(&mut self, id: InstanceId, seconds: f32) -> bool;
    /// Advance engine time by `dt` seconds.
    fn advance(&mut self, dt: f32);
}

/// Injected audio engine.
#[derive(Resource)]
pub struct AudioDevice(pub Box<dyn AudioEngine>);

impl AudioDevice {
    pub fn new(engine: impl AudioEngine + 'static) -> Self {
        AudioDevice(Box::new(engine))
    }
}

impl Deref for AudioDevice {
    type Target = dyn AudioEngine;
    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl DerefMut for AudioDevice {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}

#[derive(Debug, Clone)]
struct SimVoice {
    request: PlayRequest,
    position: f32,
    length: f32,
    playing: bool,
    fade_left: Option<f32>,
}

/// Audio engine driven purely by [`AudioEngine::advance`].
#[derive(Debug)]
pub struct SimulatedAudio {
    next_id: u64,
    voices: FxHashMap<u64, SimVoice>,
    rejected: FxHashSet<String>,
    default_length: f32,
}

impl Default for SimulatedAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedAudio {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            voices: FxHashMap::default(),
            rejected: FxHashSet::default(),
            default_length: 1.0,
        }
    }

    /// Length used for requests that do not carry a duration.
    pub fn with_default_length(mut self, seconds: f32) -> Self {
        self.default_length = seconds;
        self
    }

    /// Make every future `play` of `path` fail.
    pub fn reject(mut self, path: impl Into<String>) -> Self {
        self.rejected.insert(path.into());
        self
    }

    pub fn live_instances(&self) -> usize {
        self.voices.len()
    }
}

impl AudioEngine for SimulatedAudio {
    fn play(&mut self, request: &PlayRequest) -> Result<InstanceId, String> {
        if self.rejected.contains(&request.path) {
            return Err(format!("playback refused for '{}'", request.path));
        }
        self.next_id += 1;
        let length = request.duration.unwrap_or(self.default_length).max(0.0);
        self.voices.insert(
            self.next_id,
            SimVoice {
                request: request.clone(),
                position: 0.0,
                length,
                playing: true,
                fade_left: None,
            },
        );
        debug!("[audio] play id={} path='{}'", self.next_id, request.path);
        Ok(InstanceId(self.next_id))
    }

    fn stop(&mut self, id: InstanceId, fade: Option<FadeOut>) {
        match fade {
            Some(fade) if fade.seconds > 0.0 => {
                if let Some(voice) = self.voices.get_mut(&id.0) {
                    voice.fade_left = Some(fade.seconds);
                }
            }
            _ => {
                if self.voices.remove(&id.0).is_some() {
                    debug!("[audio] stop id={}", id.0);
                }
            }
        }
    }

    fn position(&self, id: InstanceId) -> Option<f32> {
        self.voices.get(&id.0).map(|v| v.position)
    }

    fn is_playing(&self, id: InstanceId) -> bool {
        self.voices
            .get(&id.0)
            .map(|v| v.playing)
            .unwrap_or(false)
    }

    fn seek(&mut self, id: InstanceId, seconds: f32) -> bool {
        match self.voices.get_mut(&id.0) {
            Some(voice) => {
                voice.position = seconds.clamp(0.0, voice.length);
                voice.playing = voice.position < voice.length || voice.request.looped;
                true
            }
            None => false,
        }
    }

    fn advance(&mut self, dt: f32) {
        let mut faded: Vec<u64> = Vec::new();
        for (id, voice) in self.voices.iter_mut() {
            if let Some(left) = voice.fade_left.as_mut() {
                *left -= dt;
                if *left <= 0.0 {
                    faded.push(*id);
                    continue;
                }
            }
            if !voice.playing {
                continue;
            }
            voice.position += dt;
            if voice.position >= voice.length {
                if voice.request.looped && voice.length > 0.0 {
                    voice.position %= voice.length;
                } else {
                    voice.position = voice.length;
                    voice.playing = false;
                }
            }
        }
        for id in faded {
            self.voices.remove(&id);
            debug!("[audio] fade finished id={}", id);
        }
    }
}
