//! Spatial audio bookkeeping on top of the injected [`AudioEngine`].
//!
//! [`AudioContext`] is the system parameter every audio-facing system uses.
//! It owns the rules for named sounds:
//! - a named sound is played once per [`SpeakerSource`] at the speaker's
//!   world position (one non-positional instance when no speaker exists);
//! - starting a sound under a name already in use stops the old one first,
//!   dropping its cue loop and any caption it was showing;
//! - a sound whose every instance fails to start is reported with
//!   [`AudioMessage::PlayFailed`] and not recorded.
//!
//! [`pump_audio_system`] advances the engine clock, marks sounds whose
//! reference instance ended, and forgets sounds with no work left.
//!
//! [`AudioEngine`]: crate::resources::audio::AudioEngine

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemParam;
use glam::Vec3;
use log::{debug, info, warn};

use crate::components::speaker::SpeakerSource;
use crate::components::transform::Transform3D;
use crate::events::audio::AudioMessage;
use crate::events::subtitle::SubtitleMessage;
use crate::resources::audio::{AudioDevice, FadeOut, Falloff, PlayRequest};
use crate::resources::captions::CaptionLibrary;
use crate::resources::customsounds::{CueLoop, CustomSounds};
use crate::resources::experienceconfig::ExperienceConfig;
use crate::resources::media::{MediaEntry, MediaKind, MediaStore};
use crate::resources::subtitles::SubtitleDisplay;
use crate::resources::worldtime::WorldTime;

/// How a named sound is played.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialOptions {
    /// Place one instance per speaker; otherwise a single non-positional one.
    pub spatial: bool,
    pub falloff: Falloff,
    pub looped: bool,
    pub muted: bool,
    pub volume: f32,
    pub duration: Option<f32>,
    /// Caption resource to sync against the first instance.
    pub captions: Option<String>,
}

impl Default for SpatialOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialOptions {
    pub fn new() -> Self {
        Self {
            spatial: true,
            falloff: Falloff::default(),
            looped: false,
            muted: false,
            volume: 1.0,
            duration: None,
            captions: None,
        }
    }

    pub fn non_spatial(mut self) -> Self {
        self.spatial = false;
        self
    }

    pub fn with_captions(mut self, captions: impl Into<String>) -> Self {
        self.captions = Some(captions.into());
        self
    }

    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn with_falloff(mut self, falloff: Falloff) -> Self {
        self.falloff = falloff;
        self
    }
}

#[derive(SystemParam)]
pub struct AudioContext<'w, 's> {
    pub device: ResMut<'w, AudioDevice>,
    pub sounds: ResMut<'w, CustomSounds>,
    pub media: Res<'w, MediaStore>,
    pub captions: ResMut<'w, CaptionLibrary>,
    pub config: Res<'w, ExperienceConfig>,
    pub time: Res<'w, WorldTime>,
    pub display: ResMut<'w, SubtitleDisplay>,
    pub speakers: Query<'w, 's, (Entity, &'static Transform3D), With<SpeakerSource>>,
    pub audio_messages: MessageWriter<'w, AudioMessage>,
    pub subtitle_messages: MessageWriter<'w, SubtitleMessage>,
}

impl AudioContext<'_, '_> {
    fn speaker_positions(&self) -> Vec<Vec3> {
        let mut speakers: Vec<(Entity, Vec3)> = self
            .speakers
            .iter()
            .map(|(entity, transform)| (entity, transform.translation))
            .collect();
        speakers.sort_by_key(|(entity, _)| *entity);
        speakers.into_iter().map(|(_, position)| position).collect()
    }

    fn falloff(&self) -> Falloff {
        Falloff {
            ref_distance: self.config.ref_distance,
            max_distance: self.config.max_distance,
            rolloff: self.config.rolloff,
        }
    }

    /// Play `path` under `name` on every speaker. Returns the serial of the
    /// recorded sound, or `None` when nothing could be started.
    pub fn play_on_all_speakers(
        &mut self,
        name: &str,
        path: &str,
        options: SpatialOptions,
    ) -> Option<u64> {
        self.stop_sound(name, None);

        let positions: Vec<Option<Vec3>> = if options.spatial {
            self.speaker_positions().into_iter().map(Some).collect()
        } else {
            Vec::new()
        };
        let positions = if positions.is_empty() {
            vec![None]
        } else {
            positions
        };

        let mut request = PlayRequest {
            path: path.to_string(),
            position: None,
            falloff: options.falloff,
            looped: options.looped,
            muted: options.muted,
            volume: options.volume,
            duration: options.duration,
        };
        let mut instances = Vec::with_capacity(positions.len());
        let mut last_error = None;
        for position in positions {
            request.position = position;
            match self.device.play(&request) {
                Ok(id) => instances.push(id),
                Err(e) => {
                    warn!("'{}': playback failed: {}", name, e);
                    last_error = Some(e);
                }
            }
        }
        if instances.is_empty() {
            self.audio_messages.write(AudioMessage::PlayFailed {
                name: name.to_string(),
                error: last_error.unwrap_or_default(),
            });
            return None;
        }

        let now = self.time.elapsed;
        let cues = options
            .captions
            .as_deref()
            .and_then(|captions| match self.captions.cues(captions) {
                Ok(cues) => Some(CueLoop::new(cues, now)),
                Err(e) => {
                    warn!("'{}': captions unavailable: {}", name, e);
                    None
                }
            });
        info!("'{}' playing on {} instance(s)", name, instances.len());
        let serial = self.sounds.insert(name, instances, cues);
        self.audio_messages.write(AudioMessage::Started {
            name: name.to_string(),
        });
        Some(serial)
    }

    /// Registered audio entry for `id`. Missing and non-audio entries are
    /// logged and skipped.
    fn audio_entry(&self, id: &str, role: &str) -> Option<MediaEntry> {
        match self.media.get(id) {
            Some(entry) if entry.kind == MediaKind::Audio => Some(entry.clone()),
            Some(entry) => {
                warn!("{} '{}' is {:?} media, not audio", role, id, entry.kind);
                None
            }
            None => {
                warn!("{} '{}' not in media registry", role, id);
                None
            }
        }
    }

    /// Play the registered media `id` as a voice line on all speakers.
    pub fn play_voice_line(&mut self, id: &str) -> Option<u64> {
        let entry = self.audio_entry(id, "voice line")?;
        let mut options = SpatialOptions::new().with_falloff(self.falloff());
        options.looped = entry.looped;
        options.muted = entry.muted;
        options.duration = entry.duration_seconds();
        options.captions = entry.captions.clone();
        self.play_on_all_speakers(id, &entry.path, options)
    }

    /// Play the registered media `id` as non-positional music.
    pub fn play_music(&mut self, id: &str) -> Option<u64> {
        let entry = self.audio_entry(id, "music")?;
        let mut options = SpatialOptions::new().non_spatial();
        options.looped = entry.looped;
        options.muted = entry.muted;
        options.duration = entry.duration_seconds();
        options.captions = entry.captions.clone();
        self.play_on_all_speakers(id, &entry.path, options)
    }

    /// Stop every instance of `name`, drop its cue loop and hide its caption.
    pub fn stop_sound(&mut self, name: &str, fade: Option<FadeOut>) -> bool {
        let Some(sound) = self.sounds.remove(name) else {
            return false;
        };
        for instance in &sound.instances {
            self.device.stop(*instance, fade);
        }
        if self.display.hide(name) {
            self.subtitle_messages.write(SubtitleMessage::Hide {
                sound: name.to_string(),
            });
        }
        if !sound.finished {
            self.audio_messages.write(AudioMessage::Stopped {
                name: name.to_string(),
            });
        }
        debug!("'{}' stopped (fade={:?})", name, fade);
        true
    }

    /// Stop every named sound, optionally fading with the configured time.
    pub fn stop_all_custom_sounds(&mut self, fade: bool, pitch_down: bool) {
        let fade = fade.then_some(FadeOut {
            seconds: self.config.fade_seconds,
            pitch_down,
        });
        for name in self.sounds.names() {
            self.stop_sound(&name, fade);
        }
    }
}

/// Advance the engine and retire sounds that are done.
pub fn pump_audio_system(mut audio: AudioContext) {
    let dt = audio.time.delta;
    audio.device.advance(dt);

    let mut finished = Vec::new();
    for sound in audio.sounds.iter_mut() {
        if sound.finished {
            continue;
        }
        let playing = sound
            .primary()
            .map(|id| audio.device.is_playing(id))
            .unwrap_or(false);
        if !playing {
            sound.finished = true;
            finished.push(sound.name.clone());
        }
    }
    for name in finished {
        debug!("'{}' finished", name);
        audio
            .audio_messages
            .write(AudioMessage::Finished { name });
    }

    let spent: Vec<String> = audio
        .sounds
        .iter_mut()
        .filter(|s| s.is_spent())
        .map(|s| s.name.clone())
        .collect();
    for name in spent {
        if let Some(sound) = audio.sounds.remove(&name) {
            for instance in sound.instances {
                audio.device.stop(instance, None);
            }
        }
    }
}

/// Advance the ECS message queue for [`AudioMessage`].
pub fn update_audio_messages(mut msgs: ResMut<Messages<AudioMessage>>) {
    msgs.update();
}
