//! Subtitle synchronization.
//!
//! Every frame, polls the cue loop of each named sound against the playing
//! position of its first instance and applies the resulting changes to
//! [`SubtitleDisplay`](crate::resources::subtitles::SubtitleDisplay). A
//! finished sound is treated as gone, so its loop ends on the next poll.
use bevy_ecs::prelude::*;
use log::debug;

use crate::events::subtitle::SubtitleMessage;
use crate::resources::customsounds::CueChange;
use crate::systems::audio::AudioContext;

pub fn subtitle_system(mut audio: AudioContext) {
    let now = audio.time.elapsed;
    let mut changes: Vec<(String, CueChange)> = Vec::new();
    for sound in audio.sounds.iter_mut() {
        let position = if sound.finished {
            None
        } else {
            sound.primary().and_then(|id| audio.device.position(id))
        };
        let Some(cues) = sound.cues.as_mut() else {
            continue;
        };
        if cues.is_done() {
            continue;
        }
        for change in cues.poll(now, position) {
            changes.push((sound.name.clone(), change));
        }
    }

    for (sound, change) in changes {
        match change {
            CueChange::Show(text) => {
                debug!("subtitle '{}': {}", sound, text);
                audio.display.show(sound.as_str(), text.as_str());
                audio
                    .subtitle_messages
                    .write(SubtitleMessage::Show { sound, text });
            }
            CueChange::Hide => {
                if audio.display.hide(&sound) {
                    audio
                        .subtitle_messages
                        .write(SubtitleMessage::Hide { sound });
                }
            }
        }
    }
}

/// Advance the ECS message queue for [`SubtitleMessage`].
pub fn update_subtitle_messages(mut msgs: ResMut<Messages<SubtitleMessage>>) {
    msgs.update();
}
