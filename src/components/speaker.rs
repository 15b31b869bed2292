use bevy_ecs::prelude::Component;

/// Scene object flagged as an audio emitter.
///
/// Its world position is the entity's
/// [`Transform3D`](super::transform::Transform3D) translation at the moment a
/// sound starts; voice lines play one instance per speaker.
#[derive(Component, Clone, Debug, Default)]
pub struct SpeakerSource {
    pub name: String,
}

impl SpeakerSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
