use crate::audio::AudioConfig;

/// Session configuration sent once per connection via `session.update`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Session {
    /// System instructions prepended to model calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<String>,

    /// The voice the model answers with. Cannot be changed once the model
    /// has responded with audio at least once.
    #[serde(skip_serializing_if = "Option::is_none")]
    voice: Option<String>,

    /// Sampling temperature for the model.
    temperature: f32,

    /// Input/output audio encodings. Fixed at pcm16 on both sides.
    audio: AudioConfig,
}

impl Session {
    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }

    pub fn voice(&self) -> Option<&str> {
        self.voice.as_deref()
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn audio(&self) -> &AudioConfig {
        &self.audio
    }
}

pub struct SessionConfigurator {
    session: Session,
}

impl Default for SessionConfigurator {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionConfigurator {
    pub fn new() -> Self {
        Self {
            session: Session {
                instructions: None,
                voice: None,
                temperature: 0.7,
                audio: AudioConfig::default(),
            },
        }
    }

    pub fn with_instructions(mut self, instructions: &str) -> Self {
        self.session.instructions = Some(instructions.to_string());
        self
    }

    pub fn with_voice(mut self, voice: &str) -> Self {
        self.session.voice = Some(voice.to_string());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.session.temperature = temperature;
        self
    }

    pub fn build(self) -> Session {
        self.session
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_serialize() {
        let session = SessionConfigurator::new()
            .with_instructions("Transcribe the audio accurately.")
            .with_voice("tara")
            .with_temperature(0.7)
            .build();
        let json = serde_json::to_string(&session).unwrap();
        let expected = r#"{"instructions":"Transcribe the audio accurately.","voice":"tara","temperature":0.7,"audio":{"input":{"format":"pcm16"},"output":{"format":"pcm16"}}}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_serialize_omits_unset_fields() {
        let session = SessionConfigurator::new().build();
        let json = serde_json::to_string(&session).unwrap();
        let expected = r#"{"temperature":0.7,"audio":{"input":{"format":"pcm16"},"output":{"format":"pcm16"}}}"#;
        assert_eq!(json, expected);
    }
}
