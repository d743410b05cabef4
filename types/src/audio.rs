mod consts;

pub use consts::*;

/// Audio data encoded as base64
pub type Base64EncodedAudioBytes = String;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AudioFormat {
    #[serde(rename = "pcm16")]
    Pcm16,
}

/// One direction of the session's audio configuration, e.g. `{"format":"pcm16"}`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioStreamConfig {
    format: AudioFormat,
}

impl AudioStreamConfig {
    pub fn pcm16() -> Self {
        Self {
            format: AudioFormat::Pcm16,
        }
    }

    pub fn format(&self) -> &AudioFormat {
        &self.format
    }
}

/// The `audio` block of a session configuration. The realtime endpoint only
/// speaks 16-bit linear PCM, so both directions default to pcm16.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioConfig {
    input: AudioStreamConfig,
    output: AudioStreamConfig,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            input: AudioStreamConfig::pcm16(),
            output: AudioStreamConfig::pcm16(),
        }
    }
}

impl AudioConfig {
    pub fn input(&self) -> &AudioStreamConfig {
        &self.input
    }

    pub fn output(&self) -> &AudioStreamConfig {
        &self.output
    }
}
