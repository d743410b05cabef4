use crate::audio::Base64EncodedAudioBytes;
use crate::session::Session;

/// `session.update` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SessionUpdateEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    event_id: Option<String>,

    /// The session configuration to apply
    session: Session,
}

impl SessionUpdateEvent {
    pub fn new(session: Session) -> Self {
        Self {
            event_id: None,
            session,
        }
    }

    pub fn with_event_id(mut self, event_id: &str) -> Self {
        self.event_id = Some(event_id.to_string());
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

/// `input_audio_buffer.append` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct InputAudioBufferAppendEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    event_id: Option<String>,

    /// The audio data to append to the buffer
    audio: Base64EncodedAudioBytes,
}

impl InputAudioBufferAppendEvent {
    pub fn new(audio: Base64EncodedAudioBytes) -> Self {
        Self {
            event_id: None,
            audio,
        }
    }

    pub fn with_event_id(mut self, event_id: &str) -> Self {
        self.event_id = Some(event_id.to_string());
        self
    }

    pub fn audio(&self) -> &Base64EncodedAudioBytes {
        &self.audio
    }
}

/// `input_audio_buffer.commit` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct InputAudioBufferCommitEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    event_id: Option<String>,
}

impl Default for InputAudioBufferCommitEvent {
    fn default() -> Self {
        Self::new()
    }
}

impl InputAudioBufferCommitEvent {
    pub fn new() -> Self {
        Self { event_id: None }
    }

    pub fn with_event_id(mut self, event_id: &str) -> Self {
        self.event_id = Some(event_id.to_string());
        self
    }
}

/// `response.create` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ResponseCreateEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    event_id: Option<String>,
}

impl Default for ResponseCreateEvent {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCreateEvent {
    pub fn new() -> Self {
        Self { event_id: None }
    }

    pub fn with_event_id(mut self, event_id: &str) -> Self {
        self.event_id = Some(event_id.to_string());
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::events::ClientEvent;
    use crate::session::SessionConfigurator;

    #[test]
    fn test_append_wire_shape() {
        let event = ClientEvent::InputAudioBufferAppend(InputAudioBufferAppendEvent::new(
            "AAAA".to_string(),
        ));
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"input_audio_buffer.append","audio":"AAAA"}"#);
    }

    #[test]
    fn test_commit_and_response_create_have_no_payload() {
        let commit = ClientEvent::InputAudioBufferCommit(InputAudioBufferCommitEvent::new());
        assert_eq!(
            serde_json::to_string(&commit).unwrap(),
            r#"{"type":"input_audio_buffer.commit"}"#
        );
        let create = ClientEvent::ResponseCreate(ResponseCreateEvent::new());
        assert_eq!(
            serde_json::to_string(&create).unwrap(),
            r#"{"type":"response.create"}"#
        );
    }

    #[test]
    fn test_session_update_embeds_configuration() {
        let session = SessionConfigurator::new().with_voice("tara").build();
        let event = ClientEvent::SessionUpdate(SessionUpdateEvent::new(session));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "session.update");
        assert_eq!(json["session"]["voice"], "tara");
        assert_eq!(json["session"]["audio"]["input"]["format"], "pcm16");
    }
}
