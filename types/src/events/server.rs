mod error;
mod resources;

pub use error::ErrorDetails;
pub use resources::{ResponseResource, SessionResource};

/// `error` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorEvent {
    #[serde(default)]
    event_id: Option<String>,

    /// Details about the error
    error: ErrorDetails,
}

impl ErrorEvent {
    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    pub fn error(&self) -> &ErrorDetails {
        &self.error
    }
}

/// `session.created` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SessionCreatedEvent {
    #[serde(default)]
    event_id: Option<String>,

    /// The session resource assigned by the service
    session: SessionResource,
}

impl SessionCreatedEvent {
    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    pub fn session(&self) -> &SessionResource {
        &self.session
    }
}

/// `session.updated` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SessionUpdatedEvent {
    #[serde(default)]
    event_id: Option<String>,

    /// The updated session resource
    #[serde(default)]
    session: Option<SessionResource>,
}

impl SessionUpdatedEvent {
    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    pub fn session(&self) -> Option<&SessionResource> {
        self.session.as_ref()
    }
}

/// `input_audio_buffer.committed` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct InputAudioBufferCommittedEvent {
    #[serde(default)]
    event_id: Option<String>,

    /// The ID of the user message item that will be created
    #[serde(default)]
    item_id: Option<String>,
}

impl InputAudioBufferCommittedEvent {
    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    pub fn item_id(&self) -> Option<&str> {
        self.item_id.as_deref()
    }
}

/// `input_audio_buffer.speech_started` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct InputAudioBufferSpeechStartedEvent {
    #[serde(default)]
    event_id: Option<String>,

    /// Milliseconds since the session started when speech was detected
    #[serde(default)]
    audio_start_ms: Option<i64>,
}

impl InputAudioBufferSpeechStartedEvent {
    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    pub fn audio_start_ms(&self) -> Option<i64> {
        self.audio_start_ms
    }
}

/// `input_audio_buffer.speech_stopped` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct InputAudioBufferSpeechStoppedEvent {
    #[serde(default)]
    event_id: Option<String>,

    /// Milliseconds since the session started when speech stopped
    #[serde(default)]
    audio_end_ms: Option<i64>,
}

impl InputAudioBufferSpeechStoppedEvent {
    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    pub fn audio_end_ms(&self) -> Option<i64> {
        self.audio_end_ms
    }
}

/// `conversation.item.input_audio_transcription.completed` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct InputAudioTranscriptionCompletedEvent {
    #[serde(default)]
    event_id: Option<String>,

    /// The ID of the user message item
    #[serde(default)]
    item_id: Option<String>,

    /// The transcribed text
    transcript: String,
}

impl InputAudioTranscriptionCompletedEvent {
    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    pub fn item_id(&self) -> Option<&str> {
        self.item_id.as_deref()
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }
}

/// `response.audio.delta` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ResponseAudioDeltaEvent {
    #[serde(default)]
    event_id: Option<String>,

    /// The ID of the response
    #[serde(default)]
    response_id: Option<String>,

    /// Base64-encoded audio bytes
    delta: String,
}

impl ResponseAudioDeltaEvent {
    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    pub fn response_id(&self) -> Option<&str> {
        self.response_id.as_deref()
    }

    pub fn delta(&self) -> &str {
        &self.delta
    }
}

/// `response.audio_transcript.delta` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ResponseAudioTranscriptDeltaEvent {
    #[serde(default)]
    event_id: Option<String>,

    /// The ID of the response
    #[serde(default)]
    response_id: Option<String>,

    /// The delta in the audio transcript
    delta: String,
}

impl ResponseAudioTranscriptDeltaEvent {
    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    pub fn response_id(&self) -> Option<&str> {
        self.response_id.as_deref()
    }

    pub fn delta(&self) -> &str {
        &self.delta
    }
}

/// `response.audio_transcript.done` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ResponseAudioTranscriptDoneEvent {
    #[serde(default)]
    event_id: Option<String>,

    /// The ID of the response
    #[serde(default)]
    response_id: Option<String>,

    /// The completed audio transcript
    #[serde(default)]
    transcript: Option<String>,
}

impl ResponseAudioTranscriptDoneEvent {
    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    pub fn response_id(&self) -> Option<&str> {
        self.response_id.as_deref()
    }

    pub fn transcript(&self) -> Option<&str> {
        self.transcript.as_deref()
    }
}

/// `response.done` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ResponseDoneEvent {
    #[serde(default)]
    event_id: Option<String>,

    /// The response resource
    #[serde(default)]
    response: Option<ResponseResource>,
}

impl ResponseDoneEvent {
    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    pub fn response(&self) -> Option<&ResponseResource> {
        self.response.as_ref()
    }
}

#[cfg(test)]
mod test {
    use crate::events::ServerEvent;

    #[test]
    fn test_parse_session_created() {
        let json = r#"{"type":"session.created","event_id":"evt_1","session":{"id":"sess_42","model":"commotion-medium","voice":"tara"}}"#;
        let event: ServerEvent = serde_json::from_str(json).unwrap();
        match event {
            ServerEvent::SessionCreated(e) => {
                assert_eq!(e.session().id(), "sess_42");
                assert_eq!(e.session().model(), Some("commotion-medium"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_parse_audio_delta() {
        let json = r#"{"type":"response.audio.delta","event_id":"evt_2","response_id":"resp_1","delta":"AAECAw=="}"#;
        let event: ServerEvent = serde_json::from_str(json).unwrap();
        match event {
            ServerEvent::ResponseAudioDelta(e) => assert_eq!(e.delta(), "AAECAw=="),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_event() {
        let json = r#"{"type":"error","event_id":"evt_3","error":{"type":"invalid_request_error","code":"bad_audio","message":"audio buffer is empty"}}"#;
        let event: ServerEvent = serde_json::from_str(json).unwrap();
        match event {
            ServerEvent::Error(e) => {
                assert_eq!(e.error().error_type(), "invalid_request_error");
                assert_eq!(e.error().code(), Some("bad_audio"));
                assert_eq!(e.error().message(), "audio buffer is empty");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_is_a_parse_error() {
        let json = r#"{"type":"rate_limits.updated","event_id":"evt_4"}"#;
        assert!(serde_json::from_str::<ServerEvent>(json).is_err());
    }

    #[test]
    fn test_parse_response_done_without_resource() {
        let json = r#"{"type":"response.done","event_id":"evt_5"}"#;
        let event: ServerEvent = serde_json::from_str(json).unwrap();
        assert!(matches!(event, ServerEvent::ResponseDone(_)));
    }
}
