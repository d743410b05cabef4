use crate::types::events::server::ErrorDetails;

/// Where the session currently stands in its lifecycle. Transitions are
/// driven exclusively by inbound event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingConfigAck,
    Streaming,
    AwaitingResponse,
    Closing,
}

impl SessionState {
    pub(crate) fn expects_response(self) -> bool {
        matches!(self, SessionState::Streaming | SessionState::AwaitingResponse)
    }
}

/// The three distinguishable ways a session can fail.
#[derive(Debug, Clone)]
pub enum SessionFailure {
    /// No terminal event arrived within the wall-clock budget.
    Timeout,
    /// The service sent an explicit `error` event.
    Protocol(ErrorDetails),
    /// The connection went away before a terminal event.
    Transport(String),
}

impl std::fmt::Display for SessionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionFailure::Timeout => write!(f, "Timeout"),
            SessionFailure::Protocol(details) => write!(f, "{}", details),
            SessionFailure::Transport(reason) => write!(f, "{}", reason),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SessionStatus {
    Pending,
    Completed,
    Failed(SessionFailure),
}

/// Accumulates everything one connection produced. Created at connection
/// open, mutated only by the event-handling path, immutable once finalized.
#[derive(Debug, Clone)]
pub struct SessionResult {
    session_id: Option<String>,
    audio: Vec<u8>,
    transcript: String,
    input_transcript: Option<String>,
    speech_started: u32,
    speech_stopped: u32,
    status: SessionStatus,
}

impl SessionResult {
    pub(crate) fn new() -> Self {
        Self {
            session_id: None,
            audio: Vec::new(),
            transcript: String::new(),
            input_transcript: None,
            speech_started: 0,
            speech_stopped: 0,
            status: SessionStatus::Pending,
        }
    }

    pub(crate) fn set_session_id(&mut self, id: &str) {
        self.session_id = Some(id.to_string());
    }

    pub(crate) fn append_audio(&mut self, bytes: &[u8]) {
        self.audio.extend_from_slice(bytes);
    }

    pub(crate) fn append_transcript(&mut self, delta: &str) {
        self.transcript.push_str(delta);
    }

    pub(crate) fn set_input_transcript(&mut self, transcript: &str) {
        self.input_transcript = Some(transcript.to_string());
    }

    pub(crate) fn record_speech_started(&mut self) {
        self.speech_started += 1;
    }

    pub(crate) fn record_speech_stopped(&mut self) {
        self.speech_stopped += 1;
    }

    /// Marks success. The first terminal status wins; later calls are no-ops.
    pub(crate) fn complete(&mut self) {
        if matches!(self.status, SessionStatus::Pending) {
            self.status = SessionStatus::Completed;
        }
    }

    /// Marks failure. The first terminal status wins; later calls are no-ops.
    pub(crate) fn fail(&mut self, failure: SessionFailure) {
        if matches!(self.status, SessionStatus::Pending) {
            self.status = SessionStatus::Failed(failure);
        }
    }

    pub(crate) fn is_terminal(&self) -> bool {
        !matches!(self.status, SessionStatus::Pending)
    }

    pub(crate) fn finalize(mut self) -> Self {
        if !self.is_terminal() {
            self.fail(SessionFailure::Transport(
                "session ended without a terminal event".to_string(),
            ));
        }
        self
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// The full response waveform, audio deltas concatenated in arrival order.
    pub fn audio(&self) -> &[u8] {
        &self.audio
    }

    /// The response transcript, deltas concatenated in arrival order.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// The service's transcription of the input audio, when it sent one.
    pub fn input_transcript(&self) -> Option<&str> {
        self.input_transcript.as_deref()
    }

    pub fn speech_started(&self) -> u32 {
        self.speech_started
    }

    pub fn speech_stopped(&self) -> u32 {
        self.speech_stopped
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, SessionStatus::Completed)
    }

    pub fn failure(&self) -> Option<&SessionFailure> {
        match &self.status {
            SessionStatus::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}
