//! Drives one realtime session from configuration to a terminal event.
//!
//! The harness owns no socket itself: it talks through the client's outbound
//! channel and inbound broadcast, which keeps the whole lifecycle testable
//! over in-process channels.

mod chunk;
mod result;

pub use chunk::chunk_audio;
pub use result::{SessionFailure, SessionResult, SessionState, SessionStatus};

use std::time::Duration;

use base64::Engine;
use tokio::sync::broadcast;

use crate::client::{Client, ClientTx, ServerRx};
use crate::types::events::client::{
    InputAudioBufferAppendEvent, InputAudioBufferCommitEvent, ResponseCreateEvent,
    SessionUpdateEvent,
};
use crate::types::{ClientEvent, ServerEvent, Session};

pub const DEFAULT_CHUNK_DELAY: Duration = Duration::from_millis(20);
pub const DEFAULT_SESSION_BUDGET: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Bytes of raw audio per append message.
    pub chunk_size: usize,
    /// Pause between consecutive appends, emulating real-time capture. Not
    /// a rate-control mechanism; the server gives no feedback on it.
    pub chunk_delay: Duration,
    /// Wall-clock budget for the whole session.
    pub session_budget: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            chunk_size: crate::types::audio::DEFAULT_CHUNK_SIZE,
            chunk_delay: DEFAULT_CHUNK_DELAY,
            session_budget: DEFAULT_SESSION_BUDGET,
        }
    }
}

/// What the event handler asks the drive loop to do next.
enum Step {
    Continue,
    BeginStreaming,
    Close,
}

pub struct SessionHarness {
    session: Session,
    config: HarnessConfig,
}

impl SessionHarness {
    pub fn new(session: Session) -> Self {
        Self::with_config(session, HarnessConfig::default())
    }

    pub fn with_config(session: Session, config: HarnessConfig) -> Self {
        Self { session, config }
    }

    /// Runs one session over a connected client and force-closes the
    /// connection afterwards, whatever the outcome.
    pub async fn run(&self, client: &mut Client, audio: &[u8]) -> crate::Result<SessionResult> {
        let tx = client.event_sender()?;
        let rx = client.server_events().await?;
        let result = self.drive(tx, rx, audio).await;
        client.close();
        Ok(result)
    }

    /// Drives the session protocol over raw channels until a terminal event
    /// or budget exhaustion, and returns the finalized result.
    pub async fn drive(&self, tx: ClientTx, mut rx: ServerRx, audio: &[u8]) -> SessionResult {
        let mut result = SessionResult::new();
        let mut state = SessionState::AwaitingConfigAck;
        let deadline = tokio::time::Instant::now() + self.config.session_budget;

        // Exactly one configuration message, before any audio.
        let configure = ClientEvent::SessionUpdate(SessionUpdateEvent::new(self.session.clone()));
        if tx.send(configure).await.is_err() {
            result.fail(SessionFailure::Transport(
                "connection closed before configuration".to_string(),
            ));
            return result.finalize();
        }

        let mut streamer: Option<tokio::task::JoinHandle<()>> = None;
        loop {
            let event = match tokio::time::timeout_at(deadline, rx.recv()).await {
                Err(_) => {
                    tracing::warn!(
                        "session budget of {:?} exceeded, closing",
                        self.config.session_budget
                    );
                    result.fail(SessionFailure::Timeout);
                    break;
                }
                Ok(Err(broadcast::error::RecvError::Lagged(skipped))) => {
                    tracing::warn!("server event stream lagged, skipped {} events", skipped);
                    continue;
                }
                Ok(Err(broadcast::error::RecvError::Closed)) => {
                    result.fail(SessionFailure::Transport(
                        "event stream ended before a terminal event".to_string(),
                    ));
                    break;
                }
                Ok(Ok(event)) => event,
            };

            match self.on_event(&mut state, &mut result, event) {
                Step::Continue => {}
                Step::BeginStreaming => {
                    streamer = Some(self.spawn_streamer(tx.clone(), audio));
                }
                Step::Close => break,
            }
        }

        if let Some(handle) = streamer {
            handle.abort();
        }
        result.finalize()
    }

    /// Paced append loop, then one commit, then one response request. Runs
    /// as its own task so inbound events keep flowing while streaming.
    fn spawn_streamer(&self, tx: ClientTx, audio: &[u8]) -> tokio::task::JoinHandle<()> {
        let chunks = chunk_audio(audio, self.config.chunk_size);
        let delay = self.config.chunk_delay;
        tokio::spawn(async move {
            tracing::info!("streaming {} audio chunks", chunks.len());
            for chunk in chunks {
                let append =
                    ClientEvent::InputAudioBufferAppend(InputAudioBufferAppendEvent::new(chunk));
                if tx.send(append).await.is_err() {
                    return;
                }
                tokio::time::sleep(delay).await;
            }
            let commit = ClientEvent::InputAudioBufferCommit(InputAudioBufferCommitEvent::new());
            if tx.send(commit).await.is_err() {
                return;
            }
            let request = ClientEvent::ResponseCreate(ResponseCreateEvent::new());
            let _ = tx.send(request).await;
        })
    }

    fn on_event(
        &self,
        state: &mut SessionState,
        result: &mut SessionResult,
        event: ServerEvent,
    ) -> Step {
        match event {
            ServerEvent::SessionCreated(e) => {
                tracing::info!("session created: {}", e.session().id());
                result.set_session_id(e.session().id());
                Step::Continue
            }
            ServerEvent::SessionUpdated(_) => {
                if *state == SessionState::AwaitingConfigAck {
                    tracing::info!("session updated, ready to stream audio");
                    *state = SessionState::Streaming;
                    Step::BeginStreaming
                } else {
                    tracing::warn!("unexpected session.updated in state {:?}", state);
                    Step::Continue
                }
            }
            ServerEvent::InputAudioBufferSpeechStarted(_) => {
                tracing::debug!("speech detected (VAD: speech started)");
                result.record_speech_started();
                Step::Continue
            }
            ServerEvent::InputAudioBufferSpeechStopped(_) => {
                tracing::debug!("speech ended (VAD: speech stopped)");
                result.record_speech_stopped();
                Step::Continue
            }
            ServerEvent::InputAudioBufferCommitted(_) => {
                if *state == SessionState::Streaming {
                    tracing::debug!("audio buffer committed");
                    *state = SessionState::AwaitingResponse;
                } else {
                    tracing::warn!(
                        "unexpected input_audio_buffer.committed in state {:?}",
                        state
                    );
                }
                Step::Continue
            }
            ServerEvent::ResponseAudioDelta(e) => {
                if !state.expects_response() {
                    tracing::warn!("audio delta before configuration was acknowledged");
                }
                match base64::engine::general_purpose::STANDARD.decode(e.delta()) {
                    Ok(bytes) => result.append_audio(&bytes),
                    Err(err) => tracing::warn!("skipping undecodable audio delta: {}", err),
                }
                Step::Continue
            }
            ServerEvent::ResponseAudioTranscriptDelta(e) => {
                if !state.expects_response() {
                    tracing::warn!("transcript delta before configuration was acknowledged");
                }
                result.append_transcript(e.delta());
                Step::Continue
            }
            ServerEvent::ResponseAudioTranscriptDone(_) => {
                tracing::debug!("transcript complete");
                Step::Continue
            }
            ServerEvent::InputAudioTranscriptionCompleted(e) => {
                result.set_input_transcript(e.transcript());
                Step::Continue
            }
            ServerEvent::ResponseDone(_) => {
                tracing::info!("response complete");
                result.complete();
                *state = SessionState::Closing;
                Step::Close
            }
            ServerEvent::Error(e) => {
                tracing::error!("server error: {}", e.error());
                result.fail(SessionFailure::Protocol(e.error().clone()));
                *state = SessionState::Closing;
                Step::Close
            }
            ServerEvent::Close { reason } => {
                tracing::info!("connection closed: {:?}", reason);
                if !result.is_terminal() {
                    result.fail(SessionFailure::Transport(reason.unwrap_or_else(|| {
                        "connection closed before a terminal event".to_string()
                    })));
                }
                Step::Close
            }
        }
    }
}
