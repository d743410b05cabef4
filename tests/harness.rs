//! Exercises the session harness end to end over in-process channels, with
//! the test playing the role of the service.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::sync::{broadcast, mpsc};

use commotion_realtime::harness::{
    HarnessConfig, SessionFailure, SessionHarness, SessionStatus,
};
use commotion_realtime::types::{ClientEvent, ServerEvent, SessionConfigurator};

fn server_event(json: &str) -> ServerEvent {
    serde_json::from_str(json).unwrap()
}

fn audio_delta(payload: &[u8]) -> ServerEvent {
    server_event(&format!(
        r#"{{"type":"response.audio.delta","delta":"{}"}}"#,
        STANDARD.encode(payload)
    ))
}

fn harness_with_budget(budget: Duration) -> SessionHarness {
    let session = SessionConfigurator::new()
        .with_instructions("Transcribe the audio accurately.")
        .build();
    SessionHarness::with_config(
        session,
        HarnessConfig {
            chunk_size: 4800,
            chunk_delay: Duration::ZERO,
            session_budget: budget,
        },
    )
}

#[tokio::test]
async fn test_full_session_flow() {
    let (tx, mut out_rx) = mpsc::channel::<ClientEvent>(64);
    let (server_tx, rx) = broadcast::channel::<ServerEvent>(64);

    let script = tokio::spawn(async move {
        // Configuration must arrive before anything else.
        match out_rx.recv().await.unwrap() {
            ClientEvent::SessionUpdate(e) => {
                assert_eq!(
                    e.session().instructions(),
                    Some("Transcribe the audio accurately.")
                );
            }
            other => panic!("expected session.update first, got {:?}", other),
        }
        server_tx
            .send(server_event(
                r#"{"type":"session.created","event_id":"evt_1","session":{"id":"sess_42","model":"commotion-medium","voice":"tara"}}"#,
            ))
            .unwrap();
        server_tx
            .send(server_event(r#"{"type":"session.updated"}"#))
            .unwrap();

        // Appends until the commit, nothing else in between.
        let mut appends = Vec::new();
        loop {
            match out_rx.recv().await.unwrap() {
                ClientEvent::InputAudioBufferAppend(e) => {
                    appends.push(STANDARD.decode(e.audio()).unwrap());
                }
                ClientEvent::InputAudioBufferCommit(_) => break,
                other => panic!("unexpected event while streaming: {:?}", other),
            }
        }
        server_tx
            .send(server_event(r#"{"type":"input_audio_buffer.committed"}"#))
            .unwrap();
        assert!(matches!(
            out_rx.recv().await.unwrap(),
            ClientEvent::ResponseCreate(_)
        ));

        for len in [100usize, 200, 50] {
            server_tx.send(audio_delta(&vec![7u8; len])).unwrap();
        }
        server_tx
            .send(server_event(
                r#"{"type":"response.audio_transcript.delta","delta":"hello "}"#,
            ))
            .unwrap();
        server_tx
            .send(server_event(
                r#"{"type":"response.audio_transcript.delta","delta":"there"}"#,
            ))
            .unwrap();
        server_tx
            .send(server_event(
                r#"{"type":"response.audio_transcript.done","transcript":"hello there"}"#,
            ))
            .unwrap();
        server_tx
            .send(server_event(r#"{"type":"response.done"}"#))
            .unwrap();
        appends
    });

    let harness = harness_with_budget(Duration::from_secs(30));
    let result = harness.drive(tx, rx, &[1u8; 9600]).await;
    let appends = script.await.unwrap();

    assert_eq!(appends.len(), 2);
    assert!(appends.iter().all(|chunk| chunk.len() == 4800));
    assert!(result.is_success());
    assert_eq!(result.session_id(), Some("sess_42"));
    assert_eq!(result.audio().len(), 350);
    assert_eq!(result.transcript(), "hello there");
}

#[tokio::test]
async fn test_trailing_partial_chunk_is_sent() {
    let (tx, mut out_rx) = mpsc::channel::<ClientEvent>(64);
    let (server_tx, rx) = broadcast::channel::<ServerEvent>(64);

    let script = tokio::spawn(async move {
        out_rx.recv().await.unwrap();
        server_tx
            .send(server_event(r#"{"type":"session.updated"}"#))
            .unwrap();
        let mut sizes = Vec::new();
        loop {
            match out_rx.recv().await.unwrap() {
                ClientEvent::InputAudioBufferAppend(e) => {
                    sizes.push(STANDARD.decode(e.audio()).unwrap().len());
                }
                ClientEvent::InputAudioBufferCommit(_) => break,
                other => panic!("unexpected event while streaming: {:?}", other),
            }
        }
        out_rx.recv().await.unwrap();
        server_tx
            .send(server_event(r#"{"type":"response.done"}"#))
            .unwrap();
        sizes
    });

    let harness = harness_with_budget(Duration::from_secs(30));
    let result = harness.drive(tx, rx, &[0u8; 5000]).await;
    let sizes = script.await.unwrap();

    assert_eq!(sizes, vec![4800, 200]);
    assert!(result.is_success());
}

#[tokio::test(start_paused = true)]
async fn test_budget_exhaustion_is_a_timeout() {
    let (tx, _out_rx) = mpsc::channel::<ClientEvent>(64);
    let (_server_tx, rx) = broadcast::channel::<ServerEvent>(64);

    // The service never acknowledges the configuration.
    let harness = harness_with_budget(Duration::from_secs(5));
    let result = harness.drive(tx, rx, &[0u8; 4800]).await;

    assert!(matches!(
        result.status(),
        SessionStatus::Failed(SessionFailure::Timeout)
    ));
}

#[tokio::test]
async fn test_server_error_is_a_protocol_failure() {
    let (tx, _out_rx) = mpsc::channel::<ClientEvent>(64);
    let (server_tx, rx) = broadcast::channel::<ServerEvent>(64);

    server_tx
        .send(server_event(
            r#"{"type":"error","error":{"type":"invalid_request_error","code":"invalid_api_key","message":"invalid API key"}}"#,
        ))
        .unwrap();

    let harness = harness_with_budget(Duration::from_secs(30));
    let result = harness.drive(tx, rx, &[0u8; 4800]).await;

    match result.status() {
        SessionStatus::Failed(SessionFailure::Protocol(details)) => {
            assert_eq!(details.code(), Some("invalid_api_key"));
            assert_eq!(details.message(), "invalid API key");
        }
        other => panic!("expected a protocol failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_close_before_terminal_event_is_a_transport_failure() {
    let (tx, _out_rx) = mpsc::channel::<ClientEvent>(64);
    let (server_tx, rx) = broadcast::channel::<ServerEvent>(64);

    server_tx
        .send(server_event(r#"{"type":"session.updated"}"#))
        .unwrap();
    server_tx
        .send(ServerEvent::Close {
            reason: Some("going away".to_string()),
        })
        .unwrap();

    let harness = harness_with_budget(Duration::from_secs(30));
    let result = harness.drive(tx, rx, &[0u8; 100]).await;

    match result.status() {
        SessionStatus::Failed(SessionFailure::Transport(reason)) => {
            assert_eq!(reason, "going away");
        }
        other => panic!("expected a transport failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_vad_events_and_input_transcript_are_recorded() {
    let (tx, mut out_rx) = mpsc::channel::<ClientEvent>(64);
    let (server_tx, rx) = broadcast::channel::<ServerEvent>(64);

    let script = tokio::spawn(async move {
        out_rx.recv().await.unwrap();
        server_tx
            .send(server_event(r#"{"type":"session.updated"}"#))
            .unwrap();
        loop {
            if matches!(
                out_rx.recv().await.unwrap(),
                ClientEvent::InputAudioBufferCommit(_)
            ) {
                break;
            }
        }
        out_rx.recv().await.unwrap();
        server_tx
            .send(server_event(
                r#"{"type":"input_audio_buffer.speech_started","audio_start_ms":120}"#,
            ))
            .unwrap();
        server_tx
            .send(server_event(
                r#"{"type":"input_audio_buffer.speech_stopped","audio_end_ms":1840}"#,
            ))
            .unwrap();
        server_tx
            .send(server_event(
                r#"{"type":"conversation.item.input_audio_transcription.completed","transcript":"the quick brown fox"}"#,
            ))
            .unwrap();
        server_tx
            .send(server_event(r#"{"type":"response.done"}"#))
            .unwrap();
    });

    let harness = harness_with_budget(Duration::from_secs(30));
    let result = harness.drive(tx, rx, &[0u8; 4800]).await;
    script.await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.speech_started(), 1);
    assert_eq!(result.speech_stopped(), 1);
    assert_eq!(result.input_transcript(), Some("the quick brown fox"));
}
