/// Errors raised by the client before or outside of a running session.
/// Failures observed during a session end up in the session result instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("COMMOTION_API_KEY not found in environment")]
    MissingApiKey,

    #[error("not connected yet")]
    NotConnected,

    #[error("already connected")]
    AlreadyConnected,

    #[error("connection closed")]
    ConnectionClosed,

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
