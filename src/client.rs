use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use crate::error::Error;
use crate::types::audio::Base64EncodedAudioBytes;
use crate::types::events::client::{
    InputAudioBufferAppendEvent, InputAudioBufferCommitEvent, ResponseCreateEvent,
    SessionUpdateEvent,
};
use crate::types::{ClientEvent, ServerEvent, Session};

mod config;
mod consts;
mod utils;

pub use config::{temperature_from_env, voice_from_env, Config, ConfigBuilder};

pub type ClientTx = tokio::sync::mpsc::Sender<ClientEvent>;
type ServerTx = tokio::sync::broadcast::Sender<ServerEvent>;
pub type ServerRx = tokio::sync::broadcast::Receiver<ServerEvent>;

/// One WebSocket connection to the realtime endpoint. Outbound events go
/// through an mpsc channel, inbound events fan out through a broadcast
/// channel; both loops run as spawned tasks for the life of the connection.
pub struct Client {
    capacity: usize,
    config: Config,
    c_tx: Option<ClientTx>,
    s_tx: Option<ServerTx>,
    _send_handle: Option<tokio::task::JoinHandle<()>>,
    _recv_handle: Option<tokio::task::JoinHandle<()>>,
}

impl Client {
    fn new(capacity: usize, config: Config) -> Self {
        Self {
            capacity,
            config,
            c_tx: None,
            s_tx: None,
            _send_handle: None,
            _recv_handle: None,
        }
    }

    async fn connect(&mut self) -> Result<(), Error> {
        if self.c_tx.is_some() {
            return Err(Error::AlreadyConnected);
        }

        let request = utils::build_request(&self.config)?;
        let (ws_stream, _) = tokio_tungstenite::connect_async(request).await?;

        let (mut write, mut read) = ws_stream.split();

        let (c_tx, mut c_rx) = tokio::sync::mpsc::channel(self.capacity);
        let (s_tx, _) = tokio::sync::broadcast::channel(self.capacity);

        self.c_tx = Some(c_tx.clone());
        self.s_tx = Some(s_tx.clone());

        let send_handle = tokio::spawn(async move {
            while let Some(event) = c_rx.recv().await {
                match serde_json::to_string(&event) {
                    Ok(text) => {
                        if let Err(e) = write.send(Message::Text(text)).await {
                            tracing::error!("failed to send message: {}", e);
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("failed to serialize event: {}", e);
                    }
                }
            }
            let _ = write.close().await;
        });

        let recv_handle = tokio::spawn(async move {
            let mut close_reason: Option<String> = None;
            while let Some(message) = read.next().await {
                let message = match message {
                    Err(e) => {
                        tracing::error!("failed to read message: {}", e);
                        close_reason = Some(e.to_string());
                        break;
                    }
                    Ok(message) => message,
                };
                match message {
                    Message::Text(text) => {
                        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&text) {
                            let event_type = json.get("type").and_then(|v| v.as_str());
                            let event_id = json.get("event_id").and_then(|v| v.as_str());
                            tracing::debug!(
                                "received message: {}, id={}",
                                event_type.unwrap_or("unknown"),
                                event_id.unwrap_or("unknown")
                            );
                        }

                        match serde_json::from_str::<ServerEvent>(&text) {
                            Ok(event) => {
                                if let Err(e) = s_tx.send(event) {
                                    tracing::error!("failed to forward event: {}", e);
                                }
                            }
                            Err(e) => {
                                // Unrecognized or undecodable frames are not fatal.
                                tracing::warn!(
                                    "skipping undecodable frame: {}, text=> {:?}",
                                    e,
                                    text
                                );
                            }
                        }
                    }
                    Message::Binary(bin) => {
                        tracing::warn!("unexpected binary message: {} bytes", bin.len());
                    }
                    Message::Close(frame) => {
                        tracing::info!("connection closed: {:?}", frame);
                        close_reason = frame.map(|f| f.reason.to_string());
                        break;
                    }
                    _ => {}
                }
            }
            let _ = s_tx.send(ServerEvent::Close {
                reason: close_reason,
            });
        });

        self._send_handle = Some(send_handle);
        self._recv_handle = Some(recv_handle);
        Ok(())
    }

    pub async fn server_events(&mut self) -> Result<ServerRx, Error> {
        match self.s_tx {
            Some(ref tx) => Ok(tx.subscribe()),
            None => Err(Error::NotConnected),
        }
    }

    /// A clone of the outbound event channel, for tasks that stream audio
    /// while the owner keeps receiving.
    pub fn event_sender(&self) -> Result<ClientTx, Error> {
        match self.c_tx {
            Some(ref tx) => Ok(tx.clone()),
            None => Err(Error::NotConnected),
        }
    }

    async fn send_client_event(&mut self, event: ClientEvent) -> Result<(), Error> {
        match self.c_tx {
            Some(ref tx) => tx.send(event).await.map_err(|_| Error::ConnectionClosed),
            None => Err(Error::NotConnected),
        }
    }

    pub async fn update_session(&mut self, config: Session) -> Result<(), Error> {
        let event = ClientEvent::SessionUpdate(SessionUpdateEvent::new(config));
        self.send_client_event(event).await
    }

    pub async fn append_input_audio_buffer(
        &mut self,
        audio: Base64EncodedAudioBytes,
    ) -> Result<(), Error> {
        let event = ClientEvent::InputAudioBufferAppend(InputAudioBufferAppendEvent::new(audio));
        self.send_client_event(event).await
    }

    pub async fn commit_input_audio_buffer(&mut self) -> Result<(), Error> {
        let event = ClientEvent::InputAudioBufferCommit(InputAudioBufferCommitEvent::new());
        self.send_client_event(event).await
    }

    pub async fn create_response(&mut self) -> Result<(), Error> {
        let event = ClientEvent::ResponseCreate(ResponseCreateEvent::new());
        self.send_client_event(event).await
    }

    /// Drops the outbound channel, which ends the send loop and closes the
    /// socket. The read loop then observes the close and winds down.
    pub fn close(&mut self) {
        self.c_tx = None;
    }
}

pub async fn connect_with_config(capacity: usize, config: Config) -> Result<Client, Error> {
    let mut client = Client::new(capacity, config);
    client.connect().await?;
    Ok(client)
}

pub async fn connect() -> Result<Client, Error> {
    let config = Config::from_env()?;
    connect_with_config(1024, config).await
}
