//! Opens a realtime connection, configures a session, and reports whether
//! the service acknowledges the configuration.

use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::Parser;
use tokio::sync::broadcast;
use tracing_subscriber::fmt::time::ChronoLocal;

use commotion_realtime::types::{ServerEvent, SessionConfigurator};
use commotion_realtime::{
    connect_with_config, temperature_from_env, voice_from_env, Config, ServerRx,
};

#[derive(Parser)]
#[command(about = "Connection smoke test against the realtime endpoint")]
struct Args {
    /// Seconds to wait for session.updated before giving up
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv_override().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_timer(ChronoLocal::rfc_3339())
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let voice = voice_from_env();
    let temperature = temperature_from_env();

    println!("Endpoint: {}/realtime", config.base_url());
    println!("Model: {}", config.model());
    println!("Voice: {}", voice);
    println!("Temperature: {}", temperature);

    let session = SessionConfigurator::new()
        .with_instructions("You are a friendly test assistant. Say hello and introduce yourself briefly.")
        .with_voice(&voice)
        .with_temperature(temperature)
        .build();

    let mut client = connect_with_config(1024, config)
        .await
        .context("failed to connect")?;
    println!("WebSocket connection opened");

    let events = client.server_events().await?;
    client.update_session(session).await?;

    let budget = Duration::from_secs(args.timeout_secs);
    let outcome = tokio::time::timeout(budget, await_config_ack(events)).await;
    client.close();

    match outcome {
        Ok(result) => result,
        Err(_) => Err(anyhow!(
            "timed out after {}s waiting for session.updated",
            args.timeout_secs
        )),
    }
}

async fn await_config_ack(mut events: ServerRx) -> anyhow::Result<()> {
    loop {
        match events.recv().await {
            Ok(ServerEvent::SessionCreated(e)) => {
                println!("Session created:");
                println!("  id: {}", e.session().id());
                println!("  model: {}", e.session().model().unwrap_or("(unknown)"));
                println!("  voice: {}", e.session().voice().unwrap_or("(unknown)"));
            }
            Ok(ServerEvent::SessionUpdated(_)) => {
                println!("Session updated, connection test successful");
                return Ok(());
            }
            Ok(ServerEvent::Error(e)) => {
                return Err(anyhow!("server error: {}", e.error()));
            }
            Ok(ServerEvent::Close { reason }) => {
                return Err(anyhow!(
                    "connection closed before acknowledgement: {:?}",
                    reason
                ));
            }
            Ok(other) => {
                tracing::info!("event: {:?}", other);
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("event stream lagged, skipped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => {
                return Err(anyhow!("event stream ended before acknowledgement"));
            }
        }
    }
}
