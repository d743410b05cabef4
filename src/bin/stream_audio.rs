//! Streams a pre-recorded PCM file through one realtime session and saves
//! the synthesized response.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::fmt::time::ChronoLocal;

use commotion_realtime::harness::{HarnessConfig, SessionHarness, SessionStatus};
use commotion_realtime::report::{convert_to_wav, save_response_audio};
use commotion_realtime::types::audio::DEFAULT_CHUNK_SIZE;
use commotion_realtime::types::SessionConfigurator;
use commotion_realtime::{connect_with_config, temperature_from_env, voice_from_env, Config};

#[derive(Parser)]
#[command(about = "Stream a raw 24kHz mono PCM16 file and collect the response")]
struct Args {
    /// Raw 24kHz mono PCM16 input file
    #[arg(long, default_value = "test-audio/test-speech.pcm")]
    input: PathBuf,

    /// Directory for the saved response audio
    #[arg(long, default_value = "test-audio/responses")]
    output_dir: PathBuf,

    /// Bytes of audio per append message
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Milliseconds between consecutive appends
    #[arg(long, default_value_t = 20)]
    chunk_delay_ms: u64,

    /// Wall-clock budget for the whole session, in seconds
    #[arg(long, default_value_t = 30)]
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

    // Local I/O failures surface before any connection attempt.
    let audio = std::fs::read(&args.input)
        .with_context(|| format!("audio file not found: {}", args.input.display()))?;
    println!(
        "Loaded {} bytes ({:.1} KB) from {}",
        audio.len(),
        audio.len() as f64 / 1024.0,
        args.input.display()
    );

    let session = SessionConfigurator::new()
        .with_instructions("Please respond to the audio message you receive.")
        .with_voice(&voice_from_env())
        .with_temperature(temperature_from_env())
        .build();
    let harness = SessionHarness::with_config(
        session,
        HarnessConfig {
            chunk_size: args.chunk_size,
            chunk_delay: Duration::from_millis(args.chunk_delay_ms),
            session_budget: Duration::from_secs(args.timeout_secs),
        },
    );

    println!("Connecting to {}/realtime (model={})", config.base_url(), config.model());
    let mut client = connect_with_config(1024, config)
        .await
        .context("failed to connect")?;

    let result = harness.run(&mut client, &audio).await?;

    match result.status() {
        SessionStatus::Completed => {
            if !result.transcript().is_empty() {
                println!("Transcript: {}", result.transcript());
            }
            if result.audio().is_empty() {
                println!("Response carried no audio");
            } else {
                let pcm_path = save_response_audio(&args.output_dir, result.audio())?;
                println!(
                    "Saved response audio (PCM): {} ({:.1} KB)",
                    pcm_path.display(),
                    result.audio().len() as f64 / 1024.0
                );
                if let Some(wav_path) = convert_to_wav(&pcm_path).await {
                    println!("Converted to WAV: {}", wav_path.display());
                }
            }
            println!(
                "VAD: {} starts, {} stops",
                result.speech_started(),
                result.speech_stopped()
            );
            Ok(())
        }
        SessionStatus::Failed(failure) => bail!("session failed: {}", failure),
        SessionStatus::Pending => bail!("session ended without a terminal status"),
    }
}
