//! Runs a fixed battery of noise samples through the session harness,
//! sequentially, and writes a JSON summary with word-overlap accuracy
//! against the known expected sentence.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::fmt::time::ChronoLocal;

use commotion_realtime::harness::{HarnessConfig, SessionHarness};
use commotion_realtime::report::{SampleOutcome, SweepSummary};
use commotion_realtime::types::SessionConfigurator;
use commotion_realtime::{connect_with_config, temperature_from_env, voice_from_env, Config};

const EXPECTED_TRANSCRIPT: &str = "the quick brown fox jumps over the lazy dog this is a test of speech recognition with background noise";

const TEST_SAMPLES: &[(&str, &str, &str)] = &[
    ("clean-speech.pcm", "Clean", "N/A"),
    ("white-noise-5db.pcm", "White Noise", "+5dB (easy)"),
    ("white-noise-0db.pcm", "White Noise", "0dB (moderate)"),
    ("white-noise-neg5db.pcm", "White Noise", "-5dB (hard)"),
    ("pink-noise-0db.pcm", "Pink Noise", "0dB (crowd/traffic)"),
    ("brown-noise-0db.pcm", "Brown Noise", "0dB (wind/engines)"),
];

#[derive(Parser)]
#[command(about = "Background-noise handling sweep against the realtime endpoint")]
struct Args {
    /// Directory holding the noise-test PCM samples
    #[arg(long, default_value = "test-audio/noise-tests")]
    test_dir: PathBuf,

    /// Where to write the JSON summary
    #[arg(long, default_value = "test-artifacts/noise-handling-results.json")]
    output: PathBuf,

    /// Wall-clock budget per sample, in seconds
    #[arg(long, default_value_t = 20)]
    timeout_secs: u64,

    /// Milliseconds to pause between samples
    #[arg(long, default_value_t = 1000)]
    pause_ms: u64,
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

    println!("Background noise handling sweep (model={})", config.model());
    println!("Expected transcription: {:?}", EXPECTED_TRANSCRIPT);
    println!();

    let mut summary = SweepSummary::new(config.model(), EXPECTED_TRANSCRIPT);
    for (i, (filename, noise_type, snr_level)) in TEST_SAMPLES.iter().enumerate() {
        println!(
            "[{}/{}] Testing: {} ({})...",
            i + 1,
            TEST_SAMPLES.len(),
            noise_type,
            snr_level
        );

        let outcome = run_sample(&config, &args, filename, noise_type, snr_level).await;
        if outcome.success {
            println!("  ok, transcript: {:?}", outcome.transcription);
            println!(
                "  VAD: {} starts, {} stops",
                outcome.vad_events.speech_started, outcome.vad_events.speech_stopped
            );
        } else {
            println!(
                "  failed: {}",
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
        summary.push(outcome);

        // A failed sample never stops the rest of the sweep.
        tokio::time::sleep(Duration::from_millis(args.pause_ms)).await;
    }

    println!();
    println!("SUMMARY");
    for outcome in &summary.results {
        println!("{:<20} {:<20}", outcome.noise_type, outcome.snr_level);
        match outcome.accuracy {
            Some(accuracy) => {
                println!("  Accuracy: ~{:.0}%", accuracy);
                println!(
                    "  VAD events: {} starts / {} stops",
                    outcome.vad_events.speech_started, outcome.vad_events.speech_stopped
                );
            }
            None => {
                println!(
                    "  {}",
                    outcome.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }

    summary
        .write_to(&args.output)
        .with_context(|| format!("failed to write summary to {}", args.output.display()))?;
    println!();
    println!("Results saved to {}", args.output.display());
    Ok(())
}

async fn run_sample(
    config: &Config,
    args: &Args,
    filename: &str,
    noise_type: &str,
    snr_level: &str,
) -> SampleOutcome {
    let path = args.test_dir.join(filename);
    let audio = match std::fs::read(&path) {
        Ok(audio) => audio,
        Err(_) => return SampleOutcome::failed(filename, noise_type, snr_level, "File not found"),
    };

    let session = SessionConfigurator::new()
        .with_instructions("Transcribe the audio accurately.")
        .with_voice(&voice_from_env())
        .with_temperature(temperature_from_env())
        .build();
    let harness = SessionHarness::with_config(
        session,
        HarnessConfig {
            session_budget: Duration::from_secs(args.timeout_secs),
            ..HarnessConfig::default()
        },
    );

    let mut client = match connect_with_config(1024, config.clone()).await {
        Ok(client) => client,
        Err(e) => return SampleOutcome::failed(filename, noise_type, snr_level, &e.to_string()),
    };

    match harness.run(&mut client, &audio).await {
        Ok(result) => {
            SampleOutcome::from_result(filename, noise_type, snr_level, &result, EXPECTED_TRANSCRIPT)
        }
        Err(e) => SampleOutcome::failed(filename, noise_type, snr_level, &e.to_string()),
    }
}
