//! Persists what a run produced: raw response audio, a best-effort WAV
//! rendition, and the JSON summary of a noise sweep.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use crate::harness::SessionResult;
use crate::score::{normalize_transcript, word_overlap};
use crate::types::audio::REALTIME_PCM16_SAMPLE_RATE;

/// Writes the response waveform as a headerless PCM file named by timestamp
/// under `dir`, creating the directory if needed.
pub fn save_response_audio(dir: &Path, audio: &[u8]) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!(
        "response-{}.pcm",
        chrono::Utc::now().timestamp_millis()
    ));
    std::fs::write(&path, audio)?;
    Ok(path)
}

/// Transcodes a saved PCM file into a playable WAV by shelling out to
/// ffmpeg. Best-effort: a missing binary or non-zero exit is logged and
/// yields `None`.
pub async fn convert_to_wav(pcm_path: &Path) -> Option<PathBuf> {
    let wav_path = pcm_path.with_extension("wav");
    let status = tokio::process::Command::new("ffmpeg")
        .arg("-f")
        .arg("s16le")
        .arg("-ar")
        .arg(REALTIME_PCM16_SAMPLE_RATE.to_string())
        .arg("-ac")
        .arg("1")
        .arg("-i")
        .arg(pcm_path)
        .arg(&wav_path)
        .arg("-y")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    match status {
        Ok(status) if status.success() => Some(wav_path),
        Ok(status) => {
            tracing::warn!("wav conversion failed: ffmpeg exited with {}", status);
            None
        }
        Err(e) => {
            tracing::warn!("wav conversion skipped, ffmpeg not available: {}", e);
            None
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct VadEvents {
    pub speech_started: u32,
    pub speech_stopped: u32,
}

/// One sample's record in the sweep summary.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SampleOutcome {
    pub filename: String,
    pub noise_type: String,
    pub snr_level: String,
    pub transcription: String,
    pub vad_events: VadEvents,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl SampleOutcome {
    /// Builds a record from a finished session. The service's own input
    /// transcription is preferred; the response transcript is the fallback.
    pub fn from_result(
        filename: &str,
        noise_type: &str,
        snr_level: &str,
        result: &SessionResult,
        expected: &str,
    ) -> Self {
        let transcription = result
            .input_transcript()
            .unwrap_or_else(|| result.transcript())
            .to_string();
        let accuracy = result
            .is_success()
            .then(|| word_overlap(expected, &normalize_transcript(&transcription)));
        Self {
            filename: filename.to_string(),
            noise_type: noise_type.to_string(),
            snr_level: snr_level.to_string(),
            transcription,
            vad_events: VadEvents {
                speech_started: result.speech_started(),
                speech_stopped: result.speech_stopped(),
            },
            success: result.is_success(),
            error: result.failure().map(|failure| failure.to_string()),
            accuracy,
        }
    }

    /// A record for a sample that never produced a session result, e.g. a
    /// missing file or a failed connection attempt.
    pub fn failed(filename: &str, noise_type: &str, snr_level: &str, error: &str) -> Self {
        Self {
            filename: filename.to_string(),
            noise_type: noise_type.to_string(),
            snr_level: snr_level.to_string(),
            transcription: String::new(),
            vad_events: VadEvents {
                speech_started: 0,
                speech_stopped: 0,
            },
            success: false,
            error: Some(error.to_string()),
            accuracy: None,
        }
    }
}

/// The JSON summary a noise sweep writes at the end of a run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SweepSummary {
    pub timestamp: String,
    pub model: String,
    pub expected_transcription: String,
    pub results: Vec<SampleOutcome>,
}

impl SweepSummary {
    pub fn new(model: &str, expected_transcription: &str) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            model: model.to_string(),
            expected_transcription: expected_transcription.to_string(),
            results: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: SampleOutcome) {
        self.results.push(outcome);
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_failed_outcome_serializes_without_accuracy() {
        let outcome = SampleOutcome::failed("missing.pcm", "Clean", "N/A", "File not found");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "File not found");
        assert!(json.get("accuracy").is_none());
    }

    #[test]
    fn test_summary_shape() {
        let mut summary = SweepSummary::new("commotion-medium", "the quick brown fox");
        summary.push(SampleOutcome::failed("a.pcm", "Clean", "N/A", "File not found"));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["model"], "commotion-medium");
        assert_eq!(json["results"].as_array().unwrap().len(), 1);
    }
}
