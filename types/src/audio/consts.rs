/// Sample rate of the realtime endpoint's PCM streams, in Hz.
pub const REALTIME_PCM16_SAMPLE_RATE: usize = 24_000;

/// Bytes per sample for 16-bit mono PCM.
pub const REALTIME_PCM16_BYTES_PER_SAMPLE: usize = 2;

/// Default append-chunk size in bytes: 0.1s at 24kHz mono PCM16
/// (24000 samples/sec * 2 bytes/sample * 0.1 sec).
pub const DEFAULT_CHUNK_SIZE: usize = 4_800;
