use base64::Engine;

use crate::types::audio::Base64EncodedAudioBytes;

/// Splits `buffer` into contiguous, non-overlapping slices of `chunk_size`
/// bytes (the final slice may be shorter) and base64-encodes each slice
/// independently, in order.
pub fn chunk_audio(buffer: &[u8], chunk_size: usize) -> Vec<Base64EncodedAudioBytes> {
    assert!(chunk_size > 0, "chunk size must be positive");
    buffer
        .chunks(chunk_size)
        .map(|chunk| base64::engine::general_purpose::STANDARD.encode(chunk))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn decode(chunk: &str) -> Vec<u8> {
        base64::engine::general_purpose::STANDARD
            .decode(chunk)
            .unwrap()
    }

    #[test]
    fn test_even_split() {
        let buffer = vec![0u8; 9600];
        let chunks = chunk_audio(&buffer, 4800);
        assert_eq!(chunks.len(), 2);
        assert_eq!(decode(&chunks[0]).len(), 4800);
        assert_eq!(decode(&chunks[1]).len(), 4800);
    }

    #[test]
    fn test_short_final_chunk() {
        let buffer = vec![0u8; 5000];
        let chunks = chunk_audio(&buffer, 4800);
        assert_eq!(chunks.len(), 2);
        assert_eq!(decode(&chunks[0]).len(), 4800);
        assert_eq!(decode(&chunks[1]).len(), 200);
    }

    #[test]
    fn test_concatenation_reproduces_buffer() {
        let buffer: Vec<u8> = (0..10_007).map(|i| (i % 251) as u8).collect();
        for chunk_size in [1, 7, 4800, 10_006, 10_007, 20_000] {
            let rebuilt: Vec<u8> = chunk_audio(&buffer, chunk_size)
                .iter()
                .flat_map(|chunk| decode(chunk))
                .collect();
            assert_eq!(rebuilt, buffer, "chunk_size={}", chunk_size);
        }
    }

    #[test]
    fn test_empty_buffer_produces_no_chunks() {
        assert!(chunk_audio(&[], 4800).is_empty());
    }
}
