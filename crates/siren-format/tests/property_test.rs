//! Property-based tests for the sample codec and container round trip.

use proptest::prelude::*;
use siren_format::{
    decode_samples, encode_samples, Container, FormatDescriptor, SampleMatrix, WavReader,
    WavWriter,
};

// ===== Helpers =====

/// A (bits, channels, interleaved samples) triple with in-range values and whole frames.
fn arbitrary_audio() -> impl Strategy<Value = (u16, u16, Vec<i32>)> {
    (prop_oneof![Just(8u16), Just(16u16), Just(32u16)], 1u16..=6, 0usize..64).prop_flat_map(
        |(bits, channels, frames)| {
            let range = match bits {
                8 => 0i32..=255,
                16 => i16::MIN as i32..=i16::MAX as i32,
                _ => i32::MIN..=i32::MAX,
            };
            (
                Just(bits),
                Just(channels),
                prop::collection::vec(range, frames * channels as usize),
            )
        },
    )
}

// ===== Property Tests =====

proptest! {
    /// Property: decoding any whole number of frames and re-encoding returns the same bytes
    #[test]
    fn sample_bytes_round_trip(
        bits in prop_oneof![Just(8u16), Just(16u16), Just(32u16)],
        channels in 1u16..=4,
        frames in 0usize..128,
        seed in any::<u64>(),
    ) {
        let format = FormatDescriptor::pcm(channels, 44100, bits).unwrap();
        let len = frames * format.frame_width();
        let raw: Vec<u8> = (0..len)
            .map(|i| (seed.wrapping_mul(6364136223846793005).wrapping_add(i as u64) >> 24) as u8)
            .collect();

        let matrix = decode_samples(&raw, &format).unwrap();
        prop_assert_eq!(matrix.frame_count(), frames);
        prop_assert_eq!(encode_samples(&matrix, &format), raw);
    }

    /// Property: encode then decode preserves every in-range sample
    #[test]
    fn matrix_round_trip((bits, channels, samples) in arbitrary_audio()) {
        let format = FormatDescriptor::pcm(channels, 48000, bits).unwrap();
        let matrix = SampleMatrix::from_interleaved(channels as usize, samples).unwrap();

        let bytes = encode_samples(&matrix, &format);
        prop_assert_eq!(bytes.len(), matrix.frame_count() * format.frame_width());
        prop_assert_eq!(decode_samples(&bytes, &format).unwrap(), matrix);
    }

    /// Property: a written container decodes to an equal container
    #[test]
    fn container_round_trip((bits, channels, samples) in arbitrary_audio(), rate in 1u32..200_000) {
        let format = FormatDescriptor::pcm(channels, rate, bits).unwrap();
        let matrix = SampleMatrix::from_interleaved(channels as usize, samples).unwrap();
        let container = Container::new(format, matrix).unwrap();

        let bytes = WavWriter::new().encode(&container).unwrap();
        prop_assert_eq!(bytes.len() as u64, container.file_size as u64 + 8);

        let decoded = WavReader::from_bytes(&bytes).decode().unwrap();
        prop_assert_eq!(decoded, container);
    }

    /// Property: an unknown chunk of any size before `fmt ` or `data` does not
    /// change what is decoded
    #[test]
    fn unknown_chunk_is_skipped(
        (bits, channels, samples) in arbitrary_audio(),
        payload in prop::collection::vec(any::<u8>(), 0..300),
        before_data in any::<bool>(),
    ) {
        let format = FormatDescriptor::pcm(channels, 44100, bits).unwrap();
        let matrix = SampleMatrix::from_interleaved(channels as usize, samples).unwrap();
        let container = Container::new(format, matrix).unwrap();
        let mut bytes = WavWriter::new().encode(&container).unwrap();

        let mut chunk = b"JUNK".to_vec();
        chunk.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        chunk.extend_from_slice(&payload);
        // 12: after the WAVE tag. 36: after the 16-byte fmt payload.
        let at = if before_data { 36 } else { 12 };
        bytes.splice(at..at, chunk);

        let decoded = WavReader::from_bytes(&bytes).decode().unwrap();
        prop_assert_eq!(decoded.format, container.format);
        prop_assert_eq!(decoded.data_size, container.data_size);
        prop_assert_eq!(decoded.fmt_extension, container.fmt_extension);
        prop_assert_eq!(decoded.samples, container.samples);
    }

    /// Property: arbitrary bytes never panic the decoder
    #[test]
    fn decoder_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = WavReader::from_bytes(&bytes).decode();
    }
}
