//! WAV reader: decodes a RIFF/WAVE byte stream into a [`Container`].
//!
//! Decoding walks the stream once, front to back:
//!
//! 1. Locate the `RIFF` chunk and read the `WAVE` form type that follows.
//! 2. Locate the `fmt ` chunk and decode its payload.
//! 3. Locate the `data` chunk, read `data_size` bytes and decode the samples.
//!
//! Unknown chunks (`LIST`, `fact`, `JUNK`, vendor chunks, ...) anywhere before
//! `fmt ` or between `fmt ` and `data` are skipped by their declared size.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use siren_format::WavReader;
//!
//! let container = WavReader::open(Path::new("mix.wav")).unwrap().decode().unwrap();
//! println!("{} frames", container.frame_count());
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::chunk::{ChunkCursor, ChunkId};
use crate::container::Container;
use crate::error::{Result, WavError};
use crate::format::{FormatDescriptor, FMT_PAYLOAD_SIZE};
use crate::sample::decode_samples;

/// Reader for RIFF/WAVE PCM files over any byte source.
pub struct WavReader<R> {
    cursor: ChunkCursor<R>,
}

impl WavReader<BufReader<File>> {
    /// Open a WAV file for decoding.
    pub fn open(path: &Path) -> Result<Self> {
        tracing::info!("Opening WAV file: {}", path.display());
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<'a> WavReader<&'a [u8]> {
    /// Decode from an in-memory buffer.
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<R: Read> WavReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            cursor: ChunkCursor::new(inner),
        }
    }

    /// Decode the whole container.
    ///
    /// # Errors
    ///
    /// Propagates every chunk scanner, format decoder and sample codec error
    /// unchanged, plus [`WavError::InvalidWaveTag`] if the RIFF form type is
    /// not `WAVE`. Nothing is returned on failure; there is no partial decode.
    pub fn decode(mut self) -> Result<Container> {
        // --- 1. RIFF header ---
        let riff = self.cursor.locate(ChunkId::RIFF)?;
        let form = self.cursor.read_id("WAVE tag")?;
        if form != ChunkId::WAVE {
            return Err(WavError::InvalidWaveTag(form.0));
        }

        // --- 2. fmt chunk ---
        let fmt = self.cursor.locate(ChunkId::FMT)?;
        let fmt_payload = self.cursor.read_payload(fmt.size, "fmt payload")?;
        let format = FormatDescriptor::decode(&fmt_payload)?;
        let fmt_extension = fmt_payload[FMT_PAYLOAD_SIZE..].to_vec();
        tracing::debug!(
            audio_format = format.audio_format(),
            channels = format.channel_count(),
            sample_rate = format.sample_rate(),
            bits_per_sample = format.bits_per_sample(),
            extension_len = fmt_extension.len(),
            "Format decoded"
        );

        // --- 3. data chunk ---
        let data = self.cursor.locate(ChunkId::DATA)?;
        let raw = self.cursor.read_payload(data.size, "data payload")?;
        let samples = decode_samples(&raw, &format)?;

        let container = Container {
            format,
            file_size: riff.size,
            fmt_chunk_size: fmt.size,
            data_size: data.size,
            fmt_extension,
            samples,
        };

        tracing::info!(
            file_size = container.file_size,
            data_size = container.data_size,
            frames = container.frame_count(),
            channels = format.channel_count(),
            sample_rate = format.sample_rate(),
            bits_per_sample = format.bits_per_sample(),
            "Decode complete"
        );

        Ok(container)
    }
}

/// Open and decode a WAV file in one call.
pub fn read_wav(path: &Path) -> Result<Container> {
    WavReader::open(path)?.decode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{LittleEndian, WriteBytesExt};
    use std::io::Write;

    /// Helper: build WAV bytes, optionally with extra chunks before `fmt `
    /// and between `fmt ` and `data`.
    fn build_wav(
        bits: u16,
        channels: u16,
        data: &[u8],
        before_fmt: &[(&[u8; 4], &[u8])],
        before_data: &[(&[u8; 4], &[u8])],
    ) -> Vec<u8> {
        let mut body: Vec<u8> = Vec::new();
        body.write_all(b"WAVE").unwrap();
        for (id, payload) in before_fmt {
            body.write_all(*id).unwrap();
            body.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
            body.write_all(payload).unwrap();
        }
        body.write_all(b"fmt ").unwrap();
        body.write_u32::<LittleEndian>(16).unwrap();
        FormatDescriptor::pcm(channels, 44100, bits)
            .unwrap()
            .write_to(&mut body)
            .unwrap();
        for (id, payload) in before_data {
            body.write_all(*id).unwrap();
            body.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
            body.write_all(payload).unwrap();
        }
        body.write_all(b"data").unwrap();
        body.write_u32::<LittleEndian>(data.len() as u32).unwrap();
        body.write_all(data).unwrap();

        let mut buf = Vec::new();
        buf.write_all(b"RIFF").unwrap();
        buf.write_u32::<LittleEndian>(body.len() as u32).unwrap();
        buf.write_all(&body).unwrap();
        buf
    }

    #[test]
    fn test_decode_minimal_file() {
        let data = [0x01, 0x00, 0xFF, 0xFF, 0x02, 0x00, 0xFE, 0xFF];
        let bytes = build_wav(16, 2, &data, &[], &[]);

        let container = WavReader::from_bytes(&bytes).decode().unwrap();
        assert_eq!(container.file_size as usize, bytes.len() - 8);
        assert_eq!(container.fmt_chunk_size, 16);
        assert_eq!(container.data_size, 8);
        assert!(container.fmt_extension.is_empty());
        assert_eq!(container.format.channel_count(), 2);
        assert_eq!(
            container.samples.to_frames(),
            vec![vec![1, -1], vec![2, -2]]
        );
    }

    #[test]
    fn test_unknown_chunks_are_skipped() {
        let data = [10u8, 20, 30, 40];
        let list = [0x55u8; 33];
        let fact = 2u32.to_le_bytes();
        let bytes = build_wav(
            8,
            1,
            &data,
            &[(b"JUNK", &[0u8; 28][..])],
            &[(b"LIST", &list[..]), (b"fact", &fact[..])],
        );

        let container = WavReader::from_bytes(&bytes).decode().unwrap();
        assert_eq!(container.samples.as_interleaved(), &[10, 20, 30, 40]);
        assert_eq!(container.data_size, 4);
    }

    #[test]
    fn test_fmt_extension_is_kept() {
        let mut bytes = build_wav(16, 1, &[0, 0], &[], &[]);
        // Grow the fmt chunk to 18 bytes by inserting cbSize = 0 after the fixed fields.
        let fmt_size_at = 16;
        bytes[fmt_size_at..fmt_size_at + 4].copy_from_slice(&18u32.to_le_bytes());
        let fixed_end = 20 + 16;
        bytes.splice(fixed_end..fixed_end, [0u8, 0u8]);

        let container = WavReader::from_bytes(&bytes).decode().unwrap();
        assert_eq!(container.fmt_chunk_size, 18);
        assert_eq!(container.fmt_extension, vec![0, 0]);
        assert_eq!(container.samples.as_interleaved(), &[0]);
    }

    #[test]
    fn test_24_bit_rejected() {
        let bytes = build_wav(16, 2, &[0; 12], &[], &[]);
        let mut bytes = bytes;
        // bits_per_sample lives at offset 34
        bytes[34..36].copy_from_slice(&24u16.to_le_bytes());

        let result = WavReader::from_bytes(&bytes).decode();
        assert!(matches!(result, Err(WavError::UnsupportedBitDepth(24))));
    }

    #[test]
    fn test_truncated_before_data() {
        let bytes = build_wav(16, 2, &[0; 8], &[], &[]);
        // Cut the file right after the fmt chunk: 12 (RIFF+WAVE) + 8 + 16.
        let truncated = &bytes[..36];

        let result = WavReader::from_bytes(truncated).decode();
        assert!(matches!(
            result,
            Err(WavError::UnexpectedEndOfStream { .. })
        ));
    }

    #[test]
    fn test_truncated_data_payload() {
        let bytes = build_wav(16, 2, &[0; 8], &[], &[]);
        let truncated = &bytes[..bytes.len() - 3];

        let result = WavReader::from_bytes(truncated).decode();
        assert!(matches!(
            result,
            Err(WavError::UnexpectedEndOfStream {
                context: "data payload"
            })
        ));
    }

    #[test]
    fn test_partial_frame_rejected() {
        let bytes = build_wav(16, 2, &[0; 6], &[], &[]);
        let result = WavReader::from_bytes(&bytes).decode();
        assert!(matches!(
            result,
            Err(WavError::NonIntegralFrameCount { .. })
        ));
    }

    #[test]
    fn test_not_wave() {
        let mut bytes = build_wav(16, 2, &[0; 4], &[], &[]);
        bytes[8..12].copy_from_slice(b"AVI ");
        let result = WavReader::from_bytes(&bytes).decode();
        assert!(matches!(result, Err(WavError::InvalidWaveTag(tag)) if &tag == b"AVI "));
    }

    #[test]
    fn test_streaming_data_size_rejected() {
        let mut bytes = build_wav(16, 2, &[0; 4], &[], &[]);
        let data_size_at = 12 + 8 + 16 + 4;
        bytes[data_size_at..data_size_at + 4].copy_from_slice(&u32::MAX.to_le_bytes());
        let result = WavReader::from_bytes(&bytes).decode();
        assert!(matches!(result, Err(WavError::MalformedChunkSize { .. })));
    }

    #[test]
    fn test_empty_input() {
        let result = WavReader::from_bytes(&[]).decode();
        assert!(matches!(
            result,
            Err(WavError::UnexpectedEndOfStream { .. })
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let result = read_wav(Path::new("/nonexistent/definitely_missing.wav"));
        assert!(matches!(result, Err(WavError::Io(_))));
    }
}
