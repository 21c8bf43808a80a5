//! Error types for the WAV container codec.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when decoding or encoding WAV containers.
#[derive(Error, Debug)]
pub enum WavError {
    #[error("Unexpected end of stream while reading {context}")]
    UnexpectedEndOfStream { context: &'static str },

    #[error("Malformed size for chunk '{id}': 0xFFFFFFFF (streaming chunks are not supported)")]
    MalformedChunkSize { id: String },

    #[error("Invalid RIFF form type: expected WAVE, got {0:?}")]
    InvalidWaveTag([u8; 4]),

    #[error("Unsupported bit depth: {0} (only 8, 16 and 32 bit PCM are supported)")]
    UnsupportedBitDepth(u16),

    #[error("Invalid channel count: {0}")]
    InvalidChannelCount(u16),

    #[error("Data size {data_size} is not a whole number of {frame_width}-byte frames")]
    NonIntegralFrameCount { data_size: u64, frame_width: usize },

    #[error("Frame {frame} has {got} samples, expected {expected}")]
    RaggedFrame {
        frame: usize,
        expected: usize,
        got: usize,
    },

    #[error("Sample matrix has {got} channels, format declares {expected}")]
    ChannelMismatch { expected: usize, got: usize },

    #[error("Encoded sample payload of {0} bytes does not fit a 32-bit RIFF size field")]
    PayloadTooLarge(usize),

    #[error("Invalid output path: {}", path.display())]
    OutputPathInvalid { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WavError>;
