//! # siren-format
//!
//! Reading and writing uncompressed PCM audio in the RIFF/WAVE container.
//!
//! ## Format Overview
//!
//! A `.wav` file is a `RIFF` chunk whose payload starts with the `WAVE` tag
//! and is followed by sub-chunks:
//! - **fmt**: audio format, channel count, sample rate, byte rate, block align, bit depth
//! - **data**: interleaved little-endian samples
//! - anything else (`LIST`, `fact`, `JUNK`, ...) is skipped on read
//!
//! Supported bit depths are 8 (unsigned), 16 and 32 (signed).
//!
//! ## Example
//! ```rust,no_run
//! use std::path::Path;
//! use siren_format::{read_wav, WavWriter};
//!
//! let container = read_wav(Path::new("mix.wav")).unwrap();
//! println!("{} frames x {} channels", container.frame_count(), container.channel_count());
//!
//! let copy = container.with_samples(container.samples.clone());
//! WavWriter::new().write(&copy, Path::new("copy.wav")).unwrap();
//! ```

pub mod chunk;
pub mod container;
pub mod error;
pub mod format;
pub mod reader;
pub mod sample;
pub mod source;
pub mod writer;

pub use chunk::{ChunkCursor, ChunkHeader, ChunkId};
pub use container::{riff_size, Container, ContainerSummary};
pub use error::{Result, WavError};
pub use format::{BitDepth, FormatDescriptor};
pub use reader::{read_wav, WavReader};
pub use sample::{decode_samples, encode_samples, SampleMatrix};
pub use source::SourceLabel;
pub use writer::{SizeFieldPolicy, WavWriter};
