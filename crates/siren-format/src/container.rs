//! The decoded WAV container: header fields plus the sample matrix.

use serde::Serialize;

use crate::error::{Result, WavError};
use crate::format::{FormatDescriptor, FMT_PAYLOAD_SIZE};
use crate::sample::SampleMatrix;

/// Bytes counted by the RIFF size field before the first sub-chunk (`WAVE`).
pub const WAVE_TAG_SIZE: u32 = 4;

/// A decoded WAV file.
///
/// `file_size` and `data_size` are the sizes declared by the source file.
/// They are carried through to the output unchanged as long as the frame
/// shape is preserved; see [`crate::writer::SizeFieldPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// Decoded `fmt ` fields.
    pub format: FormatDescriptor,
    /// RIFF chunk size as declared by the source (total file length minus 8).
    pub file_size: u32,
    /// Declared `fmt ` payload size, normally 16.
    pub fmt_chunk_size: u32,
    /// Declared `data` payload size.
    pub data_size: u32,
    /// `fmt ` payload bytes past the 16 fixed ones (e.g. `cbSize`), re-emitted verbatim.
    pub fmt_extension: Vec<u8>,
    /// Decoded audio.
    pub samples: SampleMatrix,
}

impl Container {
    /// Create a container for freshly produced audio, computing every size field.
    ///
    /// # Errors
    ///
    /// - [`WavError::ChannelMismatch`] if the matrix and format disagree on channels.
    /// - [`WavError::PayloadTooLarge`] if the sample payload exceeds the RIFF size limit.
    pub fn new(format: FormatDescriptor, samples: SampleMatrix) -> Result<Self> {
        if samples.channel_count() != format.channel_count() as usize {
            return Err(WavError::ChannelMismatch {
                expected: format.channel_count() as usize,
                got: samples.channel_count(),
            });
        }
        let payload_len = samples.frame_count() * format.frame_width();
        let data_size =
            u32::try_from(payload_len).map_err(|_| WavError::PayloadTooLarge(payload_len))?;
        let fmt_chunk_size = FMT_PAYLOAD_SIZE as u32;
        let file_size = riff_size(fmt_chunk_size, data_size)
            .ok_or(WavError::PayloadTooLarge(payload_len))?;

        Ok(Self {
            format,
            file_size,
            fmt_chunk_size,
            data_size,
            fmt_extension: Vec::new(),
            samples,
        })
    }

    /// Derive a container that shares every header field with `self` and
    /// carries `samples` instead of the original audio.
    pub fn with_samples(&self, samples: SampleMatrix) -> Container {
        Container {
            format: self.format,
            file_size: self.file_size,
            fmt_chunk_size: self.fmt_chunk_size,
            data_size: self.data_size,
            fmt_extension: self.fmt_extension.clone(),
            samples,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.samples.frame_count()
    }

    pub fn channel_count(&self) -> usize {
        self.samples.channel_count()
    }

    /// Playback length in seconds, 0.0 for a zero sample rate.
    pub fn duration_secs(&self) -> f64 {
        if self.format.sample_rate() == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / self.format.sample_rate() as f64
    }

    /// Serializable overview used for reports.
    pub fn summary(&self) -> ContainerSummary {
        ContainerSummary {
            format: self.format,
            file_size: self.file_size,
            fmt_chunk_size: self.fmt_chunk_size,
            data_size: self.data_size,
            frame_count: self.frame_count() as u64,
            bit_rate: self.format.bit_rate(),
            duration_secs: self.duration_secs(),
        }
    }
}

/// Flat, serializable description of a container without its samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerSummary {
    pub format: FormatDescriptor,
    pub file_size: u32,
    pub fmt_chunk_size: u32,
    pub data_size: u32,
    pub frame_count: u64,
    pub bit_rate: u64,
    pub duration_secs: f64,
}

/// RIFF chunk size for a file holding exactly one `fmt ` and one `data` chunk:
/// `WAVE` + (`fmt ` header + payload) + (`data` header + payload).
pub fn riff_size(fmt_chunk_size: u32, data_size: u32) -> Option<u32> {
    WAVE_TAG_SIZE
        .checked_add(8)?
        .checked_add(fmt_chunk_size)?
        .checked_add(8)?
        .checked_add(data_size)
}
