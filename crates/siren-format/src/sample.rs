//! Sample codec: interleaved little-endian PCM bytes <-> frame matrix.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Result, WavError};
use crate::format::{BitDepth, FormatDescriptor};

/// Decoded audio as frames of `channel_count` integer samples.
///
/// Samples are stored interleaved (frame 0 channel 0, frame 0 channel 1, ...,
/// frame 1 channel 0, ...) which is also their on-disk order. Every frame has
/// exactly `channel_count` samples; constructors reject anything else.
///
/// Values are kept as `i32` regardless of bit depth: 8-bit data holds
/// 0..=255, 16-bit data holds the `i16` range, 32-bit data the full `i32` range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleMatrix {
    channel_count: usize,
    samples: Vec<i32>,
}

impl SampleMatrix {
    /// Build a matrix from interleaved samples.
    ///
    /// # Errors
    ///
    /// - [`WavError::InvalidChannelCount`] if `channel_count` is zero.
    /// - [`WavError::RaggedFrame`] if `samples.len()` is not a multiple of
    ///   `channel_count`.
    pub fn from_interleaved(channel_count: usize, samples: Vec<i32>) -> Result<Self> {
        if channel_count == 0 {
            return Err(WavError::InvalidChannelCount(0));
        }
        let remainder = samples.len() % channel_count;
        if remainder != 0 {
            return Err(WavError::RaggedFrame {
                frame: samples.len() / channel_count,
                expected: channel_count,
                got: remainder,
            });
        }
        Ok(Self {
            channel_count,
            samples,
        })
    }

    /// Build a matrix from explicit frames, e.g. `[[1, -1], [2, -2]]`.
    pub fn from_frames<I, F>(channel_count: usize, frames: I) -> Result<Self>
    where
        I: IntoIterator<Item = F>,
        F: AsRef<[i32]>,
    {
        if channel_count == 0 {
            return Err(WavError::InvalidChannelCount(0));
        }
        let mut samples = Vec::new();
        for (index, frame) in frames.into_iter().enumerate() {
            let frame = frame.as_ref();
            if frame.len() != channel_count {
                return Err(WavError::RaggedFrame {
                    frame: index,
                    expected: channel_count,
                    got: frame.len(),
                });
            }
            samples.extend_from_slice(frame);
        }
        Ok(Self {
            channel_count,
            samples,
        })
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channel_count
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// True when both matrices have the same channel and frame counts.
    pub fn same_shape(&self, other: &SampleMatrix) -> bool {
        self.channel_count == other.channel_count && self.samples.len() == other.samples.len()
    }

    pub fn frame(&self, index: usize) -> Option<&[i32]> {
        let start = index.checked_mul(self.channel_count)?;
        self.samples.get(start..start.checked_add(self.channel_count)?)
    }

    pub fn frames(&self) -> std::slice::ChunksExact<'_, i32> {
        self.samples.chunks_exact(self.channel_count)
    }

    pub fn frames_mut(&mut self) -> std::slice::ChunksExactMut<'_, i32> {
        self.samples.chunks_exact_mut(self.channel_count)
    }

    /// All samples of one channel, in frame order. Empty if `channel` is out of range.
    pub fn channel(&self, channel: usize) -> impl Iterator<Item = i32> + '_ {
        let skip = if channel < self.channel_count {
            channel
        } else {
            self.samples.len()
        };
        self.samples
            .iter()
            .skip(skip)
            .step_by(self.channel_count)
            .copied()
    }

    pub fn as_interleaved(&self) -> &[i32] {
        &self.samples
    }

    pub fn into_interleaved(self) -> Vec<i32> {
        self.samples
    }

    pub fn to_frames(&self) -> Vec<Vec<i32>> {
        self.frames().map(<[i32]>::to_vec).collect()
    }
}

/// Decode raw `data` chunk bytes into a sample matrix.
///
/// 8-bit samples are unsigned, 16- and 32-bit samples are signed two's
/// complement, all little-endian.
///
/// # Errors
///
/// - [`WavError::InvalidChannelCount`] if the format declares zero channels.
/// - [`WavError::NonIntegralFrameCount`] if `raw` does not hold a whole
///   number of frames. A trailing partial frame is never dropped silently.
pub fn decode_samples(raw: &[u8], format: &FormatDescriptor) -> Result<SampleMatrix> {
    let channel_count = format.channel_count() as usize;
    if channel_count == 0 {
        return Err(WavError::InvalidChannelCount(0));
    }

    let width = format.bytes_per_sample();
    let frame_width = format.frame_width();
    if raw.len() % frame_width != 0 {
        return Err(WavError::NonIntegralFrameCount {
            data_size: raw.len() as u64,
            frame_width,
        });
    }

    let samples: Vec<i32> = match format.bit_depth() {
        BitDepth::U8 => raw.iter().map(|&b| b as i32).collect(),
        BitDepth::I16 => raw
            .chunks_exact(width)
            .map(|c| LittleEndian::read_i16(c) as i32)
            .collect(),
        BitDepth::I32 => raw.chunks_exact(width).map(LittleEndian::read_i32).collect(),
    };

    tracing::trace!(
        frames = samples.len() / channel_count,
        channels = channel_count,
        bits = format.bits_per_sample(),
        "Decoded samples"
    );

    Ok(SampleMatrix {
        channel_count,
        samples,
    })
}

/// Encode a sample matrix into interleaved little-endian bytes.
///
/// Values outside the range of the bit depth are truncated to its width with
/// two's-complement wrapping (`256` becomes `0` at 8 bits, `32768` becomes
/// `-32768` at 16 bits). This is lossy by definition and never an error.
pub fn encode_samples(matrix: &SampleMatrix, format: &FormatDescriptor) -> Vec<u8> {
    let width = format.bytes_per_sample();
    let mut buf = vec![0u8; matrix.samples.len() * width];

    match format.bit_depth() {
        BitDepth::U8 => {
            for (out, &s) in buf.iter_mut().zip(&matrix.samples) {
                *out = s as u8;
            }
        }
        BitDepth::I16 => {
            for (out, &s) in buf.chunks_exact_mut(width).zip(&matrix.samples) {
                LittleEndian::write_i16(out, s as i16);
            }
        }
        BitDepth::I32 => {
            for (out, &s) in buf.chunks_exact_mut(width).zip(&matrix.samples) {
                LittleEndian::write_i32(out, s);
            }
        }
    }

    buf
}
