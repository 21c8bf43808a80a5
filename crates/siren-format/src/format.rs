//! The `fmt ` chunk: encoding parameters of a PCM WAV file.

use std::io::{self, Write};

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use serde::Serialize;

use crate::error::{Result, WavError};

/// Size of the fixed part of a `fmt ` payload in bytes.
pub const FMT_PAYLOAD_SIZE: usize = 16;

/// `audio_format` value for linear PCM.
pub const WAVE_FORMAT_PCM: u16 = 0x0001;

/// Supported sample widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BitDepth {
    /// 8-bit unsigned, 0..=255 with silence at 128
    U8,
    /// 16-bit signed two's complement
    I16,
    /// 32-bit signed two's complement
    I32,
}

impl BitDepth {
    /// Map a `bits_per_sample` value to a supported width.
    ///
    /// # Errors
    ///
    /// Returns [`WavError::UnsupportedBitDepth`] for anything but 8, 16 or 32.
    pub fn from_bits(bits: u16) -> Result<Self> {
        match bits {
            8 => Ok(Self::U8),
            16 => Ok(Self::I16),
            32 => Ok(Self::I32),
            other => Err(WavError::UnsupportedBitDepth(other)),
        }
    }

    pub fn bits(self) -> u16 {
        match self {
            Self::U8 => 8,
            Self::I16 => 16,
            Self::I32 => 32,
        }
    }

    pub fn bytes_per_sample(self) -> usize {
        self.bits() as usize / 8
    }

    /// Smallest sample value representable at this width.
    pub fn min_value(self) -> i32 {
        match self {
            Self::U8 => u8::MIN as i32,
            Self::I16 => i16::MIN as i32,
            Self::I32 => i32::MIN,
        }
    }

    /// Largest sample value representable at this width.
    pub fn max_value(self) -> i32 {
        match self {
            Self::U8 => u8::MAX as i32,
            Self::I16 => i16::MAX as i32,
            Self::I32 => i32::MAX,
        }
    }
}

/// Decoded `fmt ` chunk.
///
/// Layout (16 bytes, little-endian):
/// - `[0..2]`   audio_format: u16 (1 = PCM)
/// - `[2..4]`   channel_count: u16
/// - `[4..8]`   sample_rate: u32
/// - `[8..12]`  byte_rate: u32
/// - `[12..14]` block_align: u16
/// - `[14..16]` bits_per_sample: u16
///
/// Fields are read-only once decoded; this crate never transcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatDescriptor {
    audio_format: u16,
    channel_count: u16,
    sample_rate: u32,
    byte_rate: u32,
    block_align: u16,
    bits_per_sample: u16,
    #[serde(skip)]
    bit_depth: BitDepth,
}

impl FormatDescriptor {
    /// Decode the fixed fields from a `fmt ` payload.
    ///
    /// Bytes beyond the first 16 are ignored here; the container keeps them
    /// as the format extension. `audio_format` is not checked against PCM.
    ///
    /// # Errors
    ///
    /// - [`WavError::UnexpectedEndOfStream`] if the payload is shorter than 16 bytes.
    /// - [`WavError::UnsupportedBitDepth`] if `bits_per_sample` is not 8, 16 or 32.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        if payload.len() < FMT_PAYLOAD_SIZE {
            return Err(WavError::UnexpectedEndOfStream {
                context: "fmt payload",
            });
        }

        let audio_format = LittleEndian::read_u16(&payload[0..2]);
        let channel_count = LittleEndian::read_u16(&payload[2..4]);
        let sample_rate = LittleEndian::read_u32(&payload[4..8]);
        let byte_rate = LittleEndian::read_u32(&payload[8..12]);
        let block_align = LittleEndian::read_u16(&payload[12..14]);
        let bits_per_sample = LittleEndian::read_u16(&payload[14..16]);

        let bit_depth = BitDepth::from_bits(bits_per_sample)?;

        if audio_format != WAVE_FORMAT_PCM {
            tracing::debug!(audio_format, "Non-PCM audio format, decoding as linear PCM");
        }

        Ok(Self {
            audio_format,
            channel_count,
            sample_rate,
            byte_rate,
            block_align,
            bits_per_sample,
            bit_depth,
        })
    }

    /// Build a linear PCM descriptor, deriving `byte_rate` and `block_align`.
    pub fn pcm(channel_count: u16, sample_rate: u32, bits_per_sample: u16) -> Result<Self> {
        let bit_depth = BitDepth::from_bits(bits_per_sample)?;
        if channel_count == 0 {
            return Err(WavError::InvalidChannelCount(channel_count));
        }
        let block_align = channel_count
            .checked_mul(bits_per_sample / 8)
            .ok_or(WavError::InvalidChannelCount(channel_count))?;
        Ok(Self {
            audio_format: WAVE_FORMAT_PCM,
            channel_count,
            sample_rate,
            byte_rate: sample_rate.saturating_mul(block_align as u32),
            block_align,
            bits_per_sample,
            bit_depth,
        })
    }

    /// Write the six fixed fields in on-disk order.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u16::<LittleEndian>(self.audio_format)?;
        writer.write_u16::<LittleEndian>(self.channel_count)?;
        writer.write_u32::<LittleEndian>(self.sample_rate)?;
        writer.write_u32::<LittleEndian>(self.byte_rate)?;
        writer.write_u16::<LittleEndian>(self.block_align)?;
        writer.write_u16::<LittleEndian>(self.bits_per_sample)?;
        Ok(())
    }

    pub fn audio_format(&self) -> u16 {
        self.audio_format
    }

    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn byte_rate(&self) -> u32 {
        self.byte_rate
    }

    pub fn block_align(&self) -> u16 {
        self.block_align
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    pub fn is_pcm(&self) -> bool {
        self.audio_format == WAVE_FORMAT_PCM
    }

    pub fn bytes_per_sample(&self) -> usize {
        self.bit_depth.bytes_per_sample()
    }

    /// Width of one frame (one sample per channel) in bytes.
    pub fn frame_width(&self) -> usize {
        self.bytes_per_sample() * self.channel_count as usize
    }

    /// Bits of audio per second, `bits_per_sample * sample_rate`.
    pub fn bit_rate(&self) -> u64 {
        self.bits_per_sample as u64 * self.sample_rate as u64
    }
}
