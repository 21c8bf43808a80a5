//! WAV writer: serializes a [`Container`] back into a RIFF/WAVE file.
//!
//! # Binary Layout
//!
//! The writer always emits the canonical three-chunk layout, in this order:
//! - `RIFF` + file_size + `WAVE`
//! - `fmt ` + fmt_chunk_size + the six format fields (+ any fmt extension bytes)
//! - `data` + data_size + interleaved samples
//!
//! Size fields are taken from the container (they came from the source file)
//! rather than recomputed, unless the sample payload no longer matches them.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use siren_format::{read_wav, WavWriter};
//!
//! let container = read_wav(Path::new("mix.wav")).unwrap();
//! WavWriter::new().write(&container, Path::new("copy.wav")).unwrap();
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::chunk::ChunkId;
use crate::container::{riff_size, Container};
use crate::error::{Result, WavError};
use crate::format::FMT_PAYLOAD_SIZE;
use crate::sample::encode_samples;

/// How the writer fills the `RIFF` and `data` size fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeFieldPolicy {
    /// Write the sizes carried by the container. If the encoded sample payload
    /// no longer matches the carried `data_size` (the frame count changed),
    /// both sizes are recomputed so the output stays playable.
    #[default]
    Carry,
    /// Always derive both sizes from the bytes actually written.
    Recompute,
}

/// Size fields resolved for one write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SizeFields {
    file_size: u32,
    fmt_chunk_size: u32,
    data_size: u32,
}

/// Encoder for [`Container`]s.
#[derive(Debug, Clone, Default)]
pub struct WavWriter {
    policy: SizeFieldPolicy,
}

impl WavWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: SizeFieldPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SizeFieldPolicy {
        self.policy
    }

    /// Encode the complete file into memory.
    ///
    /// # Errors
    ///
    /// - [`WavError::ChannelMismatch`] if the sample matrix and the format
    ///   disagree on the channel count.
    /// - [`WavError::PayloadTooLarge`] if recomputed sizes overflow 32 bits.
    pub fn encode(&self, container: &Container) -> Result<Vec<u8>> {
        let expected = container.format.channel_count() as usize;
        if container.samples.channel_count() != expected {
            return Err(WavError::ChannelMismatch {
                expected,
                got: container.samples.channel_count(),
            });
        }

        let payload = encode_samples(&container.samples, &container.format);
        let sizes = self.resolve_sizes(container, payload.len())?;

        let mut buf =
            Vec::with_capacity(20 + FMT_PAYLOAD_SIZE + container.fmt_extension.len() + 8 + payload.len());
        Self::write_header(&mut buf, container, sizes)?;
        buf.write_all(&payload)?;
        Ok(buf)
    }

    /// Encode and write the container to `path`.
    ///
    /// The file is written in one scoped operation and flushed before the
    /// handle is released.
    ///
    /// # Errors
    ///
    /// Returns [`WavError::OutputPathInvalid`] if the destination directory
    /// does not exist or cannot be written, plus any [`encode`](Self::encode) error.
    pub fn write(&self, container: &Container, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if !dir.is_dir() {
            return Err(WavError::OutputPathInvalid {
                path: dir.to_path_buf(),
            });
        }

        let bytes = self.encode(container)?;

        let file = File::create(path).map_err(|e| match e.kind() {
            io::ErrorKind::PermissionDenied | io::ErrorKind::NotFound => {
                WavError::OutputPathInvalid {
                    path: path.to_path_buf(),
                }
            }
            _ => WavError::Io(e),
        })?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&bytes)?;
        writer.flush()?;

        tracing::info!(
            path = %path.display(),
            bytes = bytes.len(),
            frames = container.frame_count(),
            "WAV file written"
        );

        Ok(())
    }

    fn resolve_sizes(&self, container: &Container, payload_len: usize) -> Result<SizeFields> {
        let data_size =
            u32::try_from(payload_len).map_err(|_| WavError::PayloadTooLarge(payload_len))?;
        let fmt_len = FMT_PAYLOAD_SIZE + container.fmt_extension.len();

        let carried = SizeFields {
            file_size: container.file_size,
            fmt_chunk_size: container.fmt_chunk_size,
            data_size: container.data_size,
        };

        match self.policy {
            SizeFieldPolicy::Carry if data_size == container.data_size => Ok(carried),
            SizeFieldPolicy::Carry | SizeFieldPolicy::Recompute => {
                let fmt_chunk_size = fmt_len as u32;
                let file_size = riff_size(fmt_chunk_size, data_size)
                    .ok_or(WavError::PayloadTooLarge(payload_len))?;
                let recomputed = SizeFields {
                    file_size,
                    fmt_chunk_size,
                    data_size,
                };
                if self.policy == SizeFieldPolicy::Carry {
                    tracing::warn!(
                        carried_data_size = container.data_size,
                        data_size,
                        file_size,
                        "Frame count changed, recomputing size fields"
                    );
                } else if recomputed != carried {
                    tracing::debug!(?carried, ?recomputed, "Recomputed size fields");
                }
                Ok(recomputed)
            }
        }
    }

    /// Write everything up to and including the `data` chunk header.
    fn write_header<W: Write>(writer: &mut W, container: &Container, sizes: SizeFields) -> Result<()> {
        // RIFF header
        writer.write_all(ChunkId::RIFF.as_bytes())?;
        writer.write_u32::<LittleEndian>(sizes.file_size)?;
        writer.write_all(ChunkId::WAVE.as_bytes())?;

        // fmt chunk
        writer.write_all(ChunkId::FMT.as_bytes())?;
        writer.write_u32::<LittleEndian>(sizes.fmt_chunk_size)?;
        container.format.write_to(writer)?;
        writer.write_all(&container.fmt_extension)?;

        // data chunk header
        writer.write_all(ChunkId::DATA.as_bytes())?;
        writer.write_u32::<LittleEndian>(sizes.data_size)?;
        Ok(())
    }
}
