//! RIFF chunk identifiers and the sequential chunk scanner.
//!
//! A RIFF stream is a sequence of chunks, each introduced by an 8-byte header:
//!
//! - `[0..4]` id: four ASCII bytes (`RIFF`, `fmt `, `data`, `LIST`, ...)
//! - `[4..8]` size: u32 LE, the payload length in bytes
//!
//! [`ChunkCursor`] walks such a stream front to back. It never seeks, so the
//! same scanner works over a file, an in-memory buffer or a socket.

use std::fmt;
use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{Result, WavError};

/// Size of a chunk header (id + size) in bytes.
pub const CHUNK_HEADER_SIZE: u32 = 8;

/// Declared size used by streaming writers for chunks of unknown length.
pub const STREAMING_CHUNK_SIZE: u32 = u32::MAX;

/// A four-byte chunk identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkId(pub [u8; 4]);

impl ChunkId {
    pub const RIFF: ChunkId = ChunkId(*b"RIFF");
    pub const WAVE: ChunkId = ChunkId(*b"WAVE");
    pub const FMT: ChunkId = ChunkId(*b"fmt ");
    pub const DATA: ChunkId = ChunkId(*b"data");

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '?'
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkId(\"{self}\")")
    }
}

/// Identifier and declared payload size of a single chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: ChunkId,
    pub size: u32,
}

/// Forward-only reader over a RIFF byte stream that tracks its byte position.
///
/// Every call to [`locate`](ChunkCursor::locate) resumes from where the
/// previous call stopped, so locating `RIFF`, `fmt ` and `data` in turn walks
/// the stream exactly once.
pub struct ChunkCursor<R> {
    inner: R,
    position: u64,
}

impl<R: Read> ChunkCursor<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// Byte offset of the next unread byte, relative to where the cursor started.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Scan forward until a chunk with id `target` is found.
    ///
    /// On success the cursor sits at the first byte of the chunk's payload.
    /// Chunks with any other id are skipped by their declared size.
    ///
    /// # Errors
    ///
    /// - [`WavError::UnexpectedEndOfStream`] if the stream ends before the
    ///   target chunk appears.
    /// - [`WavError::MalformedChunkSize`] if a chunk declares the streaming
    ///   size sentinel `0xFFFFFFFF`.
    pub fn locate(&mut self, target: ChunkId) -> Result<ChunkHeader> {
        loop {
            let header = self.read_chunk_header()?;

            if header.size == STREAMING_CHUNK_SIZE {
                return Err(WavError::MalformedChunkSize {
                    id: header.id.to_string(),
                });
            }

            if header.id == target {
                tracing::debug!(
                    id = %header.id,
                    size = header.size,
                    offset = self.position,
                    "Chunk found"
                );
                return Ok(header);
            }

            tracing::warn!(
                id = %header.id,
                size = header.size,
                looking_for = %target,
                "Skipping unrecognised chunk"
            );
            self.skip(header.size)?;
        }
    }

    /// Read a bare four-byte identifier (e.g. the `WAVE` form type).
    pub fn read_id(&mut self, context: &'static str) -> Result<ChunkId> {
        let mut id = [0u8; 4];
        self.inner.read_exact(&mut id).map_err(|e| eof(e, context))?;
        self.position += 4;
        Ok(ChunkId(id))
    }

    /// Read exactly `len` payload bytes.
    ///
    /// The buffer grows with the bytes actually read, so a header that lies
    /// about its size cannot force a large up-front allocation.
    pub fn read_payload(&mut self, len: u32, context: &'static str) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let read = (&mut self.inner).take(len as u64).read_to_end(&mut buf)?;
        self.position += read as u64;
        if read < len as usize {
            return Err(WavError::UnexpectedEndOfStream { context });
        }
        Ok(buf)
    }

    /// Discard up to `len` bytes. A short skip is not an error here; the next
    /// header read reports the end of stream.
    fn skip(&mut self, len: u32) -> Result<()> {
        let skipped = io::copy(&mut (&mut self.inner).take(len as u64), &mut io::sink())?;
        self.position += skipped;
        Ok(())
    }

    fn read_chunk_header(&mut self) -> Result<ChunkHeader> {
        let id = self.read_id("chunk id")?;
        let size = self
            .inner
            .read_u32::<LittleEndian>()
            .map_err(|e| eof(e, "chunk size"))?;
        self.position += 4;
        Ok(ChunkHeader { id, size })
    }
}

/// Map an `UnexpectedEof` into the codec's end-of-stream error, passing
/// every other I/O failure through.
fn eof(err: io::Error, context: &'static str) -> WavError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        WavError::UnexpectedEndOfStream { context }
    } else {
        WavError::Io(err)
    }
}
