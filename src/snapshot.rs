//! Session snapshots.
//!
//! A snapshot captures the whole automaton including every field history and
//! the checkpoint log, so a restored session can still undo back to the
//! empty string.
//!
//! Layout: magic, version byte, payload length (`u32` LE), MessagePack
//! payload, CRC32 of the payload (`u32` LE).

use crate::automaton::Automaton;
use crate::error::{EngineError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::info;

/// Magic bytes for snapshot frames.
const SNAPSHOT_MAGIC: &[u8; 4] = b"SAM\0";

/// Current snapshot format version.
const SNAPSHOT_VERSION: u8 = 1;

/// Header size: magic + version + length.
const HEADER_SIZE: usize = 4 + 1 + 4;

/// Payloads above this size are treated as corruption.
const MAX_PAYLOAD: usize = 1024 * 1024 * 1024;

/// Encode `automaton` into a snapshot frame.
pub fn encode(automaton: &Automaton) -> Result<Vec<u8>> {
    let payload = rmp_serde::to_vec(automaton)?;
    if payload.len() > MAX_PAYLOAD {
        return Err(EngineError::Serialization(format!(
            "snapshot payload of {} bytes exceeds limit",
            payload.len()
        )));
    }

    let mut frame = Vec::with_capacity(HEADER_SIZE + payload.len() + 4);
    frame.extend_from_slice(SNAPSHOT_MAGIC);
    frame.push(SNAPSHOT_VERSION);
    frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    frame.extend_from_slice(&payload);
    frame.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    Ok(frame)
}

/// Decode a snapshot frame produced by [`encode`].
pub fn decode(bytes: &[u8]) -> Result<Automaton> {
    if bytes.len() < HEADER_SIZE {
        return Err(EngineError::InvalidFormat("snapshot too short".into()));
    }
    if &bytes[0..4] != SNAPSHOT_MAGIC {
        return Err(EngineError::InvalidFormat("invalid snapshot magic".into()));
    }
    if bytes[4] != SNAPSHOT_VERSION {
        return Err(EngineError::InvalidFormat(format!(
            "unsupported snapshot version: {}",
            bytes[4]
        )));
    }

    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&bytes[5..HEADER_SIZE]);
    let len = u32::from_le_bytes(len_bytes) as usize;
    if len > MAX_PAYLOAD {
        return Err(EngineError::Corruption("snapshot payload too large".into()));
    }
    if bytes.len() != HEADER_SIZE + len + 4 {
        return Err(EngineError::InvalidFormat(format!(
            "snapshot length mismatch: header says {} payload bytes, frame holds {}",
            len,
            bytes.len().saturating_sub(HEADER_SIZE + 4)
        )));
    }

    let payload = &bytes[HEADER_SIZE..HEADER_SIZE + len];
    let mut checksum_bytes = [0u8; 4];
    checksum_bytes.copy_from_slice(&bytes[HEADER_SIZE + len..]);
    let expected = u32::from_le_bytes(checksum_bytes);
    let got = crc32fast::hash(payload);
    if expected != got {
        return Err(EngineError::ChecksumMismatch { expected, got });
    }

    let automaton: Automaton = rmp_serde::from_slice(payload)?;
    automaton.validate()?;
    Ok(automaton)
}

/// Write a snapshot of `automaton` to `path`, replacing any existing file.
pub fn save(path: impl AsRef<Path>, automaton: &Automaton) -> Result<()> {
    let path = path.as_ref();
    let frame = encode(automaton)?;

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&frame)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;

    info!(path = %path.display(), bytes = frame.len(), live = automaton.len(), "saved snapshot");
    Ok(())
}

/// Load a snapshot written by [`save`].
pub fn load(path: impl AsRef<Path>) -> Result<Automaton> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    let mut frame = Vec::new();
    reader.read_to_end(&mut frame)?;

    let automaton = decode(&frame)?;
    info!(path = %path.display(), live = automaton.len(), "loaded snapshot");
    Ok(automaton)
}
