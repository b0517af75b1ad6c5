//! Binary index buffers: a raw stream of little-endian `u16` values.

use std::fs;
use std::path::Path;

use crate::error::{Result, TopologyError};

/// Load a binary index buffer from a file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<u16>> {
    let bytes = fs::read(path)?;
    decode(&bytes)
}

/// Decode little-endian `u16` values.
pub fn decode(bytes: &[u8]) -> Result<Vec<u16>> {
    if bytes.len() % 2 != 0 {
        return Err(TopologyError::OddByteLength { len: bytes.len() });
    }

    Ok(bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

/// Encode indices as little-endian `u16` values.
pub fn encode(indices: &[u16]) -> Vec<u8> {
    indices.iter().flat_map(|i| i.to_le_bytes()).collect()
}
