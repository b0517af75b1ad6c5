//! Index buffer I/O.
//!
//! This module reads triangle index buffers from files so they can be fed to
//! the [`HalfEdgeBuilder`](crate::mesh::HalfEdgeBuilder). Vertex data is not
//! read; only the 16-bit index stream matters to the topology.
//!
//! # Supported Formats
//!
//! | Format | Extension | Notes |
//! |--------|-----------|-------|
//! | Text | `.txt`, `.idx` | Integers separated by whitespace or commas, `#` comments |
//! | Binary | `.bin`, `.u16` | Raw little-endian `u16` values |
//!
//! # Usage
//!
//! ```no_run
//! use halftopo::io::{load, load_collection};
//! use halftopo::mesh::BuildOptions;
//!
//! // Just the indices
//! let indices = load("mesh.idx").unwrap();
//!
//! // Indices straight into a topology
//! let topo = load_collection("mesh.bin", &BuildOptions::default()).unwrap();
//! ```

pub mod binary;
pub mod text;

use std::path::Path;

use log::debug;

use crate::error::{Result, TopologyError};
use crate::mesh::{BuildOptions, HalfEdgeBuilder, HalfEdgeCollection};

/// Supported index buffer formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Whitespace or comma separated decimal integers.
    Text,
    /// Little-endian `u16` stream.
    Binary,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "txt" | "idx" => Some(Format::Text),
            "bin" | "u16" => Some(Format::Binary),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

/// Load an index buffer with automatic format detection.
///
/// The format is determined by the file extension.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<u16>> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| TopologyError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    load_as(path, format)
}

/// Load an index buffer in the given format.
pub fn load_as<P: AsRef<Path>>(path: P, format: Format) -> Result<Vec<u16>> {
    let path = path.as_ref();
    let indices = match format {
        Format::Text => text::load(path)?,
        Format::Binary => binary::load(path)?,
    };
    debug!("read {} indices from {}", indices.len(), path.display());
    Ok(indices)
}

/// Load an index buffer and build its topology.
pub fn load_collection<P: AsRef<Path>>(
    path: P,
    options: &BuildOptions,
) -> Result<HalfEdgeCollection> {
    let indices = load(path)?;
    HalfEdgeBuilder::with_options(options.clone()).build(&indices)
}
