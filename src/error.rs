//! # Error Module
//!
//! Errors for the fallible edges of the engine: configuration loading, world blob
//! ingestion and network packet decoding.
//!
//! Voxel lookups, edits and mesh regeneration never produce errors. Coordinates
//! outside the world read as air and writes outside it are ignored, so nothing in
//! the per-frame path returns a `Result`.

use thiserror::Error;

/// Errors produced while building or feeding a voxel world.
#[derive(Debug, Error)]
pub enum WorldError {
    /// A world or loaded-region dimension is zero, or the loaded region is larger
    /// than the world it views.
    #[error("invalid world dimensions: {0}")]
    InvalidDimensions(String),

    /// The world blob received from the server does not match the flat grid layout.
    #[error("world blob is {actual} bytes, expected exactly {expected}")]
    BlobSizeMismatch {
        /// Byte count implied by the configured grid dimensions
        expected: usize,
        /// Byte count actually received
        actual: usize,
    },

    /// A block update packet ended before all of its fields were read.
    #[error("block update packet truncated: {actual} of {expected} bytes")]
    PacketTruncated {
        /// Bytes needed for a complete packet
        expected: usize,
        /// Bytes available
        actual: usize,
    },

    /// Reading a config file or a blob stream failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A config file was not valid JSON for `WorldConfig`.
    #[error("failed to parse world config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, WorldError>;
