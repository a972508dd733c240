//! Block update packets.
//!
//! The server broadcasts every edit as a fixed 13-byte record in network byte
//! order, and the client sends the same record for its own edits:
//!
//! | offset | size | field       |
//! |--------|------|-------------|
//! | 0      | 4    | x (i32)     |
//! | 4      | 4    | y (i32)     |
//! | 8      | 4    | z (i32)     |
//! | 12     | 1    | block id    |

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use cgmath::Point3;

use crate::engine_state::voxels::block::BlockId;
use crate::error::{Result, WorldError};

/// A single block write, as carried over the wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockUpdate {
    /// World-block coordinate of the edited voxel
    pub position: Point3<i32>,
    /// The new block identifier
    pub block: BlockId,
}

impl BlockUpdate {
    /// Encoded size in bytes.
    pub const ENCODED_LEN: usize = 13;

    /// Creates an update for `(x, y, z)`.
    pub fn new(x: i32, y: i32, z: i32, block: BlockId) -> Self {
        BlockUpdate {
            position: Point3::new(x, y, z),
            block,
        }
    }

    /// Decodes one update from the front of `bytes`.
    ///
    /// Trailing bytes are ignored.
    ///
    /// # Returns
    /// The update, or `PacketTruncated` if fewer than 13 bytes are available.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::ENCODED_LEN {
            return Err(WorldError::PacketTruncated {
                expected: Self::ENCODED_LEN,
                actual: bytes.len(),
            });
        }
        let mut reader = &bytes[..Self::ENCODED_LEN];
        Self::read_from(&mut reader)
    }

    /// Reads one update from a stream.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let x = reader.read_i32::<BigEndian>()?;
        let y = reader.read_i32::<BigEndian>()?;
        let z = reader.read_i32::<BigEndian>()?;
        let block = reader.read_u8()?;
        Ok(BlockUpdate::new(x, y, z, block))
    }

    /// Writes the update to a stream.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_i32::<BigEndian>(self.position.x)?;
        writer.write_i32::<BigEndian>(self.position.y)?;
        writer.write_i32::<BigEndian>(self.position.z)?;
        writer.write_u8(self.block)?;
        Ok(())
    }

    /// Encodes the update into a fresh 13-byte buffer.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::ENCODED_LEN);
        // writes into a Vec cannot fail
        let _ = self.write_to(&mut bytes);
        bytes
    }
}
