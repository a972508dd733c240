//! # Block Type Module
//!
//! Named block types known to the client. The grid itself stores raw `BlockId`s;
//! this enum gives the catalog, the terrain generator and log output readable names
//! for the ids the texture atlas was built for.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockId;

/// Enumerates the block types the texture atlas ships textures for.
///
/// The discriminant is the `BlockId` stored in the voxel grid. The `FromPrimitive`
/// derive allows conversion back from raw ids received over the network.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space.
    AIR = 0,

    /// Grass with a green top, grass-on-dirt sides and a dirt bottom.
    GRASS = 1,

    /// Plain dirt.
    DIRT = 2,

    /// Snow-covered ground with a snow top and dirt bottom.
    SNOW = 3,

    /// Stone.
    STONE = 4,

    /// Sand.
    SAND = 5,

    /// Wood log with ring textures on top and bottom and bark on the sides.
    LOG = 6,

    /// Tree leaves.
    LEAVES = 7,

    /// Cactus.
    CACTUS = 8,

    /// Diamond ore.
    DIAMOND = 9,
}

impl BlockType {
    /// Converts a raw `BlockId` into a named type, if the id is known.
    ///
    /// # Arguments
    /// * `id` - The raw block identifier
    ///
    /// # Returns
    /// `Some(BlockType)` for ids the client has textures for, `None` otherwise.
    pub fn from_id(id: BlockId) -> Option<Self> {
        FromPrimitive::from_u8(id)
    }

    /// Returns the raw identifier stored in the voxel grid for this type.
    pub fn id(self) -> BlockId {
        self as BlockId
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip_through_names() {
        for id in 0..=9 {
            let block_type = BlockType::from_id(id).unwrap();
            assert_eq!(block_type.id(), id);
        }
        assert_eq!(BlockType::from_id(1), Some(BlockType::GRASS));
        assert_eq!(BlockType::from_id(10), None);
    }
}
