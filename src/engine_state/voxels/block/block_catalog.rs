//! # Block Catalog Module
//!
//! Maps block identifiers to texture-array layers.
//!
//! The texture array is laid out in two regions:
//! - layers `0..255`: one texture per block id, at layer `id - 1`
//! - layers `255..`: the extra faces of multi-textured blocks
//!
//! Most blocks use their single layer on every face. Grass, snow and wood logs have
//! distinct top/bottom/side textures and are listed in a static exception map.
//! The atlas must be packed in exactly this order or textures will desync.

use super::{block_side::BlockSide, block_type::BlockType, BlockId};

/// First layer after the space reserved for uniformly textured blocks.
pub const MULTI_TEXTURE_LAYER_OFFSET: u16 = 255;

/// Texture-array layers used by each face of a block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockTexture {
    /// Layer of the +Y face
    pub top: u16,
    /// Layer of the -Y face
    pub bottom: u16,
    /// Layer shared by the four lateral faces
    pub side: u16,
}

impl BlockTexture {
    /// Creates a texture that uses the same layer on every face.
    pub const fn uniform(layer: u16) -> Self {
        BlockTexture {
            top: layer,
            bottom: layer,
            side: layer,
        }
    }

    /// Creates a texture with distinct top, bottom and side layers.
    pub const fn new(top: u16, bottom: u16, side: u16) -> Self {
        BlockTexture { top, bottom, side }
    }

    /// Returns the layer for a specific face.
    #[inline]
    pub fn layer_for(&self, side: BlockSide) -> u16 {
        match side {
            BlockSide::TOP => self.top,
            BlockSide::BOTTOM => self.bottom,
            _ => self.side,
        }
    }
}

/// Blocks whose faces do not share one texture.
static MULTI_TEXTURED_BLOCKS: phf::Map<u8, BlockTexture> = phf::phf_map! {
    // Grass: grass top, dirt-ish bottom, grass side
    1u8 => BlockTexture::new(0, MULTI_TEXTURE_LAYER_OFFSET, 3),
    // Snow: snow top, snow bottom, grass side
    3u8 => BlockTexture::new(2, MULTI_TEXTURE_LAYER_OFFSET + 1, 3),
    // Wood log: rings on top, rings on bottom, bark on the side
    6u8 => BlockTexture::new(5, MULTI_TEXTURE_LAYER_OFFSET + 2, 5),
};

/// Resolves block identifiers to texture layers.
pub struct BlockCatalog;

impl BlockCatalog {
    /// Highest block id the shipped atlas has textures for.
    pub const MAX_KNOWN_ID: BlockId = BlockType::DIAMOND as BlockId;

    /// Returns the face layers for a block id.
    ///
    /// Ids in the exception map get their listed layers; every other id uses
    /// `id - 1` on all faces. Air has no texture and maps to layer 0, but the mesh
    /// generator never asks for it.
    ///
    /// # Arguments
    /// * `block` - The block identifier
    ///
    /// # Returns
    /// The `BlockTexture` with top, bottom and side layers.
    #[inline]
    pub fn texture_for(block: BlockId) -> BlockTexture {
        match MULTI_TEXTURED_BLOCKS.get(&block) {
            Some(texture) => *texture,
            None => BlockTexture::uniform(u16::from(block.saturating_sub(1))),
        }
    }

    /// Returns `true` if the atlas has textures for this id.
    ///
    /// Edits are not rejected for unknown ids; this exists for callers that want to
    /// validate input themselves.
    pub fn is_known(block: BlockId) -> bool {
        block != 0 && block <= Self::MAX_KNOWN_ID
    }
}
