//! # Configuration Module
//!
//! `WorldConfig` carries the sizes of the voxel grid and of the loaded chunk region,
//! plus the tuning values for offline terrain generation and block picking.
//!
//! Configs are plain JSON documents. Every field has a default, so a config file
//! only needs to mention what it changes:
//!
//! ```json
//! { "world_chunks_xz": 8, "loaded_chunks_xz": 8, "seed": 42 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::voxel_grid::GridDimensions;
use crate::error::{Result, WorldError};

/// Configuration for a voxel world session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width and depth of the voxel grid, in chunks.
    pub world_chunks_xz: u32,
    /// Height of the voxel grid, in chunks.
    pub world_chunks_y: u32,
    /// Width and depth of the fixed chunk array that gets meshed and drawn.
    pub loaded_chunks_xz: u32,
    /// Height of the fixed chunk array that gets meshed and drawn.
    pub loaded_chunks_y: u32,
    /// Seed for the offline terrain generator.
    pub seed: u32,
    /// Mean terrain surface height in blocks.
    pub sea_level: i32,
    /// How far the player can reach when picking blocks, in blocks.
    pub reach_distance: f32,
    /// Number of ray-march steps across the reach distance.
    pub ray_precision: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            world_chunks_xz: 32,
            world_chunks_y: 8,
            loaded_chunks_xz: 16,
            loaded_chunks_y: 8,
            seed: 0,
            sea_level: 64,
            reach_distance: 5.0,
            ray_precision: 50,
        }
    }
}

impl WorldConfig {
    /// Parses a config from a JSON string and validates it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        log::info!("Loading world config from {}", path.as_ref().display());
        Self::from_json_str(&contents)
    }

    /// Checks that every chunk count is non-zero, that the grid is small enough
    /// to allocate and that the loaded region fits inside it.
    pub fn validate(&self) -> Result<()> {
        if self.world_chunks_xz == 0 || self.world_chunks_y == 0 {
            return Err(WorldError::InvalidDimensions(format!(
                "world must be at least one chunk in every axis (got {}x{}x{})",
                self.world_chunks_xz, self.world_chunks_y, self.world_chunks_xz
            )));
        }
        if self.loaded_chunks_xz == 0 || self.loaded_chunks_y == 0 {
            return Err(WorldError::InvalidDimensions(format!(
                "loaded region must be at least one chunk in every axis (got {}x{}x{})",
                self.loaded_chunks_xz, self.loaded_chunks_y, self.loaded_chunks_xz
            )));
        }
        if self.loaded_chunks_xz > self.world_chunks_xz
            || self.loaded_chunks_y > self.world_chunks_y
        {
            return Err(WorldError::InvalidDimensions(format!(
                "loaded region {}x{}x{} exceeds world {}x{}x{}",
                self.loaded_chunks_xz,
                self.loaded_chunks_y,
                self.loaded_chunks_xz,
                self.world_chunks_xz,
                self.world_chunks_y,
                self.world_chunks_xz
            )));
        }
        self.grid_dimensions().checked_volume()?;
        if self.ray_precision == 0 {
            return Err(WorldError::InvalidDimensions(
                "ray precision must be at least one step".to_string(),
            ));
        }
        Ok(())
    }

    /// Dimensions of the voxel grid this config describes.
    pub fn grid_dimensions(&self) -> GridDimensions {
        GridDimensions::new(self.world_chunks_xz, self.world_chunks_y)
    }

    /// Dimensions of the loaded chunk region this config describes.
    pub fn loaded_dimensions(&self) -> GridDimensions {
        GridDimensions::new(self.loaded_chunks_xz, self.loaded_chunks_y)
    }
}
