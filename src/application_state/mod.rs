//! # Application State Management
//!
//! This module holds the client session that sits on top of the engine:
//! - Building the world from the server's blob or from the offline generator
//! - Applying block updates received from the server
//! - Turning player actions into local edits and outgoing block updates
//! - Moving the player and keeping the camera on its eyes
//! - Running frames against a render backend and tearing everything down

use std::io::Read;

use cgmath::{Deg, Point3, Vector3};

use crate::config::WorldConfig;
use crate::engine_state::{
    camera_state::{FlyCamera, Projection},
    network::{read_world_blob, BlockUpdate},
    physics::{
        collision::{collide_with_world, Aabb, CollisionOutcome, PLAYER_HEIGHT, PLAYER_WIDTH},
        pick_block, BlockTarget,
    },
    rendering::RenderBackend,
    voxels::{
        block::{block_type::BlockType, is_solid, BlockId},
        voxel_grid::{AffectedChunks, VoxelGrid},
        world::{RenderStats, World},
        worldgen::TerrainGenerator,
    },
};
use crate::error::Result;

/// Viewport size the camera projection starts with.
pub const DEFAULT_VIEWPORT: (u32, u32) = (1280, 720);
/// Eye height above the player's feet.
pub const EYE_HEIGHT: f32 = 1.6;
/// Downward acceleration in blocks per second squared.
pub const GRAVITY: f32 = 20.0;
/// Upward velocity given by a jump.
pub const JUMP_VELOCITY: f32 = 7.0;

/// A running client session.
///
/// Owns the world and the player. The render backend stays with the caller so
/// the same backend can outlive the session and observe its teardown.
pub struct ApplicationState<B: RenderBackend> {
    config: WorldConfig,
    world: World<B>,
    camera: FlyCamera,
    /// Minimum corner of the player box
    player_position: Point3<f32>,
    y_velocity: f32,
    grounded: bool,
    selected_block: BlockId,
    outgoing: Vec<BlockUpdate>,
}

impl<B: RenderBackend> ApplicationState<B> {
    /// Starts a session over an existing grid.
    ///
    /// The player spawns on top of the highest solid block in the centre column
    /// of the loaded region.
    pub fn new(config: WorldConfig, grid: VoxelGrid, backend: &mut B) -> Result<Self> {
        let world = World::from_config(&config, grid, backend)?;

        let loaded = world.loaded_dimensions();
        let centre = loaded.max_w() / 2;
        let ground = (0..loaded.max_h())
            .rev()
            .find(|&y| is_solid(world.get_block(centre, y, centre)))
            .map_or(0, |y| y + 1);
        let player_position = Point3::new(centre as f32, ground as f32, centre as f32);

        let (width, height) = DEFAULT_VIEWPORT;
        let projection = Projection::new(width, height, Deg(70.0), 0.1, 1000.0);
        let camera = FlyCamera::new(
            Self::eye_for(player_position),
            Deg(0.0),
            Deg(0.0),
            projection,
        );

        log::info!("Player spawned at {:?}", player_position);

        Ok(ApplicationState {
            config,
            world,
            camera,
            player_position,
            y_velocity: 0.0,
            grounded: false,
            selected_block: BlockType::STONE.id(),
            outgoing: Vec::new(),
        })
    }

    /// Starts a session from the world blob sent by the server on join.
    pub fn from_world_blob<R: Read>(config: WorldConfig, reader: &mut R, backend: &mut B) -> Result<Self> {
        config.validate()?;
        let grid = read_world_blob(reader, config.grid_dimensions())?;
        Self::new(config, grid, backend)
    }

    /// Starts an offline session over generated terrain.
    pub fn generated(config: WorldConfig, backend: &mut B) -> Result<Self> {
        config.validate()?;
        let mut grid = VoxelGrid::new(config.grid_dimensions())?;
        TerrainGenerator::new(config.seed, config.sea_level).fill(&mut grid);
        Self::new(config, grid, backend)
    }

    fn eye_for(player_position: Point3<f32>) -> Point3<f32> {
        player_position + Vector3::new(PLAYER_WIDTH * 0.5, EYE_HEIGHT, PLAYER_WIDTH * 0.5)
    }

    fn player_size() -> Vector3<f32> {
        Vector3::new(PLAYER_WIDTH, PLAYER_HEIGHT, PLAYER_WIDTH)
    }

    /// The world.
    pub fn world(&self) -> &World<B> {
        &self.world
    }

    /// The world, mutably.
    pub fn world_mut(&mut self) -> &mut World<B> {
        &mut self.world
    }

    /// The config this session was built from.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The camera.
    pub fn camera(&self) -> &FlyCamera {
        &self.camera
    }

    /// The camera, mutably. Use it to turn; position follows the player.
    pub fn camera_mut(&mut self) -> &mut FlyCamera {
        &mut self.camera
    }

    /// Minimum corner of the player box.
    pub fn player_position(&self) -> Point3<f32> {
        self.player_position
    }

    /// Whether the player landed on a block during the last step.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// The block id `place_block` puts down.
    pub fn selected_block(&self) -> BlockId {
        self.selected_block
    }

    /// Chooses the block id `place_block` puts down.
    pub fn select_block(&mut self, block: BlockId) {
        self.selected_block = block;
    }

    /// Applies one encoded block update packet from the server.
    ///
    /// # Returns
    /// The chunks the update touched, or `PacketTruncated` if the packet is short.
    pub fn receive_packet(&mut self, bytes: &[u8]) -> Result<AffectedChunks> {
        let update = BlockUpdate::decode(bytes)?;
        Ok(self.world.apply_block_update(&update))
    }

    /// Resolves the block under the crosshair.
    pub fn target(&self) -> Option<BlockTarget> {
        pick_block(
            &self.world,
            self.camera.position(),
            self.camera.forward(),
            self.config.reach_distance,
            self.config.ray_precision,
        )
    }

    /// Breaks the block under the crosshair and queues the update for the server.
    pub fn break_block(&mut self) -> Option<BlockUpdate> {
        let target = self.target()?;
        let edit = self.world.break_block(&target)?;
        log::debug!("Broke block {} at {:?}", edit.previous, target.breakable);
        self.outgoing.push(edit.update);
        Some(edit.update)
    }

    /// Places the selected block in front of the block under the crosshair and
    /// queues the update for the server.
    ///
    /// Refused when the new block would overlap the player.
    pub fn place_block(&mut self) -> Option<BlockUpdate> {
        let target = self.target()?;
        let player = Aabb::new(self.player_position, Self::player_size());
        if player.intersects(&Aabb::block(target.placeable)) {
            return None;
        }
        let edit = self.world.place_block(&target, self.selected_block)?;
        log::debug!("Placed block {} at {:?}", self.selected_block, target.placeable);
        self.outgoing.push(edit.update);
        Some(edit.update)
    }

    /// Starts a jump if the player is standing on something.
    pub fn jump(&mut self) {
        if self.grounded {
            self.y_velocity = JUMP_VELOCITY;
            self.grounded = false;
        }
    }

    /// Advances the player by one tick.
    ///
    /// Gravity is applied, the player moves by `movement` plus its vertical
    /// velocity, and is then pushed out of the world. The camera follows.
    ///
    /// Falling speed is capped so one tick never drops the player by more than
    /// `PLAYER_WIDTH / 2 - 0.1`, which keeps the floor inside the collision window
    /// however long the tick is.
    ///
    /// # Arguments
    /// * `movement` - Horizontal displacement requested this tick
    /// * `dt` - Tick length in seconds
    pub fn step_player(&mut self, movement: Vector3<f32>, dt: f32) -> CollisionOutcome {
        self.y_velocity -= GRAVITY * dt;
        if dt > 0.0 {
            let max_fall = (PLAYER_WIDTH * 0.5 - 0.1) / dt;
            self.y_velocity = self.y_velocity.max(-max_fall);
        }
        let moved = self.player_position + movement + Vector3::unit_y() * (self.y_velocity * dt);

        let outcome = collide_with_world(&self.world, moved, Self::player_size(), self.y_velocity);
        self.player_position = outcome.position;
        self.y_velocity = outcome.y_velocity;
        self.grounded = outcome.grounded;
        self.camera.set_position(Self::eye_for(self.player_position));
        outcome
    }

    /// Renders one frame from the player's camera.
    pub fn frame(&mut self, backend: &mut B) -> RenderStats {
        self.world.render(&self.camera, backend)
    }

    /// Takes the block updates produced since the last call, oldest first.
    pub fn take_outgoing(&mut self) -> Vec<BlockUpdate> {
        std::mem::take(&mut self.outgoing)
    }

    /// Ends the session, releasing every chunk buffer.
    pub fn shutdown(self, backend: &mut B) {
        if !self.outgoing.is_empty() {
            log::warn!("Dropping {} unsent block updates", self.outgoing.len());
        }
        self.world.destroy(backend);
    }
}
