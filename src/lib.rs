#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Client
//!
//! The world and rendering core of a voxel game client, built with Rust and WGPU.
//!
//! The client holds the whole world as one flat grid of block ids, split into 32³
//! chunks for rendering. Every chunk caches an ambient-occluded mesh of packed
//! vertices and is remeshed only when an edit touches it or a neighbour it borders.
//!
//! ## Key Modules
//!
//! * `application_state` - The client session: player, edits, network traffic, frames
//! * `engine_state` - The engine subsystems: voxels, meshing, rendering, camera, physics
//! * `config` - World dimensions and tuning, loaded from JSON
//! * `error` - The crate error type
//!
//! ## Architecture
//!
//! The engine keeps a clear separation between:
//! * Block data (`VoxelGrid`), which knows nothing about rendering
//! * Chunks, which cache meshes and track staleness
//! * The mesher, a pure function from block data to packed vertices
//! * Render backends, which own vertex buffers behind the `RenderBackend` trait
//!
//! ## Usage
//!
//! ```rust
//! use voxel_client::application_state::ApplicationState;
//! use voxel_client::config::WorldConfig;
//! use voxel_client::engine_state::rendering::RecordingBackend;
//!
//! let config = WorldConfig {
//!     world_chunks_xz: 1,
//!     world_chunks_y: 1,
//!     loaded_chunks_xz: 1,
//!     loaded_chunks_y: 1,
//!     sea_level: 16,
//!     ..WorldConfig::default()
//! };
//! let mut backend = RecordingBackend::default();
//! let mut session = ApplicationState::generated(config, &mut backend)?;
//! let stats = session.frame(&mut backend);
//! assert_eq!(stats.regenerated, 1);
//! session.shutdown(&mut backend);
//! # Ok::<(), voxel_client::error::WorldError>(())
//! ```
//!
//! ## Performance Considerations
//!
//! * One flat allocation for all block data, indexed directly
//! * Edits are O(1) and dirty at most four chunks
//! * Remeshing is lazy and bounded to dirty chunks
//! * One `u32` per vertex on the GPU

use cgmath::{Rad, Vector3};
use log::{error, info, warn};

use application_state::ApplicationState;
use config::WorldConfig;
use engine_state::rendering::{
    gpu_backend::OffscreenTarget, GpuChunkBackend, RecordingBackend, RenderBackend,
};
use error::Result;

pub mod application_state;
pub mod config;
pub mod engine_state;
pub mod error;

/// Environment variable naming a JSON config file for `run`.
pub const CONFIG_ENV_VAR: &str = "VOXEL_CLIENT_CONFIG";

/// Frames rendered by the headless session.
const SESSION_FRAMES: u32 = 120;
/// Simulated frame length in seconds.
const FRAME_TIME: f32 = 1.0 / 60.0;
/// Size of the offscreen target in pixels.
const OFFSCREEN_SIZE: (u32, u32) = (1280, 720);

/// World used when no config file is given.
fn session_config() -> WorldConfig {
    WorldConfig {
        world_chunks_xz: 8,
        world_chunks_y: 4,
        loaded_chunks_xz: 8,
        loaded_chunks_y: 4,
        seed: 42,
        sea_level: 48,
        ..WorldConfig::default()
    }
}

fn load_config() -> Result<WorldConfig> {
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) => WorldConfig::load(path),
        Err(_) => Ok(session_config()),
    }
}

/// Runs a headless client session.
///
/// Initializes logging, builds an offline world and renders a short walk through
/// it, breaking and placing a block along the way. Frames go to an offscreen wgpu
/// target when an adapter is available and to a `RecordingBackend` otherwise.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return;
        }
    };

    let result = match pollster::block_on(request_device()) {
        Some((device, queue)) => {
            let mut backend = GpuChunkBackend::new(device, queue, OffscreenTarget::COLOR_FORMAT);
            let (width, height) = OFFSCREEN_SIZE;
            let target = OffscreenTarget::new(backend.device(), width, height);
            run_session(config, &mut backend, |backend| target.submit_frame(backend))
        }
        None => {
            warn!("No GPU adapter available, rendering to the recording backend");
            let mut backend = RecordingBackend::default();
            run_session(config, &mut backend, |_| {})
        }
    };

    if let Err(e) = result {
        error!("Session failed: {}", e);
    }
}

async fn request_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });

    let adapter = match instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
    {
        Ok(adapter) => adapter,
        Err(e) => {
            warn!("No adapter: {}", e);
            return None;
        }
    };
    info!("Using adapter {}", adapter.get_info().name);

    match adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("Voxel Client Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::Off,
        })
        .await
    {
        Ok(pair) => Some(pair),
        Err(e) => {
            warn!("Failed to create device: {}", e);
            None
        }
    }
}

fn run_session<B: RenderBackend>(
    config: WorldConfig,
    backend: &mut B,
    mut present: impl FnMut(&B),
) -> Result<()> {
    let start = web_time::Instant::now();
    let mut session = ApplicationState::generated(config, backend)?;
    info!("Session ready in {:?}", start.elapsed());

    for frame in 0..SESSION_FRAMES {
        session.camera_mut().rotate(Rad(0.01), Rad(0.0));
        session.step_player(Vector3::new(0.0, 0.0, 0.0), FRAME_TIME);

        // halfway through, dig out the block underfoot and place one ahead
        if frame == SESSION_FRAMES / 2 {
            session
                .camera_mut()
                .rotate(Rad(0.0), Rad(-std::f32::consts::FRAC_PI_2));
            if let Some(update) = session.break_block() {
                info!("Broke block at {:?}", update.position);
            }
        }
        if frame == SESSION_FRAMES / 2 + 1 {
            session.step_player(Vector3::new(0.0, 0.0, 0.0), FRAME_TIME);
            session.camera_mut().rotate(Rad(0.0), Rad(std::f32::consts::FRAC_PI_4));
            if let Some(update) = session.place_block() {
                info!("Placed block at {:?}", update.position);
            }
        }

        let stats = session.frame(backend);
        present(&*backend);
        if frame % 30 == 0 {
            info!(
                "Frame {}: {} drawn, {} culled, {} empty, {} regenerated in {:?}",
                frame,
                stats.drawn,
                stats.culled,
                stats.empty,
                stats.regenerated,
                stats.regeneration_time
            );
        }
    }

    let outgoing = session.take_outgoing();
    let bytes: usize = outgoing.iter().map(|update| update.encode().len()).sum();
    info!("{} block updates ready to send ({} bytes)", outgoing.len(), bytes);

    session.shutdown(backend);
    Ok(())
}
