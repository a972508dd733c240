//! End-to-end tests of the world pipeline through the public API: world blob in,
//! edits and block updates applied, meshes uploaded and drawn, buffers released.

use std::collections::HashSet;

use cgmath::{Deg, Point3};
use voxel_client::application_state::ApplicationState;
use voxel_client::config::WorldConfig;
use voxel_client::engine_state::camera_state::{FlyCamera, Projection};
use voxel_client::engine_state::network::{read_world_blob, write_world_blob, BlockUpdate};
use voxel_client::engine_state::rendering::RecordingBackend;
use voxel_client::engine_state::voxels::{
    block::block_type::BlockType,
    voxel_grid::{GridDimensions, VoxelGrid},
    world::World,
};
use voxel_client::error::WorldError;

fn camera_at(x: f32, y: f32, z: f32, yaw: f32) -> FlyCamera {
    let projection = Projection::new(800, 600, Deg(70.0), 0.1, 1000.0);
    FlyCamera::new(Point3::new(x, y, z), Deg(yaw), Deg(0.0), projection)
}

fn blob_world(
    dims: GridDimensions,
    blocks: &[(i32, i32, i32, u8)],
) -> (World<RecordingBackend>, RecordingBackend) {
    let mut grid = VoxelGrid::new(dims).unwrap();
    for &(x, y, z, block) in blocks {
        grid.set(x, y, z, block);
    }
    let mut blob = Vec::new();
    write_world_blob(&mut blob, &grid).unwrap();

    let received = read_world_blob(&mut blob.as_slice(), dims).unwrap();
    let mut backend = RecordingBackend::default();
    let world = World::new(received, dims, &mut backend).unwrap();
    (world, backend)
}

#[test]
fn isolated_block_meshes_to_one_cube() {
    let (mut world, mut backend) =
        blob_world(GridDimensions::new(1, 1), &[(10, 10, 10, BlockType::STONE.id())]);
    let camera = camera_at(-20.0, 10.0, 16.0, 0.0);

    let stats = world.render(&camera, &mut backend);
    assert_eq!(stats.regenerated, 1);
    assert_eq!(stats.drawn, 1);

    let vertices = backend.vertices_at(Point3::new(0, 0, 0)).unwrap();
    assert_eq!(vertices.len(), 36);
    assert!(vertices.iter().all(|v| v.ao() == 3));
    assert_eq!(backend.draws()[0].vertex_count, 36);
}

#[test]
fn grass_uses_three_texture_layers() {
    let (mut world, mut backend) =
        blob_world(GridDimensions::new(1, 1), &[(4, 4, 4, BlockType::GRASS.id())]);
    world.render(&camera_at(-20.0, 4.0, 4.0, 0.0), &mut backend);

    let layers: HashSet<u16> = backend
        .vertices_at(Point3::new(0, 0, 0))
        .unwrap()
        .iter()
        .map(|v| v.texture_layer())
        .collect();
    assert_eq!(layers.len(), 3);
}

#[test]
fn boundary_update_from_server_remeshes_both_chunks() {
    let (mut world, mut backend) = blob_world(GridDimensions::new(2, 1), &[]);
    let camera = camera_at(-20.0, 16.0, 32.0, 0.0);
    world.render(&camera, &mut backend);
    let uploads = backend.upload_count();

    let packet = BlockUpdate::new(31, 8, 8, BlockType::DIRT.id()).encode();
    let update = BlockUpdate::decode(&packet).unwrap();
    let affected = world.apply_block_update(&update);
    assert_eq!(affected.len(), 2);

    let stats = world.render(&camera, &mut backend);
    assert_eq!(stats.regenerated, 2);
    assert_eq!(backend.upload_count(), uploads + 2);
    // every face of the block belongs to its owner; the neighbour is remeshed but stays empty
    assert_eq!(backend.vertices_at(Point3::new(0, 0, 0)).unwrap().len(), 36);
    assert!(backend.vertices_at(Point3::new(32, 0, 0)).unwrap().is_empty());
}

#[test]
fn chunks_behind_the_camera_are_culled() {
    let (mut world, mut backend) = blob_world(
        GridDimensions::new(3, 1),
        &[
            (5, 5, 40, BlockType::STONE.id()),
            (80, 16, 48, BlockType::STONE.id()),
        ],
    );
    let camera = camera_at(48.0, 16.0, 48.0, 0.0);

    let stats = world.render(&camera, &mut backend);
    assert_eq!(stats.regenerated, 9);
    assert_eq!(stats.drawn, 1);
    assert_eq!(stats.culled, 1);
    assert_eq!(stats.empty, 7);
    assert_eq!(backend.draws()[0].origin, Point3::new(64, 0, 32));
}

#[test]
fn blob_of_wrong_size_is_rejected() {
    let dims = GridDimensions::new(1, 1);
    let blob = vec![1u8; dims.volume() - 1];
    let result = read_world_blob(&mut blob.as_slice(), dims);
    assert!(matches!(
        result,
        Err(WorldError::BlobSizeMismatch { expected, actual }) if expected == 32768 && actual == 32767
    ));
}

#[test]
fn session_round_trip_from_json_config() {
    let config = WorldConfig::from_json_str(
        r#"{
            "world_chunks_xz": 2,
            "world_chunks_y": 1,
            "loaded_chunks_xz": 2,
            "loaded_chunks_y": 1,
            "seed": 5,
            "sea_level": 14
        }"#,
    )
    .unwrap();

    let mut backend = RecordingBackend::default();
    let mut session = ApplicationState::generated(config, &mut backend).unwrap();
    assert_eq!(backend.live_buffers(), 4);

    let stats = session.frame(&mut backend);
    assert_eq!(stats.regenerated, 4);
    let stats = session.frame(&mut backend);
    assert_eq!(stats.regenerated, 0);

    session
        .receive_packet(&BlockUpdate::new(0, 31, 0, BlockType::LOG.id()).encode())
        .unwrap();
    assert_eq!(session.world().get_block(0, 31, 0), BlockType::LOG.id());
    assert_eq!(session.world().dirty_chunk_count(), 1);

    session.shutdown(&mut backend);
    assert_eq!(backend.live_buffers(), 0);
}
