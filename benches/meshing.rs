/// Benchmark suite for chunk meshing
/// Measures single chunk regeneration and remeshing after bursts of edits
use cgmath::{Matrix4, Point3, SquareMatrix};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use voxel_client::engine_state::camera_state::Camera;
use voxel_client::engine_state::rendering::{MeshGenerator, RecordingBackend};
use voxel_client::engine_state::voxels::{
    voxel_grid::{GridDimensions, VoxelGrid},
    world::World,
    worldgen::TerrainGenerator,
};

/// Sees every chunk.
struct OverviewCamera;

impl Camera for OverviewCamera {
    fn view_projection(&self) -> Matrix4<f32> {
        Matrix4::identity()
    }

    fn eye_position(&self) -> Point3<f32> {
        Point3::new(0.0, 0.0, 0.0)
    }

    fn is_box_visible(&self, _min: Point3<f32>, _max: Point3<f32>) -> bool {
        true
    }
}

fn terrain(chunks_xz: u32, chunks_y: u32) -> VoxelGrid {
    let mut grid = VoxelGrid::new(GridDimensions::new(chunks_xz, chunks_y)).unwrap();
    TerrainGenerator::new(7, 40).fill(&mut grid);
    grid
}

fn bench_mesh_empty_chunk(c: &mut Criterion) {
    c.bench_function("mesh_empty_chunk", |b| {
        let grid = VoxelGrid::new(GridDimensions::new(1, 1)).unwrap();
        let mut generator = MeshGenerator::new();
        b.iter(|| black_box(generator.generate(black_box(&grid), Point3::new(0, 0, 0)).len()));
    });
}

fn bench_mesh_terrain_chunk(c: &mut Criterion) {
    c.bench_function("mesh_terrain_chunk", |b| {
        let grid = terrain(3, 2);
        let mut generator = MeshGenerator::new();
        b.iter(|| black_box(generator.generate(black_box(&grid), Point3::new(32, 32, 32)).len()));
    });
}

fn bench_mesh_checkerboard_chunk(c: &mut Criterion) {
    c.bench_function("mesh_checkerboard_chunk", |b| {
        // worst case: every solid block shows all six faces
        let mut grid = VoxelGrid::new(GridDimensions::new(1, 1)).unwrap();
        for y in 0..32 {
            for z in 0..32 {
                for x in 0..32 {
                    if (x + y + z) % 2 == 0 {
                        grid.set(x, y, z, 4);
                    }
                }
            }
        }
        let mut generator = MeshGenerator::new();
        b.iter(|| black_box(generator.generate(black_box(&grid), Point3::new(0, 0, 0)).len()));
    });
}

fn bench_boundary_edit_burst(c: &mut Criterion) {
    let mut group = c.benchmark_group("boundary_edit_burst");

    for edits in [1, 8, 64].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(edits), edits, |b, &edits| {
            let mut backend = RecordingBackend::default();
            let mut world =
                World::new(terrain(3, 2), GridDimensions::new(3, 2), &mut backend).unwrap();
            world.render(&OverviewCamera, &mut backend);

            let mut block = 1u8;
            b.iter(|| {
                // edits along the x = 31/32 seam dirty two chunks each
                for i in 0..edits {
                    world.set_block(31 + (i % 2), 20 + i / 8, 10 + i % 8, block);
                }
                block = block % 9 + 1;
                black_box(world.render(&OverviewCamera, &mut backend))
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_mesh_empty_chunk,
    bench_mesh_terrain_chunk,
    bench_mesh_checkerboard_chunk,
    bench_boundary_edit_burst,
);
criterion_main!(benches);
