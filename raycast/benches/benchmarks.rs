use criterion::{criterion_group, criterion_main, Criterion};
use elevation::{ElevationGrid, GeoTransform};
use nalgebra::{Point3, Vector3};
use raycast::Scene;
use terramesh::TerrainMesh;

fn rolling_mesh(size: usize) -> TerrainMesh {
    let transform = GeoTransform::north_up(0.0, 0.0, 1.0, 1.0);
    let mut samples = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            let (x, y) = (col as f64, row as f64);
            samples.push(10.0 + (x / 11.0).sin() * 6.0 + (y / 17.0).cos() * 4.0);
        }
    }
    let grid = ElevationGrid::new(size, size, transform, samples).unwrap();
    TerrainMesh::build(&grid).unwrap()
}

fn nadir_bundle(size: usize, mesh_extent: f64) -> (Vec<Point3<f64>>, Vec<Vector3<f64>>) {
    let mut origins = Vec::with_capacity(size * size);
    let center = mesh_extent / 2.0;
    let spread = mesh_extent * 0.8;
    for row in 0..size {
        for col in 0..size {
            let x = center + spread * (col as f64 / size as f64 - 0.5);
            let y = center + spread * (row as f64 / size as f64 - 0.5);
            origins.push(Point3::new(x, y, 100.0));
        }
    }
    let directions = vec![Vector3::new(0.0, 0.0, -1.0); origins.len()];
    (origins, directions)
}

fn ray_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("Ray Walk");

    let scene = Scene::new(&rolling_mesh(200)).unwrap();
    let (origins, directions) = nadir_bundle(64, 199.0);

    group.bench_with_input(
        "single_hit_64x64",
        &(scene, origins, directions),
        |b, (scene, origins, directions)| {
            b.iter(|| scene.intersect_locations(origins, directions, false))
        },
    );
}

criterion_group!(benches, ray_walk);
criterion_main!(benches);
