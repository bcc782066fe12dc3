use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::DVec3;
use triaconta_polyhedron::*;

fn addresser(resolution: u32) -> TileAddresser {
    let poly = Arc::new(Polyhedron::rhombic_triacontahedron());
    let topo = Arc::new(Topology::resolve(&poly).expect("closed"));
    TileAddresser::new(poly, topo, resolution)
}

fn bench_topology_resolve(c: &mut Criterion) {
    let poly = Polyhedron::rhombic_triacontahedron();
    c.bench_function("topology_resolve", |bencher| {
        bencher.iter(|| black_box(Topology::resolve(black_box(&poly))))
    });
}

fn bench_neighbor_across_seam(c: &mut Criterion) {
    let a = addresser(64);
    let tile = black_box(TileAddress::new(FaceId(5), 30, 63));
    c.bench_function("neighbor_across_seam", |bencher| {
        bencher.iter(|| black_box(a.neighbor(tile, Direction::East)))
    });
}

fn bench_locate(c: &mut Criterion) {
    let a = addresser(64);
    let dir = black_box(DVec3::new(0.3, -0.7, 0.45));
    c.bench_function("locate", |bencher| {
        bencher.iter(|| black_box(a.locate(dir)))
    });
}

fn bench_compute_path(c: &mut Criterion) {
    let a = addresser(64);
    let planner = PathPlanner::default();
    let start = TileAddress::new(FaceId(0), 10, 10);
    let end = TileAddress::new(FaceId(0), 50, 40);
    c.bench_function("compute_path_same_face", |bencher| {
        bencher.iter(|| black_box(planner.compute_path(&a, start, end, Direction::North)))
    });
}

criterion_group!(
    benches,
    bench_topology_resolve,
    bench_neighbor_across_seam,
    bench_locate,
    bench_compute_path,
);
criterion_main!(benches);
