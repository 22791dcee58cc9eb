use imvdb_core::prelude::*;
use imvdb_mesh::*;
use imvdb_storage::{copy_from_dense, prelude::*};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn surface_nets_sine_sdf(c: &mut Criterion) {
    let mut group = c.benchmark_group("surface_nets_sine_sdf");
    for diameter in [8, 16, 32, 64].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(diameter),
            diameter,
            |b, &diameter| {
                b.iter_with_setup(
                    || {
                        let grid = sine_grid(diameter);

                        // Do a single run first to allocate the buffer to the right size.
                        let mut buffer = SurfaceBuffer::default();
                        extract_surface(&grid, 0.0, &mut buffer);

                        (grid, buffer)
                    },
                    |(grid, mut buffer)| extract_surface(&grid, 0.0, &mut buffer),
                );
            },
        );
    }
    group.finish();
}

fn adaptive_mesh_sine_sdf(c: &mut Criterion) {
    let mut group = c.benchmark_group("adaptive_mesh_sine_sdf");
    for diameter in [16, 32, 64].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(diameter),
            diameter,
            |b, &diameter| {
                b.iter_with_setup(
                    || sine_grid(diameter),
                    |grid| volume_to_mesh(&grid, MeshSettings::new(0.0).with_adaptivity(0.3)),
                );
            },
        );
    }
    group.finish();
}

criterion_group!(benches, surface_nets_sine_sdf, adaptive_mesh_sine_sdf);
criterion_main!(benches);

const EXTENT_RADIUS: i32 = 30;

// The higher the frequency (n) the more surface area to mesh.
fn sine_sdf(p: Point3i) -> f32 {
    let n = 10.0;

    ((p.x() as f32 / EXTENT_RADIUS as f32) * n * std::f32::consts::PI / 2.0).sin()
        + ((p.y() as f32 / EXTENT_RADIUS as f32) * n * std::f32::consts::PI / 2.0).sin()
        + ((p.z() as f32 / EXTENT_RADIUS as f32) * n * std::f32::consts::PI / 2.0).sin()
}

fn sine_grid(diameter: i32) -> FloatGrid {
    let radius = diameter >> 1;
    let extent = Extent3i::from_min_and_max(Point3i::fill(-radius), Point3i::fill(radius));
    let samples = Array3::fill_with(extent, sine_sdf);
    let mut tree = Tree::new(3.0);
    copy_from_dense(&samples, &mut tree, 0.0);

    FloatGrid::from_tree(tree)
}
