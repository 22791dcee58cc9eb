use imvdb_storage::{copy_from_dense, dense_from_tree, prelude::*};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use utilities::data_sets::sphere_sdf;

fn copy_dense_into_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("copy_dense_into_tree");
    for size in ARRAY_SIZES.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter_with_setup(
                || narrow_band_sphere(size),
                |dense| {
                    let mut tree = Tree::new(3.0);
                    copy_from_dense(&dense, &mut tree, 0.0);
                    black_box(tree);
                },
            );
        });
    }
    group.finish();
}

fn copy_tree_into_dense(c: &mut Criterion) {
    let mut group = c.benchmark_group("copy_tree_into_dense");
    for size in ARRAY_SIZES.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter_with_setup(
                || {
                    let dense = narrow_band_sphere(size);
                    let mut tree = Tree::new(3.0);
                    copy_from_dense(&dense, &mut tree, 0.0);

                    (tree, *dense.extent())
                },
                |(tree, extent)| {
                    black_box(dense_from_tree(&tree, extent));
                },
            );
        });
    }
    group.finish();
}

fn tree_accessor_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_accessor_scan");
    for size in ARRAY_SIZES.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let dense = narrow_band_sphere(size);
            let mut tree = Tree::new(3.0);
            copy_from_dense(&dense, &mut tree, 0.0);
            b.iter(|| {
                let accessor = tree.accessor();
                for p in dense.extent().iter_points() {
                    black_box(accessor.get(p));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    copy_dense_into_tree,
    copy_tree_into_dense,
    tree_accessor_scan
);
criterion_main!(benches);

const ARRAY_SIZES: [i32; 3] = [16, 32, 64];

/// A sphere SDF clamped to a band of 3 voxels, like a level set would store.
fn narrow_band_sphere(size: i32) -> Array3<f32> {
    let mut dense = sphere_sdf(size, size as f32 / 3.0);
    for v in dense.values_mut_slice() {
        *v = v.max(-3.0).min(3.0);
    }

    dense
}
