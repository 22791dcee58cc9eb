//! Moving voxels between dense arrays and sparse grids.
//!
//! An array of shape `[nx, ny, nz]` covers the index-space box `[0, 0, 0]` to `[nx - 1, ny - 1, nz - 1]`. The grid keeps that
//! shape, along with the world-space origin and spacing, as metadata so it can be densified again later.

use crate::host::HostArray;
use crate::{Error, Grid, Result};

use imvdb_core::prelude::*;
use imvdb_storage::{copy_from_dense, copy_to_dense, extent_for_shape, Array3, FloatGrid};

use core::ops::Deref;

pub const META_ORIGIN: &str = "origin";
pub const META_SPACING: &str = "spacing";
pub const META_SHAPE: &str = "shape";

/// Builds a grid from a 3-dimensional `float32` host array.
///
/// Voxels within `tolerance` of `background` are left inactive and uniform 8x8x8 blocks collapse into tiles, so with a nonzero
/// tolerance, densifying the grid again reproduces the array only to within `tolerance`.
///
/// Any dtype other than `Float32` fails with `Error::TypeMismatch` before a grid is allocated.
pub fn from_array(
    array: &HostArray<'_>,
    origin: [f64; 3],
    spacing: [f64; 3],
    background: f32,
    tolerance: f32,
) -> Result<Grid> {
    let values = array.as_f32_slice()?;
    let shape = array.shape3()?;
    let extent =
        extent_for_shape(shape).ok_or_else(|| Error::Shape(format!("{:?} exceeds the index range", shape)))?;
    let dense = Array3::try_new(extent, &values[..])
        .ok_or_else(|| Error::Shape(format!("{:?} does not match {} values", shape, values.len())))?;

    Ok(from_dense(&dense, origin, spacing, background, tolerance))
}

/// Like `from_array`, for an array that is already typed. The array's own extent is ignored; its first value lands on the
/// index-space origin.
pub fn from_dense<Store>(
    dense: &Array3<f32, Store>,
    origin: [f64; 3],
    spacing: [f64; 3],
    background: f32,
    tolerance: f32,
) -> Grid
where
    Store: Deref<Target = [f32]>,
{
    let shape = dense.shape();
    let view = Array3::new(
        Extent3i::from_min_and_shape(Point3i::ZERO, dense.extent().shape),
        dense.values_slice(),
    );

    let mut volume = FloatGrid::new(background);
    copy_from_dense(&view, volume.tree_mut(), tolerance);
    volume.set_transform(
        Transform::linear()
            .post_scale(PointN(spacing))
            .post_translate(PointN(origin)),
    );

    let mut grid = Grid::from_volume(volume);
    let meta = grid.meta_mut();
    meta.insert(META_ORIGIN, Point3d::from(origin));
    meta.insert(META_SPACING, Point3d::from(spacing));
    meta.insert(META_SHAPE, view.extent().shape);

    tracing::debug!(
        "Converted {:?} array into a grid with {} active voxels",
        shape,
        grid.as_volume().active_voxel_count()
    );

    grid
}

/// Densifies `grid` over the box recorded in its `"shape"` metadata. Unstored voxels get the background value.
pub fn to_array(grid: &Grid) -> Result<Array3<f32>> {
    let shape: Point3i = grid.metadata_typed(META_SHAPE)?;
    if shape.0.iter().any(|s| *s < 0) {
        return Err(Error::Shape(format!("negative shape {:?}", shape)));
    }

    let mut dense = Array3::fill(Extent3i::from_min_and_shape(Point3i::ZERO, shape), grid.background());
    copy_to_dense(grid.as_volume().tree(), &mut dense);

    Ok(dense)
}

/// The value of the voxel at index `ijk`, or the background if nothing is stored there.
#[inline]
pub fn probe(grid: &Grid, ijk: [i32; 3]) -> f32 {
    grid.as_volume().tree().get(PointN(ijk))
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;
    use crate::host::DType;

    use imvdb_storage::MetaError;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_values(shape: [usize; 3], seed: u64) -> Vec<f32> {
        let mut rng = StdRng::seed_from_u64(seed);
        let n: usize = shape.iter().product();

        (0..n)
            .map(|_| if rng.gen_bool(0.3) { rng.gen_range(-1.0..1.0) } else { 0.0 })
            .collect()
    }

    #[test]
    fn lossless_round_trip() {
        let shape = [13, 9, 21];
        let values = random_values(shape, 7);
        let grid = from_array(&HostArray::new(&values, &shape), [0.0; 3], [1.0; 3], 0.0, 0.0).unwrap();

        let dense = to_array(&grid).unwrap();
        assert_eq!(dense.shape(), shape);
        assert_eq!(dense.values_slice(), &values[..]);
    }

    #[test]
    fn spatial_metadata_is_attached() {
        let values = vec![1.0f32; 2 * 3 * 4];
        let grid = from_array(
            &HostArray::new(&values, &[2, 3, 4]),
            [1.0, -2.0, 0.5],
            [0.5, 0.5, 2.0],
            0.0,
            0.0,
        )
        .unwrap();

        let meta = grid.metadata();
        assert_eq!(meta["origin"], "[1, -2, 0.5]");
        assert_eq!(meta["spacing"], "[0.5, 0.5, 2]");
        assert_eq!(meta["shape"], "[2, 3, 4]");

        let transform = grid.as_volume().transform();
        assert_eq!(
            transform.voxel_to_world(PointN([1, 2, 3])),
            PointN([1.5, -1.0, 6.5])
        );
    }

    #[test]
    fn integer_arrays_are_rejected() {
        let values = vec![1i32; 8];
        let result = from_array(&HostArray::new(&values, &[2, 2, 2]), [0.0; 3], [1.0; 3], 0.0, 0.0);

        match result {
            Err(Error::TypeMismatch { expected, found }) => {
                assert_eq!(expected, DType::Float32);
                assert_eq!(found, DType::Int32);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn arrays_must_be_3d() {
        let values = vec![1.0f32; 8];
        let result = from_array(&HostArray::new(&values, &[2, 4]), [0.0; 3], [1.0; 3], 0.0, 0.0);

        assert!(matches!(result, Err(Error::Shape(_))));
    }

    #[test]
    fn huge_shapes_are_rejected() {
        let values: Vec<f32> = Vec::new();
        let overflowing = from_array(&HostArray::new(&values, &[usize::MAX, 2, 1]), [0.0; 3], [1.0; 3], 0.0, 0.0);
        assert!(matches!(overflowing, Err(Error::Shape(_))));

        // No values to check against, but the extent can't be indexed with `i32`.
        let unindexable = from_array(&HostArray::new(&values, &[1 << 31, 1, 0]), [0.0; 3], [1.0; 3], 0.0, 0.0);
        assert!(matches!(unindexable, Err(Error::Shape(_))));
    }

    #[test]
    fn to_array_needs_shape_metadata() {
        let grid = Grid::new(0.0);

        match to_array(&grid) {
            Err(Error::MissingMetadata(key)) => assert_eq!(key, "shape"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn to_array_rejects_wrongly_typed_shape() {
        let mut grid = Grid::new(0.0);
        grid.meta_mut().insert(META_SHAPE, "4x4x4");

        match to_array(&grid) {
            Err(Error::Metadata(MetaError::WrongType { key, .. })) => assert_eq!(key, "shape"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn probe_reads_stored_values_and_background() {
        let mut values = vec![0.0f32; 16 * 16 * 16];
        values[(3 * 16 + 4) * 16 + 5] = 2.5;
        let grid = from_array(&HostArray::new(&values, &[16, 16, 16]), [0.0; 3], [1.0; 3], -1.0, 0.0).unwrap();

        assert_eq!(probe(&grid, [3, 4, 5]), 2.5);
        assert_eq!(probe(&grid, [0, 0, 0]), 0.0);
        assert_eq!(probe(&grid, [100, -50, 7]), -1.0);
        assert_eq!(probe(&grid, [-1, 0, 0]), -1.0);
    }

    #[test]
    fn uniform_regions_are_not_stored() {
        let values = vec![0.0f32; 32 * 32 * 32];
        let grid = from_array(&HostArray::new(&values, &[32, 32, 32]), [0.0; 3], [1.0; 3], 0.0, 0.0).unwrap();

        assert!(grid.as_volume().tree().is_empty());
        assert_eq!(to_array(&grid).unwrap().values_slice(), &values[..]);
    }

    proptest! {
        #[test]
        fn tolerance_bounds_round_trip_error(seed in any::<u64>(), tolerance in 0.0f32..0.5) {
            let shape = [10, 12, 9];
            let values = random_values(shape, seed);
            let grid = from_array(&HostArray::new(&values, &shape), [0.0; 3], [1.0; 3], 0.0, tolerance).unwrap();

            let dense = to_array(&grid).unwrap();
            for (a, b) in dense.values_slice().iter().zip(values.iter()) {
                prop_assert!((a - b).abs() <= tolerance);
            }
        }

        #[test]
        fn implicit_voxels_grow_with_tolerance(seed in any::<u64>(), t1 in 0.0f32..0.5, t2 in 0.0f32..0.5) {
            let (low, high) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            let shape = [16, 8, 8];
            let values = random_values(shape, seed);
            let array = HostArray::new(&values, &shape);
            let num_points = values.len() as u64;

            let implicit = |tolerance| {
                let grid = from_array(&array, [0.0; 3], [1.0; 3], 0.0, tolerance).unwrap();
                num_points - grid.as_volume().active_voxel_count()
            };
            prop_assert!(implicit(low) <= implicit(high));
        }
    }
}
