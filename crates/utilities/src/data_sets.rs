use imvdb_core::prelude::*;
use imvdb_storage::Array3;

// Crates can't use these in their own unit tests, because a dev-dependency cycle compiles a second copy of the crate:
// https://github.com/rust-lang/cargo/issues/6765

/// A cubic array with minimum at the origin and the given edge length.
pub fn cube_extent(array_edge_length: i32) -> Extent3i {
    Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::fill(array_edge_length))
}

/// Signed distance (in voxels) to a sphere of `radius` centered in a cubic array. Negative inside.
pub fn sphere_sdf(array_edge_length: i32, radius: f32) -> Array3<f32> {
    let center = Point3f::fill(array_edge_length as f32 / 2.0);

    Array3::fill_with(cube_extent(array_edge_length), |p| {
        (Point3f::from(p) - center).norm() - radius
    })
}

/// Density of a sphere of `radius` centered in a cubic array: 1 inside, 0 outside, with a linear ramp one voxel wide across
/// the surface.
pub fn sphere_fog(array_edge_length: i32, radius: f32) -> Array3<f32> {
    let sdf = sphere_sdf(array_edge_length, radius);
    let (extent, values) = sdf.into_parts();

    Array3::new(
        extent,
        values
            .into_iter()
            .map(|d| (0.5 - d).max(0.0).min(1.0))
            .collect::<Vec<_>>(),
    )
}

/// Signed distance (in voxels, max norm) to the box `[cube_min, cube_max]` over `array_extent`. Negative inside.
pub fn cube_sdf(array_extent: Extent3i, cube_min: Point3f, cube_max: Point3f) -> Array3<f32> {
    let center = (cube_min + cube_max) / 2.0;
    let half = (cube_max - cube_min) / 2.0;

    Array3::fill_with(array_extent, |p| {
        let q = Point3f::from(p) - center;
        let d = q.zip_with(&half, |c, h| c.abs() - h);

        d.x().max(d.y()).max(d.z())
    })
}
