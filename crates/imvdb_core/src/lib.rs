//! The core data types for sparse volumes on the 3D integer lattice:
//! - `PointN`: a 3-dimensional point, most importantly `Point3i` (index space) and `Point3d` (world space)
//! - `ExtentN`: an axis-aligned box of lattice points, most importantly `Extent3i`
//! - `Transform`: the linear map from index space to world space

#![deny(
    rust_2018_compatibility,
    rust_2018_idioms,
    nonstandard_style,
    unused,
    future_incompatible
)]
#![warn(clippy::doc_markdown)]

pub mod extent;
pub mod point;
pub mod transform;

pub use extent::{bounding_extent, Extent3, Extent3PointIter, Extent3i, ExtentN};
pub use point::{Point3, Point3d, Point3f, Point3i, PointN};
pub use transform::Transform;

pub use num;

pub mod prelude {
    pub use super::{
        Extent3, Extent3i, ExtentN, Point3, Point3d, Point3f, Point3i, PointN, Transform,
    };
}
