//! The linear map between index space (voxel coordinates) and world space.
//!
//! A `Transform` is a per-axis scale followed by a translation:
//!
//! ```text
//! world = index * scale + translation
//! ```
//!
//! Like a matrix stack, operations are "post" operations: they are applied after everything already accumulated in the
//! transform. So building a transform for a volume with `spacing` and `origin` reads naturally:
//!
//! ```
//! # use imvdb_core::prelude::*;
//! let t = Transform::linear()
//!     .post_scale(PointN([0.5, 0.5, 2.0]))
//!     .post_translate(PointN([10.0, 0.0, -1.0]));
//!
//! assert_eq!(t.index_to_world(PointN([2.0, 4.0, 1.0])), PointN([11.0, 2.0, 1.0]));
//! ```

use crate::{Point3d, Point3i, PointN};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Transform {
    scale: Point3d,
    translation: Point3d,
}

impl Default for Transform {
    fn default() -> Self {
        Self::linear()
    }
}

impl Transform {
    /// The identity transform.
    #[inline]
    pub const fn linear() -> Self {
        Self {
            scale: PointN([1.0; 3]),
            translation: PointN([0.0; 3]),
        }
    }

    /// A transform with uniform voxel size and no translation.
    #[inline]
    pub fn uniform_scale(voxel_size: f64) -> Self {
        Self::linear().post_scale(Point3d::fill(voxel_size))
    }

    /// Scale the output of this transform by `s`.
    #[inline]
    pub fn post_scale(mut self, s: Point3d) -> Self {
        self.scale = self.scale * s;
        self.translation = self.translation * s;

        self
    }

    /// Translate the output of this transform by `t`.
    #[inline]
    pub fn post_translate(mut self, t: Point3d) -> Self {
        self.translation += t;

        self
    }

    /// The world-space size of a voxel along each axis.
    #[inline]
    pub fn voxel_size(&self) -> Point3d {
        self.scale
    }

    /// The world-space position of the index-space origin.
    #[inline]
    pub fn translation(&self) -> Point3d {
        self.translation
    }

    /// Returns `true` iff all axes share the same voxel size.
    #[inline]
    pub fn has_uniform_scale(&self) -> bool {
        let s = self.scale;

        s.x() == s.y() && s.y() == s.z()
    }

    #[inline]
    pub fn index_to_world(&self, p: Point3d) -> Point3d {
        p * self.scale + self.translation
    }

    #[inline]
    pub fn voxel_to_world(&self, p: Point3i) -> Point3d {
        self.index_to_world(Point3d::from(p))
    }

    #[inline]
    pub fn world_to_index(&self, p: Point3d) -> Point3d {
        (p - self.translation).zip_with(&self.scale, |c, s| c / s)
    }

    /// The voxel nearest to the world-space point `p`.
    #[inline]
    pub fn world_to_index_cell_centered(&self, p: Point3d) -> Point3i {
        self.world_to_index(p).map_components(|c| c.round() as i32)
    }
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

    #[test]
    fn post_scale_applies_after_translation() {
        let t = Transform::linear()
            .post_translate(PointN([1.0, 1.0, 1.0]))
            .post_scale(PointN([2.0, 3.0, 4.0]));

        assert_eq!(t.index_to_world(Point3d::ZERO), PointN([2.0, 3.0, 4.0]));
    }

    #[test]
    fn world_to_index_inverts_index_to_world() {
        let t = Transform::linear()
            .post_scale(PointN([0.25, 2.0, 1.0]))
            .post_translate(PointN([-3.0, 7.5, 0.0]));
        let p = PointN([4.0, -2.0, 9.0]);

        assert_eq!(t.world_to_index(t.index_to_world(p)), p);
        assert_eq!(t.world_to_index_cell_centered(t.voxel_to_world(PointN([4, -2, 9]))), PointN([4, -2, 9]));
    }
}
