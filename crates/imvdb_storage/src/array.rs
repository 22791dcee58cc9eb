//! Dense 3-dimensional arrays.
//!
//! The domain of an array is located within index space, the signed integer lattice of `Point3i`. An array contains data at
//! exactly the set of points in its `Extent3i`, and no more.
//!
//! # Layout
//!
//! Values are stored in C order: the last axis varies fastest. For an array with shape `[nx, ny, nz]`, the local point
//! `[x, y, z]` lives at flat offset `(x * ny + y) * nz + z`. This is the layout numeric hosts use for a 3-D buffer indexed as
//! `a[x, y, z]`.
//!
//! # Indexing
//!
//! You can index an array with 3 kinds of coordinates:
//!   - `Stride`: flat array offset
//!   - `Local`: point in extent-local coordinates (i.e. min = `[0, 0, 0]`)
//!   - `Point3i`: point in global (index space) coordinates
//!
//! Indexing assumes that the coordinates are in-bounds of the array, panicking otherwise.
//!
//! # Storage
//!
//! By default, `Array3` uses a `Vec` to store elements. But any type that implements `Deref<Target = [T]>` or
//! `DerefMut<Target = [T]>` should be usable. This means you can wrap memory you don't own without copying it.
//!
//! ```
//! # use imvdb_core::prelude::*;
//! # use imvdb_storage::prelude::*;
//! let extent = Extent3i::from_min_and_shape(Point3i::ZERO, PointN([2, 3, 4]));
//! let data: Vec<f32> = (0..24).map(|i| i as f32).collect();
//!
//! // Borrow `data` for the lifetime of `view`.
//! let view = Array3::new(extent, &data[..]);
//! assert_eq!(view.get(PointN([1, 0, 0])), 12.0);
//! assert_eq!(view.get(PointN([0, 1, 0])), 4.0);
//! assert_eq!(view.get(PointN([0, 0, 1])), 1.0);
//! ```

use imvdb_core::prelude::*;

use core::convert::TryFrom;
use core::ops::{Add, Deref, DerefMut};
use serde::{Deserialize, Serialize};

/// A flat offset into an array's storage.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Stride(pub usize);

impl Add for Stride {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        // Wraps so that negative offsets can be represented with modular arithmetic.
        Stride(self.0.wrapping_add(rhs.0))
    }
}

/// Array-local coordinates.
///
/// Most commonly, you will index an array with a `Point3i`, which is assumed to be in global coordinates. `Local` is a point
/// that has already been translated so that the array's minimum is the origin.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Local(pub Point3i);

/// A map from lattice location `Point3i` to data `T`, stored as a flat C-order array.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Array3<T, Store = Vec<T>> {
    values: Store,
    extent: Extent3i,
    marker: std::marker::PhantomData<T>,
}

impl<T, Store> Array3<T, Store> {
    /// Moves the raw extent and values storage out of `self`.
    #[inline]
    pub fn into_parts(self) -> (Extent3i, Store) {
        (self.extent, self.values)
    }

    #[inline]
    pub fn extent(&self) -> &Extent3i {
        &self.extent
    }

    /// The number of samples along each axis.
    #[inline]
    pub fn shape(&self) -> [usize; 3] {
        let s = self.extent.shape;

        [s.x() as usize, s.y() as usize, s.z() as usize]
    }

    /// Returns `true` iff this array contains point `p`.
    #[inline]
    pub fn contains(&self, p: Point3i) -> bool {
        self.extent.contains(p)
    }

    #[inline]
    pub fn stride_from_local_point(&self, p: Local) -> Stride {
        let s = self.extent.shape;
        let Local(p) = p;

        Stride(((p.x() * s.y() + p.y()) * s.z() + p.z()) as usize)
    }

    #[inline]
    pub fn stride_from_point(&self, p: Point3i) -> Stride {
        self.stride_from_local_point(Local(p - self.extent.minimum))
    }

    /// The stride offsets of each of the given local offsets. Offsets may be negative; strides use wrapping arithmetic.
    pub fn strides_from_local_points(&self, points: &[Local], strides: &mut [Stride]) {
        let s = self.extent.shape;
        for (Local(p), stride) in points.iter().zip(strides.iter_mut()) {
            let offset = (p.x() * s.y() + p.y()) * s.z() + p.z();
            *stride = Stride(offset as isize as usize);
        }
    }
}

impl<T, Store> Array3<T, Store>
where
    Store: Deref<Target = [T]>,
{
    /// Create a new `Array3` directly from the extent and values. This asserts that the number of points in the extent matches
    /// the length of the values.
    pub fn new(extent: Extent3i, values: Store) -> Self {
        assert_eq!(extent.num_points(), values.len());

        Self {
            values,
            extent,
            marker: Default::default(),
        }
    }

    /// Like `new`, but returns `None` when the number of values doesn't match the extent.
    pub fn try_new(extent: Extent3i, values: Store) -> Option<Self> {
        if extent.num_points() != values.len() {
            return None;
        }

        Some(Self::new(extent, values))
    }

    /// Returns the entire slice of values.
    #[inline]
    pub fn values_slice(&self) -> &[T] {
        &self.values
    }

    #[inline]
    pub fn get_ref(&self, p: Point3i) -> &T {
        &self.values[self.stride_from_point(p).0]
    }

    #[inline]
    pub fn get_stride(&self, stride: Stride) -> T
    where
        T: Copy,
    {
        self.values[stride.0]
    }

    #[inline]
    pub fn get(&self, p: Point3i) -> T
    where
        T: Copy,
    {
        *self.get_ref(p)
    }

    /// Calls `visitor` on every point of `extent` that is also inside of this array, in storage order.
    pub fn for_each(&self, extent: &Extent3i, mut visitor: impl FnMut(Point3i, T))
    where
        T: Copy,
    {
        let iter_extent = extent.intersection(&self.extent);
        let min = iter_extent.minimum;
        let lub = iter_extent.least_upper_bound();
        for x in min.x()..lub.x() {
            for y in min.y()..lub.y() {
                let row_start = self.stride_from_point(PointN([x, y, min.z()]));
                for (i, z) in (min.z()..lub.z()).enumerate() {
                    visitor(PointN([x, y, z]), self.values[row_start.0 + i]);
                }
            }
        }
    }
}

impl<T, Store> Array3<T, Store>
where
    Store: DerefMut<Target = [T]>,
{
    /// Returns the entire slice of values.
    #[inline]
    pub fn values_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }

    #[inline]
    pub fn get_mut(&mut self, p: Point3i) -> &mut T {
        let stride = self.stride_from_point(p);

        &mut self.values[stride.0]
    }

    /// Set all points to the same value.
    #[inline]
    pub fn reset_values(&mut self, value: T)
    where
        T: Clone,
    {
        self.values.fill(value);
    }

    /// Calls `visitor` on every point of `extent` that is also inside of this array, in storage order.
    pub fn for_each_mut(&mut self, extent: &Extent3i, mut visitor: impl FnMut(Point3i, &mut T)) {
        let iter_extent = extent.intersection(&self.extent);
        let min = iter_extent.minimum;
        let lub = iter_extent.least_upper_bound();
        for x in min.x()..lub.x() {
            for y in min.y()..lub.y() {
                let row_start = self.stride_from_point(PointN([x, y, min.z()]));
                for (i, z) in (min.z()..lub.z()).enumerate() {
                    visitor(PointN([x, y, z]), &mut self.values[row_start.0 + i]);
                }
            }
        }
    }

    /// Fill all of `extent` (clipped to this array) with the same `value`.
    pub fn fill_extent(&mut self, extent: &Extent3i, value: T)
    where
        T: Clone,
    {
        if self.extent.eq(extent) {
            self.values.fill(value);
        } else {
            self.for_each_mut(extent, |_p, v| *v = value.clone());
        }
    }
}

impl<T> Array3<T> {
    /// Creates an array that fills the entire `extent` with the same `value`.
    pub fn fill(extent: Extent3i, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(extent, vec![value; extent.num_points()])
    }

    /// Create a new array for `extent` where each point's value is determined by the `filler` function.
    pub fn fill_with(extent: Extent3i, mut filler: impl FnMut(Point3i) -> T) -> Self {
        let min = extent.minimum;
        let lub = extent.least_upper_bound();
        let mut values = Vec::with_capacity(extent.num_points());
        for x in min.x()..lub.x() {
            for y in min.y()..lub.y() {
                for z in min.z()..lub.z() {
                    values.push(filler(PointN([x, y, z])));
                }
            }
        }

        Self::new(extent, values)
    }

}

/// The extent of an array with minimum at the origin and the given `shape`, or `None` if some dimension doesn't fit in an
/// `i32`.
#[inline]
pub fn extent_for_shape(shape: [usize; 3]) -> Option<Extent3i> {
    let [x, y, z] = shape;
    let dims = [i32::try_from(x).ok()?, i32::try_from(y).ok()?, i32::try_from(z).ok()?];

    Some(Extent3i::from_min_and_shape(Point3i::ZERO, PointN(dims)))
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
