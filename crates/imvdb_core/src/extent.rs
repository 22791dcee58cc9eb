use crate::{Point3, Point3i, PointN};

use core::ops::{Add, Range, Sub};
use itertools::{iproduct, ConsTuples, Product};
use serde::{Deserialize, Serialize};

/// An axis-aligned box on the lattice. This is mathematically the Cartesian product of a half-closed interval `[a, b)` in each
/// dimension. When doing queries against grids and arrays, this is the primary structure used to determine the bounds of your
/// query.
#[derive(Copy, Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ExtentN<N> {
    /// The least point contained in the extent.
    pub minimum: PointN<N>,
    /// The length of each dimension.
    pub shape: PointN<N>,
}

/// A 3-dimensional extent with scalar type `T`.
pub type Extent3<T> = ExtentN<[T; 3]>;
/// A 3-dimensional extent with scalar type `i32`.
pub type Extent3i = ExtentN<[i32; 3]>;

impl<N> ExtentN<N> {
    /// The default representation of an extent as the minimum point and shape.
    #[inline]
    pub const fn from_min_and_shape(minimum: PointN<N>, shape: PointN<N>) -> Self {
        Self { minimum, shape }
    }
}

impl Extent3i {
    /// An alternative representation of an extent as the minimum point and least upper bound.
    #[inline]
    pub fn from_min_and_lub(minimum: Point3i, least_upper_bound: Point3i) -> Self {
        // We want to avoid negative shape components.
        let shape = (least_upper_bound - minimum).join(Point3i::ZERO);

        Self { minimum, shape }
    }

    /// An alternative representation of an integer extent as the minimum point and maximum point. This only works for integer
    /// extents, where there is a unique maximum point.
    #[inline]
    pub fn from_min_and_max(minimum: Point3i, max: Point3i) -> Self {
        Self::from_min_and_lub(minimum, max + Point3i::ONES)
    }

    /// The least point `p` for which all points `q` in the extent satisfy `q < p`.
    #[inline]
    pub fn least_upper_bound(&self) -> Point3i {
        self.minimum + self.shape
    }

    /// The unique greatest point in the extent.
    #[inline]
    pub fn max(&self) -> Point3i {
        self.least_upper_bound() - Point3i::ONES
    }

    /// The number of points contained in the extent.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.shape.0.iter().map(|c| (*c).max(0) as usize).product()
    }

    /// Returns `true` iff the number of points in the extent is 0.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_points() == 0
    }

    /// Returns `true` iff the point `p` is contained in this extent.
    #[inline]
    pub fn contains(&self, p: Point3i) -> bool {
        self.minimum <= p && p < self.least_upper_bound()
    }

    /// Returns the extent containing only the points in both `self` and `other`.
    #[inline]
    pub fn intersection(&self, other: &Self) -> Self {
        let minimum = self.minimum.join(other.minimum);
        let lub = self.least_upper_bound().meet(other.least_upper_bound());

        Self::from_min_and_lub(minimum, lub)
    }

    /// The smallest extent containing both `self` and `other`. Empty extents are ignored.
    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }

        Self::from_min_and_lub(
            self.minimum.meet(other.minimum),
            self.least_upper_bound().join(other.least_upper_bound()),
        )
    }

    /// Returns a new extent that's been padded on all borders by `pad_amount`.
    #[inline]
    pub fn padded(&self, pad_amount: i32) -> Self {
        Self::from_min_and_shape(
            self.minimum - Point3i::fill(pad_amount),
            self.shape + Point3i::fill(2 * pad_amount),
        )
    }

    /// Iterate over all points in the extent, with X varying fastest.
    /// ```
    /// # use imvdb_core::prelude::*;
    /// #
    /// let extent = Extent3i::from_min_and_shape(PointN([0, 0, 0]), PointN([2, 2, 1]));
    /// let points = extent.iter_points().collect::<Vec<_>>();
    /// assert_eq!(points, vec![
    ///     PointN([0, 0, 0]), PointN([1, 0, 0]), PointN([0, 1, 0]), PointN([1, 1, 0])
    /// ]);
    /// ```
    #[inline]
    pub fn iter_points(&self) -> Extent3PointIter<i32> {
        let lub = self.least_upper_bound();

        Extent3PointIter {
            // iproduct is opposite of the order we want.
            product_iter: iproduct!(
                self.minimum.z()..lub.z(),
                self.minimum.y()..lub.y(),
                self.minimum.x()..lub.x()
            ),
        }
    }
}

impl<T> Add<Point3<T>> for Extent3<T>
where
    T: Copy + Add<Output = T>,
{
    type Output = Self;

    /// Translates the extent.
    #[inline]
    fn add(self, rhs: Point3<T>) -> Self {
        Self::from_min_and_shape(self.minimum + rhs, self.shape)
    }
}

impl<T> Sub<Point3<T>> for Extent3<T>
where
    T: Copy + Sub<Output = T>,
{
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Point3<T>) -> Self {
        Self::from_min_and_shape(self.minimum - rhs, self.shape)
    }
}

/// An iterator over all points in an `Extent3<T>`.
pub struct Extent3PointIter<T>
where
    T: Clone,
    Range<T>: Iterator<Item = T>,
{
    product_iter: ConsTuples<RangeProduct3<T>, ((T, T), T)>,
}

type RangeProduct2<T> = Product<Range<T>, Range<T>>;
type RangeProduct3<T> = Product<RangeProduct2<T>, Range<T>>;

impl<T> Iterator for Extent3PointIter<T>
where
    T: Clone,
    Range<T>: Iterator<Item = T>,
{
    type Item = Point3<T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.product_iter.next().map(|(z, y, x)| PointN([x, y, z]))
    }
}

/// Returns the smallest extent containing all of the given points.
pub fn bounding_extent(points: impl Iterator<Item = Point3i>) -> Extent3i {
    let mut min_point = Point3i::MAX;
    let mut max_point = Point3i::MIN;
    let mut any = false;
    for p in points {
        any = true;
        min_point = min_point.meet(p);
        max_point = max_point.join(p);
    }

    if any {
        Extent3i::from_min_and_max(min_point, max_point)
    } else {
        Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::ZERO)
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

    use pretty_assertions::assert_eq;

    #[test]
    fn row_major_extent_iter() {
        let extent = Extent3i::from_min_and_shape(PointN([0, 0, 0]), PointN([2, 2, 2]));

        let points: Vec<_> = extent.iter_points().collect();

        assert_eq!(
            points,
            vec![
                PointN([0, 0, 0]),
                PointN([1, 0, 0]),
                PointN([0, 1, 0]),
                PointN([1, 1, 0]),
                PointN([0, 0, 1]),
                PointN([1, 0, 1]),
                PointN([0, 1, 1]),
                PointN([1, 1, 1]),
            ]
        );
    }

    #[test]
    fn disjoint_intersection_is_empty() {
        let a = Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::fill(4));
        let b = Extent3i::from_min_and_shape(Point3i::fill(10), Point3i::fill(4));

        assert!(a.intersection(&b).is_empty());
        assert_eq!(a.union(&b), Extent3i::from_min_and_max(Point3i::ZERO, Point3i::fill(13)));
    }

    #[test]
    fn bounding_extent_of_no_points_is_empty() {
        assert!(bounding_extent(std::iter::empty()).is_empty());

        let e = bounding_extent(vec![PointN([1, -2, 3]), PointN([-1, 5, 0])].into_iter());
        assert_eq!(e.minimum, PointN([-1, -2, 0]));
        assert_eq!(e.max(), PointN([1, 5, 3]));
    }
}
