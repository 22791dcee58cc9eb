use core::ops::{Add, AddAssign, BitAnd, Div, Mul, Neg, Not, Shl, Shr, Sub, SubAssign};
use num::Integer;
use serde::{Deserialize, Serialize};

/// A point on the 3-dimensional lattice (or in continuous space), which is just a primitive array of type `N`.
///
/// ```
/// use imvdb_core::prelude::*;
///
/// let p1 = PointN([1, 2, 3]);
/// let p2 = PointN([3, 4, 5]);
///
/// assert_eq!(p1 + p2, PointN([4, 6, 8]));
/// assert_eq!(p1 - p2, PointN([-2, -2, -2]));
/// assert_eq!(p1 * 2, PointN([2, 4, 6]));
/// ```
///
/// There is also a partial order defined on points which says that a point A is greater than a point B if and only if all of
/// the components of point A are greater than point B. This is how extents check containment.
#[derive(Copy, Clone, Debug, Deserialize, Default, Eq, Hash, PartialEq, Serialize)]
pub struct PointN<N>(pub N);

/// A 3-dimensional point with scalar type `T`.
pub type Point3<T> = PointN<[T; 3]>;
/// A 3-dimensional point with scalar type `i32`. These are the coordinates of voxels in index space.
pub type Point3i = PointN<[i32; 3]>;
/// A 3-dimensional point with scalar type `f32`.
pub type Point3f = PointN<[f32; 3]>;
/// A 3-dimensional point with scalar type `f64`. World space is expressed with these.
pub type Point3d = PointN<[f64; 3]>;

impl<T> Point3<T>
where
    T: Copy,
{
    #[inline]
    pub fn fill(value: T) -> Self {
        PointN([value; 3])
    }

    #[inline]
    pub fn x(&self) -> T {
        self.0[0]
    }

    #[inline]
    pub fn y(&self) -> T {
        self.0[1]
    }

    #[inline]
    pub fn z(&self) -> T {
        self.0[2]
    }

    /// Returns the point after applying `f` component-wise.
    #[inline]
    pub fn map_components<S>(&self, f: impl Fn(T) -> S) -> Point3<S> {
        PointN([f(self.x()), f(self.y()), f(self.z())])
    }

    /// Combines `self` and `other` component-wise with `f`.
    #[inline]
    pub fn zip_with<S, R>(&self, other: &Point3<S>, f: impl Fn(T, S) -> R) -> Point3<R>
    where
        S: Copy,
    {
        PointN([
            f(self.x(), other.x()),
            f(self.y(), other.y()),
            f(self.z(), other.z()),
        ])
    }
}

impl<T> Point3<T>
where
    T: Copy + Add<Output = T> + Mul<Output = T>,
{
    /// The vector dot product.
    #[inline]
    pub fn dot(&self, other: &Self) -> T {
        self.x() * other.x() + self.y() * other.y() + self.z() * other.z()
    }
}

impl<T> Point3<T>
where
    T: Copy + Mul<Output = T> + Sub<Output = T>,
{
    pub fn cross(&self, other: &Self) -> Self {
        PointN([
            self.y() * other.z() - self.z() * other.y(),
            self.z() * other.x() - self.x() * other.z(),
            self.x() * other.y() - self.y() * other.x(),
        ])
    }
}

impl Point3i {
    pub const ZERO: Self = PointN([0; 3]);
    pub const ONES: Self = PointN([1; 3]);
    pub const MIN: Self = PointN([i32::MIN; 3]);
    pub const MAX: Self = PointN([i32::MAX; 3]);

    /// All corners of a unit cube, ordered so that bit `i` of the index selects the offset along axis `i`.
    pub const CUBE_CORNER_OFFSETS: [Self; 8] = [
        PointN([0, 0, 0]),
        PointN([1, 0, 0]),
        PointN([0, 1, 0]),
        PointN([1, 1, 0]),
        PointN([0, 0, 1]),
        PointN([1, 0, 1]),
        PointN([0, 1, 1]),
        PointN([1, 1, 1]),
    ];

    /// [Von Neumann Neighborhood](https://en.wikipedia.org/wiki/Von_Neumann_neighborhood)
    pub const VON_NEUMANN_OFFSETS: [Self; 6] = [
        PointN([-1, 0, 0]),
        PointN([1, 0, 0]),
        PointN([0, -1, 0]),
        PointN([0, 1, 0]),
        PointN([0, 0, -1]),
        PointN([0, 0, 1]),
    ];

    /// The unit vector along `axis`.
    #[inline]
    pub fn axis(axis: usize) -> Self {
        let mut p = Self::ZERO;
        p.0[axis] = 1;

        p
    }

    /// Component-wise maximum.
    #[inline]
    pub fn join(&self, other: Self) -> Self {
        self.zip_with(&other, core::cmp::max)
    }

    /// Component-wise minimum.
    #[inline]
    pub fn meet(&self, other: Self) -> Self {
        self.zip_with(&other, core::cmp::min)
    }

    #[inline]
    pub fn scalar_div_floor(&self, rhs: i32) -> Self {
        self.map_components(|c| Integer::div_floor(&c, &rhs))
    }
}

impl Point3f {
    pub const ZERO: Self = PointN([0.0; 3]);

    #[inline]
    pub fn norm(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Returns the unit vector in the same direction, or zero if the norm is zero.
    pub fn normalized(&self) -> Self {
        let n = self.norm();
        if n > 0.0 {
            *self / n
        } else {
            *self
        }
    }
}

impl Point3d {
    pub const ZERO: Self = PointN([0.0; 3]);
    pub const ONES: Self = PointN([1.0; 3]);

    #[inline]
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }
}

impl From<Point3i> for Point3f {
    #[inline]
    fn from(p: Point3i) -> Self {
        p.map_components(|c| c as f32)
    }
}

impl From<Point3i> for Point3d {
    #[inline]
    fn from(p: Point3i) -> Self {
        p.map_components(f64::from)
    }
}

impl From<Point3f> for Point3d {
    #[inline]
    fn from(p: Point3f) -> Self {
        p.map_components(f64::from)
    }
}

impl<T> From<[T; 3]> for Point3<T> {
    #[inline]
    fn from(a: [T; 3]) -> Self {
        PointN(a)
    }
}

impl<T> From<Point3<T>> for [T; 3] {
    #[inline]
    fn from(p: Point3<T>) -> Self {
        p.0
    }
}

// ██████╗ ██████╗ ███████╗
// ██╔═══██╗██╔══██╗██╔════╝
// ██║   ██║██████╔╝███████╗
// ██║   ██║██╔═══╝ ╚════██║
// ╚██████╔╝██║     ███████║
//  ╚═════╝ ╚═╝     ╚══════╝

impl<T> Add for Point3<T>
where
    T: Copy + Add<Output = T>,
{
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.zip_with(&rhs, |a, b| a + b)
    }
}

impl<T> Sub for Point3<T>
where
    T: Copy + Sub<Output = T>,
{
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.zip_with(&rhs, |a, b| a - b)
    }
}

impl<T> Mul<T> for Point3<T>
where
    T: Copy + Mul<Output = T>,
{
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self {
        self.map_components(|c| c * rhs)
    }
}

/// Component-wise multiplication.
impl<T> Mul for Point3<T>
where
    T: Copy + Mul<Output = T>,
{
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.zip_with(&rhs, |a, b| a * b)
    }
}

impl<T> Div<T> for Point3<T>
where
    T: Copy + Div<Output = T>,
{
    type Output = Self;

    #[inline]
    fn div(self, rhs: T) -> Self {
        self.map_components(|c| c / rhs)
    }
}

impl<T> Neg for Point3<T>
where
    T: Copy + Neg<Output = T>,
{
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        self.map_components(|c| -c)
    }
}

impl<T> AddAssign for Point3<T>
where
    T: Copy + Add<Output = T>,
{
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T> SubAssign for Point3<T>
where
    T: Copy + Sub<Output = T>,
{
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl BitAnd for Point3i {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        self.zip_with(&rhs, |a, b| a & b)
    }
}

impl Not for Point3i {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        self.map_components(|c| !c)
    }
}

impl Shl<i32> for Point3i {
    type Output = Self;

    #[inline]
    fn shl(self, rhs: i32) -> Self {
        self.map_components(|c| c << rhs)
    }
}

impl Shr<i32> for Point3i {
    type Output = Self;

    #[inline]
    fn shr(self, rhs: i32) -> Self {
        self.map_components(|c| c >> rhs)
    }
}

impl<T> PartialOrd for Point3<T>
where
    T: Copy + PartialOrd,
{
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        use core::cmp::Ordering;

        if self == other {
            Some(Ordering::Equal)
        } else if self.lt(other) {
            Some(Ordering::Less)
        } else if self.gt(other) {
            Some(Ordering::Greater)
        } else {
            None
        }
    }

    #[inline]
    fn lt(&self, other: &Self) -> bool {
        self.x() < other.x() && self.y() < other.y() && self.z() < other.z()
    }

    #[inline]
    fn gt(&self, other: &Self) -> bool {
        self.x() > other.x() && self.y() > other.y() && self.z() > other.z()
    }

    #[inline]
    fn le(&self, other: &Self) -> bool {
        self.x() <= other.x() && self.y() <= other.y() && self.z() <= other.z()
    }

    #[inline]
    fn ge(&self, other: &Self) -> bool {
        self.x() >= other.x() && self.y() >= other.y() && self.z() >= other.z()
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
    fn partial_order_is_component_wise() {
        let min = PointN([0, 0, 0]);
        let lub = PointN([3, 3, 3]);

        assert!(min <= PointN([0, 1, 2]) && PointN([0, 1, 2]) < lub);
        assert!(!(PointN([0, 4, 2]) < lub));
        assert_eq!(PointN([1, 0, 0]).partial_cmp(&PointN([0, 1, 0])), None);
    }

    #[test]
    fn shifts_and_masks_floor_negative_coordinates() {
        let mask = !(Point3i::fill(8) - Point3i::ONES);

        assert_eq!(PointN([-1, 7, 9]) & mask, PointN([-8, 0, 8]));
        assert_eq!(PointN([-1, 7, 9]) >> 3, PointN([-1, 0, 1]));
        assert_eq!(PointN([-1, 7, 9]).scalar_div_floor(8), PointN([-1, 0, 1]));
    }

    #[test]
    fn cross_product_follows_right_hand_rule() {
        let x = PointN([1.0f32, 0.0, 0.0]);
        let y = PointN([0.0f32, 1.0, 0.0]);

        assert_eq!(x.cross(&y), PointN([0.0, 0.0, 1.0]));
    }
}
