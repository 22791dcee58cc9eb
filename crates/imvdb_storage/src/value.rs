use core::fmt::{Debug, Display};
use serde::{de::DeserializeOwned, Serialize};

/// A scalar that can be stored in a `Tree`.
///
/// `TYPE_NAME` identifies the value type inside of archives, so it must never change for an existing type.
pub trait GridValue:
    num::Float + Debug + Default + Display + DeserializeOwned + Serialize + Send + Sync + 'static
{
    const TYPE_NAME: &'static str;

    fn as_f64(self) -> f64;

    fn from_f64(value: f64) -> Self;

    /// Returns `true` iff `self` and `other` differ by no more than `tolerance`.
    #[inline]
    fn is_approx_equal(self, other: Self, tolerance: Self) -> bool {
        (self - other).abs() <= tolerance
    }
}

impl GridValue for f32 {
    const TYPE_NAME: &'static str = "float";

    #[inline]
    fn as_f64(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl GridValue for f64 {
    const TYPE_NAME: &'static str = "double";

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}
