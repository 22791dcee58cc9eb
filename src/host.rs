//! Borrowed views of untyped numeric buffers owned by the caller.
//!
//! A `HostArray` is how numeric environments hand their arrays to the adapter: raw bytes plus a runtime element type and a
//! shape. Nothing is copied until an operation needs an owned result.
//!
//! ```
//! # use imvdb::host::{DType, HostArray};
//! let data = vec![0.0f32; 2 * 3 * 4];
//! let array = HostArray::new(&data, &[2, 3, 4]);
//! assert_eq!(array.dtype(), DType::Float32);
//! assert_eq!(array.shape3().unwrap(), [2, 3, 4]);
//!
//! let counts = vec![0u16; 8];
//! assert!(HostArray::new(&counts, &[2, 2, 2]).as_f32_slice().is_err());
//! ```

use crate::{Error, Result};

use bytemuck::Pod;
use std::borrow::Cow;
use std::fmt;

/// Element type of a host array, known only at runtime.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DType {
    Float32,
    Float64,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Bool,
}

impl DType {
    pub const fn name(self) -> &'static str {
        match self {
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::UInt8 => "uint8",
            DType::UInt16 => "uint16",
            DType::UInt32 => "uint32",
            DType::UInt64 => "uint64",
            DType::Bool => "bool",
        }
    }

    /// Size of one element in bytes.
    pub const fn item_size(self) -> usize {
        match self {
            DType::Int8 | DType::UInt8 | DType::Bool => 1,
            DType::Int16 | DType::UInt16 => 2,
            DType::Float32 | DType::Int32 | DType::UInt32 => 4,
            DType::Float64 | DType::Int64 | DType::UInt64 => 8,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A plain-old-data element with a known `DType`.
pub trait Element: Pod {
    const DTYPE: DType;
}

macro_rules! impl_element {
    ($t:ty, $dtype:ident) => {
        impl Element for $t {
            const DTYPE: DType = DType::$dtype;
        }
    };
}

impl_element!(f32, Float32);
impl_element!(f64, Float64);
impl_element!(i8, Int8);
impl_element!(i16, Int16);
impl_element!(i32, Int32);
impl_element!(i64, Int64);
impl_element!(u8, UInt8);
impl_element!(u16, UInt16);
impl_element!(u32, UInt32);
impl_element!(u64, UInt64);

/// A borrowed n-dimensional array of any element type, in C order.
#[derive(Clone, Debug)]
pub struct HostArray<'a> {
    bytes: &'a [u8],
    dtype: DType,
    shape: Vec<usize>,
}

impl<'a> HostArray<'a> {
    /// Views a typed slice. The shape is not checked against the length until the array is used.
    pub fn new<E: Element>(data: &'a [E], shape: &[usize]) -> Self {
        Self::from_bytes(bytemuck::cast_slice(data), E::DTYPE, shape)
    }

    /// Views raw bytes in native byte order.
    pub fn from_bytes(bytes: &'a [u8], dtype: DType, shape: &[usize]) -> Self {
        Self {
            bytes,
            dtype,
            shape: shape.to_vec(),
        }
    }

    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// The product of the shape, or `None` if it doesn't fit in a `usize`.
    #[inline]
    pub fn num_elements(&self) -> Option<usize> {
        self.shape.iter().try_fold(1usize, |n, d| n.checked_mul(*d))
    }

    /// The shape of a 3-dimensional array.
    pub fn shape3(&self) -> Result<[usize; 3]> {
        match *self.shape.as_slice() {
            [x, y, z] => Ok([x, y, z]),
            _ => Err(Error::Shape(format!(
                "expected 3 dimensions, found {} ({:?})",
                self.ndim(),
                self.shape
            ))),
        }
    }

    /// The elements as `f32`. Fails with `Error::TypeMismatch` unless the dtype is exactly `Float32`.
    ///
    /// Aligned buffers are borrowed; misaligned ones are copied.
    pub fn as_f32_slice(&self) -> Result<Cow<'a, [f32]>> {
        if self.dtype != DType::Float32 {
            return Err(Error::TypeMismatch {
                expected: DType::Float32,
                found: self.dtype,
            });
        }

        let expected_len = self
            .num_elements()
            .and_then(|n| n.checked_mul(DType::Float32.item_size()))
            .ok_or_else(|| Error::Shape(format!("shape {:?} is too large to address", self.shape)))?;
        if self.bytes.len() != expected_len {
            return Err(Error::Shape(format!(
                "shape {:?} needs {} bytes, buffer has {}",
                self.shape,
                expected_len,
                self.bytes.len()
            )));
        }

        Ok(match bytemuck::try_cast_slice(self.bytes) {
            Ok(values) => Cow::Borrowed(values),
            Err(_) => Cow::Owned(
                self.bytes
                    .chunks_exact(4)
                    .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
        })
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
