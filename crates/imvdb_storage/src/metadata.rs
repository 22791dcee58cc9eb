//! String-keyed grid metadata with typed values.

use imvdb_core::prelude::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A tagged union of every metadata value type.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum MetaValue {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    String(String),
    Vec3i(Point3i),
    Vec3d(Point3d),
}

impl MetaValue {
    /// The name of this value's type, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            MetaValue::Bool(_) => "bool",
            MetaValue::Int32(_) => "int32",
            MetaValue::Int64(_) => "int64",
            MetaValue::Float(_) => "float",
            MetaValue::Double(_) => "double",
            MetaValue::String(_) => "string",
            MetaValue::Vec3i(_) => "vec3i",
            MetaValue::Vec3d(_) => "vec3d",
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Bool(v) => write!(f, "{}", v),
            MetaValue::Int32(v) => write!(f, "{}", v),
            MetaValue::Int64(v) => write!(f, "{}", v),
            MetaValue::Float(v) => write!(f, "{}", v),
            MetaValue::Double(v) => write!(f, "{}", v),
            MetaValue::String(v) => f.write_str(v),
            MetaValue::Vec3i(PointN([x, y, z])) => write!(f, "[{}, {}, {}]", x, y, z),
            MetaValue::Vec3d(PointN([x, y, z])) => write!(f, "[{}, {}, {}]", x, y, z),
        }
    }
}

macro_rules! impl_meta_type {
    ($t:ty, $variant:ident, $type_name:expr) => {
        impl From<$t> for MetaValue {
            #[inline]
            fn from(value: $t) -> Self {
                MetaValue::$variant(value)
            }
        }

        impl MetaType for $t {
            const TYPE_NAME: &'static str = $type_name;

            #[inline]
            fn from_meta(value: &MetaValue) -> Option<Self> {
                match value {
                    MetaValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

/// A Rust type that corresponds to exactly one `MetaValue` variant.
pub trait MetaType: Sized + Into<MetaValue> {
    const TYPE_NAME: &'static str;

    fn from_meta(value: &MetaValue) -> Option<Self>;
}

impl_meta_type!(bool, Bool, "bool");
impl_meta_type!(i32, Int32, "int32");
impl_meta_type!(i64, Int64, "int64");
impl_meta_type!(f32, Float, "float");
impl_meta_type!(f64, Double, "double");
impl_meta_type!(String, String, "string");
impl_meta_type!(Point3i, Vec3i, "vec3i");
impl_meta_type!(Point3d, Vec3d, "vec3d");

impl From<&str> for MetaValue {
    #[inline]
    fn from(value: &str) -> Self {
        MetaValue::String(value.to_owned())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum MetaError {
    #[error("no metadata named \"{0}\"")]
    Missing(String),
    #[error("metadata \"{key}\" has type {found}, expected {expected}")]
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// An ordered map from metadata names to values.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct MetaMap {
    entries: BTreeMap<String, MetaValue>,
}

impl MetaMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Option<MetaValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<MetaValue> {
        self.entries.remove(key)
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.get(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The value under `key` as a `V`.
    pub fn get_typed<V: MetaType>(&self, key: &str) -> Result<V, MetaError> {
        let value = self
            .entries
            .get(key)
            .ok_or_else(|| MetaError::Missing(key.to_owned()))?;

        V::from_meta(value).ok_or_else(|| MetaError::WrongType {
            key: key.to_owned(),
            expected: V::TYPE_NAME,
            found: value.type_name(),
        })
    }

    /// Like `get_typed`, but a missing key is `Ok(None)`.
    pub fn get_typed_opt<V: MetaType>(&self, key: &str) -> Result<Option<V>, MetaError> {
        match self.get_typed(key) {
            Ok(v) => Ok(Some(v)),
            Err(MetaError::Missing(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every entry rendered with `MetaValue`'s `Display`.
    pub fn to_string_map(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
