//! Storage for sparse volumetric grids.
//!
//! The core types are:
//!   - `Array3`: dense 3-dimensional array, generic over its backing store so borrowed memory can be viewed without copying
//!   - `Tree`: sparse array made of 8x8x8 `LeafNode`s and constant `Tile`s, with a background value everywhere else
//!   - `VolumeGrid`: a `Tree` with a world-space `Transform` and a `MetaMap` of named, typed metadata
//!
//! `copy_from_dense` and `copy_to_dense` move values between the dense and sparse representations. Grids are saved and loaded
//! with the multi-grid archive format in `archive`, after the value types are registered with `registry::initialize`.

#![deny(
    rust_2018_compatibility,
    rust_2018_idioms,
    nonstandard_style,
    unused,
    future_incompatible
)]
#![allow(clippy::type_complexity)]

pub mod archive;
pub mod array;
pub mod bitset;
pub mod compression;
pub mod dense;
pub mod grid;
pub mod indexer;
pub mod metadata;
pub mod registry;
pub mod tree;
pub mod value;

pub use archive::{
    read_grids, write_grids, ArchiveError, ArchiveHeader, ArchiveReader, ArchiveWriter, GridDescriptor,
};
pub use array::{extent_for_shape, Array3, Local, Stride};
pub use bitset::Bitset512;
pub use compression::{BincodeCompression, BytesCompression, Compressed, Compression, Lz4};
pub use dense::{copy_from_dense, copy_to_dense, dense_from_tree};
pub use grid::{DoubleGrid, FloatGrid, GridClass, ParseGridClassError, VolumeGrid};
pub use indexer::{NodeIndexer, LEAF_DIM, LEAF_INDEXER, LEAF_LOG2, LEAF_NUM_VOXELS};
pub use metadata::{MetaError, MetaMap, MetaType, MetaValue};
pub use tree::{LeafNode, Node, Tile, Tree, ValueAccessor};
pub use value::GridValue;

// Hash types to use for small keys like `PointN`.
pub type SmallKeyHashMap<K, V> = ahash::AHashMap<K, V>;
pub type SmallKeyBuildHasher = ahash::RandomState;

pub mod prelude {
    pub use super::{
        copy_from_dense, copy_to_dense, Array3, FloatGrid, GridClass, GridValue, LeafNode, MetaMap, MetaValue,
        Node, Tile, Tree, VolumeGrid,
    };
}
