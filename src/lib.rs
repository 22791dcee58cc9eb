//! Convert dense 3D image arrays to and from sparse volumetric grids.
//!
//! The adapter works with two kinds of data:
//! - a dense array of `f32` samples with an origin and a spacing, either borrowed from the caller as a [`HostArray`] with a
//!   runtime element type, or already typed as an `Array3`
//! - a [`Grid`], which owns a sparse `f32` volume: a tree of 8x8x8 leaves and constant tiles over a background value, plus a
//!   world-space transform and named metadata
//!
//! On top of that conversion it offers a fixed set of whole-grid operations: point probes, fog volume to signed distance
//! conversion, isosurface meshing and multi-grid archives.
//!
//! ```
//! use imvdb::{from_array, probe, to_array, HostArray};
//!
//! let mut values = vec![0.0f32; 16 * 16 * 16];
//! values[0] = 1.0;
//! let grid = from_array(&HostArray::new(&values, &[16, 16, 16]), [0.0; 3], [1.0; 3], 0.0, 0.0)?;
//!
//! assert_eq!(probe(&grid, [0, 0, 0]), 1.0);
//! assert_eq!(probe(&grid, [1000, 0, 0]), 0.0);
//! assert_eq!(to_array(&grid)?.values_slice(), &values[..]);
//! # Ok::<(), imvdb::Error>(())
//! ```
//!
//! The engine lives in separate crates:
//! - **core**: lattice points, extents and transforms
//! - **storage**: sparse trees, dense arrays, metadata and archives
//! - **mesh**: isosurface extraction
//! - **levelset**: narrow-band signed distance fields

#![deny(
    rust_2018_compatibility,
    rust_2018_idioms,
    nonstandard_style,
    unused,
    future_incompatible
)]
#![warn(clippy::doc_markdown)]

pub mod host;

mod convert;
mod error;
mod grid;
mod ops;
mod workflow;

pub use convert::{from_array, from_dense, probe, to_array, META_ORIGIN, META_SHAPE, META_SPACING};
pub use error::{Error, Result};
pub use grid::Grid;
pub use host::{DType, HostArray};
pub use ops::{fog_to_sdf, read, volume_to_mesh, volume_to_quad_mesh, write};
pub use workflow::{array_from_grid, fog_volume_from_array, level_set_from_array, normalized, ArrayGridSettings};

pub use imvdb_core as core;
pub use imvdb_levelset as levelset;
pub use imvdb_mesh as mesh;
pub use imvdb_storage as storage;

pub use imvdb_mesh::{write_stl, QuadMesh, TriQuadMesh};
pub use imvdb_storage::GridClass;

/// Registers the grid value types with the archive codec. Every entry point of this crate already does this, so it only
/// matters when using the storage crate directly.
#[inline]
pub fn initialize() {
    imvdb_storage::registry::initialize();
}

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::storage::prelude::*;
    pub use super::{Grid, HostArray};
}
