#![allow(clippy::type_complexity, clippy::too_many_arguments)]
#![deny(
    rust_2018_compatibility,
    rust_2018_idioms,
    nonstandard_style,
    unused,
    future_incompatible
)]
#![warn(clippy::doc_markdown)]

//! Isosurface extraction from sparse volumetric grids.
//!
//! `volume_to_mesh` dual contours a `VolumeGrid` at an iso value. Every cell (unit cube of 8 lattice samples) that the surface
//! passes through gets one vertex, and every lattice edge that crosses the surface gets one quad joining the vertices of the 4
//! cells around it. With nonzero adaptivity, vertices in flat regions are merged, which turns some quads into triangles.

mod adaptivity;
mod stl;
mod surface_nets;

pub use stl::{write_stl, write_stl_to};
pub use surface_nets::{extract_surface, SurfaceBuffer};

use imvdb_storage::{GridValue, VolumeGrid};

/// Mesh extraction parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshSettings {
    /// The field value where the surface lies.
    pub iso_value: f32,
    /// From 0 (uniform mesh) to 1 (most aggressive merging of vertices in flat regions).
    pub adaptivity: f32,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl MeshSettings {
    pub const fn new(iso_value: f32) -> Self {
        Self {
            iso_value,
            adaptivity: 0.0,
        }
    }

    pub const fn with_adaptivity(self, adaptivity: f32) -> Self {
        Self {
            iso_value: self.iso_value,
            adaptivity,
        }
    }
}

/// A mesh of triangles and quads in world space. Faces are wound counter-clockwise when viewed from outside the surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriQuadMesh {
    pub points: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
    pub quads: Vec<[u32; 4]>,
}

/// A mesh of only quads in world space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuadMesh {
    pub points: Vec<[f32; 3]>,
    pub quads: Vec<[u32; 4]>,
}

impl TriQuadMesh {
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty() && self.quads.is_empty()
    }

    pub fn num_faces(&self) -> usize {
        self.triangles.len() + self.quads.len()
    }

    /// Every face as triangles. Quads are split along the `[0, 2]` diagonal.
    pub fn triangulate(&self) -> Vec<[u32; 3]> {
        let mut triangles = self.triangles.clone();
        for [a, b, c, d] in self.quads.iter().cloned() {
            triangles.push([a, b, c]);
            triangles.push([a, c, d]);
        }

        triangles
    }

    /// The minimum and maximum of all points, or `None` for a mesh without points.
    pub fn bounding_box(&self) -> Option<([f32; 3], [f32; 3])> {
        bounding_box(&self.points)
    }
}

impl QuadMesh {
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn bounding_box(&self) -> Option<([f32; 3], [f32; 3])> {
        bounding_box(&self.points)
    }
}

impl From<QuadMesh> for TriQuadMesh {
    fn from(mesh: QuadMesh) -> Self {
        Self {
            points: mesh.points,
            triangles: Vec::new(),
            quads: mesh.quads,
        }
    }
}

fn bounding_box(points: &[[f32; 3]]) -> Option<([f32; 3], [f32; 3])> {
    let first = *points.first()?;

    Some(points.iter().fold((first, first), |(mut min, mut max), p| {
        for i in 0..3 {
            min[i] = min[i].min(p[i]);
            max[i] = max[i].max(p[i]);
        }
        (min, max)
    }))
}

/// Extracts the isosurface of `grid` at `settings.iso_value`, merging vertices according to `settings.adaptivity`.
pub fn volume_to_mesh<T>(grid: &VolumeGrid<T>, settings: MeshSettings) -> TriQuadMesh
where
    T: GridValue,
{
    volume_to_mesh_with_buffer(grid, settings, &mut SurfaceBuffer::default())
}

/// Like `volume_to_mesh`, but reuses the memory of `buffer`. The returned mesh owns its data.
pub fn volume_to_mesh_with_buffer<T>(
    grid: &VolumeGrid<T>,
    settings: MeshSettings,
    buffer: &mut SurfaceBuffer,
) -> TriQuadMesh
where
    T: GridValue,
{
    extract_surface(grid, settings.iso_value, buffer);

    let adaptivity = settings.adaptivity.max(0.0).min(1.0);
    let mesh = if adaptivity > 0.0 {
        adaptivity::merge_flat_regions(buffer, adaptivity)
    } else {
        TriQuadMesh {
            points: buffer.positions.clone(),
            triangles: Vec::new(),
            quads: buffer.quads.clone(),
        }
    };

    tracing::debug!(
        "Extracted {} points, {} triangles, {} quads (adaptivity {})",
        mesh.points.len(),
        mesh.triangles.len(),
        mesh.quads.len(),
        adaptivity
    );

    mesh
}

/// Extracts the isosurface of `grid` at `iso_value` as a uniform quad mesh.
pub fn volume_to_quad_mesh<T>(grid: &VolumeGrid<T>, iso_value: f32) -> QuadMesh
where
    T: GridValue,
{
    let mut buffer = SurfaceBuffer::default();
    extract_surface(grid, iso_value, &mut buffer);

    QuadMesh {
        points: std::mem::take(&mut buffer.positions),
        quads: std::mem::take(&mut buffer.quads),
    }
}
