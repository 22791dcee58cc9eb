//! Whole-grid operations: level sets, meshing and archives.

use crate::{Grid, Result};

use imvdb_mesh::{MeshSettings, QuadMesh, TriQuadMesh};
use imvdb_storage::{read_grids, registry, write_grids, FloatGrid};

use std::path::Path;

/// A new level set grid for the surface where the density of `grid` crosses `iso_value`. `grid` itself is not modified.
pub fn fog_to_sdf(grid: &Grid, iso_value: f32) -> Grid {
    Grid::from_volume(imvdb_levelset::fog_to_sdf(grid.as_volume(), iso_value))
}

/// Extracts the `iso_value` surface as triangles and quads in world space. An `adaptivity` above 0 merges vertices in flat
/// regions.
pub fn volume_to_mesh(grid: &Grid, iso_value: f32, adaptivity: f32) -> TriQuadMesh {
    imvdb_mesh::volume_to_mesh(
        grid.as_volume(),
        MeshSettings::new(iso_value).with_adaptivity(adaptivity),
    )
}

/// Extracts the `iso_value` surface as quads in world space.
pub fn volume_to_quad_mesh(grid: &Grid, iso_value: f32) -> QuadMesh {
    imvdb_mesh::volume_to_quad_mesh(grid.as_volume(), iso_value)
}

/// Writes all of `grids` into one archive at `path`, replacing any existing file.
pub fn write(grids: &[&Grid], path: impl AsRef<Path>) -> Result<()> {
    registry::initialize();

    let volumes: Vec<&FloatGrid> = grids.iter().map(|g| g.as_volume()).collect();
    write_grids(path, &volumes)?;

    Ok(())
}

/// Reads every grid out of the archive at `path`.
pub fn read(path: impl AsRef<Path>) -> Result<Vec<Grid>> {
    registry::initialize();

    Ok(read_grids::<f32>(path)?
        .into_iter()
        .map(Grid::from_volume)
        .collect())
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
