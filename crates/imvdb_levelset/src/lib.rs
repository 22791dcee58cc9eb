#![deny(
    rust_2018_compatibility,
    rust_2018_idioms,
    nonstandard_style,
    unused,
    future_incompatible
)]
#![warn(clippy::doc_markdown)]

//! Conversion of density ("fog volume") grids into narrow-band signed distance fields.
//!
//! The surface is where the density crosses an iso value; density above the iso value is inside. The result is a level set
//! grid holding signed world-space distances (negative inside) in a band of `half_width` voxels on either side of the surface.
//! Inside the band, voxels are active. Beyond the band, interior voxels are inactive with value `-background` and exterior
//! voxels are not stored, so they read as `+background`. The background is `half_width * voxel_size`.
//!
//! ```
//! # use imvdb_core::prelude::*;
//! # use imvdb_storage::prelude::*;
//! # use imvdb_levelset::fog_to_sdf;
//! let mut fog = FloatGrid::new(0.0);
//! for p in Extent3i::from_min_and_shape(Point3i::fill(4), Point3i::fill(8)).iter_points() {
//!     fog.tree_mut().set_value_on(p, 1.0);
//! }
//!
//! let sdf = fog_to_sdf(&fog, 0.5);
//! assert_eq!(sdf.grid_class(), GridClass::LevelSet);
//! assert!(sdf.tree().get(Point3i::fill(8)) < 0.0);
//! assert!(sdf.tree().get(Point3i::fill(30)) > 0.0);
//! ```

mod fast_sweeping;

use fast_sweeping::{distance_to_interface, SweepLimits};

use imvdb_storage::{dense_from_tree, Array3, GridClass, GridValue, LeafNode, Tree, VolumeGrid, LEAF_INDEXER};

/// Parameters of the distance computation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FogToSdfSettings {
    /// Half of the narrow band's width, in voxels.
    pub half_width: f32,
    /// Upper limit on passes over the lattice. Each pass sweeps in all 8 axis orderings.
    pub max_sweeps: usize,
    /// Sweeping stops once no distance changes by more than this many voxels in a pass.
    pub convergence: f32,
}

impl Default for FogToSdfSettings {
    fn default() -> Self {
        Self::new(3.0)
    }
}

impl FogToSdfSettings {
    pub const fn new(half_width: f32) -> Self {
        Self {
            half_width,
            max_sweeps: 8,
            convergence: 1e-4,
        }
    }
}

/// Converts `fog` into a level set of the surface where it crosses `iso_value`, using the default settings.
pub fn fog_to_sdf<T: GridValue>(fog: &VolumeGrid<T>, iso_value: T) -> VolumeGrid<T> {
    fog_to_sdf_with(fog, iso_value, FogToSdfSettings::default())
}

/// Converts `fog` into a level set of the surface where it crosses `iso_value`.
///
/// The output shares the transform and metadata of `fog`, with its class set to `GridClass::LevelSet`. `fog` is not modified.
pub fn fog_to_sdf_with<T: GridValue>(
    fog: &VolumeGrid<T>,
    iso_value: T,
    settings: FogToSdfSettings,
) -> VolumeGrid<T> {
    let half_width = settings.half_width.max(1.0);
    let voxel_size = fog.voxel_size();
    if !fog.transform().has_uniform_scale() {
        tracing::warn!(
            "Non-uniform voxel size {:?}; distances are scaled by the X axis only",
            fog.transform().voxel_size()
        );
    }
    if fog.background() > iso_value {
        tracing::warn!(
            "Fog background {} is above the iso value {}; unstored space will read as outside",
            fog.background(),
            iso_value
        );
    }

    let background = T::from_f64(f64::from(half_width) * voxel_size);
    let mut tree = Tree::new(background);
    if !fog.tree().is_empty() {
        // Pad past the band so that the band around stored nodes never touches the array border.
        let pad = half_width.ceil() as i32 + 1;
        let extent = fog.tree().node_bounding_extent().padded(pad);
        let (extent, values) = dense_from_tree(fog.tree(), extent).into_parts();
        let density = Array3::new(extent, values.into_iter().map(|v| v.as_f64() as f32).collect::<Vec<_>>());

        let limits = SweepLimits {
            max_distance: half_width + 1.0,
            max_sweeps: settings.max_sweeps.max(1),
            convergence: settings.convergence,
        };
        let (distance, inside) = distance_to_interface(&density, iso_value.as_f64() as f32, &limits);
        write_narrow_band(&distance, &inside, half_width, voxel_size, &mut tree);

        let num_pruned = tree.prune(T::zero());
        tracing::debug!(
            "Level set has {} leaves, {} tiles ({} pruned) and {} active voxels",
            tree.leaf_count(),
            tree.tile_count(),
            num_pruned,
            tree.active_voxel_count()
        );
    }

    let mut sdf = VolumeGrid::from_parts(tree, *fog.transform(), fog.meta().clone());
    sdf.set_grid_class(GridClass::LevelSet);

    sdf
}

fn write_narrow_band<T: GridValue>(
    distance: &Array3<f32>,
    inside: &[bool],
    half_width: f32,
    voxel_size: f64,
    tree: &mut Tree<T>,
) {
    let background = tree.background();
    for node_min in LEAF_INDEXER.node_mins_for_extent(distance.extent()) {
        let node_extent = LEAF_INDEXER.extent_for_node_with_min(node_min);
        let mut leaf = LeafNode::filled(node_min, background, false);
        distance.for_each(&node_extent, |p, d| {
            let is_inside = inside[distance.stride_from_point(p).0];
            if d < half_width {
                let sign = if is_inside { -1.0 } else { 1.0 };
                leaf.set_value_on(p, T::from_f64(sign * f64::from(d) * voxel_size));
            } else if is_inside {
                leaf.set_value_off(p, -background);
            }
        });

        match leaf.constant_tile(T::zero()) {
            Some(tile) if !tile.active && tile.value == background => (),
            Some(tile) => {
                tree.insert_tile(node_min, tile);
            }
            None => {
                tree.insert_leaf(leaf);
            }
        }
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

    use imvdb_core::prelude::*;
    use imvdb_storage::{copy_from_dense, FloatGrid};
    use pretty_assertions::assert_eq;
    use utilities::data_sets::sphere_fog;

    const RADIUS: f32 = 8.0;
    const EDGE: i32 = 32;

    fn sphere_fog_grid() -> FloatGrid {
        let mut fog = FloatGrid::new(0.0);
        copy_from_dense(&sphere_fog(EDGE, RADIUS), fog.tree_mut(), 0.0);
        fog.set_name("density");
        fog.set_grid_class(GridClass::FogVolume);

        fog
    }

    fn center() -> Point3i {
        Point3i::fill(EDGE / 2)
    }

    #[test]
    fn sphere_fog_becomes_narrow_band_level_set() {
        let fog = sphere_fog_grid();
        let sdf = fog_to_sdf(&fog, 0.5);

        assert_eq!(sdf.grid_class(), GridClass::LevelSet);
        assert_eq!(sdf.background(), 3.0);
        assert_eq!(sdf.name(), "density");

        // Deep inside: inactive, clamped to -background.
        assert_eq!(sdf.tree().probe(center()), (-3.0, false));
        // Far outside: background.
        assert_eq!(sdf.tree().probe(PointN([60, 60, 60])), (3.0, false));

        // Along the X axis the distances should match the analytic sphere.
        for offset in 6..=10 {
            let p = center() + PointN([offset, 0, 0]);
            let (value, active) = sdf.tree().probe(p);
            let expected = offset as f32 - RADIUS;
            assert!(active, "{:?}", p);
            assert!((value - expected).abs() < 0.5, "{:?}: {} vs {}", p, value, expected);
        }
    }

    #[test]
    fn active_voxels_stay_inside_band() {
        let sdf = fog_to_sdf(&sphere_fog_grid(), 0.5);

        let mut num_active = 0;
        sdf.tree().for_each_active(|_p, v| {
            assert!(v.abs() < 3.0);
            num_active += 1;
        });
        assert!(num_active > 0);
        assert_eq!(num_active, sdf.active_voxel_count());
    }

    #[test]
    fn input_grid_is_unchanged() {
        let fog = sphere_fog_grid();
        let before = fog.clone();
        let _ = fog_to_sdf(&fog, 0.5);

        assert_eq!(fog, before);
    }

    #[test]
    fn distances_are_in_world_units() {
        let mut fog = sphere_fog_grid();
        fog.set_transform(Transform::uniform_scale(0.5).post_translate(PointN([1.0, 2.0, 3.0])));

        let sdf = fog_to_sdf(&fog, 0.5);
        assert_eq!(sdf.transform(), fog.transform());
        assert_eq!(sdf.background(), 1.5);

        let (value, active) = sdf.tree().probe(center() + PointN([10, 0, 0]));
        assert!(active);
        assert!((value - 1.0).abs() < 0.25);
    }

    #[test]
    fn wider_band_keeps_more_active_voxels() {
        let fog = sphere_fog_grid();
        let narrow = fog_to_sdf_with(&fog, 0.5, FogToSdfSettings::new(2.0));
        let wide = fog_to_sdf_with(&fog, 0.5, FogToSdfSettings::new(5.0));

        assert_eq!(wide.background(), 5.0);
        assert!(wide.active_voxel_count() > narrow.active_voxel_count());
    }

    #[test]
    fn empty_fog_gives_empty_level_set() {
        let fog = FloatGrid::new(0.0);
        let sdf = fog_to_sdf(&fog, 0.5);

        assert!(sdf.tree().is_empty());
        assert_eq!(sdf.grid_class(), GridClass::LevelSet);
        assert_eq!(sdf.tree().get(Point3i::ZERO), 3.0);
    }
}
