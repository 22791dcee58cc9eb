//! Shortcuts for the usual image-to-volume pipeline.

use crate::convert::{from_array, to_array, META_ORIGIN, META_SPACING};
use crate::host::{DType, HostArray};
use crate::{Error, Grid, Result};

use imvdb_core::prelude::*;
use imvdb_storage::{extent_for_shape, Array3, GridClass};

/// Placement and sparsity parameters for `fog_volume_from_array` and `level_set_from_array`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrayGridSettings {
    pub origin: [f64; 3],
    pub spacing: [f64; 3],
    pub background: f32,
    pub tolerance: f32,
}

impl Default for ArrayGridSettings {
    fn default() -> Self {
        Self {
            origin: [0.0; 3],
            spacing: [1.0; 3],
            background: 0.0,
            tolerance: 0.0,
        }
    }
}

impl ArrayGridSettings {
    pub fn with_origin(self, origin: [f64; 3]) -> Self {
        Self { origin, ..self }
    }

    pub fn with_spacing(self, spacing: [f64; 3]) -> Self {
        Self { spacing, ..self }
    }
}

fn classified_grid(array: &HostArray<'_>, settings: &ArrayGridSettings, class: GridClass) -> Result<Grid> {
    let mut grid = from_array(
        array,
        settings.origin,
        settings.spacing,
        settings.background,
        settings.tolerance,
    )?;
    grid.set_grid_class(class);

    Ok(grid)
}

/// `from_array`, then marks the grid as a fog volume.
pub fn fog_volume_from_array(array: &HostArray<'_>, settings: &ArrayGridSettings) -> Result<Grid> {
    classified_grid(array, settings, GridClass::FogVolume)
}

/// `from_array`, then marks the grid as a level set.
pub fn level_set_from_array(array: &HostArray<'_>, settings: &ArrayGridSettings) -> Result<Grid> {
    classified_grid(array, settings, GridClass::LevelSet)
}

/// Densifies `grid` and returns the array with the origin and spacing it was created with.
pub fn array_from_grid(grid: &Grid) -> Result<(Array3<f32>, [f64; 3], [f64; 3])> {
    let origin: Point3d = grid.metadata_typed(META_ORIGIN)?;
    let spacing: Point3d = grid.metadata_typed(META_SPACING)?;

    Ok((to_array(grid)?, origin.0, spacing.0))
}

/// Rescales a `float32` array so that `range.0` maps to 0 and `range.1` maps to 1, clamping values outside of that.
///
/// The range is first clipped to the array's own minimum and maximum. 1-dimensional arrays of shape `[n]` are treated as
/// `[n, 1, 1]` and 2-dimensional arrays of shape `[n, m]` as `[n, 1, m]`. An array whose clipped range is empty maps to all
/// zeros.
pub fn normalized(array: &HostArray<'_>, range: (f32, f32)) -> Result<Array3<f32>> {
    let values = array.as_f32_slice()?;
    let shape = match *array.shape() {
        [n] => [n, 1, 1],
        [n, m] => [n, 1, m],
        [x, y, z] => [x, y, z],
        _ => {
            return Err(Error::Shape(format!(
                "can't normalize an array with {} dimensions",
                array.ndim()
            )))
        }
    };

    let (data_min, data_max) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let lo = range.0.max(data_min);
    let hi = range.1.min(data_max);
    let normalized: Vec<f32> = if hi > lo {
        values
            .iter()
            .map(|v| ((v - lo) / (hi - lo)).max(0.0).min(1.0))
            .collect()
    } else {
        vec![0.0; values.len()]
    };

    let extent =
        extent_for_shape(shape).ok_or_else(|| Error::Shape(format!("{:?} exceeds the index range", shape)))?;
    Array3::try_new(extent, normalized).ok_or_else(|| {
        Error::Shape(format!(
            "shape {:?} doesn't match {} {} values",
            array.shape(),
            values.len(),
            DType::Float32
        ))
    })
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
    fn helpers_set_the_grid_class() {
        let values = vec![0.25f32; 27];
        let array = HostArray::new(&values, &[3, 3, 3]);
        let settings = ArrayGridSettings::default();

        let fog = fog_volume_from_array(&array, &settings).unwrap();
        let level_set = level_set_from_array(&array, &settings).unwrap();

        assert_eq!(fog.grid_class(), GridClass::FogVolume);
        assert_eq!(level_set.grid_class(), GridClass::LevelSet);
        assert_eq!(fog.background(), 0.0);
    }

    #[test]
    fn array_from_grid_returns_placement() {
        let values: Vec<f32> = (0..24).map(|i| i as f32).collect();
        let settings = ArrayGridSettings::default()
            .with_origin([-1.0, 2.0, 3.5])
            .with_spacing([0.25, 0.5, 1.0]);
        let grid = fog_volume_from_array(&HostArray::new(&values, &[4, 3, 2]), &settings).unwrap();

        let (dense, origin, spacing) = array_from_grid(&grid).unwrap();
        assert_eq!(dense.values_slice(), &values[..]);
        assert_eq!(origin, [-1.0, 2.0, 3.5]);
        assert_eq!(spacing, [0.25, 0.5, 1.0]);
    }

    #[test]
    fn array_from_grid_needs_origin() {
        assert!(matches!(
            array_from_grid(&Grid::new(0.0)),
            Err(Error::MissingMetadata(key)) if key == "origin"
        ));
    }

    #[test]
    fn normalization_clips_range_to_data() {
        let values = vec![1000.0f32, 1500.0, 2000.0, 500.0, 3500.0, 2500.0];
        let array = HostArray::new(&values, &[6]);

        let n = normalized(&array, (1000.0, 3000.0)).unwrap();
        assert_eq!(n.shape(), [6, 1, 1]);
        assert_eq!(n.values_slice(), &[0.0, 0.25, 0.5, 0.0, 1.0, 0.75]);

        // The requested range is wider than the data, so the data's own range is used.
        let n = normalized(&array, (f32::NEG_INFINITY, f32::INFINITY)).unwrap();
        assert_eq!(n.values_slice()[3], 0.0);
        assert_eq!(n.values_slice()[4], 1.0);
    }

    #[test]
    fn normalization_of_2d_inserts_middle_axis() {
        let values = vec![0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0];
        let n = normalized(&HostArray::new(&values, &[2, 3]), (0.0, 5.0)).unwrap();

        assert_eq!(n.shape(), [2, 1, 3]);
        assert_eq!(n.get(PointN([1, 0, 2])), 1.0);
    }

    #[test]
    fn constant_arrays_normalize_to_zero() {
        let values = vec![7.0f32; 8];
        let n = normalized(&HostArray::new(&values, &[2, 2, 2]), (0.0, 10.0)).unwrap();

        assert!(n.values_slice().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn normalization_rejects_4d_and_integers() {
        let values = vec![0.0f32; 16];
        assert!(matches!(
            normalized(&HostArray::new(&values, &[2, 2, 2, 2]), (0.0, 1.0)),
            Err(Error::Shape(_))
        ));

        let ints = vec![0u8; 8];
        assert!(matches!(
            normalized(&HostArray::new(&ints, &[2, 2, 2]), (0.0, 1.0)),
            Err(Error::TypeMismatch { .. })
        ));
    }
}
