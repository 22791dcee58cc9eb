use crate::{GridValue, MetaMap, MetaValue, Tree};

use imvdb_core::prelude::*;

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved metadata names.
pub const META_NAME: &str = "name";
pub const META_CREATOR: &str = "creator";
pub const META_CLASS: &str = "class";

/// What kind of field a grid holds.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum GridClass {
    Unknown,
    LevelSet,
    FogVolume,
    Staggered,
}

impl Default for GridClass {
    fn default() -> Self {
        GridClass::Unknown
    }
}

impl GridClass {
    pub const ALL: [GridClass; 4] = [
        GridClass::Unknown,
        GridClass::LevelSet,
        GridClass::FogVolume,
        GridClass::Staggered,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            GridClass::Unknown => "unknown",
            GridClass::LevelSet => "level set",
            GridClass::FogVolume => "fog volume",
            GridClass::Staggered => "staggered",
        }
    }
}

impl fmt::Display for GridClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("\"{0}\" is not a grid class")]
pub struct ParseGridClassError(pub String);

impl FromStr for GridClass {
    type Err = ParseGridClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(GridClass::Unknown),
            "level set" => Ok(GridClass::LevelSet),
            "fog volume" => Ok(GridClass::FogVolume),
            "staggered" => Ok(GridClass::Staggered),
            _ => Err(ParseGridClassError(s.to_owned())),
        }
    }
}

/// A sparse tree of `T` values together with the transform that places it in world space and its metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeGrid<T> {
    tree: Tree<T>,
    transform: Transform,
    meta: MetaMap,
}

pub type FloatGrid = VolumeGrid<f32>;
pub type DoubleGrid = VolumeGrid<f64>;

impl<T> VolumeGrid<T>
where
    T: GridValue,
{
    /// An empty grid with the identity transform.
    pub fn new(background: T) -> Self {
        Self::from_tree(Tree::new(background))
    }

    pub fn from_tree(tree: Tree<T>) -> Self {
        Self {
            tree,
            transform: Transform::default(),
            meta: MetaMap::new(),
        }
    }

    pub fn from_parts(tree: Tree<T>, transform: Transform, meta: MetaMap) -> Self {
        Self {
            tree,
            transform,
            meta,
        }
    }

    pub fn into_parts(self) -> (Tree<T>, Transform, MetaMap) {
        (self.tree, self.transform, self.meta)
    }

    #[inline]
    pub fn tree(&self) -> &Tree<T> {
        &self.tree
    }

    #[inline]
    pub fn tree_mut(&mut self) -> &mut Tree<T> {
        &mut self.tree
    }

    #[inline]
    pub fn background(&self) -> T {
        self.tree.background()
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    #[inline]
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    #[inline]
    pub fn meta(&self) -> &MetaMap {
        &self.meta
    }

    #[inline]
    pub fn meta_mut(&mut self) -> &mut MetaMap {
        &mut self.meta
    }

    fn string_meta(&self, key: &str) -> String {
        match self.meta.get(key) {
            Some(MetaValue::String(s)) => s.clone(),
            _ => String::new(),
        }
    }

    /// The grid's name, or an empty string.
    pub fn name(&self) -> String {
        self.string_meta(META_NAME)
    }

    pub fn set_name(&mut self, name: &str) {
        self.meta.insert(META_NAME, name);
    }

    /// The tool or user that created the grid, or an empty string.
    pub fn creator(&self) -> String {
        self.string_meta(META_CREATOR)
    }

    pub fn set_creator(&mut self, creator: &str) {
        self.meta.insert(META_CREATOR, creator);
    }

    /// The grid class. Missing or unrecognized class metadata reads as `GridClass::Unknown`.
    pub fn grid_class(&self) -> GridClass {
        match self.meta.get(META_CLASS) {
            Some(MetaValue::String(s)) => s.parse().unwrap_or_default(),
            _ => GridClass::Unknown,
        }
    }

    pub fn set_grid_class(&mut self, class: GridClass) {
        self.meta.insert(META_CLASS, class.as_str());
    }

    /// Voxel size along the X axis.
    pub fn voxel_size(&self) -> f64 {
        self.transform.voxel_size().x()
    }

    #[inline]
    pub fn active_voxel_count(&self) -> u64 {
        self.tree.active_voxel_count()
    }

    /// The smallest extent containing every active voxel.
    #[inline]
    pub fn active_bounding_extent(&self) -> Extent3i {
        self.tree.active_bounding_extent()
    }
}

impl<T> fmt::Display for VolumeGrid<T>
where
    T: GridValue,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bounds = self.active_bounding_extent();
        writeln!(f, "name: {}", self.name())?;
        writeln!(f, "value type: {}", T::TYPE_NAME)?;
        writeln!(f, "class: {}", self.grid_class())?;
        let PointN([sx, sy, sz]) = self.transform.voxel_size();
        writeln!(f, "voxel size: [{}, {}, {}]", sx, sy, sz)?;
        writeln!(f, "active voxels: {}", self.active_voxel_count())?;
        if bounds.is_empty() {
            writeln!(f, "active bounds: empty")?;
        } else {
            let (min, max) = (bounds.minimum, bounds.max());
            writeln!(
                f,
                "active bounds: [{}, {}, {}] -> [{}, {}, {}]",
                min.x(),
                min.y(),
                min.z(),
                max.x(),
                max.y(),
                max.z()
            )?;
        }
        writeln!(f, "background: {}", self.background())?;
        for (key, value) in self.meta.iter() {
            writeln!(f, "  {}: {}", key, value)?;
        }

        Ok(())
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
    fn grid_class_string_table_is_bijective() {
        for class in GridClass::ALL.iter() {
            assert_eq!(class.as_str().parse::<GridClass>(), Ok(*class));
        }
        assert_eq!(
            "level-set".parse::<GridClass>(),
            Err(ParseGridClassError("level-set".into()))
        );
    }

    #[test]
    fn named_properties_live_in_metadata() {
        let mut grid = FloatGrid::new(0.0);
        assert_eq!(grid.name(), "");
        assert_eq!(grid.grid_class(), GridClass::Unknown);

        grid.set_name("density");
        grid.set_creator("tests");
        grid.set_grid_class(GridClass::FogVolume);

        let strings = grid.meta().to_string_map();
        assert_eq!(strings[META_NAME], "density");
        assert_eq!(strings[META_CREATOR], "tests");
        assert_eq!(strings[META_CLASS], "fog volume");
        assert_eq!(grid.grid_class(), GridClass::FogVolume);
    }

    #[test]
    fn display_summarizes_grid() {
        let mut grid = FloatGrid::new(0.5);
        grid.set_name("sdf");
        grid.tree_mut().set_value_on(PointN([1, 2, 3]), -1.0);

        let summary = grid.to_string();
        assert!(summary.contains("name: sdf"));
        assert!(summary.contains("value type: float"));
        assert!(summary.contains("active voxels: 1"));
        assert!(summary.contains("active bounds: [1, 2, 3] -> [1, 2, 3]"));
        assert!(summary.contains("background: 0.5"));
    }
}
