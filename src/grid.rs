use crate::Result;

use imvdb_storage::{registry, FloatGrid, GridClass, MetaMap, MetaType};

use std::collections::BTreeMap;
use std::fmt;

/// A handle that exclusively owns one `f32` volume grid.
///
/// Name, creator and class are stored as metadata, so they also show up in `metadata()`. The background value is fixed when
/// the grid is created.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    volume: FloatGrid,
}

impl Grid {
    /// An empty grid where every voxel reads as `background`.
    pub fn new(background: f32) -> Self {
        Self::from_volume(FloatGrid::new(background))
    }

    pub fn from_volume(volume: FloatGrid) -> Self {
        registry::initialize();

        Self { volume }
    }

    #[inline]
    pub fn as_volume(&self) -> &FloatGrid {
        &self.volume
    }

    #[inline]
    pub fn into_volume(self) -> FloatGrid {
        self.volume
    }

    pub(crate) fn meta_mut(&mut self) -> &mut MetaMap {
        self.volume.meta_mut()
    }

    pub fn name(&self) -> String {
        self.volume.name()
    }

    pub fn set_name(&mut self, name: &str) {
        self.volume.set_name(name);
    }

    pub fn creator(&self) -> String {
        self.volume.creator()
    }

    pub fn set_creator(&mut self, creator: &str) {
        self.volume.set_creator(creator);
    }

    pub fn grid_class(&self) -> GridClass {
        self.volume.grid_class()
    }

    pub fn set_grid_class(&mut self, class: GridClass) {
        self.volume.set_grid_class(class);
    }

    /// Sets the class from its string form, e.g. `"fog volume"`. Unknown strings leave the class untouched and return
    /// `Error::InvalidGridClass`.
    pub fn set_grid_class_str(&mut self, class: &str) -> Result<()> {
        self.set_grid_class(class.parse()?);

        Ok(())
    }

    #[inline]
    pub fn background(&self) -> f32 {
        self.volume.background()
    }

    /// Every metadata entry rendered as a string. Use `metadata_typed` to get a value back with its own type.
    pub fn metadata(&self) -> BTreeMap<String, String> {
        self.volume.meta().to_string_map()
    }

    /// The metadata entry `key` as a `V`. Fails with `Error::MissingMetadata` if there is no such entry, or with
    /// `Error::Metadata` if it holds a different type.
    pub fn metadata_typed<V: MetaType>(&self, key: &str) -> Result<V> {
        Ok(self.volume.meta().get_typed(key)?)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.volume, f)
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
