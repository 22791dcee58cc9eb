use crate::{Array3, Bitset512, GridValue, LEAF_INDEXER};

use imvdb_core::prelude::*;

use serde::{Deserialize, Serialize};

/// A dense 8x8x8 block of voxels. Each voxel has a value and an active state. Inactive voxels keep their value; for example a
/// narrow-band level set stores its interior as inactive voxels with a negative value.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct LeafNode<T> {
    values: Array3<T>,
    active: Bitset512,
}

/// A constant value covering a whole node's extent.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Tile<T> {
    pub value: T,
    pub active: bool,
}

/// Either dense leaf storage or a constant tile.
#[derive(Clone, Debug, PartialEq)]
pub enum Node<T> {
    Leaf(Box<LeafNode<T>>),
    Tile(Tile<T>),
}

impl<T> Tile<T> {
    #[inline]
    pub const fn new(value: T, active: bool) -> Self {
        Self { value, active }
    }
}

impl<T> LeafNode<T>
where
    T: GridValue,
{
    /// A leaf at `origin` where every voxel has `value` and the same `active` state.
    ///
    /// In debug mode only, asserts that `origin` is a valid node minimum.
    pub fn filled(origin: Point3i, value: T, active: bool) -> Self {
        debug_assert!(LEAF_INDEXER.node_min_is_valid(origin));

        Self {
            values: Array3::fill(LEAF_INDEXER.extent_for_node_with_min(origin), value),
            active: if active {
                Bitset512::all_set()
            } else {
                Bitset512::all_unset()
            },
        }
    }

    /// The leaf that a tile expands into.
    pub fn from_tile(origin: Point3i, tile: Tile<T>) -> Self {
        Self::filled(origin, tile.value, tile.active)
    }

    #[inline]
    pub fn origin(&self) -> Point3i {
        self.values.extent().minimum
    }

    #[inline]
    pub fn extent(&self) -> &Extent3i {
        self.values.extent()
    }

    #[inline]
    pub fn values(&self) -> &Array3<T> {
        &self.values
    }

    #[inline]
    pub fn active_mask(&self) -> &Bitset512 {
        &self.active
    }

    #[inline]
    pub fn get(&self, p: Point3i) -> T {
        self.values.get_stride(crate::Stride(LEAF_INDEXER.offset_in_node(p)))
    }

    #[inline]
    pub fn is_active(&self, p: Point3i) -> bool {
        self.active.bit_is_set(LEAF_INDEXER.offset_in_node(p))
    }

    #[inline]
    pub fn set_value_on(&mut self, p: Point3i, value: T) {
        self.set_value_and_state(p, value, true)
    }

    #[inline]
    pub fn set_value_off(&mut self, p: Point3i, value: T) {
        self.set_value_and_state(p, value, false)
    }

    #[inline]
    pub fn set_value_and_state(&mut self, p: Point3i, value: T, active: bool) {
        let offset = LEAF_INDEXER.offset_in_node(p);
        self.values.values_mut_slice()[offset] = value;
        self.active.assign_bit(offset, active);
    }

    #[inline]
    pub fn set_active_state(&mut self, p: Point3i, active: bool) {
        self.active.assign_bit(LEAF_INDEXER.offset_in_node(p), active);
    }

    #[inline]
    pub fn active_voxel_count(&self) -> u64 {
        u64::from(self.active.count_ones())
    }

    /// `true` iff the leaf covers exactly one node-aligned 8x8x8 extent. Deserialized leaves can violate this.
    pub fn is_well_formed(&self) -> bool {
        let origin = self.origin();

        LEAF_INDEXER.node_min_is_valid(origin)
            && *self.extent() == LEAF_INDEXER.extent_for_node_with_min(origin)
            && self.values.values_slice().len() == crate::LEAF_NUM_VOXELS
    }

    /// Calls `visitor` on every active voxel.
    pub fn for_each_active(&self, mut visitor: impl FnMut(Point3i, T)) {
        let origin = self.origin();
        for offset in self.active.iter_set_bits() {
            visitor(
                origin + super::local_point_from_offset(offset),
                self.values.values_slice()[offset],
            );
        }
    }

    /// If every voxel shares the same active state and every value is within `tolerance` of the first value, returns the tile
    /// that can replace this leaf.
    pub fn constant_tile(&self, tolerance: T) -> Option<Tile<T>> {
        let active = if self.active.all() {
            true
        } else if !self.active.any() {
            false
        } else {
            return None;
        };

        let values = self.values.values_slice();
        let first = values[0];
        if values.iter().all(|v| v.is_approx_equal(first, tolerance)) {
            Some(Tile::new(first, active))
        } else {
            None
        }
    }
}

impl<T> Node<T>
where
    T: GridValue,
{
    #[inline]
    pub fn get(&self, p: Point3i) -> T {
        match self {
            Node::Leaf(leaf) => leaf.get(p),
            Node::Tile(tile) => tile.value,
        }
    }

    #[inline]
    pub fn is_active(&self, p: Point3i) -> bool {
        match self {
            Node::Leaf(leaf) => leaf.is_active(p),
            Node::Tile(tile) => tile.active,
        }
    }

    #[inline]
    pub fn active_voxel_count(&self) -> u64 {
        match self {
            Node::Leaf(leaf) => leaf.active_voxel_count(),
            Node::Tile(tile) if tile.active => crate::LEAF_NUM_VOXELS as u64,
            Node::Tile(_) => 0,
        }
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
