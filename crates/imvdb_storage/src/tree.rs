//! A sparse volumetric tree.
//!
//! The index space is partitioned into 8x8x8 nodes. Only nodes that differ from the background are stored, in a hash map
//! keyed by the node's minimum point. A stored node is either a dense `LeafNode` or a constant `Tile`. Any point not covered by
//! a stored node resolves to the tree's background value and is inactive.
//!
//! ```
//! # use imvdb_core::prelude::*;
//! # use imvdb_storage::prelude::*;
//! let mut tree = Tree::new(0.0f32);
//! tree.set_value_on(PointN([10, -3, 4]), 1.5);
//!
//! assert_eq!(tree.get(PointN([10, -3, 4])), 1.5);
//! assert_eq!(tree.probe(PointN([100, 0, 0])), (0.0, false));
//! assert_eq!(tree.leaf_count(), 1);
//! ```

mod accessor;
mod node;

pub use accessor::ValueAccessor;
pub use node::{LeafNode, Node, Tile};

use crate::{GridValue, SmallKeyHashMap, LEAF_INDEXER};

use imvdb_core::prelude::*;

use either::Either;

#[derive(Clone, Debug)]
pub struct Tree<T> {
    nodes: SmallKeyHashMap<Point3i, Node<T>>,
    background: T,
}

impl<T> PartialEq for Tree<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.background == other.background
            && self.nodes.len() == other.nodes.len()
            && self
                .nodes
                .iter()
                .all(|(min, node)| other.nodes.get(min) == Some(node))
    }
}

impl<T> Tree<T>
where
    T: GridValue,
{
    /// An empty tree where every point has the `background` value.
    pub fn new(background: T) -> Self {
        Self {
            nodes: SmallKeyHashMap::default(),
            background,
        }
    }

    #[inline]
    pub fn background(&self) -> T {
        self.background
    }

    /// Returns `true` iff no nodes are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn get_node(&self, node_min: Point3i) -> Option<&Node<T>> {
        self.nodes.get(&node_min)
    }

    /// The node containing `p`, if it's stored.
    #[inline]
    pub fn node_containing_point(&self, p: Point3i) -> Option<&Node<T>> {
        self.get_node(LEAF_INDEXER.min_of_node_containing_point(p))
    }

    #[inline]
    pub fn get(&self, p: Point3i) -> T {
        self.node_containing_point(p)
            .map(|n| n.get(p))
            .unwrap_or(self.background)
    }

    #[inline]
    pub fn is_active(&self, p: Point3i) -> bool {
        self.node_containing_point(p)
            .map(|n| n.is_active(p))
            .unwrap_or(false)
    }

    /// The value and active state at `p`.
    #[inline]
    pub fn probe(&self, p: Point3i) -> (T, bool) {
        match self.node_containing_point(p) {
            Some(n) => (n.get(p), n.is_active(p)),
            None => (self.background, false),
        }
    }

    /// Sets the value at `p` and marks it active.
    pub fn set_value_on(&mut self, p: Point3i, value: T) {
        self.leaf_containing_point_mut(p).set_value_on(p, value);
    }

    /// Sets the value at `p` and marks it inactive.
    pub fn set_value_off(&mut self, p: Point3i, value: T) {
        self.leaf_containing_point_mut(p).set_value_off(p, value);
    }

    /// Returns the leaf containing `p`, creating it from the background or expanding a tile as necessary.
    fn leaf_containing_point_mut(&mut self, p: Point3i) -> &mut LeafNode<T> {
        let node_min = LEAF_INDEXER.min_of_node_containing_point(p);
        let background = self.background;
        let node = self
            .nodes
            .entry(node_min)
            .or_insert_with(|| Node::Tile(Tile::new(background, false)));
        if let Node::Tile(tile) = node {
            *node = Node::Leaf(Box::new(LeafNode::from_tile(node_min, *tile)));
        }

        match node {
            Node::Leaf(leaf) => leaf,
            Node::Tile(_) => unreachable!(),
        }
    }

    /// Stores `leaf`, replacing any node at the same location.
    pub fn insert_leaf(&mut self, leaf: LeafNode<T>) -> Option<Node<T>> {
        self.nodes.insert(leaf.origin(), Node::Leaf(Box::new(leaf)))
    }

    /// Stores `tile` for the node at `node_min`, replacing any node at the same location.
    ///
    /// In debug mode only, asserts that `node_min` is a valid node minimum.
    pub fn insert_tile(&mut self, node_min: Point3i, tile: Tile<T>) -> Option<Node<T>> {
        debug_assert!(LEAF_INDEXER.node_min_is_valid(node_min));

        self.nodes.insert(node_min, Node::Tile(tile))
    }

    pub fn remove_node(&mut self, node_min: Point3i) -> Option<Node<T>> {
        self.nodes.remove(&node_min)
    }

    /// The number of stored nodes, leaves and tiles combined.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|n| matches!(n, Node::Leaf(_)))
            .count()
    }

    pub fn tile_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|n| matches!(n, Node::Tile(_)))
            .count()
    }

    pub fn active_voxel_count(&self) -> u64 {
        self.nodes.values().map(|n| n.active_voxel_count()).sum()
    }

    /// The minimums of all stored nodes, sorted so that iteration order doesn't depend on the hasher.
    pub fn sorted_node_mins(&self) -> Vec<Point3i> {
        let mut mins: Vec<_> = self.nodes.keys().cloned().collect();
        mins.sort_by_key(|p| p.0);

        mins
    }

    /// The smallest extent containing every stored node.
    pub fn node_bounding_extent(&self) -> Extent3i {
        self.nodes
            .keys()
            .map(|min| LEAF_INDEXER.extent_for_node_with_min(*min))
            .fold(Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::ZERO), |acc, e| {
                acc.union(&e)
            })
    }

    /// The smallest extent containing every active voxel. Empty if no voxel is active.
    pub fn active_bounding_extent(&self) -> Extent3i {
        let mut bounds = Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::ZERO);
        for (min, node) in self.nodes.iter() {
            match node {
                Node::Tile(tile) if tile.active => {
                    bounds = bounds.union(&LEAF_INDEXER.extent_for_node_with_min(*min));
                }
                Node::Tile(_) => (),
                Node::Leaf(leaf) => {
                    let leaf_bounds = imvdb_core::bounding_extent(
                        leaf.active_mask()
                            .iter_set_bits()
                            .map(|offset| leaf.origin() + local_point_from_offset(offset)),
                    );
                    bounds = bounds.union(&leaf_bounds);
                }
            }
        }

        bounds
    }

    /// Calls `visitor` on every active voxel. Active tiles visit each voxel they cover.
    pub fn for_each_active(&self, mut visitor: impl FnMut(Point3i, T)) {
        for (min, node) in self.nodes.iter() {
            match node {
                Node::Leaf(leaf) => leaf.for_each_active(&mut visitor),
                Node::Tile(tile) if tile.active => {
                    for p in LEAF_INDEXER.extent_for_node_with_min(*min).iter_points() {
                        visitor(p, tile.value);
                    }
                }
                Node::Tile(_) => (),
            }
        }
    }

    /// Calls `visitor` on every stored node with either the leaf or the tile and its extent.
    pub fn visit_nodes(&self, mut visitor: impl FnMut(Either<&LeafNode<T>, (Extent3i, &Tile<T>)>)) {
        for (min, node) in self.nodes.iter() {
            match node {
                Node::Leaf(leaf) => visitor(Either::Left(leaf)),
                Node::Tile(tile) => {
                    visitor(Either::Right((LEAF_INDEXER.extent_for_node_with_min(*min), tile)))
                }
            }
        }
    }

    /// Replaces leaves that are constant within `tolerance` with tiles, then removes inactive tiles whose value is within
    /// `tolerance` of the background. Returns the number of nodes that were collapsed or removed.
    pub fn prune(&mut self, tolerance: T) -> usize {
        let background = self.background;
        let mut num_pruned = 0;
        for node in self.nodes.values_mut() {
            if let Node::Leaf(leaf) = node {
                if let Some(tile) = leaf.constant_tile(tolerance) {
                    *node = Node::Tile(tile);
                    num_pruned += 1;
                }
            }
        }
        let num_before = self.nodes.len();
        self.nodes.retain(|_, node| match node {
            Node::Tile(tile) => tile.active || !tile.value.is_approx_equal(background, tolerance),
            Node::Leaf(_) => true,
        });
        num_pruned += num_before - self.nodes.len();

        tracing::debug!(
            "Pruned {} nodes; {} leaves and {} tiles remain",
            num_pruned,
            self.leaf_count(),
            self.tile_count()
        );

        num_pruned
    }

    /// A reader that caches the most recently visited node.
    pub fn accessor(&self) -> ValueAccessor<'_, T> {
        ValueAccessor::new(self)
    }
}

/// The local point of the voxel at `offset` in a leaf's C-order storage.
#[inline]
pub(crate) fn local_point_from_offset(offset: usize) -> Point3i {
    let o = offset as i32;
    let d = crate::LEAF_DIM;

    PointN([o / (d * d), (o / d) % d, o % d])
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
