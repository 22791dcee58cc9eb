use imvdb_core::prelude::*;

/// Log2 of the edge length of a leaf node.
pub const LEAF_LOG2: i32 = 3;
/// The edge length of a leaf node.
pub const LEAF_DIM: i32 = 1 << LEAF_LOG2;
/// The number of voxels in a leaf node.
pub const LEAF_NUM_VOXELS: usize = (LEAF_DIM * LEAF_DIM * LEAF_DIM) as usize;

/// The indexer used by every `Tree`.
pub const LEAF_INDEXER: NodeIndexer = NodeIndexer::new(LEAF_LOG2);

/// Calculates node locations. Nodes are cubes with power-of-2 edges, aligned to multiples of their edge length, so the node
/// containing any point can be found with a mask.
#[derive(Clone, Copy, Debug)]
pub struct NodeIndexer {
    node_shape_log2: i32,
    node_shape_mask: i32,
}

impl NodeIndexer {
    #[inline]
    pub const fn new(node_shape_log2: i32) -> Self {
        Self {
            node_shape_log2,
            node_shape_mask: !((1 << node_shape_log2) - 1),
        }
    }

    /// The constant shape of a node. The same for all nodes.
    #[inline]
    pub fn node_shape(&self) -> Point3i {
        Point3i::fill(1 << self.node_shape_log2)
    }

    /// Determines whether `min` is a valid node minimum. This means it must be a multiple of the node shape.
    #[inline]
    pub fn node_min_is_valid(&self, min: Point3i) -> bool {
        (min & !Point3i::fill(self.node_shape_mask)) == Point3i::ZERO
    }

    /// Returns the minimum of the node that contains `point`.
    #[inline]
    pub fn min_of_node_containing_point(&self, point: Point3i) -> Point3i {
        point & Point3i::fill(self.node_shape_mask)
    }

    /// The extent spanned by the node at `min`.
    #[inline]
    pub fn extent_for_node_with_min(&self, min: Point3i) -> Extent3i {
        Extent3i::from_min_and_shape(min, self.node_shape())
    }

    /// Returns an iterator over all node minimums for nodes that overlap the given extent.
    #[inline]
    pub fn node_mins_for_extent(&self, extent: &Extent3i) -> impl Iterator<Item = Point3i> {
        let shape_log2 = self.node_shape_log2;
        let range = if extent.is_empty() {
            Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::ZERO)
        } else {
            Extent3i::from_min_and_max(extent.minimum >> shape_log2, extent.max() >> shape_log2)
        };

        range.iter_points().map(move |p| p << shape_log2)
    }

    /// The offset of `point` within its node's storage, matching the C order of `Array3`.
    #[inline]
    pub fn offset_in_node(&self, point: Point3i) -> usize {
        let local = point & !Point3i::fill(self.node_shape_mask);
        let log2 = self.node_shape_log2;

        (((local.x() << log2) + local.y()) << log2 | local.z()) as usize
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

    use crate::Array3;

    #[test]
    fn node_mins_cover_extent() {
        let extent = Extent3i::from_min_and_max(PointN([-1, 0, 7]), PointN([8, 0, 8]));
        let mins: Vec<_> = LEAF_INDEXER.node_mins_for_extent(&extent).collect();

        assert_eq!(
            mins,
            vec![
                PointN([-8, 0, 0]),
                PointN([0, 0, 0]),
                PointN([8, 0, 0]),
                PointN([-8, 0, 8]),
                PointN([0, 0, 8]),
                PointN([8, 0, 8]),
            ]
        );
        assert!(mins.iter().all(|m| LEAF_INDEXER.node_min_is_valid(*m)));
        assert!(LEAF_INDEXER.node_mins_for_extent(&Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::ZERO)).next().is_none());
    }

    #[test]
    fn offset_in_node_matches_array_stride() {
        let min = PointN([-16, 8, 24]);
        let node = Array3::fill(LEAF_INDEXER.extent_for_node_with_min(min), 0u8);
        for p in node.extent().iter_points() {
            assert_eq!(LEAF_INDEXER.offset_in_node(p), node.stride_from_point(p).0);
            assert_eq!(LEAF_INDEXER.min_of_node_containing_point(p), min);
        }
    }
}
