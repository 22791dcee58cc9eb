//! Copying between dense `Array3`s and sparse `Tree`s.

use crate::{Array3, GridValue, LeafNode, Node, Tree, LEAF_INDEXER};

use imvdb_core::prelude::*;

use core::ops::{Deref, DerefMut};

/// Writes every value of `dense` into `tree`.
///
/// Voxels whose value is within `tolerance` of the tree's background become inactive background voxels. Any other voxel is
/// stored active with its value. Afterwards, each touched leaf that is constant within `tolerance` (in both value and active
/// state) collapses into a tile, and tiles that would only repeat the background are not stored at all.
///
/// Points of `tree` outside of `dense.extent()` are left untouched.
pub fn copy_from_dense<T, Store>(dense: &Array3<T, Store>, tree: &mut Tree<T>, tolerance: T)
where
    T: GridValue,
    Store: Deref<Target = [T]>,
{
    let background = tree.background();
    let mut num_leaves = 0;
    let mut num_tiles = 0;
    for node_min in LEAF_INDEXER.node_mins_for_extent(dense.extent()) {
        let node_extent = LEAF_INDEXER.extent_for_node_with_min(node_min);
        let mut leaf = match tree.remove_node(node_min) {
            Some(Node::Leaf(leaf)) => *leaf,
            Some(Node::Tile(tile)) => LeafNode::from_tile(node_min, tile),
            None => LeafNode::filled(node_min, background, false),
        };

        dense.for_each(&node_extent, |p, value| {
            if value.is_approx_equal(background, tolerance) {
                leaf.set_value_off(p, background);
            } else {
                leaf.set_value_on(p, value);
            }
        });

        match leaf.constant_tile(tolerance) {
            Some(tile) if !tile.active && tile.value.is_approx_equal(background, tolerance) => (),
            Some(tile) => {
                tree.insert_tile(node_min, tile);
                num_tiles += 1;
            }
            None => {
                tree.insert_leaf(leaf);
                num_leaves += 1;
            }
        }
    }

    tracing::debug!(
        "Copied dense extent {:?} into {} leaves and {} tiles",
        dense.extent(),
        num_leaves,
        num_tiles
    );
}

/// Writes the value of `tree` at every point of `dense.extent()` into `dense`. Points not covered by a stored node get the
/// background value.
pub fn copy_to_dense<T, Store>(tree: &Tree<T>, dense: &mut Array3<T, Store>)
where
    T: GridValue,
    Store: DerefMut<Target = [T]>,
{
    dense.reset_values(tree.background());

    let dense_extent = *dense.extent();
    tree.visit_nodes(|node| match node {
        either::Either::Left(leaf) => {
            let overlap = leaf.extent().intersection(&dense_extent);
            if !overlap.is_empty() {
                dense.for_each_mut(&overlap, |p, v| *v = leaf.get(p));
            }
        }
        either::Either::Right((extent, tile)) => {
            let overlap = extent.intersection(&dense_extent);
            if !overlap.is_empty() {
                dense.fill_extent(&overlap, tile.value);
            }
        }
    });
}

/// Allocates a new array for `extent` filled with the values of `tree`.
pub fn dense_from_tree<T>(tree: &Tree<T>, extent: Extent3i) -> Array3<T>
where
    T: GridValue,
{
    let mut dense = Array3::fill(extent, tree.background());
    copy_to_dense(tree, &mut dense);

    dense
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

    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};

    fn random_dense(extent: Extent3i, seed: u64) -> Array3<f32> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        Array3::fill_with(extent, |_p| {
            // Mostly background with some near-background noise.
            if rng.gen_bool(0.6) {
                0.0
            } else {
                rng.gen_range(-1.0..1.0)
            }
        })
    }

    fn inactive_voxel_count(tree: &Tree<f32>, extent: &Extent3i) -> usize {
        extent.iter_points().filter(|p| !tree.is_active(*p)).count()
    }

    #[test]
    fn exact_round_trip_with_zero_tolerance() {
        let extent = Extent3i::from_min_and_shape(PointN([-3, 2, 5]), PointN([19, 11, 7]));
        let dense = random_dense(extent, 1);

        let mut tree = Tree::new(0.0);
        copy_from_dense(&dense, &mut tree, 0.0);

        assert_eq!(dense_from_tree(&tree, extent), dense);
    }

    #[test]
    fn background_only_array_stores_nothing() {
        let dense = Array3::fill(Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::fill(20)), 0.25f32);
        let mut tree = Tree::new(0.25);
        copy_from_dense(&dense, &mut tree, 0.0);

        assert!(tree.is_empty());
    }

    #[test]
    fn uniform_foreground_collapses_to_tiles() {
        let dense = Array3::fill(Extent3i::from_min_and_shape(Point3i::ZERO, PointN([16, 16, 8])), 2.0f32);
        let mut tree = Tree::new(0.0);
        copy_from_dense(&dense, &mut tree, 0.0);

        assert_eq!(tree.tile_count(), 4);
        assert_eq!(tree.leaf_count(), 0);
        assert_eq!(tree.active_voxel_count(), 16 * 16 * 8);
    }

    #[test]
    fn copy_to_dense_fills_background_outside_nodes() {
        let mut tree = Tree::new(7.0f32);
        tree.set_value_on(PointN([1, 1, 1]), 1.0);

        let dense = dense_from_tree(&tree, Extent3i::from_min_and_shape(PointN([-10, 0, 0]), Point3i::fill(12)));
        assert_eq!(dense.get(PointN([1, 1, 1])), 1.0);
        assert_eq!(dense.get(PointN([-10, 0, 0])), 7.0);
        assert_eq!(dense.get(PointN([0, 0, 0])), 7.0);
    }

    proptest! {
        #[test]
        fn tolerance_bounds_round_trip_error(seed in any::<u64>(), tolerance in 0.0f32..1.0) {
            let extent = Extent3i::from_min_and_shape(PointN([0, 0, 0]), PointN([9, 10, 11]));
            let dense = random_dense(extent, seed);

            let mut tree = Tree::new(0.0);
            copy_from_dense(&dense, &mut tree, tolerance);
            let back = dense_from_tree(&tree, extent);

            for (a, b) in dense.values_slice().iter().zip(back.values_slice().iter()) {
                prop_assert!((a - b).abs() <= tolerance);
            }
        }

        #[test]
        fn more_tolerance_never_stores_more(seed in any::<u64>(), t1 in 0.0f32..1.0, t2 in 0.0f32..1.0) {
            let (low, high) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            let extent = Extent3i::from_min_and_shape(PointN([-4, 0, 0]), PointN([12, 9, 10]));
            let dense = random_dense(extent, seed);

            let mut low_tree = Tree::new(0.0);
            copy_from_dense(&dense, &mut low_tree, low);
            let mut high_tree = Tree::new(0.0);
            copy_from_dense(&dense, &mut high_tree, high);

            prop_assert!(inactive_voxel_count(&high_tree, &extent) >= inactive_voxel_count(&low_tree, &extent));
        }
    }
}
