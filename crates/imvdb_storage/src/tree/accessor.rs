use super::{Node, Tree};
use crate::{GridValue, LEAF_INDEXER};

use imvdb_core::prelude::*;

use std::cell::Cell;

/// Reads a `Tree` while caching the node that was last looked up. Spatially coherent access patterns, like scanning a dense
/// extent or visiting neighbors, mostly skip the hash map.
pub struct ValueAccessor<'a, T> {
    tree: &'a Tree<T>,
    cached_node: Cell<Option<(Point3i, Option<&'a Node<T>>)>>,
}

impl<'a, T> ValueAccessor<'a, T>
where
    T: GridValue,
{
    pub fn new(tree: &'a Tree<T>) -> Self {
        Self {
            tree,
            cached_node: Cell::new(None),
        }
    }

    #[inline]
    fn node_containing_point(&self, p: Point3i) -> Option<&'a Node<T>> {
        let node_min = LEAF_INDEXER.min_of_node_containing_point(p);
        if let Some((cached_min, node)) = self.cached_node.get() {
            if cached_min == node_min {
                return node;
            }
        }
        let node = self.tree.get_node(node_min);
        self.cached_node.set(Some((node_min, node)));

        node
    }

    #[inline]
    pub fn get(&self, p: Point3i) -> T {
        self.node_containing_point(p)
            .map(|n| n.get(p))
            .unwrap_or_else(|| self.tree.background())
    }

    #[inline]
    pub fn is_active(&self, p: Point3i) -> bool {
        self.node_containing_point(p)
            .map(|n| n.is_active(p))
            .unwrap_or(false)
    }

    #[inline]
    pub fn probe(&self, p: Point3i) -> (T, bool) {
        match self.node_containing_point(p) {
            Some(n) => (n.get(p), n.is_active(p)),
            None => (self.tree.background(), false),
        }
    }

    #[inline]
    pub fn tree(&self) -> &'a Tree<T> {
        self.tree
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
    fn accessor_agrees_with_tree() {
        let mut tree = Tree::new(-1.0f32);
        for (i, p) in Extent3i::from_min_and_shape(PointN([-4, -4, -4]), Point3i::fill(9))
            .iter_points()
            .enumerate()
        {
            if i % 3 == 0 {
                tree.set_value_on(p, i as f32);
            }
        }

        let accessor = tree.accessor();
        for p in Extent3i::from_min_and_shape(PointN([-10, -10, -10]), Point3i::fill(20)).iter_points() {
            assert_eq!(accessor.probe(p), tree.probe(p));
        }
    }
}
