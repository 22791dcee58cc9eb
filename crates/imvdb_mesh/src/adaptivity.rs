//! Coarsening of flat regions.
//!
//! Vertices are clustered bottom-up over an implicit octree of cells: at level `l`, the clusters whose cells share
//! `cell >> l` are candidates to merge. They merge when every cluster's normal is within `1 - adaptivity` (as a dot product) of
//! their average normal. A group that fails to merge is frozen and takes no part in higher levels.
//!
//! After clustering, every quad is remapped onto cluster indices. Quads that keep 4 distinct vertices stay quads, quads that
//! collapse to 3 become triangles, and anything smaller disappears.

use crate::{SurfaceBuffer, TriQuadMesh};

use imvdb_core::prelude::*;

use itertools::Itertools;

/// Levels of the octree above single cells.
const MAX_LEVELS: i32 = 3;

#[derive(Clone, Copy, Debug)]
struct Cluster {
    /// The cell key at the current level.
    key: Point3i,
    position_sum: Point3d,
    count: u32,
    /// Unit average normal.
    normal: Point3f,
    frozen: bool,
}

pub(crate) fn merge_flat_regions(buffer: &SurfaceBuffer, adaptivity: f32) -> TriQuadMesh {
    let min_alignment = 1.0 - adaptivity;

    let mut clusters: Vec<Cluster> = buffer
        .surface_cells
        .iter()
        .zip(buffer.positions.iter().zip(buffer.normals.iter()))
        .map(|(cell, (position, normal))| Cluster {
            key: *cell,
            position_sum: Point3d::from(Point3f::from(*position)),
            count: 1,
            normal: Point3f::from(*normal).normalized(),
            frozen: false,
        })
        .collect();
    let mut vertex_cluster: Vec<u32> = (0..clusters.len() as u32).collect();

    for _level in 1..=MAX_LEVELS {
        let (next_clusters, remap) = merge_level(&clusters, min_alignment);
        for c in vertex_cluster.iter_mut() {
            *c = remap[*c as usize];
        }
        clusters = next_clusters;
    }

    let points = clusters
        .iter()
        .map(|c| {
            let PointN([x, y, z]) = c.position_sum / c.count as f64;
            [x as f32, y as f32, z as f32]
        })
        .collect();

    let mut mesh = TriQuadMesh {
        points,
        triangles: Vec::new(),
        quads: Vec::new(),
    };
    for quad in buffer.quads.iter() {
        let mut remapped = *quad;
        for v in remapped.iter_mut() {
            *v = vertex_cluster[*v as usize];
        }
        match distinct_cycle(remapped).as_slice() {
            [a, b, c, d] => mesh.quads.push([*a, *b, *c, *d]),
            [a, b, c] => mesh.triangles.push([*a, *b, *c]),
            _ => (),
        }
    }

    tracing::trace!(
        "Merged {} vertices into {} clusters",
        buffer.positions.len(),
        mesh.points.len()
    );

    mesh
}

// Merges the clusters of one octree level. Returns the new clusters and the map from old cluster index to new.
fn merge_level(clusters: &[Cluster], min_alignment: f32) -> (Vec<Cluster>, Vec<u32>) {
    let mut next = Vec::with_capacity(clusters.len());
    let mut remap = vec![0; clusters.len()];

    let mut active = Vec::with_capacity(clusters.len());
    for (i, c) in clusters.iter().enumerate() {
        if c.frozen {
            carry(i, *c, &mut next, &mut remap);
        } else {
            active.push(i);
        }
    }
    active.sort_by_key(|&i| (clusters[i].key >> 1).0);

    for (parent_key, group) in &active.into_iter().group_by(|&i| clusters[i].key >> 1) {
        let members: Vec<usize> = group.collect();
        if members.len() == 1 {
            let mut c = clusters[members[0]];
            c.key = parent_key;
            carry(members[0], c, &mut next, &mut remap);
            continue;
        }

        let weighted_normal = members.iter().fold(Point3f::ZERO, |acc, &i| {
            acc + clusters[i].normal * clusters[i].count as f32
        });
        let average_normal = weighted_normal.normalized();
        let is_flat = average_normal != Point3f::ZERO
            && members
                .iter()
                .all(|&i| clusters[i].normal.dot(&average_normal) >= min_alignment);

        if is_flat {
            let merged = Cluster {
                key: parent_key,
                position_sum: members
                    .iter()
                    .fold(Point3d::ZERO, |acc, &i| acc + clusters[i].position_sum),
                count: members.iter().map(|&i| clusters[i].count).sum(),
                normal: average_normal,
                frozen: false,
            };
            let merged_index = next.len() as u32;
            next.push(merged);
            for &i in members.iter() {
                remap[i] = merged_index;
            }
        } else {
            for &i in members.iter() {
                let mut c = clusters[i];
                c.frozen = true;
                carry(i, c, &mut next, &mut remap);
            }
        }
    }

    (next, remap)
}

// Moves `cluster` into `next` unchanged, recording where old cluster `i` went.
fn carry(i: usize, cluster: Cluster, next: &mut Vec<Cluster>, remap: &mut [u32]) {
    remap[i] = next.len() as u32;
    next.push(cluster);
}

// Removes repeated indices from a polygon while keeping its winding. A polygon that only repeats a non-adjacent index is
// degenerate and comes back empty.
fn distinct_cycle(polygon: [u32; 4]) -> Vec<u32> {
    let mut out: Vec<u32> = Vec::with_capacity(4);
    for &v in polygon.iter() {
        if out.last() != Some(&v) {
            out.push(v);
        }
    }
    while out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    if out.iter().unique().count() != out.len() {
        out.clear();
    }

    out
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
    use crate::{volume_to_mesh, MeshSettings};

    use imvdb_storage::{copy_from_dense, FloatGrid, Tree};
    use utilities::data_sets::{cube_extent, cube_sdf, sphere_sdf};

    fn grid(dense: &imvdb_storage::Array3<f32>) -> FloatGrid {
        let mut tree = Tree::new(3.0);
        copy_from_dense(dense, &mut tree, 0.0);

        FloatGrid::from_tree(tree)
    }

    #[test]
    fn distinct_cycle_classifies_faces() {
        assert_eq!(distinct_cycle([1, 2, 3, 4]), vec![1, 2, 3, 4]);
        assert_eq!(distinct_cycle([1, 1, 3, 4]), vec![1, 3, 4]);
        assert_eq!(distinct_cycle([4, 2, 3, 4]), vec![4, 2, 3]);
        assert_eq!(distinct_cycle([1, 2, 1, 3]), Vec::<u32>::new());
        assert_eq!(distinct_cycle([5, 5, 5, 6]).len(), 2);
    }

    #[test]
    fn flat_faces_coarsen() {
        let dense = cube_sdf(cube_extent(40), Point3f::fill(4.0), Point3f::fill(35.0));
        let grid = grid(&dense);

        let uniform = volume_to_mesh(&grid, MeshSettings::new(0.0));
        let adaptive = volume_to_mesh(&grid, MeshSettings::new(0.0).with_adaptivity(0.5));

        assert!(uniform.triangles.is_empty());
        assert!(adaptive.points.len() < uniform.points.len());
        assert!(adaptive.num_faces() < uniform.num_faces());
        assert!(!adaptive.is_empty());

        // Coarsening never moves the surface outside of the cells it was found in.
        let (min, max) = adaptive.bounding_box().unwrap();
        let (umin, umax) = uniform.bounding_box().unwrap();
        for i in 0..3 {
            assert!(min[i] >= umin[i] - 1e-4 && max[i] <= umax[i] + 1e-4);
        }
    }

    #[test]
    fn zero_adaptivity_threshold_only_merges_identical_normals() {
        let grid = grid(&sphere_sdf(24, 8.0));

        let uniform = volume_to_mesh(&grid, MeshSettings::new(0.0));
        let nearly_uniform = volume_to_mesh(&grid, MeshSettings::new(0.0).with_adaptivity(1e-6));

        assert!(nearly_uniform.points.len() <= uniform.points.len());
        assert!(nearly_uniform.points.len() * 2 > uniform.points.len());
    }
}
