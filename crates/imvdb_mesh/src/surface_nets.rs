use imvdb_core::prelude::*;
use imvdb_storage::{GridClass, GridValue, SmallKeyHashMap, ValueAccessor, VolumeGrid, LEAF_INDEXER};

/// Working memory of `extract_surface`. These buffers can be reused to avoid reallocating memory.
#[derive(Default)]
pub struct SurfaceBuffer {
    /// World-space position of each surface vertex.
    pub positions: Vec<[f32; 3]>,
    /// Index-space gradient of the field at each vertex, pointing out of the surface. *Not* normalized.
    pub normals: Vec<[f32; 3]>,
    /// Minimum corner of the cell that contains each vertex. Parallel to `positions`.
    pub surface_cells: Vec<Point3i>,
    /// One quad for each lattice edge that crosses the surface.
    pub quads: Vec<[u32; 4]>,

    // Bit i is set iff corner i of the surface cell is inside. Parallel to `surface_cells`.
    inside_masks: Vec<u8>,
    candidate_cells: Vec<Point3i>,
    cell_to_index: SmallKeyHashMap<Point3i, u32>,
}

impl SurfaceBuffer {
    /// Clears all of the buffers, but keeps the memory allocated for reuse.
    pub fn reset(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.surface_cells.clear();
        self.quads.clear();
        self.inside_masks.clear();
        self.candidate_cells.clear();
        self.cell_to_index.clear();
    }
}

/// Dual contouring of the isosurface of `grid` at `iso_value`, with vertices placed like Naive Surface Nets:
///   - positions estimated as the centroid of cube edge crossings
///   - surface normals estimated from the trilinear gradient
///
/// Values below `iso_value` are inside the surface, except for fog volumes where density above `iso_value` is inside. Either
/// way, quads face out of the surface.
///
/// A lattice edge can only cross the surface if at least one of its endpoints is in a stored node, so only the cells touching
/// stored nodes are examined.
pub fn extract_surface<T>(grid: &VolumeGrid<T>, iso_value: f32, output: &mut SurfaceBuffer)
where
    T: GridValue,
{
    output.reset();

    let field = SignedField {
        accessor: grid.tree().accessor(),
        iso_value,
        sign: if grid.grid_class() == GridClass::FogVolume {
            -1.0
        } else {
            1.0
        },
    };

    find_candidate_cells(grid, &mut output.candidate_cells);
    estimate_surface(&field, grid.transform(), output);
    make_all_quads(output);

    tracing::trace!(
        "Examined {} cells; {} intersect the surface",
        output.candidate_cells.len(),
        output.surface_cells.len()
    );
}

/// Grid values shifted so that the surface is at zero and negative values are inside.
struct SignedField<'a, T> {
    accessor: ValueAccessor<'a, T>,
    iso_value: f32,
    sign: f32,
}

impl<'a, T> SignedField<'a, T>
where
    T: GridValue,
{
    #[inline]
    fn get(&self, p: Point3i) -> f32 {
        self.sign * (self.accessor.get(p).as_f64() as f32 - self.iso_value)
    }
}

// Every cell with a corner in a stored node, sorted and without duplicates.
fn find_candidate_cells<T>(grid: &VolumeGrid<T>, cells: &mut Vec<Point3i>)
where
    T: GridValue,
{
    for node_min in grid.tree().sorted_node_mins() {
        let node_extent = LEAF_INDEXER.extent_for_node_with_min(node_min);
        let cell_mins = Extent3i::from_min_and_lub(node_extent.minimum - Point3i::ONES, node_extent.least_upper_bound());
        cells.extend(cell_mins.iter_points());
    }
    cells.sort_by_key(|p| p.0);
    cells.dedup();
}

// Find all vertex positions and normals. Also generate a map from cell to vertex index to be used to look up vertices when
// generating quads.
fn estimate_surface<T>(field: &SignedField<'_, T>, transform: &Transform, output: &mut SurfaceBuffer)
where
    T: GridValue,
{
    for &cell in output.candidate_cells.iter() {
        // Get the signed values at each corner of this cube.
        let mut corner_dists = [0.0; 8];
        let mut inside_mask = 0u8;
        for (i, (dist, offset)) in corner_dists
            .iter_mut()
            .zip(Point3i::CUBE_CORNER_OFFSETS.iter())
            .enumerate()
        {
            let d = field.get(cell + *offset);
            *dist = d;
            if d < 0.0 {
                inside_mask |= 1 << i;
            }
        }

        if inside_mask == 0 || inside_mask == 0xff {
            // No crossings.
            continue;
        }

        let centroid = centroid_of_edge_intersections(&corner_dists);
        let index_position = Point3d::from(cell) + Point3d::from(centroid);
        let PointN([x, y, z]) = transform.index_to_world(index_position);

        output
            .cell_to_index
            .insert(cell, output.positions.len() as u32);
        output.positions.push([x as f32, y as f32, z as f32]);
        output.normals.push(sdf_gradient(&corner_dists, &centroid));
        output.surface_cells.push(cell);
        output.inside_masks.push(inside_mask);
    }
}

const CUBE_EDGES: [[usize; 2]; 12] = [
    [0b000, 0b001],
    [0b000, 0b010],
    [0b000, 0b100],
    [0b001, 0b011],
    [0b001, 0b101],
    [0b010, 0b011],
    [0b010, 0b110],
    [0b011, 0b111],
    [0b100, 0b101],
    [0b100, 0b110],
    [0b101, 0b111],
    [0b110, 0b111],
];

// The estimated surface point is the average of the points where the surface crosses each cube edge.
fn centroid_of_edge_intersections(dists: &[f32; 8]) -> Point3f {
    let mut count = 0;
    let mut sum = Point3f::ZERO;
    for [corner1, corner2] in CUBE_EDGES.iter() {
        let d1 = dists[*corner1];
        let d2 = dists[*corner2];
        if (d1 < 0.0) != (d2 < 0.0) {
            count += 1;
            sum += estimate_surface_edge_intersection(*corner1, *corner2, d1, d2);
        }
    }

    sum / count as f32
}

// Given two cube corners, find the point between them where the field is zero.
fn estimate_surface_edge_intersection(corner1: usize, corner2: usize, value1: f32, value2: f32) -> Point3f {
    let interp1 = value1 / (value1 - value2);
    let interp2 = 1.0 - interp1;

    PointN([
        (corner1 & 1) as f32 * interp2 + (corner2 & 1) as f32 * interp1,
        ((corner1 >> 1) & 1) as f32 * interp2 + ((corner2 >> 1) & 1) as f32 * interp1,
        ((corner1 >> 2) & 1) as f32 * interp2 + ((corner2 >> 2) & 1) as f32 * interp1,
    ])
}

/// The gradient of the trilinear interpolation of the corner values at `s`.
///
/// For each dimension, there are 4 cube edges along that axis. This does bilinear interpolation between the differences along
/// those edges based on the position of the surface (s).
fn sdf_gradient(dists: &[f32; 8], s: &Point3f) -> [f32; 3] {
    let nx = 1.0 - s.x();
    let ny = 1.0 - s.y();
    let nz = 1.0 - s.z();

    let dx_z0 = ny * (dists[0b001] - dists[0b000]) + s.y() * (dists[0b011] - dists[0b010]);
    let dx_z1 = ny * (dists[0b101] - dists[0b100]) + s.y() * (dists[0b111] - dists[0b110]);
    let dx = nz * dx_z0 + s.z() * dx_z1;

    let dy_x0 = nz * (dists[0b010] - dists[0b000]) + s.z() * (dists[0b110] - dists[0b100]);
    let dy_x1 = nz * (dists[0b011] - dists[0b001]) + s.z() * (dists[0b111] - dists[0b101]);
    let dy = nx * dy_x0 + s.x() * dy_x1;

    let dz_y0 = nx * (dists[0b100] - dists[0b000]) + s.x() * (dists[0b101] - dists[0b001]);
    let dz_y1 = nx * (dists[0b110] - dists[0b010]) + s.x() * (dists[0b111] - dists[0b011]);
    let dz = ny * dz_y0 + s.y() * dz_y1;

    [dx, dy, dz]
}

// For every edge that crosses the isosurface, make a quad between the vertices of the four cells touching that edge. Every
// such edge starts at the minimum corner of a surface cell, so visiting the 3 edges leaving each surface cell's minimum corner
// finds each edge exactly once.
fn make_all_quads(output: &mut SurfaceBuffer) {
    for (p, &inside_mask) in output.surface_cells.iter().zip(output.inside_masks.iter()) {
        // Axis A with the orthogonal axes B and C.
        for &(a, b, c) in [(0, 1, 2), (1, 2, 0), (2, 0, 1)].iter() {
            let p1_inside = inside_mask & 1 != 0;
            let p2_inside = inside_mask & (1 << a) != 0;
            if let Some(quad) = maybe_make_quad(
                &output.cell_to_index,
                *p,
                p1_inside,
                p2_inside,
                Point3i::axis(b),
                Point3i::axis(c),
            ) {
                output.quads.push(quad);
            }
        }
    }
}

// Construct a quad in the dual graph of the lattice.
//
// The surface point s was found somewhere inside of the cube with minimal corner p1.
//
//       x ---- x
//      /      /|
//     x ---- x |
//     |   s  | x
//     |      |/
//    p1 --- p2
//
// And now we want to find the quad between p1 and p2 where s is a corner of the quad.
//
//          s
//         /|
//        / |
//       |  |
//   p1  |  |  p2
//       | /
//       |/
//
// If A is (of the three grid axes) the axis between p1 and p2,
//
//       A
//   p1 ---> p2
//
// then we must find the other 3 quad corners by moving along the other two axes (those orthogonal to A) in the negative
// directions; these are axis B and axis C.
fn maybe_make_quad(
    cell_to_index: &SmallKeyHashMap<Point3i, u32>,
    p1: Point3i,
    p1_inside: bool,
    p2_inside: bool,
    axis_b: Point3i,
    axis_c: Point3i,
) -> Option<[u32; 4]> {
    let negative_face = match (p1_inside, p2_inside) {
        (true, false) => false,
        (false, true) => true,
        _ => return None, // No face.
    };

    // The quad points, viewed face-front, look like this:
    // v1 v3
    // v2 v4
    let v1 = *cell_to_index.get(&p1)?;
    let v2 = *cell_to_index.get(&(p1 - axis_b))?;
    let v3 = *cell_to_index.get(&(p1 - axis_c))?;
    let v4 = *cell_to_index.get(&(p1 - axis_b - axis_c))?;

    if negative_face {
        Some([v1, v3, v4, v2])
    } else {
        Some([v1, v2, v4, v3])
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
