//! Unsigned distance to an interface on a dense lattice, in voxel units.
//!
//! Voxels next to the interface are seeded with sub-voxel distances from linear interpolation along each axis. Every other
//! voxel solves the Eikonal equation `|grad u| = 1` with Godunov's upwind scheme, sweeping the lattice in all 8 axis orderings
//! until no value changes by more than the convergence threshold.

use imvdb_core::prelude::*;
use imvdb_storage::{Array3, Local, Stride};

/// Distances at or beyond this limit are left at infinity.
pub(crate) struct SweepLimits {
    pub max_distance: f32,
    pub max_sweeps: usize,
    pub convergence: f32,
}

/// The unsigned distance (in voxels) from every point of `values.extent()` to the surface where `values` crosses `iso_value`.
/// Returns the distances and, parallel to them, whether each point is inside (`value > iso_value`).
pub(crate) fn distance_to_interface(values: &Array3<f32>, iso_value: f32, limits: &SweepLimits) -> (Array3<f32>, Vec<bool>) {
    let inside: Vec<bool> = values.values_slice().iter().map(|v| *v > iso_value).collect();
    let mut distance = Array3::fill(*values.extent(), f32::INFINITY);
    let mut fixed = vec![false; inside.len()];

    let num_seeds = seed_interface(values, &inside, iso_value, &mut distance, &mut fixed);
    let num_sweeps = if num_seeds > 0 {
        sweep(&mut distance, &fixed, limits)
    } else {
        0
    };

    tracing::debug!(
        "Seeded {} interface voxels; converged after {} sweeps",
        num_seeds,
        num_sweeps
    );

    (distance, inside)
}

fn axis_strides<T>(array: &Array3<T>) -> [Stride; 3] {
    let mut strides = [Stride(0); 3];
    let axes = [
        Local(PointN([1, 0, 0])),
        Local(PointN([0, 1, 0])),
        Local(PointN([0, 0, 1])),
    ];
    array.strides_from_local_points(&axes, &mut strides);

    strides
}

// Each voxel with a neighbor on the other side of the interface gets the distance to the plane through the axis crossings:
// 1 / sqrt(sum over crossing axes of 1 / d_axis^2).
fn seed_interface(
    values: &Array3<f32>,
    inside: &[bool],
    iso_value: f32,
    distance: &mut Array3<f32>,
    fixed: &mut [bool],
) -> usize {
    let shape = values.shape();
    let strides = axis_strides(values);
    let v = values.values_slice();
    let mut num_seeds = 0;

    for x in 0..shape[0] {
        for y in 0..shape[1] {
            for z in 0..shape[2] {
                let local = [x, y, z];
                let i = values.stride_from_local_point(Local(PointN([x as i32, y as i32, z as i32]))).0;

                let mut inv_sq_sum = 0.0;
                let mut on_interface = false;
                for axis in 0..3 {
                    let s = strides[axis].0;
                    let mut nearest = f32::INFINITY;
                    let neighbors = [
                        (local[axis] > 0).then(|| i - s),
                        (local[axis] + 1 < shape[axis]).then(|| i + s),
                    ];
                    for j in neighbors.iter().flatten() {
                        if inside[*j] != inside[i] {
                            let t = (iso_value - v[i]) / (v[*j] - v[i]);
                            nearest = nearest.min(t.abs());
                        }
                    }
                    if nearest.is_finite() {
                        on_interface = true;
                        if nearest <= f32::EPSILON {
                            inv_sq_sum = f32::INFINITY;
                        } else {
                            inv_sq_sum += 1.0 / (nearest * nearest);
                        }
                    }
                }

                if on_interface {
                    distance.values_mut_slice()[i] = 1.0 / inv_sq_sum.sqrt();
                    fixed[i] = true;
                    num_seeds += 1;
                }
            }
        }
    }

    num_seeds
}

const ORDERINGS: [[bool; 3]; 8] = [
    [false, false, false],
    [true, false, false],
    [false, true, false],
    [true, true, false],
    [false, false, true],
    [true, false, true],
    [false, true, true],
    [true, true, true],
];

// Returns the number of full passes (all 8 orderings) that ran.
fn sweep(distance: &mut Array3<f32>, fixed: &[bool], limits: &SweepLimits) -> usize {
    let shape = distance.shape();
    let strides = axis_strides(distance);
    let u = distance.values_mut_slice();

    let ordered = |n: usize, reverse: bool, k: usize| if reverse { n - 1 - k } else { k };

    for pass in 0..limits.max_sweeps {
        let mut max_change = 0.0f32;
        for [rx, ry, rz] in ORDERINGS.iter() {
            for xi in 0..shape[0] {
                let x = ordered(shape[0], *rx, xi);
                for yi in 0..shape[1] {
                    let y = ordered(shape[1], *ry, yi);
                    for zi in 0..shape[2] {
                        let z = ordered(shape[2], *rz, zi);
                        let local = [x, y, z];
                        let i = (x * shape[1] + y) * shape[2] + z;
                        if fixed[i] {
                            continue;
                        }

                        let mut upwind = [f32::INFINITY; 3];
                        for axis in 0..3 {
                            let s = strides[axis].0;
                            if local[axis] > 0 {
                                upwind[axis] = upwind[axis].min(u[i - s]);
                            }
                            if local[axis] + 1 < shape[axis] {
                                upwind[axis] = upwind[axis].min(u[i + s]);
                            }
                        }

                        let candidate = solve_eikonal(upwind);
                        if candidate < u[i] && candidate < limits.max_distance {
                            let change = if u[i].is_finite() {
                                u[i] - candidate
                            } else {
                                f32::INFINITY
                            };
                            max_change = max_change.max(change);
                            u[i] = candidate;
                        }
                    }
                }
            }
        }

        if max_change <= limits.convergence {
            return pass + 1;
        }
    }

    limits.max_sweeps
}

/// Godunov upwind solution of `|grad u| = 1` with unit spacing, given the smallest neighbor value along each axis.
pub(crate) fn solve_eikonal(mut upwind: [f32; 3]) -> f32 {
    upwind.sort_by(|a, b| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal));
    let [a, b, c] = upwind;
    if a.is_infinite() {
        return f32::INFINITY;
    }

    let u = a + 1.0;
    if u <= b {
        return u;
    }

    let u = 0.5 * (a + b + (2.0 - (a - b) * (a - b)).sqrt());
    if u <= c {
        return u;
    }

    let sum = a + b + c;
    let discriminant = sum * sum - 3.0 * (a * a + b * b + c * c - 1.0);

    (sum + discriminant.max(0.0).sqrt()) / 3.0
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
