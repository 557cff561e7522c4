//! Which adjacent chunks share a boundary with a local cell.

use blockmania_world::ChunkDims;

/// Grid offsets of the 8 neighbors, indexed in this fixed order:
/// +X, -X, +Z, -Z, +X+Z, -X-Z, -X+Z, +X-Z.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
];

/// Indices into [`NEIGHBOR_OFFSETS`] of the chunks whose mesh can see a change at local `(x, z)`.
///
/// Edge neighbors are included when the cell sits on the matching face;
/// corner neighbors only when it sits on both faces.
pub fn boundary_neighbors(x: usize, z: usize, dims: ChunkDims) -> Vec<usize> {
    let min_x = x == 0;
    let max_x = x + 1 == dims.x;
    let min_z = z == 0;
    let max_z = z + 1 == dims.z;
    let mut out = Vec::with_capacity(3);
    if max_x {
        out.push(0);
    }
    if min_x {
        out.push(1);
    }
    if max_z {
        out.push(2);
    }
    if min_z {
        out.push(3);
    }
    if max_x && max_z {
        out.push(4);
    }
    if min_x && min_z {
        out.push(5);
    }
    if min_x && max_z {
        out.push(6);
    }
    if max_x && min_z {
        out.push(7);
    }
    out
}
