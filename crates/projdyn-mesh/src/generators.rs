//! Deterministic fixture meshes for tests and the headless driver.
//!
//! All generators produce unit-mass meshes with no constraints.

use projdyn_math::decomposition::edge_matrix;
use projdyn_math::DVec3;

use crate::mesh::DeformableMesh;
use crate::topology::boundary_faces;

/// Generates a flat rectangular cloth grid in the XY plane.
///
/// The grid spans `[-width/2, width/2]` in X and `[-height/2, height/2]` in Y
/// at Z=0. Vertices are laid out row by row starting from the top
/// (`y = +height/2`), so the top corners are `0` and `cols`.
///
/// # Example
/// ```
/// use projdyn_mesh::generators::cloth_grid;
/// let mesh = cloth_grid(2, 2, 1.0, 1.0);
/// assert_eq!(mesh.vertex_count(), 9);
/// assert_eq!(mesh.faces().len(), 8);
/// ```
pub fn cloth_grid(cols: usize, rows: usize, width: f64, height: f64) -> DeformableMesh {
    let cols = cols.max(1);
    let rows = rows.max(1);
    let verts_x = cols + 1;
    let verts_y = rows + 1;

    let half_w = width / 2.0;
    let half_h = height / 2.0;

    let mut positions = Vec::with_capacity(verts_x * verts_y);
    for j in 0..verts_y {
        for i in 0..verts_x {
            let u = i as f64 / cols as f64;
            let v = j as f64 / rows as f64;
            positions.push(DVec3::new(-half_w + u * width, half_h - v * height, 0.0));
        }
    }

    let mut faces = Vec::with_capacity(cols * rows * 2);
    for j in 0..rows {
        for i in 0..cols {
            let top_left = j * verts_x + i;
            let top_right = top_left + 1;
            let bot_left = top_left + verts_x;
            let bot_right = bot_left + 1;

            faces.push([top_left, bot_left, top_right]);
            faces.push([top_right, bot_left, bot_right]);
        }
    }

    let masses = vec![1.0; positions.len()];
    DeformableMesh::from_parts(positions, faces, Vec::new(), masses)
}

/// Generates an `nx × ny × nz` block of cubes of edge `size`, each split
/// into six positively oriented tetrahedra, with the boundary surface as
/// faces. The block starts at the origin and extends along +X, +Y, +Z.
pub fn tet_bar(nx: usize, ny: usize, nz: usize, size: f64) -> DeformableMesh {
    let nx = nx.max(1);
    let ny = ny.max(1);
    let nz = nz.max(1);
    let vid = |i: usize, j: usize, k: usize| (k * (ny + 1) + j) * (nx + 1) + i;

    let mut positions = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));
    for k in 0..=nz {
        for j in 0..=ny {
            for i in 0..=nx {
                positions.push(DVec3::new(i as f64, j as f64, k as f64) * size);
            }
        }
    }

    // Kuhn subdivision: one tetrahedron per axis ordering, all sharing the
    // cube diagonal, so neighbouring cubes conform.
    const AXIS_ORDERS: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    let mut elements = Vec::with_capacity(nx * ny * nz * 6);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                for order in AXIS_ORDERS {
                    let mut corner = [i, j, k];
                    let mut tet = [vid(i, j, k); 4];
                    for (slot, axis) in order.into_iter().enumerate() {
                        corner[axis] += 1;
                        tet[slot + 1] = vid(corner[0], corner[1], corner[2]);
                    }
                    let [a, b, c, d] = tet.map(|v| positions[v]);
                    if edge_matrix(a, b, c, d).determinant() < 0.0 {
                        tet.swap(2, 3);
                    }
                    elements.push(tet);
                }
            }
        }
    }

    let faces = boundary_faces(&elements);
    let masses = vec![1.0; positions.len()];
    DeformableMesh::from_parts(positions, faces, elements, masses)
}

/// The unit right-corner tetrahedron with its four faces.
pub fn single_tetrahedron() -> DeformableMesh {
    let positions = vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z];
    let elements = vec![[0, 1, 2, 3]];
    let faces = boundary_faces(&elements);
    DeformableMesh::from_parts(positions, faces, elements, vec![1.0; 4])
}
