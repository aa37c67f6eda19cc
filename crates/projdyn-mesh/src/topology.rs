//! Mesh topology queries.
//!
//! Builds edge data from the face and element index buffers. Used by the
//! edge-length factory and by the generators to extract the boundary
//! surface of a tetrahedral mesh.

use std::collections::{HashMap, HashSet};

/// Local faces of a tetrahedron, wound outward for a positively oriented
/// element (`det [x1-x0, x2-x0, x3-x0] > 0`).
const TET_FACES: [[usize; 3]; 4] = [[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];

/// Unique undirected edges of all faces and tetrahedra, sorted.
pub fn unique_edges(faces: &[[usize; 3]], elements: &[[usize; 4]]) -> Vec<[usize; 2]> {
    let mut set: HashSet<[usize; 2]> = HashSet::new();
    for &[a, b, c] in faces {
        for (v0, v1) in [(a, b), (b, c), (c, a)] {
            set.insert(edge_key(v0, v1));
        }
    }
    for tet in elements {
        for i in 0..4 {
            for j in (i + 1)..4 {
                set.insert(edge_key(tet[i], tet[j]));
            }
        }
    }
    let mut edges: Vec<_> = set.into_iter().collect();
    edges.sort_unstable();
    edges
}

/// Faces that belong to exactly one tetrahedron, keeping outward winding.
pub fn boundary_faces(elements: &[[usize; 4]]) -> Vec<[usize; 3]> {
    let mut seen: HashMap<[usize; 3], (usize, [usize; 3])> = HashMap::new();
    let mut order = Vec::new();
    for tet in elements {
        for local in TET_FACES {
            let face = local.map(|i| tet[i]);
            let mut key = face;
            key.sort_unstable();
            let entry = seen.entry(key).or_insert_with(|| {
                order.push(key);
                (0, face)
            });
            entry.0 += 1;
        }
    }
    order
        .into_iter()
        .filter_map(|key| match seen.get(&key) {
            Some(&(1, face)) => Some(face),
            _ => None,
        })
        .collect()
}

#[inline]
fn edge_key(a: usize, b: usize) -> [usize; 2] {
    if a < b {
        [a, b]
    } else {
        [b, a]
    }
}
