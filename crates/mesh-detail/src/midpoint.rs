//! Shared edge-midpoint lookup for a single subdivision pass.
//!
//! Two triangles that share an edge must split it at the same vertex,
//! otherwise the refined surface opens a crack along the seam. The index keys
//! each edge by its unordered endpoint pair so both triangles resolve to the
//! one midpoint created first.
//!
//! An index belongs to exactly one pass. Vertex indices are renumbered by
//! every pass, so a map carried over would pair vertices that are no longer
//! adjacent.

use hashbrown::HashMap;
use nalgebra::Point3;

/// Canonical key for the undirected edge between two vertex indices.
///
/// The smaller index occupies the high 32 bits, so `edge_key(a, b) ==
/// edge_key(b, a)` for every pair.
#[inline]
pub fn edge_key(a: u32, b: u32) -> u64 {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    (u64::from(lo) << 32) | u64::from(hi)
}

/// Maps each split edge to the midpoint vertex created for it.
#[derive(Debug, Clone, Default)]
pub struct MidpointIndex {
    midpoints: HashMap<u64, u32>,
}

impl MidpointIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index sized for the expected number of distinct edges.
    pub fn with_capacity(edges: usize) -> Self {
        Self {
            midpoints: HashMap::with_capacity(edges),
        }
    }

    /// Return the midpoint vertex of edge `(a, b)`, creating it on first use.
    ///
    /// A new midpoint is the mean of the two endpoint positions and is
    /// appended to `vertices`. Later requests for the same edge, in either
    /// direction, return the existing index without touching `vertices`.
    ///
    /// # Panics
    /// Panics if `a` or `b` is not a valid index into `vertices`.
    pub fn get_or_create(&mut self, vertices: &mut Vec<Point3<f64>>, a: u32, b: u32) -> u32 {
        *self.midpoints.entry(edge_key(a, b)).or_insert_with(|| {
            let mid = nalgebra::center(&vertices[a as usize], &vertices[b as usize]);
            let idx = vertices.len() as u32;
            vertices.push(mid);
            idx
        })
    }

    /// Midpoint already created for edge `(a, b)`, if any.
    #[inline]
    pub fn get(&self, a: u32, b: u32) -> Option<u32> {
        self.midpoints.get(&edge_key(a, b)).copied()
    }

    /// Number of edges split so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.midpoints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.midpoints.is_empty()
    }
}
