//! Truncation-based triangle reduction.
//!
//! Simplification keeps a prefix of the triangle list and drops the rest.
//! There is no error metric and no vertex merging: the kept triangles are the
//! first ones in the source order, unchanged, and the vertex list is left as
//! is (vertices used only by dropped triangles stay in place, unreferenced).
//!
//! Cutting the list can leave holes or stray triangles along the cut. That is
//! the expected output of this reducer.

use tracing::debug;

use crate::GeometryModel;
use crate::tracing_ext::OperationTimer;

/// Parameters for truncation simplification.
#[derive(Debug, Clone)]
pub struct SimplifyParams {
    /// Fraction of the index list to keep, in (0.0, 1.0].
    /// Default: 0.5
    pub ratio: f64,
}

impl Default for SimplifyParams {
    fn default() -> Self {
        Self { ratio: 0.5 }
    }
}

impl SimplifyParams {
    /// Create params keeping the given fraction of triangles.
    pub fn with_ratio(ratio: f64) -> Self {
        Self { ratio }
    }
}

/// Result of simplification.
#[derive(Debug, Clone)]
pub struct SimplifyResult {
    /// The simplified mesh.
    pub mesh: GeometryModel,
    pub original_triangles: usize,
    pub final_triangles: usize,
    /// Ratio actually applied after clamping.
    pub ratio: f64,
}

impl SimplifyResult {
    /// Number of triangles dropped.
    pub fn triangles_removed(&self) -> usize {
        self.original_triangles - self.final_triangles
    }
}

impl std::fmt::Display for SimplifyResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Simplification (ratio {:.2}): {} → {} triangles",
            self.ratio, self.original_triangles, self.final_triangles
        )
    }
}

/// Clamp a ratio into [0, 1]. NaN keeps everything.
#[inline]
fn effective_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() {
        1.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

/// Number of indices kept when truncating `index_count` indices at `ratio`.
///
/// This is `floor(index_count * ratio)` rounded down to a multiple of 3.
///
/// ```
/// use mesh_detail::truncation_index_count;
///
/// // Two triangles at half ratio keep one
/// assert_eq!(truncation_index_count(6, 0.5), 3);
/// assert_eq!(truncation_index_count(30, 0.25), 6);
/// ```
pub fn truncation_index_count(index_count: usize, ratio: f64) -> usize {
    let target = (index_count as f64 * effective_ratio(ratio)).floor() as usize;
    let target = target.min(index_count);
    target - target % 3
}

/// Truncate the triangle list of `mesh` in place.
///
/// Keeps the first [`truncation_index_count`] indices in their original
/// order. Vertices, normals and bounds are untouched. Returns the number of
/// triangles removed.
pub fn truncate_triangles(mesh: &mut GeometryModel, ratio: f64) -> usize {
    let before = mesh.triangle_count();
    let keep = truncation_index_count(mesh.index_count(), ratio);
    mesh.triangles.truncate(keep);
    let removed = before - mesh.triangle_count();

    debug!(
        target: "mesh_detail::simplify",
        ratio = effective_ratio(ratio),
        kept = mesh.triangle_count(),
        removed,
        "Truncated triangle list"
    );

    removed
}

/// Simplify a copy of `mesh` by truncation.
///
/// Derived attributes of the result are recomputed. At ratio 1.0 the result
/// is an exact copy.
///
/// # Example
/// ```
/// use mesh_detail::{GeometryModel, SimplifyParams, simplify_mesh};
/// use nalgebra::Point3;
///
/// let mesh = GeometryModel::from_parts(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(1.0, 1.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![0, 1, 2, 0, 2, 3],
/// )?;
///
/// let result = simplify_mesh(&mesh, &SimplifyParams::with_ratio(0.5));
/// assert_eq!(result.final_triangles, 1);
/// assert_eq!(result.mesh.triangles, vec![0, 1, 2]);
/// # Ok::<(), mesh_detail::DetailError>(())
/// ```
pub fn simplify_mesh(mesh: &GeometryModel, params: &SimplifyParams) -> SimplifyResult {
    let _timer = OperationTimer::with_context("simplify", mesh.triangle_count(), mesh.vertex_count());

    let original_triangles = mesh.triangle_count();
    let mut simplified = mesh.clone();
    truncate_triangles(&mut simplified, params.ratio);
    simplified.recompute_derived();

    SimplifyResult {
        final_triangles: simplified.triangle_count(),
        mesh: simplified,
        original_triangles,
        ratio: effective_ratio(params.ratio),
    }
}
