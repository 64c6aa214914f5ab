//! Midpoint subdivision.
//!
//! Each pass splits every triangle into four by inserting a vertex at the
//! middle of each edge. Original vertices keep their positions, so the
//! surface shape is unchanged while the triangle count grows by 4x per pass.
//! Edge midpoints are shared through a [`MidpointIndex`] built fresh for the
//! pass.

use tracing::debug;

use crate::GeometryModel;
use crate::midpoint::MidpointIndex;
use crate::tracing_ext::OperationTimer;

/// Parameters for multi-pass subdivision.
#[derive(Debug, Clone)]
pub struct SubdivideParams {
    /// Number of passes.
    /// Each pass quadruples the triangle count.
    /// Default: 1
    pub iterations: usize,
}

impl Default for SubdivideParams {
    fn default() -> Self {
        Self { iterations: 1 }
    }
}

impl SubdivideParams {
    /// Create params for a single pass.
    pub fn single() -> Self {
        Self::default()
    }

    /// Create params for several passes.
    pub fn with_iterations(iterations: usize) -> Self {
        Self { iterations }
    }

    /// Triangle count after subdivision of a mesh with `triangles` triangles.
    pub fn expected_triangles(&self, triangles: usize) -> usize {
        (0..self.iterations).fold(triangles, |t, _| t.saturating_mul(4))
    }
}

/// Result of multi-pass subdivision.
#[derive(Debug, Clone)]
pub struct SubdivideResult {
    /// The subdivided mesh.
    pub mesh: GeometryModel,
    pub original_triangles: usize,
    pub final_triangles: usize,
    pub original_vertices: usize,
    pub final_vertices: usize,
    /// Number of passes performed.
    pub iterations_performed: usize,
}

impl std::fmt::Display for SubdivideResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Subdivision: {} → {} triangles, {} → {} vertices, {} passes",
            self.original_triangles,
            self.final_triangles,
            self.original_vertices,
            self.final_vertices,
            self.iterations_performed
        )
    }
}

/// One subdivision pass over a mesh.
///
/// The controller only talks to subdivision through this trait, so a caller
/// can substitute a different refinement scheme or an instrumented wrapper.
pub trait Subdivider {
    /// Refine `mesh` in place by one level. Derived attributes are left stale.
    fn subdivide_pass(&mut self, mesh: &mut GeometryModel);
}

/// The 1-to-4 midpoint split.
#[derive(Debug, Clone, Copy, Default)]
pub struct MidpointSubdivider;

impl Subdivider for MidpointSubdivider {
    fn subdivide_pass(&mut self, mesh: &mut GeometryModel) {
        subdivide_once(mesh);
    }
}

/// Perform one midpoint subdivision pass in place.
///
/// For a source triangle `(v0, v1, v2)` with edge midpoints
/// `a = mid(v0, v1)`, `b = mid(v1, v2)`, `c = mid(v2, v0)` the pass emits
///
/// ```text
///          v2
///         /  \
///        c----b
///       / \  / \
///     v0---a----v1
/// ```
///
/// `(v0, a, c)`, `(v1, b, a)`, `(v2, c, b)` and the center `(a, b, c)`, all
/// with the winding of the source triangle.
///
/// Normals and bounds are not recomputed; call
/// [`GeometryModel::recompute_derived`] after the last pass.
///
/// # Panics
/// Panics if a triangle references a vertex that does not exist.
/// Models built with [`GeometryModel::from_parts`] never do.
pub fn subdivide_once(mesh: &mut GeometryModel) {
    let source = std::mem::take(&mut mesh.triangles);
    let triangle_count = source.len() / 3;

    // A closed mesh has ~1.5 edges per triangle
    let mut midpoints = MidpointIndex::with_capacity(triangle_count * 3 / 2);
    let mut triangles = Vec::with_capacity(triangle_count * 12);
    mesh.vertices.reserve(triangle_count * 3 / 2);

    for tri in source.chunks_exact(3) {
        let (v0, v1, v2) = (tri[0], tri[1], tri[2]);

        let a = midpoints.get_or_create(&mut mesh.vertices, v0, v1);
        let b = midpoints.get_or_create(&mut mesh.vertices, v1, v2);
        let c = midpoints.get_or_create(&mut mesh.vertices, v2, v0);

        triangles.extend_from_slice(&[v0, a, c]);
        triangles.extend_from_slice(&[v1, b, a]);
        triangles.extend_from_slice(&[v2, c, b]);
        triangles.extend_from_slice(&[a, b, c]);
    }

    mesh.triangles = triangles;

    debug!(
        target: "mesh_detail::subdivide",
        triangles = mesh.triangle_count(),
        vertices = mesh.vertex_count(),
        midpoints = midpoints.len(),
        "Subdivision pass complete"
    );
}

/// Subdivide a copy of `mesh` with the given number of passes.
///
/// Each pass runs on the output of the previous one. Derived attributes of
/// the result are recomputed once at the end. The input is never modified.
///
/// # Example
/// ```
/// use mesh_detail::{GeometryModel, SubdivideParams, subdivide_mesh};
/// use nalgebra::Point3;
///
/// let mesh = GeometryModel::from_parts(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![0, 1, 2],
/// )?;
///
/// let result = subdivide_mesh(&mesh, &SubdivideParams::single());
/// assert_eq!(result.final_triangles, 4);
/// assert_eq!(result.final_vertices, 6);
/// # Ok::<(), mesh_detail::DetailError>(())
/// ```
pub fn subdivide_mesh(mesh: &GeometryModel, params: &SubdivideParams) -> SubdivideResult {
    let original_triangles = mesh.triangle_count();
    let original_vertices = mesh.vertex_count();

    if original_triangles == 0 || params.iterations == 0 {
        return SubdivideResult {
            mesh: mesh.clone(),
            original_triangles,
            final_triangles: original_triangles,
            original_vertices,
            final_vertices: original_vertices,
            iterations_performed: 0,
        };
    }

    let _timer = OperationTimer::with_context("subdivide", original_triangles, original_vertices);

    let mut current = mesh.clone();
    for _ in 0..params.iterations {
        subdivide_once(&mut current);
    }
    current.recompute_derived();

    SubdivideResult {
        final_triangles: current.triangle_count(),
        final_vertices: current.vertex_count(),
        mesh: current,
        original_triangles,
        original_vertices,
        iterations_performed: params.iterations,
    }
}
