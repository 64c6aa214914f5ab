//! Core geometry types.

use nalgebra::{Point3, Vector3};

use crate::error::{DetailError, DetailResult};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create a bounding box from two corners.
    #[inline]
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Compute the bounding box of a set of points.
    /// Returns None if there are no points.
    pub fn from_points(points: &[Point3<f64>]) -> Option<Self> {
        let (first, rest) = points.split_first()?;

        let mut min = *first;
        let mut max = *first;

        for p in rest {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some(Self { min, max })
    }

    /// Extent along each axis.
    #[inline]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }
}

/// A triangle mesh stored as a vertex list and a flat index list.
///
/// Every three consecutive entries of `triangles` form one triangle, with
/// counter-clockwise winding when viewed from outside. Normals and bounds are
/// derived attributes; they are only refreshed by [`recompute_derived`].
///
/// Cloning produces fully independent storage, so a clone can be edited
/// without touching the source.
///
/// [`recompute_derived`]: GeometryModel::recompute_derived
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryModel {
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,

    /// Flat triangle index list, length divisible by 3.
    pub triangles: Vec<u32>,

    normals: Vec<Vector3<f64>>,
    bounds: Option<Aabb>,
}

impl GeometryModel {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a model with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count * 3),
            normals: Vec::new(),
            bounds: None,
        }
    }

    /// Build a model from raw parts, validating the index list.
    ///
    /// Derived attributes are computed before returning.
    pub fn from_parts(vertices: Vec<Point3<f64>>, triangles: Vec<u32>) -> DetailResult<Self> {
        let mut model = Self::from_parts_unchecked(vertices, triangles);
        model.validate()?;
        model.recompute_derived();
        Ok(model)
    }

    /// Build a model from raw parts without validation or derived attributes.
    pub fn from_parts_unchecked(vertices: Vec<Point3<f64>>, triangles: Vec<u32>) -> Self {
        Self {
            vertices,
            triangles,
            normals: Vec::new(),
            bounds: None,
        }
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of whole triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Number of entries in the flat index list.
    #[inline]
    pub fn index_count(&self) -> usize {
        self.triangles.len()
    }

    /// Check if the model has no vertices or no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.triangles.len() < 3
    }

    /// Get the index triple of a triangle.
    pub fn triangle(&self, idx: usize) -> Option<[u32; 3]> {
        let start = idx.checked_mul(3)?;
        let end = start.checked_add(3)?;
        match self.triangles.get(start..end)? {
            &[a, b, c] => Some([a, b, c]),
            _ => None,
        }
    }

    /// Iterate over triangles as index triples.
    pub fn triangle_indices(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangles.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Iterate over triangles with their vertex positions.
    pub fn triangles_geometry(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.triangle_indices().map(|[i0, i1, i2]| {
            Triangle::new(
                self.vertices[i0 as usize],
                self.vertices[i1 as usize],
                self.vertices[i2 as usize],
            )
        })
    }

    /// Per-vertex normals from the last [`recompute_derived`](Self::recompute_derived).
    ///
    /// Empty until derived attributes have been computed.
    #[inline]
    pub fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    /// Bounding box from the last [`recompute_derived`](Self::recompute_derived).
    #[inline]
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        self.triangles_geometry().map(|tri| tri.area()).sum()
    }

    /// Check structural invariants.
    ///
    /// Reports the first problem found: an index list that is not a whole
    /// number of triangles, an out-of-range index, or a non-finite coordinate.
    pub fn validate(&self) -> DetailResult<()> {
        if self.triangles.len() % 3 != 0 {
            return Err(DetailError::InvalidIndexCount {
                count: self.triangles.len(),
            });
        }

        let vertex_count = self.vertices.len();
        if let Some((position, &vertex_index)) = self
            .triangles
            .iter()
            .enumerate()
            .find(|&(_, &vi)| vi as usize >= vertex_count)
        {
            return Err(DetailError::invalid_vertex_index(
                position,
                vertex_index,
                vertex_count,
            ));
        }

        for (vertex_index, p) in self.vertices.iter().enumerate() {
            if let Some(&value) = p.coords.iter().find(|c| !c.is_finite()) {
                return Err(DetailError::InvalidCoordinate {
                    vertex_index,
                    value,
                });
            }
        }

        Ok(())
    }

    /// Recalculate per-vertex normals and the bounding box.
    ///
    /// Normals are the area-weighted average of adjacent face normals.
    /// Vertices with no non-degenerate adjacent face get a zero normal.
    /// Call once after a structural edit is complete.
    pub fn recompute_derived(&mut self) {
        let mut accum = vec![Vector3::zeros(); self.vertices.len()];

        for [i0, i1, i2] in self.triangle_indices() {
            let tri = Triangle::new(
                self.vertices[i0 as usize],
                self.vertices[i1 as usize],
                self.vertices[i2 as usize],
            );

            // Unnormalized normal has length 2*area
            let weighted = tri.normal_unnormalized();
            accum[i0 as usize] += weighted;
            accum[i1 as usize] += weighted;
            accum[i2 as usize] += weighted;
        }

        // Zero only when no adjacent face has any area
        for n in &mut accum {
            *n = n.try_normalize(0.0).unwrap_or_else(Vector3::zeros);
        }

        self.normals = accum;
        self.bounds = Aabb::from_points(&self.vertices);
    }
}

/// A triangle with concrete vertex positions.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub v0: Point3<f64>,
    pub v1: Point3<f64>,
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle from three points.
    #[inline]
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Face normal scaled by twice the area, following the right-hand rule.
    #[inline]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        e1.cross(&e2)
    }

    /// Unit face normal. None for degenerate triangles.
    pub fn normal(&self) -> Option<Vector3<f64>> {
        self.normal_unnormalized().try_normalize(0.0)
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.normal_unnormalized().norm() * 0.5
    }

    #[inline]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::from((self.v0.coords + self.v1.coords + self.v2.coords) / 3.0)
    }
}
