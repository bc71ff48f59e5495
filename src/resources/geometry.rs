use glam::{Vec3, Vec4};
use rustc_hash::FxHashSet;

use crate::errors::{MeshViewError, Result};

/// Axis-aligned bounding box.
///
/// The default value is the degenerate "infinite" sentinel
/// (`min = +INF`, `max = -INF`) which any real point collapses on union.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::infinite()
    }
}

impl BoundingBox {
    /// Returns the degenerate sentinel box that contains no point.
    #[must_use]
    pub fn infinite() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// Returns `true` once the box has been computed from at least one point.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Geometric center (midpoint of `min` and `max`).
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Euclidean distance between `min` and `max`.
    #[must_use]
    pub fn diagonal_length(&self) -> f32 {
        self.min.distance(self.max)
    }

    /// Expands the box to contain `point`.
    pub fn grow(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// A triangle facet: three indices into the vertex list.
pub type TriangleFacet = [u32; 3];

/// A polygon facet: an ordered index loop with at least three entries.
pub type PolyFacet = Vec<u32>;

/// CPU-side mesh data: parallel vertex attribute lists plus facet index lists.
///
/// # Invariants
///
/// - `normals` and `colors` are either empty (absent attribute) or exactly
///   as long as `vertices`
/// - every facet index is `< vertices.len()`
/// - polygon facets carry at least three indices
///
/// Invariants are checked by [`Geometry::validate`], which runs eagerly at
/// mesh construction, never deferred to draw time.
///
/// # Versioning
///
/// Every mutating call bumps `data_version`. The GPU upload path compares
/// this version against the last uploaded one to decide whether a re-upload
/// is needed, so geometry edits never require manual dirty flags.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    colors: Vec<Vec4>,
    triangles: Vec<TriangleFacet>,
    polygons: Vec<PolyFacet>,
    data_version: u64,
}

impl Geometry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Attribute accessors
    // ========================================================================

    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[must_use]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    #[must_use]
    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    #[must_use]
    pub fn triangles(&self) -> &[TriangleFacet] {
        &self.triangles
    }

    #[must_use]
    pub fn polygons(&self) -> &[PolyFacet] {
        &self.polygons
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[must_use]
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    #[must_use]
    pub fn has_colors(&self) -> bool {
        !self.colors.is_empty()
    }

    /// Current data version, bumped by every mutating call.
    #[must_use]
    pub fn data_version(&self) -> u64 {
        self.data_version
    }

    // ========================================================================
    // Mutators (each bumps the data version)
    // ========================================================================

    pub fn set_vertices(&mut self, vertices: Vec<Vec3>) {
        self.vertices = vertices;
        self.data_version = self.data_version.wrapping_add(1);
    }

    pub fn set_normals(&mut self, normals: Vec<Vec3>) {
        self.normals = normals;
        self.data_version = self.data_version.wrapping_add(1);
    }

    pub fn set_colors(&mut self, colors: Vec<Vec4>) {
        self.colors = colors;
        self.data_version = self.data_version.wrapping_add(1);
    }

    pub fn set_triangles(&mut self, triangles: Vec<TriangleFacet>) {
        self.triangles = triangles;
        self.data_version = self.data_version.wrapping_add(1);
    }

    pub fn add_triangle(&mut self, facet: TriangleFacet) {
        self.triangles.push(facet);
        self.data_version = self.data_version.wrapping_add(1);
    }

    pub fn set_polygons(&mut self, polygons: Vec<PolyFacet>) {
        self.polygons = polygons;
        self.data_version = self.data_version.wrapping_add(1);
    }

    pub fn add_polygon(&mut self, facet: PolyFacet) {
        self.polygons.push(facet);
        self.data_version = self.data_version.wrapping_add(1);
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Checks all geometry invariants.
    ///
    /// Runs eagerly at mesh construction, before any GPU upload is attempted.
    pub fn validate(&self) -> Result<()> {
        if self.vertices.is_empty() {
            return Err(MeshViewError::EmptyGeometry);
        }
        let expected = self.vertices.len();
        if !self.normals.is_empty() && self.normals.len() != expected {
            return Err(MeshViewError::AttributeLengthMismatch {
                attribute: "normal",
                actual: self.normals.len(),
                expected,
            });
        }
        if !self.colors.is_empty() && self.colors.len() != expected {
            return Err(MeshViewError::AttributeLengthMismatch {
                attribute: "color",
                actual: self.colors.len(),
                expected,
            });
        }

        let check_index = |index: u32| -> Result<()> {
            if index as usize >= expected {
                return Err(MeshViewError::FacetIndexOutOfBounds {
                    index,
                    vertex_count: expected,
                });
            }
            Ok(())
        };
        for facet in &self.triangles {
            for &index in facet {
                check_index(index)?;
            }
        }
        for facet in &self.polygons {
            if facet.len() < 3 {
                return Err(MeshViewError::InvalidArgument(format!(
                    "polygon facet has {} indices, at least 3 required",
                    facet.len()
                )));
            }
            for &index in facet {
                check_index(index)?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Derived data
    // ========================================================================

    /// Computes the axis-aligned bounding box over all vertices.
    ///
    /// The box is fully recomputed on each call; there is no incremental
    /// update. Fails with [`MeshViewError::EmptyGeometry`] when the vertex
    /// list is empty.
    pub fn compute_bounding_box(&self) -> Result<BoundingBox> {
        if self.vertices.is_empty() {
            return Err(MeshViewError::EmptyGeometry);
        }
        let mut bbox = BoundingBox::infinite();
        for &v in &self.vertices {
            bbox.grow(v);
        }
        Ok(bbox)
    }

    /// Flattens all facets into a triangle index list.
    ///
    /// Triangle facets are copied through; polygon facets are
    /// fan-triangulated around their first index.
    #[must_use]
    pub fn triangulated_indices(&self) -> Vec<u32> {
        let mut indices = Vec::with_capacity(self.triangles.len() * 3);
        for facet in &self.triangles {
            indices.extend_from_slice(facet);
        }
        for facet in &self.polygons {
            if facet.len() < 3 {
                continue;
            }
            for i in 1..facet.len() - 1 {
                indices.push(facet[0]);
                indices.push(facet[i]);
                indices.push(facet[i + 1]);
            }
        }
        indices
    }

    /// Builds a line-list index buffer from the unique edges of all facets.
    #[must_use]
    pub fn line_indices(&self) -> Vec<u32> {
        let mut seen: FxHashSet<(u32, u32)> = FxHashSet::default();
        let mut indices = Vec::new();
        let mut push_edge = |a: u32, b: u32| {
            // 无向边去重
            let key = if a < b { (a, b) } else { (b, a) };
            if seen.insert(key) {
                indices.push(a);
                indices.push(b);
            }
        };
        for facet in &self.triangles {
            push_edge(facet[0], facet[1]);
            push_edge(facet[1], facet[2]);
            push_edge(facet[2], facet[0]);
        }
        for facet in &self.polygons {
            if facet.len() < 2 {
                continue;
            }
            for i in 0..facet.len() {
                push_edge(facet[i], facet[(i + 1) % facet.len()]);
            }
        }
        indices
    }

    /// Computes area-weighted per-vertex normals from the facet lists.
    ///
    /// Used by the upload path when the geometry carries no normal
    /// attribute. The cross product's magnitude is twice the triangle
    /// area, so accumulating unnormalized face normals weights each
    /// contribution by facet area.
    #[must_use]
    pub fn computed_normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];
        let mut accumulate = |i0: usize, i1: usize, i2: usize| {
            // 越界保护
            if i0 >= self.vertices.len() || i1 >= self.vertices.len() || i2 >= self.vertices.len()
            {
                return;
            }
            let v0 = self.vertices[i0];
            let v1 = self.vertices[i1];
            let v2 = self.vertices[i2];
            let face_normal = (v1 - v0).cross(v2 - v0);
            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        };
        for chunk in self.triangulated_indices().chunks_exact(3) {
            accumulate(chunk[0] as usize, chunk[1] as usize, chunk[2] as usize);
        }
        for n in &mut normals {
            *n = n.normalize_or_zero();
        }
        normals
    }
}
