//! Geometry and BoundingBox Tests
//!
//! Tests for:
//! - BoundingBox center, size, diagonal, union, sentinel state
//! - Geometry validation (empty, attribute mismatch, facet index range)
//! - Bounding box computation
//! - Facet triangulation and edge extraction
//! - Area-weighted normal computation
//! - Data versioning
//! - Sphere primitive generation

use glam::{Vec3, Vec4};

use meshview::errors::MeshViewError;
use meshview::resources::geometry::{BoundingBox, Geometry};
use meshview::resources::primitives::{SphereOptions, create_sphere};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z)
}

fn unit_box_geometry() -> Geometry {
    let mut geo = Geometry::new();
    geo.set_vertices(vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(0.0, 1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
    ]);
    geo
}

// ============================================================================
// BoundingBox Tests
// ============================================================================

#[test]
fn bbox_default_is_degenerate_sentinel() {
    let bb = BoundingBox::default();
    assert!(!bb.is_finite());
    assert!(bb.min.x > bb.max.x, "Sentinel min should exceed max");
}

#[test]
fn bbox_unit_cube_center() {
    let geo = unit_box_geometry();
    let bb = geo.compute_bounding_box().unwrap();
    assert!(vec3_approx(bb.center(), Vec3::splat(0.5)));
}

#[test]
fn bbox_unit_cube_diagonal_is_sqrt_3() {
    let geo = unit_box_geometry();
    let bb = geo.compute_bounding_box().unwrap();
    assert!(approx(bb.diagonal_length(), 3.0_f32.sqrt()));
}

#[test]
fn bbox_min_le_max_for_arbitrary_vertices() {
    let mut geo = Geometry::new();
    geo.set_vertices(vec![
        Vec3::new(-3.5, 12.0, 0.25),
        Vec3::new(7.0, -8.0, -1.5),
        Vec3::new(0.0, 0.0, 99.0),
        Vec3::new(2.5, 2.5, 2.5),
    ]);
    let bb = geo.compute_bounding_box().unwrap();
    for i in 0..3 {
        assert!(
            bb.min[i] <= bb.max[i],
            "Axis {i}: min {} > max {}",
            bb.min[i],
            bb.max[i]
        );
    }
}

#[test]
fn bbox_empty_geometry_fails() {
    let geo = Geometry::new();
    let result = geo.compute_bounding_box();
    assert!(matches!(result, Err(MeshViewError::EmptyGeometry)));
}

#[test]
fn bbox_union() {
    let a = BoundingBox {
        min: Vec3::new(-1.0, -1.0, -1.0),
        max: Vec3::new(1.0, 1.0, 1.0),
    };
    let b = BoundingBox {
        min: Vec3::new(0.0, 0.0, 0.0),
        max: Vec3::new(3.0, 3.0, 3.0),
    };
    let u = a.union(&b);
    assert!(vec3_approx(u.min, Vec3::new(-1.0, -1.0, -1.0)));
    assert!(vec3_approx(u.max, Vec3::new(3.0, 3.0, 3.0)));
}

#[test]
fn bbox_recomputed_fully_each_call() {
    let mut geo = Geometry::new();
    geo.set_vertices(vec![Vec3::ZERO, Vec3::ONE]);
    let first = geo.compute_bounding_box().unwrap();
    assert!(vec3_approx(first.max, Vec3::ONE));

    geo.set_vertices(vec![Vec3::ZERO, Vec3::splat(0.25)]);
    let second = geo.compute_bounding_box().unwrap();
    // A shrunken vertex set must shrink the box, no stale extremes
    assert!(vec3_approx(second.max, Vec3::splat(0.25)));
}

// ============================================================================
// Validation Tests
// ============================================================================

#[test]
fn validate_empty_vertices_fails() {
    let geo = Geometry::new();
    assert!(matches!(geo.validate(), Err(MeshViewError::EmptyGeometry)));
}

#[test]
fn validate_normal_length_mismatch_fails() {
    let mut geo = Geometry::new();
    geo.set_vertices(vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
    geo.set_normals(vec![Vec3::Z]);
    match geo.validate() {
        Err(MeshViewError::AttributeLengthMismatch {
            attribute,
            actual,
            expected,
        }) => {
            assert_eq!(attribute, "normal");
            assert_eq!(actual, 1);
            assert_eq!(expected, 3);
        }
        other => panic!("Expected AttributeLengthMismatch, got {other:?}"),
    }
}

#[test]
fn validate_color_length_mismatch_fails() {
    let mut geo = Geometry::new();
    geo.set_vertices(vec![Vec3::ZERO, Vec3::X]);
    geo.set_colors(vec![Vec4::ONE; 5]);
    assert!(matches!(
        geo.validate(),
        Err(MeshViewError::AttributeLengthMismatch {
            attribute: "color",
            ..
        })
    ));
}

#[test]
fn validate_triangle_index_out_of_bounds_fails() {
    let mut geo = Geometry::new();
    geo.set_vertices(vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
    geo.add_triangle([0, 1, 3]);
    match geo.validate() {
        Err(MeshViewError::FacetIndexOutOfBounds {
            index,
            vertex_count,
        }) => {
            assert_eq!(index, 3);
            assert_eq!(vertex_count, 3);
        }
        other => panic!("Expected FacetIndexOutOfBounds, got {other:?}"),
    }
}

#[test]
fn validate_polygon_index_out_of_bounds_fails() {
    let mut geo = Geometry::new();
    geo.set_vertices(vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z]);
    geo.add_polygon(vec![0, 1, 2, 9]);
    assert!(matches!(
        geo.validate(),
        Err(MeshViewError::FacetIndexOutOfBounds { index: 9, .. })
    ));
}

#[test]
fn validate_degenerate_polygon_fails() {
    let mut geo = Geometry::new();
    geo.set_vertices(vec![Vec3::ZERO, Vec3::X]);
    geo.add_polygon(vec![0, 1]);
    assert!(matches!(
        geo.validate(),
        Err(MeshViewError::InvalidArgument(_))
    ));
}

#[test]
fn validate_well_formed_geometry_passes() {
    let mut geo = Geometry::new();
    geo.set_vertices(vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z]);
    geo.set_normals(vec![Vec3::Z; 4]);
    geo.set_colors(vec![Vec4::ONE; 4]);
    geo.add_triangle([0, 1, 2]);
    geo.add_polygon(vec![0, 1, 2, 3]);
    assert!(geo.validate().is_ok());
}

// ============================================================================
// Facet Triangulation & Edge Extraction Tests
// ============================================================================

#[test]
fn polygon_fan_triangulation() {
    let mut geo = Geometry::new();
    geo.set_vertices(vec![Vec3::ZERO, Vec3::X, Vec3::ONE, Vec3::Y]);
    geo.add_polygon(vec![0, 1, 2, 3]);
    assert_eq!(geo.triangulated_indices(), vec![0, 1, 2, 0, 2, 3]);
}

#[test]
fn triangles_pass_through_triangulation() {
    let mut geo = Geometry::new();
    geo.set_vertices(vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
    geo.add_triangle([0, 1, 2]);
    assert_eq!(geo.triangulated_indices(), vec![0, 1, 2]);
}

#[test]
fn shared_edges_are_deduplicated() {
    let mut geo = Geometry::new();
    geo.set_vertices(vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE]);
    geo.add_triangle([0, 1, 2]);
    geo.add_triangle([1, 3, 2]);
    // 6 edges total, edge (1,2) shared → 5 unique edges → 10 indices
    assert_eq!(geo.line_indices().len(), 10);
}

// ============================================================================
// Normal Computation Tests
// ============================================================================

#[test]
fn computed_normals_ccw_triangle_point_plus_z() {
    let mut geo = Geometry::new();
    geo.set_vertices(vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ]);
    geo.add_triangle([0, 1, 2]);
    let normals = geo.computed_normals();
    assert_eq!(normals.len(), 3);
    for (i, n) in normals.iter().enumerate() {
        assert!(n.z > 0.9, "Normal {i} should point +Z, got {n:?}");
    }
}

#[test]
fn computed_normals_unreferenced_vertex_is_zero() {
    let mut geo = Geometry::new();
    geo.set_vertices(vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::splat(5.0)]);
    geo.add_triangle([0, 1, 2]);
    let normals = geo.computed_normals();
    assert!(vec3_approx(normals[3], Vec3::ZERO));
}

// ============================================================================
// Versioning Tests
// ============================================================================

#[test]
fn mutators_bump_data_version() {
    let mut geo = Geometry::new();
    let v0 = geo.data_version();
    geo.set_vertices(vec![Vec3::ZERO]);
    let v1 = geo.data_version();
    assert!(v1 > v0, "set_vertices should bump the data version");
    geo.set_colors(vec![Vec4::ONE]);
    assert!(geo.data_version() > v1, "set_colors should bump the version");
}

// ============================================================================
// Sphere Primitive Tests
// ============================================================================

#[test]
fn sphere_has_matching_attribute_lengths() {
    let geo = create_sphere(SphereOptions::default());
    assert!(geo.validate().is_ok());
    assert_eq!(geo.vertices().len(), geo.normals().len());
    assert!(!geo.triangles().is_empty());
}

#[test]
fn sphere_bounding_box_matches_radius() {
    let geo = create_sphere(SphereOptions {
        radius: 5.0,
        ..Default::default()
    });
    let bb = geo.compute_bounding_box().unwrap();
    assert!((bb.max.y - 5.0).abs() < 0.1, "Expected max.y ≈ 5, got {}", bb.max.y);
    assert!((bb.min.y + 5.0).abs() < 0.1, "Expected min.y ≈ -5, got {}", bb.min.y);
}

#[test]
fn sphere_normals_are_unit_length() {
    let geo = create_sphere(SphereOptions {
        radius: 3.0,
        ..Default::default()
    });
    for n in geo.normals() {
        assert!(approx(n.length(), 1.0), "Normal {n:?} not unit length");
    }
}
