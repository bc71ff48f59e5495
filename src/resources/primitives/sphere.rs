use std::f32::consts::PI;

use glam::Vec3;

use crate::resources::geometry::Geometry;

/// Options for [`create_sphere`].
pub struct SphereOptions {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for SphereOptions {
    fn default() -> Self {
        Self {
            radius: 1.0,
            width_segments: 32,
            height_segments: 16,
        }
    }
}

/// Generates a UV sphere as a latitude/longitude grid.
///
/// The returned geometry carries positions, normals and triangle facets.
pub fn create_sphere(options: SphereOptions) -> Geometry {
    let radius = options.radius;
    let width_segments = options.width_segments.max(3);
    let height_segments = options.height_segments.max(2);

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut triangles = Vec::new();

    // Generate vertex data
    for y in 0..=height_segments {
        let v_ratio = y as f32 / height_segments as f32;
        // Latitude angle: from 0 to PI (south pole to north pole)
        let theta = v_ratio * PI;

        // y coordinate (Y-up)
        let py = -radius * theta.cos();
        // Radius of current latitude ring
        let ring_radius = radius * theta.sin();

        for x in 0..=width_segments {
            let u_ratio = x as f32 / width_segments as f32;
            // Longitude angle: from 0 to 2*PI
            let phi = u_ratio * 2.0 * PI;

            let px = -ring_radius * phi.cos();
            let pz = ring_radius * phi.sin();

            positions.push(Vec3::new(px, py, pz));

            // Normal is the normalized position vector
            normals.push(Vec3::new(px, py, pz) / radius);
        }
    }

    // Generate triangle facets
    // Each grid cell consists of two triangles; the degenerate ones at the
    // poles are harmless and get discarded by the rasterizer.
    let stride = width_segments + 1;
    for y in 0..height_segments {
        for x in 0..width_segments {
            let v0 = y * stride + x;
            let v1 = v0 + 1;
            let v2 = (y + 1) * stride + x;
            let v3 = v2 + 1;

            triangles.push([v0, v1, v2]);
            triangles.push([v1, v3, v2]);
        }
    }

    let mut geo = Geometry::new();
    geo.set_vertices(positions);
    geo.set_normals(normals);
    geo.set_triangles(triangles);
    geo
}
