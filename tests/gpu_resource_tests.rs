//! GPU Resource Lifecycle Tests
//!
//! Tests for:
//! - Buffer upload / reallocate / release lifecycle
//! - Release idempotence and use-after-release detection
//! - VertexArray attribute slot validation
//! - ShaderProgram link success and failure diagnostics
//! - NoContext detection after the context is dropped
//! - Mesh invalidate → ensure_uploaded round trip
//! - Offscreen scene rendering smoke test
//!
//! All tests run against a headless context and skip (pass vacuously) on
//! machines without a usable GPU adapter.

use glam::Vec3;

use meshview::errors::MeshViewError;
use meshview::renderer::resources::ResourceState;
use meshview::renderer::{GpuContext, Mesh, RenderSettings};
use meshview::resources::geometry::Geometry;
use meshview::scene::{BkgActor, Camera, MeshActor, Scene};

fn test_context() -> Option<GpuContext> {
    let _ = env_logger::builder().is_test(true).try_init();
    match pollster::block_on(GpuContext::new_headless(&RenderSettings::default())) {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            eprintln!("Skipping GPU test, no usable adapter: {e}");
            None
        }
    }
}

fn triangle_geometry() -> Geometry {
    let mut geo = Geometry::new();
    geo.set_vertices(vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
    geo.add_triangle([0, 1, 2]);
    geo
}

// ============================================================================
// Buffer Lifecycle Tests
// ============================================================================

#[test]
fn buffer_walks_the_lifecycle() {
    let Some(ctx) = test_context() else { return };
    let mut buffer = ctx.create_buffer(wgpu::BufferUsages::VERTEX, "Test Buffer");
    assert_eq!(buffer.state(), ResourceState::Unallocated);

    buffer.upload(&[0u8; 16]).unwrap();
    assert_eq!(buffer.state(), ResourceState::Allocated);
    assert_eq!(buffer.size(), 16);

    buffer.release();
    assert_eq!(buffer.state(), ResourceState::Released);
}

#[test]
fn buffer_rejects_zero_length_upload() {
    let Some(ctx) = test_context() else { return };
    let mut buffer = ctx.create_buffer(wgpu::BufferUsages::VERTEX, "Empty Upload");
    assert!(matches!(
        buffer.upload(&[]),
        Err(MeshViewError::ResourceCreation(_))
    ));
    assert_eq!(buffer.state(), ResourceState::Unallocated);
}

#[test]
fn buffer_reupload_with_different_size_reallocates() {
    let Some(ctx) = test_context() else { return };
    let mut buffer = ctx.create_buffer(wgpu::BufferUsages::VERTEX, "Resizing Buffer");
    buffer.upload(&[1u8; 12]).unwrap();
    assert_eq!(buffer.size(), 12);
    buffer.upload(&[2u8; 24]).unwrap();
    assert_eq!(buffer.size(), 24);
    // Same size again reuses the allocation
    buffer.upload(&[3u8; 24]).unwrap();
    assert_eq!(buffer.size(), 24);
}

#[test]
fn buffer_release_is_idempotent() {
    let Some(ctx) = test_context() else { return };
    let mut buffer = ctx.create_buffer(wgpu::BufferUsages::INDEX, "Double Release");
    buffer.upload(&[0u8; 8]).unwrap();
    buffer.release();
    buffer.release();
    assert_eq!(buffer.state(), ResourceState::Released);
}

#[test]
fn buffer_upload_after_release_fails() {
    let Some(ctx) = test_context() else { return };
    let mut buffer = ctx.create_buffer(wgpu::BufferUsages::VERTEX, "Released Buffer");
    buffer.upload(&[0u8; 8]).unwrap();
    buffer.release();
    assert!(matches!(
        buffer.upload(&[0u8; 8]),
        Err(MeshViewError::UseAfterRelease(_))
    ));
}

#[test]
fn buffer_outliving_context_fails_with_no_context() {
    let Some(ctx) = test_context() else { return };
    let mut buffer = ctx.create_buffer(wgpu::BufferUsages::VERTEX, "Orphan Buffer");
    drop(ctx);
    assert!(matches!(
        buffer.upload(&[0u8; 8]),
        Err(MeshViewError::NoContext)
    ));
}

// ============================================================================
// VertexArray Tests
// ============================================================================

#[test]
fn vertex_array_rejects_out_of_range_location() {
    let Some(ctx) = test_context() else { return };
    let mut va = ctx.create_vertex_array();
    let result = va.bind_attribute(1024, 0, wgpu::VertexFormat::Float32x3, 0, 12);
    assert!(matches!(
        result,
        Err(MeshViewError::InvalidAttribute { slot: 1024, .. })
    ));
    assert_eq!(va.state(), ResourceState::Unallocated);
}

#[test]
fn vertex_array_records_layout() {
    let Some(ctx) = test_context() else { return };
    let mut va = ctx.create_vertex_array();
    va.bind_attribute(0, 0, wgpu::VertexFormat::Float32x3, 0, 12)
        .unwrap();
    va.bind_attribute(1, 1, wgpu::VertexFormat::Float32x4, 0, 16)
        .unwrap();
    assert_eq!(va.state(), ResourceState::Allocated);
    assert_eq!(va.slot_count(), 2);
    assert_eq!(va.attribute_count(), 2);

    va.release();
    va.release();
    assert_eq!(va.state(), ResourceState::Released);
    assert!(matches!(
        va.bind_attribute(0, 0, wgpu::VertexFormat::Float32x3, 0, 12),
        Err(MeshViewError::UseAfterRelease(_))
    ));
}

// ============================================================================
// ShaderProgram Tests
// ============================================================================

const VALID_SHADER: &str = r"
@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> @builtin(position) vec4<f32> {
    return vec4<f32>(0.0, 0.0, 0.0, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.0, 1.0, 1.0);
}
";

#[test]
fn shader_program_links_valid_source() {
    let Some(ctx) = test_context() else { return };
    let mut program = ctx.create_shader_program("Valid Shader");
    assert_eq!(program.state(), ResourceState::Unallocated);
    program.link(VALID_SHADER, "vs_main", "fs_main").unwrap();
    assert_eq!(program.state(), ResourceState::Allocated);
    assert_eq!(program.vs_entry(), "vs_main");
}

#[test]
fn shader_program_link_failure_carries_diagnostic() {
    let Some(ctx) = test_context() else { return };
    let mut program = ctx.create_shader_program("Broken Shader");
    let result = program.link("this is not wgsl", "vs_main", "fs_main");
    match result {
        Err(MeshViewError::Link(diagnostic)) => {
            assert!(!diagnostic.is_empty(), "Link error should carry a message");
        }
        other => panic!("Expected Link error, got {other:?}"),
    }
    // A failed program must not become bindable
    assert_eq!(program.state(), ResourceState::Unallocated);
}

#[test]
fn shader_program_release_is_idempotent() {
    let Some(ctx) = test_context() else { return };
    let mut program = ctx.create_shader_program("Released Shader");
    program.link(VALID_SHADER, "vs_main", "fs_main").unwrap();
    program.release();
    program.release();
    assert!(matches!(
        program.link(VALID_SHADER, "vs_main", "fs_main"),
        Err(MeshViewError::UseAfterRelease(_))
    ));
}

// ============================================================================
// Mesh Upload Tests
// ============================================================================

#[test]
fn mesh_upload_invalidate_round_trip() {
    let Some(ctx) = test_context() else { return };
    let mesh = Mesh::new("Round Trip", triangle_geometry()).unwrap();
    assert!(!mesh.is_uploaded());

    mesh.ensure_uploaded(&ctx).unwrap();
    assert!(mesh.is_uploaded());
    let version_before = mesh.geometry().data_version();

    mesh.invalidate();
    assert!(!mesh.is_uploaded());

    // Re-upload restores the Allocated state without touching the geometry
    mesh.ensure_uploaded(&ctx).unwrap();
    assert!(mesh.is_uploaded());
    assert_eq!(mesh.geometry().data_version(), version_before);
    assert_eq!(mesh.geometry().vertices().len(), 3);
    assert_eq!(mesh.geometry().triangles(), &[[0, 1, 2]]);
}

#[test]
fn mesh_ensure_uploaded_is_idempotent() {
    let Some(ctx) = test_context() else { return };
    let mesh = Mesh::new("Idempotent", triangle_geometry()).unwrap();
    mesh.ensure_uploaded(&ctx).unwrap();
    mesh.ensure_uploaded(&ctx).unwrap();
    assert!(mesh.is_uploaded());
}

#[test]
fn mesh_geometry_edit_triggers_reupload() {
    let Some(ctx) = test_context() else { return };
    let mesh = Mesh::new("Editable", triangle_geometry()).unwrap();
    mesh.ensure_uploaded(&ctx).unwrap();

    mesh.update_geometry(|geo| {
        geo.set_vertices(vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE]);
        geo.set_triangles(vec![[0, 1, 2], [1, 3, 2]]);
    })
    .unwrap();

    // The version advanced, so this call re-uploads rather than no-ops
    mesh.ensure_uploaded(&ctx).unwrap();
    assert!(mesh.is_uploaded());
    assert_eq!(mesh.geometry().vertex_count(), 4);
}

#[test]
fn mesh_rejected_edit_keeps_previous_geometry() {
    let Some(ctx) = test_context() else { return };
    let mesh = Mesh::new("Guarded", triangle_geometry()).unwrap();
    mesh.ensure_uploaded(&ctx).unwrap();

    let result = mesh.update_geometry(|geo| {
        geo.set_triangles(vec![[0, 1, 99]]);
    });
    assert!(matches!(
        result,
        Err(MeshViewError::FacetIndexOutOfBounds { .. })
    ));
    assert_eq!(mesh.geometry().triangles(), &[[0, 1, 2]]);
}

// ============================================================================
// Offscreen Rendering Smoke Test
// ============================================================================

#[test]
fn scene_renders_offscreen() {
    let Some(ctx) = test_context() else { return };

    let color_texture = ctx.device().create_texture(&wgpu::TextureDescriptor {
        label: Some("Offscreen Color"),
        size: wgpu::Extent3d {
            width: 64,
            height: 64,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: ctx.color_format(),
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let color_view = color_texture.create_view(&wgpu::TextureViewDescriptor::default());
    let depth_view =
        GpuContext::create_depth_texture(ctx.device(), 64, 64, ctx.depth_format());

    let mut scene = Scene::new();
    scene.add_actor(Box::new(BkgActor::new()));
    let mesh = Mesh::new("Smoke", triangle_geometry()).unwrap();
    scene.add_actor(Box::new(MeshActor::new(mesh.clone())));

    let mut camera = Camera::new();
    camera.set_perspective(45.0, 1.0, 0.1, 100.0).unwrap();
    camera
        .set_view(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y)
        .unwrap();

    scene.update_all(0.016);
    scene.render(&ctx, &camera, &color_view, &depth_view).unwrap();

    // The frame prepared the mesh as a side effect
    assert!(mesh.is_uploaded());
}
