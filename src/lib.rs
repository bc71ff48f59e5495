//! meshview
//!
//! A lightweight, object-oriented mesh rendering library built on wgpu.
//! Client code describes meshes, scene actors and a camera; the library
//! owns the GPU-side representation (vertex buffers, attribute layouts,
//! shader programs) and keeps it consistent with the CPU-side geometry.
//!
//! # High-level modules
//!
//! - `resources`: CPU-side geometry data (vertex/normal/color lists, facets,
//!   bounding box) and primitive generators
//! - `renderer`: GPU context, resource wrappers with an explicit lifecycle,
//!   mesh upload state and the per-mesh draw path
//! - `scene`: actors (mesh, sphere, background), camera and the scene
//!   container with per-actor failure isolation
//! - `utils`: the trackball camera controller
//!
//! # Data flow
//!
//! ```text
//! Geometry → Mesh (GPU upload) → Actor (mesh + transform)
//!     → MeshRenderer (bind, draw) ← Camera ← Trackball
//! ```

pub mod errors;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod utils;

pub use errors::{MeshViewError, Result};
pub use renderer::{DisplayMode, GpuContext, Mesh, MeshRenderer, RenderSettings};
pub use resources::geometry::{BoundingBox, Geometry};
pub use scene::{Actor, BkgActor, Camera, MeshActor, Scene, SphereActor, Transform};
pub use utils::trackball::{PointerButton, Trackball, TrackballState};
