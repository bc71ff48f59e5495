//! Scene layer: actors, camera, transforms and the scene container.
//!
//! - Actor: capability trait {prepare, update, render, set_display_mode}
//!   with MeshActor / SphereActor / BkgActor variants
//! - Camera: view/projection state consumed by renderers
//! - Transform: TRS component with a cached matrix
//! - Scene: ordered actor list with per-actor failure isolation

pub mod actor;
pub mod camera;
pub mod scene;
pub mod transform;

pub use actor::{Actor, BkgActor, MeshActor, SphereActor};
pub use camera::Camera;
pub use scene::Scene;
pub use transform::Transform;
