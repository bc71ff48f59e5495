//! CPU-side resource definitions.
//!
//! Contains the data structures rendering is driven from, independent of any
//! GPU implementation:
//! - Geometry: vertex/normal/color lists, facet index lists, bounding box
//! - Primitives: built-in geometry generators (sphere)

pub mod geometry;
pub mod primitives;

pub use geometry::{BoundingBox, Geometry, PolyFacet, TriangleFacet};
pub use primitives::{SphereOptions, create_sphere};
