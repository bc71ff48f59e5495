//! Built-in primitive geometry generators.

pub mod sphere;

pub use sphere::{SphereOptions, create_sphere};
