//! Utility Module
//!
//! - [`Trackball`]: virtual-sphere camera controller for interactive
//!   viewing

pub mod trackball;

pub use trackball::{PointerButton, Trackball, TrackballState};
