//! Core types shared across the terrain engine:
//! - Transform for spatial positioning (viewpoint, placed structures)
//! - Owned dense grid containers for heightfields and splat weights

pub mod grid;
pub mod transform;

pub use grid::*;
pub use transform::*;

// Re-export commonly used math types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
