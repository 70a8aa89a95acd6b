//! Error taxonomy for the terrain pipeline.
//!
//! Only precondition violations surface as errors; out-of-range projections
//! are clamped or wrapped at the sampling layer, and structures landing
//! outside their chunk are an expected non-error outcome.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TerrainError {
    /// `fill_missing` (or anything deriving neighbor frames) needs the
    /// center chunk to exist first.
    #[error("chunk grid has no center chunk; call build_from_center first")]
    MissingCenterChunk,

    /// Landing requested while already on the surface.
    #[error("already in surface mode")]
    AlreadyOnSurface,

    /// Takeoff requested while already in orbit.
    #[error("already in orbital mode")]
    AlreadyInOrbit,
}
