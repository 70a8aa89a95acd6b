//! Procedural planetary surface terrain.
//!
//! Derives a planet's walkable surface from a single equirectangular
//! heightmap and a color-keyed structure map, presented as a sliding window
//! of terrain chunks centered on the landing point. The pipeline: spherical
//! projection math, height resampling through that projection, per-chunk
//! heightfield + splat-weight generation, structure placement with terrain
//! flattening, and the chunk-grid window itself.

pub mod chunk;
pub mod chunk_grid;
pub mod config;
pub mod error;
pub mod heightmap;
pub mod mode;
pub mod spherical;
pub mod structures;
pub mod surface;

pub use chunk::*;
pub use chunk_grid::*;
pub use config::*;
pub use error::*;
pub use heightmap::*;
pub use mode::*;
pub use spherical::*;
pub use structures::*;
pub use surface::*;
