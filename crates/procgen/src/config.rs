//! Surface generation settings. Loaded from `surface.ron` at startup.

use crate::chunk::ChunkConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Persistent surface settings. Loaded from `surface.ron` in the current
/// directory; every field falls back to a default when missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Chunk window columns (odd keeps the center slot central).
    #[serde(default = "default_grid_side")]
    pub grid_cols: usize,
    /// Chunk window rows.
    #[serde(default = "default_grid_side")]
    pub grid_rows: usize,
    /// Angular footprint of one chunk, degrees.
    #[serde(default = "default_degrees_per_chunk")]
    pub degrees_per_chunk: f32,
    /// World-space footprint of one chunk.
    #[serde(default = "default_world_units_per_chunk")]
    pub world_units_per_chunk: f32,
    /// Heightfield cells per chunk side (power of two plus one).
    #[serde(default = "default_heightmap_resolution")]
    pub heightmap_resolution: usize,
    /// Splat-weight cells per chunk side.
    #[serde(default = "default_splat_resolution")]
    pub splat_resolution: usize,
    /// Vertical terrain extent in world units.
    #[serde(default = "default_height_range")]
    pub height_range: f32,
    /// Heightmap flattening factor; larger means smoother terrain.
    #[serde(default = "default_dampening")]
    pub dampening: f32,
    /// Structure-map pixels below this alpha are ignored.
    #[serde(default = "default_alpha_threshold")]
    pub alpha_threshold: u8,
}

fn default_grid_side() -> usize {
    3
}
fn default_degrees_per_chunk() -> f32 {
    5.0
}
fn default_world_units_per_chunk() -> f32 {
    1024.0
}
fn default_heightmap_resolution() -> usize {
    128 + 1
}
fn default_splat_resolution() -> usize {
    64
}
fn default_height_range() -> f32 {
    512.0
}
fn default_dampening() -> f32 {
    2.0
}
fn default_alpha_threshold() -> u8 {
    crate::structures::DEFAULT_ALPHA_THRESHOLD
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            grid_cols: default_grid_side(),
            grid_rows: default_grid_side(),
            degrees_per_chunk: default_degrees_per_chunk(),
            world_units_per_chunk: default_world_units_per_chunk(),
            heightmap_resolution: default_heightmap_resolution(),
            splat_resolution: default_splat_resolution(),
            height_range: default_height_range(),
            dampening: default_dampening(),
            alpha_threshold: default_alpha_threshold(),
        }
    }
}

impl SurfaceConfig {
    /// Load config from `surface.ron` in the current directory.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load config from a RON file. Missing or invalid files fall back to
    /// defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Save current config to `surface.ron` in the current directory.
    pub fn save(&self) {
        self.save_to(&config_path());
    }

    /// Save current config to a RON file. Logs on error.
    pub fn save_to(&self, path: &Path) {
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }

    /// The per-chunk generation constants this config implies.
    pub fn chunk_config(&self) -> ChunkConfig {
        ChunkConfig {
            degrees_per_chunk: self.degrees_per_chunk,
            world_units_per_chunk: self.world_units_per_chunk,
            heightmap_resolution: self.heightmap_resolution,
            splat_resolution: self.splat_resolution,
            height_range: self.height_range,
            dampening: self.dampening,
        }
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
        .join("surface.ron")
}
