//! The orbital/surface mode boundary.
//!
//! An explicit two-state mode plus owned grid state, passed in by the
//! caller rather than module-level flags or globally referenced scene
//! objects.
//! The unit-scale change between orbital and surface space (1 km vs 1 m)
//! belongs to the caller, not to this module.

use crate::chunk_grid::ChunkGrid;
use crate::error::TerrainError;
use crate::spherical::SphericalCoord;
use engine_core::Vec3;

/// Which view of the planet is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Orbital,
    Surface,
}

/// One landing/takeoff cycle: owns the chunk grid and tracks the mode.
pub struct SurfaceSession {
    mode: ViewMode,
    grid: ChunkGrid,
}

impl SurfaceSession {
    /// Start in orbit with an empty grid.
    pub fn new(grid: ChunkGrid) -> Self {
        Self {
            mode: ViewMode::Orbital,
            grid,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn grid(&self) -> &ChunkGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut ChunkGrid {
        &mut self.grid
    }

    /// Land at a coordinate: build the full grid synchronously. This blocks
    /// until every chunk exists (no cooperative yielding).
    pub fn land(&mut self, landing: SphericalCoord) -> Result<(), TerrainError> {
        if self.mode == ViewMode::Surface {
            log::error!("land requested while already in surface mode");
            return Err(TerrainError::AlreadyOnSurface);
        }
        log::info!("landing ship at coordinates: {}", landing);
        self.grid.build_from_center(landing)?;
        self.mode = ViewMode::Surface;
        Ok(())
    }

    /// Take off: report the departure coordinate of the viewpoint and tear
    /// the grid down.
    pub fn takeoff(&mut self, viewpoint: Vec3) -> Result<SphericalCoord, TerrainError> {
        if self.mode == ViewMode::Orbital {
            log::error!("takeoff requested while already in orbital mode");
            return Err(TerrainError::AlreadyInOrbit);
        }
        let departure = self.grid.world_to_spherical(viewpoint)?;
        log::info!("taking off from coordinates: {}", departure);
        self.grid.destroy();
        self.mode = ViewMode::Orbital;
        Ok(departure)
    }
}
