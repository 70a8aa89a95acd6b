//! The surface collaborator boundary.
//!
//! The rendering engine's terrain object owns its own copy of a chunk's
//! height data and answers steepness/height queries against it. During
//! generation we talk to it through [`Surface`]; `HeightfieldSurface` is the
//! in-process implementation used by the builder, the placer, and tests.

use engine_core::Grid2D;

/// Queries and apply semantics of a terrain surface object.
///
/// After any post-build heightfield mutation (e.g. flattening under a
/// structure) the caller must push the new heights with `apply_heights` and
/// then `flush` before the surface is considered consistent again.
pub trait Surface {
    /// Steepness in degrees at a normalized `(x, y)` position, 0 = flat,
    /// 90 = vertical cliff.
    fn slope_at(&self, x_norm: f32, y_norm: f32) -> f32;

    /// Terrain height in world units at a chunk-local `(x, z)` position.
    fn sample_height_at(&self, local_x: f32, local_z: f32) -> f32;

    /// Upload a mutated heightfield.
    fn apply_heights(&mut self, heightfield: &Grid2D<f32>);

    /// Apply any pending changes.
    fn flush(&mut self);
}

/// In-process surface over a chunk's heightfield.
///
/// Axis convention matches the chunk builder: the heightfield's x index runs
/// along world z (pitch) and its y index along world x (yaw).
pub struct HeightfieldSurface {
    heights: Grid2D<f32>,
    world_units_per_chunk: f32,
    height_range: f32,
    flush_count: u32,
}

impl HeightfieldSurface {
    pub fn new(heights: Grid2D<f32>, world_units_per_chunk: f32, height_range: f32) -> Self {
        Self {
            heights,
            world_units_per_chunk,
            height_range,
            flush_count: 0,
        }
    }

    /// Number of times `flush` was called (visible for tests and debugging).
    pub fn flush_count(&self) -> u32 {
        self.flush_count
    }

    /// Spacing between adjacent heightfield cells in world units.
    fn cell_pitch(&self) -> f32 {
        self.world_units_per_chunk / (self.heights.width() as f32 - 1.0)
    }

    /// Height of the cell at clamped integer grid coordinates, world units.
    fn cell_height(&self, x: i64, y: i64) -> f32 {
        let x = x.clamp(0, self.heights.width() as i64 - 1) as usize;
        let y = y.clamp(0, self.heights.height() as i64 - 1) as usize;
        self.heights.get(x, y).unwrap_or(0.0) * self.height_range
    }
}

impl Surface for HeightfieldSurface {
    fn slope_at(&self, x_norm: f32, y_norm: f32) -> f32 {
        let res = self.heights.width();
        let gx = (x_norm.clamp(0.0, 1.0) * (res as f32 - 1.0)).round() as i64;
        let gy = (y_norm.clamp(0.0, 1.0) * (res as f32 - 1.0)).round() as i64;

        // Central differences, clamped at the chunk edge
        let step = 2.0 * self.cell_pitch();
        let dx = (self.cell_height(gx + 1, gy) - self.cell_height(gx - 1, gy)) / step;
        let dy = (self.cell_height(gx, gy + 1) - self.cell_height(gx, gy - 1)) / step;

        let gradient = (dx * dx + dy * dy).sqrt();
        gradient.atan().to_degrees()
    }

    fn sample_height_at(&self, local_x: f32, local_z: f32) -> f32 {
        let (gx, gy) = crate::chunk::local_to_cell(local_x, local_z, self.cell_pitch());
        let gx = gx.clamp(0.0, self.heights.width() as f32 - 1.0);
        let gy = gy.clamp(0.0, self.heights.height() as f32 - 1.0);

        let x0 = gx.floor() as i64;
        let y0 = gy.floor() as i64;
        let tx = gx.fract();
        let ty = gy.fract();

        let h00 = self.cell_height(x0, y0);
        let h10 = self.cell_height(x0 + 1, y0);
        let h01 = self.cell_height(x0, y0 + 1);
        let h11 = self.cell_height(x0 + 1, y0 + 1);

        let top = h00 + (h10 - h00) * tx;
        let bottom = h01 + (h11 - h01) * tx;
        top + (bottom - top) * ty
    }

    fn apply_heights(&mut self, heightfield: &Grid2D<f32>) {
        self.heights = heightfield.clone();
    }

    fn flush(&mut self) {
        self.flush_count += 1;
        log::debug!("surface flush #{}", self.flush_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_surface() -> HeightfieldSurface {
        // Height rises linearly along grid x (world z): 0 -> 1 across 5 cells
        let mut heights = Grid2D::new(5, 5, 0.0f32);
        for y in 0..5 {
            for x in 0..5 {
                heights.set(x, y, x as f32 / 4.0);
            }
        }
        HeightfieldSurface::new(heights, 4.0, 4.0)
    }

    #[test]
    fn slope_of_a_45_degree_ramp() {
        // Full height range (4.0) over the chunk length (4.0) => 45°
        let s = ramp_surface();
        let slope = s.slope_at(0.5, 0.5);
        assert!((slope - 45.0).abs() < 1.0, "got {}", slope);
    }

    #[test]
    fn flat_surface_has_zero_slope() {
        let s = HeightfieldSurface::new(Grid2D::new(5, 5, 0.25), 4.0, 4.0);
        assert!(s.slope_at(0.5, 0.5) < 1e-3);
        assert!(s.slope_at(0.0, 1.0) < 1e-3);
    }

    #[test]
    fn height_lookup_follows_world_z() {
        let s = ramp_surface();
        // Height varies along world z, constant along world x
        let near = s.sample_height_at(2.0, 0.0);
        let far = s.sample_height_at(2.0, 4.0);
        assert!((near - 0.0).abs() < 1e-4);
        assert!((far - 4.0).abs() < 1e-4);
        assert!((s.sample_height_at(0.0, 2.0) - s.sample_height_at(4.0, 2.0)).abs() < 1e-4);
    }

    #[test]
    fn apply_heights_replaces_the_copy() {
        let mut s = HeightfieldSurface::new(Grid2D::new(3, 3, 0.0), 2.0, 10.0);
        s.apply_heights(&Grid2D::new(3, 3, 0.5));
        s.flush();
        assert!((s.sample_height_at(1.0, 1.0) - 5.0).abs() < 1e-4);
        assert_eq!(s.flush_count(), 1);
    }
}
