//! One terrain chunk: heightfield generation through the spherical
//! projection, splat-weight generation from steepness, and the corner UV
//! computation used as a texturing hint.

use crate::heightmap::{sample_height, HeightMap};
use crate::spherical::{signed_delta_degrees, SphericalCoord, Uv};
use crate::structures::PlacedStructure;
use crate::surface::{HeightfieldSurface, Surface};
use engine_core::{Grid2D, Grid3D, Quat, Vec3};
use glam::EulerRot;

/// Shared generation constants for every chunk in a grid.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Angular footprint of one chunk, degrees.
    pub degrees_per_chunk: f32,
    /// World-space footprint of one chunk.
    pub world_units_per_chunk: f32,
    /// Heightfield cells per side (power of two plus one, e.g. 129).
    pub heightmap_resolution: usize,
    /// Splat-weight cells per side.
    pub splat_resolution: usize,
    /// Vertical extent in world units; heightfield values are fractions of this.
    pub height_range: f32,
    /// Heightmap flattening factor. Larger values mean smoother terrain.
    pub dampening: f32,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            degrees_per_chunk: 5.0,
            world_units_per_chunk: 1024.0,
            heightmap_resolution: 128 + 1,
            splat_resolution: 64,
            height_range: 512.0,
            dampening: 2.0,
        }
    }
}

/// One tile of generated terrain, square in world and angular space.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Grid slot coordinate `(col, row)`; updated when the window slides.
    pub grid_index: (usize, usize),
    /// Orientation of the chunk center on the sphere.
    pub rotation: Quat,
    /// World position of the bottom-left corner; the chunk spans
    /// `origin .. origin + world_units_per_chunk` on x and z.
    pub origin: Vec3,
    /// Normalized elevation samples in [0, 1], fractions of `height_range`.
    pub heightfield: Grid2D<f32>,
    /// Per-cell blend weights: layer 0 = flat ground, layer 1 = cliff.
    pub splat_weights: Grid3D,
    /// Structures resolved onto this chunk.
    pub structures: Vec<PlacedStructure>,
    pub config: ChunkConfig,
}

/// Map a heightfield cell to its angular offset from the chunk center.
///
/// This is the one place the transposed axis convention lives: the external
/// surface representation stores heights with pitch running along the **x**
/// index and yaw along the **y** index. Normalization divides by
/// `resolution - 1` so the corner cells land exactly on ±D/2.
pub fn cell_to_angular(x: usize, y: usize, resolution: usize, degrees_per_chunk: f32) -> (f32, f32) {
    let half = degrees_per_chunk / 2.0;
    let x_pos = x as f32 / (resolution as f32 - 1.0);
    let y_pos = y as f32 / (resolution as f32 - 1.0);
    (
        x_pos * degrees_per_chunk - half, // pitch offset
        y_pos * degrees_per_chunk - half, // yaw offset
    )
}

/// Map a chunk-local `(x, z)` position to fractional heightfield cell
/// coordinates `(gx, gy)`. The same transposed convention as
/// [`cell_to_angular`]: grid x runs along world z (pitch) and grid y along
/// world x (yaw). Every world↔cell conversion goes through here.
pub fn local_to_cell(local_x: f32, local_z: f32, cell_pitch: f32) -> (f32, f32) {
    (local_z / cell_pitch, local_x / cell_pitch)
}

/// Compose an angular (pitch, yaw) offset in degrees onto a chunk rotation.
pub fn offset_rotation(rotation: Quat, pitch_deg: f32, yaw_deg: f32) -> Quat {
    rotation * Quat::from_euler(EulerRot::YXZ, yaw_deg.to_radians(), pitch_deg.to_radians(), 0.0)
}

impl Chunk {
    /// Latitude/longitude of the chunk center.
    pub fn center_spherical(&self) -> SphericalCoord {
        SphericalCoord::from_orientation(self.rotation)
    }

    /// World position of the chunk center.
    pub fn center_world(&self) -> Vec3 {
        let half = self.config.world_units_per_chunk / 2.0;
        self.origin + Vec3::new(half, 0.0, half)
    }

    /// Whether a chunk-local `(x, z)` position falls inside this chunk.
    pub fn contains_local(&self, x: f32, z: f32) -> bool {
        let w = self.config.world_units_per_chunk;
        x >= 0.0 && x < w && z >= 0.0 && z < w
    }

    /// The four corner UVs (x-min/y-min, x-max/y-min, x-min/y-max,
    /// x-max/y-max in cell order), computed by unwrapping every corner
    /// longitude against the center longitude before projecting. Near the
    /// seam `u` can fall slightly outside [0, 1); it is left unwrapped so
    /// that interpolating between corners never jumps.
    pub fn corner_uvs(&self) -> [Uv; 4] {
        let center = self.center_spherical();
        let half = self.config.degrees_per_chunk / 2.0;
        let mut out = [Uv { u: 0.0, v: 0.0 }; 4];
        for (i, (pitch, yaw)) in [
            (-half, -half),
            (half, -half),
            (-half, half),
            (half, half),
        ]
        .into_iter()
        .enumerate()
        {
            let sc = SphericalCoord::from_orientation(offset_rotation(self.rotation, pitch, yaw));
            let lon = center.longitude + signed_delta_degrees(sc.longitude, center.longitude);
            out[i] = Uv {
                u: 1.0 - lon / 360.0,
                v: (sc.latitude / 180.0).clamp(0.0, 1.0),
            };
        }
        out
    }
}

/// Build one chunk's heightfield and splat weights. Structure placement is
/// a separate pass that runs once the heightfield exists.
pub fn build_chunk(
    grid_index: (usize, usize),
    rotation: Quat,
    origin: Vec3,
    config: &ChunkConfig,
    heightmap: &HeightMap,
) -> Chunk {
    let res = config.heightmap_resolution;
    let mut heightfield = Grid2D::new(res, res, 0.0f32);

    for x in 0..res {
        for y in 0..res {
            let (pitch, yaw) = cell_to_angular(x, y, res, config.degrees_per_chunk);
            let point = offset_rotation(rotation, pitch, yaw);
            heightfield.set(x, y, sample_height(point, heightmap, config.dampening));
        }
    }

    let surface = HeightfieldSurface::new(
        heightfield.clone(),
        config.world_units_per_chunk,
        config.height_range,
    );
    let splat_weights = splat_weights_from_surface(&surface, config.splat_resolution);

    log::debug!(
        "built chunk {:?} at {}",
        grid_index,
        SphericalCoord::from_orientation(rotation)
    );

    Chunk {
        grid_index,
        rotation,
        origin,
        heightfield,
        splat_weights,
        structures: Vec::new(),
        config: config.clone(),
    }
}

/// Two-layer flat/cliff blend from the surface's steepness query. A
/// many-layer variant would replace this with any monotonic partition
/// summing to 1 per cell.
pub fn splat_weights_from_surface(surface: &dyn Surface, splat_resolution: usize) -> Grid3D {
    let mut weights = Grid3D::new(splat_resolution, splat_resolution, 2);
    for ax in 0..splat_resolution {
        for ay in 0..splat_resolution {
            let x = ax as f32 / splat_resolution as f32;
            let y = ay as f32 / splat_resolution as f32;

            // The surface consumer's steepness query takes flipped axes
            let angle = surface.slope_at(y, x);

            let cliffiness = (angle / 90.0).clamp(0.0, 1.0);
            weights.set(ax, ay, 0, 1.0 - cliffiness);
            weights.set(ax, ay, 1, cliffiness);
        }
    }
    weights
}
