//! Structure placement: decode the color-keyed structure map, resolve each
//! match to a chunk-local position, and flatten the terrain underneath.

use crate::chunk::Chunk;
use crate::heightmap::StructureMap;
use crate::spherical::{roll_degrees, signed_delta_degrees, SphericalCoord, Uv};
use crate::surface::Surface;
use engine_core::{Quat, Vec3};
use std::collections::HashMap;

/// An opaque RGB triple keying a structure kind in the placement map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorKey(pub [u8; 3]);

/// A structure type resolvable from the placement map.
#[derive(Debug, Clone)]
pub struct StructureKind {
    pub name: String,
    /// Fallback half-extents for the flatten footprint when the
    /// instantiation layer supplies no bounding volume of its own.
    pub half_extents: Vec3,
}

/// Color → structure kind mapping, supplied at configuration time.
#[derive(Debug, Clone, Default)]
pub struct StructureTable {
    kinds: HashMap<ColorKey, StructureKind>,
}

impl StructureTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ColorKey, kind: StructureKind) {
        self.kinds.insert(key, kind);
    }

    pub fn get(&self, key: ColorKey) -> Option<&StructureKind> {
        self.kinds.get(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }
}

/// Lightweight descriptor handed to the object-instantiation layer. The
/// core never owns the instantiated object.
#[derive(Debug, Clone)]
pub struct PlacedStructure {
    pub kind: ColorKey,
    /// Chunk-local position; the chunk's bottom-left corner is the origin
    /// and y is the terrain height under the structure, world units.
    pub local_position: Vec3,
    pub facing: Quat,
}

/// Axis-aligned footprint of an instantiated structure in chunk-local space.
#[derive(Debug, Clone, Copy)]
pub struct StructureBounds {
    pub min: Vec3,
    pub max: Vec3,
}

/// The object-instantiation boundary: consumes a descriptor, returns the
/// bounding volume of whatever it spawned (used only to size the flatten
/// footprint). `None` means the object has no bounding volume.
pub trait StructureFactory {
    fn instantiate(&mut self, kind: &StructureKind, placed: &PlacedStructure)
        -> Option<StructureBounds>;
}

/// Default factory: bounds from the kind's configured half-extents.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableFootprints;

impl StructureFactory for TableFootprints {
    fn instantiate(
        &mut self,
        kind: &StructureKind,
        placed: &PlacedStructure,
    ) -> Option<StructureBounds> {
        let he = kind.half_extents;
        Some(StructureBounds {
            min: placed.local_position - Vec3::new(he.x, 0.0, he.z),
            max: placed.local_position + Vec3::new(he.x, 2.0 * he.y, he.z),
        })
    }
}

/// Opacity cutoff: structure-map pixels below this alpha are ignored.
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 128;

/// Scan the structure map and place every structure whose projected
/// position falls inside this chunk. Candidates landing outside are an
/// expected outcome (they belong to a neighbor) and are skipped silently.
/// Returns the number of structures placed.
///
/// Flattens the terrain under each placed footprint. Each flatten is
/// applied to the surface immediately, so a later structure whose footprint
/// overlaps an earlier one takes its base elevation from the flattened
/// terrain; the surface is flushed once at the end.
pub fn place_structures(
    chunk: &mut Chunk,
    map: &StructureMap,
    table: &StructureTable,
    factory: &mut dyn StructureFactory,
    surface: &mut dyn Surface,
    alpha_threshold: u8,
) -> usize {
    if table.is_empty() {
        return 0;
    }

    let center = chunk.center_spherical();
    let roll = roll_degrees(chunk.rotation);
    let roll_rotation = Quat::from_rotation_y(roll.to_radians());
    let w = chunk.config.world_units_per_chunk;
    let units_per_degree = w / chunk.config.degrees_per_chunk;

    let mut placed_count = 0;
    let mut flattened = false;

    for py in 0..map.height() {
        for px in 0..map.width() {
            let Some([r, g, b, a]) = map.pixel(px, py) else {
                continue;
            };
            if a < alpha_threshold {
                continue;
            }
            let key = ColorKey([r, g, b]);
            let Some(kind) = table.get(key) else {
                continue;
            };

            let sc = SphericalCoord::from_uv(Uv {
                u: px as f32 / map.width() as f32,
                v: py as f32 / map.height() as f32,
            });

            // Angular offset from the chunk center, longitude unwrapped
            // across the seam, scaled into world units
            let d_lat = sc.latitude - center.latitude;
            let d_lon = signed_delta_degrees(sc.longitude, center.longitude);
            let offset = roll_rotation
                * Vec3::new(d_lon * units_per_degree, 0.0, d_lat * units_per_degree);

            // Bottom-left corner becomes the origin
            let mut local = offset + Vec3::new(w / 2.0, 0.0, w / 2.0);
            if !chunk.contains_local(local.x, local.z) {
                continue; // belongs to a neighboring chunk
            }

            local.y = surface.sample_height_at(local.x, local.z);

            // Facing: chunk roll adjusted by the longitude delta. A cheap
            // heuristic, not a great-circle bearing.
            let facing = Quat::from_rotation_y((roll + d_lon).to_radians());

            let placed = PlacedStructure {
                kind: key,
                local_position: local,
                facing,
            };

            match factory.instantiate(kind, &placed) {
                Some(bounds) => {
                    flatten_under(chunk, &bounds, local.y / chunk.config.height_range);
                    // Later candidates with overlapping footprints must
                    // sample the already-flattened terrain
                    surface.apply_heights(&chunk.heightfield);
                    flattened = true;
                }
                None => {
                    log::error!(
                        "structure '{}' at {} has no bounding volume; terrain left unflattened",
                        kind.name,
                        sc
                    );
                }
            }

            log::debug!("placed '{}' at {} -> local {:?}", kind.name, sc, local);
            chunk.structures.push(placed);
            placed_count += 1;
        }
    }

    if flattened {
        surface.flush();
    }
    placed_count
}

/// Overwrite every heightfield cell covered by `bounds` with one value,
/// removing slope discontinuities under a structure. Cells outside the
/// footprint are untouched; the step at the footprint edge is a known
/// artifact. The caller flushes the surface afterwards.
pub fn flatten_under(chunk: &mut Chunk, bounds: &StructureBounds, normalized_height: f32) {
    let res = chunk.config.heightmap_resolution;
    let cell_pitch = chunk.config.world_units_per_chunk / (res as f32 - 1.0);
    let value = normalized_height.clamp(0.0, 1.0);

    let (min_gx, min_gy) = crate::chunk::local_to_cell(bounds.min.x, bounds.min.z, cell_pitch);
    let (max_gx, max_gy) = crate::chunk::local_to_cell(bounds.max.x, bounds.max.z, cell_pitch);
    let min_gx = min_gx.floor().max(0.0) as usize;
    let max_gx = max_gx.ceil().max(0.0) as usize;
    let min_gy = min_gy.floor().max(0.0) as usize;
    let max_gy = max_gy.ceil().max(0.0) as usize;

    chunk
        .heightfield
        .fill_region(min_gx, max_gx, min_gy, max_gy, value);
}
