//! The sliding window of terrain chunks.
//!
//! A grid is created once per landing, fully populated synchronously, and
//! destroyed in full on takeoff. Sliding mutates one row or column of slots
//! (destroy the trailing edge, build the leading edge) rather than
//! recreating the grid. Adjacency is index-based: neighbor information is a
//! read-only query over grid coordinates, never stored references.

use crate::chunk::{build_chunk, offset_rotation, Chunk, ChunkConfig};
use crate::error::TerrainError;
use crate::heightmap::{HeightMap, StructureMap};
use crate::spherical::SphericalCoord;
use crate::structures::{place_structures, StructureFactory, StructureTable, TableFootprints};
use crate::surface::HeightfieldSurface;
use engine_core::Vec3;

/// Which way the viewpoint crossed a chunk boundary. North is toward the
/// north pole (decreasing co-latitude, -z); East is increasing longitude
/// (+x).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    North,
    South,
    East,
    West,
}

/// An N×M window of chunks indexed by `(col, row)`, with a fixed center
/// slot everything else is derived from.
pub struct ChunkGrid {
    cols: usize,
    rows: usize,
    slots: Vec<Option<Chunk>>,
    config: ChunkConfig,
    heightmap: HeightMap,
    structure_map: StructureMap,
    structure_table: StructureTable,
    factory: Box<dyn StructureFactory>,
    alpha_threshold: u8,
}

impl ChunkGrid {
    /// Create an empty grid. Odd dimensions keep the center slot
    /// geometrically central; 3×3 is the usual window.
    pub fn new(
        cols: usize,
        rows: usize,
        config: ChunkConfig,
        heightmap: HeightMap,
        structure_map: StructureMap,
        structure_table: StructureTable,
    ) -> Self {
        Self::with_factory(
            cols,
            rows,
            config,
            heightmap,
            structure_map,
            structure_table,
            Box::new(TableFootprints),
        )
    }

    /// Create an empty grid with a custom object-instantiation boundary.
    pub fn with_factory(
        cols: usize,
        rows: usize,
        config: ChunkConfig,
        heightmap: HeightMap,
        structure_map: StructureMap,
        structure_table: StructureTable,
        factory: Box<dyn StructureFactory>,
    ) -> Self {
        assert!(cols > 0 && rows > 0);
        Self {
            cols,
            rows,
            slots: (0..cols * rows).map(|_| None).collect(),
            config,
            heightmap,
            structure_map,
            structure_table,
            factory,
            alpha_threshold: crate::structures::DEFAULT_ALPHA_THRESHOLD,
        }
    }

    /// Override the structure-map opacity cutoff.
    pub fn set_alpha_threshold(&mut self, threshold: u8) {
        self.alpha_threshold = threshold;
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The designated center slot.
    pub fn center_index(&self) -> (usize, usize) {
        (self.cols / 2, self.rows / 2)
    }

    /// Chunk at a grid coordinate, or `None` when the slot is empty or the
    /// coordinate is out of range on either axis.
    pub fn chunk_at(&self, col: usize, row: usize) -> Option<&Chunk> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.slots[row * self.cols + col].as_ref()
    }

    pub fn center_chunk(&self) -> Option<&Chunk> {
        let (c, r) = self.center_index();
        self.chunk_at(c, r)
    }

    pub fn is_fully_populated(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Populated 4-neighbors of a slot. Advisory only (a rendering LOD
    /// hint); carries no data the core needs.
    pub fn neighbors_of(&self, col: usize, row: usize) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(4);
        let candidates = [
            (col.wrapping_sub(1), row),
            (col + 1, row),
            (col, row.wrapping_sub(1)),
            (col, row + 1),
        ];
        for (c, r) in candidates {
            if c < self.cols && r < self.rows && self.chunk_at(c, r).is_some() {
                out.push((c, r));
            }
        }
        out
    }

    /// Clear every slot, build one chunk at the landing coordinate into the
    /// center slot, then fill the rest of the window.
    pub fn build_from_center(&mut self, landing: SphericalCoord) -> Result<(), TerrainError> {
        for slot in &mut self.slots {
            *slot = None;
        }

        let (cc, cr) = self.center_index();
        let rotation = landing.to_orientation();
        let half = self.config.world_units_per_chunk / 2.0;
        // Center the footprint of the center chunk on the world origin
        let origin = Vec3::new(-half, 0.0, -half);

        let chunk = self.build_slot((cc, cr), rotation, origin);
        self.slots[cr * self.cols + cc] = Some(chunk);
        log::info!("landing grid centered at {}", landing);

        self.fill_missing().map(|_| ())
    }

    /// Build every empty slot as an offset of the center chunk. Each
    /// chunk's output depends only on its own center rotation and the
    /// shared immutable images, so builds are order-independent (and would
    /// be safe to run on worker tasks without extra synchronization).
    ///
    /// Returns the number of chunks built, or an error when the center slot
    /// is empty, since neighbors have nothing to be defined against.
    pub fn fill_missing(&mut self) -> Result<usize, TerrainError> {
        let (cc, cr) = self.center_index();
        let (center_rotation, center_origin) = match self.chunk_at(cc, cr) {
            Some(chunk) => (chunk.rotation, chunk.origin),
            None => {
                log::error!("fill_missing called with an empty center slot");
                return Err(TerrainError::MissingCenterChunk);
            }
        };

        let d = self.config.degrees_per_chunk;
        let w = self.config.world_units_per_chunk;
        let mut built = 0;

        for row in 0..self.rows {
            for col in 0..self.cols {
                if self.slots[row * self.cols + col].is_some() {
                    continue;
                }
                let col_off = col as f32 - cc as f32;
                let row_off = row as f32 - cr as f32;

                let rotation = offset_rotation(center_rotation, row_off * d, col_off * d);
                let origin = center_origin + Vec3::new(col_off * w, 0.0, row_off * w);

                let chunk = self.build_slot((col, row), rotation, origin);
                self.slots[row * self.cols + col] = Some(chunk);
                built += 1;
            }
        }

        if built > 0 {
            log::info!("filled {} chunk slot(s)", built);
        }
        Ok(built)
    }

    /// Shift the window one row or column. Trailing-edge chunks are
    /// destroyed, survivors keep their rotations and world origins, and the
    /// vacated leading edge is rebuilt. The center reference implicitly
    /// becomes whichever chunk is now geometrically central.
    pub fn slide(&mut self, direction: SlideDirection) -> Result<usize, TerrainError> {
        log::debug!("sliding window {:?}", direction);
        match direction {
            // Viewpoint moved -z (toward the north pole): drop the south row
            SlideDirection::North => self.shift_rows(false),
            SlideDirection::South => self.shift_rows(true),
            SlideDirection::East => self.shift_cols(true),
            SlideDirection::West => self.shift_cols(false),
        }
        self.fill_missing()
    }

    /// Shift rows by one. `forward` drops row 0 and moves everything to a
    /// lower row index (viewpoint moved +z); otherwise the reverse.
    fn shift_rows(&mut self, forward: bool) {
        let (cols, rows) = (self.cols, self.rows);
        if forward {
            for row in 0..rows - 1 {
                for col in 0..cols {
                    self.slots[row * cols + col] = self.slots[(row + 1) * cols + col].take();
                }
            }
            for col in 0..cols {
                self.slots[(rows - 1) * cols + col] = None;
            }
        } else {
            for row in (1..rows).rev() {
                for col in 0..cols {
                    self.slots[row * cols + col] = self.slots[(row - 1) * cols + col].take();
                }
            }
            for col in 0..cols {
                self.slots[col] = None;
            }
        }
        self.reindex();
    }

    /// Shift columns by one. `forward` drops column 0 (viewpoint moved +x).
    fn shift_cols(&mut self, forward: bool) {
        let (cols, rows) = (self.cols, self.rows);
        if forward {
            for row in 0..rows {
                for col in 0..cols - 1 {
                    self.slots[row * cols + col] = self.slots[row * cols + col + 1].take();
                }
                self.slots[row * cols + cols - 1] = None;
            }
        } else {
            for row in 0..rows {
                for col in (1..cols).rev() {
                    self.slots[row * cols + col] = self.slots[row * cols + col - 1].take();
                }
                self.slots[row * cols] = None;
            }
        }
        self.reindex();
    }

    /// Refresh each surviving chunk's grid index after a shift.
    fn reindex(&mut self) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                if let Some(chunk) = &mut self.slots[row * self.cols + col] {
                    chunk.grid_index = (col, row);
                }
            }
        }
    }

    /// Map a world-space position to its spherical coordinate through the
    /// center chunk's local frame. An approximation that holds while the
    /// viewpoint stays near the window center, which is the regime the
    /// sliding window maintains.
    pub fn world_to_spherical(&self, world_pos: Vec3) -> Result<SphericalCoord, TerrainError> {
        let center = self.center_chunk().ok_or_else(|| {
            log::error!("world_to_spherical called with an empty center slot");
            TerrainError::MissingCenterChunk
        })?;

        let local = world_pos - center.center_world();
        let degrees_per_unit = self.config.degrees_per_chunk / self.config.world_units_per_chunk;
        let rotation = offset_rotation(
            center.rotation,
            local.z * degrees_per_unit,
            local.x * degrees_per_unit,
        );
        Ok(SphericalCoord::from_orientation(rotation))
    }

    /// Tear down every populated slot. Terminal: the grid is unusable until
    /// the next `build_from_center`.
    pub fn destroy(&mut self) {
        let populated = self.slots.iter().filter(|s| s.is_some()).count();
        for slot in &mut self.slots {
            *slot = None;
        }
        log::info!("destroyed {} chunk(s)", populated);
    }

    fn build_slot(&mut self, index: (usize, usize), rotation: engine_core::Quat, origin: Vec3) -> Chunk {
        let mut chunk = build_chunk(index, rotation, origin, &self.config, &self.heightmap);
        let mut surface = HeightfieldSurface::new(
            chunk.heightfield.clone(),
            self.config.world_units_per_chunk,
            self.config.height_range,
        );
        let placed = place_structures(
            &mut chunk,
            &self.structure_map,
            &self.structure_table,
            self.factory.as_mut(),
            &mut surface,
            self.alpha_threshold,
        );
        if placed > 0 {
            log::debug!("chunk {:?}: {} structure(s)", index, placed);
        }
        chunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::{ColorKey, StructureKind};
    use engine_core::Vec3;
    use image::{DynamicImage, Rgba, RgbaImage};
    use rand::prelude::*;

    fn test_heightmap() -> HeightMap {
        let mut rng = StdRng::seed_from_u64(1234);
        let samples = (0..64 * 32).map(|_| rng.gen::<f32>()).collect();
        HeightMap::from_luminance(64, 32, samples)
    }

    fn empty_structure_map() -> StructureMap {
        StructureMap::from_image(&DynamicImage::ImageRgba8(RgbaImage::new(8, 8)))
    }

    fn tower_structure_map() -> StructureMap {
        let mut img = RgbaImage::new(8, 8);
        img.put_pixel(4, 4, Rgba([200, 40, 40, 255]));
        StructureMap::from_image(&DynamicImage::ImageRgba8(img))
    }

    fn tower_table() -> StructureTable {
        let mut table = StructureTable::new();
        table.insert(
            ColorKey([200, 40, 40]),
            StructureKind {
                name: "tower".to_string(),
                half_extents: Vec3::new(48.0, 64.0, 48.0),
            },
        );
        table
    }

    fn small_config() -> ChunkConfig {
        ChunkConfig {
            heightmap_resolution: 17,
            splat_resolution: 8,
            ..Default::default()
        }
    }

    fn test_grid(structures: bool) -> ChunkGrid {
        let (map, table) = if structures {
            (tower_structure_map(), tower_table())
        } else {
            (empty_structure_map(), StructureTable::new())
        };
        ChunkGrid::new(3, 3, small_config(), test_heightmap(), map, table)
    }

    #[test]
    fn fill_missing_without_center_is_an_error() {
        let mut grid = test_grid(false);
        assert_eq!(grid.fill_missing(), Err(TerrainError::MissingCenterChunk));
    }

    #[test]
    fn landing_populates_the_whole_window() {
        let mut grid = test_grid(false);
        grid.build_from_center(SphericalCoord::new(90.0, 180.0)).unwrap();
        assert!(grid.is_fully_populated());

        // Every neighbor sits exactly one chunk offset from the center
        let center = grid.center_chunk().unwrap();
        let d = grid.config.degrees_per_chunk;
        let w = grid.config.world_units_per_chunk;
        for row in 0..3 {
            for col in 0..3 {
                let chunk = grid.chunk_at(col, row).unwrap();
                let sc = chunk.center_spherical();
                let expected_lat = 90.0 + (row as f32 - 1.0) * d;
                assert!(
                    (sc.latitude - expected_lat).abs() < 0.2,
                    "({}, {}): lat {} vs {}",
                    col,
                    row,
                    sc.latitude,
                    expected_lat
                );
                let expected_origin =
                    center.origin + Vec3::new((col as f32 - 1.0) * w, 0.0, (row as f32 - 1.0) * w);
                assert!(chunk.origin.distance(expected_origin) < 1e-3);
            }
        }
    }

    #[test]
    fn fill_missing_builds_exactly_the_empty_slots() {
        let mut grid = test_grid(false);
        grid.build_from_center(SphericalCoord::new(90.0, 180.0)).unwrap();
        // Already fully populated: nothing to do
        assert_eq!(grid.fill_missing().unwrap(), 0);
    }

    #[test]
    fn landing_center_chunk_hugs_the_map_center_column() {
        let mut grid = test_grid(false);
        grid.build_from_center(SphericalCoord::new(90.0, 180.0)).unwrap();
        assert!(grid.is_fully_populated());
        for uv in grid.center_chunk().unwrap().corner_uvs() {
            assert!((0.47..=0.53).contains(&uv.u), "corner u {}", uv.u);
        }
    }

    #[test]
    fn slide_east_replaces_one_column_and_keeps_the_rest() {
        let mut grid = test_grid(false);
        grid.build_from_center(SphericalCoord::new(80.0, 40.0)).unwrap();

        // Chunk identity = its world origin (stable across slides)
        let keep: Vec<Vec3> = (0..3)
            .flat_map(|row| (1..3).map(move |col| (col, row)))
            .map(|(c, r)| grid.chunk_at(c, r).unwrap().origin)
            .collect();

        grid.slide(SlideDirection::East).unwrap();
        assert!(grid.is_fully_populated());

        let mut idx = 0;
        for row in 0..3 {
            for col in 0..2 {
                let chunk = grid.chunk_at(col, row).unwrap();
                assert_eq!(chunk.origin, keep[row * 2 + col], "({}, {})", col, row);
                assert_eq!(chunk.grid_index, (col, row));
                idx += 1;
            }
        }
        assert_eq!(idx, 6);

        // The new east column is one chunk further east than the survivors
        let w = grid.config.world_units_per_chunk;
        for row in 0..3 {
            let new = grid.chunk_at(2, row).unwrap();
            let neighbor = grid.chunk_at(1, row).unwrap();
            assert!((new.origin.x - neighbor.origin.x - w).abs() < 1e-3);
        }
    }

    #[test]
    fn slide_north_moves_the_window_toward_the_pole() {
        let mut grid = test_grid(false);
        grid.build_from_center(SphericalCoord::new(90.0, 180.0)).unwrap();
        let old_center_lat = grid.center_chunk().unwrap().center_spherical().latitude;

        grid.slide(SlideDirection::North).unwrap();
        assert!(grid.is_fully_populated());
        let new_center_lat = grid.center_chunk().unwrap().center_spherical().latitude;
        // Toward the north pole = co-latitude decreases by one chunk
        assert!((old_center_lat - new_center_lat - 5.0).abs() < 0.2);
    }

    #[test]
    fn world_to_spherical_at_the_landing_point() {
        let mut grid = test_grid(false);
        let landing = SphericalCoord::new(75.0, 200.0);
        grid.build_from_center(landing).unwrap();

        let sc = grid.world_to_spherical(Vec3::ZERO).unwrap();
        assert!((sc.latitude - landing.latitude).abs() < 0.1);
        assert!((sc.longitude - landing.longitude).abs() < 0.1);

        // One chunk-width east means one degrees_per_chunk of longitude
        let sc_east = grid
            .world_to_spherical(Vec3::new(grid.config.world_units_per_chunk, 0.0, 0.0))
            .unwrap();
        // Off the equator the composed yaw differs slightly from the raw
        // longitude delta; the window stays consistent because chunks are
        // composed the same way
        assert!((sc_east.longitude - landing.longitude - 5.0).abs() < 0.5);
    }

    #[test]
    fn the_tower_is_accepted_by_exactly_one_chunk() {
        let mut grid = test_grid(true);
        grid.build_from_center(SphericalCoord::new(90.0, 180.0)).unwrap();

        let mut total = 0;
        for row in 0..3 {
            for col in 0..3 {
                total += grid.chunk_at(col, row).unwrap().structures.len();
            }
        }
        assert_eq!(total, 1);
        assert_eq!(grid.center_chunk().unwrap().structures.len(), 1);
    }

    /// An out-of-range column must not alias into the flat slot array as a
    /// cell of the next row.
    #[test]
    fn chunk_at_rejects_out_of_range_coordinates() {
        let mut grid = test_grid(false);
        grid.build_from_center(SphericalCoord::new(90.0, 180.0)).unwrap();
        assert!(grid.is_fully_populated());
        assert!(grid.chunk_at(3, 0).is_none());
        assert!(grid.chunk_at(0, 3).is_none());
        assert!(grid.chunk_at(usize::MAX, usize::MAX).is_none());
    }

    #[test]
    fn destroy_empties_every_slot() {
        let mut grid = test_grid(false);
        grid.build_from_center(SphericalCoord::new(90.0, 180.0)).unwrap();
        grid.destroy();
        assert!(!grid.is_fully_populated());
        assert!(grid.center_chunk().is_none());
        assert_eq!(grid.fill_missing(), Err(TerrainError::MissingCenterChunk));
    }

    #[test]
    fn neighbors_are_index_based_and_populated_only() {
        let mut grid = test_grid(false);
        grid.build_from_center(SphericalCoord::new(90.0, 180.0)).unwrap();
        let n = grid.neighbors_of(0, 0);
        assert_eq!(n.len(), 2);
        assert!(n.contains(&(1, 0)) && n.contains(&(0, 1)));
        assert_eq!(grid.neighbors_of(1, 1).len(), 4);
    }
}
