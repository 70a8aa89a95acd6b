//! Command-line landing demo: load a planet's heightmap and structure map,
//! land at a coordinate, slide the chunk window once, and take off again.
//!
//! Usage: `lander <heightmap.png> [structure_map.png] [latitude] [longitude]`
//! Latitude/longitude use the co-latitude convention (0 = north pole,
//! 90 = equator); both default to the equator at the antimeridian.

use anyhow::{Context, Result};
use engine_core::Vec3;
use procgen::{
    ChunkGrid, ColorKey, HeightMap, SlideDirection, SphericalCoord, StructureKind, StructureMap,
    StructureTable, SurfaceConfig, SurfaceSession,
};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let heightmap_path = args
        .next()
        .context("usage: lander <heightmap.png> [structure_map.png] [latitude] [longitude]")?;
    let structure_path = args.next();
    let latitude: f32 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(90.0);
    let longitude: f32 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(180.0);

    let config = SurfaceConfig::load();
    // Write the effective settings back so a surface.ron template exists
    // for editing on the next run
    config.save();

    let heightmap_image = image::open(&heightmap_path)
        .with_context(|| format!("could not open heightmap {}", heightmap_path))?;
    let heightmap = HeightMap::from_image(&heightmap_image);
    log::info!(
        "heightmap {}: {}x{}",
        heightmap_path,
        heightmap.width(),
        heightmap.height()
    );

    let structure_map = match &structure_path {
        Some(path) => {
            let img = image::open(path)
                .with_context(|| format!("could not open structure map {}", path))?;
            StructureMap::from_image(&img)
        }
        // No structure map: a fully transparent single pixel places nothing
        None => StructureMap::from_image(&image::DynamicImage::ImageRgba8(
            image::RgbaImage::new(1, 1),
        )),
    };

    let mut grid = ChunkGrid::new(
        config.grid_cols,
        config.grid_rows,
        config.chunk_config(),
        heightmap,
        structure_map,
        default_structure_table(),
    );
    grid.set_alpha_threshold(config.alpha_threshold);

    let mut session = SurfaceSession::new(grid);
    let landing = SphericalCoord::new(latitude, longitude);
    session.land(landing)?;
    report(&session);

    // Walk east across one chunk boundary and follow with the window
    session.grid_mut().slide(SlideDirection::East)?;
    log::info!("window slid east");
    report(&session);

    let departure = session.takeoff(Vec3::ZERO)?;
    println!("took off from {}", departure);
    Ok(())
}

/// The demo color table: red towers, blue habitats.
fn default_structure_table() -> StructureTable {
    let mut table = StructureTable::new();
    table.insert(
        ColorKey([255, 0, 0]),
        StructureKind {
            name: "tower".to_string(),
            half_extents: glam::Vec3::new(48.0, 96.0, 48.0),
        },
    );
    table.insert(
        ColorKey([0, 0, 255]),
        StructureKind {
            name: "habitat".to_string(),
            half_extents: glam::Vec3::new(96.0, 32.0, 96.0),
        },
    );
    table
}

fn report(session: &SurfaceSession) {
    let grid = session.grid();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            if let Some(chunk) = grid.chunk_at(col, row) {
                let heights = chunk.heightfield.as_slice();
                let (mut lo, mut hi) = (f32::MAX, f32::MIN);
                for &h in heights {
                    lo = lo.min(h);
                    hi = hi.max(h);
                }
                println!(
                    "chunk ({}, {}) at {}: heights {:.3}..{:.3}, {} structure(s), {} neighbor(s)",
                    col,
                    row,
                    chunk.center_spherical(),
                    lo,
                    hi,
                    chunk.structures.len(),
                    grid.neighbors_of(col, row).len()
                );
            }
        }
    }
}
