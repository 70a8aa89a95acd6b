//! Source-image access: the equirectangular heightmap (bilinear luminance
//! lookup) and the color-keyed structure map (pixel-exact RGBA), plus the
//! orientation-driven height sampler built on top of the projection math.

use crate::spherical::orientation_to_uv;
use glam::Quat;
use image::DynamicImage;

/// Rec.601 luma weights, so identical images yield identical terrain.
fn luminance(r: u8, g: u8, b: u8) -> f32 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0
}

/// An equirectangular heightmap. Color data is discarded: only the
/// luminance channel matters.
#[derive(Debug, Clone)]
pub struct HeightMap {
    width: usize,
    height: usize,
    samples: Vec<f32>,
}

impl HeightMap {
    /// Build from a decoded image, converting to luminance in [0, 1].
    pub fn from_image(image: &DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = (rgba.width() as usize, rgba.height() as usize);
        let samples = rgba
            .pixels()
            .map(|p| luminance(p.0[0], p.0[1], p.0[2]))
            .collect();
        Self {
            width,
            height,
            samples,
        }
    }

    /// Build from raw luminance samples (row-major). Panics in debug builds
    /// if the sample count does not match the dimensions.
    pub fn from_luminance(width: usize, height: usize, samples: Vec<f32>) -> Self {
        debug_assert_eq!(samples.len(), width * height);
        Self {
            width,
            height,
            samples,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bilinear sample at a normalized UV.
    ///
    /// `u` wraps (the longitude seam at 0/360 is continuous terrain) and `v`
    /// clamps (the poles are hard edges). Out-of-range inputs never panic.
    pub fn sample_bilinear(&self, u: f32, v: f32) -> f32 {
        let u = u.rem_euclid(1.0);
        let v = v.clamp(0.0, 1.0);

        let fx = u * self.width as f32;
        let x0 = fx.floor() as usize % self.width;
        let x1 = (x0 + 1) % self.width; // wrap across the seam
        let tx = fx.fract();

        let fy = v * (self.height as f32 - 1.0);
        let y0 = (fy.floor() as usize).min(self.height - 1);
        let y1 = (y0 + 1).min(self.height - 1); // clamp at the poles
        let ty = fy - y0 as f32;

        let s00 = self.samples[y0 * self.width + x0];
        let s10 = self.samples[y0 * self.width + x1];
        let s01 = self.samples[y1 * self.width + x0];
        let s11 = self.samples[y1 * self.width + x1];

        let top = s00 + (s10 - s00) * tx;
        let bottom = s01 + (s11 - s01) * tx;
        top + (bottom - top) * ty
    }
}

/// The color-keyed structure placement map, read pixel-exact.
#[derive(Debug, Clone)]
pub struct StructureMap {
    pixels: image::RgbaImage,
}

impl StructureMap {
    pub fn from_image(image: &DynamicImage) -> Self {
        Self {
            pixels: image.to_rgba8(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// RGBA at a pixel, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.pixels.width() && y < self.pixels.height() {
            Some(self.pixels.get_pixel(x, y).0)
        } else {
            None
        }
    }
}

/// Normalized height at an orientation: orientation → UV → bilinear
/// luminance, divided by `dampening` (larger values flatten the terrain).
/// Side-effect free; result is nominally in [0, 1/dampening].
pub fn sample_height(orientation: Quat, heightmap: &HeightMap, dampening: f32) -> f32 {
    let uv = orientation_to_uv(orientation);
    heightmap.sample_bilinear(uv.u, uv.v) / dampening
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spherical::SphericalCoord;

    fn seam_map() -> HeightMap {
        // 4x4, left column bright, everything else dark
        let mut samples = vec![0.0; 16];
        for y in 0..4 {
            samples[y * 4] = 1.0;
        }
        HeightMap::from_luminance(4, 4, samples)
    }

    #[test]
    fn bilinear_wraps_across_the_seam() {
        let hm = seam_map();
        // u = 0.95 sits between the last column (dark) and the wrapped
        // first column (bright): fx = 3.8 -> 80% of the bright column.
        let v = hm.sample_bilinear(0.95, 0.5);
        assert!((v - 0.8).abs() < 1e-5, "got {}", v);
    }

    #[test]
    fn out_of_range_uv_never_panics() {
        let hm = seam_map();
        hm.sample_bilinear(-3.7, 0.5);
        hm.sample_bilinear(42.0, -1.0);
        hm.sample_bilinear(0.999_999, 2.0);
    }

    #[test]
    fn v_clamps_at_the_poles() {
        let hm = seam_map();
        assert_eq!(hm.sample_bilinear(0.0, -0.5), hm.sample_bilinear(0.0, 0.0));
        assert_eq!(hm.sample_bilinear(0.0, 1.5), hm.sample_bilinear(0.0, 1.0));
    }

    #[test]
    fn dampening_scales_the_sample() {
        let hm = HeightMap::from_luminance(2, 2, vec![0.6; 4]);
        let o = SphericalCoord::new(90.0, 180.0).to_orientation();
        let h = sample_height(o, &hm, 2.0);
        assert!((h - 0.3).abs() < 1e-5);
    }

    #[test]
    fn structure_map_is_pixel_exact() {
        let mut img = image::RgbaImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgba([10, 20, 30, 255]));
        let sm = StructureMap::from_image(&DynamicImage::ImageRgba8(img));
        assert_eq!(sm.pixel(2, 1), Some([10, 20, 30, 255]));
        assert_eq!(sm.pixel(3, 0), None);
    }
}
