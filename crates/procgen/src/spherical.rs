//! Spherical coordinate math: conversions among orientation (a unit
//! rotation), latitude/longitude, and heightmap UV space.
//!
//! An orientation is the canonical "where on the sphere" representation
//! because it composes cleanly (chunk rotation × local offset rotation)
//! with no pole branching. Latitude uses the co-latitude convention:
//! 0 = north pole, 90 = equator, 180 = south pole. Longitude is degrees
//! east of the map's left edge in [0, 360).

use glam::{EulerRot, Quat};
use std::fmt;

/// A latitude/longitude pair on the planet's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalCoord {
    /// Co-latitude in degrees: 0 = north pole, 90 = equator, 180 = south pole.
    pub latitude: f32,
    /// Degrees east of the map seam, in [0, 360).
    pub longitude: f32,
}

/// Normalized heightmap texture coordinate, both axes in [0, 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uv {
    pub u: f32,
    pub v: f32,
}

/// Map a raw pitch Euler angle (degrees, any value) to co-latitude [0, 180].
///
/// A YXZ decomposition yields pitch in [-90, 90], i.e. [270, 360) ∪ [0, 90]
/// after wrapping: [270, 360) is north of the equator, [0, 90] south of it.
/// The band (90, 270) never comes out of a decomposition; it corresponds to
/// flipped orientations and folds back symmetrically so the function stays
/// total. Boundary values: 0 → 90, 90 → 180, 180 → 90, 270 → 0, 360 → 90.
pub fn normalize_latitude(raw_pitch_degrees: f32) -> f32 {
    let wrapped = raw_pitch_degrees.rem_euclid(360.0);
    if wrapped >= 270.0 {
        wrapped - 270.0
    } else if wrapped <= 90.0 {
        wrapped + 90.0
    } else {
        270.0 - wrapped
    }
}

/// Wrap an angle in degrees to [0, 360).
pub fn wrap_longitude(degrees: f32) -> f32 {
    degrees.rem_euclid(360.0)
}

/// Signed angular difference `a - b` in degrees, unwrapped to [-180, 180).
///
/// This is the seam handling for the whole pipeline: express any longitude
/// as a signed delta from a reference before interpolating or scaling,
/// instead of case analysis on which side of 0/360 each value fell.
pub fn signed_delta_degrees(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(360.0);
    if d >= 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Extract the roll component (Z Euler axis, degrees) of an orientation.
/// Chunks away from the equator pick up roll when a yaw/pitch offset is
/// composed onto their center rotation; the structure placer corrects for it.
pub fn roll_degrees(orientation: Quat) -> f32 {
    let (_yaw, _pitch, roll) = orientation.to_euler(EulerRot::YXZ);
    roll.to_degrees()
}

impl SphericalCoord {
    pub fn new(latitude: f32, longitude: f32) -> Self {
        Self {
            latitude: latitude.clamp(0.0, 180.0),
            longitude: wrap_longitude(longitude),
        }
    }

    /// Decompose an orientation into latitude (pitch) and longitude (yaw).
    ///
    /// Exact inverse of [`SphericalCoord::to_orientation`] for latitude in
    /// (0, 180) exclusive; the poles are gimbal-locked (yaw and roll couple)
    /// and do not round-trip longitude.
    pub fn from_orientation(orientation: Quat) -> Self {
        let (yaw, pitch, _roll) = orientation.to_euler(EulerRot::YXZ);
        Self {
            latitude: normalize_latitude(pitch.to_degrees()),
            longitude: wrap_longitude(yaw.to_degrees()),
        }
    }

    /// Build the rotation whose yaw is this longitude and whose pitch is
    /// this latitude (as an offset from the equator), with zero roll.
    pub fn to_orientation(self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.longitude.to_radians(),
            (self.latitude - 90.0).to_radians(),
            0.0,
        )
    }

    /// Project to heightmap UV space: `u = 1 - longitude/360` (the source
    /// map is horizontally flipped relative to longitude), `v = latitude/180`.
    /// Pole rows (latitude 0 or 180) map to an entire row of UV.
    pub fn to_uv(self) -> Uv {
        Uv {
            u: (1.0 - self.longitude / 360.0).rem_euclid(1.0),
            v: (self.latitude / 180.0).clamp(0.0, 1.0),
        }
    }

    /// Inverse of [`SphericalCoord::to_uv`] for interior points.
    pub fn from_uv(uv: Uv) -> Self {
        Self {
            latitude: (uv.v * 180.0).clamp(0.0, 180.0),
            longitude: wrap_longitude((1.0 - uv.u) * 360.0),
        }
    }
}

/// Orientation straight to heightmap UV.
pub fn orientation_to_uv(orientation: Quat) -> Uv {
    SphericalCoord::from_orientation(orientation).to_uv()
}

impl fmt::Display for SphericalCoord {
    /// Classic Earthican format where 0° latitude is the equator,
    /// e.g. `23.0° N, 45.0° E`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.latitude < 90.0 {
            write!(f, "{:.1}° N", 90.0 - self.latitude)?;
        } else if self.latitude > 90.0 {
            write!(f, "{:.1}° S", self.latitude - 90.0)?;
        } else {
            write!(f, "0°")?;
        }
        write!(f, ", ")?;
        if self.longitude <= 0.0001 {
            write!(f, "0°")
        } else if self.longitude <= 180.0 {
            write!(f, "{:.1}° E", self.longitude)
        } else {
            write!(f, "{:.1}° W", 360.0 - self.longitude)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-3;

    /// The boundary inputs called out for the latitude normalization.
    #[test]
    fn normalize_latitude_boundaries() {
        assert_eq!(normalize_latitude(0.0), 90.0);
        assert_eq!(normalize_latitude(90.0), 180.0);
        assert_eq!(normalize_latitude(180.0), 90.0);
        assert_eq!(normalize_latitude(270.0), 0.0);
        assert_eq!(normalize_latitude(360.0), 90.0);
        // Negative pitch (looking up) is north of the equator
        assert_eq!(normalize_latitude(-90.0), 0.0);
        assert_eq!(normalize_latitude(-45.0), 45.0);
    }

    #[test]
    fn orientation_round_trip_away_from_poles() {
        for lat_step in 1..18 {
            for lon_step in 0..24 {
                let sc = SphericalCoord::new(lat_step as f32 * 10.0, lon_step as f32 * 15.0);
                let back = SphericalCoord::from_orientation(sc.to_orientation());
                assert!(
                    (back.latitude - sc.latitude).abs() < TOL,
                    "latitude {} -> {}",
                    sc.latitude,
                    back.latitude
                );
                assert!(
                    signed_delta_degrees(back.longitude, sc.longitude).abs() < TOL,
                    "longitude {} -> {}",
                    sc.longitude,
                    back.longitude
                );
            }
        }
    }

    #[test]
    fn uv_round_trip_interior() {
        for lat_step in 1..18 {
            for lon_step in 0..24 {
                let sc = SphericalCoord::new(lat_step as f32 * 10.0, lon_step as f32 * 15.0);
                let back = SphericalCoord::from_uv(sc.to_uv());
                assert!((back.latitude - sc.latitude).abs() < TOL);
                assert!(signed_delta_degrees(back.longitude, sc.longitude).abs() < TOL);
            }
        }
    }

    /// `u` must change monotonically across one revolution, with a single
    /// jump only at the defined seam at longitude 0/360.
    #[test]
    fn uv_monotonic_in_longitude() {
        let mut wraps = 0;
        let mut prev = SphericalCoord::new(90.0, 0.0).to_uv().u;
        for step in 1..=360 {
            let u = SphericalCoord::new(90.0, step as f32 * 0.999).to_uv().u;
            if u > prev {
                wraps += 1; // u decreases with longitude except at the seam
            }
            prev = u;
        }
        assert!(wraps <= 1, "expected at most one seam wrap, got {}", wraps);
    }

    #[test]
    fn poles_map_to_uv_rows() {
        let north = SphericalCoord::new(0.0, 123.0).to_uv();
        assert_eq!(north.v, 0.0);
        let south = SphericalCoord::new(180.0, 321.0).to_uv();
        assert_eq!(south.v, 1.0);
    }

    #[test]
    fn signed_delta_unwraps_the_seam() {
        assert!((signed_delta_degrees(359.0, 1.0) - -2.0).abs() < TOL);
        assert!((signed_delta_degrees(1.0, 359.0) - 2.0).abs() < TOL);
        assert!((signed_delta_degrees(180.0, 0.0) - -180.0).abs() < TOL);
    }

    #[test]
    fn display_uses_equator_centric_degrees() {
        assert_eq!(SphericalCoord::new(45.0, 90.0).to_string(), "45.0° N, 90.0° E");
        assert_eq!(SphericalCoord::new(135.0, 270.0).to_string(), "45.0° S, 90.0° W");
        assert_eq!(SphericalCoord::new(90.0, 0.0).to_string(), "0°, 0°");
    }
}
