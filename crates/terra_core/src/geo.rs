//! Geographic primitives.
//!
//! Coordinates always travel in the host renderer's order: **longitude
//! first, latitude second**. Metadata files store `lat`/`lon` keys, and the
//! swap happens exactly once, in the coordinate resolver. Every type in this
//! module keeps the `[lng, lat]` order, including its serialized form.

use std::f64::consts::PI;

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Mean earth radius in meters (the value MapLibre projects with).
pub const EARTH_RADIUS: f64 = 6_371_008.8;

/// Earth circumference at the equator for [`EARTH_RADIUS`].
pub const EARTH_CIRCUMFERENCE: f64 = 2.0 * PI * EARTH_RADIUS;

/// A geographic position in degrees, longitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    #[inline]
    #[must_use]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Returns the position as `[lng, lat]`.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Both components are finite and inside the WGS84 degree ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lng.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lng)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

impl From<[f64; 2]> for LngLat {
    #[inline]
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl From<LngLat> for [f64; 2] {
    #[inline]
    fn from(value: LngLat) -> Self {
        value.to_array()
    }
}

/// A successfully placed asset, as handed to navigation consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetLocation {
    pub name: String,
    pub coordinates: LngLat,
}

impl AssetLocation {
    #[must_use]
    pub fn new(name: impl Into<String>, coordinates: LngLat) -> Self {
        Self {
            name: name.into(),
            coordinates,
        }
    }
}

/// A position in the web-mercator unit square.
///
/// `x` grows eastwards from 0 at the antimeridian, `y` grows southwards from 0
/// at the northern clip latitude, and `z` is altitude expressed in the same
/// units (so it depends on the latitude it was measured at).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorCoordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl MercatorCoordinate {
    /// Projects a geographic position and an altitude in meters.
    #[must_use]
    pub fn from_lng_lat(lng_lat: LngLat, altitude: f64) -> Self {
        Self {
            x: mercator_x_from_lng(lng_lat.lng),
            y: mercator_y_from_lat(lng_lat.lat),
            z: mercator_z_from_altitude(altitude, lng_lat.lat),
        }
    }

    /// Latitude this coordinate sits at, in degrees.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        let y2 = 180.0 - self.y * 360.0;
        360.0 / PI * (y2 * PI / 180.0).exp().atan() - 90.0
    }

    /// Length of one meter, at this latitude, in mercator units.
    #[must_use]
    pub fn meter_in_mercator_units(&self) -> f64 {
        1.0 / EARTH_CIRCUMFERENCE / self.latitude().to_radians().cos()
    }

    #[inline]
    #[must_use]
    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

#[inline]
fn mercator_x_from_lng(lng: f64) -> f64 {
    (180.0 + lng) / 360.0
}

#[inline]
fn mercator_y_from_lat(lat: f64) -> f64 {
    (180.0 - (180.0 / PI) * (PI / 4.0 + lat * PI / 360.0).tan().ln()) / 360.0
}

#[inline]
fn mercator_z_from_altitude(altitude: f64, lat: f64) -> f64 {
    altitude / (EARTH_CIRCUMFERENCE * lat.to_radians().cos())
}
