//! Geodetic placement
//!
//! Puts a model at a geographic position:
//!
//! ```text
//! model      = host.matrix_for_model(lng_lat, altitude) * scale(s)
//! projection = main_matrix * model
//! ```
//!
//! All of it runs in `f64`. Mercator coordinates of a model are ~1e-1 while
//! its extent is ~1e-7, which `f32` cannot compose without visible jitter;
//! the result is narrowed to `f32` only when it is handed to the camera.
//!
//! Nothing here is cached: the host camera moves between frames, so the
//! matrices are recomputed on every render.

use std::f64::consts::FRAC_PI_2;

use glam::{DMat4, DVec3, Mat4};
use terra_core::{LngLat, MercatorCoordinate, PlacementDefaults};

use crate::host::{HostView, ProjectionData};

/// `host_matrix` followed by a uniform scale in model space.
#[inline]
#[must_use]
pub fn compose_model_matrix(host_matrix: DMat4, scale: f64) -> DMat4 {
    host_matrix * DMat4::from_scale(DVec3::splat(scale))
}

/// Where and how large one model is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPlacement {
    pub lng_lat: LngLat,
    /// Meters above the ellipsoid.
    pub altitude: f64,
    /// Uniform model-space scale.
    pub scale: f64,
}

impl ModelPlacement {
    #[must_use]
    pub fn new(lng_lat: LngLat, altitude: f64, scale: f64) -> Self {
        Self {
            lng_lat,
            altitude,
            scale,
        }
    }

    #[must_use]
    pub fn from_defaults(lng_lat: LngLat, defaults: &PlacementDefaults) -> Self {
        Self::new(lng_lat, defaults.altitude, defaults.scale)
    }

    /// Model matrix for the host's current frame.
    #[must_use]
    pub fn compute(&self, host: &dyn HostView) -> DMat4 {
        compose_model_matrix(host.matrix_for_model(self.lng_lat, self.altitude), self.scale)
    }

    /// Camera projection for this frame: host projection times placement.
    #[must_use]
    pub fn projection_matrix(&self, host: &dyn HostView, projection: &ProjectionData) -> Mat4 {
        (projection.main_matrix * self.compute(host)).as_mat4()
    }
}

/// Model matrix of a flat web-mercator map.
///
/// Translates to the mercator coordinate, scales meters into mercator units
/// with Y flipped (mercator Y grows southwards) and turns model +Y (glTF up)
/// into map up.
#[derive(Debug, Clone, Copy, Default)]
pub struct MercatorHostTransform;

impl MercatorHostTransform {
    #[must_use]
    pub fn matrix_for_model(&self, lng_lat: LngLat, altitude: f64) -> DMat4 {
        let coordinate = MercatorCoordinate::from_lng_lat(lng_lat, altitude);
        let meters = coordinate.meter_in_mercator_units();

        DMat4::from_translation(coordinate.to_dvec3())
            * DMat4::from_scale(DVec3::new(meters, -meters, meters))
            * DMat4::from_rotation_x(FRAC_PI_2)
    }
}
