//! Coordinate Resolver
//!
//! Every model `X` has a small JSON metadata document next to it
//! (`models/X.txt` by default) holding its geographic position in one of two
//! shapes:
//!
//! ```json
//! { "lat": 40.0, "lon": -74.0 }
//! { "location": { "geo": { "lat": 51.5, "lon": -0.1 } } }
//! ```
//!
//! The flat shape is tried first. The result is always returned as
//! [`LngLat`], i.e. longitude first, which is the order map hosts expect.
//!
//! Resolution fails softly: [`CoordinateResolver::resolve`] yields `None` for
//! any network, parse or range problem and logs the reason, so one broken
//! document never stops the other models from being placed.

use serde::Deserialize;
use terra_core::{AssetError, Error, LngLat, OverlaySettings, Result};

use crate::io::AssetReaderVariant;

#[derive(Deserialize)]
struct GeoPoint {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct Location {
    geo: GeoPoint,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CoordinateDocument {
    Flat(GeoPoint),
    Nested { location: Location },
}

impl CoordinateDocument {
    fn into_lng_lat(self) -> LngLat {
        let point = match self {
            Self::Flat(point) => point,
            Self::Nested { location } => location.geo,
        };
        LngLat::new(point.lon, point.lat)
    }
}

/// Parses a metadata document into host-ordered coordinates.
///
/// Zero is a legitimate latitude or longitude; only missing, non-numeric or
/// out-of-range values are rejected.
pub fn parse_coordinates(text: &str) -> Result<LngLat> {
    let document: CoordinateDocument = serde_json::from_str(text).map_err(|e| {
        if e.is_data() {
            Error::from(AssetError::Format(
                "metadata has neither {lat, lon} nor {location: {geo: {lat, lon}}}".into(),
            ))
        } else {
            Error::from(e)
        }
    })?;

    let lng_lat = document.into_lng_lat();
    if !lng_lat.is_valid() {
        return Err(AssetError::Format(format!(
            "coordinates out of range: lon {}, lat {}",
            lng_lat.lng, lng_lat.lat
        ))
        .into());
    }
    Ok(lng_lat)
}

#[derive(Debug, Clone)]
pub struct CoordinateResolver {
    reader: AssetReaderVariant,
    models_dir: String,
    extension: String,
}

impl CoordinateResolver {
    pub fn new(
        reader: AssetReaderVariant,
        models_dir: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        let mut models_dir = models_dir.into();
        if !models_dir.is_empty() && !models_dir.ends_with('/') {
            models_dir.push('/');
        }
        Self {
            reader,
            models_dir,
            extension: extension.into().trim_start_matches('.').to_string(),
        }
    }

    pub fn from_settings(reader: AssetReaderVariant, settings: &OverlaySettings) -> Self {
        Self::new(reader, &settings.models_dir, &settings.metadata_extension)
    }

    /// Location of the metadata document for `asset_id`.
    #[must_use]
    pub fn metadata_uri(&self, asset_id: &str) -> String {
        format!("{}{asset_id}.{}", self.models_dir, self.extension)
    }

    /// Fetches and parses the metadata, keeping the failure reason.
    pub async fn try_resolve(&self, asset_id: &str) -> Result<LngLat> {
        let uri = self.metadata_uri(asset_id);
        let text = self.reader.read_text(&uri).await?;
        parse_coordinates(&text)
    }

    /// Soft-failing variant of [`try_resolve`](Self::try_resolve).
    pub async fn resolve(&self, asset_id: &str) -> Option<LngLat> {
        match self.try_resolve(asset_id).await {
            Ok(lng_lat) => Some(lng_lat),
            Err(err) => {
                log::debug!("No coordinates for '{asset_id}': {err}");
                None
            }
        }
    }
}
