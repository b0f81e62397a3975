//! Overlay Settings
//!
//! Deployment-wide configuration for the model overlay. Every field has a
//! default matching the reference deployment, so a settings file only needs
//! to name what it changes:
//!
//! ```rust,ignore
//! use terra_core::OverlaySettings;
//!
//! let settings = OverlaySettings::from_json_str(r#"{
//!     "asset_root": "https://example.org/globe/",
//!     "placement": { "altitude": 25.0 }
//! }"#)?;
//! assert_eq!(settings.placement.scale, 10.0);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level overlay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// Base path or URL every other URI is resolved against.
    pub asset_root: String,
    /// JSON array of model filenames, relative to `asset_root`.
    pub listing_uri: String,
    /// Directory holding the models and their metadata files.
    pub models_dir: String,
    /// Extension of the per-model coordinate metadata file.
    pub metadata_extension: String,
    /// Extensions stripped from listing entries to derive asset ids.
    pub model_extensions: Vec<String>,
    pub placement: PlacementDefaults,
    pub rotation: RotationCycle,
    pub lighting: LightingProfile,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            asset_root: "./".to_string(),
            listing_uri: "api/models.json".to_string(),
            models_dir: "models/".to_string(),
            metadata_extension: "txt".to_string(),
            model_extensions: vec!["glb".to_string(), "gltf".to_string()],
            placement: PlacementDefaults::default(),
            rotation: RotationCycle::default(),
            lighting: LightingProfile::default(),
        }
    }
}

impl OverlaySettings {
    /// Parses settings from JSON, filling omitted fields with defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Altitude and scale applied to every model of a deployment.
///
/// These are deliberately per-deployment rather than per-asset; a per-asset
/// override would hang off the asset metadata instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementDefaults {
    /// Meters above the ellipsoid.
    pub altitude: f64,
    /// Uniform scale applied in the model's local space.
    pub scale: f64,
}

impl Default for PlacementDefaults {
    fn default() -> Self {
        Self {
            altitude: 40.0,
            scale: 10.0,
        }
    }
}

/// Timing of the pause/rotate cycle every model runs through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationCycle {
    /// How long a model rests between half-turns.
    #[serde(with = "duration_ms")]
    pub pause: Duration,
    /// How long one half-turn takes.
    #[serde(with = "duration_ms")]
    pub rotation: Duration,
}

impl RotationCycle {
    pub const DEFAULT_PAUSE: Duration = Duration::from_millis(5000);
    pub const DEFAULT_ROTATION: Duration = Duration::from_millis(2000);

    /// Length of one full pause + half-turn period.
    #[inline]
    #[must_use]
    pub fn period(&self) -> Duration {
        self.pause + self.rotation
    }
}

impl Default for RotationCycle {
    fn default() -> Self {
        Self {
            pause: Self::DEFAULT_PAUSE,
            rotation: Self::DEFAULT_ROTATION,
        }
    }
}

/// Lighting rig installed in every model scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightingProfile {
    /// A single white directional light.
    #[default]
    Standard,
    /// Ambient fill plus two directional lights, for small or dim screens.
    Enhanced,
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
