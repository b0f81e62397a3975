//! Terra Core
//!
//! Foundational types shared by every Terra crate:
//!
//! - [`error`]: the [`Error`] / [`Result`] pair and its subsystem variants
//! - [`geo`]: [`LngLat`], [`AssetLocation`] and web-mercator projection
//! - [`time`]: the [`Clock`] abstraction the animation scheduler runs on
//! - [`settings`]: [`OverlaySettings`] and its nested defaults

pub mod error;
pub mod geo;
pub mod settings;
pub mod time;

pub use error::{AssetError, Error, LayerError, Result};
pub use geo::{AssetLocation, LngLat, MercatorCoordinate};
pub use settings::{LightingProfile, OverlaySettings, PlacementDefaults, RotationCycle};
pub use time::{Clock, ManualClock, SystemClock};
