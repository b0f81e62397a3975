//! Terra Assets
//!
//! Everything the overlay fetches:
//!
//! - [`io`]: byte readers (local files, HTTP, in-memory) behind
//!   [`AssetReaderVariant`]
//! - [`listing`]: the list of model files to place ([`AssetListing`])
//! - [`coordinates`]: per-model geographic metadata ([`CoordinateResolver`])
//! - [`loaders`]: model decoding into [`Prefab`](terra_scene::Prefab)s
//!
//! # Feature flags
//!
//! - `gltf`: glTF 2.0 decoding via the `gltf` crate
//! - `http`: HTTP(S) asset roots via `ehttp`

pub mod coordinates;
pub mod io;
pub mod listing;
pub mod loaders;

pub use coordinates::{CoordinateResolver, parse_coordinates};
#[cfg(not(target_arch = "wasm32"))]
pub use io::FileAssetReader;
#[cfg(feature = "http")]
pub use io::HttpAssetReader;
pub use io::{AssetReader, AssetReaderVariant, MemoryAssetReader};
pub use listing::{AssetListing, JsonListing, ModelEntry, StaticListing};
#[cfg(feature = "gltf")]
pub use loaders::GltfLoader;
pub use loaders::ModelLoader;
