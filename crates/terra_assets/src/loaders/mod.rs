#[cfg(feature = "gltf")]
pub mod gltf;

#[cfg(feature = "gltf")]
pub use self::gltf::GltfLoader;

use terra_core::{OverlaySettings, Result};
use terra_scene::Prefab;

use crate::io::AssetReaderVariant;
use crate::listing::ModelEntry;

/// Fetches model files from `<models_dir><file_name>` and decodes them.
#[derive(Debug, Clone)]
pub struct ModelLoader {
    reader: AssetReaderVariant,
    models_dir: String,
}

impl ModelLoader {
    pub fn new(reader: AssetReaderVariant, models_dir: impl Into<String>) -> Self {
        let mut models_dir = models_dir.into();
        if !models_dir.is_empty() && !models_dir.ends_with('/') {
            models_dir.push('/');
        }
        Self { reader, models_dir }
    }

    pub fn from_settings(reader: AssetReaderVariant, settings: &OverlaySettings) -> Self {
        Self::new(reader, &settings.models_dir)
    }

    #[must_use]
    pub fn model_uri(&self, file_name: &str) -> String {
        format!("{}{file_name}", self.models_dir)
    }

    /// Loads the model announced by `entry`. The prefab is named after the
    /// asset id.
    pub async fn load(&self, entry: &ModelEntry) -> Result<Prefab> {
        let uri = self.model_uri(&entry.file_name);
        let bytes = self.reader.read_bytes(&uri).await?;
        let mut prefab = self.decode(&bytes).await?;
        prefab.name = Some(entry.asset_id.clone());
        Ok(prefab)
    }

    #[cfg(feature = "gltf")]
    async fn decode(&self, bytes: &[u8]) -> Result<Prefab> {
        use terra_core::AssetError;

        let gltf = GltfLoader::parse(bytes)?;

        let mut fetched = Vec::new();
        for (index, uri) in GltfLoader::external_buffer_uris(&gltf) {
            if uri.starts_with("data:") {
                return Err(AssetError::Format("data URI buffers are not supported".into()).into());
            }
            fetched.push((index, self.reader.read_bytes(&self.model_uri(&uri)).await?));
        }

        let buffers = GltfLoader::collect_buffers(&gltf, fetched)?;
        GltfLoader::build_prefab(&gltf, &buffers)
    }

    #[cfg(not(feature = "gltf"))]
    #[allow(clippy::unused_async)]
    async fn decode(&self, _bytes: &[u8]) -> Result<Prefab> {
        Err(terra_core::Error::FeatureNotEnabled(
            "glTF decoding is not enabled. Enable it with `features = [\"gltf\"]`".into(),
        ))
    }
}
