use futures::future::LocalBoxFuture;
use terra_core::{AssetError, Error, Result};

use crate::io::AssetReaderVariant;

/// One model file announced by a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelEntry {
    /// File name as listed, e.g. `statue.glb`.
    pub file_name: String,
    /// File name without its model extension, e.g. `statue`.
    pub asset_id: String,
}

impl ModelEntry {
    /// Derives the asset id by stripping the first matching extension
    /// (compared case-insensitively). Unrecognized names keep their full
    /// file name as id.
    pub fn from_file_name<S: AsRef<str>>(file_name: &str, extensions: &[S]) -> Self {
        let asset_id = extensions
            .iter()
            .find_map(|ext| strip_extension(file_name, ext.as_ref()))
            .unwrap_or(file_name)
            .to_string();

        Self {
            file_name: file_name.to_string(),
            asset_id,
        }
    }
}

fn strip_extension<'a>(file_name: &'a str, extension: &str) -> Option<&'a str> {
    let extension = extension.trim_start_matches('.');
    let split = file_name.len().checked_sub(extension.len() + 1)?;
    if !file_name.is_char_boundary(split) {
        return None;
    }
    let (stem, suffix) = file_name.split_at(split);
    let suffix = suffix.strip_prefix('.')?;
    (!stem.is_empty() && suffix.eq_ignore_ascii_case(extension)).then_some(stem)
}

/// Source of the model files the overlay should place.
pub trait AssetListing {
    fn list(&self) -> LocalBoxFuture<'_, Result<Vec<ModelEntry>>>;
}

/// Listing backed by a JSON array of file names, e.g. `["statue.glb"]`.
#[derive(Debug, Clone)]
pub struct JsonListing {
    reader: AssetReaderVariant,
    uri: String,
    extensions: Vec<String>,
}

impl JsonListing {
    pub fn new(reader: AssetReaderVariant, uri: impl Into<String>, extensions: Vec<String>) -> Self {
        Self {
            reader,
            uri: uri.into(),
            extensions,
        }
    }

    /// Parses a listing document. Non-string entries are ignored.
    pub fn parse(&self, json: &str) -> Result<Vec<ModelEntry>> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Array(items) = value else {
            return Err(Error::from(AssetError::Format(format!(
                "{}: expected a JSON array of file names",
                self.uri
            ))));
        };

        Ok(items
            .iter()
            .filter_map(serde_json::Value::as_str)
            .map(|name| ModelEntry::from_file_name(name, self.extensions.as_slice()))
            .collect())
    }
}

impl AssetListing for JsonListing {
    fn list(&self) -> LocalBoxFuture<'_, Result<Vec<ModelEntry>>> {
        Box::pin(async move {
            let text = self.reader.read_text(&self.uri).await?;
            let entries = self.parse(&text)?;
            log::debug!("Listing {} announced {} model(s)", self.uri, entries.len());
            Ok(entries)
        })
    }
}

/// Fixed in-process listing.
#[derive(Debug, Clone, Default)]
pub struct StaticListing {
    entries: Vec<ModelEntry>,
}

impl StaticListing {
    pub fn new<N: AsRef<str>, E: AsRef<str>>(file_names: &[N], extensions: &[E]) -> Self {
        Self {
            entries: file_names
                .iter()
                .map(|name| ModelEntry::from_file_name(name.as_ref(), extensions))
                .collect(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[ModelEntry] {
        &self.entries
    }
}

impl AssetListing for StaticListing {
    fn list(&self) -> LocalBoxFuture<'_, Result<Vec<ModelEntry>>> {
        let entries = self.entries.clone();
        Box::pin(async move { Ok(entries) })
    }
}
