//! Asset I/O
//!
//! Byte sources for listings, metadata and geometry. Every reader resolves a
//! relative URI against its own root, so the rest of the crate only ever
//! deals in paths like `models/statue.glb`.
//!
//! Futures returned here are not required to be `Send`: on `wasm32` they are
//! backed by browser promises, and natively they run on a local executor
//! next to the host's draw loop.

use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use terra_core::{AssetError, Error, Result};

/// Asynchronous byte reader rooted at some base location.
pub trait AssetReader {
    fn read_bytes(&self, uri: &str) -> impl Future<Output = Result<Vec<u8>>>;
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

// ============================================================================
// File
// ============================================================================

/// Local filesystem reader.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct FileAssetReader {
    root_path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileAssetReader {
    pub fn new(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.is_file() {
            path.parent()
                .unwrap_or(std::path::Path::new("."))
                .to_path_buf()
        } else {
            path.to_path_buf()
        };
        Self { root_path }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &std::path::Path {
        &self.root_path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl AssetReader for FileAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let path = self.root_path.join(uri.trim_start_matches('/'));
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetError::NotFound(path.display().to_string()).into())
            }
            Err(err) => Err(err.into()),
        }
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// HTTP reader built on `ehttp`.
///
/// An absolute root (`https://host/app/`) is joined with `url`. A relative
/// root is only meaningful in the browser, where `fetch` resolves it against
/// the page; it is prefixed verbatim.
#[cfg(feature = "http")]
#[derive(Debug)]
pub struct HttpAssetReader {
    root: HttpRoot,
}

#[cfg(feature = "http")]
#[derive(Debug)]
enum HttpRoot {
    Absolute(url::Url),
    Relative(String),
}

#[cfg(feature = "http")]
impl HttpAssetReader {
    pub fn new(source: &str) -> Result<Self> {
        let root = if is_remote(source) {
            let mut url = url::Url::parse(source)?;
            if !url.path().ends_with('/') {
                let path = format!("{}/", url.path());
                url.set_path(&path);
            }
            HttpRoot::Absolute(url)
        } else {
            let mut prefix = source.to_string();
            if !prefix.is_empty() && !prefix.ends_with('/') {
                prefix.push('/');
            }
            HttpRoot::Relative(prefix)
        };
        Ok(Self { root })
    }

    /// Full request URL for `uri`.
    pub fn resolve(&self, uri: &str) -> Result<String> {
        let uri = uri.trim_start_matches('/');
        match &self.root {
            HttpRoot::Absolute(base) => Ok(base.join(uri)?.to_string()),
            HttpRoot::Relative(prefix) => Ok(format!("{prefix}{uri}")),
        }
    }
}

#[cfg(feature = "http")]
impl AssetReader for HttpAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let url = self.resolve(uri)?;
        let response = ehttp::fetch_async(ehttp::Request::get(&url))
            .await
            .map_err(|e| AssetError::Network(format!("{url}: {e}")))?;

        match response.status {
            404 => Err(AssetError::NotFound(url).into()),
            _ if response.ok => Ok(response.bytes),
            status => Err(AssetError::Http { uri: url, status }.into()),
        }
    }
}

// ============================================================================
// Memory
// ============================================================================

/// In-process reader serving bytes registered ahead of time.
///
/// Clones share the same storage, so a host can keep inserting after the
/// reader has been handed to the overlay.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetReader {
    files: Arc<RwLock<FxHashMap<String, Arc<[u8]>>>>,
}

impl MemoryAssetReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, uri: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        let uri = uri.into().trim_start_matches('/').to_string();
        self.files.write().insert(uri, bytes.into().into());
    }

    pub fn insert_text(&self, uri: impl Into<String>, text: &str) {
        self.insert(uri, text.as_bytes().to_vec());
    }

    pub fn remove(&self, uri: &str) -> bool {
        self.files
            .write()
            .remove(uri.trim_start_matches('/'))
            .is_some()
    }

    #[must_use]
    pub fn contains(&self, uri: &str) -> bool {
        self.files.read().contains_key(uri.trim_start_matches('/'))
    }
}

impl AssetReader for MemoryAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let key = uri.trim_start_matches('/');
        self.files
            .read()
            .get(key)
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| AssetError::NotFound(key.to_string()).into())
    }
}

// ============================================================================
// Variant
// ============================================================================

/// Reader variants, dispatched statically instead of through a trait object.
#[derive(Clone, Debug)]
pub enum AssetReaderVariant {
    #[cfg(not(target_arch = "wasm32"))]
    File(Arc<FileAssetReader>),
    #[cfg(feature = "http")]
    Http(Arc<HttpAssetReader>),
    Memory(MemoryAssetReader),
}

impl AssetReaderVariant {
    /// Picks a reader for `source`: `http(s)://` selects HTTP, anything else
    /// is a local directory (or, in the browser, a page-relative path).
    pub fn from_source(source: &str) -> Result<Self> {
        if is_remote(source) {
            #[cfg(feature = "http")]
            {
                Ok(Self::Http(Arc::new(HttpAssetReader::new(source)?)))
            }
            #[cfg(not(feature = "http"))]
            {
                Err(Error::FeatureNotEnabled(
                    "HTTP feature is not enabled. Enable it with `features = [\"http\"]`".into(),
                ))
            }
        } else {
            #[cfg(not(target_arch = "wasm32"))]
            {
                Ok(Self::File(Arc::new(FileAssetReader::new(source))))
            }
            #[cfg(all(target_arch = "wasm32", feature = "http"))]
            {
                Ok(Self::Http(Arc::new(HttpAssetReader::new(source)?)))
            }
            #[cfg(all(target_arch = "wasm32", not(feature = "http")))]
            {
                Err(Error::FeatureNotEnabled(
                    "relative asset roots on wasm32 require the `http` feature".into(),
                ))
            }
        }
    }

    pub async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        match self {
            #[cfg(not(target_arch = "wasm32"))]
            Self::File(r) => r.read_bytes(uri).await,
            #[cfg(feature = "http")]
            Self::Http(r) => r.read_bytes(uri).await,
            Self::Memory(r) => r.read_bytes(uri).await,
        }
    }

    /// Reads `uri` and decodes it as UTF-8.
    pub async fn read_text(&self, uri: &str) -> Result<String> {
        let bytes = self.read_bytes(uri).await?;
        String::from_utf8(bytes)
            .map_err(|e| Error::from(AssetError::Format(format!("{uri}: {e}"))))
    }
}

impl From<MemoryAssetReader> for AssetReaderVariant {
    fn from(reader: MemoryAssetReader) -> Self {
        Self::Memory(reader)
    }
}
