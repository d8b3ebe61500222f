use std::{collections::BTreeMap, path::{Path, PathBuf}, sync::Arc};
use tokio::{fs, sync::RwLock};
use tracing::debug;

use crate::errors::ServiceError;

/// JSON file-backed document collection.
///
/// Holds every document in memory keyed by id and rewrites the whole file
/// after each mutation. Writes go to a sibling temp file which is then
/// renamed over the target, so a reader never sees a half-written file.
/// Mutations are serialized by the inner lock, which makes each single
/// `upsert`/`remove` atomic; there is no multi-document transaction.
pub struct JsonMapStore<V> {
    inner: RwLock<BTreeMap<String, V>>,
    file_path: PathBuf,
}

impl<V> JsonMapStore<V>
where
    V: serde::Serialize + serde::de::DeserializeOwned + Clone + Send + Sync,
{
    /// Open the collection at `path`, creating an empty file if missing.
    /// The parent directory must already exist.
    /// A file that exists but does not parse is an error, never silently reset.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();

        let map = match fs::read(&file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::Repository(format!("corrupt document file {}: {e}", file_path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty = BTreeMap::new();
                write_atomic(&file_path, &empty).await?;
                empty
            }
            Err(e) => return Err(ServiceError::repository(e)),
        };
        debug!(path = %file_path.display(), documents = map.len(), "document store opened");

        Ok(Arc::new(Self { inner: RwLock::new(map), file_path }))
    }

    /// All documents, ordered by id.
    pub async fn list(&self) -> Vec<V> {
        self.inner.read().await.values().cloned().collect()
    }

    pub async fn get(&self, id: &str) -> Option<V> {
        self.inner.read().await.get(id).cloned()
    }

    /// Insert or fully replace the document stored under `id`, then persist.
    pub async fn upsert(&self, id: String, doc: V) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        let previous = map.insert(id.clone(), doc);
        if let Err(e) = write_atomic(&self.file_path, &*map).await {
            match previous {
                Some(old) => map.insert(id, old),
                None => map.remove(&id),
            };
            return Err(e);
        }
        Ok(())
    }

    /// Remove a document and persist; returns whether it existed.
    pub async fn remove(&self, id: &str) -> Result<bool, ServiceError> {
        let mut map = self.inner.write().await;
        let Some(old) = map.remove(id) else {
            return Ok(false);
        };
        if let Err(e) = write_atomic(&self.file_path, &*map).await {
            map.insert(id.to_string(), old);
            return Err(e);
        }
        Ok(true)
    }
}

async fn write_atomic<V: serde::Serialize>(path: &Path, map: &BTreeMap<String, V>) -> Result<(), ServiceError> {
    let data = serde_json::to_vec_pretty(map).map_err(ServiceError::repository)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data).await.map_err(ServiceError::repository)?;
    fs::rename(&tmp, path).await.map_err(ServiceError::repository)?;
    Ok(())
}
