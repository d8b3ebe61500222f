//! Environment/runtime helpers
//!
//! Sanity checks run once at startup, before the repository is opened.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the directory holding the document file exists.
///
/// `storage_path` is the file itself; only its parent is created.
pub async fn ensure_data_dir(storage_path: &str) -> anyhow::Result<()> {
    let Some(parent) = Path::new(storage_path).parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    if tokio::fs::metadata(parent).await.is_err() {
        warn!(dir = %parent.display(), "data directory not found; creating it");
    }
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    info!(dir = %parent.display(), "data directory ready");
    Ok(())
}
