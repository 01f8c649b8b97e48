//! Local filesystem storage for uploaded payloads
//!
//! Payloads are written under a single upload directory using generated
//! names (`<uuid-v4>.<ext>`), never the client-supplied filename.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::config::StorageConfig;
use crate::core::error::AppError;

/// Longest extension carried over from the original filename
const MAX_EXTENSION_LEN: usize = 16;

/// A payload that has been written and synced to disk
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Generated storage name
    pub name: String,
    /// Full path of the payload
    pub path: PathBuf,
    /// Bytes written
    pub size: u64,
}

/// Upload-directory backed storage
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Create the storage and make sure the upload directory exists
    pub async fn new(config: StorageConfig) -> Result<Self, AppError> {
        let storage = Self {
            root: config.upload_dir,
        };
        storage.ensure_dir_exists().await?;

        info!(
            "Local storage initialized at: {}",
            storage.root().display()
        );

        Ok(storage)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the upload directory (and parents) if missing
    pub async fn ensure_dir_exists(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Generate a collision-resistant storage name keeping the original extension
    ///
    /// Only the extension of the final path component is kept, and only when it
    /// is short ASCII-alphanumeric, so nothing from the client name can steer the
    /// on-disk location.
    pub fn generate_name(original_filename: &str) -> String {
        let id = Uuid::new_v4();
        match safe_extension(original_filename) {
            Some(ext) => format!("{}.{}", id, ext),
            None => id.to_string(),
        }
    }

    /// Write `data` under a freshly generated name and sync it to disk
    pub async fn store(&self, original_filename: &str, data: &[u8]) -> Result<StoredObject, AppError> {
        let name = Self::generate_name(original_filename);
        let path = self.root.join(&name);

        // create_new: a generated name must never replace an existing payload
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        file.write_all(data).await?;
        file.sync_all().await?;

        debug!("Payload written: {} ({} bytes)", path.display(), data.len());

        Ok(StoredObject {
            name,
            path,
            size: data.len() as u64,
        })
    }

    /// Remove a payload; an already-absent file counts as removed
    pub async fn remove(&self, path: &Path) -> Result<(), AppError> {
        match fs::remove_file(path).await {
            Ok(()) => {
                debug!("Payload removed: {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Payload already absent: {}", path.display());
                Ok(())
            }
            Err(e) => Err(AppError::Storage(e)),
        }
    }
}

fn safe_extension(original_filename: &str) -> Option<String> {
    // Client names may use either separator
    let file_name = original_filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_filename);

    let ext = Path::new(file_name).extension()?.to_str()?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }

    Some(ext.to_string())
}
