use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::{debug, instrument};

use crate::storage::{Error, Result};

/// A single JSON record on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and deserializes the whole file. Unknown fields are ignored by
    /// the record types themselves.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn read<T: DeserializeOwned>(&self) -> Result<T> {
        let content = fs::read(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(self.path.clone())
            } else {
                Error::io("read", &self.path, e)
            }
        })?;
        serde_json::from_slice(&content).map_err(|source| Error::MalformedDocument {
            path: self.path.clone(),
            source,
        })
    }

    /// Serializes `value` and replaces the file, creating missing parent
    /// directories.
    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    pub async fn write<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(value).map_err(|source| Error::Serialization {
            path: self.path.clone(),
            source,
        })?;

        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| Error::io("create directory", dir, e))?;
        }
        fs::write(&self.path, content)
            .await
            .map_err(|e| Error::io("write", &self.path, e))?;
        debug!("Document written");
        Ok(())
    }

    pub async fn exists(&self) -> Result<bool> {
        fs::try_exists(&self.path)
            .await
            .map_err(|e| Error::io("check", &self.path, e))
    }

    /// Removes the file. Returns `false` when there was nothing to remove.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn delete_if_exists(&self) -> Result<bool> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Document deleted");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::io("delete", &self.path, e)),
        }
    }
}
