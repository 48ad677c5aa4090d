use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::crawler::StorageCrawler;
use super::file::JsonFile;
use super::metadata::{DocumentForest, NodeId};
use super::Result;

/// A crawled catalog: the root directory and the hierarchy found below it.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
    forest: DocumentForest,
}

impl DocumentStore {
    /// Crawls `root`. A missing directory opens as an empty store.
    #[instrument(skip(root), fields(root = %root.as_ref().display()))]
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let forest = StorageCrawler::new(root.clone()).crawl().await?;
        debug!("Opened document store with {} documents", forest.len());
        Ok(DocumentStore { root, forest })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn forest(&self) -> &DocumentForest {
        &self.forest
    }

    /// Absolute location of a node's file.
    pub fn full_path(&self, id: NodeId) -> Result<PathBuf> {
        Ok(self.root.join(self.forest.path(id)?))
    }

    pub fn file(&self, id: NodeId) -> Result<JsonFile> {
        Ok(JsonFile::new(self.full_path(id)?))
    }

    pub async fn read<T: DeserializeOwned>(&self, id: NodeId) -> Result<T> {
        self.file(id)?.read().await
    }
}
