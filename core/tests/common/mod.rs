#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};
use tokio::fs;

/// A catalog directory that disappears with the test.
pub struct TemporaryCatalog {
    dir: TempDir,
}

impl TemporaryCatalog {
    pub fn new() -> Self {
        TemporaryCatalog { dir: tempdir().expect("Test helper: Failed to create temp dir") }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `m-{type_id}.json` into `subdir` (relative to the root).
    pub async fn main_document(&self, type_id: &str, subdir: &str, json: &str) -> PathBuf {
        self.write(subdir, &format!("m-{type_id}.json"), json).await
    }

    /// Writes `c-{type_id}.json` into `subdir` (relative to the root).
    pub async fn child_document(&self, type_id: &str, subdir: &str, json: &str) -> PathBuf {
        self.write(subdir, &format!("c-{type_id}.json"), json).await
    }

    pub async fn write(&self, subdir: &str, file_name: &str, content: &str) -> PathBuf {
        let dir = self.resolve(subdir);
        fs::create_dir_all(&dir).await.expect("Test helper: Failed to create dir");
        let path = dir.join(file_name);
        fs::write(&path, content).await.expect("Test helper: Failed to write file");
        path
    }

    fn resolve(&self, subdir: &str) -> PathBuf {
        subdir
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root().to_path_buf(), |path, segment| path.join(segment))
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
