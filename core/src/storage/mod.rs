//! File-backed hierarchical document store.
//!
//! A catalog is a plain directory tree. Every catalog entry is a JSON document
//! whose file name encodes its type and its relationship to the surrounding
//! documents. This module discovers those documents, rebuilds the hierarchy
//! implied by directory nesting, and reads and writes individual records.
//!
//! # File Naming Conventions
//!
//! A document file is named `{prefix}{type_id}.json`:
//!
//! *   **Main documents** use the prefix `m-` and live in their own directory
//!     (e.g. `romania/m-emission.json`).
//! *   **Child documents** use the prefix `c-` and sit next to the main document
//!     they belong to (e.g. `romania/leu/c-banknote.json` next to `m-coin.json`).
//!
//! The extension is matched case-insensitively, the prefix case-sensitively.
//! Files that do not follow the convention are ignored by the crawler.
//!
//! # Hierarchy
//!
//! *   A main document becomes a node whose parent is the nearest main document
//!     found in an enclosing directory, or a root node when there is none.
//! *   Child documents in the same directory become children of every main
//!     document in that directory.
//! *   Child documents in a directory without a main document attach to the
//!     nearest enclosing main document ("orphan attachment"), or become
//!     standalone roots when there is none.
//!
//! Each node records only the directory segments between its anchor (its
//! parent's directory, or the catalog root) and its own directory. The full
//! path of a document is rebuilt from the chain of ancestors, see
//! [`DocumentForest::path`].
//!
//! # Asynchronous API
//!
//! All filesystem I/O is `async` and runs on the `tokio` runtime. Failures are
//! reported through [`Error`], which carries the operation and path involved.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use bani_core::storage::DocumentStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::open("/data/catalog").await?;
//!     for id in store.forest().roots() {
//!         println!("{}", store.full_path(*id)?.display());
//!     }
//!     Ok(())
//! }
//! ```

pub use self::crawler::StorageCrawler;
pub use self::document::{DocumentFile, DocumentKind};
pub use self::file::JsonFile;
pub use self::merge::{Flattened, Merge, flatten, flatten_within};
pub use self::metadata::{DocumentForest, DocumentMetadata, NodeId};
pub use self::store::DocumentStore;

pub(crate) use self::merge::merge_options;

mod crawler;
mod document;
mod file;
mod merge;
mod metadata;
mod store;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MAIN_DOCUMENT_PREFIX: &str = "m-";
pub const CHILD_DOCUMENT_PREFIX: &str = "c-";
pub const DOCUMENT_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to {operation} {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Malformed document {}: {source}", path.display())]
    MalformedDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize document {}: {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Unknown document node: {0}")]
    UnknownNode(NodeId),

    #[error("Cannot move node {node} below its own descendant {parent}")]
    CyclicParent { node: NodeId, parent: NodeId },
}

impl Error {
    pub(crate) fn io(operation: &'static str, path: &Path, source: std::io::Error) -> Self {
        Error::Io { operation, path: path.to_path_buf(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
