use std::fmt;
use std::path::Path;

use super::{CHILD_DOCUMENT_PREFIX, DOCUMENT_EXTENSION, MAIN_DOCUMENT_PREFIX};

/// Relationship of a document file to the directory it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentKind {
    /// Stored in its own directory, named `m-{type_id}.json`.
    Main,
    /// Co-located with its parent's file, named `c-{type_id}.json`.
    Child,
}

impl DocumentKind {
    pub fn prefix(self) -> &'static str {
        match self {
            DocumentKind::Main => MAIN_DOCUMENT_PREFIX,
            DocumentKind::Child => CHILD_DOCUMENT_PREFIX,
        }
    }
}

/// A file name classified according to the document naming convention.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentFile {
    type_id: String,
    kind: DocumentKind,
}

impl DocumentFile {
    pub fn new(type_id: impl Into<String>, kind: DocumentKind) -> Self {
        DocumentFile { type_id: type_id.into(), kind }
    }

    /// Classifies a bare file name.
    ///
    /// Returns `None` for anything that is not a document: a different
    /// extension, a missing prefix, or nothing left after the prefix.
    /// The `m-` prefix is tried before `c-`; since they differ in their first
    /// character at most one of them can match.
    pub fn parse(file_name: &str) -> Option<Self> {
        let (stem, extension) = file_name.rsplit_once('.')?;
        if !extension.eq_ignore_ascii_case(DOCUMENT_EXTENSION) {
            return None;
        }

        [DocumentKind::Main, DocumentKind::Child]
            .into_iter()
            .find_map(|kind| {
                stem.strip_prefix(kind.prefix())
                    .filter(|type_id| !type_id.is_empty())
                    .map(|type_id| DocumentFile::new(type_id, kind))
            })
    }

    /// Classifies the last component of `path`.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(Self::parse)
    }

    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// The canonical file name, always with a lower-case extension.
    pub fn file_name(&self) -> String {
        format!("{}{}.{}", self.kind.prefix(), self.type_id, DOCUMENT_EXTENSION)
    }
}

impl fmt::Display for DocumentFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}
