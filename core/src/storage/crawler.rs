use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, instrument, warn};

use super::document::{DocumentFile, DocumentKind};
use super::metadata::{DocumentForest, NodeId};
use super::{Error, Result};

/// Walks a catalog directory and rebuilds the document hierarchy.
#[derive(Debug, Clone)]
pub struct StorageCrawler {
    root: PathBuf,
}

/// The nearest enclosing main document and the directory it lives in.
#[derive(Debug, Clone)]
struct Anchor {
    node: NodeId,
    dir: PathBuf,
}

/// A directory waiting to be visited and the canonical paths of the
/// directories it was reached through.
#[derive(Debug)]
struct Pending {
    dir: PathBuf,
    anchor: Option<Anchor>,
    ancestors: Vec<PathBuf>,
}

/// Directory entries split into document files and subdirectories, each
/// sorted by name.
#[derive(Debug, Default)]
struct Listing {
    mains: Vec<DocumentFile>,
    children: Vec<DocumentFile>,
    subdirs: Vec<PathBuf>,
}

impl StorageCrawler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        StorageCrawler { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Crawls the whole tree below the root.
    ///
    /// A missing root yields an empty forest. Any other I/O error aborts the
    /// crawl. Directories are visited depth-first in name order.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub async fn crawl(&self) -> Result<DocumentForest> {
        let mut forest = DocumentForest::new();
        let mut pending = vec![Pending { dir: self.root.clone(), anchor: None, ancestors: Vec::new() }];

        while let Some(Pending { dir, anchor, mut ancestors }) = pending.pop() {
            let Some(canonical) = canonicalize(&dir).await? else { continue };
            if ancestors.contains(&canonical) {
                warn!("Skipping directory loop at {}", dir.display());
                continue;
            }
            ancestors.push(canonical);

            let listing = list_directory(&dir).await?;
            let anchor_dir = anchor.as_ref().map_or(self.root.as_path(), |a| a.dir.as_path());
            let directories = relative_segments(anchor_dir, &dir)?;
            let parent = anchor.as_ref().map(|a| a.node);

            if listing.mains.is_empty() {
                // Orphans attach to the enclosing main document, if any.
                for doc in &listing.children {
                    forest.insert_under(parent, doc.type_id(), DocumentKind::Child, directories.clone())?;
                }
                for subdir in listing.subdirs.iter().rev() {
                    pending.push(Pending {
                        dir: subdir.clone(),
                        anchor: anchor.clone(),
                        ancestors: ancestors.clone(),
                    });
                }
                continue;
            }

            // Every main document in the directory owns the co-located child
            // documents and everything below.
            let mut mains = Vec::with_capacity(listing.mains.len());
            for doc in &listing.mains {
                let main = forest.insert_under(parent, doc.type_id(), DocumentKind::Main, directories.clone())?;
                for child in &listing.children {
                    forest.insert_under(Some(main), child.type_id(), DocumentKind::Child, Vec::new())?;
                }
                mains.push(main);
            }
            for &main in mains.iter().rev() {
                for subdir in listing.subdirs.iter().rev() {
                    pending.push(Pending {
                        dir: subdir.clone(),
                        anchor: Some(Anchor { node: main, dir: dir.clone() }),
                        ancestors: ancestors.clone(),
                    });
                }
            }
        }

        debug!("Found {} documents", forest.len());
        Ok(forest)
    }
}

async fn list_directory(dir: &Path) -> Result<Listing> {
    let mut read_dir = match fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Directory not found, treating as empty: {}", dir.display());
            return Ok(Listing::default());
        }
        Err(e) => return Err(Error::io("read directory", dir, e)),
    };

    let mut files = Vec::new();
    let mut subdirs = Vec::new();
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| Error::io("read directory", dir, e))?
    {
        let path = entry.path();
        let mut file_type = entry
            .file_type()
            .await
            .map_err(|e| Error::io("inspect", &path, e))?;
        if file_type.is_symlink() {
            file_type = match fs::metadata(&path).await {
                Ok(metadata) => metadata.file_type(),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!("Ignoring dangling link: {}", path.display());
                    continue;
                }
                Err(e) => return Err(Error::io("inspect", &path, e)),
            };
        }

        if file_type.is_dir() {
            subdirs.push(path);
        } else if file_type.is_file() {
            files.push(path);
        }
    }
    files.sort();
    subdirs.sort();

    let mut listing = Listing { subdirs, ..Listing::default() };
    for path in files {
        match DocumentFile::from_path(&path) {
            Some(doc) if doc.kind() == DocumentKind::Main => listing.mains.push(doc),
            Some(doc) => listing.children.push(doc),
            None => debug!("Ignoring non-document file: {}", path.display()),
        }
    }
    Ok(listing)
}

/// `None` when the directory does not exist.
async fn canonicalize(dir: &Path) -> Result<Option<PathBuf>> {
    match fs::canonicalize(dir).await {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Directory not found, treating as empty: {}", dir.display());
            Ok(None)
        }
        Err(e) => Err(Error::io("resolve", dir, e)),
    }
}

/// Directory segments leading from `anchor` down to `dir`.
fn relative_segments(anchor: &Path, dir: &Path) -> Result<Vec<String>> {
    let relative = dir.strip_prefix(anchor).map_err(|_| {
        Error::InvalidPath(format!("{} is not below {}", dir.display(), anchor.display()))
    })?;
    relative
        .components()
        .map(|component| {
            component
                .as_os_str()
                .to_str()
                .map(str::to_owned)
                .ok_or_else(|| Error::InvalidPath(format!("Non UTF-8 directory name in {}", dir.display())))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        fs::write(&path, "{}").await.unwrap();
    }

    fn single_root(forest: &DocumentForest) -> NodeId {
        assert_eq!(forest.roots().len(), 1, "expected exactly one root: {forest:?}");
        forest.roots()[0]
    }

    #[tokio::test]
    async fn missing_root_yields_empty_forest() {
        let dir = tempdir().unwrap();
        let forest = StorageCrawler::new(dir.path().join("missing")).crawl().await.unwrap();
        assert!(forest.is_empty());
    }

    #[tokio::test]
    async fn ignores_files_outside_the_convention() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "readme.md").await;
        touch(dir.path(), "m-.json").await;
        touch(dir.path(), "sub/notes.json").await;
        let forest = StorageCrawler::new(dir.path()).crawl().await.unwrap();
        assert!(forest.is_empty());
    }

    #[tokio::test]
    async fn nests_main_documents_by_directory() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "m-issuer.json").await;
        touch(dir.path(), "romania/m-emission.json").await;
        touch(dir.path(), "romania/al patrulea leu/m-coin.json").await;
        touch(dir.path(), "romania/al patrulea leu/series1/m-banknote.json").await;

        let forest = StorageCrawler::new(dir.path()).crawl().await.unwrap();

        let issuer = single_root(&forest);
        let emission = forest.children(issuer)[0];
        let coin = forest.children(emission)[0];
        let banknote = forest.children(coin)[0];

        assert_eq!(forest.get(emission).unwrap().directories(), &["romania".to_string()]);
        assert_eq!(forest.get(coin).unwrap().directories(), &["al patrulea leu".to_string()]);
        assert_eq!(forest.get(banknote).unwrap().directories(), &["series1".to_string()]);

        let expected: PathBuf = ["romania", "al patrulea leu", "series1", "m-banknote.json"].iter().collect();
        assert_eq!(forest.path(banknote).unwrap(), expected);
    }

    #[tokio::test]
    async fn skip_directories_keep_ancestry() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "m-issuer.json").await;
        touch(dir.path(), "a/b/m-emission.json").await;

        let forest = StorageCrawler::new(dir.path()).crawl().await.unwrap();

        let issuer = single_root(&forest);
        let emission = forest.children(issuer)[0];
        assert_eq!(forest.get(emission).unwrap().directories(), &["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn co_located_child_documents_attach_to_main() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "leu/m-coin.json").await;
        touch(dir.path(), "leu/c-banknote.json").await;

        let forest = StorageCrawler::new(dir.path()).crawl().await.unwrap();

        let coin = single_root(&forest);
        let child = forest.children(coin)[0];
        let node = forest.get(child).unwrap();
        assert_eq!(node.kind(), DocumentKind::Child);
        assert!(node.directories().is_empty());
        assert_eq!(forest.path(child).unwrap(), PathBuf::from("leu").join("c-banknote.json"));
    }

    #[tokio::test]
    async fn orphans_attach_to_nearest_main_document() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "m-issuer.json").await;
        touch(dir.path(), "romania/m-emission.json").await;
        touch(dir.path(), "romania/al patrulea leu/c-coin.json").await;

        let forest = StorageCrawler::new(dir.path()).crawl().await.unwrap();

        let issuer = single_root(&forest);
        let emission = forest.children(issuer)[0];
        let coin = forest.children(emission)[0];
        assert_eq!(forest.get(coin).unwrap().kind(), DocumentKind::Child);
        let expected: PathBuf = ["romania", "al patrulea leu", "c-coin.json"].iter().collect();
        assert_eq!(forest.path(coin).unwrap(), expected);
    }

    #[tokio::test]
    async fn standalone_child_documents_become_roots() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "c-emission.json").await;

        let forest = StorageCrawler::new(dir.path()).crawl().await.unwrap();

        let emission = single_root(&forest);
        assert_eq!(forest.parent(emission), None);
        assert_eq!(forest.path(emission).unwrap(), PathBuf::from("c-emission.json"));
    }

    #[tokio::test]
    async fn sibling_directories_become_siblings() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "m-issuer.json").await;
        touch(dir.path(), "romania/m-emission.json").await;
        touch(dir.path(), "moldova/m-emission.json").await;

        let forest = StorageCrawler::new(dir.path()).crawl().await.unwrap();

        let issuer = single_root(&forest);
        let names: Vec<_> = forest
            .children(issuer)
            .iter()
            .map(|&id| forest.get(id).unwrap().directories().to_vec())
            .collect();
        assert_eq!(names, vec![vec!["moldova".to_string()], vec!["romania".to_string()]]);
    }

    #[tokio::test]
    async fn every_main_document_in_a_directory_gets_the_subtree() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "m-coin.json").await;
        touch(dir.path(), "m-banknote.json").await;
        touch(dir.path(), "c-note.json").await;
        touch(dir.path(), "variant/m-coin.json").await;

        let forest = StorageCrawler::new(dir.path()).crawl().await.unwrap();

        assert_eq!(forest.roots().len(), 2);
        for &root in forest.roots() {
            let kinds: Vec<_> = forest
                .children(root)
                .iter()
                .map(|&id| forest.get(id).unwrap().type_id().to_string())
                .collect();
            assert_eq!(kinds, vec!["note".to_string(), "coin".to_string()]);
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn dangling_links_are_ignored() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "m-issuer.json").await;
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("notes.lnk")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("m-coin.json")).unwrap();

        let forest = StorageCrawler::new(dir.path()).crawl().await.unwrap();

        let issuer = single_root(&forest);
        assert_eq!(forest.get(issuer).unwrap().type_id(), "issuer");
        assert!(forest.children(issuer).is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn linked_directory_loops_are_visited_once() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "m-issuer.json").await;
        touch(dir.path(), "a/m-emission.json").await;
        std::os::unix::fs::symlink(dir.path(), dir.path().join("a").join("back")).unwrap();

        let forest = StorageCrawler::new(dir.path()).crawl().await.unwrap();

        assert_eq!(forest.len(), 2);
        let issuer = single_root(&forest);
        let emission = forest.children(issuer)[0];
        assert!(forest.children(emission).is_empty());
    }
}
