use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use super::loader::load_issuers;
use super::model::Issuer;
use super::persister::{EntityPersister, IssuerPersister};
use super::{Error, Result};
use crate::storage::DocumentStore;
use crate::tracking::{ChangeEntry, EntityState, ObservableEntityCollection, Trackable};

/// One persister per entity collection held by [`CatalogContext`].
pub struct Persisters {
    pub issuers: Box<dyn EntityPersister<Issuer>>,
}

impl Default for Persisters {
    fn default() -> Self {
        Persisters { issuers: Box::new(IssuerPersister) }
    }
}

/// An open catalog session: the loaded entities and their pending changes.
pub struct CatalogContext {
    root: PathBuf,
    issuers: ObservableEntityCollection<Issuer>,
    persisters: Persisters,
}

impl CatalogContext {
    /// Crawls the catalog at `root` and loads every entity as the unchanged
    /// baseline. A missing directory opens as an empty catalog.
    #[instrument(skip(root), fields(root = %root.as_ref().display()))]
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let store = DocumentStore::open(root.as_ref()).await?;
        let issuers = load_issuers(&store).await?;

        let mut collection = ObservableEntityCollection::new();
        collection.initialize_with(issuers)?;
        info!("Opened catalog with {} issuers", collection.len());

        Ok(CatalogContext {
            root: store.root().to_path_buf(),
            issuers: collection,
            persisters: Persisters::default(),
        })
    }

    pub fn with_persisters(mut self, persisters: Persisters) -> Self {
        self.persisters = persisters;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn issuers(&self) -> &ObservableEntityCollection<Issuer> {
        &self.issuers
    }

    pub fn issuers_mut(&mut self) -> &mut ObservableEntityCollection<Issuer> {
        &mut self.issuers
    }

    pub fn has_changes(&self) -> bool {
        self.issuers.has_changes()
    }

    pub async fn commit(&mut self) -> Result<()> {
        self.commit_with(&CancellationToken::new()).await
    }

    /// Writes every pending change, then makes the result the new baseline.
    ///
    /// Changes are written one at a time and `cancel` is checked before each
    /// of them. On failure or cancellation the files already written stay in
    /// place and the pending changes are kept, so the commit can be retried.
    #[instrument(skip(self, cancel), fields(root = %self.root.display()))]
    pub async fn commit_with(&mut self, cancel: &CancellationToken) -> Result<()> {
        let changes = self.issuers.changes();
        let written = persist_changes(self.persisters.issuers.as_ref(), changes, cancel).await?;
        self.issuers.accept_changes();

        debug!("Committed {} changes", written);
        Ok(())
    }
}

async fn persist_changes<T>(
    persister: &dyn EntityPersister<T>,
    changes: Vec<ChangeEntry<'_, T>>,
    cancel: &CancellationToken,
) -> Result<usize>
where
    T: Trackable + Sync,
{
    let mut written = 0;
    for change in changes {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        debug!(id = %change.entity.id(), state = ?change.state, "Persisting change");
        let result = match change.state {
            EntityState::Added => persister.persist_added(change.entity).await,
            EntityState::Modified => persister.persist_modified(change.entity).await,
            EntityState::Deleted => persister.persist_deleted(change.entity).await,
            EntityState::Unchanged => continue,
        };
        result.map_err(Error::Persistence)?;
        written += 1;
    }
    Ok(written)
}
