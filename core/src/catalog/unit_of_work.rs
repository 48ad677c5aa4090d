use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::context::CatalogContext;
use super::repository::{EmissionRepository, IssuerRepository};
use super::Result;

/// Entry point for use cases: load a catalog, change it through the
/// repositories, then save everything at once.
pub struct UnitOfWork {
    context: CatalogContext,
}

impl UnitOfWork {
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        Ok(UnitOfWork { context: CatalogContext::open(root).await? })
    }

    pub fn from_context(context: CatalogContext) -> Self {
        UnitOfWork { context }
    }

    pub fn issuers(&mut self) -> IssuerRepository<'_> {
        IssuerRepository::new(&mut self.context)
    }

    pub fn emissions(&self) -> EmissionRepository<'_> {
        EmissionRepository::new(&self.context)
    }

    pub fn context(&self) -> &CatalogContext {
        &self.context
    }

    pub fn has_changes(&self) -> bool {
        self.context.has_changes()
    }

    pub async fn save_changes(&mut self) -> Result<()> {
        self.context.commit().await
    }

    pub async fn save_changes_with(&mut self, cancel: &CancellationToken) -> Result<()> {
        self.context.commit_with(cancel).await
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        if self.context.has_changes() {
            warn!(
                root = %self.context.root().display(),
                "Unit of work dropped with unsaved changes"
            );
        }
    }
}
