use async_trait::async_trait;
use tracing::{debug, instrument};

use super::model::Issuer;
use super::records::IssuerRecord;
use crate::storage::{JsonFile, Result};

/// Writes the tracked changes of one entity type back to the store.
#[async_trait]
pub trait EntityPersister<T: Sync>: Send + Sync {
    async fn persist_added(&self, entity: &T) -> Result<()>;

    async fn persist_modified(&self, entity: &T) -> Result<()>;

    /// Removes the entity's document. A document that is already gone is not
    /// an error.
    async fn persist_deleted(&self, entity: &T) -> Result<()>;
}

/// Stores each issuer in the file named by its id.
#[derive(Debug, Clone, Copy, Default)]
pub struct IssuerPersister;

#[async_trait]
impl EntityPersister<Issuer> for IssuerPersister {
    #[instrument(skip(self, entity), fields(id = %entity.id()))]
    async fn persist_added(&self, entity: &Issuer) -> Result<()> {
        JsonFile::new(entity.id()).write(&IssuerRecord::from(entity)).await
    }

    #[instrument(skip(self, entity), fields(id = %entity.id()))]
    async fn persist_modified(&self, entity: &Issuer) -> Result<()> {
        JsonFile::new(entity.id()).write(&IssuerRecord::from(entity)).await
    }

    #[instrument(skip(self, entity), fields(id = %entity.id()))]
    async fn persist_deleted(&self, entity: &Issuer) -> Result<()> {
        if !JsonFile::new(entity.id()).delete_if_exists().await? {
            debug!("Issuer document was already gone");
        }
        Ok(())
    }
}
