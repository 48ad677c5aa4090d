//! The coin and banknote catalog built on top of the document store.
//!
//! Opening a [`CatalogContext`] crawls the catalog directory, reads every
//! issuer, emission and artifact document and tracks the issuers as an
//! unchanged baseline. Use cases work through a [`UnitOfWork`] and its
//! repositories; [`UnitOfWork::save_changes`] writes the pending changes back
//! one document at a time.

pub use self::context::{CatalogContext, Persisters};
pub use self::loader::{BANKNOTE_TYPE_ID, COIN_TYPE_ID, EMISSION_TYPE_ID, ISSUER_TYPE_ID, load_issuers};
pub use self::model::{Artifact, ArtifactKind, Emission, Issuer, IssuerSnapshot, Picture};
pub use self::persister::{EntityPersister, IssuerPersister};
pub use self::records::{
    ArtifactFields, BanknoteRecord, CoinRecord, EmissionRecord, IssuerRecord, PictureRecord,
};
pub use self::repository::{EmissionRepository, IssuerRepository};
pub use self::unit_of_work::UnitOfWork;

mod context;
mod loader;
mod mapping;
mod model;
mod persister;
mod records;
mod repository;
mod unit_of_work;

use thiserror::Error;

use crate::{storage, tracking};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] storage::Error),

    #[error(transparent)]
    Tracking(#[from] tracking::Error),

    #[error("Failed to save changes to data store")]
    Persistence(#[source] storage::Error),

    #[error("Saving was cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;
