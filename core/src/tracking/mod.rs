//! In-memory change tracking for catalog entities.
//!
//! Entities are loaded once, recorded as an unchanged baseline, and then
//! mutated freely. The [`ChangeTracker`] works out which entities were added,
//! modified or deleted since the last accepted baseline by comparing each
//! entity with a snapshot taken when the baseline was recorded.
//!
//! Snapshots are produced by the entity itself through [`Trackable`]. They
//! only cover what the entity chooses to expose: a field left out of the
//! snapshot is never reported as a modification.

pub use self::collection::ObservableEntityCollection;
pub use self::entry::EntityEntry;
pub use self::tracker::ChangeTracker;

mod collection;
mod entry;
mod tracker;

use std::fmt;
use thiserror::Error;

/// An entity whose changes can be tracked.
pub trait Trackable {
    /// Value compared against the baseline to detect modifications.
    type Snapshot: Clone + PartialEq + fmt::Debug;

    /// Stable identity of the entity. Must not be empty.
    fn id(&self) -> &str;

    fn snapshot(&self) -> Self::Snapshot;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityState {
    Unchanged,
    Added,
    Modified,
    Deleted,
}

/// A pending change reported by [`ChangeTracker::changes`].
#[derive(Debug)]
pub struct ChangeEntry<'a, T> {
    pub entity: &'a T,
    pub state: EntityState,
}

// Manual impls avoid requiring `T: Clone`.
impl<T> Clone for ChangeEntry<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ChangeEntry<'_, T> {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Entity '{0}' not found")]
    NotFound(String),

    #[error("Entity '{0}' already exists")]
    DuplicateId(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn ensure_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::InvalidArgument("entity id cannot be empty".to_string()));
    }
    Ok(())
}
