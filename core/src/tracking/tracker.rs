use std::collections::BTreeMap;

use tracing::debug;

use super::entry::EntityEntry;
use super::{ChangeEntry, EntityState, Error, Result, Trackable, ensure_id};

/// Snapshot based change tracker, one entry per entity id.
///
/// The tracker owns the tracked entities. Entities marked as deleted are kept
/// until [`accept_changes`](Self::accept_changes) so that their removal can
/// still be persisted.
#[derive(Debug, Clone)]
pub struct ChangeTracker<T: Trackable> {
    entries: BTreeMap<String, EntityEntry<T>>,
}

impl<T: Trackable> Default for ChangeTracker<T> {
    fn default() -> Self {
        ChangeTracker { entries: BTreeMap::new() }
    }
}

impl<T: Trackable> ChangeTracker<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entity loaded from the store as part of the baseline.
    pub fn track(&mut self, entity: T) -> Result<()> {
        let id = entity.id().to_string();
        ensure_id(&id)?;
        if self.entries.contains_key(&id) {
            return Err(Error::DuplicateId(id));
        }
        self.entries.insert(id, EntityEntry::unchanged(entity));
        Ok(())
    }

    /// Records a new entity.
    ///
    /// Adding an id that is currently marked for deletion brings the entity
    /// back as a modification of the stored one.
    pub fn track_add(&mut self, entity: T) -> Result<()> {
        let id = entity.id().to_string();
        ensure_id(&id)?;
        match self.entries.get_mut(&id) {
            None => {
                debug!(id = %id, "Tracking added entity");
                self.entries.insert(id, EntityEntry::added(entity));
                Ok(())
            }
            Some(entry) if entry.recorded_state() == EntityState::Deleted => {
                debug!(id = %id, "Restoring deleted entity");
                entry.restore(entity);
                Ok(())
            }
            Some(_) => Err(Error::DuplicateId(id)),
        }
    }

    /// Replaces a tracked entity with a new value for the same id.
    pub fn track_update(&mut self, entity: T) -> Result<()> {
        let id = entity.id().to_string();
        ensure_id(&id)?;
        match self.entries.get_mut(&id) {
            Some(entry) if entry.recorded_state() != EntityState::Deleted => {
                entry.replace(entity);
                Ok(())
            }
            _ => Err(Error::NotFound(id)),
        }
    }

    /// Marks an entity for deletion.
    ///
    /// An entity that was added but never persisted is simply forgotten and
    /// returned. Removing an entity already marked for deletion does nothing.
    /// Removing an id that is not tracked at all is an error.
    pub fn track_remove(&mut self, id: &str) -> Result<Option<T>> {
        ensure_id(id)?;
        let state = self
            .entries
            .get(id)
            .map(EntityEntry::recorded_state)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        match state {
            EntityState::Added => Ok(self.entries.remove(id).map(EntityEntry::into_entity)),
            EntityState::Deleted => Ok(None),
            EntityState::Unchanged | EntityState::Modified => {
                if let Some(entry) = self.entries.get_mut(id) {
                    entry.mark_deleted();
                }
                debug!(id = %id, "Tracking deleted entity");
                Ok(None)
            }
        }
    }

    /// Compares every entity with its baseline and records the result.
    pub fn detect_changes(&mut self) {
        for entry in self.entries.values_mut() {
            entry.detect_changes();
        }
    }

    /// All pending changes, in id order. Runs detection first.
    pub fn changes(&mut self) -> Vec<ChangeEntry<'_, T>> {
        self.detect_changes();
        self.entries
            .values()
            .filter(|entry| entry.recorded_state() != EntityState::Unchanged)
            .map(|entry| ChangeEntry { entity: entry.entity(), state: entry.recorded_state() })
            .collect()
    }

    /// Makes the current state the new baseline: deleted entities are dropped,
    /// everything else becomes unchanged with a fresh snapshot.
    pub fn accept_changes(&mut self) {
        self.entries.retain(|_, entry| entry.recorded_state() != EntityState::Deleted);
        for entry in self.entries.values_mut() {
            entry.accept();
        }
    }

    pub fn has_changes(&self) -> bool {
        self.entries.values().any(|entry| entry.state() != EntityState::Unchanged)
    }

    pub fn state(&self, id: &str) -> Option<EntityState> {
        self.entries.get(id).map(EntityEntry::state)
    }

    pub fn entry(&self, id: &str) -> Option<&EntityEntry<T>> {
        self.entries.get(id)
    }

    /// A live (not deleted) entity.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries
            .get(id)
            .filter(|entry| entry.recorded_state() != EntityState::Deleted)
            .map(EntityEntry::entity)
    }

    /// Mutable access to a live entity. Modifications are picked up by the
    /// next detection.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.entries
            .get_mut(id)
            .filter(|entry| entry.recorded_state() != EntityState::Deleted)
            .map(EntityEntry::entity_mut)
    }

    /// Live entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries
            .values()
            .filter(|entry| entry.recorded_state() != EntityState::Deleted)
            .map(EntityEntry::entity)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of tracked entries, including those marked for deletion.
    pub fn tracked_len(&self) -> usize {
        self.entries.len()
    }
}
