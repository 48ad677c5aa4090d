use super::{EntityState, Trackable};

/// Tracking record of one entity: its current value, its lifecycle state and
/// the snapshot of the last accepted baseline.
#[derive(Debug, Clone)]
pub struct EntityEntry<T: Trackable> {
    entity: T,
    state: EntityState,
    original: Option<T::Snapshot>,
}

impl<T: Trackable> EntityEntry<T> {
    pub(crate) fn unchanged(entity: T) -> Self {
        let original = Some(entity.snapshot());
        EntityEntry { entity, state: EntityState::Unchanged, original }
    }

    pub(crate) fn added(entity: T) -> Self {
        EntityEntry { entity, state: EntityState::Added, original: None }
    }

    pub fn entity(&self) -> &T {
        &self.entity
    }

    pub(crate) fn entity_mut(&mut self) -> &mut T {
        &mut self.entity
    }

    pub(crate) fn into_entity(self) -> T {
        self.entity
    }

    /// Recorded state, as of the last detection.
    pub fn recorded_state(&self) -> EntityState {
        self.state
    }

    /// State including modifications not yet detected.
    pub fn state(&self) -> EntityState {
        match (self.state, &self.original) {
            (EntityState::Unchanged | EntityState::Modified, Some(original)) => {
                if self.entity.snapshot() != *original {
                    EntityState::Modified
                } else {
                    EntityState::Unchanged
                }
            }
            (state, _) => state,
        }
    }

    pub(crate) fn detect_changes(&mut self) {
        self.state = self.state();
    }

    /// Replaces the value, keeping the baseline.
    pub(crate) fn replace(&mut self, entity: T) {
        self.entity = entity;
        self.detect_changes();
    }

    /// Brings back an entity that was marked for deletion. Since the id still
    /// exists in the store, this is a modification.
    pub(crate) fn restore(&mut self, entity: T) {
        self.entity = entity;
        self.state = EntityState::Modified;
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.state = EntityState::Deleted;
    }

    /// Makes the current value the new baseline.
    pub(crate) fn accept(&mut self) {
        self.original = Some(self.entity.snapshot());
        self.state = EntityState::Unchanged;
    }
}
