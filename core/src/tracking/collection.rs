use super::tracker::ChangeTracker;
use super::{ChangeEntry, EntityState, Result, Trackable};

/// The set of entities of one type held by a catalog session.
///
/// Every mutation goes through the embedded [`ChangeTracker`], so the
/// collection can always report what has to be written back.
#[derive(Debug, Clone)]
pub struct ObservableEntityCollection<T: Trackable> {
    tracker: ChangeTracker<T>,
}

impl<T: Trackable> Default for ObservableEntityCollection<T> {
    fn default() -> Self {
        ObservableEntityCollection { tracker: ChangeTracker::new() }
    }
}

impl<T: Trackable> ObservableEntityCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents with entities loaded from the store. They become
    /// the unchanged baseline.
    pub fn initialize_with(&mut self, entities: impl IntoIterator<Item = T>) -> Result<()> {
        self.tracker.clear();
        for entity in entities {
            self.tracker.track(entity)?;
        }
        Ok(())
    }

    pub fn add(&mut self, entity: T) -> Result<()> {
        self.tracker.track_add(entity)
    }

    pub fn update(&mut self, entity: T) -> Result<()> {
        self.tracker.track_update(entity)
    }

    pub fn remove(&mut self, id: &str) -> Result<Option<T>> {
        self.tracker.track_remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.tracker.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.tracker.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.tracker.iter()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn state(&self, id: &str) -> Option<EntityState> {
        self.tracker.state(id)
    }

    pub fn changes(&mut self) -> Vec<ChangeEntry<'_, T>> {
        self.tracker.changes()
    }

    pub fn has_changes(&self) -> bool {
        self.tracker.has_changes()
    }

    pub fn accept_changes(&mut self) {
        self.tracker.accept_changes();
    }

    pub fn tracker(&self) -> &ChangeTracker<T> {
        &self.tracker
    }
}
