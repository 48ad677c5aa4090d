use tracing::debug;

use super::context::CatalogContext;
use super::model::{Emission, Issuer};
use super::Result;
use crate::tracking::{self, ensure_id};

/// Query and mutation surface over the issuers of a [`CatalogContext`].
///
/// Mutations are only recorded; nothing is written until the context is
/// committed.
pub struct IssuerRepository<'a> {
    context: &'a mut CatalogContext,
}

impl<'a> IssuerRepository<'a> {
    pub fn new(context: &'a mut CatalogContext) -> Self {
        IssuerRepository { context }
    }

    pub fn get_all(&self) -> Vec<&Issuer> {
        self.context.issuers().iter().collect()
    }

    /// Issuers whose name contains `name`, ignoring case. An empty query
    /// matches nothing.
    pub fn get_by_name(&self, name: &str) -> Vec<&Issuer> {
        if name.is_empty() {
            return Vec::new();
        }
        let needle = name.to_lowercase();
        self.context
            .issuers()
            .iter()
            .filter(|issuer| {
                issuer
                    .name
                    .as_deref()
                    .is_some_and(|candidate| candidate.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Issuer> {
        if id.is_empty() {
            return None;
        }
        self.context.issuers().get(id)
    }

    pub fn add(&mut self, issuer: Issuer) -> Result<()> {
        debug!(id = %issuer.id(), "Adding issuer");
        self.context.issuers_mut().add(issuer)?;
        Ok(())
    }

    /// Copies the editable fields of `issuer` onto the tracked issuer with
    /// the same id.
    pub fn update(&mut self, issuer: &Issuer) -> Result<()> {
        ensure_id(issuer.id())?;
        let existing = self
            .context
            .issuers_mut()
            .get_mut(issuer.id())
            .ok_or_else(|| tracking::Error::NotFound(issuer.id().to_string()))?;

        existing.name = issuer.name.clone();
        existing.comments = issuer.comments.clone();
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<()> {
        debug!(id = %id, "Removing issuer");
        self.context.issuers_mut().remove(id)?;
        Ok(())
    }
}

/// Read-only access to the emissions of every loaded issuer.
pub struct EmissionRepository<'a> {
    context: &'a CatalogContext,
}

impl<'a> EmissionRepository<'a> {
    pub fn new(context: &'a CatalogContext) -> Self {
        EmissionRepository { context }
    }

    pub fn get_all(&self) -> Vec<&'a Emission> {
        self.context
            .issuers()
            .iter()
            .flat_map(|issuer| issuer.emissions.iter())
            .collect()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&'a Emission> {
        if id.is_empty() {
            return None;
        }
        self.get_all().into_iter().find(|emission| emission.id == id)
    }

    /// Emissions overlapping the given period, see [`Emission::is_between`].
    pub fn get_between(&self, start_year: Option<i32>, end_year: Option<i32>) -> Vec<&'a Emission> {
        self.get_all()
            .into_iter()
            .filter(|emission| emission.is_between(start_year, end_year))
            .collect()
    }
}
