use chrono::NaiveDateTime;

use crate::tracking::Trackable;

/// An authority issuing money, e.g. a country or a central bank.
///
/// The id is the path of the issuer's `m-issuer.json` file.
#[derive(Debug, Clone, PartialEq)]
pub struct Issuer {
    id: String,
    pub name: Option<String>,
    pub comments: Option<String>,
    pub emissions: Vec<Emission>,
}

impl Issuer {
    pub fn new(id: impl Into<String>) -> Self {
        Issuer { id: id.into(), name: None, comments: None, emissions: Vec::new() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn artifact_count(&self) -> usize {
        self.emissions.iter().map(|emission| emission.artifacts.len()).sum()
    }
}

/// Fields of an [`Issuer`] that are written back to its document.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuerSnapshot {
    pub name: Option<String>,
    pub comments: Option<String>,
}

// Emissions are loaded from their own documents and are not part of the
// snapshot. Editing them in place is not reported as a change.
impl Trackable for Issuer {
    type Snapshot = IssuerSnapshot;

    fn id(&self) -> &str {
        &self.id
    }

    fn snapshot(&self) -> IssuerSnapshot {
        IssuerSnapshot { name: self.name.clone(), comments: self.comments.clone() }
    }
}

/// A series of coins and banknotes put in circulation over a period of time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Emission {
    pub id: String,
    pub name: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub comments: Option<String>,
    pub artifacts: Vec<Artifact>,
}

impl Emission {
    /// Whether the emission's period overlaps the requested range. Missing
    /// bounds on either side are open.
    pub fn is_between(&self, start_year: Option<i32>, end_year: Option<i32>) -> bool {
        let starts_in_time = match (self.start_year, end_year) {
            (Some(own_start), Some(end)) => own_start <= end,
            _ => true,
        };
        let ends_in_time = match (self.end_year, start_year) {
            (Some(own_end), Some(start)) => own_end >= start,
            _ => true,
        };
        starts_in_time && ends_in_time
    }

    pub fn contains_year(&self, year: i32) -> bool {
        self.start_year.is_none_or(|start| year >= start) && self.end_year.is_none_or(|end| year <= end)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Picture {
    pub file_path: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactKind {
    Coin {
        diameter: Option<f32>,
        edge: Option<String>,
    },
    Banknote {
        width: Option<f32>,
        height: Option<f32>,
        embossing: Option<bool>,
    },
}

/// A coin or banknote as it appears in the catalog, after inheritance from
/// the enclosing documents has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    /// Path of the most specific document describing the artifact.
    pub id: String,
    pub display_name: Option<String>,
    pub value: Option<f32>,
    pub unit: Option<String>,
    pub substance: Option<String>,
    pub color: Option<String>,
    pub issue_date: Option<NaiveDateTime>,
    /// Mint year for coins, print year for banknotes.
    pub year: Option<i32>,
    pub obverse: Option<Picture>,
    pub reverse: Option<Picture>,
    pub instance_count: u32,
    pub kind: ArtifactKind,
}

impl Artifact {
    pub fn is_coin(&self) -> bool {
        matches!(self.kind, ArtifactKind::Coin { .. })
    }

    pub fn is_banknote(&self) -> bool {
        matches!(self.kind, ArtifactKind::Banknote { .. })
    }
}
