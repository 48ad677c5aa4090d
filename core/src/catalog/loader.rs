use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, instrument};

use super::model::{Artifact, Emission, Issuer};
use super::records::{BanknoteRecord, CoinRecord, EmissionRecord, IssuerRecord};
use crate::storage::{self, DocumentForest, DocumentStore, NodeId, flatten_within};

pub const ISSUER_TYPE_ID: &str = "issuer";
pub const EMISSION_TYPE_ID: &str = "emission";
pub const COIN_TYPE_ID: &str = "coin";
pub const BANKNOTE_TYPE_ID: &str = "banknote";

const ARTIFACT_BOUNDARIES: &[&str] = &[EMISSION_TYPE_ID, ISSUER_TYPE_ID];

/// Builds every issuer found in the store, with its emissions and their
/// artifacts. Emissions are ordered by start year.
///
/// An issuer owns the emissions below it up to any nested issuer, and an
/// emission owns the artifacts below it up to any nested emission or issuer.
/// Documents reached through several copies of a subtree are loaded once.
#[instrument(skip(store), fields(root = %store.root().display()))]
pub async fn load_issuers(store: &DocumentStore) -> storage::Result<Vec<Issuer>> {
    let forest = store.forest();
    let mut issuers = Vec::new();
    let mut seen_issuers = HashSet::new();

    for node in forest.find_by_type(ISSUER_TYPE_ID) {
        let id = document_id(store, node)?;
        if !seen_issuers.insert(id.clone()) {
            continue;
        }
        let record: IssuerRecord = store.read(node).await?;
        let mut issuer = Issuer::from_record(id, record);

        let mut seen_emissions = HashSet::new();
        for emission in emission_nodes(forest, node) {
            let id = document_id(store, emission)?;
            if seen_emissions.insert(id.clone()) {
                issuer.emissions.push(load_emission(store, emission, id).await?);
            }
        }
        issuer.emissions.sort_by_key(|emission| emission.start_year);

        debug!(id = %issuer.id(), "Loaded issuer with {} emissions", issuer.emissions.len());
        issuers.push(issuer);
    }
    Ok(issuers)
}

/// Emission documents below `issuer`, in document order, without entering
/// nested issuers.
fn emission_nodes(forest: &DocumentForest, issuer: NodeId) -> Vec<NodeId> {
    let mut found = Vec::new();
    let mut pending: Vec<NodeId> = forest.children(issuer).iter().rev().copied().collect();

    while let Some(id) = pending.pop() {
        let Some(meta) = forest.get(id) else { continue };
        match meta.type_id() {
            ISSUER_TYPE_ID => continue,
            EMISSION_TYPE_ID => found.push(id),
            _ => {}
        }
        pending.extend(forest.children(id).iter().rev().copied());
    }
    found
}

async fn load_emission(store: &DocumentStore, node: NodeId, id: String) -> storage::Result<Emission> {
    let record: EmissionRecord = store.read(node).await?;
    let mut emission = Emission::from_record(id, record);

    for coin in flatten_within::<CoinRecord>(store, node, COIN_TYPE_ID, ARTIFACT_BOUNDARIES).await? {
        emission.artifacts.push(Artifact::from_coin(document_id(store, coin.node)?, coin.record));
    }
    for note in flatten_within::<BanknoteRecord>(store, node, BANKNOTE_TYPE_ID, ARTIFACT_BOUNDARIES).await? {
        emission.artifacts.push(Artifact::from_banknote(document_id(store, note.node)?, note.record));
    }
    Ok(emission)
}

/// Entities are identified by the path of their document.
fn document_id(store: &DocumentStore, node: NodeId) -> storage::Result<String> {
    path_to_id(&store.full_path(node)?)
}

fn path_to_id(path: &Path) -> storage::Result<String> {
    path.to_str()
        .map(str::to_owned)
        .ok_or_else(|| storage::Error::InvalidPath(format!("Non UTF-8 path: {}", path.display())))
}
