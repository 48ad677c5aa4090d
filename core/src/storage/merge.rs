//! Flattening of inherited records.
//!
//! A catalog author may describe shared fields once in a shallow document and
//! only the differing fields in deeper ones. Walking the tree, every record of
//! the requested type is merged over the record inherited from its nearest
//! matching ancestor, and only the records nothing else builds upon are
//! reported.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::metadata::NodeId;
use super::store::DocumentStore;
use super::{Error, Result};

/// Field-wise "non-null wins" merge.
pub trait Merge {
    /// Overwrites every field of `self` for which `other` has a value.
    fn merge_from(&mut self, other: &Self);
}

/// Copies every `Some` field of `$source` onto `$target`.
macro_rules! merge_options {
    ($target:expr, $source:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = &$source.$field {
                $target.$field = Some(value.clone());
            }
        )+
    };
}

pub(crate) use merge_options;

/// An effective record and the document it was emitted for.
#[derive(Debug, Clone, PartialEq)]
pub struct Flattened<T> {
    pub node: NodeId,
    pub record: T,
}

enum Step {
    Enter(NodeId),
    Leave,
}

struct Frame<T> {
    node: NodeId,
    record: T,
    inherited: bool,
    chain: usize,
}

/// Collects the effective `type_id` records in the subtree rooted at `start`
/// (inclusive).
///
/// Nodes of other types are traversed but contribute nothing. A record is
/// emitted only when no record of the same type was found below it.
pub async fn flatten<T>(store: &DocumentStore, start: NodeId, type_id: &str) -> Result<Vec<Flattened<T>>>
where
    T: DeserializeOwned + Merge + Clone,
{
    flatten_within(store, start, type_id, &[]).await
}

/// Same as [`flatten`], but documents below `start` whose type is listed in
/// `stop_at` are skipped together with their subtrees.
///
/// A document reachable through several copies of a subtree is reported once,
/// with the record that inherited from the most ancestors.
#[instrument(skip(store), fields(root = %store.root().display()))]
pub async fn flatten_within<T>(
    store: &DocumentStore,
    start: NodeId,
    type_id: &str,
    stop_at: &[&str],
) -> Result<Vec<Flattened<T>>>
where
    T: DeserializeOwned + Merge + Clone,
{
    let forest = store.forest();
    forest.get(start).ok_or(Error::UnknownNode(start))?;

    let mut flattened: Vec<(Flattened<T>, usize)> = Vec::new();
    let mut emitted: HashMap<PathBuf, usize> = HashMap::new();
    let mut stack: Vec<Frame<T>> = Vec::new();
    let mut steps = vec![Step::Enter(start)];

    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(id) => {
                let Some(node) = forest.get(id) else { continue };
                if id != start && stop_at.contains(&node.type_id()) {
                    continue;
                }
                if node.type_id() == type_id {
                    let parsed: T = store.read(id).await?;
                    let record = match stack.last_mut() {
                        Some(top) => {
                            top.inherited = true;
                            let mut merged = top.record.clone();
                            merged.merge_from(&parsed);
                            merged
                        }
                        None => parsed,
                    };
                    let chain = stack.len() + 1;
                    stack.push(Frame { node: id, record, inherited: false, chain });
                    steps.push(Step::Leave);
                }
                steps.extend(node.children().iter().rev().map(|&child| Step::Enter(child)));
            }
            Step::Leave => {
                let Some(frame) = stack.pop() else { continue };
                if frame.inherited {
                    continue;
                }
                let path = forest.path(frame.node)?;
                let entry = Flattened { node: frame.node, record: frame.record };
                match emitted.get(&path) {
                    Some(&index) => {
                        if frame.chain > flattened[index].1 {
                            flattened[index] = (entry, frame.chain);
                        }
                    }
                    None => {
                        emitted.insert(path, flattened.len());
                        flattened.push((entry, frame.chain));
                    }
                }
            }
        }
    }

    debug!("Flattened {} '{}' records", flattened.len(), type_id);
    Ok(flattened.into_iter().map(|(entry, _)| entry).collect())
}
