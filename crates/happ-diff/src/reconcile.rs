//! Pairing of list items for comparison
//!
//! Given two sequences the reconciler decides how their items line up. It
//! never compares values itself beyond the multiset check; the comparator walks
//! whatever pairs come back.
//!
//! Strategies are attempted in order, first success wins:
//!
//! 1. Kubernetes identity (`apiVersion|kind|namespace|name`), unique per side
//! 2. The first candidate identifier path yielding unique scalars on both sides
//! 3. Multiset equality of the items' canonical content
//! 4. Position
//!
//! With `ignore_order_changes` off, only position is used.

use happ_core::{DocumentKey, Value};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, trace};

use crate::normalize::trim_whitespace;
use crate::options::DiffOptions;
use crate::path::K8S_IDENTITY_FIELD;

/// Strategy selected for a pair of sequences
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    KubernetesIdentity,
    IdentifierPath(String),
    Multiset,
    Positional,
}

/// Items sharing one identifier; either side may be missing
#[derive(Debug, Clone, PartialEq)]
pub struct Pairing<'a> {
    pub id: String,
    pub left: Option<&'a Value>,
    pub right: Option<&'a Value>,
}

/// How two sequences should be walked
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation<'a> {
    /// The sequences are equal as a whole; nothing to walk
    Equal,

    /// Items paired by identifier, sorted by identifier value
    Paired {
        /// Identifier field shown in paths (`k8s` for Kubernetes identity)
        field: String,
        pairs: Vec<Pairing<'a>>,
    },

    /// Compare index by index
    Positional,
}

impl Reconciliation<'_> {
    pub fn strategy(&self) -> Strategy {
        match self {
            Reconciliation::Equal => Strategy::Multiset,
            Reconciliation::Paired { field, .. } if field == K8S_IDENTITY_FIELD => {
                Strategy::KubernetesIdentity
            }
            Reconciliation::Paired { field, .. } => Strategy::IdentifierPath(field.clone()),
            Reconciliation::Positional => Strategy::Positional,
        }
    }
}

/// Decide how to pair the items of two sequences
pub fn reconcile<'a>(
    left: &'a [Value],
    right: &'a [Value],
    options: &DiffOptions,
) -> Reconciliation<'a> {
    if !options.ignore_order_changes {
        return Reconciliation::Positional;
    }
    if left.is_empty() && right.is_empty() {
        return Reconciliation::Equal;
    }

    if let (Some(left_ids), Some(right_ids)) = (kubernetes_ids(left), kubernetes_ids(right)) {
        trace!(left = left.len(), right = right.len(), "pairing by kubernetes identity");
        return Reconciliation::Paired {
            field: K8S_IDENTITY_FIELD.to_string(),
            pairs: pair_by_ids(left, left_ids, right, right_ids),
        };
    }

    for candidate in options.identifier_candidates() {
        let left_ids = unique_ids(left, candidate);
        let right_ids = unique_ids(right, candidate);
        if let (Some(left_ids), Some(right_ids)) = (left_ids, right_ids) {
            trace!(field = candidate, "pairing by identifier path");
            return Reconciliation::Paired {
                field: candidate.to_string(),
                pairs: pair_by_ids(left, left_ids, right, right_ids),
            };
        }
    }

    if multiset_equal(left, right, options) {
        trace!("sequences equal as multisets");
        return Reconciliation::Equal;
    }

    Reconciliation::Positional
}

/// Kubernetes identities of every item, if all items have a unique one
pub fn kubernetes_ids(items: &[Value]) -> Option<Vec<String>> {
    let mut seen = HashSet::new();
    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        let key = DocumentKey::strict(item)?;
        if !seen.insert(key.clone()) {
            debug!(key = %key, "duplicate kubernetes identity, identity pairing disabled");
            return None;
        }
        ids.push(key.to_string());
    }
    Some(ids)
}

/// Identifier of every item under `path`, if all items have a unique one
pub fn unique_ids(items: &[Value], path: &str) -> Option<Vec<String>> {
    let mut seen = HashSet::new();
    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        let id = identifier_at(item, path)?;
        if !seen.insert(id.clone()) {
            debug!(field = path, id = %id, "duplicate identifier, trying next strategy");
            return None;
        }
        ids.push(id);
    }
    Some(ids)
}

/// Scalar identifier found at a dotted path inside a mapping item
pub fn identifier_at(item: &Value, path: &str) -> Option<String> {
    item.get_path(path)?.identifier_string()
}

fn pair_by_ids<'a>(
    left: &'a [Value],
    left_ids: Vec<String>,
    right: &'a [Value],
    right_ids: Vec<String>,
) -> Vec<Pairing<'a>> {
    let mut by_id: BTreeMap<String, Pairing<'a>> = BTreeMap::new();
    for (id, item) in left_ids.into_iter().zip(left) {
        by_id
            .entry(id.clone())
            .or_insert_with(|| Pairing { id, left: None, right: None })
            .left = Some(item);
    }
    for (id, item) in right_ids.into_iter().zip(right) {
        by_id
            .entry(id.clone())
            .or_insert_with(|| Pairing { id, left: None, right: None })
            .right = Some(item);
    }
    by_id.into_values().collect()
}

/// Whether both sequences hold the same items, counting duplicates
pub fn multiset_equal(left: &[Value], right: &[Value], options: &DiffOptions) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut counts: HashMap<String, i64> = HashMap::new();
    for item in left {
        *counts.entry(content_key(item, options)).or_default() += 1;
    }
    for item in right {
        *counts.entry(content_key(item, options)).or_default() -= 1;
    }
    counts.values().all(|n| *n == 0)
}

/// Canonical content of an item, used for multiset matching
pub fn content_key(item: &Value, options: &DiffOptions) -> String {
    let item = if options.ignore_whitespace_change {
        Cow::Owned(trim_whitespace(item))
    } else {
        Cow::Borrowed(item)
    };
    item.canonical_json()
        .unwrap_or_else(|| format!("{:?}", item))
}
