//! Canonicalization of document trees before comparison
//!
//! Two modes exist:
//!
//! - [`NormalizeMode::Generic`]: used by the diff command. Mapping keys are
//!   already strings once a tree has been converted into a [`Value`], so the
//!   tree passes through unchanged.
//! - [`NormalizeMode::Equivalence`]: used by the migration verifier. Fields that
//!   carry no workload semantics are stripped so that a regenerated chart can be
//!   compared against the original one.

use happ_core::{Mapping, Value};

/// Normalization flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizeMode {
    #[default]
    Generic,
    Equivalence,
}

/// Fields the helm-apps library renders for workloads that do not affect them
const LIBRARY_NOISE_PATHS: &[&[&str]] = &[
    &["spec", "template", "metadata", "name"],
    &["spec", "jobTemplate", "spec", "template", "metadata", "name"],
];

/// Normalize a tree, producing a new one
///
/// Normalization is idempotent. In equivalence mode a root mapping (or every
/// mapping directly inside a root sequence, as produced by a multi-document
/// stream) also has the library noise fields removed.
pub fn normalize(value: &Value, mode: NormalizeMode) -> Value {
    match mode {
        NormalizeMode::Generic => value.clone(),
        NormalizeMode::Equivalence => {
            let mut out = strip(value).unwrap_or(Value::Null);
            match &mut out {
                Value::Mapping(doc) => drop_library_noise(doc),
                Value::Sequence(docs) => {
                    for doc in docs.iter_mut() {
                        if let Value::Mapping(doc) = doc {
                            drop_library_noise(doc);
                        }
                    }
                }
                _ => {}
            }
            out
        }
    }
}

/// Convert a raw YAML tree and normalize it
pub fn normalize_yaml(raw: &serde_yaml::Value, mode: NormalizeMode) -> Value {
    normalize(&Value::from_yaml(raw), mode)
}

/// Normalize one Kubernetes document for equivalence checks
pub fn normalize_document(doc: &Value) -> Value {
    normalize(doc, NormalizeMode::Equivalence)
}

/// Trim leading and trailing whitespace of every string in the tree
pub fn trim_whitespace(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.trim().to_string()),
        Value::Sequence(items) => Value::Sequence(items.iter().map(trim_whitespace).collect()),
        Value::Mapping(map) => Value::Mapping(
            map.iter()
                .map(|(k, v)| (k.clone(), trim_whitespace(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Equivalence stripping; `None` means the node is dropped from its mapping
fn strip(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Mapping(map) => {
            let mut out = Mapping::new();
            for (key, item) in map {
                if is_bookkeeping_key(key) {
                    continue;
                }
                let normalized = match item {
                    Value::Mapping(meta) if key == "metadata" => Some(strip_metadata(meta)),
                    _ => strip(item),
                };
                if let Some(normalized) = normalized {
                    out.insert(key.clone(), normalized);
                }
            }
            Some(Value::Mapping(out))
        }
        // Items keep their position, so a null item stays a null item
        Value::Sequence(items) => Some(Value::Sequence(
            items.iter().map(|i| strip(i).unwrap_or(Value::Null)).collect(),
        )),
        scalar => Some(scalar.clone()),
    }
}

/// Keys dropped from every mapping: `status` and `__`-prefixed tool state
fn is_bookkeeping_key(key: &str) -> bool {
    key == "status" || key.starts_with("__")
}

fn strip_metadata(meta: &Mapping) -> Value {
    let mut out = Mapping::new();
    for (key, item) in meta {
        match key.as_str() {
            _ if is_bookkeeping_key(key) => continue,
            "labels" | "annotations" => continue,
            "namespace" if matches!(item.as_str(), Some("") | Some("default")) => continue,
            _ => {}
        }
        if let Some(normalized) = strip(item) {
            out.insert(key.clone(), normalized);
        }
    }
    Value::Mapping(out)
}

fn drop_library_noise(doc: &mut Mapping) {
    for path in LIBRARY_NOISE_PATHS {
        delete_nested_key(doc, path);
    }
}

/// Delete the key at an exact nested path; intermediate nodes must be mappings
fn delete_nested_key(root: &mut Mapping, path: &[&str]) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut current = root;
    for segment in parents {
        match current.get_mut(*segment) {
            Some(Value::Mapping(next)) => current = next,
            _ => return,
        }
    }
    current.remove(*last);
}
