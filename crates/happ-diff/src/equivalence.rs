//! Resource-by-resource equivalence of two manifest corpora
//!
//! The verifier answers one question: does a regenerated chart render the same
//! Kubernetes objects as the original? Both corpora are normalized in
//! equivalence mode, indexed by [`DocumentKey`] and compared key by key with the
//! comparator in first-difference mode.
//!
//! Two documents sharing a key within one corpus are not an error. The later
//! document wins, a warning is logged and the key is reported in
//! [`CorpusIndex::duplicates`] and [`DetailedResult::duplicates`].

use happ_core::{DocumentKey, Value};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::change::{render_changes, ChangeRecord};
use crate::compare::{diff_values, first_difference};
use crate::normalize::normalize_document;
use crate::options::DiffOptions;
use crate::render::render_report_value;

/// Normalize every mapping document for equivalence checks
///
/// Documents that are not mappings carry no resource and are dropped.
pub fn normalize_documents(docs: &[Value]) -> Vec<Value> {
    docs.iter()
        .filter(|doc| doc.as_mapping().is_some())
        .map(normalize_document)
        .collect()
}

/// Normalized documents of one corpus, keyed by resource identity
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    documents: BTreeMap<DocumentKey, Value>,
    duplicates: Vec<DocumentKey>,
}

impl CorpusIndex {
    /// Normalize and index raw documents; `corpus` names the side in logs
    pub fn build(docs: &[Value], corpus: &str) -> Self {
        let mut index = Self::default();
        for doc in normalize_documents(docs) {
            let key = DocumentKey::from_document(&doc);
            if index.documents.insert(key.clone(), doc).is_some() {
                warn!(corpus, key = %key, "duplicate resource key, keeping the later document");
                if !index.duplicates.contains(&key) {
                    index.duplicates.push(key);
                }
            }
        }
        debug!(corpus, resources = index.documents.len(), "indexed corpus");
        index
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, key: &DocumentKey) -> Option<&Value> {
        self.documents.get(key)
    }

    pub fn contains(&self, key: &DocumentKey) -> bool {
        self.documents.contains_key(key)
    }

    /// Keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &DocumentKey> {
        self.documents.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DocumentKey, &Value)> {
        self.documents.iter()
    }

    /// Keys seen more than once while indexing
    pub fn duplicates(&self) -> &[DocumentKey] {
        &self.duplicates
    }
}

/// Pass/fail verdict with a one-line explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquivalenceResult {
    pub equal: bool,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    Equal,
    Changed,
    MissingInGenerated,
    ExtraInGenerated,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Equal => "equal",
            ResourceStatus::Changed => "changed",
            ResourceStatus::MissingInGenerated => "missing_in_generated",
            ResourceStatus::ExtraInGenerated => "extra_in_generated",
        }
    }
}

impl std::fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one resource key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceComparison {
    pub key: DocumentKey,
    pub status: ResourceStatus,

    /// Location of the first difference of a changed resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_value: Option<String>,
}

impl ResourceComparison {
    fn new(key: DocumentKey, status: ResourceStatus) -> Self {
        Self {
            key,
            status,
            diff_path: None,
            source_value: None,
            generated_value: None,
        }
    }

    fn changed(key: DocumentKey, change: &ChangeRecord) -> Self {
        Self {
            key,
            status: ResourceStatus::Changed,
            diff_path: Some(change.path.clone()),
            source_value: Some(render_report_value(change.left.as_ref())),
            generated_value: Some(render_report_value(change.right.as_ref())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailedResult {
    pub equal: bool,
    pub summary: String,

    /// Sorted by status name, then key
    pub resources: Vec<ResourceComparison>,

    /// Keys that occurred more than once in either corpus
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub duplicates: Vec<DocumentKey>,
}

impl DetailedResult {
    pub fn mismatches(&self) -> usize {
        self.resources
            .iter()
            .filter(|r| r.status != ResourceStatus::Equal)
            .count()
    }

    pub fn count(&self, status: ResourceStatus) -> usize {
        self.resources.iter().filter(|r| r.status == status).count()
    }
}

fn first_resource_difference(source: &Value, generated: &Value) -> Option<ChangeRecord> {
    first_difference(source, generated, &DiffOptions::default())
}

/// Fast verdict: stops at the first problem found
pub fn equivalent(source: &[Value], generated: &[Value]) -> EquivalenceResult {
    let src = CorpusIndex::build(source, "source");
    let gen_index = CorpusIndex::build(generated, "generated");
    let mismatch = |summary: String| EquivalenceResult {
        equal: false,
        summary,
    };

    if src.len() != gen_index.len() {
        return mismatch(format!(
            "resource count differs: source={} generated={}",
            src.len(),
            gen_index.len()
        ));
    }
    if let Some(key) = src.keys().find(|k| !gen_index.contains(k)) {
        return mismatch(format!("missing resource in generated chart: {}", key));
    }
    if let Some(key) = gen_index.keys().find(|k| !src.contains(k)) {
        return mismatch(format!("extra resource in generated chart: {}", key));
    }
    for (key, doc) in src.iter() {
        let Some(other) = gen_index.get(key) else {
            continue;
        };
        if let Some(change) = first_resource_difference(doc, other) {
            return mismatch(format!(
                "resource content mismatch: {} at {} (source={} generated={})",
                key,
                change.path,
                render_report_value(change.left.as_ref()),
                render_report_value(change.right.as_ref())
            ));
        }
    }

    EquivalenceResult {
        equal: true,
        summary: format!("equivalent resources: {}", src.len()),
    }
}

/// Classify every resource key in the union of both corpora
pub fn compare_detailed(source: &[Value], generated: &[Value]) -> DetailedResult {
    let src = CorpusIndex::build(source, "source");
    let gen_index = CorpusIndex::build(generated, "generated");
    compare_indexes(&src, &gen_index)
}

fn compare_indexes(src: &CorpusIndex, gen_index: &CorpusIndex) -> DetailedResult {
    let mut resources = Vec::with_capacity(src.len().max(gen_index.len()));
    for (key, doc) in src.iter() {
        let comparison = match gen_index.get(key) {
            None => ResourceComparison::new(key.clone(), ResourceStatus::MissingInGenerated),
            Some(other) => match first_resource_difference(doc, other) {
                Some(change) => ResourceComparison::changed(key.clone(), &change),
                None => ResourceComparison::new(key.clone(), ResourceStatus::Equal),
            },
        };
        resources.push(comparison);
    }
    for key in gen_index.keys().filter(|k| !src.contains(k)) {
        resources.push(ResourceComparison::new(key.clone(), ResourceStatus::ExtraInGenerated));
    }
    resources.sort_by(|a, b| {
        a.status
            .as_str()
            .cmp(b.status.as_str())
            .then_with(|| a.key.cmp(&b.key))
    });

    let mut duplicates: Vec<DocumentKey> = src
        .duplicates()
        .iter()
        .chain(gen_index.duplicates())
        .cloned()
        .collect();
    duplicates.sort();
    duplicates.dedup();

    let mut result = DetailedResult {
        equal: false,
        summary: String::new(),
        resources,
        duplicates,
    };
    result.equal = result.mismatches() == 0;
    result.summary = if result.equal {
        format!("equivalent resources: {}", src.len())
    } else {
        format!(
            "resource comparison: source={} generated={} mismatches={}",
            src.len(),
            gen_index.len(),
            result.mismatches()
        )
    };
    result
}

/// Detailed result plus per-resource material for side-by-side inspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityComparison {
    pub compare: DetailedResult,

    /// Normalized YAML of every source resource
    pub source_yaml: BTreeMap<DocumentKey, String>,

    /// Normalized YAML of every generated resource
    pub generated_yaml: BTreeMap<DocumentKey, String>,

    /// Full change log of every changed resource
    pub diffs: BTreeMap<DocumentKey, String>,
}

pub fn compare_entities(source: &[Value], generated: &[Value]) -> EntityComparison {
    let src = CorpusIndex::build(source, "source");
    let gen_index = CorpusIndex::build(generated, "generated");
    let compare = compare_indexes(&src, &gen_index);

    let mut diffs = BTreeMap::new();
    for resource in compare
        .resources
        .iter()
        .filter(|r| r.status == ResourceStatus::Changed)
    {
        if let (Some(left), Some(right)) = (src.get(&resource.key), gen_index.get(&resource.key)) {
            let log = render_changes(&diff_values(left, right, &DiffOptions::default()));
            if !log.is_empty() {
                diffs.insert(resource.key.clone(), log);
            }
        }
    }

    EntityComparison {
        source_yaml: yaml_by_key(&src),
        generated_yaml: yaml_by_key(&gen_index),
        compare,
        diffs,
    }
}

fn yaml_by_key(index: &CorpusIndex) -> BTreeMap<DocumentKey, String> {
    index
        .iter()
        .map(|(key, doc)| (key.clone(), document_text(doc)))
        .collect()
}

/// YAML text of a document, or pretty JSON if it cannot be emitted as YAML
fn document_text(doc: &Value) -> String {
    match serde_yaml::to_string(doc) {
        Ok(yaml) => yaml.trim_end_matches('\n').to_string(),
        Err(err) => {
            debug!(error = %err, "yaml rendering failed, using json");
            serde_json::to_string_pretty(doc).unwrap_or_default()
        }
    }
}
