//! Manifest streams and resource identity

use serde::{Deserialize, Serialize};
use serde_yaml::Value as YamlValue;
use std::fmt;

use crate::error::{CoreError, Result};
use crate::value::Value;

/// Parse a single- or multi-document YAML stream
///
/// Empty and `null` documents are skipped. No documents yields an empty
/// sequence, a single document is returned as-is, several documents become a
/// sequence in stream order.
pub fn parse_yaml_stream(content: &str) -> Result<Value> {
    let mut docs = decode_stream(content)?;
    Ok(match docs.len() {
        1 => docs.remove(0),
        _ => Value::Sequence(docs),
    })
}

/// Parse a YAML stream as a list of Kubernetes-style documents
///
/// Every non-empty document must be a mapping.
pub fn parse_documents(content: &str) -> Result<Vec<Value>> {
    let docs = decode_stream(content)?;
    for (index, doc) in docs.iter().enumerate() {
        if doc.as_mapping().is_none() {
            return Err(CoreError::NotADocument { index });
        }
    }
    Ok(docs)
}

fn decode_stream(content: &str) -> Result<Vec<Value>> {
    let mut docs = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        let raw = YamlValue::deserialize(document)?;
        if raw.is_null() {
            continue;
        }
        docs.push(Value::from_yaml(&raw));
    }
    Ok(docs)
}

/// Identity of a Kubernetes resource: `apiVersion|kind|namespace|name`
///
/// A missing or empty namespace is recorded as `default`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentKey(String);

impl DocumentKey {
    pub const DEFAULT_NAMESPACE: &'static str = "default";

    pub fn new(api_version: &str, kind: &str, namespace: &str, name: &str) -> Self {
        let namespace = if namespace.is_empty() {
            Self::DEFAULT_NAMESPACE
        } else {
            namespace
        };
        Self(format!("{}|{}|{}|{}", api_version, kind, namespace, name))
    }

    /// Key of any document; missing identity fields render as empty strings
    pub fn from_document(doc: &Value) -> Self {
        let field = |path: &str| doc.get_path(path).and_then(Value::as_str).unwrap_or("");
        Self::new(
            field("apiVersion"),
            field("kind"),
            field("metadata.namespace"),
            field("metadata.name"),
        )
    }

    /// Key of a document that carries a full identity
    ///
    /// Returns `None` unless `apiVersion`, `kind` and `metadata.name` are
    /// non-empty strings.
    pub fn strict(doc: &Value) -> Option<Self> {
        let api_version = doc.get("apiVersion").and_then(Value::as_str)?;
        let kind = doc.get("kind").and_then(Value::as_str)?;
        let name = doc.get_path("metadata.name").and_then(Value::as_str)?;
        if api_version.is_empty() || kind.is_empty() || name.is_empty() {
            return None;
        }
        let namespace = doc
            .get_path("metadata.namespace")
            .and_then(Value::as_str)
            .unwrap_or("");
        Some(Self::new(api_version, kind, namespace, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_document() {
        let value = parse_yaml_stream("a: 1\n").unwrap();
        assert!(value.get("a").is_some());
    }

    #[test]
    fn test_parse_multi_document() {
        let value = parse_yaml_stream("a: 1\n---\nb: 2\n").unwrap();
        let docs = value.as_sequence().unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs[1].get("b").is_some());
    }

    #[test]
    fn test_parse_empty_documents() {
        assert_eq!(parse_yaml_stream("---\n...\n").unwrap(), Value::Sequence(vec![]));
        assert_eq!(parse_yaml_stream("").unwrap(), Value::Sequence(vec![]));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        assert!(matches!(parse_yaml_stream("a: [\n"), Err(CoreError::Yaml(_))));
    }

    #[test]
    fn test_parse_documents_rejects_scalars() {
        let err = parse_documents("kind: ConfigMap\n---\njust-a-string\n").unwrap_err();
        assert!(matches!(err, CoreError::NotADocument { index: 1 }));
    }

    #[test]
    fn test_parse_documents_skips_empty() {
        let docs = parse_documents("---\napiVersion: v1\nkind: ConfigMap\n---\n---\n").unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_key_defaults_namespace() {
        let doc = parse_yaml_stream("apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: a\n").unwrap();
        assert_eq!(DocumentKey::from_document(&doc).as_str(), "v1|ConfigMap|default|a");
        assert_eq!(DocumentKey::strict(&doc), Some(DocumentKey::from_document(&doc)));
    }

    #[test]
    fn test_key_keeps_explicit_namespace() {
        let doc = parse_yaml_stream(
            "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: web\n  namespace: prod\n",
        )
        .unwrap();
        assert_eq!(DocumentKey::from_document(&doc).to_string(), "apps/v1|Deployment|prod|web");
    }

    #[test]
    fn test_strict_key_requires_identity() {
        let no_name = parse_yaml_stream("apiVersion: v1\nkind: ConfigMap\n").unwrap();
        assert_eq!(DocumentKey::strict(&no_name), None);
        assert_eq!(DocumentKey::from_document(&no_name).as_str(), "v1|ConfigMap|default|");

        let empty_kind = parse_yaml_stream("apiVersion: v1\nkind: ''\nmetadata:\n  name: a\n").unwrap();
        assert_eq!(DocumentKey::strict(&empty_kind), None);

        assert_eq!(DocumentKey::strict(&Value::from("not-a-map")), None);
    }
}
