//! Document tree model
//!
//! Every parsed manifest, values file or rendered chart ends up as a [`Value`].
//! Mapping keys are always strings and iterate in sorted order, so any walk over
//! a tree is deterministic.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;
use std::collections::BTreeMap;
use std::fmt;

/// Mapping node with sorted, unique string keys
pub type Mapping = BTreeMap<String, Value>;

/// A node of a decoded document
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

/// Numeric scalar as decoded from YAML or JSON
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Number {
    /// Canonical JSON text of this number
    ///
    /// Integral floats that fit in an `i64` render as integers, so `1.0` and `1`
    /// share a canonical form. NaN and infinities have none.
    pub fn canonical(&self) -> Option<String> {
        match *self {
            Number::Int(i) => Some(i.to_string()),
            Number::UInt(u) => Some(u.to_string()),
            Number::Float(f) => {
                if !f.is_finite() {
                    return None;
                }
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    return Some((f as i64).to_string());
                }
                serde_json::Number::from_f64(f).map(|n| n.to_string())
            }
        }
    }

    fn to_json(self) -> JsonValue {
        match self {
            Number::Int(i) => JsonValue::from(i),
            Number::UInt(u) => JsonValue::from(u),
            Number::Float(f) => serde_json::Number::from_f64(f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(canonical) = self.canonical() {
            return f.write_str(&canonical);
        }
        match *self {
            Number::Float(v) if v.is_nan() => f.write_str(".nan"),
            Number::Float(v) if v.is_sign_negative() => f.write_str("-.inf"),
            _ => f.write_str(".inf"),
        }
    }
}

impl From<&serde_yaml::Number> for Number {
    fn from(n: &serde_yaml::Number) -> Self {
        if let Some(i) = n.as_i64() {
            Number::Int(i)
        } else if let Some(u) = n.as_u64() {
            Number::UInt(u)
        } else {
            Number::Float(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl From<&serde_json::Number> for Number {
    fn from(n: &serde_json::Number) -> Self {
        if let Some(i) = n.as_i64() {
            Number::Int(i)
        } else if let Some(u) = n.as_u64() {
            Number::UInt(u)
        } else {
            Number::Float(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl Value {
    /// Convert a decoded YAML tree, stringifying non-string mapping keys
    ///
    /// YAML allows numbers, booleans, null and even collections as keys. They
    /// are rendered to their string form; if two keys collide after that the
    /// later one wins. Tags are dropped in favour of the tagged value.
    pub fn from_yaml(yaml: &YamlValue) -> Self {
        match yaml {
            YamlValue::Null => Value::Null,
            YamlValue::Bool(b) => Value::Bool(*b),
            YamlValue::Number(n) => Value::Number(n.into()),
            YamlValue::String(s) => Value::String(s.clone()),
            YamlValue::Sequence(seq) => Value::Sequence(seq.iter().map(Value::from_yaml).collect()),
            YamlValue::Mapping(map) => Value::Mapping(
                map.iter()
                    .map(|(k, v)| (yaml_key_string(k), Value::from_yaml(v)))
                    .collect(),
            ),
            YamlValue::Tagged(tagged) => Value::from_yaml(&tagged.value),
        }
    }

    /// Convert a decoded JSON tree
    pub fn from_json(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => Value::Number(n.into()),
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Array(items) => Value::Sequence(items.iter().map(Value::from_json).collect()),
            JsonValue::Object(map) => Value::Mapping(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert to a JSON tree (non-finite floats become `null`)
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Number(n) => n.to_json(),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Sequence(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Mapping(map) => JsonValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Canonical compact JSON text with sorted keys
    ///
    /// Returns `None` when the tree contains a number with no JSON form.
    pub fn canonical_json(&self) -> Option<String> {
        let mut out = String::new();
        write_canonical(self, &mut out)?;
        Some(out)
    }

    /// Human-readable name of the node type
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Sequences and mappings are composite; everything else is a scalar
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Sequence(_) | Value::Mapping(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a key of a mapping node
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Get a value by dotted path (e.g., "metadata.name")
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(self, |current, segment| current.get(segment))
    }

    /// String form of a scalar usable as an identifier
    ///
    /// Strings must be non-empty; numbers and booleans are stringified.
    /// Null and composite values have no identifier form.
    pub fn identifier_string(&self) -> Option<String> {
        match self {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

fn write_canonical(value: &Value, out: &mut String) -> Option<()> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.canonical()?),
        Value::String(s) => out.push_str(&serde_json::to_string(s).ok()?),
        Value::Sequence(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out)?;
            }
            out.push(']');
        }
        Value::Mapping(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(key).ok()?);
                out.push(':');
                write_canonical(item, out)?;
            }
            out.push('}');
        }
    }
    Some(())
}

fn yaml_key_string(key: &YamlValue) -> String {
    match key {
        YamlValue::String(s) => s.clone(),
        YamlValue::Number(n) => Number::from(n).to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Null => "null".to_string(),
        YamlValue::Tagged(tagged) => yaml_key_string(&tagged.value),
        composite => serde_yaml::to_string(composite)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Int(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::UInt(u)) => serializer.serialize_u64(*u),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Sequence(items) => items.serialize(serializer),
            Value::Mapping(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        YamlValue::deserialize(deserializer).map(|yaml| Value::from_yaml(&yaml))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Number(Number::Int(i))
    }
}

impl From<usize> for Value {
    fn from(u: usize) -> Self {
        Value::Number(Number::UInt(u as u64))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        let raw: YamlValue = serde_yaml::from_str(s).unwrap();
        Value::from_yaml(&raw)
    }

    #[test]
    fn test_non_string_keys_are_stringified() {
        let value = yaml("1:\n  x: y\ntrue: yes\n~: nothing\n");
        let map = value.as_mapping().unwrap();

        assert_eq!(map.get("1").and_then(|v| v.get("x")), Some(&Value::from("y")));
        assert!(map.contains_key("true"));
        assert!(map.contains_key("null"));
    }

    #[test]
    fn test_tags_are_dropped() {
        let value = yaml("a: !custom {x: 1}\n");
        assert_eq!(value.get_path("a.x"), Some(&Value::Number(Number::Int(1))));
    }

    #[test]
    fn test_canonical_json_sorts_keys() {
        let value = yaml("b: 2\na: [1, \"x\"]\n");
        assert_eq!(value.canonical_json().as_deref(), Some(r#"{"a":[1,"x"],"b":2}"#));
    }

    #[test]
    fn test_integral_float_matches_integer() {
        assert_eq!(Number::Float(8080.0).canonical(), Number::Int(8080).canonical());
        assert_eq!(Number::Float(1.5).canonical().as_deref(), Some("1.5"));
    }

    #[test]
    fn test_non_finite_has_no_canonical_form() {
        let value = Value::Sequence(vec![Value::Number(Number::Float(f64::NAN))]);
        assert!(value.canonical_json().is_none());
        assert_eq!(Number::Float(f64::INFINITY).to_string(), ".inf");
        assert_eq!(Number::Float(f64::NEG_INFINITY).to_string(), "-.inf");
    }

    #[test]
    fn test_get_path() {
        let value = yaml("metadata:\n  name: demo\n");
        assert_eq!(value.get_path("metadata.name"), Some(&Value::from("demo")));
        assert_eq!(value.get_path("metadata.name.deeper"), None);
        assert_eq!(value.get_path("spec"), None);
    }

    #[test]
    fn test_identifier_string() {
        assert_eq!(Value::from("a").identifier_string().as_deref(), Some("a"));
        assert_eq!(Value::from("").identifier_string(), None);
        assert_eq!(Value::from(7i64).identifier_string().as_deref(), Some("7"));
        assert_eq!(Value::from(true).identifier_string().as_deref(), Some("true"));
        assert_eq!(Value::Sequence(vec![]).identifier_string(), None);
        assert_eq!(Value::Null.identifier_string(), None);
    }

    #[test]
    fn test_json_bridge() {
        let json = serde_json::json!({"a": [1, 2.5, "s", null, true]});
        let value = Value::from_json(&json);
        assert_eq!(value.to_json(), json);
    }

    #[test]
    fn test_serialize_yaml() {
        let value = yaml("b: 1\na:\n- x\n");
        let rendered = serde_yaml::to_string(&value).unwrap();
        insta::assert_snapshot!(rendered, @r"
        a:
        - x
        b: 1
        ");
    }

    #[test]
    fn test_deserialize() {
        let value: Value = serde_yaml::from_str("k: v").unwrap();
        assert_eq!(value.get("k"), Some(&Value::from("v")));
    }
}
