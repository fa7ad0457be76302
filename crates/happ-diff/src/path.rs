//! Locations inside a document tree
//!
//! A [`Path`] is built incrementally while walking two trees and rendered as a
//! path expression only when a change is recorded:
//!
//! - `$.a.b` for mapping keys
//! - `$.a.b[2]` for positional list items
//! - `$.a.b[name=foo]` for list items paired by an identifier field
//! - `$[k8s=v1|Service|default|web]` for Kubernetes documents paired by identity

use std::fmt;

/// Identifier field used when list items are paired by Kubernetes identity
pub const K8S_IDENTITY_FIELD: &str = "k8s";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
    Identifier { field: String, value: String },
    Length,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub fn pop(&mut self) {
        self.segments.pop();
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// A copy of this path extended by one segment
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut child = self.clone();
        child.push(segment);
        child
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
                PathSegment::Identifier { field, value } => {
                    write!(f, "[{}={}]", field, escape_identifier(value))?
                }
                PathSegment::Length => f.write_str(".length")?,
            }
        }
        Ok(())
    }
}

/// Escape an identifier value for use inside `[field=value]`
pub fn escape_identifier(value: &str) -> String {
    value.replace('\\', "\\\\").replace(']', "\\]")
}
