//! happ Core - document model shared by the diff engine and the verifier
//!
//! This crate provides the foundational types used throughout happ:
//! - `Value`: a closed document tree (null, bool, number, string, sequence, mapping)
//! - `parse_yaml_stream` / `parse_documents`: multi-document YAML decoding
//! - `DocumentKey`: `apiVersion|kind|namespace|name` identity of a manifest

pub mod document;
pub mod error;
pub mod value;

pub use document::{parse_documents, parse_yaml_stream, DocumentKey};
pub use error::{CoreError, Result};
pub use value::{Mapping, Number, Value};
