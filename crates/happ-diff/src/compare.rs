//! Structural comparison of two document trees
//!
//! A single recursive walk serves both consumers. What happens to a detected
//! difference is decided by a [`DiffSink`]:
//!
//! - [`CollectAll`] keeps every change (change-log mode, used by `happ diff`)
//! - [`FirstDifference`] keeps the first change and stops the walk
//!   (verification mode, used by the equivalence verifier)

use happ_core::Value;

use crate::change::ChangeRecord;
use crate::options::DiffOptions;
use crate::path::{Path, PathSegment};
use crate::reconcile::{reconcile, Reconciliation};

/// Receiver of the differences found during a walk
pub trait DiffSink {
    fn record(&mut self, change: ChangeRecord);

    /// Whether the walk should stop
    fn is_done(&self) -> bool {
        false
    }
}

/// Sink that accumulates every change in walk order
#[derive(Debug, Default)]
pub struct CollectAll {
    changes: Vec<ChangeRecord>,
}

impl CollectAll {
    pub fn into_changes(self) -> Vec<ChangeRecord> {
        self.changes
    }
}

impl DiffSink for CollectAll {
    fn record(&mut self, change: ChangeRecord) {
        self.changes.push(change);
    }
}

/// Sink that keeps the first change and halts the walk
#[derive(Debug, Default)]
pub struct FirstDifference {
    first: Option<ChangeRecord>,
}

impl FirstDifference {
    pub fn into_first(self) -> Option<ChangeRecord> {
        self.first
    }
}

impl DiffSink for FirstDifference {
    fn record(&mut self, change: ChangeRecord) {
        if self.first.is_none() {
            self.first = Some(change);
        }
    }

    fn is_done(&self) -> bool {
        self.first.is_some()
    }
}

/// Recursive comparator over normalized trees
pub struct Comparator<'o> {
    options: &'o DiffOptions,
}

impl<'o> Comparator<'o> {
    pub fn new(options: &'o DiffOptions) -> Self {
        Self { options }
    }

    /// Every difference between `left` and `right`, in walk order
    pub fn collect(&self, left: &Value, right: &Value) -> Vec<ChangeRecord> {
        let mut sink = CollectAll::default();
        self.compare(&mut Path::root(), left, right, &mut sink);
        sink.into_changes()
    }

    /// The first difference between `left` and `right`, if any
    pub fn first_difference(&self, left: &Value, right: &Value) -> Option<ChangeRecord> {
        let mut sink = FirstDifference::default();
        self.compare(&mut Path::root(), left, right, &mut sink);
        sink.into_first()
    }

    /// Walk both trees from `path`, reporting differences to `sink`
    pub fn compare(&self, path: &mut Path, left: &Value, right: &Value, sink: &mut dyn DiffSink) {
        match (left, right) {
            (Value::Mapping(l), Value::Mapping(r)) => {
                let mut keys: Vec<&String> = l.keys().chain(r.keys()).collect();
                keys.sort();
                keys.dedup();
                for key in keys {
                    if sink.is_done() {
                        return;
                    }
                    path.push(PathSegment::Key(key.clone()));
                    match (l.get(key), r.get(key)) {
                        (Some(lv), Some(rv)) => self.compare(path, lv, rv, sink),
                        (Some(lv), None) => sink.record(ChangeRecord::removed(path.render(), lv.clone())),
                        (None, Some(rv)) => sink.record(ChangeRecord::added(path.render(), rv.clone())),
                        (None, None) => {}
                    }
                    path.pop();
                }
            }
            (Value::Sequence(l), Value::Sequence(r)) => self.compare_sequences(path, l, r, sink),
            (l, r) if l.is_composite() || r.is_composite() => {
                sink.record(ChangeRecord::changed(path.render(), l.clone(), r.clone()));
            }
            (l, r) => {
                if !self.scalars_equal(l, r) {
                    sink.record(ChangeRecord::changed(path.render(), l.clone(), r.clone()));
                }
            }
        }
    }

    fn compare_sequences(&self, path: &mut Path, left: &[Value], right: &[Value], sink: &mut dyn DiffSink) {
        match reconcile(left, right, self.options) {
            Reconciliation::Equal => {}
            Reconciliation::Paired { field, pairs } => {
                for pair in pairs {
                    if sink.is_done() {
                        return;
                    }
                    path.push(PathSegment::Identifier {
                        field: field.clone(),
                        value: pair.id,
                    });
                    match (pair.left, pair.right) {
                        (Some(lv), Some(rv)) => self.compare(path, lv, rv, sink),
                        (Some(lv), None) => sink.record(ChangeRecord::removed(path.render(), lv.clone())),
                        (None, Some(rv)) => sink.record(ChangeRecord::added(path.render(), rv.clone())),
                        (None, None) => {}
                    }
                    path.pop();
                }
            }
            Reconciliation::Positional => self.compare_positional(path, left, right, sink),
        }
    }

    fn compare_positional(&self, path: &mut Path, left: &[Value], right: &[Value], sink: &mut dyn DiffSink) {
        if left.len() != right.len() {
            sink.record(ChangeRecord::changed(
                path.child(PathSegment::Length).render(),
                Value::from(left.len()),
                Value::from(right.len()),
            ));
        }
        let shared = left.len().min(right.len());
        for (index, (lv, rv)) in left.iter().zip(right).enumerate() {
            if sink.is_done() {
                return;
            }
            path.push(PathSegment::Index(index));
            self.compare(path, lv, rv, sink);
            path.pop();
        }
        for (index, lv) in left.iter().enumerate().skip(shared) {
            if sink.is_done() {
                return;
            }
            sink.record(ChangeRecord::removed(path.child(PathSegment::Index(index)).render(), lv.clone()));
        }
        for (index, rv) in right.iter().enumerate().skip(shared) {
            if sink.is_done() {
                return;
            }
            sink.record(ChangeRecord::added(path.child(PathSegment::Index(index)).render(), rv.clone()));
        }
    }

    /// Scalar equality by canonical JSON, with whitespace and string fallbacks
    fn scalars_equal(&self, left: &Value, right: &Value) -> bool {
        if self.options.ignore_whitespace_change {
            if let (Some(l), Some(r)) = (left.as_str(), right.as_str()) {
                return l.trim() == r.trim();
            }
        }
        match (left.canonical_json(), right.canonical_json()) {
            (Some(l), Some(r)) => l == r,
            _ => scalar_display(left) == scalar_display(right),
        }
    }
}

fn scalar_display(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => format!("{:?}", other),
    }
}

/// Every difference between two trees (change-log mode)
pub fn diff_values(left: &Value, right: &Value, options: &DiffOptions) -> Vec<ChangeRecord> {
    Comparator::new(options).collect(left, right)
}

/// The first difference between two trees (verification mode)
pub fn first_difference(left: &Value, right: &Value, options: &DiffOptions) -> Option<ChangeRecord> {
    Comparator::new(options).first_difference(left, right)
}
