//! Dynamic records.
//!
//! Maps keyed by field name stand in for records whose shape is only known at
//! runtime. Their patch is a map of the same type; patch keys overwrite or
//! insert top-level entries and everything else is carried over.

use crate::patch::Patchable;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// A JSON object used as store state.
pub type Record = Map<String, Value>;

impl Patchable for Map<String, Value> {
    type Patch = Map<String, Value>;

    fn apply_patch(&mut self, patch: Self::Patch) {
        for (key, value) in patch {
            self.insert(key, value);
        }
    }
}

impl Patchable for Value {
    type Patch = Map<String, Value>;

    /// Shallow-merge into an object. Any other JSON value is replaced by the
    /// patch itself, as an object.
    fn apply_patch(&mut self, patch: Self::Patch) {
        match self {
            Value::Object(fields) => fields.apply_patch(patch),
            other => *other = Value::Object(patch),
        }
    }
}

impl<K, V> Patchable for BTreeMap<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    type Patch = BTreeMap<K, V>;

    fn apply_patch(&mut self, patch: Self::Patch) {
        self.extend(patch);
    }
}

impl<K, V, S> Patchable for HashMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: std::hash::BuildHasher + Clone,
{
    type Patch = HashMap<K, V, S>;

    fn apply_patch(&mut self, patch: Self::Patch) {
        self.extend(patch);
    }
}
