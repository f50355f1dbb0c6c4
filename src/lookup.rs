//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Ctxa.
//! The Ctxa project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Data Lookup Store
//!
//! Owns the collections loaded for root symbols during one run and resolves
//! reference keys back to the items they name. Lookups never fail: a key
//! that cannot be resolved comes back as itself so the expansion engine
//! always has something printable.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::reference::{self, SINGLETON_ITEM_KEY};

/// Handle to the store of one run, shared with that run's modifier closures.
pub type CtxSharedLookup = Arc<RwLock<CtxDataLookup>>;

/// Collections of one run, keyed by collection key.
#[derive(Clone, Debug, Default)]
pub struct CtxDataLookup {
    collections: HashMap<String, Value>,
}

impl CtxDataLookup {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store behind a fresh handle.
    pub fn shared() -> CtxSharedLookup {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Registers `collection` under `collection_key`, replacing any previous
    /// registration, and returns one reference key per item.
    pub fn add_items(&mut self, collection_key: &str, collection: Value) -> Vec<String> {
        let keys = item_keys(collection_key, &collection);
        self.collections
            .insert(collection_key.to_string(), collection);
        keys
    }

    /// Resolves a reference key to the item it names, or returns the key
    /// itself when it does not resolve.
    pub fn get_item(&self, key: &str) -> Value {
        self.resolve(key)
            .unwrap_or_else(|| Value::String(key.to_string()))
    }

    /// Whether a collection is registered under `collection_key`.
    pub fn contains(&self, collection_key: &str) -> bool {
        self.collections.contains_key(collection_key)
    }

    /// Number of registered collections.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Whether no collection has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    fn resolve(&self, key: &str) -> Option<Value> {
        let (collection_key, item_key) = reference::decode(key)?;
        let collection = self.collections.get(&collection_key)?;
        if item_key == SINGLETON_ITEM_KEY {
            return Some(collection.clone());
        }
        match collection {
            Value::Array(items) => {
                let index: usize = item_key.parse().ok()?;
                items.get(index).cloned()
            }
            Value::Object(map) => map.get(&item_key).cloned(),
            _ => None,
        }
    }
}

fn item_keys(collection_key: &str, collection: &Value) -> Vec<String> {
    match collection {
        Value::Array(items) if !items.is_empty() => (0..items.len())
            .map(|index| reference::encode(collection_key, Some(&index.to_string())))
            .collect(),
        Value::Object(map) if !map.is_empty() => map
            .keys()
            .map(|item_key| reference::encode(collection_key, Some(item_key)))
            .collect(),
        _ => vec![reference::encode(collection_key, None)],
    }
}

/// Resolves `key` through a shared store. A poisoned lock degrades to the
/// unresolved key like any other miss.
pub fn resolve_shared(lookup: &CtxSharedLookup, key: &str) -> Value {
    match lookup.read() {
        Ok(store) => store.get_item(key),
        Err(_) => {
            log::error!("ctxa.lookup.poisoned: data store lock poisoned - key={}", key);
            Value::String(key.to_string())
        }
    }
}

/// Default transform: strings pass through, everything else becomes its
/// JSON encoding. Undefined becomes the empty string. Floats with no
/// fractional part print as integers, so `2.0` renders as `2`.
pub fn stringify(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => integral_floats(other).to_string(),
    }
}

/// Largest magnitude below which every integer is exact in an `f64`.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

fn integral_floats(value: &Value) -> Value {
    match value {
        Value::Number(number) if number.is_f64() => match number.as_f64() {
            Some(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < MAX_EXACT_FLOAT => {
                Value::from(x as i64)
            }
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(integral_floats).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, child)| (key.clone(), integral_floats(child)))
                .collect(),
        ),
        other => other.clone(),
    }
}
