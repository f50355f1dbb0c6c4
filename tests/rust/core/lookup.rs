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

use ctxa::lookup::{resolve_shared, stringify, CtxDataLookup};
use serde_json::json;

#[test]
fn lookup_empty_collection_gets_singleton_key() {
    let mut store = CtxDataLookup::new();
    let keys = store.add_items("x", json!([]));
    assert_eq!(keys, vec!["!x:!*"]);
    assert_eq!(store.get_item(&keys[0]), json!([]));
}

#[test]
fn lookup_scalars_are_singletons() {
    let mut store = CtxDataLookup::new();
    let keys = store.add_items("when", json!("2024-03-08T00:00:00+00:00"));
    assert_eq!(keys.len(), 1);
    assert_eq!(store.get_item(&keys[0]), json!("2024-03-08T00:00:00+00:00"));
}

#[test]
fn lookup_array_items_by_index() {
    let mut store = CtxDataLookup::new();
    let keys = store.add_items("animals", json!(["cat", "dog"]));
    assert_eq!(keys, vec!["!animals:!0", "!animals:!1"]);
    assert_eq!(store.get_item("!animals:!1"), json!("dog"));
}

/// Unresolvable keys come back as themselves.
#[test]
fn lookup_misses_degrade_to_key() {
    let mut store = CtxDataLookup::new();
    store.add_items("animals", json!(["cat"]));
    assert_eq!(store.get_item("!animals:!7"), json!("!animals:!7"));
    assert_eq!(store.get_item("!plants:!0"), json!("!plants:!0"));
    assert_eq!(store.get_item("just text"), json!("just text"));
}

#[test]
fn lookup_last_writer_wins() {
    let store = CtxDataLookup::shared();
    store.write().unwrap().add_items("n", json!([1]));
    store.write().unwrap().add_items("n", json!([2]));
    assert_eq!(resolve_shared(&store, "!n:!0"), json!(2));
    assert_eq!(store.read().unwrap().len(), 1);
}

#[test]
fn lookup_stringify_undefined_is_empty() {
    assert_eq!(stringify(None), "");
    assert_eq!(stringify(Some(&json!(["a", 1]))), r#"["a",1]"#);
}

#[test]
fn lookup_stringify_integral_floats_as_integers() {
    assert_eq!(stringify(Some(&json!(2.0))), "2");
    assert_eq!(stringify(Some(&json!(-3.0))), "-3");
    assert_eq!(stringify(Some(&json!(1.5))), "1.5");
    assert_eq!(stringify(Some(&json!([2.0, 1.5]))), "[2,1.5]");
    assert_eq!(stringify(Some(&json!({"n": 4.0}))), r#"{"n":4}"#);
    assert_eq!(stringify(Some(&json!(1e300))), "1e300");
}
