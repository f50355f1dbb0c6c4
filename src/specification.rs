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

//! Field names that turn a grammar object into a specification.

use serde_json::{Map, Value};

/// Field naming the module a specification belongs to.
pub const MODULE_TAG: &str = "!::";

/// Field carrying the input of a filter module.
pub const DATA_TAG: &str = "data";

/// Field carrying a nested modifier specification.
pub const MODIFIER_TAG: &str = "modifier";

/// Returns the module tag of `node` when it is a specification object.
pub fn module_tag(node: &Value) -> Option<&str> {
    node.as_object()?.get(MODULE_TAG)?.as_str()
}

/// Returns the nested modifier specification of a specification object.
pub fn modifier_spec(spec: &Map<String, Value>) -> Option<&Map<String, Value>> {
    spec.get(MODIFIER_TAG)?.as_object()
}

/// Reads an optional string field from a specification.
pub fn str_field<'a>(spec: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    spec.get(field).and_then(Value::as_str)
}

/// Stand-in production for a symbol whose data could not be loaded.
pub fn placeholder(key: &str) -> String {
    format!("((!!{key}!!))")
}
