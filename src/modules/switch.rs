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

//! # Switch Module
//!
//! Selects the `then` value of the first branch of `select` whose `case`
//! matches an expression:
//!
//! ```json
//! {
//!   "!::": "switch",
//!   "expression": "b",
//!   "select": [
//!     { "case": "a", "then": 1 },
//!     { "case": ["b", "c"], "then": 2 },
//!     { "default": true, "then": 0 }
//!   ]
//! }
//! ```
//!
//! As a data source the expression is the `expression` field; as a modifier
//! it is the modifier's input. Scalar cases compare with loose equality
//! (`"1"` matches `1`); array cases match when they contain the expression.
//! Falling through every branch without a default is fatal.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::environment::CtxEnvironment;
use crate::errors::{CtxError, Result};
use crate::module::{CtxDataProvider, CtxModifierProvider};

#[derive(Clone, Copy, Debug, Default)]
pub struct CtxSwitchModule;

#[async_trait]
impl CtxDataProvider for CtxSwitchModule {
    async fn data(
        &self,
        _key: &str,
        config: &Map<String, Value>,
        _environment: &CtxEnvironment,
    ) -> Result<Option<Value>> {
        let expression = config.get("expression").unwrap_or(&Value::Null);
        select_consequent(config, expression)
    }
}

impl CtxModifierProvider for CtxSwitchModule {
    fn modify(
        &self,
        value: &Value,
        _environment: &CtxEnvironment,
        _key: &str,
        config: &Map<String, Value>,
    ) -> Result<Option<Value>> {
        select_consequent(config, value)
    }
}

/// Returns the `then` value of the branch selected by `expression`. A
/// selected branch without `then` yields `None`.
pub fn select_consequent(config: &Map<String, Value>, expression: &Value) -> Result<Option<Value>> {
    let branches = config
        .get("select")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let found = branches
        .iter()
        .find(|branch| branch.get("case").map_or(false, |case| case_matches(case, expression)))
        .or_else(|| {
            branches
                .iter()
                .find(|branch| branch.get("default").map_or(false, truthy))
        });

    match found {
        Some(branch) => Ok(branch.get("then").cloned()),
        None => Err(CtxError::no_matching_branch(expression.to_string())),
    }
}

fn case_matches(case: &Value, expression: &Value) -> bool {
    match case {
        Value::Array(options) => options.iter().any(|option| strict_eq(option, expression)),
        scalar => loose_eq(scalar, expression),
    }
}

fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Loose equality between JSON values: numbers and numeric strings compare
/// by value, booleans compare as 0 and 1, `null` only equals `null`.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Bool(x), other) => loose_eq(&Value::from(u8::from(*x)), other),
        (other, Value::Bool(y)) => loose_eq(other, &Value::from(u8::from(*y))),
        (Value::Number(_), Value::Number(_)) => strict_eq(a, b),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            match (to_number(s), n.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
        _ => a == b,
    }
}

fn to_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|value| !value.is_nan())
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(false, |x| x != 0.0 && !x.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
