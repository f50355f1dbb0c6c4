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

//! # Modifier Collector
//!
//! Second pass of a run. Every root specification becomes one or two named
//! modifier closures the expansion engine can call on grammar text:
//!
//! - `!&transform_<slug>` for specifications that load data. The closure
//!   resolves a reference key through the store and turns the item into
//!   text: a `date` item is rendered by the date modifier, then the
//!   specification's own `"modifier"` runs, then the result is stringified.
//! - `!&<slug>` for specifications whose module has a modifier.
//!
//! The slug of a symbol is its name with every run of characters that are
//! neither letters nor decimal digits collapsed to `_`. Letters outside
//! ASCII are kept. Symbols that collapse to the same slug are
//! numbered `_2`, `_3`, ... in source order.
//!
//! Two modifiers are always present: [`TRANSFORM`], which resolves and
//! stringifies, and [`HTML_ENTITY`], which escapes its input as HTML
//! entities.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use regex::Regex;
use serde_json::{Map, Value};

use crate::environment::CtxEnvironment;
use crate::errors::{CtxError, Result};
use crate::lookup::{resolve_shared, stringify, CtxSharedLookup};
use crate::module::{CtxModule, CtxModuleRegistry};
use crate::specification;

/// Name of the global resolve-and-stringify modifier.
pub const TRANSFORM: &str = "!&transform";

/// Name of the HTML entity escaping modifier.
pub const HTML_ENTITY: &str = "htmlEntity";

const SLUG_PATTERN: &str = r"[^\p{Alphabetic}\p{Nd}]+";

/// A modifier as the expansion engine sees it.
pub type CtxModifierFn = Arc<dyn Fn(&str) -> Result<String> + Send + Sync>;

/// Slug bodies of a grammar's symbols, unique within the grammar.
#[derive(Clone, Debug, Default)]
pub struct CtxSlugs {
    bodies: HashMap<String, String>,
}

impl CtxSlugs {
    /// Assigns slug bodies to `symbols` in order.
    pub fn assign<'a>(symbols: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let pattern = Regex::new(SLUG_PATTERN).map_err(|err| CtxError::internal(err.to_string()))?;
        let mut used = HashSet::new();
        let mut bodies = HashMap::new();
        for symbol in symbols {
            let base = pattern.replace_all(symbol, "_").into_owned();
            let mut body = base.clone();
            let mut counter = 2;
            while !used.insert(body.clone()) {
                body = format!("{base}_{counter}");
                counter += 1;
            }
            bodies.insert(symbol.to_string(), body);
        }
        Ok(Self { bodies })
    }

    /// Slug body assigned to `symbol`.
    pub fn body(&self, symbol: &str) -> Option<&str> {
        self.bodies.get(symbol).map(String::as_str)
    }

    /// `!&<slug>`
    pub fn modifier_name(&self, symbol: &str) -> Option<String> {
        self.body(symbol).map(|body| format!("!&{body}"))
    }

    /// `!&transform_<slug>`
    pub fn transform_name(&self, symbol: &str) -> Option<String> {
        self.body(symbol).map(|body| format!("{TRANSFORM}_{body}"))
    }

    /// `!*<slug>!`, the symbol holding a collection's reference keys.
    pub fn index_key(&self, symbol: &str) -> Option<String> {
        self.body(symbol).map(|body| format!("!*{body}!"))
    }
}

/// Named modifiers produced by one run.
#[derive(Clone, Default)]
pub struct CtxModifierSet {
    modifiers: HashMap<String, CtxModifierFn>,
    order: Vec<String>,
}

impl fmt::Debug for CtxModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CtxModifierSet")
            .field("names", &self.order)
            .finish()
    }
}

impl CtxModifierSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name`, replacing an earlier binding of the same name.
    pub fn insert(&mut self, name: impl Into<String>, modifier: CtxModifierFn) {
        let name = name.into();
        if self.modifiers.insert(name.clone(), modifier).is_none() {
            self.order.push(name);
        }
    }

    /// Modifier bound to `name`.
    pub fn get(&self, name: &str) -> Option<&CtxModifierFn> {
        self.modifiers.get(name)
    }

    /// Whether a modifier is bound to `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.modifiers.contains_key(name)
    }

    /// Calls the modifier bound to `name`.
    pub fn apply(&self, name: &str, input: &str) -> Result<String> {
        let modifier = self
            .get(name)
            .ok_or_else(|| CtxError::modifier_apply(name, "no such modifier"))?;
        modifier(input)
    }

    /// Bound names in binding order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of bound modifiers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Escapes every character of `input` as `&\#x<hex>;`.
pub fn html_entity(input: &str) -> String {
    input
        .chars()
        .map(|ch| format!("&\\#x{:x};", u32::from(ch)))
        .collect()
}

/// Everything a closure needs to turn a reference key into text.
#[derive(Clone)]
struct CtxBinding {
    environment: Arc<CtxEnvironment>,
    store: CtxSharedLookup,
    module: CtxModule,
    symbol: String,
    spec: Map<String, Value>,
}

impl CtxBinding {
    /// Default transform of a data symbol.
    fn transform(&self, chained: Option<&(CtxModule, Map<String, Value>)>, input: &str) -> Result<String> {
        let resolved = resolve_shared(&self.store, input);
        let mut value = Some(resolved.clone());
        if let Some(renderer) = self.module.data_renderer() {
            value = match renderer.modify(&resolved, &self.environment, &self.symbol, &self.spec) {
                Ok(value) => value,
                Err(err) => return self.recover(err, &resolved),
            };
        }
        if let Some((module, config)) = chained {
            let input = value.clone().unwrap_or(Value::Null);
            value = match module.apply(&input, &self.environment, &self.symbol, config) {
                Ok(value) => value,
                Err(err) => return self.recover(err, &input),
            };
        }
        Ok(stringify(value.as_ref()))
    }

    /// Module modifier of a symbol.
    fn modify(&self, input: &str) -> Result<String> {
        let resolved = resolve_shared(&self.store, input);
        match self.module.apply(&resolved, &self.environment, &self.symbol, &self.spec) {
            Ok(value) => Ok(stringify(value.as_ref())),
            Err(err) => self.recover(err, &resolved),
        }
    }

    fn recover(&self, err: CtxError, value: &Value) -> Result<String> {
        if err.is_fatal() {
            return Err(err);
        }
        warn!(
            "ctxa.modifier.apply_failed: modifier failed, passing value through - symbol={}, module={}, error={}",
            self.symbol,
            self.module.name(),
            err
        );
        Ok(stringify(Some(value)))
    }
}

/// Builds the modifier set for `source`, whose nested data has already been
/// evaluated. Closures share `store` and see the root data once the loader
/// has registered it.
pub fn collect(
    source: &Map<String, Value>,
    slugs: &CtxSlugs,
    environment: Arc<CtxEnvironment>,
    store: CtxSharedLookup,
    registry: &CtxModuleRegistry,
) -> CtxModifierSet {
    let mut modifiers = CtxModifierSet::new();

    let global_store = store.clone();
    modifiers.insert(
        TRANSFORM,
        Arc::new(move |input: &str| -> Result<String> {
            Ok(stringify(Some(&resolve_shared(&global_store, input))))
        }),
    );
    modifiers.insert(
        HTML_ENTITY,
        Arc::new(|input: &str| -> Result<String> { Ok(html_entity(input)) }),
    );

    for (symbol, production) in source {
        let Some((module, spec)) = registry.resolve(production) else {
            continue;
        };
        let binding = CtxBinding {
            environment: environment.clone(),
            store: store.clone(),
            module: module.clone(),
            symbol: symbol.clone(),
            spec: spec.clone(),
        };

        if module.produces_data(spec) {
            if let Some(name) = slugs.transform_name(symbol) {
                let chained = chained_modifier(registry, symbol, spec);
                let binding = binding.clone();
                debug!(
                    "ctxa.modifier.bind: binding transform - symbol={}, name={}",
                    symbol, name
                );
                modifiers.insert(
                    name,
                    Arc::new(move |input: &str| binding.transform(chained.as_ref(), input)),
                );
            }
        }

        if module.modifier_provider().is_some() {
            if let Some(name) = slugs.modifier_name(symbol) {
                debug!(
                    "ctxa.modifier.bind: binding modifier - symbol={}, name={}",
                    symbol, name
                );
                modifiers.insert(name, Arc::new(move |input: &str| binding.modify(input)));
            }
        }
    }

    modifiers
}

fn chained_modifier(
    registry: &CtxModuleRegistry,
    symbol: &str,
    spec: &Map<String, Value>,
) -> Option<(CtxModule, Map<String, Value>)> {
    let config = specification::modifier_spec(spec)?;
    let tag = config
        .get(specification::MODULE_TAG)
        .and_then(Value::as_str)
        .unwrap_or_default();
    match registry.require(tag) {
        Ok(module) if module.modifier_provider().is_some() => Some((module.clone(), config.clone())),
        Ok(module) => {
            warn!(
                "ctxa.modifier.chain_ignored: module has no modifier - symbol={}, module={}",
                symbol,
                module.name()
            );
            None
        }
        Err(err) => {
            warn!(
                "ctxa.modifier.chain_ignored: modifier ignored - symbol={}, error={}",
                symbol, err
            );
            None
        }
    }
}
