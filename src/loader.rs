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

//! # Root Data Loader
//!
//! Last pass of a run. Loads the data of every root specification into the
//! store and rewrites the grammar so that only strings and arrays remain:
//!
//! ```text
//! "some number": { "!::": "data", "data": { "one": 1, "two": 2 } }
//! ```
//!
//! becomes
//!
//! ```text
//! "some number": "#!*some_number!.!&transform_some_number#",
//! "!*some_number!": ["!some number:!one", "!some number:!two"]
//! ```

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::environment::CtxEnvironment;
use crate::errors::{CtxError, Result};
use crate::lookup::CtxSharedLookup;
use crate::modifier::CtxSlugs;
use crate::module::{CtxModule, CtxModuleRegistry};
use crate::specification;

/// Third pass: loads root data and rewrites root symbols.
pub struct CtxRootLoader<'a> {
    environment: &'a CtxEnvironment,
    registry: &'a CtxModuleRegistry,
    store: &'a CtxSharedLookup,
    slugs: &'a CtxSlugs,
}

impl<'a> CtxRootLoader<'a> {
    pub fn new(
        environment: &'a CtxEnvironment,
        registry: &'a CtxModuleRegistry,
        store: &'a CtxSharedLookup,
        slugs: &'a CtxSlugs,
    ) -> Self {
        Self {
            environment,
            registry,
            store,
            slugs,
        }
    }

    /// Produces the plain grammar for `source`.
    pub async fn load(&self, source: &Map<String, Value>) -> Result<Map<String, Value>> {
        let mut grammar = Map::with_capacity(source.len());
        for (symbol, production) in source {
            match self.registry.resolve(production) {
                Some((module, spec)) if module.produces_data(spec) => {
                    self.load_symbol(&mut grammar, symbol, module, spec).await?;
                }
                Some(_) => {
                    debug!("ctxa.loader.skip: modifier-only symbol dropped - symbol={}", symbol);
                }
                None => {
                    if let Some(value) = self.normalize(production) {
                        grammar.insert(symbol.clone(), value);
                    }
                }
            }
        }
        Ok(grammar)
    }

    async fn load_symbol(
        &self,
        grammar: &mut Map<String, Value>,
        symbol: &str,
        module: &CtxModule,
        spec: &Map<String, Value>,
    ) -> Result<()> {
        let loaded = match module.load(symbol, spec, self.environment).await {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!("ctxa.loader.undefined: data is undefined, symbol removed - symbol={}", symbol);
                return Ok(());
            }
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!(
                    "ctxa.loader.load_failed: could not load data - symbol={}, module={}, error={}",
                    symbol,
                    module.name(),
                    err
                );
                Value::String(specification::placeholder(symbol))
            }
        };

        let keys = self
            .store
            .write()
            .map_err(|_| CtxError::internal("data store lock poisoned"))?
            .add_items(symbol, loaded);

        let (Some(index), Some(transform)) = (self.slugs.index_key(symbol), self.slugs.transform_name(symbol))
        else {
            return Err(CtxError::internal(format!("no slug assigned to '{symbol}'")));
        };
        debug!(
            "ctxa.loader.register: data registered - symbol={}, index={}, items={}",
            symbol,
            index,
            keys.len()
        );
        grammar.insert(symbol.to_string(), Value::String(format!("#{index}.{transform}#")));
        grammar.insert(index, Value::Array(keys.into_iter().map(Value::String).collect()));
        Ok(())
    }

    /// Reduces a production to strings and arrays. Returns `None` for values
    /// the expansion engine cannot use.
    pub fn normalize(&self, production: &Value) -> Option<Value> {
        match production {
            Value::Null => None,
            Value::String(_) => Some(production.clone()),
            Value::Bool(_) | Value::Number(_) => Some(Value::String(production.to_string())),
            Value::Array(items) => Some(Value::Array(
                items.iter().filter_map(|item| self.normalize(item)).collect(),
            )),
            Value::Object(_) if self.registry.resolve(production).is_some() => None,
            Value::Object(_) => Some(Value::String(production.to_string())),
        }
    }
}
