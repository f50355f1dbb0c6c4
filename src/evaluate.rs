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

//! # Nested Data Evaluator
//!
//! First pass of a run. Walks every production depth-first and resolves the
//! specifications found below the root symbols: children are evaluated
//! before their parent, in document order, so a specification sees its
//! configuration with all nested data already loaded.
//!
//! The `"modifier"` field of a specification is walked for its own nested
//! specifications but is never loaded as data itself.
//!
//! Root symbols are left as specifications; the root loader resolves them
//! later and registers their data for the modifiers. Nothing in this pass
//! writes the data store.

use futures::future::{BoxFuture, FutureExt};
use log::{debug, warn};
use serde_json::{Map, Value};

use crate::environment::CtxEnvironment;
use crate::errors::Result;
use crate::module::{CtxModule, CtxModuleRegistry};
use crate::specification::{self, MODIFIER_TAG};

/// Depth at which a node stops being a root symbol.
const NESTED_DEPTH: usize = 2;

/// First-pass evaluator over one source grammar.
pub struct CtxNestedEvaluator<'a> {
    environment: &'a CtxEnvironment,
    registry: &'a CtxModuleRegistry,
}

impl<'a> CtxNestedEvaluator<'a> {
    pub fn new(environment: &'a CtxEnvironment, registry: &'a CtxModuleRegistry) -> Self {
        Self {
            environment,
            registry,
        }
    }

    /// Evaluates every root production of `source` in order. Symbols whose
    /// production evaluates to undefined are dropped.
    pub async fn evaluate_source(&self, source: &Map<String, Value>) -> Result<Map<String, Value>> {
        let mut evaluated = Map::with_capacity(source.len());
        for (symbol, production) in source {
            if let Some(value) = self.evaluate(production, vec![symbol.clone()]).await? {
                evaluated.insert(symbol.clone(), value);
            }
        }
        Ok(evaluated)
    }

    /// Evaluates `node` found at `path`. `Ok(None)` is the undefined result
    /// that removes the node from its parent.
    pub fn evaluate<'s>(
        &'s self,
        node: &'s Value,
        path: Vec<String>,
    ) -> BoxFuture<'s, Result<Option<Value>>> {
        async move {
            let tagged = self.registry.resolve(node);
            let resolved = match node {
                Value::Array(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    for (index, item) in items.iter().enumerate() {
                        if let Some(value) = self.evaluate(item, child_path(&path, &index.to_string())).await? {
                            out.push(value);
                        }
                    }
                    Value::Array(out)
                }
                Value::Object(fields) => {
                    let mut out = Map::with_capacity(fields.len());
                    for (field, child) in fields {
                        let at = child_path(&path, field);
                        let value = if field == MODIFIER_TAG && tagged.is_some() {
                            self.evaluate_modifier(child, at).await?
                        } else {
                            self.evaluate(child, at).await?
                        };
                        if let Some(value) = value {
                            out.insert(field.clone(), value);
                        }
                    }
                    Value::Object(out)
                }
                scalar => return Ok(Some(scalar.clone())),
            };

            let Some((module, original)) = tagged else {
                return Ok(Some(resolved));
            };
            if path.len() < NESTED_DEPTH || !module.produces_data(original) {
                return Ok(Some(resolved));
            }
            let config = match resolved {
                Value::Object(config) => config,
                other => return Ok(Some(other)),
            };

            let key = path.join(".");
            let loaded = self.load(module, &key, &config).await?;
            self.apply_modifier(&config, &key, loaded)
        }
        .boxed()
    }

    /// Resolves the configuration fields of a `"modifier"` specification.
    /// The modifier node itself is never loaded as data.
    async fn evaluate_modifier(&self, node: &Value, path: Vec<String>) -> Result<Option<Value>> {
        let Value::Object(fields) = node else {
            return Ok(Some(node.clone()));
        };
        let mut out = Map::with_capacity(fields.len());
        for (field, child) in fields {
            if let Some(value) = self.evaluate(child, child_path(&path, field)).await? {
                out.insert(field.clone(), value);
            }
        }
        Ok(Some(Value::Object(out)))
    }

    async fn load(
        &self,
        module: &CtxModule,
        key: &str,
        config: &Map<String, Value>,
    ) -> Result<Option<Value>> {
        debug!(
            "ctxa.evaluate.load: loading nested data - key={}, module={}",
            key,
            module.name()
        );
        match module.load(key, config, self.environment).await {
            Ok(value) => Ok(value),
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                warn!(
                    "ctxa.evaluate.load_failed: could not load nested data - key={}, module={}, error={}",
                    key,
                    module.name(),
                    err
                );
                Ok(Some(Value::String(specification::placeholder(key))))
            }
        }
    }

    /// Applies the resolved `"modifier"` specification of `config` to freshly
    /// loaded data. Failures other than fatal ones keep the data unchanged.
    fn apply_modifier(
        &self,
        config: &Map<String, Value>,
        key: &str,
        loaded: Option<Value>,
    ) -> Result<Option<Value>> {
        let Some(modifier) = specification::modifier_spec(config) else {
            return Ok(loaded);
        };
        let tag = modifier
            .get(specification::MODULE_TAG)
            .and_then(Value::as_str)
            .unwrap_or_default();
        let module = match self.registry.require(tag) {
            Ok(module) => module,
            Err(err) => {
                warn!(
                    "ctxa.evaluate.modifier_ignored: nested modifier ignored - key={}, error={}",
                    key, err
                );
                return Ok(loaded);
            }
        };

        let input = loaded.clone().unwrap_or(Value::Null);
        match module.apply(&input, self.environment, key, modifier) {
            Ok(value) => Ok(value),
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                warn!(
                    "ctxa.evaluate.modifier_failed: nested modifier failed - key={}, module={}, error={}",
                    key,
                    module.name(),
                    err
                );
                Ok(loaded)
            }
        }
    }
}

fn child_path(path: &[String], segment: &str) -> Vec<String> {
    let mut child = Vec::with_capacity(path.len() + 1);
    child.extend_from_slice(path);
    child.push(segment.to_string());
    child
}
