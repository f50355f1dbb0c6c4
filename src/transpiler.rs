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

//! # Transpiler
//!
//! Runs the three passes over a grammar source:
//!
//! 1. [`CtxNestedEvaluator`] resolves specifications below the root symbols.
//! 2. [`collect`] binds the modifiers of the root specifications.
//! 3. [`CtxRootLoader`] loads root data into the store and rewrites the
//!    grammar to strings and arrays.
//!
//! Each run builds its own environment and data store.

use std::sync::Arc;

use log::{debug, info};
use serde_json::{Map, Value};

use crate::environment::{CtxConfig, CtxEnvironment};
use crate::errors::Result;
use crate::evaluate::CtxNestedEvaluator;
use crate::loader::CtxRootLoader;
use crate::lookup::CtxDataLookup;
use crate::modifier::{collect, CtxModifierSet, CtxSlugs};
use crate::module::CtxModuleRegistry;
use crate::modules::corpora::CtxCorpusProvider;

/// Output of a run: a grammar holding only strings and arrays, and the
/// modifiers it refers to.
#[derive(Clone, Debug)]
pub struct CtxTranspiled {
    pub grammar: Map<String, Value>,
    pub modifiers: CtxModifierSet,
}

/// Runs the three passes over a source grammar.
#[derive(Clone, Debug, Default)]
pub struct CtxTranspiler {
    config: CtxConfig,
    registry: CtxModuleRegistry,
}

impl CtxTranspiler {
    pub fn new(config: CtxConfig) -> Self {
        Self {
            config,
            registry: CtxModuleRegistry::default(),
        }
    }

    /// Backs the `corpora` module with `corpus`.
    pub fn with_corpus(mut self, corpus: Arc<dyn CtxCorpusProvider>) -> Self {
        self.registry = CtxModuleRegistry::new(corpus);
        self
    }

    /// Replaces the module registry.
    pub fn with_registry(mut self, registry: CtxModuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &CtxConfig {
        &self.config
    }

    pub fn registry(&self) -> &CtxModuleRegistry {
        &self.registry
    }

    /// Transpiles `source`. Only a switch without a matching branch, or an
    /// invalid configured date, fails the run; every other problem is logged
    /// and leaves a placeholder behind.
    pub async fn transpile(&self, source: &Map<String, Value>) -> Result<CtxTranspiled> {
        let environment = Arc::new(CtxEnvironment::build(&self.config)?);
        debug!(
            "ctxa.transpile.start: run started - symbols={}, instant={}",
            source.len(),
            environment.instant().to_rfc3339()
        );

        let evaluated = CtxNestedEvaluator::new(&environment, &self.registry)
            .evaluate_source(source)
            .await?;

        let slugs = CtxSlugs::assign(evaluated.keys().map(String::as_str))?;
        let store = CtxDataLookup::shared();
        let modifiers = collect(
            &evaluated,
            &slugs,
            environment.clone(),
            store.clone(),
            &self.registry,
        );

        let grammar = CtxRootLoader::new(&environment, &self.registry, &store, &slugs)
            .load(&evaluated)
            .await?;

        info!(
            "ctxa.transpile.done: run finished - symbols={}, productions={}, modifiers={}",
            source.len(),
            grammar.len(),
            modifiers.len()
        );
        Ok(CtxTranspiled { grammar, modifiers })
    }
}

/// Transpiles `source` with `config` and the default module registry.
pub async fn transpile(source: &Map<String, Value>, config: CtxConfig) -> Result<CtxTranspiled> {
    CtxTranspiler::new(config).transpile(source).await
}
