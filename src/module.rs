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

//! # Ctxa Module Layer
//!
//! A module is one of the built-in providers a specification can name with
//! its `"!::"` tag. Modules expose up to three capabilities:
//!
//! - [`CtxDataProvider`]: loads a value for a symbol (may suspend).
//! - [`CtxModifierProvider`]: transforms a resolved value, synchronously.
//! - [`CtxFilterProvider`]: derives a value from the specification's `"data"`
//!   field (may suspend).
//!
//! The module set is closed: [`CtxModule`] has one variant per built-in
//! module and capability lookup is an exhaustive `match`, so adding a module
//! means adding a variant.
//!
//! All capabilities return `Option<Value>`; `None` is the "undefined" result
//! that removes a nested node from its parent.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::environment::CtxEnvironment;
use crate::errors::{CtxError, Result};
use crate::modules::corpora::{CtxCorporaModule, CtxCorpusProvider, CtxStaticCorpus};
use crate::modules::data::CtxDataModule;
use crate::modules::date::CtxDateModule;
use crate::modules::environment::CtxEnvironmentModule;
use crate::modules::path::CtxPathModule;
use crate::modules::switch::CtxSwitchModule;
use crate::specification::{self, DATA_TAG};

/// Loads the value a specification describes.
#[async_trait]
pub trait CtxDataProvider: Send + Sync {
    /// Loads the value of `config` for the symbol or path `key`.
    async fn data(
        &self,
        key: &str,
        config: &Map<String, Value>,
        environment: &CtxEnvironment,
    ) -> Result<Option<Value>>;
}

/// Transforms an already resolved value.
pub trait CtxModifierProvider: Send + Sync {
    /// Transforms `value` as configured by `config`.
    fn modify(
        &self,
        value: &Value,
        environment: &CtxEnvironment,
        key: &str,
        config: &Map<String, Value>,
    ) -> Result<Option<Value>>;
}

/// Derives a value from the data chained into a specification.
#[async_trait]
pub trait CtxFilterProvider: Send + Sync {
    /// Derives a value from `data`, the resolved `"data"` field of `config`.
    async fn filter(
        &self,
        key: &str,
        config: &Map<String, Value>,
        data: &Value,
        environment: &CtxEnvironment,
    ) -> Result<Option<Value>>;
}

/// The built-in modules.
#[derive(Clone, Debug)]
pub enum CtxModule {
    Corpora(CtxCorporaModule),
    Data(CtxDataModule),
    Date(CtxDateModule),
    Switch(CtxSwitchModule),
    Environment(CtxEnvironmentModule),
    Path(CtxPathModule),
}

impl CtxModule {
    /// Tag a specification uses to name this module.
    pub fn name(&self) -> &'static str {
        match self {
            CtxModule::Corpora(_) => "corpora",
            CtxModule::Data(_) => "data",
            CtxModule::Date(_) => "date",
            CtxModule::Switch(_) => "switch",
            CtxModule::Environment(_) => "environment",
            CtxModule::Path(_) => "path",
        }
    }

    /// Data function of the module, if it loads values on its own.
    pub fn data_provider(&self) -> Option<&dyn CtxDataProvider> {
        match self {
            CtxModule::Corpora(module) => Some(module),
            CtxModule::Data(module) => Some(module),
            CtxModule::Date(module) => Some(module),
            CtxModule::Switch(module) => Some(module),
            CtxModule::Environment(module) => Some(module),
            CtxModule::Path(_) => None,
        }
    }

    /// Modifier function of the module, if it has one.
    pub fn modifier_provider(&self) -> Option<&dyn CtxModifierProvider> {
        match self {
            CtxModule::Date(module) => Some(module),
            CtxModule::Switch(module) => Some(module),
            CtxModule::Path(module) => Some(module),
            CtxModule::Corpora(_) | CtxModule::Data(_) | CtxModule::Environment(_) => None,
        }
    }

    /// Filter function of the module, used when a specification chains data
    /// into it.
    pub fn filter_provider(&self) -> Option<&dyn CtxFilterProvider> {
        match self {
            CtxModule::Path(module) => Some(module),
            _ => None,
        }
    }

    /// Modifier the default transform runs on this module's loaded data.
    /// Only modules whose data is the input of their own modifier have one.
    pub fn data_renderer(&self) -> Option<&dyn CtxModifierProvider> {
        match self {
            CtxModule::Date(module) => Some(module),
            CtxModule::Corpora(_)
            | CtxModule::Data(_)
            | CtxModule::Switch(_)
            | CtxModule::Environment(_)
            | CtxModule::Path(_) => None,
        }
    }

    /// Whether `spec` makes this module load a value: it has a data function,
    /// or a filter function and a `"data"` field to filter.
    pub fn produces_data(&self, spec: &Map<String, Value>) -> bool {
        self.data_provider().is_some()
            || (self.filter_provider().is_some() && spec.contains_key(DATA_TAG))
    }

    /// Loads the value of `spec` through the data function, or through the
    /// filter function applied to the `"data"` field.
    pub async fn load(
        &self,
        key: &str,
        spec: &Map<String, Value>,
        environment: &CtxEnvironment,
    ) -> Result<Option<Value>> {
        if let Some(provider) = self.data_provider() {
            return provider.data(key, spec, environment).await;
        }
        match (self.filter_provider(), spec.get(DATA_TAG)) {
            (Some(provider), Some(data)) => provider.filter(key, spec, data, environment).await,
            _ => Err(CtxError::data_load(
                key,
                format!("module '{}' cannot load data", self.name()),
            )),
        }
    }

    /// Applies the module's modifier, if it has one.
    pub fn apply(
        &self,
        value: &Value,
        environment: &CtxEnvironment,
        key: &str,
        spec: &Map<String, Value>,
    ) -> Result<Option<Value>> {
        match self.modifier_provider() {
            Some(provider) => provider.modify(value, environment, key, spec),
            None => Err(CtxError::modifier_apply(
                key,
                format!("module '{}' has no modifier", self.name()),
            )),
        }
    }
}

/// Registry of the built-in modules, keyed by tag.
#[derive(Clone, Debug)]
pub struct CtxModuleRegistry {
    modules: Vec<CtxModule>,
}

impl Default for CtxModuleRegistry {
    fn default() -> Self {
        Self::new(Arc::new(CtxStaticCorpus::new()))
    }
}

impl CtxModuleRegistry {
    /// Creates the registry; `corpus` backs the `corpora` module.
    pub fn new(corpus: Arc<dyn CtxCorpusProvider>) -> Self {
        CtxModuleRegistry {
            modules: vec![
                CtxModule::Corpora(CtxCorporaModule::new(corpus)),
                CtxModule::Data(CtxDataModule),
                CtxModule::Date(CtxDateModule),
                CtxModule::Switch(CtxSwitchModule),
                CtxModule::Environment(CtxEnvironmentModule),
                CtxModule::Path(CtxPathModule),
            ],
        }
    }

    /// Module registered under `tag`.
    pub fn get(&self, tag: &str) -> Option<&CtxModule> {
        self.modules.iter().find(|module| module.name() == tag)
    }

    /// Like [`get`](Self::get) but reports unknown tags as errors.
    pub fn require(&self, tag: &str) -> Result<&CtxModule> {
        self.get(tag)
            .ok_or_else(|| CtxError::UnknownModule(tag.to_string()))
    }

    /// Resolves `node` to its module and specification. Objects without a
    /// tag, or with a tag nobody registered, are plain objects.
    pub fn resolve<'a>(&'a self, node: &'a Value) -> Option<(&'a CtxModule, &'a Map<String, Value>)> {
        let tag = specification::module_tag(node)?;
        let module = self.get(tag)?;
        Some((module, node.as_object()?))
    }

    /// Tags of every registered module, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.modules.iter().map(CtxModule::name).collect()
    }
}
