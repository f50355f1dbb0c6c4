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

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::environment::CtxEnvironment;
use crate::errors::{CtxError, Result};
use crate::module::CtxDataProvider;
use crate::specification::DATA_TAG;

/// Loads the value carried inline in the specification's `"data"` field.
#[derive(Clone, Copy, Debug, Default)]
pub struct CtxDataModule;

#[async_trait]
impl CtxDataProvider for CtxDataModule {
    async fn data(
        &self,
        key: &str,
        config: &Map<String, Value>,
        _environment: &CtxEnvironment,
    ) -> Result<Option<Value>> {
        config
            .get(DATA_TAG)
            .cloned()
            .map(Some)
            .ok_or_else(|| CtxError::data_load(key, "data: no 'data' field"))
    }
}
