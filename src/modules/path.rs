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
use crate::module::{CtxFilterProvider, CtxModifierProvider};
use crate::specification::str_field;

/// One step of a [`CtxValuePath`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CtxPathSegment {
    Key(String),
    Index(usize),
    /// `[]`: apply the rest of the path to every element.
    Each,
}

/// Query into a JSON value, written `.items[0].name`, `.["odd key"]` or
/// `.tags[]`. A lone `.` is the identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CtxValuePath {
    segments: Vec<CtxPathSegment>,
}

impl CtxValuePath {
    /// Parses a path expression. Unterminated or malformed brackets are
    /// validation errors.
    pub fn parse(path: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut chars = path.trim().chars();
        let mut key = String::new();

        while let Some(ch) = chars.next() {
            match ch {
                '.' => flush_key(&mut key, &mut segments),
                '[' => {
                    flush_key(&mut key, &mut segments);
                    let mut inner = String::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(c) => inner.push(c),
                            None => {
                                return Err(CtxError::validation(format!(
                                    "unterminated '[' in path '{path}'"
                                )))
                            }
                        }
                    }
                    segments.push(bracket_segment(inner.trim(), path)?);
                }
                c => key.push(c),
            }
        }
        flush_key(&mut key, &mut segments);
        Ok(Self { segments })
    }

    /// Parsed steps, in order.
    pub fn segments(&self) -> &[CtxPathSegment] {
        &self.segments
    }

    /// Returns the value at the path, or `None` when any step is missing.
    pub fn resolve(&self, value: &Value) -> Option<Value> {
        resolve_from(&self.segments, value)
    }
}

fn flush_key(key: &mut String, segments: &mut Vec<CtxPathSegment>) {
    let trimmed = key.trim();
    if !trimmed.is_empty() {
        segments.push(CtxPathSegment::Key(trimmed.to_string()));
    }
    key.clear();
}

fn bracket_segment(inner: &str, path: &str) -> Result<CtxPathSegment> {
    if inner.is_empty() {
        return Ok(CtxPathSegment::Each);
    }
    if let Ok(index) = inner.parse::<usize>() {
        return Ok(CtxPathSegment::Index(index));
    }
    let quoted = inner
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| CtxError::validation(format!("invalid bracket '[{inner}]' in path '{path}'")))?;
    Ok(CtxPathSegment::Key(quoted.to_string()))
}

fn resolve_from(segments: &[CtxPathSegment], value: &Value) -> Option<Value> {
    let Some((head, rest)) = segments.split_first() else {
        return Some(value.clone());
    };
    match head {
        CtxPathSegment::Key(key) => resolve_from(rest, value.as_object()?.get(key)?),
        CtxPathSegment::Index(index) => resolve_from(rest, value.as_array()?.get(*index)?),
        CtxPathSegment::Each => {
            let items: Box<dyn Iterator<Item = &Value> + '_> = match value {
                Value::Array(items) => Box::new(items.iter()),
                Value::Object(map) => Box::new(map.values()),
                _ => return None,
            };
            Some(Value::Array(
                items.filter_map(|item| resolve_from(rest, item)).collect(),
            ))
        }
    }
}

/// Reads structured data that reached a modifier as JSON text.
fn structured(value: &Value) -> Value {
    if let Value::String(text) = value {
        let trimmed = text.trim_start();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            if let Ok(parsed) = serde_json::from_str(text) {
                return parsed;
            }
        }
    }
    value.clone()
}

fn configured_path(config: &Map<String, Value>) -> Result<CtxValuePath> {
    let path = str_field(config, "path")
        .ok_or_else(|| CtxError::validation("path module requires string 'path'"))?;
    CtxValuePath::parse(path)
}

/// Queries structured values. As a filter it reads the specification's
/// `"data"` field; as a modifier it reads the resolved input.
#[derive(Clone, Copy, Debug, Default)]
pub struct CtxPathModule;

#[async_trait]
impl CtxFilterProvider for CtxPathModule {
    async fn filter(
        &self,
        key: &str,
        config: &Map<String, Value>,
        data: &Value,
        _environment: &CtxEnvironment,
    ) -> Result<Option<Value>> {
        let path = configured_path(config).map_err(|err| CtxError::data_load(key, err.to_string()))?;
        path.resolve(data)
            .map(Some)
            .ok_or_else(|| CtxError::data_load(key, "path: nothing at the configured path"))
    }
}

impl CtxModifierProvider for CtxPathModule {
    fn modify(
        &self,
        value: &Value,
        _environment: &CtxEnvironment,
        key: &str,
        config: &Map<String, Value>,
    ) -> Result<Option<Value>> {
        let path =
            configured_path(config).map_err(|err| CtxError::modifier_apply(key, err.to_string()))?;
        path.resolve(&structured(value))
            .map(Some)
            .ok_or_else(|| CtxError::modifier_apply(key, "path: nothing at the configured path"))
    }
}
