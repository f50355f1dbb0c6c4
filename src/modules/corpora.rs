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

//! # Corpora Module
//!
//! Loads a word list from a corpus of JSON files laid out like the corpora
//! project (`<category>/<name>.json`, each file an object holding one or
//! more lists). The specification names the list with 2 or 3 segments:
//!
//! ```json
//! { "!::": "corpora", "path": ["animals", "common"] }
//! { "!::": "corpora", "path": ["foods", "fruits", "fruits"] }
//! ```
//!
//! The file `<p0>/<p1>` is tried first, looking up the list under `p2`, `p0`
//! and then `p1`; after that the file `<p0>/<p1>/<p2>` is tried with the same
//! keys. The first list found is flattened one level.

use std::collections::HashMap;
use std::fmt;
#[cfg(feature = "fs-corpus")]
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::environment::CtxEnvironment;
use crate::errors::{CtxError, Result};
use crate::module::CtxDataProvider;

/// Source of corpus files. Storage is the provider's concern; the corpora
/// module only asks for a file by its path segments.
#[async_trait]
pub trait CtxCorpusProvider: Send + Sync {
    /// Returns the parsed file at `segments`, or `None` when it does not exist.
    async fn get_file(&self, segments: &[String]) -> Result<Option<Value>>;
}

/// In-memory corpus keyed by `/`-joined segments.
#[derive(Clone, Debug, Default)]
pub struct CtxStaticCorpus {
    files: HashMap<String, Value>,
}

impl CtxStaticCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the file at `path` (segments joined by `/`).
    pub fn with_file(mut self, path: impl Into<String>, contents: Value) -> Self {
        self.files.insert(path.into(), contents);
        self
    }
}

#[async_trait]
impl CtxCorpusProvider for CtxStaticCorpus {
    async fn get_file(&self, segments: &[String]) -> Result<Option<Value>> {
        Ok(self.files.get(&segments.join("/")).cloned())
    }
}

/// Corpus read from JSON files under a root directory.
#[cfg(feature = "fs-corpus")]
#[derive(Clone, Debug)]
pub struct CtxDirectoryCorpus {
    root: PathBuf,
}

#[cfg(feature = "fs-corpus")]
impl CtxDirectoryCorpus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn file_path(&self, segments: &[String]) -> Result<PathBuf> {
        let (last, dirs) = segments
            .split_last()
            .ok_or_else(|| CtxError::validation("corpus path may not be empty"))?;
        let mut path = self.root.clone();
        for segment in segments {
            if segment.is_empty() || segment == ".." || segment.contains(['/', '\\']) {
                return Err(CtxError::validation(format!(
                    "invalid corpus path segment '{segment}'"
                )));
            }
        }
        for dir in dirs {
            path.push(dir);
        }
        path.push(format!("{last}.json"));
        Ok(path)
    }
}

#[cfg(feature = "fs-corpus")]
#[async_trait]
impl CtxCorpusProvider for CtxDirectoryCorpus {
    async fn get_file(&self, segments: &[String]) -> Result<Option<Value>> {
        let path = self.file_path(segments)?;
        if !tokio::fs::try_exists(&path).await? {
            return Ok(None);
        }
        let text = tokio::fs::read_to_string(&path).await?;
        Ok(Some(serde_json::from_str(&text)?))
    }
}

/// The `corpora` module, backed by a [`CtxCorpusProvider`].
#[derive(Clone)]
pub struct CtxCorporaModule {
    corpus: Arc<dyn CtxCorpusProvider>,
}

impl fmt::Debug for CtxCorporaModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CtxCorporaModule").finish_non_exhaustive()
    }
}

impl CtxCorporaModule {
    pub fn new(corpus: Arc<dyn CtxCorpusProvider>) -> Self {
        Self { corpus }
    }

    async fn find_list(&self, segments: &[String]) -> Result<Option<Value>> {
        let mut files = vec![segments[..2].to_vec()];
        if segments.len() > 2 {
            files.push(segments[..3].to_vec());
        }
        for file in files {
            let Some(contents) = self.corpus.get_file(&file).await? else {
                continue;
            };
            let keys = segments.get(2).into_iter().chain(&segments[..2]);
            for key in keys {
                match contents.get(key) {
                    Some(Value::Null) | None => continue,
                    Some(found) => return Ok(Some(found.clone())),
                }
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl CtxDataProvider for CtxCorporaModule {
    async fn data(
        &self,
        key: &str,
        config: &Map<String, Value>,
        _environment: &CtxEnvironment,
    ) -> Result<Option<Value>> {
        let segments = config
            .get("path")
            .and_then(Value::as_array)
            .ok_or_else(|| CtxError::data_load(key, "corpora: no path specified"))?
            .iter()
            .map(|segment| {
                segment
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| CtxError::data_load(key, "corpora: path segments must be strings"))
            })
            .collect::<Result<Vec<_>>>()?;
        if !(2..=3).contains(&segments.len()) {
            return Err(CtxError::data_load(
                key,
                format!("corpora: expected 2 or 3 path segments, got {}", segments.len()),
            ));
        }

        let list = self
            .find_list(&segments)
            .await
            .map_err(|err| CtxError::data_load(key, format!("corpora: {err}")))?
            .ok_or_else(|| {
                CtxError::data_load(key, format!("corpora: nothing found for {}", segments.join("/")))
            })?;

        match list {
            Value::Array(items) => Ok(Some(Value::Array(flatten_once(items)))),
            other => Err(CtxError::data_load(
                key,
                format!("corpora: {} is not a list but {other}", segments.join("/")),
            )),
        }
    }
}

fn flatten_once(items: Vec<Value>) -> Vec<Value> {
    items
        .into_iter()
        .flat_map(|item| match item {
            Value::Array(inner) => inner,
            single => vec![single],
        })
        .collect()
}
