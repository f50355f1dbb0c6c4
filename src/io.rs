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

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::{Map, Value};

use crate::errors::{CtxError, Result};

/// Grammar file formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CtxGrammarFormat {
    Json,
    #[cfg(feature = "yaml")]
    Yaml,
}

/// Reading and writing grammar files.
pub struct CtxGrammarIO;

impl CtxGrammarIO {
    /// Infers the format from the file extension.
    pub fn detect_format(path: impl AsRef<Path>) -> Option<CtxGrammarFormat> {
        let ext = path
            .as_ref()
            .extension()?
            .to_string_lossy()
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(CtxGrammarFormat::Json),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Some(CtxGrammarFormat::Yaml),
            _ => None,
        }
    }

    /// Parses grammar text. The document root must be a mapping.
    pub fn parse(text: &str, format: CtxGrammarFormat) -> Result<Map<String, Value>> {
        let value: Value = match format {
            CtxGrammarFormat::Json => serde_json::from_str(text)?,
            #[cfg(feature = "yaml")]
            CtxGrammarFormat::Yaml => serde_yaml::from_str(text)?,
        };
        match value {
            Value::Object(map) => Ok(map),
            other => Err(CtxError::validation(format!(
                "grammar root must be a mapping, got {}",
                kind(&other)
            ))),
        }
    }

    pub fn load(path: impl AsRef<Path>, format: CtxGrammarFormat) -> Result<Map<String, Value>> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text, format)
    }

    /// Loads a grammar file, inferring its format from the extension.
    pub fn load_auto(path: impl AsRef<Path>) -> Result<Map<String, Value>> {
        let format = Self::detect_format(&path)
            .ok_or_else(|| CtxError::validation("unable to detect grammar format from extension"))?;
        Self::load(path, format)
    }

    /// Writes a grammar as pretty-printed JSON.
    pub fn write_json(path: impl AsRef<Path>, grammar: &Map<String, Value>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, grammar)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
