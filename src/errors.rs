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

//! # Ctxa Error Module
//!
//! This module defines the error types used throughout the transpiler.
//!
//! ## Error Categories
//!
//! - **DataLoad**: a module's data or filter function failed. Recovered by the
//!   evaluator and the root loader with a visible placeholder.
//! - **ModifierApply**: a modifier function failed. Recovered; the value is
//!   passed through unmodified.
//! - **NoMatchingBranch**: a switch exhausted its branches without a default.
//!   This is the only fatal error of a transpilation run.
//! - **UnknownModule**: a modifier specification names a tag that is not
//!   registered. Logged and ignored.
//! - **Validation**, **Io**, **Serde**, **Internal**: configuration and
//!   grammar-source problems reported to the caller.
//!
//! ## Usage
//!
//! ```rust
//! use ctxa::errors::{Result, CtxError};
//!
//! fn require_path(config: &serde_json::Value) -> Result<&str> {
//!     config
//!         .get("path")
//!         .and_then(serde_json::Value::as_str)
//!         .ok_or_else(|| CtxError::validation("missing 'path'"))
//! }
//! ```

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout Ctxa.
pub type Result<T> = std::result::Result<T, CtxError>;

/// Canonical error enumeration for Ctxa.
#[derive(Clone, Debug, Error, PartialEq, Serialize, Deserialize)]
pub enum CtxError {
    /// A data or filter function could not produce a value for a symbol.
    #[error("could not load data for '{symbol}': {message}")]
    DataLoad { symbol: String, message: String },

    /// A modifier function could not transform a value.
    #[error("modifier for '{symbol}' failed: {message}")]
    ModifierApply { symbol: String, message: String },

    /// A switch found neither a matching case nor a default branch.
    #[error("no branch matches {expression}")]
    NoMatchingBranch { expression: String },

    /// A specification names a module tag missing from the registry.
    #[error("unknown module '{0}'")]
    UnknownModule(String),

    /// Validation errors triggered by invalid configuration or grammar sources.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for CtxError {
    fn from(err: io::Error) -> Self {
        CtxError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CtxError {
    fn from(err: serde_json::Error) -> Self {
        CtxError::Serde(err.to_string())
    }
}

#[cfg(feature = "yaml")]
impl From<serde_yaml::Error> for CtxError {
    fn from(err: serde_yaml::Error) -> Self {
        CtxError::Serde(err.to_string())
    }
}

impl CtxError {
    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        CtxError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct data loading errors.
    pub fn data_load(symbol: impl Into<String>, message: impl Into<String>) -> Self {
        CtxError::DataLoad {
            symbol: symbol.into(),
            message: message.into(),
        }
    }

    /// Helper to construct modifier errors.
    pub fn modifier_apply(symbol: impl Into<String>, message: impl Into<String>) -> Self {
        CtxError::ModifierApply {
            symbol: symbol.into(),
            message: message.into(),
        }
    }

    /// Helper to construct switch exhaustion errors.
    pub fn no_matching_branch(expression: impl Into<String>) -> Self {
        CtxError::NoMatchingBranch {
            expression: expression.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        CtxError::Internal(message.into())
    }

    /// Whether the error must abort the whole transpilation instead of
    /// degrading to a placeholder.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CtxError::NoMatchingBranch { .. })
    }
}
