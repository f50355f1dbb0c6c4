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

//! # Ctxa Core Library
//!
//! Ctxa transpiles "context-aware" grammars into plain grammars that an
//! unextended text-expansion engine can walk, together with a set of named
//! modifier functions the engine calls while expanding.
//!
//! A context-aware grammar maps symbols to productions. Besides literals
//! and lists of alternatives, a production may be a specification object
//! tagged with `"!::"` that names a built-in module: a data source (corpus
//! word lists, inline data, dates, environment values, switches) and/or a
//! modifier.
//!
//! ## Module Overview
//!
//! - **environment**: run configuration and the immutable environment record
//! - **reference**: the `!<collection>:!<item>` reference-key codec
//! - **lookup**: the per-run data store behind the reference keys
//! - **module** / **modules**: capability traits and the built-in modules
//! - **evaluate**: resolves specifications nested below the root symbols
//! - **modifier**: modifier slugs, closures and the modifier set
//! - **loader**: loads root data and rewrites the grammar
//! - **transpiler**: runs the passes above
//! - **io**: grammar files in JSON or YAML
//!
//! ## Feature Flags
//!
//! - `yaml`: YAML grammar sources
//! - `fs-corpus`: corpus files read from a directory
//! - `full`: all of the above
//!
//! ## Quick Start
//!
//! ```rust
//! use ctxa::{CtxConfig, CtxTranspiler};
//! use serde_json::json;
//!
//! # async fn run() -> ctxa::Result<()> {
//! let source = json!({
//!     "origin": "#some number#",
//!     "some number": { "!::": "data", "data": { "one": 1, "two": 2 } }
//! });
//! let out = CtxTranspiler::new(CtxConfig::new())
//!     .transpile(source.as_object().unwrap())
//!     .await?;
//! assert_eq!(out.grammar["some number"], "#!*some_number!.!&transform_some_number#");
//! assert_eq!(out.modifiers.apply("!&transform_some_number", "!some number:!two")?, "2");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, CtxError>`. Data that fails to load is
//! logged and replaced by a placeholder; only a switch with no matching
//! branch fails a run.

pub mod environment;
pub mod errors;
pub mod evaluate;
pub mod io;
pub mod loader;
pub mod lookup;
pub mod modifier;
pub mod module;
pub mod modules;
pub mod reference;
pub mod specification;
pub mod transpiler;

pub use environment::{CtxConfig, CtxEnvironment};
pub use errors::{CtxError, Result};
pub use evaluate::CtxNestedEvaluator;
pub use io::{CtxGrammarFormat, CtxGrammarIO};
pub use loader::CtxRootLoader;
pub use lookup::{CtxDataLookup, CtxSharedLookup};
pub use modifier::{CtxModifierFn, CtxModifierSet, CtxSlugs, HTML_ENTITY, TRANSFORM};
pub use module::{
    CtxDataProvider, CtxFilterProvider, CtxModifierProvider, CtxModule, CtxModuleRegistry,
};
#[cfg(feature = "fs-corpus")]
pub use modules::corpora::CtxDirectoryCorpus;
pub use modules::corpora::{CtxCorpusProvider, CtxStaticCorpus};
pub use transpiler::{transpile, CtxTranspiled, CtxTranspiler};
