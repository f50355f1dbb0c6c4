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

use ctxa::{CtxConfig, CtxError, CtxGrammarFormat, CtxGrammarIO, CtxTranspiler};
use serde_json::json;

#[test]
fn io_load_json_keeps_symbol_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grammar.json");
    std::fs::write(&path, r#"{"zebra": "z", "apple": ["a", "b"], "mid": {"!::": "data", "data": 1}}"#).unwrap();

    let grammar = CtxGrammarIO::load_auto(&path).unwrap();
    let symbols: Vec<_> = grammar.keys().cloned().collect();
    assert_eq!(symbols, vec!["zebra", "apple", "mid"]);
}

#[test]
fn io_load_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grammar.yml");
    std::fs::write(
        &path,
        "origin: '#animal#'\nanimal:\n  '!::': corpora\n  path: [animals, common]\n",
    )
    .unwrap();

    assert_eq!(CtxGrammarIO::detect_format(&path), Some(CtxGrammarFormat::Yaml));
    let grammar = CtxGrammarIO::load_auto(&path).unwrap();
    assert_eq!(grammar["animal"], json!({"!::": "corpora", "path": ["animals", "common"]}));
}

#[test]
fn io_rejects_unknown_extensions_and_scalar_roots() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grammar.txt");
    std::fs::write(&path, "{}").unwrap();
    assert!(matches!(CtxGrammarIO::load_auto(&path), Err(CtxError::Validation { .. })));

    let err = CtxGrammarIO::parse("just a string", CtxGrammarFormat::Yaml).unwrap_err();
    assert!(matches!(err, CtxError::Validation { .. }));
    assert!(matches!(
        CtxGrammarIO::parse("{ not json", CtxGrammarFormat::Json),
        Err(CtxError::Serde(_))
    ));
}

#[tokio::test]
async fn io_write_transpiled_grammar() {
    let dir = tempfile::tempdir().unwrap();
    let source = json!({"origin": "#n#", "n": {"!::": "data", "data": [1]}});
    let out = CtxTranspiler::new(CtxConfig::new())
        .transpile(source.as_object().unwrap())
        .await
        .unwrap();

    let path = dir.path().join("out.json");
    CtxGrammarIO::write_json(&path, &out.grammar).unwrap();
    let written = CtxGrammarIO::load(&path, CtxGrammarFormat::Json).unwrap();
    assert_eq!(written, out.grammar);
    assert_eq!(written["!*n!"], json!(["!n:!0"]));
}
