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

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ctxa::{
    CtxConfig, CtxCorpusProvider, CtxEnvironment, CtxModuleRegistry, CtxNestedEvaluator,
    CtxStaticCorpus, CtxTranspiler, Result,
};
use serde_json::{json, Value};

/// Corpus that records the order in which files are requested.
struct RecordingCorpus {
    inner: CtxStaticCorpus,
    calls: Mutex<Vec<String>>,
}

impl RecordingCorpus {
    fn new() -> Self {
        RecordingCorpus {
            inner: CtxStaticCorpus::new()
                .with_file("inner/names", json!({"names": ["list", "other"]}))
                .with_file("outer/list", json!({"list": ["o1", "o2"]})),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CtxCorpusProvider for RecordingCorpus {
    async fn get_file(&self, segments: &[String]) -> Result<Option<Value>> {
        self.calls.lock().unwrap().push(segments.join("/"));
        self.inner.get_file(segments).await
    }
}

fn nested_source() -> Value {
    json!({
        "story": [
            "#x#",
            {
                "!::": "corpora",
                "path": [
                    "outer",
                    {
                        "!::": "corpora",
                        "path": ["inner", "names"],
                        "modifier": {"!::": "path", "path": "[0]"}
                    }
                ],
                "modifier": {"!::": "path", "path": "[1]"}
            }
        ]
    })
}

#[tokio::test]
async fn evaluate_children_before_parents() {
    let corpus = Arc::new(RecordingCorpus::new());
    let registry = CtxModuleRegistry::new(corpus.clone());
    let env = CtxEnvironment::build(&CtxConfig::new()).unwrap();
    let source = nested_source();

    let evaluated = CtxNestedEvaluator::new(&env, &registry)
        .evaluate_source(source.as_object().unwrap())
        .await
        .unwrap();

    assert_eq!(corpus.calls(), vec!["inner/names", "outer/list"]);
    assert_eq!(Value::Object(evaluated), json!({"story": ["#x#", "o2"]}));
}

#[tokio::test]
async fn evaluate_nested_data_stays_out_of_store() {
    let corpus = Arc::new(RecordingCorpus::new());
    let out = CtxTranspiler::new(CtxConfig::new())
        .with_corpus(corpus.clone())
        .transpile(nested_source().as_object().unwrap())
        .await
        .unwrap();

    assert_eq!(out.grammar["story"], json!(["#x#", "o2"]));
    assert!(out.grammar.keys().all(|key| !key.starts_with("!*")));
}

#[tokio::test]
async fn evaluate_filter_reads_resolved_data() {
    let env = CtxEnvironment::build(&CtxConfig::new().value("profile", json!({"name": "Ada"}))).unwrap();
    let registry = CtxModuleRegistry::default();
    let source = json!({
        "greeting": [
            "hello",
            {"!::": "path", "path": ".name", "data": {"!::": "environment", "key": "profile"}}
        ]
    });
    let evaluated = CtxNestedEvaluator::new(&env, &registry)
        .evaluate_source(source.as_object().unwrap())
        .await
        .unwrap();
    assert_eq!(evaluated["greeting"], json!(["hello", "Ada"]));
}

/// An unknown modifier tag leaves the loaded value unchanged.
#[tokio::test]
async fn evaluate_unknown_modifier_is_ignored() {
    let env = CtxEnvironment::build(&CtxConfig::new()).unwrap();
    let registry = CtxModuleRegistry::default();
    let source = json!({
        "n": [{"!::": "data", "data": 7, "modifier": {"!::": "math", "expression": "x*2"}}]
    });
    let evaluated = CtxNestedEvaluator::new(&env, &registry)
        .evaluate_source(source.as_object().unwrap())
        .await
        .unwrap();
    assert_eq!(evaluated["n"], json!([7]));
}

/// Specifications inside a `"modifier"` are resolved before the modifier runs.
#[tokio::test]
async fn evaluate_nested_modifier_sees_resolved_config() {
    let env = CtxEnvironment::build(&CtxConfig::new().value("city", "Oslo")).unwrap();
    let registry = CtxModuleRegistry::default();
    let source = json!({
        "line": [
            "in ",
            {
                "!::": "data",
                "data": "a",
                "modifier": {
                    "!::": "switch",
                    "select": [{"case": "a", "then": {"!::": "environment", "key": "city"}}]
                }
            }
        ]
    });
    let evaluated = CtxNestedEvaluator::new(&env, &registry)
        .evaluate_source(source.as_object().unwrap())
        .await
        .unwrap();
    assert_eq!(evaluated["line"], json!(["in ", "Oslo"]));
}
