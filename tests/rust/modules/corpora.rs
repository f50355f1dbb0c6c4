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

use std::sync::Arc;

use ctxa::{CtxConfig, CtxDirectoryCorpus, CtxEnvironment, CtxError, CtxModuleRegistry, CtxStaticCorpus};
use serde_json::json;

fn env() -> CtxEnvironment {
    CtxEnvironment::build(&CtxConfig::new()).unwrap()
}

#[tokio::test]
async fn corpora_two_segment_path() {
    let corpus = CtxStaticCorpus::new().with_file("animals/common", json!({"animals": ["cat", ["dog", "eel"]]}));
    let registry = CtxModuleRegistry::new(Arc::new(corpus));
    let spec = json!({"!::": "corpora", "path": ["animals", "common"]});
    let out = registry
        .get("corpora")
        .unwrap()
        .load("pet", spec.as_object().unwrap(), &env())
        .await
        .unwrap();
    assert_eq!(out, Some(json!(["cat", "dog", "eel"])));
}

/// A third segment names the list inside the two-segment file first, then
/// a nested file.
#[tokio::test]
async fn corpora_three_segment_lookup_order() {
    let corpus = CtxStaticCorpus::new()
        .with_file("foods/menu", json!({"menu": ["soup"], "desserts": ["pie"]}))
        .with_file("words/nouns/places", json!({"places": ["harbor"]}));
    let registry = CtxModuleRegistry::new(Arc::new(corpus));
    let module = registry.get("corpora").unwrap();

    let spec = json!({"!::": "corpora", "path": ["foods", "menu", "desserts"]});
    let out = module.load("d", spec.as_object().unwrap(), &env()).await.unwrap();
    assert_eq!(out, Some(json!(["pie"])));

    let spec = json!({"!::": "corpora", "path": ["words", "nouns", "places"]});
    let out = module.load("p", spec.as_object().unwrap(), &env()).await.unwrap();
    assert_eq!(out, Some(json!(["harbor"])));
}

#[tokio::test]
async fn corpora_missing_or_malformed() {
    let corpus = CtxStaticCorpus::new().with_file("a/b", json!({"b": "not a list"}));
    let registry = CtxModuleRegistry::new(Arc::new(corpus));
    let module = registry.get("corpora").unwrap();

    for path in [json!(["a", "b"]), json!(["x", "y"]), json!(["only"]), json!(["a", "b", "c", "d"])] {
        let spec = json!({"!::": "corpora", "path": path});
        let err = module.load("k", spec.as_object().unwrap(), &env()).await.unwrap_err();
        assert!(matches!(err, CtxError::DataLoad { ref symbol, .. } if symbol == "k"));
        assert!(!err.is_fatal());
    }
}

#[tokio::test]
async fn corpora_directory_provider() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("colors")).unwrap();
    std::fs::write(
        dir.path().join("colors/crayola.json"),
        r#"{"description": "crayons", "colors": [{"color": "Red"}]}"#,
    )
    .unwrap();

    let registry = CtxModuleRegistry::new(Arc::new(CtxDirectoryCorpus::new(dir.path())));
    let spec = json!({"!::": "corpora", "path": ["colors", "crayola"]});
    let out = registry
        .get("corpora")
        .unwrap()
        .load("color", spec.as_object().unwrap(), &env())
        .await
        .unwrap();
    assert_eq!(out, Some(json!([{"color": "Red"}])));
}
