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

//! # Reference-Key Codec
//!
//! A reference key addresses one item of a loaded collection from inside
//! grammar text: `!<collection>:!<item>`. Collections without enumerable
//! items are addressed through the singleton item key.

/// Item key naming a whole collection that has no enumerable items.
pub const SINGLETON_ITEM_KEY: &str = "*";

const PREFIX: char = '!';
const DELIMITER: &str = ":!";

/// Encodes a `(collection, item)` address. A missing item encodes the
/// singleton key.
pub fn encode(collection_key: &str, item_key: Option<&str>) -> String {
    format!(
        "{PREFIX}{collection_key}{DELIMITER}{}",
        item_key.unwrap_or(SINGLETON_ITEM_KEY)
    )
}

/// Decodes a reference key. Anything other than exactly two non-empty
/// segments around a single delimiter yields `None`.
pub fn decode(key: &str) -> Option<(String, String)> {
    let body = key.strip_prefix(PREFIX)?;
    let (collection_key, item_key) = body.split_once(DELIMITER)?;
    if collection_key.is_empty() || item_key.is_empty() || item_key.contains(DELIMITER) {
        return None;
    }
    Some((collection_key.to_string(), item_key.to_string()))
}
