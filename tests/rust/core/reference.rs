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

use ctxa::reference::{decode, encode, SINGLETON_ITEM_KEY};
use proptest::prelude::*;

#[test]
fn reference_encode_shape() {
    assert_eq!(encode("animals", Some("3")), "!animals:!3");
    assert_eq!(encode("animals", None), format!("!animals:!{SINGLETON_ITEM_KEY}"));
}

#[test]
fn reference_decode_rejects_malformed_keys() {
    for key in ["animals:!3", "!animals:3", "!:!3", "!animals:!", "!a:!b:!c", "plain text", ""] {
        assert_eq!(decode(key), None, "key {key:?}");
    }
}

proptest! {
    #[test]
    fn reference_round_trip(collection in "[A-Za-z0-9-]{1,16}", item in "[A-Za-z0-9-]{1,16}") {
        let key = encode(&collection, Some(&item));
        prop_assert_eq!(decode(&key), Some((collection, item)));
    }
}
