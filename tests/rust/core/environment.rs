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

use ctxa::environment::parse_instant;
use ctxa::{CtxConfig, CtxEnvironment};
use serde_json::json;

#[test]
fn environment_derives_calendar_fields() {
    let config = CtxConfig::new().date("2024-03-08T18:30:00Z");
    let env = CtxEnvironment::build(&config).unwrap();
    assert_eq!(env.get("date"), Some(&json!("2024-03-08T18:30:00+00:00")));
    assert_eq!(env.get("dateYear"), Some(&json!(2024)));
    assert_eq!(env.get("dateYearOfCentury"), Some(&json!(24)));
    assert_eq!(env.get("dateCentury"), Some(&json!(20)));
    assert_eq!(env.get("dateQuarter"), Some(&json!(1)));
    assert_eq!(env.get("dateMonth"), Some(&json!(3)));
    assert_eq!(env.get("dateDay"), Some(&json!(8)));
    assert_eq!(env.get("dateWeekday"), Some(&json!(5)));
    assert_eq!(env.get("dateHours"), Some(&json!(18)));
    assert_eq!(env.get("dateMinutes"), Some(&json!(30)));
}

#[test]
fn environment_keeps_caller_values() {
    let config = CtxConfig::new().date("2024-01-01").value("weather", "rain");
    let env = CtxEnvironment::build(&config).unwrap();
    assert_eq!(env.get("weather"), Some(&json!("rain")));
}

#[test]
fn environment_config_from_json() {
    let config = CtxConfig::from_json(&json!({"date": 0, "city": "Oslo"}));
    let env = CtxEnvironment::build(&config).unwrap();
    assert_eq!(env.instant().timestamp(), 0);
    assert_eq!(env.get("city"), Some(&json!("Oslo")));

    let fallback = CtxConfig::from_json(&json!("not a record"));
    assert!(fallback.date.is_none());
    assert!(fallback.values.is_empty());
}

#[test]
fn environment_rejects_bad_dates() {
    assert!(CtxEnvironment::build(&CtxConfig::new().date("yesterday")).is_err());
    assert!(parse_instant(&json!(1709922600000i64)).is_ok());
}
