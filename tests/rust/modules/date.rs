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

use chrono::{TimeZone, Utc};
use ctxa::modules::date::{format_dayjs, render};
use ctxa::{CtxConfig, CtxEnvironment, CtxModuleRegistry};
use serde_json::json;

fn instant() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 8, 18, 5, 9).unwrap()
}

#[test]
fn date_component_methods() {
    let at = instant();
    assert_eq!(render(at, Some("year"), None), "2024");
    assert_eq!(render(at, Some("yearOfCentury"), None), "24");
    assert_eq!(render(at, Some("century"), None), "20");
    assert_eq!(render(at, Some("quarter"), None), "1");
    assert_eq!(render(at, Some("month"), None), "3");
    assert_eq!(render(at, Some("day"), None), "8");
    assert_eq!(render(at, Some("weekday"), None), "5");
    assert_eq!(render(at, Some("hours"), None), "18");
    assert_eq!(render(at, Some("minutes"), None), "5");
    assert_eq!(render(at, Some("AMPM"), None), "PM");
}

#[test]
fn date_unknown_method_uses_locale_string() {
    assert_eq!(render(instant(), Some("toLocaleString"), None), "3/8/2024, 6:05:09 PM");
    assert_eq!(render(instant(), None, None), "3/8/2024, 6:05:09 PM");
}

#[test]
fn date_format_tokens() {
    let at = instant();
    assert_eq!(format_dayjs(at, "YYYY-MM-DD HH:mm:ss"), "2024-03-08 18:05:09");
    assert_eq!(format_dayjs(at, "dddd, MMMM D"), "Friday, March 8");
    assert_eq!(format_dayjs(at, "[Year] YY"), "Year 24");
    assert_eq!(render(at, Some("format"), Some("h:mm A")), "6:05 PM");
    assert_eq!(render(at, None, Some("MMM")), "Mar");
}

#[tokio::test]
async fn date_module_data_then_modifier() {
    let env = CtxEnvironment::build(&CtxConfig::new().date("2024-03-08T18:05:09Z")).unwrap();
    let registry = CtxModuleRegistry::default();
    let module = registry.get("date").unwrap();

    let spec = json!({"!::": "date", "method": "month"});
    let spec = spec.as_object().unwrap();
    let loaded = module.load("when", spec, &env).await.unwrap().unwrap();
    assert_eq!(loaded, json!("2024-03-08T18:05:09+00:00"));
    assert_eq!(module.apply(&loaded, &env, "when", spec).unwrap(), Some(json!("3")));

    let fixed = json!({"!::": "date", "value": "1999-12-31"});
    let loaded = module.load("when", fixed.as_object().unwrap(), &env).await.unwrap();
    assert_eq!(loaded, Some(json!("1999-12-31T00:00:00+00:00")));
}

#[test]
fn date_modifier_blank_input_uses_environment_instant() {
    let env = CtxEnvironment::build(&CtxConfig::new().date("2030-06-01T00:00:00Z")).unwrap();
    let registry = CtxModuleRegistry::default();
    let spec = json!({"!::": "date", "method": "year"});
    let out = registry
        .get("date")
        .unwrap()
        .apply(&json!(""), &env, "when", spec.as_object().unwrap())
        .unwrap();
    assert_eq!(out, Some(json!("2030")));
}
