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

//! # Date Module
//!
//! As a data source the module yields an instant: the specification's `value`
//! when present, otherwise the run's instant. As a modifier it reads its
//! input as an instant (falling back to the run's instant for empty input)
//! and extracts the component named by `method`, or renders `format`.
//!
//! All components are computed in UTC. Months are 1-based, `day` is the day
//! of the month and `weekday` counts from Sunday = 0.
//!
//! Format strings use day.js tokens:
//!
//! | Token | Output | Token | Output |
//! |---|---|---|---|
//! | `YYYY` | 2024 | `HH` / `H` | 09 / 9 |
//! | `YY` | 24 | `hh` / `h` | 09 / 9 (12-hour) |
//! | `MMMM` / `MMM` | March / Mar | `mm` / `m` | 05 / 5 |
//! | `MM` / `M` | 03 / 3 | `ss` / `s` | 07 / 7 |
//! | `DD` / `D` | 08 / 8 | `SSS` | milliseconds |
//! | `dddd` / `ddd` | Friday / Fri | `A` / `a` | PM / pm |
//! | `d` | weekday number | `Z` / `ZZ` | +00:00 / +0000 |
//!
//! Text inside `[...]` is copied verbatim.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde_json::{json, Map, Value};

use crate::environment::{parse_instant, CtxEnvironment};
use crate::errors::{CtxError, Result};
use crate::module::{CtxDataProvider, CtxModifierProvider};
use crate::specification::str_field;

/// en-US `toLocaleString` layout.
const LOCALE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

#[derive(Clone, Copy, Debug, Default)]
pub struct CtxDateModule;

#[async_trait]
impl CtxDataProvider for CtxDateModule {
    async fn data(
        &self,
        key: &str,
        config: &Map<String, Value>,
        environment: &CtxEnvironment,
    ) -> Result<Option<Value>> {
        let instant = match config.get("value") {
            Some(value) if !is_blank(value) => parse_instant(value)
                .map_err(|err| CtxError::data_load(key, format!("date: {err}")))?,
            _ => environment.instant(),
        };
        Ok(Some(json!(instant.to_rfc3339())))
    }
}

impl CtxModifierProvider for CtxDateModule {
    fn modify(
        &self,
        value: &Value,
        environment: &CtxEnvironment,
        key: &str,
        config: &Map<String, Value>,
    ) -> Result<Option<Value>> {
        let instant = if is_blank(value) {
            environment.instant()
        } else {
            parse_instant(value).map_err(|err| CtxError::modifier_apply(key, format!("date: {err}")))?
        };
        log::debug!(
            "ctxa.date.modify: applying date modifier - symbol={}, instant={}, method={:?}",
            key,
            instant.to_rfc3339(),
            str_field(config, "method")
        );
        Ok(Some(Value::String(render(
            instant,
            str_field(config, "method"),
            str_field(config, "format"),
        ))))
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

/// Renders one date component, a formatted string, or the locale string.
pub fn render(instant: DateTime<Utc>, method: Option<&str>, format: Option<&str>) -> String {
    match (method, format) {
        (Some("format"), Some(format)) | (None, Some(format)) => format_dayjs(instant, format),
        (Some(method), _) => component(instant, method)
            .unwrap_or_else(|| instant.format(LOCALE_FORMAT).to_string()),
        (None, None) => instant.format(LOCALE_FORMAT).to_string(),
    }
}

fn component(instant: DateTime<Utc>, method: &str) -> Option<String> {
    let year = instant.year();
    let rendered = match method {
        "YYYY" | "year" | "getFullYear" | "getUTCFullYear" => year.to_string(),
        "yearOfCentury" => year.rem_euclid(100).to_string(),
        "century" => year.div_euclid(100).to_string(),
        "quarter" => (instant.month0() / 3 + 1).to_string(),
        "MM" | "month" | "getMonth" | "getUTCMonth" => instant.month().to_string(),
        "DD" | "day" | "getDate" | "getUTCDate" => instant.day().to_string(),
        "weekday" | "getDay" | "getUTCDay" => instant.weekday().num_days_from_sunday().to_string(),
        "HH" | "hour" | "hours" | "getHours" | "getUTCHours" => instant.hour().to_string(),
        "mm" | "minute" | "minutes" | "getMinutes" | "getUTCMinutes" => {
            instant.minute().to_string()
        }
        "AM" | "PM" | "AMPM" => meridiem(instant).to_string(),
        _ => return None,
    };
    Some(rendered)
}

fn meridiem(instant: DateTime<Utc>) -> &'static str {
    match (instant.hour(), instant.minute()) {
        (0, 0) => "midnight",
        (12, 0) => "noon",
        (hour, _) if hour < 12 => "AM",
        _ => "PM",
    }
}

/// Longest tokens first so `MMMM` wins over `MM`.
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("MMMM", "%B"),
    ("dddd", "%A"),
    ("SSS", "%3f"),
    ("MMM", "%b"),
    ("ddd", "%a"),
    ("YY", "%y"),
    ("MM", "%m"),
    ("DD", "%d"),
    ("HH", "%H"),
    ("hh", "%I"),
    ("mm", "%M"),
    ("ss", "%S"),
    ("ZZ", "%z"),
    ("M", "%-m"),
    ("D", "%-d"),
    ("d", "%w"),
    ("H", "%-H"),
    ("h", "%-I"),
    ("m", "%-M"),
    ("s", "%-S"),
    ("A", "%p"),
    ("a", "%P"),
    ("Z", "%:z"),
];

/// Formats `instant` with a day.js-style format string.
pub fn format_dayjs(instant: DateTime<Utc>, format: &str) -> String {
    instant.format(&dayjs_to_strftime(format)).to_string()
}

/// Translates day.js tokens into the strftime syntax chrono understands.
pub fn dayjs_to_strftime(format: &str) -> String {
    let mut out = String::with_capacity(format.len() * 2);
    let mut rest = format;
    'outer: while let Some(ch) = rest.chars().next() {
        if ch == '[' {
            if let Some(end) = rest.find(']') {
                push_literal(&mut out, &rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }
        for &(token, directive) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(directive);
                rest = tail;
                continue 'outer;
            }
        }
        push_literal(&mut out, &rest[..ch.len_utf8()]);
        rest = &rest[ch.len_utf8()..];
    }
    out
}

fn push_literal(out: &mut String, literal: &str) {
    for ch in literal.chars() {
        if ch == '%' {
            out.push_str("%%");
        } else {
            out.push(ch);
        }
    }
}
