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

//! # Environment Module
//!
//! The environment is the immutable context every module sees during one
//! transpilation run: the caller's configuration values plus the resolved
//! current instant and a handful of calendar fields derived from it.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::errors::{CtxError, Result};

/// Environment key holding the resolved instant as an RFC 3339 string.
pub const DATE_KEY: &str = "date";

/// Caller-supplied configuration for a transpilation run.
///
/// `date` fixes the instant the run considers "now"; every other key is
/// carried verbatim into the environment.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CtxConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Value>,
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl CtxConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the instant of the run. Accepts RFC 3339 strings, `YYYY-MM-DD`
    /// dates and epoch milliseconds.
    pub fn date(mut self, date: impl Into<Value>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Sets an environment value, readable through the `environment` module.
    pub fn value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Reads a configuration record from JSON. Anything that is not an
    /// object yields the default configuration.
    pub fn from_json(value: &Value) -> CtxConfig {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

/// Immutable context record shared by all modules of one run.
#[derive(Clone, Debug)]
pub struct CtxEnvironment {
    instant: DateTime<Utc>,
    values: Map<String, Value>,
}

impl CtxEnvironment {
    /// Builds the environment for one run. Without a configured date the
    /// current instant is used.
    pub fn build(config: &CtxConfig) -> Result<Self> {
        let instant = match &config.date {
            Some(date) => parse_instant(date)?,
            None => Utc::now(),
        };
        Ok(Self::at(instant, config.values.clone()))
    }

    /// Builds an environment at a known instant.
    pub fn at(instant: DateTime<Utc>, mut values: Map<String, Value>) -> Self {
        values.insert(DATE_KEY.to_string(), json!(instant.to_rfc3339()));
        let year = instant.year();
        values.insert("dateYear".into(), json!(year));
        values.insert("dateYearOfCentury".into(), json!(year.rem_euclid(100)));
        values.insert("dateCentury".into(), json!(year.div_euclid(100)));
        values.insert("dateQuarter".into(), json!(instant.month0() / 3 + 1));
        values.insert("dateMonth".into(), json!(instant.month()));
        values.insert("dateDay".into(), json!(instant.day()));
        values.insert(
            "dateWeekday".into(),
            json!(instant.weekday().num_days_from_sunday()),
        );
        values.insert("dateHours".into(), json!(instant.hour()));
        values.insert("dateMinutes".into(), json!(instant.minute()));
        Self { instant, values }
    }

    /// Instant of the run.
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// Value stored under `key`, including the derived date fields.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }
}

/// Parses an instant from a configuration or specification value.
pub fn parse_instant(value: &Value) -> Result<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_instant_str(text),
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .ok_or_else(|| CtxError::validation(format!("invalid epoch milliseconds: {number}"))),
        other => Err(CtxError::validation(format!(
            "instant must be a string or number, got {other}"
        ))),
    }
}

fn parse_instant_str(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }
    Err(CtxError::validation(format!("unrecognized instant '{text}'")))
}
