//! Type coercion for request parameters.
//!
//! Every parser returns `Ok(None)` for a missing or null value and wraps any
//! coercion failure into [`ParseError`], so a handler can map all of them to
//! a single bad-request response.
//!
//! Applications add their own parsers by implementing [`ParamsParser`] on
//! their own type and building on [`ParamsParser::parse`]:
//!
//! ```rust
//! use sortscope_core::domain::params::{
//!     errors::ParseError, services::ParamsParser, value_objects::ParamValue,
//! };
//!
//! struct MoneyParams;
//!
//! impl ParamsParser for MoneyParams {}
//!
//! impl MoneyParams {
//!     fn parse_cents(&self, val: Option<&ParamValue>) -> Result<Option<i64>, ParseError> {
//!         self.parse(val, |v| {
//!             let amount: f64 = v.as_str().unwrap_or_default().parse().map_err(|_| "not a number")?;
//!             Ok::<_, &str>((amount * 100.0).round() as i64)
//!         })
//!     }
//! }
//!
//! let cents = MoneyParams.parse_cents(Some(&ParamValue::scalar("12.5"))).unwrap();
//! assert_eq!(cents, Some(1250));
//! ```

use std::fmt::Display;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use tracing::debug;

use super::{
    errors::ParseError,
    ports::{TimeZoneProvider, UtcZone},
    value_objects::ParamValue,
};

/// Values treated as `false` by [`ParamsParser::parse_boolean`].
const FALSE_VALUES: [&str; 7] = ["0", "f", "F", "false", "FALSE", "off", "OFF"];

/// Zone-less formats accepted by [`ParamsParser::parse_datetime`].
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

pub trait ParamsParser {
    /// Offset used for datetime values that carry none.
    fn time_zone(&self) -> FixedOffset {
        Utc.fix()
    }

    /// Runs `f` on a present value, wrapping its error into [`ParseError`].
    fn parse<T, E, F>(&self, val: Option<&ParamValue>, f: F) -> Result<Option<T>, ParseError>
    where
        F: FnOnce(&ParamValue) -> Result<T, E>,
        E: Display,
    {
        match val {
            None | Some(ParamValue::Null) => Ok(None),
            Some(value) => f(value).map(Some).map_err(|e| {
                debug!("failed to parse parameter {}: {}", value, e);
                ParseError::new(e.to_string(), value.clone())
            }),
        }
    }

    /// Parses each element of an array value. Returns `None` when `val` is
    /// not an array; null elements stay `None`.
    fn parse_array<T, E, F>(
        &self,
        val: Option<&ParamValue>,
        f: F,
    ) -> Result<Option<Vec<Option<T>>>, ParseError>
    where
        F: Fn(&ParamValue) -> Result<T, E>,
        E: Display,
    {
        let items = match val {
            Some(ParamValue::Array(items)) => items,
            _ => return Ok(None),
        };

        self.parse(val, |_| {
            items
                .iter()
                .map(|item| match item {
                    ParamValue::Null => Ok(None),
                    item => f(item).map(Some),
                })
                .collect::<Result<Vec<_>, E>>()
        })
    }

    fn parse_int(&self, val: Option<&ParamValue>) -> Result<Option<i64>, ParseError> {
        self.parse(val, to_int)
    }

    fn parse_int_array(
        &self,
        val: Option<&ParamValue>,
    ) -> Result<Option<Vec<Option<i64>>>, ParseError> {
        self.parse_array(val, to_int)
    }

    fn parse_float(&self, val: Option<&ParamValue>) -> Result<Option<f64>, ParseError> {
        self.parse(val, to_float)
    }

    fn parse_float_array(
        &self,
        val: Option<&ParamValue>,
    ) -> Result<Option<Vec<Option<f64>>>, ParseError> {
        self.parse_array(val, to_float)
    }

    fn parse_string(&self, val: Option<&ParamValue>) -> Result<Option<String>, ParseError> {
        self.parse(val, |v| scalar(v).map(str::to_string))
    }

    fn parse_string_array(
        &self,
        val: Option<&ParamValue>,
    ) -> Result<Option<Vec<Option<String>>>, ParseError> {
        self.parse_array(val, |v| scalar(v).map(str::to_string))
    }

    /// Blank values are `None`, the usual spellings of false are `false`,
    /// anything else is `true`.
    fn parse_boolean(&self, val: Option<&ParamValue>) -> Option<bool> {
        match val? {
            ParamValue::Null => None,
            ParamValue::Scalar(s) if s.is_empty() => None,
            ParamValue::Scalar(s) => Some(!FALSE_VALUES.contains(&s.as_str())),
            _ => Some(true),
        }
    }

    /// Accepts RFC 3339 timestamps, or a date/datetime without offset read
    /// in [`ParamsParser::time_zone`].
    fn parse_datetime(
        &self,
        val: Option<&ParamValue>,
    ) -> Result<Option<DateTime<FixedOffset>>, ParseError> {
        let zone = self.time_zone();
        self.parse(val, |v| -> Result<DateTime<FixedOffset>, String> {
            to_datetime(scalar(v)?, zone)
        })
    }

    /// Blank strings are `None`.
    fn parse_json(&self, val: Option<&ParamValue>) -> Result<Option<serde_json::Value>, ParseError> {
        self.parse(val, |v| -> Result<Option<serde_json::Value>, String> {
            let raw = scalar(v)?;
            if raw.trim().is_empty() {
                return Ok(None);
            }
            serde_json::from_str::<serde_json::Value>(raw)
                .map(Some)
                .map_err(|e| e.to_string())
        })
        .map(Option::flatten)
    }
}

/// Default parser. Zone-less datetimes are read in the offset supplied by `Z`.
#[derive(Debug, Clone, Default)]
pub struct Params<Z = UtcZone> {
    zone: Z,
}

impl Params {
    pub fn new() -> Self {
        Self { zone: UtcZone }
    }
}

impl<Z: TimeZoneProvider> Params<Z> {
    pub fn with_zone(zone: Z) -> Self {
        Self { zone }
    }
}

impl<Z: TimeZoneProvider> ParamsParser for Params<Z> {
    fn time_zone(&self) -> FixedOffset {
        self.zone.current_offset()
    }
}

fn scalar(value: &ParamValue) -> Result<&str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("expected a single value, got {value}"))
}

fn to_int(value: &ParamValue) -> Result<i64, String> {
    scalar(value)?.trim().parse::<i64>().map_err(|e| e.to_string())
}

fn to_float(value: &ParamValue) -> Result<f64, String> {
    scalar(value)?.trim().parse::<f64>().map_err(|e| e.to_string())
}

fn to_datetime(raw: &str, zone: FixedOffset) -> Result<DateTime<FixedOffset>, String> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt);
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
        .ok_or_else(|| "Invalid datetime".to_string())?;

    zone.from_local_datetime(&naive)
        .single()
        .ok_or_else(|| "Invalid datetime".to_string())
}
