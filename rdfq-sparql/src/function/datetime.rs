//! DateTime function implementations
//!
//! Implements SPARQL datetime functions: NOW, YEAR, MONTH, DAY, HOURS,
//! MINUTES, SECONDS, TIMEZONE, TZ

use crate::ast::{Expression, FunctionName};
use crate::error::{EvalError, EvalResult};
use bigdecimal::BigDecimal;
use chrono::{Datelike, FixedOffset, NaiveDateTime, Timelike};
use num_bigint::BigInt;
use rdfq_graph_ir::Datatype;
use std::sync::Arc;

use super::eval::{evaluate, EvalContext};
use super::helpers::check_arity;
use super::value::ComparableValue;

/// An `xsd:dateTime`, with its timezone when one was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XsdDateTime {
    pub local: NaiveDateTime,
    pub offset: Option<FixedOffset>,
}

impl XsdDateTime {
    /// Parse `YYYY-MM-DDThh:mm:ss[.fff][Z|(+|-)hh:mm]`
    pub fn parse(text: &str) -> Option<Self> {
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(text) {
            return Some(Self {
                local: dt.naive_local(),
                offset: Some(*dt.offset()),
            });
        }
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|local| Self {
                local,
                offset: None,
            })
    }

    /// UTC instant used for ordering; values without a timezone are taken as UTC
    pub fn instant(&self) -> NaiveDateTime {
        match self.offset {
            Some(offset) => self.local - chrono::Duration::seconds(offset.local_minus_utc() as i64),
            None => self.local,
        }
    }
}

impl From<chrono::DateTime<FixedOffset>> for XsdDateTime {
    fn from(dt: chrono::DateTime<FixedOffset>) -> Self {
        Self {
            local: dt.naive_local(),
            offset: Some(*dt.offset()),
        }
    }
}

impl std::fmt::Display for XsdDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.local.format("%Y-%m-%dT%H:%M:%S%.f"))?;
        match self.offset {
            None => Ok(()),
            Some(offset) if offset.local_minus_utc() == 0 => f.write_str("Z"),
            Some(offset) => {
                let secs = offset.local_minus_utc();
                let sign = if secs < 0 { '-' } else { '+' };
                let secs = secs.abs();
                write!(f, "{}{:02}:{:02}", sign, secs / 3600, (secs % 3600) / 60)
            }
        }
    }
}

/// Evaluate a datetime function
pub fn eval_datetime_function(
    name: FunctionName,
    args: &[Expression],
    ctx: &EvalContext<'_>,
) -> EvalResult<ComparableValue> {
    if name == FunctionName::Now {
        check_arity(args, 0, "NOW")?;
        return Ok(ComparableValue::DateTime(ctx.now()));
    }

    check_arity(args, 1, name.as_str())?;
    let dt = match evaluate(&args[0], ctx)? {
        ComparableValue::DateTime(dt) => dt,
        other => {
            return Err(EvalError::type_error(format!(
                "{} expects xsd:dateTime, got {:?}",
                name, other
            )))
        }
    };

    let int = |n: i64| -> EvalResult<ComparableValue> { Ok(ComparableValue::Integer(BigInt::from(n))) };
    match name {
        FunctionName::Year => int(dt.local.year() as i64),
        FunctionName::Month => int(dt.local.month() as i64),
        FunctionName::Day => int(dt.local.day() as i64),
        FunctionName::Hours => int(dt.local.hour() as i64),
        FunctionName::Minutes => int(dt.local.minute() as i64),
        FunctionName::Seconds => {
            let nanos = BigInt::from(
                dt.local.second() as u64 * 1_000_000_000 + dt.local.nanosecond() as u64,
            );
            Ok(ComparableValue::Decimal(BigDecimal::new(nanos, 9)))
        }
        FunctionName::Timezone => match dt.offset {
            Some(offset) => Ok(ComparableValue::Typed {
                lexical: Arc::from(day_time_duration(offset.local_minus_utc())),
                datatype: Datatype::xsd_day_time_duration(),
            }),
            None => Err(EvalError::type_error("TIMEZONE of a dateTime without timezone")),
        },
        FunctionName::Tz => Ok(ComparableValue::string(match dt.offset {
            None => String::new(),
            Some(offset) if offset.local_minus_utc() == 0 => "Z".to_string(),
            Some(_) => {
                let text = dt.to_string();
                text[text.len() - 6..].to_string()
            }
        })),
        other => Err(EvalError::type_error(format!("{} is not a datetime function", other))),
    }
}

/// `xsd:dayTimeDuration` lexical form for an offset in seconds
fn day_time_duration(secs: i32) -> String {
    if secs == 0 {
        return "PT0S".to_string();
    }
    let sign = if secs < 0 { "-" } else { "" };
    let secs = secs.abs();
    let (hours, minutes) = (secs / 3600, (secs % 3600) / 60);
    let mut out = format!("{}PT", sign);
    if hours > 0 {
        out.push_str(&format!("{}H", hours));
    }
    if minutes > 0 {
        out.push_str(&format!("{}M", minutes));
    }
    out
}
