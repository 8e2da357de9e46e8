//! Typed cell values and the uniform absence marker.
//!
//! Every cell in the pipeline is an `Option<Value>`: `None` is the single
//! "no value" representation used in place of the mixed empty-string /
//! NaN / null conventions found in the source files. Cleaners only ever
//! replace a cell with a typed value or with `None`, never with a
//! sentinel string.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Number;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
}

impl Value {
    /// Borrow the inner string when the value is textual.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => {
                if f.fract() == 0.0 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            Value::Boolean(b) => b.to_string(),
            Value::Date(d) => d.format(ISO_DATE_FORMAT).to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Parses a calendar date under the fixed disclosure-file format.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT).ok()
}

/// Coerces free text to a numeric value, integer first.
pub fn coerce_numeric(value: &str) -> Option<Value> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Some(Value::Integer(parsed));
    }
    trimmed.parse::<f64>().ok().map(Value::Float)
}

/// Converts a cell to the sink's JSON representation; absence becomes null.
pub fn cell_to_json(cell: Option<&Value>) -> serde_json::Value {
    match cell {
        None => serde_json::Value::Null,
        Some(Value::String(s)) => serde_json::Value::String(s.clone()),
        Some(Value::Integer(i)) => serde_json::Value::Number(Number::from(*i)),
        Some(Value::Float(f)) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Some(Value::Boolean(b)) => serde_json::Value::Bool(*b),
        Some(Value::Date(d)) => serde_json::Value::String(d.format(ISO_DATE_FORMAT).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parse_iso_date_accepts_only_the_fixed_format() {
        let expected = NaiveDate::from_ymd_opt(2016, 2, 3).unwrap();
        assert_eq!(parse_iso_date("2016-02-03"), Some(expected));
        assert_eq!(parse_iso_date(" 2016-02-03 "), Some(expected));
        assert_eq!(parse_iso_date("02/03/2016"), None);
        assert_eq!(parse_iso_date("2016"), None);
    }

    #[test]
    fn coerce_numeric_prefers_integers() {
        assert_eq!(coerce_numeric("42"), Some(Value::Integer(42)));
        assert_eq!(coerce_numeric("42.5"), Some(Value::Float(42.5)));
        assert_eq!(coerce_numeric("n/a"), None);
        assert_eq!(coerce_numeric(""), None);
    }

    #[test]
    fn cell_to_json_maps_absence_to_null() {
        assert_eq!(cell_to_json(None), serde_json::Value::Null);
        let date = Value::Date(NaiveDate::from_ymd_opt(2020, 1, 31).unwrap());
        assert_eq!(cell_to_json(Some(&date)), serde_json::json!("2020-01-31"));
        assert_eq!(
            cell_to_json(Some(&Value::Boolean(true))),
            serde_json::json!(true)
        );
    }

    #[test]
    fn float_display_drops_integral_fraction() {
        assert_eq!(Value::Float(7.0).as_display(), "7");
        assert_eq!(Value::Float(7.25).as_display(), "7.25");
    }
}
