//! Column-selector-driven cleaning passes applied to each batch.
//!
//! Every pass picks its columns by name (keyword fragment or explicit
//! allow-list, never position) and rewrites cells through the uniform
//! `Option<Value>` absence marker. A coercion that fails always degrades to
//! absence, never to a wrong-typed or truncated value.

use log::debug;

use crate::{
    data::{self, Value},
    dataset::Dataset,
    mappings,
    parents::ParentLookup,
    transform::string_ops,
};

/// Runs all cleaning passes over one batch, in declared order.
pub fn clean_batch(batch: &mut Dataset, parents: &ParentLookup) {
    apply_title_case(batch);
    apply_email_lowercase(batch);
    apply_uppercase(batch);
    apply_date_normalization(batch);
    apply_phone_normalization(batch);
    apply_numeric_coercion(batch);
    apply_boolean_normalization(batch);
    apply_currency_sentinel(batch);
    derive_parent_company(batch, parents);
}

/// Title-cases name, address, and title fields.
pub fn apply_title_case(batch: &mut Dataset) {
    let selected = batch.select_columns(|name| {
        contains_any(name, mappings::TITLE_CASE_KEYWORDS)
            || mappings::TITLE_CASE_COLUMNS.contains(&name)
    });
    for name in selected {
        batch.map_column(&name, |cell| {
            map_string(cell, |s| Some(Value::String(string_ops::title_case(s))))
        });
    }
}

/// Lowercases email addresses.
pub fn apply_email_lowercase(batch: &mut Dataset) {
    let selected = batch.select_columns(|name| name.contains(mappings::EMAIL_KEYWORD));
    for name in selected {
        batch.map_column(&name, |cell| {
            map_string(cell, |s| {
                Some(Value::String(string_ops::lowercase(s).into_owned()))
            })
        });
    }
}

/// Uppercases state codes and middle initials, except the court-name column.
pub fn apply_uppercase(batch: &mut Dataset) {
    let selected = batch.select_columns(|name| {
        contains_any(name, mappings::UPPER_CASE_KEYWORDS)
            && name != mappings::UPPER_CASE_EXCEPTION
    });
    for name in selected {
        batch.map_column(&name, |cell| {
            map_string(cell, |s| {
                Some(Value::String(string_ops::uppercase(s).into_owned()))
            })
        });
    }
}

/// Parses date-like columns under the fixed ISO input format.
///
/// Already-typed dates pass through untouched, which makes the pass
/// idempotent; anything unparseable becomes absence.
pub fn apply_date_normalization(batch: &mut Dataset) {
    let selected = batch.select_columns(|name| {
        contains_any(name, mappings::DATE_KEYWORDS) || mappings::DATE_COLUMNS.contains(&name)
    });
    for name in selected {
        batch.map_column(&name, |cell| match cell {
            Some(Value::Date(d)) => Some(Value::Date(d)),
            Some(Value::String(s)) => data::parse_iso_date(&s).map(Value::Date),
            _ => None,
        });
    }
}

/// Normalizes US phone numbers to E.164; failures become absence.
pub fn apply_phone_normalization(batch: &mut Dataset) {
    let selected = batch.select_columns(|name| {
        name.contains(mappings::PHONE_KEYWORD)
            && !name.contains(mappings::PHONE_EXTENSION_KEYWORD)
    });
    for name in selected {
        batch.map_column(&name, |cell| {
            cell.and_then(|value| format_us_phone(&value.as_display()).map(Value::String))
        });
    }
}

/// Coerces count, code, and tracking-number columns to numbers.
pub fn apply_numeric_coercion(batch: &mut Dataset) {
    let selected = batch.select_columns(|name| {
        contains_any(name, mappings::NUMERIC_KEYWORDS) || mappings::NUMERIC_COLUMNS.contains(&name)
    });
    for name in selected {
        batch.map_column(&name, |cell| match cell {
            Some(Value::Integer(i)) => Some(Value::Integer(i)),
            Some(Value::Float(f)) => Some(Value::Float(f)),
            Some(other) => data::coerce_numeric(&other.as_display()),
            None => None,
        });
    }
}

/// Maps the fixed yes/no spellings onto booleans for the flag columns.
pub fn apply_boolean_normalization(batch: &mut Dataset) {
    let selected = batch.select_columns(|name| mappings::BOOLEAN_COLUMNS.contains(&name));
    for name in selected {
        batch.map_column(&name, |cell| match cell {
            Some(Value::Boolean(b)) => Some(Value::Boolean(b)),
            Some(Value::String(s)) => parse_flag(&s).map(Value::Boolean),
            _ => None,
        });
    }
}

/// Blanks wage/rate values carrying the `#` "not meaningful" marker.
///
/// Everything else passes through unchanged; no numeric parsing happens
/// here; the remaining amounts stay as published.
pub fn apply_currency_sentinel(batch: &mut Dataset) {
    let selected =
        batch.select_columns(|name| contains_any(name, mappings::CURRENCY_KEYWORDS));
    for name in selected {
        batch.map_column(&name, |cell| match cell {
            Some(Value::String(s)) if s.contains(mappings::CURRENCY_SENTINEL) => None,
            other => other,
        });
    }
}

/// Derives the parent-company label from the employer name.
pub fn derive_parent_company(batch: &mut Dataset, parents: &ParentLookup) {
    let labels = match batch.column(mappings::EMPLOYER_NAME_COLUMN) {
        Some(employers) => employers
            .iter()
            .map(|cell| {
                cell.as_ref()
                    .and_then(Value::as_str)
                    .and_then(|name| parents.match_label(name))
                    .map(|label| Value::String(label.to_string()))
            })
            .collect(),
        None => {
            debug!(
                "Column '{}' not present; parent labels left absent",
                mappings::EMPLOYER_NAME_COLUMN
            );
            vec![None; batch.row_count()]
        }
    };
    batch.remove_column(mappings::PARENT_EMPLOYER_COLUMN);
    batch.push_column(mappings::PARENT_EMPLOYER_COLUMN, labels);
}

fn contains_any(name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| name.contains(keyword))
}

fn map_string<F>(cell: Option<Value>, f: F) -> Option<Value>
where
    F: FnOnce(&str) -> Option<Value>,
{
    match cell {
        Some(Value::String(s)) => f(&s),
        other => other,
    }
}

/// US-region phone normalization: strip formatting, require ten national
/// digits (an optional leading country `1` is accepted), emit E.164.
fn format_us_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|ch| ch.is_ascii_digit()).collect();
    let national = match digits.len() {
        10 => digits.as_str(),
        11 if digits.starts_with('1') => &digits[1..],
        _ => return None,
    };
    Some(format!("+1{national}"))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "Y" | "y" | "Yes" | "YES" | "yes" | "True" | "TRUE" | "true" => Some(true),
        "N" | "n" | "No" | "NO" | "no" | "False" | "FALSE" | "false" => Some(false),
        _ => None,
    }
}
