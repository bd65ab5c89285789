//! Conversion of raw cell strings into typed values.

use log::debug;
use snafu::prelude::*;
use std::collections::BTreeSet;

use crate::config::*;

/// Parses a raw cell according to the declared type of its column.
///
/// ```
/// use rank_model::{parse_value, DataType, ParsedValue, SortMode, Value};
///
/// let v = parse_value("1-3,5,2", DataType::IntRange, SortMode::Default)?;
/// assert_eq!(v, ParsedValue::List(vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(5)]));
/// let v = parse_value("5", DataType::IntRange, SortMode::Default)?;
/// assert_eq!(v, ParsedValue::Single(Value::Int(5)));
/// # Ok::<(), rank_model::ModelError>(())
/// ```
pub fn parse_value(raw: &str, data_type: DataType, sort: SortMode) -> ModelResult<ParsedValue> {
    match data_type {
        DataType::Int => parse_int(raw).map(ParsedValue::Single),
        DataType::IntRange => parse_int_range(raw),
        DataType::StrList => parse_str_list(raw, sort != SortMode::Preserve),
        DataType::LinkList => parse_str_list(raw, sort == SortMode::Sorted),
    }
}

/// Parses a cell of a column, typed or not, straight into its list of values.
pub fn parse_cell(raw: &str, data_type: Option<DataType>) -> ModelResult<Vec<Value>> {
    match data_type {
        Some(dt) => Ok(parse_value(raw, dt, SortMode::Default)?.into_values()),
        None => Ok(vec![Value::Str(raw.to_string())]),
    }
}

/// Parses an order definition. The order of the input is kept in all cases,
/// untyped columns being read as string lists.
pub fn parse_order(raw: &str, data_type: Option<DataType>) -> ModelResult<Vec<Value>> {
    let dt = data_type.unwrap_or(DataType::StrList);
    Ok(parse_value(raw, dt, SortMode::Preserve)?.into_values())
}

fn parse_int(raw: &str) -> ModelResult<Value> {
    parse_i64(raw).map(Value::Int)
}

fn parse_i64(raw: &str) -> ModelResult<i64> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .context(InvalidIntSnafu { raw: trimmed })
}

fn parse_int_range(raw: &str) -> ModelResult<ParsedValue> {
    let mut res: BTreeSet<i64> = BTreeSet::new();
    for token in raw.split(',') {
        if !token.contains('-') {
            res.insert(parse_i64(token)?);
            continue;
        }
        let bounds: Vec<&str> = token.split('-').collect();
        let (low, high) = match bounds.as_slice() {
            [low, high] => (*low, *high),
            _ => return InvalidRangeSnafu { raw: token.trim() }.fail(),
        };
        let low = low
            .trim()
            .parse::<i64>()
            .ok()
            .context(InvalidRangeSnafu { raw: token.trim() })?;
        let high = high
            .trim()
            .parse::<i64>()
            .ok()
            .context(InvalidRangeSnafu { raw: token.trim() })?;
        res.extend(low..=high);
    }
    debug!("parse_int_range: {:?} -> {:?}", raw, res);
    let values: Vec<Value> = res.into_iter().map(Value::Int).collect();
    collapse(raw, values)
}

fn parse_str_list(raw: &str, sort: bool) -> ModelResult<ParsedValue> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut tokens: Vec<&str> = Vec::new();
    for token in raw.split(',').map(|t| t.trim()) {
        if token.is_empty() || !seen.insert(token) {
            continue;
        }
        tokens.push(token);
    }
    if sort {
        tokens.sort_unstable();
    }
    let values = tokens.into_iter().map(Value::str).collect();
    collapse(raw, values)
}

fn collapse(raw: &str, mut values: Vec<Value>) -> ModelResult<ParsedValue> {
    match values.len() {
        0 => EmptyValueSnafu { raw }.fail(),
        1 => Ok(ParsedValue::Single(values.remove(0))),
        _ => Ok(ParsedValue::List(values)),
    }
}
