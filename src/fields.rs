//! Typed field access for the two untyped representations the model is
//! converted from: parsed blocks and API dicts.

use crate::ast::{RawBlock, Value};
use crate::error::ValidationError;
use serde_json::{Map, Value as Json};

pub(crate) type Dict = Map<String, Json>;

pub(crate) fn as_dict<'a>(value: &'a Json, what: &str) -> Result<&'a Dict, ValidationError> {
    value
        .as_object()
        .ok_or_else(|| ValidationError::invalid(format!("{what} must be an object")))
}

fn present<'a>(dict: &'a Dict, key: &str) -> Option<&'a Json> {
    dict.get(key).filter(|v| !v.is_null())
}

pub(crate) fn dict_str(dict: &Dict, key: &str) -> Result<Option<String>, ValidationError> {
    match present(dict, key) {
        None => Ok(None),
        Some(Json::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ValidationError::invalid(format!(
            "{key} must be a string, got {other}"
        ))),
    }
}

pub(crate) fn dict_bool(dict: &Dict, key: &str) -> Result<Option<bool>, ValidationError> {
    match present(dict, key) {
        None => Ok(None),
        Some(Json::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(ValidationError::invalid(format!(
            "{key} must be a boolean value, got {other}"
        ))),
    }
}

pub(crate) fn dict_int(dict: &Dict, key: &str) -> Result<Option<i64>, ValidationError> {
    match present(dict, key) {
        None => Ok(None),
        Some(v) => v.as_i64().map(Some).ok_or_else(|| {
            ValidationError::invalid(format!("{key} must be an integer, got {v}"))
        }),
    }
}

/// A list of strings; a lone string counts as a one element list.
pub(crate) fn dict_str_list(dict: &Dict, key: &str) -> Result<Option<Vec<String>>, ValidationError> {
    match present(dict, key) {
        None => Ok(None),
        Some(Json::String(s)) => Ok(Some(vec![s.clone()])),
        Some(Json::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    ValidationError::invalid(format!("{key} entries must be strings, got {item}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(ValidationError::invalid(format!(
            "{key} must be a list of strings, got {other}"
        ))),
    }
}

pub(crate) fn dict_int_list(dict: &Dict, key: &str) -> Result<Option<Vec<i64>>, ValidationError> {
    match present(dict, key) {
        None => Ok(None),
        Some(Json::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_i64().ok_or_else(|| {
                    ValidationError::invalid(format!("{key} entries must be integers, got {item}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(v) => v.as_i64().map(|i| Some(vec![i])).ok_or_else(|| {
            ValidationError::invalid(format!("{key} must be a list of integers, got {v}"))
        }),
    }
}

pub(crate) fn block_text(block: &RawBlock, key: &str) -> Result<Option<String>, ValidationError> {
    match block.get(key) {
        None => Ok(None),
        Some(v) => v.to_text().map(Some).ok_or_else(|| {
            ValidationError::invalid(format!(
                "{} {key} must be a single value, got {v}",
                block.block_name
            ))
        }),
    }
}

pub(crate) fn block_bool(block: &RawBlock, key: &str) -> Result<Option<bool>, ValidationError> {
    match block.get(key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(v) => Err(ValidationError::invalid(format!(
            "{} {key} must be a boolean value, got {v}",
            block.block_name
        ))),
    }
}

pub(crate) fn block_int(block: &RawBlock, key: &str) -> Result<Option<i64>, ValidationError> {
    match block.get(key) {
        None => Ok(None),
        Some(Value::Int(i)) => Ok(Some(*i)),
        Some(v) => Err(ValidationError::invalid(format!(
            "{} {key} must be an integer, got {v}",
            block.block_name
        ))),
    }
}

pub(crate) fn block_text_list(
    block: &RawBlock,
    key: &str,
) -> Result<Option<Vec<String>>, ValidationError> {
    match block.get(key) {
        None => Ok(None),
        Some(v) => v
            .to_list()
            .iter()
            .map(|item| {
                item.to_text().ok_or_else(|| {
                    ValidationError::invalid(format!(
                        "{} {key} cannot contain nested lists",
                        block.block_name
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
    }
}

pub(crate) fn block_int_list(block: &RawBlock, key: &str) -> Result<Option<Vec<i64>>, ValidationError> {
    match block.get(key) {
        None => Ok(None),
        Some(v) => v
            .to_list()
            .iter()
            .map(|item| {
                item.as_int().ok_or_else(|| {
                    ValidationError::invalid(format!(
                        "{} {key} entries must be integers, got {item}",
                        block.block_name
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
    }
}
