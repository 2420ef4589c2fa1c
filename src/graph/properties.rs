//! Typed accessors for row values and property maps.
//!
//! Property lookups treat a missing key as the zero value of the requested
//! type. A missing map is `MapperError::NilInput` and a value of the wrong
//! type is `MapperError::Casting` naming both types.

use super::errors::MapperError;
use super::value::{Node, Properties, Relationship, Value};

fn casting_error(expected: &'static str, actual: &Value) -> MapperError {
    MapperError::Casting {
        expected,
        actual: actual.type_name(),
    }
}

fn present(value: Option<&Value>) -> Result<&Value, MapperError> {
    match value {
        None | Some(Value::Null) => Err(MapperError::NilInput),
        Some(v) => Ok(v),
    }
}

/// Returns `val` as a node
pub fn get_node(val: Option<&Value>) -> Result<&Node, MapperError> {
    match present(val)? {
        Value::Node(node) => Ok(node),
        other => Err(casting_error("node", other)),
    }
}

/// Returns `val` as a relationship
pub fn get_relationship(val: Option<&Value>) -> Result<&Relationship, MapperError> {
    match present(val)? {
        Value::Relationship(rel) => Ok(rel),
        other => Err(casting_error("relationship", other)),
    }
}

/// Returns `val` as a 64-bit integer
pub fn get_i64(val: Option<&Value>) -> Result<i64, MapperError> {
    match present(val)? {
        Value::Integer(i) => Ok(*i),
        other => Err(casting_error("int64", other)),
    }
}

/// Returns `val` as a list of strings; every element must be a string
pub fn get_string_list(val: Option<&Value>) -> Result<Vec<&str>, MapperError> {
    match present(val)? {
        Value::List(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.as_str()),
                other => Err(casting_error("string", other)),
            })
            .collect(),
        other => Err(casting_error("list", other)),
    }
}

/// Returns the property `key` as a string, or an empty string if absent
pub fn get_string_property(key: &str, props: Option<&Properties>) -> Result<String, MapperError> {
    let props = props.ok_or(MapperError::NilInput)?;
    match props.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(casting_error("string", other)),
    }
}

/// Returns the property `key` as an i64, or 0 if absent
pub fn get_i64_property(key: &str, props: Option<&Properties>) -> Result<i64, MapperError> {
    let props = props.ok_or(MapperError::NilInput)?;
    match props.get(key) {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Integer(i)) => Ok(*i),
        Some(other) => Err(casting_error("int64", other)),
    }
}
