// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Parameter validation for every configurable field.
//!
//! Callers hand values in as a [`Value`], which can hold anything a user may
//! plausibly pass for a port or a path (an integer, a numeric string, a float,
//! a list, nothing at all). Each validator either returns the coerced value or
//! one of [`Error::InvalidValue`], [`Error::InvalidType`] or [`Error::Range`],
//! naming the field and the offending input. Validators perform no I/O.

use std::{fmt, path::Path};

use crate::{Error, Result};

/// Lowest valid TCP port.
pub const MIN_PORT: i64 = 1;
/// Highest valid TCP port.
pub const MAX_PORT: i64 = 65535;
/// Highest `videotestsrc` pattern index.
pub const MAX_PATTERN: i64 = 19;
/// Highest `audiotestsrc` wave index.
pub const MAX_WAVE: i64 = 12;

/// A loosely-typed input value, checked by the validators in this module.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    /// `true` for the inputs treated as "left blank": nothing, an empty
    /// string or an empty list.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(text) => text.is_empty(),
            Value::List(items) => items.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("None"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::Text(value) => f.write_str(value),
            Value::List(items) => {
                f.write_str("[")?;
                for (n, item) in items.iter().enumerate() {
                    if n > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! value_from_int {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::Int(value as i64)
            }
        })*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32, usize);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Text(value.clone())
    }
}

impl From<&Path> for Value {
    fn from(value: &Path) -> Self {
        Value::Text(value.to_string_lossy().into_owned())
    }
}

impl From<std::path::PathBuf> for Value {
    fn from(value: std::path::PathBuf) -> Self {
        Value::from(value.as_path())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

/// Coerces a value to an integer.
///
/// Accepts integers, floats without a fractional part and text that parses
/// as an integer once surrounding whitespace is trimmed.
pub fn integer(field: &'static str, value: &Value) -> Result<i64> {
    let coerced = match value {
        Value::Int(int) => Some(*int),
        Value::Float(float) if float.is_finite() && float.fract() == 0.0 => Some(*float as i64),
        Value::Text(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    coerced.ok_or_else(|| Error::InvalidType {
        field,
        value: value.to_string(),
        expected: "a valid integer",
    })
}

/// Coerces a value to a floating point number.
pub fn number(field: &'static str, value: &Value) -> Result<f64> {
    let coerced = match value {
        Value::Int(int) => Some(*int as f64),
        Value::Float(float) if float.is_finite() => Some(*float),
        Value::Text(text) => text.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    };
    coerced.ok_or_else(|| Error::InvalidType {
        field,
        value: value.to_string(),
        expected: "a valid number",
    })
}

fn bounded(field: &'static str, value: i64, min: i64, max: i64) -> Result<i64> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(Error::Range {
            field,
            value: value.to_string(),
            bounds: format!("in range {min} to {max}"),
        })
    }
}

/// Validates a TCP port: non-blank, integral, in `[1, 65535]`.
pub fn port(field: &'static str, value: impl Into<Value>) -> Result<u16> {
    let value = value.into();
    if value.is_blank() {
        return Err(Error::blank(field, &value));
    }
    let port = bounded(field, integer(field, &value)?, MIN_PORT, MAX_PORT)?;
    Ok(port as u16)
}

/// Validates a video dimension: non-blank, a whole number, strictly positive.
pub fn dimension(field: &'static str, value: impl Into<Value>) -> Result<u32> {
    let value = value.into();
    if value.is_blank() {
        return Err(Error::blank(field, &value));
    }
    let size = number(field, &value)?;
    if size <= 0.0 || size > u32::MAX as f64 {
        return Err(Error::Range {
            field,
            value: value.to_string(),
            bounds: "a valid positive value".to_string(),
        });
    }
    if size.fract() != 0.0 {
        return Err(Error::InvalidType {
            field,
            value: value.to_string(),
            expected: "a whole number of pixels",
        });
    }
    Ok(size as u32)
}

/// Shared rule for the enumerated test-signal selectors: the input is read
/// as a number and truncated toward zero before the range check.
fn selector(field: &'static str, value: &Value, max: i64) -> Result<u8> {
    // `as` saturates, so huge inputs still fail the range check below
    let truncated = number(field, value)?.trunc() as i64;
    Ok(bounded(field, truncated, 0, max)? as u8)
}

/// Validates a `videotestsrc` pattern index in `[0, 19]`.
pub fn pattern(value: impl Into<Value>) -> Result<u8> {
    selector("Pattern", &value.into(), MAX_PATTERN)
}

/// Validates an `audiotestsrc` wave index in `[0, 12]`.
pub fn wave(value: impl Into<Value>) -> Result<u8> {
    selector("Wave", &value.into(), MAX_WAVE)
}

/// Validates a test tone frequency: non-blank, integral, at least 1 Hz.
pub fn frequency(value: impl Into<Value>) -> Result<u32> {
    let value = value.into();
    if value.is_blank() {
        return Err(Error::blank("Frequency", &value));
    }
    Ok(bounded("Frequency", integer("Frequency", &value)?, 1, u32::MAX as i64)? as u32)
}

/// Validates a D-Bus address: non-blank, with a transport name before a `:`.
///
/// See <http://dbus.freedesktop.org/doc/dbus-specification.html#addresses>.
pub fn address(value: impl Into<Value>) -> Result<String> {
    let value = value.into();
    if value.is_blank() {
        return Err(Error::blank("Address", &value));
    }
    let address = value.to_string();
    match address.find(':') {
        Some(colon) if colon > 0 => Ok(address),
        _ => Err(Error::InvalidValue {
            field: "Address",
            value: address,
            reason: "must follow the D-Bus address format 'transport:key=value'".to_string(),
        }),
    }
}

/// Accepts any bus name; `Null` means "no bus name" (peer-to-peer connection).
pub fn bus_name(value: impl Into<Value>) -> Option<String> {
    match value.into() {
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Validates a D-Bus object path: non-blank and starting with `/`.
pub fn object_path(value: impl Into<Value>) -> Result<String> {
    let value = value.into();
    if value.is_blank() {
        return Err(Error::blank("Object path", &value));
    }
    let path = value.to_string();
    if path.starts_with('/') {
        Ok(path)
    } else {
        Err(Error::InvalidValue {
            field: "Object path",
            value: path,
            reason: "must start with '/'".to_string(),
        })
    }
}

/// Validates a D-Bus interface name: non-blank with at least two `.` separators.
pub fn interface_name(value: impl Into<Value>) -> Result<String> {
    let value = value.into();
    if value.is_blank() {
        return Err(Error::blank("Interface", &value));
    }
    let interface = value.to_string();
    if interface.matches('.').count() > 1 {
        Ok(interface)
    } else {
        Err(Error::InvalidValue {
            field: "Interface",
            value: interface,
            reason: "must contain at least two '.' separators".to_string(),
        })
    }
}

/// Validates the directory holding the server executables: non-blank.
pub fn path(value: impl Into<Value>) -> Result<String> {
    let value = value.into();
    if value.is_blank() {
        return Err(Error::blank("Path", &value));
    }
    Ok(value.to_string())
}

/// Validates the record file name: non-blank and without forward slashes.
pub fn record_file(value: impl Into<Value>) -> Result<String> {
    let value = value.into();
    if value.is_blank() {
        return Err(Error::blank("Record File", &value));
    }
    let file = value.to_string();
    if file.contains('/') {
        return Err(Error::InvalidValue {
            field: "Record File",
            value: file,
            reason: "cannot have forward slashes".to_string(),
        });
    }
    Ok(file)
}

/// Validates an index into a collection of `len` running sources.
///
/// `kind` names the collection ("video", "audio") in the error message.
pub fn index(kind: &str, value: impl Into<Value>, len: usize) -> Result<usize> {
    let value = value.into();
    let index = integer("Index", &value)
        .map_err(|_| Error::InvalidIndex("Index should be a valid integer".to_string()))?;
    usize::try_from(index)
        .ok()
        .filter(|index| *index < len)
        .ok_or_else(|| {
            Error::InvalidIndex(format!(
                "No {kind} source with index:{value}, use get_test_{kind}() to determine index"
            ))
        })
}
