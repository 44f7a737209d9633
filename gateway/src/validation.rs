//! Request validation that reports every failing field at once.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::ApiError;

/// Messages per field, in field-name order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn first_field(&self) -> Option<&str> {
        self.0.keys().next().map(String::as_str)
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, ApiError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(ApiError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for message in self.0.values().flatten() {
            if !first {
                f.write_str("; ")?;
            }
            f.write_str(message)?;
            first = false;
        }
        Ok(())
    }
}

/// Validates one JSON object body field by field.
pub struct Validator<'a> {
    body: &'a Map<String, Value>,
    errors: FieldErrors,
}

impl<'a> Validator<'a> {
    /// Fails with `invalid_request` unless `body` is a JSON object.
    pub fn new(body: &'a Value) -> Result<Self, ApiError> {
        match body {
            Value::Object(body) => Ok(Self {
                body,
                errors: FieldErrors::default(),
            }),
            _ => Err(ApiError::InvalidRequest(
                "request body must be a JSON object".into(),
            )),
        }
    }

    /// A string with at least one non-whitespace character.
    pub fn required_string(&mut self, field: &str) -> String {
        match self.body.get(field) {
            None | Some(Value::Null) => self.errors.add(field, format!("{field} is required")),
            Some(Value::String(s)) if s.trim().is_empty() => {
                self.errors.add(field, format!("{field} must not be empty"))
            }
            Some(Value::String(s)) => return s.clone(),
            Some(_) => self.errors.add(field, format!("{field} must be a string")),
        }
        String::new()
    }

    /// A string, or nothing.
    pub fn optional_string(&mut self, field: &str) -> Option<String> {
        match self.body.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.errors.add(field, format!("{field} must be a string"));
                None
            }
        }
    }

    /// An integer in `1..=u32::MAX`.
    pub fn positive_integer(&mut self, field: &str) -> u32 {
        match self.body.get(field) {
            None | Some(Value::Null) => self.errors.add(field, format!("{field} is required")),
            Some(Value::Number(n)) => match n.as_u64() {
                Some(v) if v >= 1 => match u32::try_from(v) {
                    Ok(v) => return v,
                    Err(_) => self.errors.add(field, format!("{field} is too large")),
                },
                _ => self
                    .errors
                    .add(field, format!("{field} must be a positive integer")),
            },
            Some(_) => self
                .errors
                .add(field, format!("{field} must be a positive integer")),
        }
        0
    }

    pub fn finish<T>(self, value: T) -> Result<T, ApiError> {
        self.errors.finish(value)
    }
}
