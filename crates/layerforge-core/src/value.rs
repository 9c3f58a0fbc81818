//! Value wrappers: typed, validated, string-serializable field values.
//!
//! A [`ValueWrapper`] pairs a [`ValueKind`] (the domain a field accepts) with
//! the current [`Value`]. The wrapper never holds a value that fails its own
//! validation: construction, [`set`](ValueWrapper::set) and deserialization
//! all go through the same kind-specific check.
//!
//! Every kind has a text form used by editor clients. For every valid value
//! `v`, `parse(stringify(v)) == v`.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::CoreError;

/// Dimensions of a shape value. Most tensors have four or fewer.
pub type Dims = SmallVec<[i64; 4]>;

/// Default bounds on the number of dimensions of a shape field.
pub const DEFAULT_MIN_DIMS: usize = 1;
pub const DEFAULT_MAX_DIMS: usize = 100;

/// A field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Shape(Dims),
}

impl Value {
    /// Builds a shape value from any sequence of dimensions.
    pub fn shape(dims: impl IntoIterator<Item = i64>) -> Self {
        Value::Shape(dims.into_iter().collect())
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&[i64]> {
        match self {
            Value::Shape(dims) => Some(dims),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Dims> for Value {
    fn from(dims: Dims) -> Self {
        Value::Shape(dims)
    }
}

impl From<Vec<i64>> for Value {
    fn from(dims: Vec<i64>) -> Self {
        Value::Shape(Dims::from_vec(dims))
    }
}

/// The domain of values a field accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValueKind {
    /// Whole numbers, optionally bounded (inclusive).
    Int {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    /// Finite floating-point numbers.
    Float,
    Bool,
    /// One string out of a fixed set.
    Enum { allowed: Vec<String> },
    /// Ordered, strictly positive dimensions with a bounded count.
    Shape { min_dims: usize, max_dims: usize },
}

impl ValueKind {
    /// Validates `value` against this kind and returns its normalized form
    /// (an integral `Float` becomes `Int` for integer kinds and vice versa).
    pub fn coerce(&self, value: &Value) -> Result<Value, CoreError> {
        match self {
            ValueKind::Int { min, max } => {
                let v = match value {
                    Value::Int(v) => *v,
                    Value::Float(f)
                        if f.is_finite()
                            && f.fract() == 0.0
                            && *f >= i64::MIN as f64
                            && *f < i64::MAX as f64 =>
                    {
                        *f as i64
                    }
                    Value::Float(_) => return Err(CoreError::invalid("Value is not an integer")),
                    _ => return Err(CoreError::invalid("Value is not a number")),
                };
                if let Some(min) = min {
                    if v < *min {
                        return Err(CoreError::invalid(format!("Value must be at least {min}")));
                    }
                }
                if let Some(max) = max {
                    if v > *max {
                        return Err(CoreError::invalid(format!("Value must be at most {max}")));
                    }
                }
                Ok(Value::Int(v))
            }
            ValueKind::Float => match value {
                Value::Float(f) if f.is_finite() => Ok(Value::Float(*f)),
                Value::Float(_) => Err(CoreError::invalid("Value must be a finite number")),
                Value::Int(v) => Ok(Value::Float(*v as f64)),
                _ => Err(CoreError::invalid("Value is not a number")),
            },
            ValueKind::Bool => match value {
                Value::Bool(b) => Ok(Value::Bool(*b)),
                _ => Err(CoreError::invalid("Value must be boolean")),
            },
            ValueKind::Enum { allowed } => match value {
                Value::Text(s) if allowed.iter().any(|a| a == s) => Ok(Value::Text(s.clone())),
                Value::Text(_) => Err(CoreError::invalid(format!(
                    "Value must be one of these values: {}",
                    allowed.join(", ")
                ))),
                _ => Err(CoreError::invalid("Value must be string")),
            },
            ValueKind::Shape { min_dims, max_dims } => {
                let dims = match value {
                    Value::Shape(dims) => dims,
                    _ => return Err(CoreError::invalid("Value must be a list of numbers")),
                };
                for (pos, dim) in dims.iter().enumerate() {
                    if *dim <= 0 {
                        return Err(CoreError::invalid(format!(
                            "Element #{} is not a positive integer",
                            pos + 1
                        )));
                    }
                }
                if min_dims == max_dims && dims.len() != *max_dims {
                    return Err(CoreError::invalid(format!(
                        "Value must have {max_dims} dimensions"
                    )));
                }
                if dims.len() < *min_dims || dims.len() > *max_dims {
                    return Err(CoreError::invalid(format!(
                        "Value must have between {min_dims} and {max_dims} dimensions"
                    )));
                }
                Ok(Value::Shape(dims.clone()))
            }
        }
    }

    /// Parses the text form of a value of this kind. Parsing only checks the
    /// syntax; domain constraints are left to [`coerce`](Self::coerce).
    pub fn parse(&self, text: &str) -> Result<Value, CoreError> {
        match self {
            ValueKind::Int { .. } => text
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| CoreError::parse(format!("Invalid integer \"{text}\""))),
            ValueKind::Float => text
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| CoreError::parse(format!("Invalid float \"{text}\""))),
            ValueKind::Bool => match text.trim().to_lowercase().as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(CoreError::parse("Value is not a boolean")),
            },
            ValueKind::Enum { .. } => Ok(Value::Text(text.to_string())),
            ValueKind::Shape { .. } => parse_shape(text).map(Value::Shape),
        }
    }
}

fn parse_shape(text: &str) -> Result<Dims, CoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoreError::parse("String is empty - could not parse"));
    }
    let inner = trimmed
        .strip_prefix('(')
        .ok_or_else(|| CoreError::parse("Shape string must begin with an open parenthesis"))?;
    let inner = inner
        .strip_suffix(')')
        .ok_or_else(|| CoreError::parse("Shape string must end with a close parenthesis"))?;

    let mut dims = Dims::new();
    // positions are 1-based in messages
    for (pos, part) in inner.split(',').enumerate() {
        let part = part.trim();
        if part.is_empty() {
            return Err(CoreError::parse(format!("Value #{} is empty", pos + 1)));
        }
        let dim = part.parse::<i64>().map_err(|_| {
            CoreError::parse(format!("Could not parse value #{} as an integer", pos + 1))
        })?;
        dims.push(dim);
    }
    Ok(dims)
}

/// Renders a value in its text form.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Int(v) => v.to_string(),
        // Display for f64 is the shortest text that parses back to the same bits.
        Value::Float(v) => v.to_string(),
        Value::Bool(v) => v.to_string(),
        Value::Text(v) => v.clone(),
        Value::Shape(dims) => {
            let mut out = String::from("(");
            for (i, dim) in dims.iter().enumerate() {
                if i != 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{dim}");
            }
            out.push(')');
            out
        }
    }
}

/// A typed, validated holder for one field's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawValueWrapper")]
pub struct ValueWrapper {
    kind: ValueKind,
    value: Value,
}

/// Unchecked wire form; converted through [`ValueWrapper::new`] so a stored
/// wrapper is validated on load.
#[derive(Deserialize)]
struct RawValueWrapper {
    kind: ValueKind,
    value: Value,
}

impl TryFrom<RawValueWrapper> for ValueWrapper {
    type Error = CoreError;

    fn try_from(raw: RawValueWrapper) -> Result<Self, Self::Error> {
        ValueWrapper::new(raw.kind, raw.value)
    }
}

impl ValueWrapper {
    /// Creates a wrapper holding `value`, which must validate against `kind`.
    pub fn new(kind: ValueKind, value: impl Into<Value>) -> Result<Self, CoreError> {
        let value = kind.coerce(&value.into())?;
        Ok(ValueWrapper { kind, value })
    }

    /// An unbounded integer field.
    pub fn int(value: i64) -> Result<Self, CoreError> {
        Self::new(ValueKind::Int { min: None, max: None }, value)
    }

    /// An integer field with an inclusive lower bound.
    pub fn int_at_least(min: i64, value: i64) -> Result<Self, CoreError> {
        Self::new(
            ValueKind::Int {
                min: Some(min),
                max: None,
            },
            value,
        )
    }

    pub fn float(value: f64) -> Result<Self, CoreError> {
        Self::new(ValueKind::Float, value)
    }

    pub fn boolean(value: bool) -> Result<Self, CoreError> {
        Self::new(ValueKind::Bool, value)
    }

    /// A field restricted to one of `allowed`.
    pub fn enumeration<I, S>(allowed: I, value: &str) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed = allowed.into_iter().map(Into::into).collect();
        Self::new(ValueKind::Enum { allowed }, value)
    }

    /// A shape field with the default dimension-count bounds.
    pub fn shape(dims: impl IntoIterator<Item = i64>) -> Result<Self, CoreError> {
        Self::shape_with_dims(dims, DEFAULT_MIN_DIMS, DEFAULT_MAX_DIMS)
    }

    /// A shape field whose dimension count must lie in `min_dims..=max_dims`.
    pub fn shape_with_dims(
        dims: impl IntoIterator<Item = i64>,
        min_dims: usize,
        max_dims: usize,
    ) -> Result<Self, CoreError> {
        Self::new(ValueKind::Shape { min_dims, max_dims }, Value::shape(dims))
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> Value {
        self.value.clone()
    }

    /// Borrows the current value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Replaces the value. On error the wrapper is unchanged.
    pub fn set(&mut self, value: impl Into<Value>) -> Result<(), CoreError> {
        self.value = self.kind.coerce(&value.into())?;
        Ok(())
    }

    pub fn validate(&self, value: &Value) -> Result<(), CoreError> {
        self.kind.coerce(value).map(drop)
    }

    pub fn stringify(&self, value: &Value) -> String {
        stringify(value)
    }

    pub fn parse(&self, text: &str) -> Result<Value, CoreError> {
        self.kind.parse(text)
    }

    /// Structural equality with the current value. Values this wrapper
    /// cannot hold compare unequal.
    pub fn compare(&self, value: &Value) -> bool {
        self.kind
            .coerce(value)
            .map(|v| v == self.value)
            .unwrap_or(false)
    }

    /// Text form of the current value.
    pub fn value_string(&self) -> String {
        stringify(&self.value)
    }

    pub fn set_from_str(&mut self, text: &str) -> Result<(), CoreError> {
        let value = self.parse(text)?;
        self.set(value)
    }

    pub fn validate_str(&self, text: &str) -> Result<(), CoreError> {
        self.validate(&self.parse(text)?)
    }
}
