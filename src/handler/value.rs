//! Avatar parameter values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value carried by an avatar parameter update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Nil,
}

impl ParamValue {
    /// Numeric view of the value.
    ///
    /// Numbers and numeric text convert; booleans, nil and non-finite results
    /// do not.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            ParamValue::Int(i) => *i as f64,
            ParamValue::Float(f) => *f,
            ParamValue::Text(s) => s.trim().parse::<f64>().ok()?,
            ParamValue::Bool(_) | ParamValue::Nil => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Boolean view of the value, accepting 0/1 numbers as well.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            ParamValue::Int(i) => Some(*i != 0),
            ParamValue::Float(f) => Some(*f != 0.0),
            ParamValue::Text(_) | ParamValue::Nil => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Int(i) => write!(f, "{i}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Text(s) => write!(f, "{s:?}"),
            ParamValue::Nil => f.write_str("nil"),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

impl From<f64> for ParamValue {
    fn from(f: f64) -> Self {
        ParamValue::Float(f)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<rosc::OscType> for ParamValue {
    fn from(arg: rosc::OscType) -> Self {
        use rosc::OscType;
        match arg {
            OscType::Bool(b) => ParamValue::Bool(b),
            OscType::Int(i) => ParamValue::Int(i64::from(i)),
            OscType::Long(i) => ParamValue::Int(i),
            OscType::Float(f) => ParamValue::Float(f64::from(f)),
            OscType::Double(f) => ParamValue::Float(f),
            OscType::String(s) => ParamValue::Text(s),
            _ => ParamValue::Nil,
        }
    }
}
