//! Context values and the variable type tags inferred from template usage
//!
//! Values follow loose scripting-language coercion rules when they are
//! compared or printed, because the templates they feed were written
//! against those rules.

use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};

use crate::registry::Helper;

/// Shared so that repeated parses produce equal default values
static NOOP_FUNCTION: Lazy<Helper> = Lazy::new(|| Helper::noop("noop"));

/// A value bound to a template variable
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit absence; treated like a missing variable
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    /// Keys keep insertion order so rendered JSON matches the caller's input
    Object(IndexMap<String, Value>),
    /// A callable value (the `Function` variable type)
    Function(Helper),
}

impl Value {
    /// Build an object value from key/value pairs
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build an array of string values
    pub fn strings<S, I>(items: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        Value::Array(items.into_iter().map(|s| Value::String(s.into())).collect())
    }

    /// Type tag of this value, if it maps onto one of the variable types
    ///
    /// Numbers and null have no variable type of their own.
    pub fn variable_type(&self) -> Option<VariableType> {
        match self {
            Value::String(_) => Some(VariableType::String),
            Value::Bool(_) => Some(VariableType::Boolean),
            Value::Array(_) => Some(VariableType::Array),
            Value::Object(_) => Some(VariableType::Object),
            Value::Function(_) => Some(VariableType::Function),
            Value::Null | Value::Number(_) => None,
        }
    }

    /// Short name of the value's kind, used in messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Truthiness for conditional tests
    ///
    /// `false`, `0`, `NaN`, `""` and null are falsy. Every array, object and
    /// function is truthy, including empty ones.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) => true,
        }
    }

    /// Look up a field of an object value
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Loose string coercion
    ///
    /// Arrays join their elements with `,`, objects print as
    /// `[object Object]`.
    pub fn coerce_to_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|v| match v {
                    Value::Null => String::new(),
                    other => other.coerce_to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => "[object Object]".to_string(),
            Value::Function(f) => format!("[Function: {}]", f.name()),
        }
    }

    /// Text substituted for this value in rendered output
    ///
    /// Objects and arrays become pretty-printed JSON. Null yields `None`,
    /// which leaves the placeholder in place.
    pub fn render(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Array(_) | Value::Object(_) => serde_json::to_string_pretty(&self.to_json()).ok(),
            other => Some(other.coerce_to_string()),
        }
    }

    /// Convert to a JSON value
    ///
    /// Functions are dropped from objects and become `null` inside arrays;
    /// non-finite numbers become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null | Value::Function(_) => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .filter(|(_, v)| !matches!(v, Value::Function(_)))
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

/// Format a number the way script engines print it (`5`, `1.5`, `NaN`)
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        // covers -0
        "0".to_string()
    } else {
        format!("{}", n)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Type tag inferred for a template variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    String,
    Boolean,
    Array,
    Object,
    Function,
}

impl VariableType {
    /// The zero value used as a variable's default
    pub fn default_value(&self) -> Value {
        match self {
            VariableType::String => Value::String(String::new()),
            VariableType::Boolean => Value::Bool(false),
            VariableType::Array => Value::Array(Vec::new()),
            VariableType::Object => Value::Object(IndexMap::new()),
            VariableType::Function => Value::Function(NOOP_FUNCTION.clone()),
        }
    }

    /// Check whether a value carries this tag
    pub fn matches(&self, value: &Value) -> bool {
        value.variable_type() == Some(*self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::String => "string",
            VariableType::Boolean => "boolean",
            VariableType::Array => "array",
            VariableType::Object => "object",
            VariableType::Function => "function",
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
