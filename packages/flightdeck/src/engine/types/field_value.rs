use super::FastMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use smol_str::SmolStr;

/// Scalar field content of a record. Nested objects exist only because some
/// feeds ship `player` either as a plain string or as `{ username: ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Str(SmolStr),
    Object(FastMap<SmolStr, FieldValue>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Null
    }
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&FastMap<SmolStr, FieldValue>> {
        match self {
            FieldValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Get nested value by key (for objects)
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.as_object()?.get(key)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Lenient numeric read. Numbers pass through, numeral strings are
    /// parsed, everything else degrades to 0. The flag marks a string that
    /// FAILED to parse, so callers can count it as a diagnostic without
    /// aborting anything.
    pub fn to_number_lenient(&self) -> (f64, bool) {
        match self {
            FieldValue::Number(n) => (*n, false),
            FieldValue::Str(s) => match s.trim().parse::<f64>() {
                Ok(n) => (n, false),
                Err(_) => (0.0, true),
            },
            _ => (0.0, false),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => FieldValue::Number(n.as_f64().unwrap_or(0.0)),
            Value::String(s) => FieldValue::Str(SmolStr::from(s)),
            // Record fields are scalars; arrays carry no column semantics here.
            Value::Array(_) => FieldValue::Null,
            Value::Object(obj) => FieldValue::Object(
                obj.into_iter()
                    .map(|(k, v)| (SmolStr::from(k), FieldValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<FieldValue> for Value {
    fn from(val: FieldValue) -> Self {
        match val {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(b),
            FieldValue::Number(n) => json!(n),
            FieldValue::Str(s) => Value::String(s.to_string()),
            FieldValue::Object(obj) => Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k.to_string(), v.into()))
                    .collect(),
            ),
        }
    }
}
