//! Request parameters.
//!
//! [`Params`] is the flat key/value mapping every action is reduced to before
//! it is checked, signed and sent. Absent values never make it into a mapping:
//! use [`Params::insert_opt`] for optional fields.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt::{self, Display};

use qcsign_core::{Error, Result};
use serde::Serialize;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean, sent as `1` or `0`.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// String.
    Str(String),
    /// List of values, sent as repeated keys or indexed keys.
    List(Vec<Value>),
    /// Nested mapping, used for rule wire forms.
    Map(Params),
}

impl Value {
    /// Convert a decoded JSON value, dropping nulls.
    ///
    /// Returns `None` for `null`. Nulls nested in arrays and objects are
    /// skipped as well.
    pub fn from_json(value: serde_json::Value) -> Option<Value> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::Bool(v) => Some(Value::Bool(v)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Value::Int(i)),
                None => n.as_f64().map(Value::Float),
            },
            serde_json::Value::String(s) => Some(Value::Str(s)),
            serde_json::Value::Array(items) => Some(Value::List(
                items.into_iter().filter_map(Value::from_json).collect(),
            )),
            serde_json::Value::Object(map) => Some(Value::Map(Params(
                map.into_iter()
                    .filter_map(|(k, v)| Value::from_json(v).map(|v| (k, v)))
                    .collect(),
            ))),
        }
    }

    /// Whether this value is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Get the inner string if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the inner integer if this value is an actual integer.
    ///
    /// Strings and booleans are not coerced, see [`Value::coerce_int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Coerce this value into an integer.
    ///
    /// Booleans, integers and strings holding a base-10 integer succeed.
    /// Floats, float strings, empty strings and containers fail.
    pub fn coerce_int(&self) -> Option<i64> {
        match self {
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Int(i) => Some(*i),
            Value::Str(s) => s.parse::<i64>().ok(),
            Value::Float(_) | Value::List(_) | Value::Map(_) => None,
        }
    }

    /// Render a scalar as it appears on the wire.
    ///
    /// Containers have no scalar form and are rendered as JSON.
    pub fn to_wire_string(&self) -> String {
        match self {
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) => "0".to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.clone(),
            Value::List(_) | Value::Map(_) => {
                serde_json::to_string(self).unwrap_or_default()
            }
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire_string())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Str(v.clone())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<Params> for Value {
    fn from(v: Params) -> Self {
        Value::Map(v)
    }
}

/// An ordered mapping from parameter name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, Value>);

impl Params {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object into a mapping.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        match Value::from_json(value) {
            Some(Value::Map(params)) => Ok(params),
            _ => Err(Error::invalid_parameter("expected a JSON object")),
        }
    }

    /// Insert a value, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert a value only if it is present.
    pub fn insert_opt<V: Into<Value>>(
        &mut self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> &mut Self {
        if let Some(v) = value {
            self.0.insert(key.into(), v.into());
        }
        self
    }

    /// Insert a list only if it is not empty.
    pub fn insert_list<V: Into<Value>>(
        &mut self,
        key: impl Into<String>,
        values: Vec<V>,
    ) -> &mut Self {
        if !values.is_empty() {
            self.0.insert(key.into(), Value::from(values));
        }
        self
    }

    /// Builder style [`Params::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a value by its named key, falling back to its slot key.
    pub fn named_or_slot(&self, named: &str, slot: &str) -> Option<&Value> {
        self.0.get(named).or_else(|| self.0.get(slot))
    }

    /// Whether the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Remove a value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Flatten nested mappings for the wire.
    ///
    /// Lists that carry mappings become 1-based indexed keys, like
    /// `rules.1.protocol`; scalar lists are left alone so that they are sent
    /// as repeated keys.
    pub fn flatten(&self) -> Params {
        let mut out = Params::new();
        for (k, v) in &self.0 {
            match v {
                Value::List(items) if items.iter().any(|v| matches!(v, Value::Map(_))) => {
                    for (idx, item) in items.iter().enumerate() {
                        let prefix = format!("{k}.{}", idx + 1);
                        match item {
                            Value::Map(m) => {
                                for (sk, sv) in m.flatten() {
                                    out.insert(format!("{prefix}.{sk}"), sv);
                                }
                            }
                            other => {
                                out.insert(prefix, other.clone());
                            }
                        }
                    }
                }
                Value::Map(m) => {
                    for (sk, sv) in m.flatten() {
                        out.insert(format!("{k}.{sk}"), sv);
                    }
                }
                _ => {
                    out.insert(k.clone(), v.clone());
                }
            }
        }
        out
    }
}

impl IntoIterator for Params {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Params(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
