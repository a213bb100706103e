//! Keyword maps and bound arguments
//!
//! Uses FxHashMap for faster hashing on small string keys.

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::BindError;

/// Keyword arguments: name → value
pub type Kwargs = FxHashMap<String, Value>;

/// Build keyword arguments from `(name, value)` pairs
pub fn kwargs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Kwargs
where
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Arguments matched to a signature's parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    /// Named (non-variadic) params → value
    values: Kwargs,
    pub(crate) var_args: Vec<Value>,
    pub(crate) var_kwargs: Kwargs,
}

impl BoundArguments {
    pub(crate) fn insert(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Value bound to a declared parameter
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Deserialize the value bound to `name` into `T`
    pub fn value<T: DeserializeOwned>(&self, name: &str) -> Result<T, BindError> {
        let value = self.get(name).ok_or_else(|| BindError::MissingArgument {
            name: name.to_string(),
        })?;
        T::deserialize(value).map_err(|e| BindError::InvalidArgument {
            name: name.to_string(),
            details: e.to_string(),
        })
    }

    /// Surplus positional values (`*args`)
    pub fn var_args(&self) -> &[Value] {
        &self.var_args
    }

    /// Surplus keyword values (`**kwargs`)
    pub fn var_kwargs(&self) -> &Kwargs {
        &self.var_kwargs
    }

    pub fn into_parts(self) -> (Kwargs, Vec<Value>, Kwargs) {
        (self.values, self.var_args, self.var_kwargs)
    }
}
