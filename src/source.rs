//! Source access strategies
//!
//! The binder never touches a source directly. It goes through an
//! `Accessor`, a lookup + enumeration pair:
//! - `AttrAccess`: attributes of a `Serialize` value (struct fields)
//! - `DictAccess`: items of a string-keyed `Mapping`
//! - `FnAccessor`: any pair of closures

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::LookupError;
use crate::reflect;

/// Lookup + enumeration over a source of named values
pub trait Accessor<S: ?Sized> {
    /// Value of `name`, or a `LookupError` if the source has none
    fn get(&self, source: &S, name: &str) -> Result<Value, LookupError>;

    /// Every name visible in the source; each must be fetchable with `get`
    fn names(&self, source: &S) -> Result<Vec<String>, LookupError>;
}

// ─────────────────────────────────────────────────────────────
// Attribute mode
// ─────────────────────────────────────────────────────────────

/// Attribute access through `serde` reflection.
///
/// The attributes of a source are the fields its `Serialize` implementation
/// emits: `#[serde(skip)]` fields are invisible, `#[serde(rename)]` renames,
/// `#[serde(flatten)]` lifts nested fields. Sources that do not serialize to
/// an object have no attributes. A lookup serializes only the requested
/// field, so other fields need not be representable as JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttrAccess;

impl<S: Serialize + ?Sized> Accessor<S> for AttrAccess {
    fn get(&self, source: &S, name: &str) -> Result<Value, LookupError> {
        reflect::attribute(source, name)?
            .ok_or_else(|| LookupError::MissingAttribute {
                name: name.to_string(),
            })
    }

    fn names(&self, source: &S) -> Result<Vec<String>, LookupError> {
        reflect::attribute_names(source)
    }
}

// ─────────────────────────────────────────────────────────────
// Mapping mode
// ─────────────────────────────────────────────────────────────

/// String-keyed map of values
pub trait Mapping {
    fn get_item(&self, key: &str) -> Option<Value>;

    fn keys(&self) -> Vec<String>;
}

impl<V, H> Mapping for HashMap<String, V, H>
where
    V: Clone + Into<Value>,
    H: BuildHasher,
{
    fn get_item(&self, key: &str) -> Option<Value> {
        self.get(key).cloned().map(Into::into)
    }

    fn keys(&self) -> Vec<String> {
        HashMap::keys(self).cloned().collect()
    }
}

impl<V> Mapping for BTreeMap<String, V>
where
    V: Clone + Into<Value>,
{
    fn get_item(&self, key: &str) -> Option<Value> {
        self.get(key).cloned().map(Into::into)
    }

    fn keys(&self) -> Vec<String> {
        BTreeMap::keys(self).cloned().collect()
    }
}

impl Mapping for Map<String, Value> {
    fn get_item(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        Map::keys(self).cloned().collect()
    }
}

/// Objects are mappings; every other value is an empty one
impl Mapping for Value {
    fn get_item(&self, key: &str) -> Option<Value> {
        self.as_object().and_then(|map| map.get(key)).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.as_object()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// Item access on a `Mapping`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DictAccess;

impl<S: Mapping + ?Sized> Accessor<S> for DictAccess {
    fn get(&self, source: &S, name: &str) -> Result<Value, LookupError> {
        source
            .get_item(name)
            .ok_or_else(|| LookupError::MissingKey {
                key: name.to_string(),
            })
    }

    fn names(&self, source: &S) -> Result<Vec<String>, LookupError> {
        Ok(source.keys())
    }
}

// ─────────────────────────────────────────────────────────────
// Custom strategies
// ─────────────────────────────────────────────────────────────

/// Accessor built from a lookup closure and an enumeration closure
#[derive(Clone, Copy)]
pub struct FnAccessor<G, L> {
    get: G,
    list: L,
}

impl<G, L> FnAccessor<G, L> {
    pub fn new(get: G, list: L) -> Self {
        Self { get, list }
    }
}

impl<G, L> std::fmt::Debug for FnAccessor<G, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnAccessor").finish_non_exhaustive()
    }
}

impl<S, G, L> Accessor<S> for FnAccessor<G, L>
where
    S: ?Sized,
    G: Fn(&S, &str) -> Result<Value, LookupError>,
    L: Fn(&S) -> Vec<String>,
{
    fn get(&self, source: &S, name: &str) -> Result<Value, LookupError> {
        (self.get)(source, name)
    }

    fn names(&self, source: &S) -> Result<Vec<String>, LookupError> {
        Ok((self.list)(source))
    }
}
