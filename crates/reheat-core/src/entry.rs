//! Bundler entry description model.
//!
//! An entry description is the unit of bundler configuration specifying
//! where a build starts loading modules from. Four shapes are legal: a
//! single path, an ordered list of paths, a named map of nested entries
//! (one per output chunk), and a factory computed at build time. The typed
//! union below makes shape dispatch exhaustive at compile time; the one
//! place duck typing still exists is the JSON boundary
//! ([`Entry::from_value`]), which rejects anything else.

use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::error::Error;

/// Arguments forwarded verbatim to a dynamic entry factory.
pub type FactoryArgs = Vec<Value>;

/// Error produced by a user-supplied entry factory.
///
/// Boxed so the failure keeps its original identity and message when it
/// passes through the injection wrapper.
pub type FactoryError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The factory backing [`Entry::Dynamic`].
///
/// Synchronous to call; always yields a deferred entry description. A
/// factory whose value is already known returns an immediately-ready
/// future.
pub type EntryFactory =
    Arc<dyn Fn(FactoryArgs) -> BoxFuture<'static, Result<Entry, FactoryError>> + Send + Sync>;

/// A bundler entry description.
#[derive(Clone)]
pub enum Entry {
    /// A single module path.
    Single(String),
    /// An ordered list of module paths loaded at one position.
    List(Vec<String>),
    /// Named entry points, one nested description per output chunk.
    /// Insertion order is preserved.
    Named(IndexMap<String, Entry>),
    /// An entry computed at build time by the bundler.
    Dynamic(EntryFactory),
}

impl Entry {
    /// Create a single-path entry.
    #[must_use]
    pub fn single(path: impl Into<String>) -> Self {
        Self::Single(path.into())
    }

    /// Create a list entry from any iterable of paths.
    #[must_use]
    pub fn list<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(paths.into_iter().map(Into::into).collect())
    }

    /// Create a named entry from key/description pairs, preserving order.
    #[must_use]
    pub fn named<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Entry)>,
        K: Into<String>,
    {
        Self::Named(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Create a dynamic entry from an async factory closure.
    #[must_use]
    pub fn dynamic<F, Fut>(factory: F) -> Self
    where
        F: Fn(FactoryArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Entry, FactoryError>> + Send + 'static,
    {
        Self::Dynamic(Arc::new(move |args| {
            let fut: BoxFuture<'static, Result<Entry, FactoryError>> = Box::pin(factory(args));
            fut
        }))
    }

    /// Resolve one level of dynamism: invoke the factory of a
    /// [`Entry::Dynamic`] with `args`; static variants resolve to
    /// themselves. The resolved value may itself be dynamic — no depth is
    /// enforced here.
    pub async fn resolve(self, args: FactoryArgs) -> Result<Entry, FactoryError> {
        match self {
            Self::Dynamic(factory) => factory(args).await,
            entry => Ok(entry),
        }
    }

    /// Parse an entry description from a raw JSON config value.
    ///
    /// This is the duck-typed boundary: a string, an array of strings, or
    /// a keyed map (recursively) are accepted; anything else fails with
    /// [`Error::UnrecognizedEntry`]. Factories cannot be expressed in JSON
    /// and are constructed programmatically instead.
    pub fn from_value(value: &Value) -> Result<Self, Error> {
        match value {
            Value::String(path) => Ok(Self::Single(path.clone())),
            Value::Array(items) => {
                let mut paths = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(path) => paths.push(path.clone()),
                        other => {
                            return Err(Error::UnrecognizedEntry {
                                found: json_kind(other),
                            })
                        }
                    }
                }
                Ok(Self::List(paths))
            }
            Value::Object(map) => {
                let mut entries = IndexMap::with_capacity(map.len());
                for (key, nested) in map {
                    entries.insert(key.clone(), Self::from_value(nested)?);
                }
                Ok(Self::Named(entries))
            }
            other => Err(Error::UnrecognizedEntry {
                found: json_kind(other),
            }),
        }
    }

    /// Render the entry description back to a JSON config value.
    ///
    /// Fails with [`Error::DynamicNotSerializable`] if a factory is
    /// reachable anywhere in the description.
    pub fn to_value(&self) -> Result<Value, Error> {
        match self {
            Self::Single(path) => Ok(Value::String(path.clone())),
            Self::List(paths) => Ok(Value::Array(
                paths.iter().cloned().map(Value::String).collect(),
            )),
            Self::Named(entries) => {
                let mut map = serde_json::Map::with_capacity(entries.len());
                for (key, nested) in entries {
                    map.insert(key.clone(), nested.to_value()?);
                }
                Ok(Value::Object(map))
            }
            Self::Dynamic(_) => Err(Error::DynamicNotSerializable),
        }
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(path) => f.debug_tuple("Single").field(path).finish(),
            Self::List(paths) => f.debug_tuple("List").field(paths).finish(),
            Self::Named(entries) => f.debug_tuple("Named").field(entries).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Structural equality over the static variants. Dynamic entries compare
/// unequal, factories included: two factories cannot be compared.
impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Single(a), Self::Single(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Named(a), Self::Named(b)) => a == b,
            _ => false,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
