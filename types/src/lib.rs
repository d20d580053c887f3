use std::collections::HashMap;

use errors::ContextError;
use serde::Serialize;

pub use func::Func;
pub use value::{Object, Value};

pub mod func;
pub mod value;

/// Names and values visible to a template while it renders
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Context(HashMap<String, Value>);

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from any value that serializes to a map
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, ContextError> {
        let json = serde_json::to_value(value).map_err(|e| ContextError::SerializationError {
            message: e.to_string(),
        })?;

        match Value::from(json) {
            Value::Map(entries) => Ok(entries.into_iter().collect()),
            other => Err(ContextError::NotAMap(other.kind().to_string())),
        }
    }

    /// Add or replace a value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Builder form of [Context::insert]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overlay `other` on to this context, values in `other` win
    pub fn merge(&mut self, other: &Context) {
        self.0
            .extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Merge contexts in order, later contexts overriding earlier ones
    pub fn merged<'a>(contexts: impl IntoIterator<Item = &'a Context>) -> Self {
        contexts.into_iter().fold(Context::new(), |mut acc, ctx| {
            acc.merge(ctx);
            acc
        })
    }

    /// The names defined in the context
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<HashMap<String, Value>> for Context {
    fn from(value: HashMap<String, Value>) -> Self {
        Self(value)
    }
}
