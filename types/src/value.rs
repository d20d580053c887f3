use std::{
    collections::{BTreeMap, HashMap},
    fmt::{self, Display},
    sync::Arc,
};

use errors::RenderError;

use crate::Func;

/// Host data exposed to templates through attribute and key lookup
pub trait Object: fmt::Debug + Send + Sync {
    /// Name used in error messages
    fn type_name(&self) -> &str {
        "object"
    }

    /// Attribute style lookup (`value.name`)
    fn get_attr(&self, name: &str) -> Option<Value>;

    /// Key style lookup, tried when [Object::get_attr] finds nothing
    fn get_item(&self, _key: &str) -> Option<Value> {
        None
    }

    /// Elements produced when the object is the target of a `for` tag
    fn iterate(&self) -> Option<Vec<Value>> {
        None
    }

    fn is_truthy(&self) -> bool {
        true
    }

    /// Text produced when the object is output directly
    fn render(&self) -> String {
        format!("<{}>", self.type_name())
    }
}

/// A value visible to templates
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Object(Arc<dyn Object>),
    Func(Func),
}

impl Value {
    /// Wrap host data implementing [Object]
    pub fn object(object: impl Object + 'static) -> Self {
        Value::Object(Arc::new(object))
    }

    /// Short name for the kind of value, used in error messages
    pub fn kind(&self) -> &str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(object) => object.type_name(),
            Value::Func(_) => "func",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(entries) => !entries.is_empty(),
            Value::Object(object) => object.is_truthy(),
            Value::Func(_) => true,
        }
    }

    /// Attribute style lookup
    ///
    /// Only objects have attributes, maps and lists expose their contents
    /// through [Value::get_item].
    pub fn get_attr(&self, name: &str) -> Option<Value> {
        match self {
            Value::Object(object) => object.get_attr(name),
            _ => None,
        }
    }

    /// Key style lookup
    pub fn get_item(&self, key: &str) -> Option<Value> {
        match self {
            Value::Map(entries) => entries.get(key).cloned(),
            Value::Object(object) => object.get_item(key),
            _ => None,
        }
    }

    /// The elements a `for` tag iterates over
    ///
    /// Maps yield their keys, strings yield one-character strings.
    pub fn iterate(&self) -> Result<Vec<Value>, RenderError> {
        match self {
            Value::List(items) => Ok(items.clone()),
            Value::Map(entries) => Ok(entries.keys().cloned().map(Value::String).collect()),
            Value::String(s) => Ok(s.chars().map(|c| Value::String(c.to_string())).collect()),
            Value::Object(object) => object
                .iterate()
                .ok_or_else(|| RenderError::NotIterable(self.kind().to_string())),
            _ => Err(RenderError::NotIterable(self.kind().to_string())),
        }
    }

    /// Form used when the value is nested inside a list or map
    fn repr(&self) -> String {
        match self {
            Value::None => "none".to_string(),
            Value::String(s) => format!("{s:?}"),
            other => other.to_string(),
        }
    }
}

/// Output text: `None` is empty and bools are lowercase `true`/`false`
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::List(items) => {
                let items: Vec<String> = items.iter().map(Value::repr).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Map(entries) => {
                let entries: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| format!("{key:?}: {}", value.repr()))
                    .collect();
                write!(f, "{{{}}}", entries.join(", "))
            }
            Value::Object(object) => write!(f, "{}", object.render()),
            Value::Func(func) => write!(f, "<func {}>", func.name()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Func(a), Value::Func(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Func> for Value {
    fn from(value: Func) -> Self {
        Value::Func(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl<V: Into<Value>> From<BTreeMap<String, V>> for Value {
    fn from(value: BTreeMap<String, V>) -> Self {
        Value::Map(value.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<V: Into<Value>> From<HashMap<String, V>> for Value {
    fn from(value: HashMap<String, V>) -> Self {
        Value::Map(value.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[derive(Debug)]
    struct User {
        name: String,
    }

    impl Object for User {
        fn type_name(&self) -> &str {
            "User"
        }

        fn get_attr(&self, name: &str) -> Option<Value> {
            match name {
                "name" => Some(self.name.clone().into()),
                _ => None,
            }
        }
    }

    #[rstest]
    #[case(Value::None, false)]
    #[case(Value::Bool(false), false)]
    #[case(Value::Bool(true), true)]
    #[case(Value::Int(0), false)]
    #[case(Value::Int(-1), true)]
    #[case(Value::Float(0.0), false)]
    #[case(Value::Float(0.5), true)]
    #[case(Value::from(""), false)]
    #[case(Value::from("x"), true)]
    #[case(Value::List(vec![]), false)]
    #[case(Value::from(vec![1]), true)]
    #[case(Value::Map(BTreeMap::new()), false)]
    fn truthiness(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(expected, value.is_truthy());
    }

    #[rstest]
    #[case(Value::None, "")]
    #[case(Value::Bool(true), "true")]
    #[case(Value::Int(42), "42")]
    #[case(Value::Float(1.5), "1.5")]
    #[case(Value::from("hi"), "hi")]
    #[case(Value::from(vec![1, 2, 3]), "[1, 2, 3]")]
    #[case(Value::from(vec!["a", "b"]), "[\"a\", \"b\"]")]
    #[case(Value::from(BTreeMap::from([("k".to_string(), 1)])), "{\"k\": 1}")]
    #[case(Value::from(Func::nullary("f", || Ok(Value::None))), "<func f>")]
    fn display(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(expected, value.to_string());
    }

    #[test]
    fn objects_render_and_resolve_attributes() {
        let user = Value::object(User {
            name: "Ann".to_string(),
        });

        assert_eq!("<User>", user.to_string());
        assert_eq!("User", user.kind());
        assert_eq!(Some(Value::from("Ann")), user.get_attr("name"));
        assert_eq!(None, user.get_item("name"));
    }

    #[test]
    fn maps_resolve_keys_but_not_attributes() {
        let map = Value::from(BTreeMap::from([("name".to_string(), "Ann")]));

        assert_eq!(None, map.get_attr("name"));
        assert_eq!(Some(Value::from("Ann")), map.get_item("name"));
    }

    #[test]
    fn iterates_lists_maps_and_strings() {
        assert_eq!(
            Ok(vec![Value::Int(1), Value::Int(2)]),
            Value::from(vec![1, 2]).iterate()
        );
        assert_eq!(
            Ok(vec![Value::from("a"), Value::from("b")]),
            Value::from(BTreeMap::from([
                ("b".to_string(), 2),
                ("a".to_string(), 1)
            ]))
            .iterate()
        );
        assert_eq!(
            Ok(vec![Value::from("o"), Value::from("k")]),
            Value::from("ok").iterate()
        );
        assert_eq!(
            Err(RenderError::NotIterable("int".to_string())),
            Value::Int(3).iterate()
        );
    }

    #[test]
    fn converts_from_json() {
        let value = Value::from(serde_json::json!({
            "n": 1,
            "f": 2.5,
            "items": [true, null],
        }));

        assert_eq!(
            Value::Map(BTreeMap::from([
                ("n".to_string(), Value::Int(1)),
                ("f".to_string(), Value::Float(2.5)),
                (
                    "items".to_string(),
                    Value::List(vec![Value::Bool(true), Value::None])
                ),
            ])),
            value
        );
    }
}
