//! Runtime values produced by entry resolution.
//!
//! `Value` is what a resolved entry ultimately yields: a YAML-shaped data
//! value, a native function (from `call: false`), a host object, or a
//! deferred invocation (from `lazy: true`). Conversion from raw document
//! nodes is fallible -- mapping keys must be strings.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use crate::call::{DeferredCall, NativeFn};
use crate::error::ResolveError;
use crate::symbol::Object;

/// A resolved runtime value.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    /// An uncalled native function.
    Func(NativeFn),
    /// An attribute-bearing host object.
    Object(Arc<dyn Object>),
    /// A pending invocation, handed to the caller uncalled.
    Deferred(DeferredCall),
}

impl Value {
    /// Convert a raw document node into a value.
    ///
    /// Numbers become `Int` when they fit in `i64`, `Float` otherwise.
    /// Tagged nodes are unwrapped to their inner value.
    pub fn from_yaml(node: &serde_yaml::Value) -> Result<Value, ResolveError> {
        use serde_yaml::Value as Yaml;
        Ok(match node {
            Yaml::Null => Value::Null,
            Yaml::Bool(b) => Value::Bool(*b),
            Yaml::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    return Err(ResolveError::Schema {
                        message: format!("unrepresentable number: {n:?}"),
                    });
                }
            }
            Yaml::String(s) => Value::Str(s.clone()),
            Yaml::Sequence(items) => Value::List(
                items
                    .iter()
                    .map(Value::from_yaml)
                    .collect::<Result<_, _>>()?,
            ),
            Yaml::Mapping(map) => {
                let mut out = IndexMap::with_capacity(map.len());
                for (k, v) in map {
                    let key = k.as_str().ok_or_else(|| ResolveError::Schema {
                        message: format!("mapping keys must be strings, got {k:?}"),
                    })?;
                    out.insert(key.to_owned(), Value::from_yaml(v)?);
                }
                Value::Map(out)
            }
            Yaml::Tagged(tagged) => Value::from_yaml(&tagged.value)?,
        })
    }

    /// Human-readable kind of this value, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Func(_) => "function",
            Value::Object(_) => "object",
            Value::Deferred(_) => "deferred call",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers coerce to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&NativeFn> {
        match self {
            Value::Func(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Arc<dyn Object>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_deferred(&self) -> Option<&DeferredCall> {
        match self {
            Value::Deferred(d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(i) => write!(f, "Int({i})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Value::Func(_) => f.write_str("Func(<native>)"),
            Value::Object(o) => write!(f, "Object(<{}>)", o.type_name()),
            Value::Deferred(d) => write!(f, "Deferred({d:?})"),
        }
    }
}

/// Structural equality for data values; `Func` and `Object` compare by
/// pointer, `Deferred` never compares equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Func(a), Value::Func(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> serde_yaml::Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn from_yaml_scalars() {
        assert_eq!(Value::from_yaml(&yaml("5")).unwrap(), Value::Int(5));
        assert_eq!(Value::from_yaml(&yaml("2.5")).unwrap(), Value::Float(2.5));
        assert_eq!(Value::from_yaml(&yaml("true")).unwrap(), Value::Bool(true));
        assert_eq!(Value::from_yaml(&yaml("null")).unwrap(), Value::Null);
        assert_eq!(Value::from_yaml(&yaml("hi")).unwrap(), Value::from("hi"));
    }

    #[test]
    fn from_yaml_nested() {
        let v = Value::from_yaml(&yaml("a:\n  - 1\n  - x: 2\n")).unwrap();
        let map = v.as_map().unwrap();
        let list = map["a"].as_list().unwrap();
        assert_eq!(list[0], Value::Int(1));
        assert_eq!(list[1].as_map().unwrap()["x"], Value::Int(2));
    }

    #[test]
    fn from_yaml_rejects_non_string_keys() {
        let err = Value::from_yaml(&yaml("1: a")).unwrap_err();
        assert!(matches!(err, ResolveError::Schema { .. }));
    }

    #[test]
    fn int_coerces_to_f64() {
        assert_eq!(Value::Int(4).as_f64(), Some(4.0));
        assert_eq!(Value::Int(4), Value::Float(4.0));
    }
}
