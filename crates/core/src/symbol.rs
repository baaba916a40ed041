//! Symbols: what a namespace lookup yields.
//!
//! A symbol is either a plain constant, a native function, an
//! attribute-bearing object, or a plugin constructor. The resolution engine
//! decides how to use a symbol from the descriptor's invocation mode; a
//! namespace only hands symbols out.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::call::{CallArgs, NativeFn};
use crate::error::ResolveError;
use crate::plugin::PluginFactory;
use crate::value::Value;

/// An attribute-bearing runtime object; the target of `call: "<method>"`.
pub trait Object: Send + Sync {
    /// Name used in error messages.
    fn type_name(&self) -> &str {
        "object"
    }

    /// Look up a named attribute. `None` means the attribute is absent.
    fn attr(&self, name: &str) -> Option<Symbol>;

    /// Downcasting hook so embedders can recover the concrete type.
    fn as_any(&self) -> &dyn Any;
}

/// A value resolved from a symbol namespace.
#[derive(Clone)]
pub enum Symbol {
    /// A plain constant value.
    Const(Value),
    /// A callable native function.
    Func(NativeFn),
    /// An object exposing named attributes.
    Object(Arc<dyn Object>),
    /// A plugin constructor, only usable under the `plugins` directive.
    PluginCtor(Arc<dyn PluginFactory>),
}

impl Symbol {
    /// Wrap a closure as a function symbol.
    pub fn function<F>(f: F) -> Symbol
    where
        F: Fn(&CallArgs) -> Result<Value, ResolveError> + Send + Sync + 'static,
    {
        Symbol::Func(Arc::new(f))
    }

    /// Wrap a value as a constant symbol.
    pub fn constant(value: impl Into<Value>) -> Symbol {
        Symbol::Const(value.into())
    }

    /// Human-readable kind of this symbol, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Symbol::Const(_) => "constant",
            Symbol::Func(_) => "function",
            Symbol::Object(_) => "object",
            Symbol::PluginCtor(_) => "plugin constructor",
        }
    }

    /// The symbol as a plain value, uncalled (`call: false`).
    pub fn to_value(&self) -> Result<Value, ResolveError> {
        match self {
            Symbol::Const(v) => Ok(v.clone()),
            Symbol::Func(f) => Ok(Value::Func(f.clone())),
            Symbol::Object(o) => Ok(Value::Object(o.clone())),
            Symbol::PluginCtor(_) => Err(ResolveError::Invocation {
                message: "a plugin constructor cannot be used as a value".to_owned(),
            }),
        }
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Const(v) => f.debug_tuple("Const").field(v).finish(),
            Symbol::Func(_) => f.write_str("Func(<native>)"),
            Symbol::Object(o) => write!(f, "Object(<{}>)", o.type_name()),
            Symbol::PluginCtor(_) => f.write_str("PluginCtor(<factory>)"),
        }
    }
}
