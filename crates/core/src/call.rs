//! Call arguments, the deferred-invocation wrapper, and target resolution.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use crate::entry::InvocationMode;
use crate::error::ResolveError;
use crate::symbol::Symbol;
use crate::value::Value;

/// Signature of a callable symbol: resolved keyword/positional arguments in,
/// one value out.
pub type NativeFn = Arc<dyn Fn(&CallArgs) -> Result<Value, ResolveError> + Send + Sync>;

/// Resolved arguments for an invocation: named keyword arguments in
/// insertion order plus positional arguments.
#[derive(Clone, Debug, Default)]
pub struct CallArgs {
    named: IndexMap<String, Value>,
    positional: Vec<Value>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_named(&mut self, name: impl Into<String>, value: Value) {
        self.named.insert(name.into(), value);
    }

    pub fn push(&mut self, value: Value) {
        self.positional.push(value);
    }

    pub fn named(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    pub fn at(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn iter_named(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.named.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.named.len() + self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.positional.is_empty()
    }

    /// The sole argument, named or positional, if exactly one was supplied.
    pub fn sole(&self) -> Option<&Value> {
        match (self.named.len(), self.positional.len()) {
            (1, 0) => self.named.values().next(),
            (0, 1) => self.positional.first(),
            _ => None,
        }
    }

    /// All argument values, named first, in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.named.values().chain(self.positional.iter())
    }

    /// Merge `overrides` over these arguments for a single call.
    ///
    /// Named overrides win per key; positional overrides, when present,
    /// replace the bound positional list wholesale. The receiver is left
    /// untouched.
    pub fn merged(&self, overrides: &CallArgs) -> CallArgs {
        let mut out = self.clone();
        for (name, value) in &overrides.named {
            out.named.insert(name.clone(), value.clone());
        }
        if !overrides.positional.is_empty() {
            out.positional = overrides.positional.clone();
        }
        out
    }
}

impl FromIterator<(String, Value)> for CallArgs {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        CallArgs {
            named: iter.into_iter().collect(),
            positional: Vec::new(),
        }
    }
}

/// A pending invocation: a callable target bound to pre-resolved arguments.
///
/// Produced for `lazy: true` descriptors and handed to the caller uncalled.
/// Every invocation recomputes from the bound arguments; nothing is cached.
#[derive(Clone)]
pub struct DeferredCall {
    target: NativeFn,
    bound: CallArgs,
}

impl DeferredCall {
    pub fn new(target: NativeFn, bound: CallArgs) -> Self {
        Self { target, bound }
    }

    /// The arguments this call is bound to.
    pub fn bound(&self) -> &CallArgs {
        &self.bound
    }

    /// Invoke the target with the bound arguments.
    pub fn invoke(&self) -> Result<Value, ResolveError> {
        (self.target)(&self.bound)
    }

    /// Invoke with per-call overrides merged over the bound arguments.
    /// The wrapper itself is not mutated.
    pub fn invoke_with(&self, overrides: &CallArgs) -> Result<Value, ResolveError> {
        (self.target)(&self.bound.merged(overrides))
    }
}

impl fmt::Debug for DeferredCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredCall")
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}

/// Resolve the callable a descriptor will invoke, per its invocation mode.
///
/// `Skip` has no call target; callers handle it before asking for one.
pub fn resolve_target(symbol: &Symbol, mode: &InvocationMode) -> Result<NativeFn, ResolveError> {
    match mode {
        InvocationMode::Skip => Err(ResolveError::Invocation {
            message: "no call target for call: false".to_owned(),
        }),
        InvocationMode::CallDirect => match symbol {
            Symbol::Func(f) => Ok(f.clone()),
            other => Err(ResolveError::NotCallable {
                what: other.kind().to_owned(),
            }),
        },
        InvocationMode::CallMethod(name) => match symbol {
            Symbol::Object(obj) => match obj.attr(name) {
                Some(Symbol::Func(f)) => Ok(f),
                Some(_) => Err(ResolveError::NotCallable {
                    what: format!("{}.{}", obj.type_name(), name),
                }),
                None => Err(ResolveError::NoSuchMethod {
                    method: name.clone(),
                    on: obj.type_name().to_owned(),
                }),
            },
            other => Err(ResolveError::NoSuchMethod {
                method: name.clone(),
                on: other.kind().to_owned(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn args(pairs: &[(&str, Value)]) -> CallArgs {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    #[test]
    fn merged_overrides_win_without_mutating() {
        let bound = args(&[("a", Value::Int(1)), ("b", Value::Int(2))]);
        let overrides = args(&[("b", Value::Int(9))]);
        let merged = bound.merged(&overrides);
        assert_eq!(merged.named("a"), Some(&Value::Int(1)));
        assert_eq!(merged.named("b"), Some(&Value::Int(9)));
        assert_eq!(bound.named("b"), Some(&Value::Int(2)));
    }

    #[test]
    fn merged_positional_replaces_wholesale() {
        let mut bound = CallArgs::new();
        bound.push(Value::Int(1));
        bound.push(Value::Int(2));
        let mut overrides = CallArgs::new();
        overrides.push(Value::Int(7));
        let merged = bound.merged(&overrides);
        assert_eq!(merged.positional(), &[Value::Int(7)]);
        assert_eq!(bound.positional().len(), 2);
    }

    #[test]
    fn sole_distinguishes_shapes() {
        let one = args(&[("n", Value::Int(4))]);
        assert_eq!(one.sole(), Some(&Value::Int(4)));
        let two = args(&[("a", Value::Int(1)), ("b", Value::Int(2))]);
        assert_eq!(two.sole(), None);
        let mut pos = CallArgs::new();
        pos.push(Value::Int(3));
        assert_eq!(pos.sole(), Some(&Value::Int(3)));
    }

    #[test]
    fn deferred_call_recomputes_every_time() {
        let hits = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&hits);
        let target: NativeFn = Arc::new(move |_| {
            Ok(Value::Int(
                (counter.fetch_add(1, Ordering::SeqCst) + 1) as i64,
            ))
        });
        let call = DeferredCall::new(target, CallArgs::new());
        assert_eq!(call.invoke().unwrap(), Value::Int(1));
        assert_eq!(call.invoke().unwrap(), Value::Int(2));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn deferred_overrides_do_not_stick() {
        let target: NativeFn = Arc::new(|args| {
            Ok(args.named("n").cloned().unwrap_or(Value::Null))
        });
        let call = DeferredCall::new(target, args(&[("n", Value::Int(1))]));
        let overrides = args(&[("n", Value::Int(5))]);
        assert_eq!(call.invoke_with(&overrides).unwrap(), Value::Int(5));
        assert_eq!(call.invoke().unwrap(), Value::Int(1));
    }

    #[test]
    fn call_direct_requires_a_function() {
        let Err(err) = resolve_target(&Symbol::constant(1), &InvocationMode::CallDirect) else {
            panic!("a constant should not be callable");
        };
        assert!(matches!(err, ResolveError::NotCallable { .. }));
    }
}
