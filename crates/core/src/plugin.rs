//! Plugin capability: the marker trait and the constructor contract.
//!
//! A plugin declaration resolves to a symbol in a fixed per-alias plugin
//! unit. That symbol must be a [`PluginFactory`] -- the conformance check --
//! and is instantiated with resolved arguments at document construction
//! time, before any entry resolution.

use std::any::Any;
use std::sync::Arc;

use crate::call::CallArgs;
use crate::error::ResolveError;
use crate::symbol::Symbol;

/// Marker capability implemented by every recognized plugin instance.
pub trait Plugin: Send + Sync {
    /// Downcasting hook so embedders can recover the concrete type.
    fn as_any(&self) -> &dyn Any;
}

/// A symbol that can construct a plugin instance from resolved arguments.
pub trait PluginFactory: Send + Sync {
    fn instantiate(&self, args: &CallArgs) -> Result<Arc<dyn Plugin>, ResolveError>;
}

struct FnFactory<F>(F);

impl<F> PluginFactory for FnFactory<F>
where
    F: Fn(&CallArgs) -> Result<Arc<dyn Plugin>, ResolveError> + Send + Sync,
{
    fn instantiate(&self, args: &CallArgs) -> Result<Arc<dyn Plugin>, ResolveError> {
        (self.0)(args)
    }
}

/// Wrap a constructor closure as a plugin-constructor symbol.
pub fn plugin_ctor<F>(f: F) -> Symbol
where
    F: Fn(&CallArgs) -> Result<Arc<dyn Plugin>, ResolveError> + Send + Sync + 'static,
{
    Symbol::PluginCtor(Arc::new(FnFactory(f)))
}
