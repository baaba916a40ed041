//! Symbol namespaces and the host capability registry.
//!
//! Dynamic symbol lookup is a bounded registry abstraction, not reflection:
//! a [`SymbolNamespace`] resolves a name to a [`Symbol`] or nothing, and a
//! [`SymbolHost`] bundles the three host capabilities the engine needs --
//! dotted-path namespace resolution, local code unit loading, and the fixed
//! plugin namespace. [`HostRegistry`] is the concrete, test-injectable
//! implementation populated ahead of time.

use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::builtins;
use crate::call::CallArgs;
use crate::error::ResolveError;
use crate::symbol::Symbol;
use crate::value::Value;

/// A named collection of symbols with a single lookup operation.
pub trait SymbolNamespace: Send + Sync {
    fn resolve(&self, name: &str) -> Option<Symbol>;
}

/// Builder-style namespace backed by an ordered map.
#[derive(Default)]
pub struct StaticNamespace {
    symbols: IndexMap<String, Symbol>,
}

impl StaticNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, symbol: Symbol) {
        self.symbols.insert(name.into(), symbol);
    }

    pub fn with_symbol(mut self, name: impl Into<String>, symbol: Symbol) -> Self {
        self.insert(name, symbol);
        self
    }

    pub fn with_value(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with_symbol(name, Symbol::Const(value.into()))
    }

    pub fn with_fn<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&CallArgs) -> Result<Value, ResolveError> + Send + Sync + 'static,
    {
        self.with_symbol(name, Symbol::function(f))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }
}

impl SymbolNamespace for StaticNamespace {
    fn resolve(&self, name: &str) -> Option<Symbol> {
        self.symbols.get(name).cloned()
    }
}

/// Host-runtime capabilities consumed by the resolution engine.
pub trait SymbolHost: Send + Sync {
    /// Resolve a dotted namespace path to a namespace.
    fn namespace(&self, path: &str) -> Option<Arc<dyn SymbolNamespace>>;

    /// Load a local code unit by path, exposing its top-level symbols.
    fn load_unit(&self, path: &Path) -> Result<Arc<dyn SymbolNamespace>, ResolveError>;

    /// The fixed plugin namespace: one unit per plugin alias.
    fn plugin_unit(&self, alias: &str) -> Option<Arc<dyn SymbolNamespace>>;
}

/// Concrete [`SymbolHost`] holding namespaces, code units keyed by path,
/// and plugin units keyed by alias.
#[derive(Default)]
pub struct HostRegistry {
    namespaces: IndexMap<String, Arc<dyn SymbolNamespace>>,
    units: HashMap<PathBuf, Arc<dyn SymbolNamespace>>,
    plugin_units: IndexMap<String, Arc<dyn SymbolNamespace>>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in `math` namespace pre-registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_namespace("math", builtins::math());
        registry
    }

    pub fn register_namespace(
        &mut self,
        path: impl Into<String>,
        namespace: impl SymbolNamespace + 'static,
    ) {
        self.namespaces.insert(path.into(), Arc::new(namespace));
    }

    pub fn register_unit(
        &mut self,
        path: impl Into<PathBuf>,
        unit: impl SymbolNamespace + 'static,
    ) {
        self.units.insert(path.into(), Arc::new(unit));
    }

    pub fn register_plugin_unit(
        &mut self,
        alias: impl Into<String>,
        unit: impl SymbolNamespace + 'static,
    ) {
        self.plugin_units.insert(alias.into(), Arc::new(unit));
    }
}

impl SymbolHost for HostRegistry {
    fn namespace(&self, path: &str) -> Option<Arc<dyn SymbolNamespace>> {
        self.namespaces.get(path).cloned()
    }

    fn load_unit(&self, path: &Path) -> Result<Arc<dyn SymbolNamespace>, ResolveError> {
        self.units
            .get(path)
            .cloned()
            .ok_or_else(|| ResolveError::UnitNotFound {
                path: path.to_owned(),
            })
    }

    fn plugin_unit(&self, alias: &str) -> Option<Arc<dyn SymbolNamespace>> {
        self.plugin_units.get(alias).cloned()
    }
}
