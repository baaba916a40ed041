//! spindle-core: entry model, symbol namespaces, and plugin capability for
//! the spindle configuration-resolution engine.
//!
//! A spindle document describes values to build, symbols to invoke, and
//! references between them. This crate holds the pieces the resolution
//! engine (in `spindle-resolve`) assembles:
//!
//! - [`Entry`] / [`DictEntry`] -- the resolved output graph and the
//!   accumulating variable scope
//! - [`Value`] / [`Symbol`] -- runtime values and what namespace lookups
//!   yield
//! - [`CallArgs`] / [`DeferredCall`] -- resolved invocation arguments and
//!   the lazy-call wrapper
//! - [`SymbolNamespace`] / [`SymbolHost`] / [`HostRegistry`] -- the bounded
//!   registry abstraction standing in for dynamic import
//! - [`Plugin`] / [`PluginFactory`] -- the plugin capability contract
//! - [`ResolveError`] -- the single error type for the whole pipeline

pub mod builtins;
pub mod call;
pub mod entry;
pub mod error;
pub mod namespace;
pub mod plugin;
pub mod symbol;
pub mod value;

// ── Convenience re-exports: key types ────────────────────────────────

pub use call::{resolve_target, CallArgs, DeferredCall, NativeFn};
pub use entry::{DictEntry, Entry, FieldEntry, InvocationMode, ListEntry, ModuleEntry};
pub use error::ResolveError;
pub use namespace::{HostRegistry, StaticNamespace, SymbolHost, SymbolNamespace};
pub use plugin::{plugin_ctor, Plugin, PluginFactory};
pub use symbol::{Object, Symbol};
pub use value::Value;
