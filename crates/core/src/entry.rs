//! The resolved entry graph.
//!
//! Every node of a parsed document resolves to an [`Entry`]: a literal
//! field, an ordered list, an ordered mapping, or an invocation result.
//! [`DictEntry`] doubles as the variable scope that accumulates every
//! top-level and args-level binding during resolution.

use indexmap::IndexMap;

use crate::call::CallArgs;
use crate::symbol::Symbol;
use crate::value::Value;

/// How an invocation descriptor's symbol is (or is not) called.
///
/// Maps from the `call` field: `false`, `true`, or a method name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvocationMode {
    /// `call: false` -- return the symbol uncalled.
    Skip,
    /// `call: true` -- invoke the symbol itself.
    CallDirect,
    /// `call: "<name>"` -- invoke the named method of the symbol.
    CallMethod(String),
}

/// A resolved node in the output graph.
#[derive(Clone, Debug)]
pub enum Entry {
    Field(FieldEntry),
    List(ListEntry),
    Dict(DictEntry),
    Module(ModuleEntry),
}

impl Entry {
    /// A literal leaf entry.
    pub fn field(key: impl Into<String>, value: impl Into<Value>) -> Entry {
        Entry::Field(FieldEntry {
            key: key.into(),
            value: value.into(),
        })
    }

    /// The resolved value of this entry.
    pub fn value(&self) -> Value {
        match self {
            Entry::Field(field) => field.value.clone(),
            Entry::List(list) => Value::List(list.items.iter().map(Entry::value).collect()),
            Entry::Dict(dict) => Value::Map(
                dict.entries
                    .iter()
                    .map(|(k, e)| (k.clone(), e.value()))
                    .collect(),
            ),
            Entry::Module(module) => module.value.clone(),
        }
    }
}

/// A literal leaf: key plus value, immutable once created.
#[derive(Clone, Debug)]
pub struct FieldEntry {
    pub key: String,
    pub value: Value,
}

/// An ordered sequence of entries. Order is significant.
#[derive(Clone, Debug, Default)]
pub struct ListEntry {
    items: Vec<Entry>,
}

impl ListEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: Entry) {
        self.items.push(entry);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.items.iter()
    }
}

/// An insertion-ordered mapping of entries; also the variable scope.
///
/// Two lookup flavors: [`get`](DictEntry::get) unwraps an entry to its
/// resolved value, [`entry`](DictEntry::entry) returns the stored entry
/// itself. The scope uses the latter so cross-document references compose
/// without re-resolving.
#[derive(Clone, Debug, Default)]
pub struct DictEntry {
    entries: IndexMap<String, Entry>,
}

impl DictEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: Entry) {
        self.entries.insert(key.into(), entry);
    }

    /// Resolving lookup: the entry's value.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(Entry::value)
    }

    /// Non-resolving lookup: the stored entry itself.
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }
}

/// A pending or completed invocation.
#[derive(Clone, Debug)]
pub struct ModuleEntry {
    pub key: String,
    /// The symbol the descriptor named.
    pub symbol: Symbol,
    pub mode: InvocationMode,
    pub lazy: bool,
    /// Arguments resolved from the descriptor's `args`.
    pub args: CallArgs,
    /// Invocation result (eager), deferred wrapper (lazy), or the uncalled
    /// symbol (`Skip`).
    pub value: Value,
}
