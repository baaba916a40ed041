//! spindle-resolve: document parser and entry resolution engine.
//!
//! Walks a parsed YAML document, classifies each node (literal, list,
//! mapping, or invocation descriptor), resolves cross-references between
//! nodes -- including across imported sub-documents -- and produces eager
//! or deferred invocation results.
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//! use spindle_core::HostRegistry;
//! use spindle_resolve::{DocumentParser, InMemorySource};
//!
//! let source = InMemorySource::new().with_file(
//!     "/docs/cfg.yml",
//!     "val: 9\nroot:\n  module: math\n  source: sqrt\n  args:\n    - .val\n",
//! );
//! let host = Arc::new(HostRegistry::with_builtins());
//! let mut parser = DocumentParser::load_from(
//!     Arc::new(source),
//!     "/docs/cfg.yml",
//!     host,
//!     Default::default(),
//! )
//! .unwrap();
//! let out = parser.parse().unwrap();
//! assert_eq!(out.get("root").unwrap().as_f64(), Some(3.0));
//! ```

pub mod document;
mod reference;
pub mod source;

pub use document::DocumentParser;
pub use source::{DocumentSource, FileSystemSource, InMemorySource};

use indexmap::IndexMap;
use std::path::Path;
use std::sync::Arc;

use spindle_core::{DictEntry, ResolveError, SymbolHost, Value};

/// Load and fully resolve a filesystem document in one call.
///
/// Returns the resolved top-level mapping together with the parser, which
/// keeps the variable scope and any instantiated plugins.
pub fn parse_document(
    path: impl AsRef<Path>,
    host: Arc<dyn SymbolHost>,
) -> Result<(DictEntry, DocumentParser), ResolveError> {
    parse_document_with(path, host, IndexMap::new())
}

/// Load and fully resolve a filesystem document with external overrides.
pub fn parse_document_with(
    path: impl AsRef<Path>,
    host: Arc<dyn SymbolHost>,
    overrides: IndexMap<String, Value>,
) -> Result<(DictEntry, DocumentParser), ResolveError> {
    let mut parser = DocumentParser::load_with(path, host, overrides)?;
    let entries = parser.parse()?;
    Ok((entries, parser))
}
