use std::path::PathBuf;

/// All errors produced while loading documents, resolving entries, loading
/// symbols, or instantiating plugins.
///
/// Construction-time failures (bad directives, missing local units, plugin
/// problems) and resolution-time failures (bad references, bad invocations)
/// share this one type; there is no local recovery, every failure surfaces
/// to the immediate caller.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Document could not be read.
    #[error("failed to read document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid YAML.
    #[error("failed to parse document {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Malformed directive or descriptor shape.
    #[error("{message}")]
    Schema { message: String },

    /// An import chain revisits a document.
    #[error("import cycle: {chain}")]
    ImportCycle { chain: String },

    /// No local code unit is available at the given path.
    #[error("local code unit not found: {path}")]
    UnitNotFound { path: PathBuf },

    /// No namespace is registered under the given dotted path.
    #[error("unknown namespace: {path}")]
    NamespaceNotFound { path: String },

    /// No plugin unit is registered under the given alias.
    #[error("unknown plugin: {alias}")]
    PluginNotFound { alias: String },

    /// The namespace exists but does not expose the requested symbol.
    #[error("namespace '{namespace}' has no symbol '{symbol}'")]
    SymbolNotFound { namespace: String, symbol: String },

    /// A reference names an entry that has not been resolved yet.
    #[error("entry not found: {name}")]
    UnknownReference { name: String },

    /// A scoped reference names an alias that was never imported.
    #[error("module alias not found: {alias}")]
    UnknownModule { alias: String },

    /// `module: local` was used in a document that declared no local unit.
    #[error("local unit is not given")]
    MissingLocal,

    /// A scoped reference was used in a document that declared no imports.
    #[error("import is not given")]
    MissingImport,

    /// `call: true` (or a method call) landed on something not callable.
    #[error("cannot invoke {what}: not callable")]
    NotCallable { what: String },

    /// The requested method is absent on the resolved object.
    #[error("no method '{method}' on {on}")]
    NoSuchMethod { method: String, on: String },

    /// The plugin symbol does not conform to the plugin capability.
    #[error("symbol '{symbol}' for plugin '{alias}' is not a plugin constructor")]
    PluginContract { alias: String, symbol: String },

    /// A native function rejected its arguments.
    #[error("invocation failed: {message}")]
    Invocation { message: String },
}
