//! Document parser and entry resolution engine.
//!
//! A [`DocumentParser`] is created once per document. Construction loads
//! the document, consumes the `local`, `import`, and `plugins` directives
//! (fail-fast, in that order), and fully parses imported sub-documents
//! depth-first -- by the time any `alias.name` reference is evaluated, the
//! child's variables are populated. [`parse`](DocumentParser::parse) then
//! resolves the remaining top-level entries in document order, feeding the
//! variable scope as it goes so later entries can reference earlier ones.

mod plugins;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value as Yaml;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use spindle_core::{
    resolve_target, CallArgs, DeferredCall, DictEntry, Entry, FieldEntry, InvocationMode,
    ListEntry, ModuleEntry, Plugin, ResolveError, Symbol, SymbolHost, SymbolNamespace, Value,
};

use crate::reference::{looks_like_path, split_reference};
use crate::source::{DocumentSource, FileSystemSource};

const DIRECTIVE_LOCAL: &str = "local";
const DIRECTIVE_IMPORT: &str = "import";
const DIRECTIVE_PLUGINS: &str = "plugins";

/// The `call` field of an invocation descriptor: `false`, `true`, or a
/// method name.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum CallSpec {
    Flag(bool),
    Method(String),
}

impl Default for CallSpec {
    fn default() -> Self {
        CallSpec::Flag(true)
    }
}

impl From<CallSpec> for InvocationMode {
    fn from(spec: CallSpec) -> Self {
        match spec {
            CallSpec::Flag(false) => InvocationMode::Skip,
            CallSpec::Flag(true) => InvocationMode::CallDirect,
            CallSpec::Method(name) => InvocationMode::CallMethod(name),
        }
    }
}

/// Raw invocation descriptor, recognized by the presence of both `module`
/// and `source` keys. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct RawDescriptor {
    module: String,
    source: String,
    #[serde(default)]
    call: CallSpec,
    #[serde(default)]
    lazy: bool,
    args: Option<Yaml>,
}

/// Raw plugin declaration: a bare symbol name, or `{source, args}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPluginDecl {
    Name(String),
    Spec {
        source: Option<String>,
        args: Option<Yaml>,
    },
}

/// Per-document parser owning the raw config, the loaded directives, and
/// the accumulating variable scope.
pub struct DocumentParser {
    path: PathBuf,
    dir: PathBuf,
    config: IndexMap<String, Yaml>,
    local: Option<Arc<dyn SymbolNamespace>>,
    modules: Option<IndexMap<String, DocumentParser>>,
    plugins: Option<IndexMap<String, Arc<dyn Plugin>>>,
    variables: DictEntry,
    overrides: IndexMap<String, Value>,
    host: Arc<dyn SymbolHost>,
    source: Arc<dyn DocumentSource>,
}

impl fmt::Debug for DocumentParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentParser")
            .field("path", &self.path)
            .field("config", &self.config.keys().collect::<Vec<_>>())
            .field("variables", &self.variables)
            .field("modules", &self.modules)
            .finish_non_exhaustive()
    }
}

impl DocumentParser {
    /// Load a document from the filesystem with no external overrides.
    pub fn load(path: impl AsRef<Path>, host: Arc<dyn SymbolHost>) -> Result<Self, ResolveError> {
        Self::load_with(path, host, IndexMap::new())
    }

    /// Load a document from the filesystem with external overrides.
    ///
    /// Overrides are the highest-priority source for any `.name` reference
    /// or same-named descriptor argument, and are passed down to imported
    /// sub-documents.
    pub fn load_with(
        path: impl AsRef<Path>,
        host: Arc<dyn SymbolHost>,
        overrides: IndexMap<String, Value>,
    ) -> Result<Self, ResolveError> {
        Self::load_from(Arc::new(FileSystemSource), path, host, overrides)
    }

    /// Load a document through an explicit [`DocumentSource`].
    pub fn load_from(
        source: Arc<dyn DocumentSource>,
        path: impl AsRef<Path>,
        host: Arc<dyn SymbolHost>,
        overrides: IndexMap<String, Value>,
    ) -> Result<Self, ResolveError> {
        let mut chain = Vec::new();
        Self::load_inner(source, path.as_ref(), host, overrides, &mut chain)
    }

    fn load_inner(
        source: Arc<dyn DocumentSource>,
        path: &Path,
        host: Arc<dyn SymbolHost>,
        overrides: IndexMap<String, Value>,
        chain: &mut Vec<PathBuf>,
    ) -> Result<Self, ResolveError> {
        let canonical = source.canonicalize(path);
        if chain.contains(&canonical) {
            let mut cycle: Vec<String> = chain.iter().map(|p| p.display().to_string()).collect();
            cycle.push(canonical.display().to_string());
            return Err(ResolveError::ImportCycle {
                chain: cycle.join(" -> "),
            });
        }
        chain.push(canonical);
        let result = Self::build(source, path, host, overrides, chain);
        chain.pop();
        result
    }

    fn build(
        source: Arc<dyn DocumentSource>,
        path: &Path,
        host: Arc<dyn SymbolHost>,
        overrides: IndexMap<String, Value>,
        chain: &mut Vec<PathBuf>,
    ) -> Result<Self, ResolveError> {
        let dir = path.parent().unwrap_or_else(|| Path::new("")).to_owned();
        let text = source.read_source(path).map_err(|e| ResolveError::Io {
            path: path.to_owned(),
            source: e,
        })?;
        let doc: Yaml = serde_yaml::from_str(&text).map_err(|e| ResolveError::Parse {
            path: path.to_owned(),
            source: e,
        })?;
        let mut raw = match doc {
            Yaml::Mapping(map) => map,
            Yaml::Null => serde_yaml::Mapping::new(),
            other => {
                return Err(ResolveError::Schema {
                    message: format!(
                        "document root must be a mapping, got {}",
                        yaml_kind(&other)
                    ),
                })
            }
        };
        debug!(path = %path.display(), keys = raw.len(), "loaded document");

        let local = match take_key(&mut raw, DIRECTIVE_LOCAL) {
            Some(node) => {
                let rel = node.as_str().ok_or_else(|| ResolveError::Schema {
                    message: format!("local must be a string path, got {}", yaml_kind(&node)),
                })?;
                let unit_path = dir.join(rel);
                debug!(unit = %unit_path.display(), "loading local code unit");
                Some(host.load_unit(&unit_path)?)
            }
            None => None,
        };

        let modules = match take_key(&mut raw, DIRECTIVE_IMPORT) {
            Some(node) => Some(Self::load_imports(
                node, &source, &dir, &host, &overrides, chain,
            )?),
            None => None,
        };

        let raw_plugins = take_key(&mut raw, DIRECTIVE_PLUGINS);

        let mut config = IndexMap::with_capacity(raw.len());
        for (key, node) in raw {
            let key = key.as_str().ok_or_else(|| ResolveError::Schema {
                message: format!("top-level keys must be strings, got {key:?}"),
            })?;
            config.insert(key.to_owned(), node);
        }

        let mut parser = DocumentParser {
            path: path.to_owned(),
            dir,
            config,
            local,
            modules,
            plugins: None,
            variables: DictEntry::new(),
            overrides,
            host,
            source,
        };

        // Plugins are resolved at construction time, before parse() is
        // ever callable; their failures never wait for entry resolution.
        if let Some(node) = raw_plugins {
            parser.plugins = Some(parser.resolve_plugins(&node)?);
        }
        Ok(parser)
    }

    fn load_imports(
        node: Yaml,
        source: &Arc<dyn DocumentSource>,
        dir: &Path,
        host: &Arc<dyn SymbolHost>,
        overrides: &IndexMap<String, Value>,
        chain: &mut Vec<PathBuf>,
    ) -> Result<IndexMap<String, DocumentParser>, ResolveError> {
        let imports: IndexMap<String, String> =
            serde_yaml::from_value(node).map_err(|_| ResolveError::Schema {
                message: "import must be a mapping of alias to document path".to_owned(),
            })?;
        let mut parsed = IndexMap::with_capacity(imports.len());
        for (alias, import) in imports {
            let child_path = source.resolve_import(dir, &import);
            debug!(alias = %alias, path = %child_path.display(), "parsing imported document");
            let mut child = Self::load_inner(
                Arc::clone(source),
                &child_path,
                Arc::clone(host),
                overrides.clone(),
                chain,
            )?;
            child.parse()?;
            parsed.insert(alias, child);
        }
        Ok(parsed)
    }

    /// Resolve every remaining top-level entry in document order.
    ///
    /// Each resolved entry is stored in both the result and the variable
    /// scope, so later siblings can reference it. Repeated calls re-resolve
    /// from the raw config.
    pub fn parse(&mut self) -> Result<DictEntry, ResolveError> {
        let items: Vec<(String, Yaml)> = self
            .config
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let mut out = DictEntry::new();
        for (key, node) in items {
            let entry = self.resolve_entry(&key, &node)?;
            self.variables.insert(key.clone(), entry.clone());
            out.insert(key, entry);
        }
        Ok(out)
    }

    /// Path of the document this parser was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory imports and the local unit resolve against.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The accumulating variable scope.
    pub fn variables(&self) -> &DictEntry {
        &self.variables
    }

    /// Instantiated plugins by alias, if a `plugins` directive was present.
    pub fn plugins(&self) -> Option<&IndexMap<String, Arc<dyn Plugin>>> {
        self.plugins.as_ref()
    }

    /// Fully-parsed imported sub-documents by alias, if `import` was present.
    pub fn modules(&self) -> Option<&IndexMap<String, DocumentParser>> {
        self.modules.as_ref()
    }

    fn resolve_entry(&mut self, key: &str, node: &Yaml) -> Result<Entry, ResolveError> {
        match node {
            Yaml::String(s) => self.resolve_string(key, s),
            Yaml::Sequence(items) => {
                let mut list = ListEntry::new();
                for item in items {
                    list.push(self.resolve_entry(key, item)?);
                }
                Ok(Entry::List(list))
            }
            Yaml::Mapping(map) => {
                if has_key(map, "module") && has_key(map, "source") {
                    self.resolve_descriptor(key, map)
                } else {
                    let mut dict = DictEntry::new();
                    for (k, v) in map {
                        let name = k.as_str().ok_or_else(|| ResolveError::Schema {
                            message: format!("mapping keys must be strings in entry '{key}'"),
                        })?;
                        let child = self.resolve_entry(name, v)?;
                        dict.insert(name, child);
                    }
                    Ok(Entry::Dict(dict))
                }
            }
            other => Ok(Entry::Field(FieldEntry {
                key: key.to_owned(),
                value: Value::from_yaml(other)?,
            })),
        }
    }

    fn resolve_string(&self, key: &str, raw: &str) -> Result<Entry, ResolveError> {
        if looks_like_path(raw) {
            return Ok(Entry::field(key, raw));
        }
        let Some((scope, name)) = split_reference(raw) else {
            return Ok(Entry::field(key, raw));
        };
        if scope.is_empty() {
            if let Some(value) = self.overrides.get(name) {
                return Ok(Entry::Field(FieldEntry {
                    key: name.to_owned(),
                    value: value.clone(),
                }));
            }
            return self
                .variables
                .entry(name)
                .cloned()
                .ok_or_else(|| ResolveError::UnknownReference {
                    name: name.to_owned(),
                });
        }
        let modules = self.modules.as_ref().ok_or(ResolveError::MissingImport)?;
        let module = modules
            .get(scope)
            .ok_or_else(|| ResolveError::UnknownModule {
                alias: scope.to_owned(),
            })?;
        module
            .variables
            .entry(name)
            .cloned()
            .ok_or_else(|| ResolveError::UnknownReference {
                name: name.to_owned(),
            })
    }

    fn resolve_descriptor(
        &mut self,
        key: &str,
        map: &serde_yaml::Mapping,
    ) -> Result<Entry, ResolveError> {
        let raw: RawDescriptor = serde_yaml::from_value(Yaml::Mapping(map.clone())).map_err(
            |e| ResolveError::Schema {
                message: format!("malformed invocation descriptor '{key}': {e}"),
            },
        )?;
        let symbol = self.load_symbol(&raw.module, &raw.source)?;
        let args = self.resolve_args(key, raw.args.as_ref().unwrap_or(&Yaml::Null))?;
        let mode = InvocationMode::from(raw.call);
        debug!(
            key,
            module = %raw.module,
            source = %raw.source,
            lazy = raw.lazy,
            "resolved invocation descriptor"
        );
        let value = match &mode {
            InvocationMode::Skip => symbol.to_value()?,
            _ => {
                let target = resolve_target(&symbol, &mode)?;
                if raw.lazy {
                    Value::Deferred(DeferredCall::new(target, args.clone()))
                } else {
                    target(&args)?
                }
            }
        };
        Ok(Entry::Module(ModuleEntry {
            key: key.to_owned(),
            symbol,
            mode,
            lazy: raw.lazy,
            args,
            value,
        }))
    }

    fn load_symbol(&self, module_path: &str, symbol_name: &str) -> Result<Symbol, ResolveError> {
        if module_path == DIRECTIVE_LOCAL {
            let local = self.local.as_ref().ok_or(ResolveError::MissingLocal)?;
            return local
                .resolve(symbol_name)
                .ok_or_else(|| ResolveError::SymbolNotFound {
                    namespace: DIRECTIVE_LOCAL.to_owned(),
                    symbol: symbol_name.to_owned(),
                });
        }
        let namespace =
            self.host
                .namespace(module_path)
                .ok_or_else(|| ResolveError::NamespaceNotFound {
                    path: module_path.to_owned(),
                })?;
        namespace
            .resolve(symbol_name)
            .ok_or_else(|| ResolveError::SymbolNotFound {
                namespace: module_path.to_owned(),
                symbol: symbol_name.to_owned(),
            })
    }

    /// Resolve a descriptor's `args` node.
    ///
    /// Named arguments register into the variable scope as they are
    /// produced, so sibling invocations can reference them; overrides win
    /// outright per name. Positional arguments resolve without
    /// registration. Any other shape is empty.
    fn resolve_args(&mut self, key: &str, node: &Yaml) -> Result<CallArgs, ResolveError> {
        let mut args = CallArgs::new();
        match node {
            Yaml::Mapping(map) => {
                for (k, v) in map {
                    let name = k.as_str().ok_or_else(|| ResolveError::Schema {
                        message: format!("argument names must be strings in entry '{key}'"),
                    })?;
                    let entry = if let Some(value) = self.overrides.get(name) {
                        Entry::Field(FieldEntry {
                            key: name.to_owned(),
                            value: value.clone(),
                        })
                    } else {
                        self.resolve_entry(name, v)?
                    };
                    args.insert_named(name, entry.value());
                    self.variables.insert(name, entry);
                }
            }
            Yaml::Sequence(items) => {
                for item in items {
                    args.push(self.resolve_entry(key, item)?.value());
                }
            }
            _ => {}
        }
        Ok(args)
    }
}

fn has_key(map: &serde_yaml::Mapping, key: &str) -> bool {
    map.contains_key(Yaml::String(key.to_owned()))
}

// `Mapping::remove` is a swap-remove; popping a directive must not
// disturb the order of the remaining entries.
fn take_key(map: &mut serde_yaml::Mapping, key: &str) -> Option<Yaml> {
    map.shift_remove(Yaml::String(key.to_owned()))
}

fn yaml_kind(node: &Yaml) -> &'static str {
    match node {
        Yaml::Null => "null",
        Yaml::Bool(_) => "bool",
        Yaml::Number(_) => "number",
        Yaml::String(_) => "string",
        Yaml::Sequence(_) => "sequence",
        Yaml::Mapping(_) => "mapping",
        Yaml::Tagged(_) => "tagged",
    }
}
