//! Plugin registry resolution.
//!
//! Runs during document construction: every declared plugin is loaded from
//! its per-alias unit, checked against the plugin capability, and
//! instantiated with resolved arguments before `parse()` can be called.

use indexmap::IndexMap;
use serde_yaml::Value as Yaml;
use std::sync::Arc;
use tracing::debug;

use spindle_core::{Plugin, ResolveError, Symbol};

use super::{DocumentParser, RawPluginDecl};

impl DocumentParser {
    pub(super) fn resolve_plugins(
        &mut self,
        node: &Yaml,
    ) -> Result<IndexMap<String, Arc<dyn Plugin>>, ResolveError> {
        let decls = match node {
            Yaml::Mapping(map) => map,
            other => {
                return Err(ResolveError::Schema {
                    message: format!(
                        "plugins must be a mapping of alias to declaration, got {}",
                        super::yaml_kind(other)
                    ),
                })
            }
        };
        let mut out = IndexMap::with_capacity(decls.len());
        for (k, v) in decls {
            let alias = k.as_str().ok_or_else(|| ResolveError::Schema {
                message: format!("plugin aliases must be strings, got {k:?}"),
            })?;
            let decl: RawPluginDecl =
                serde_yaml::from_value(v.clone()).map_err(|e| ResolveError::Schema {
                    message: format!("malformed declaration for {alias} plugin: {e}"),
                })?;
            let (source_name, args_node) = match decl {
                RawPluginDecl::Name(name) => (name, Yaml::Null),
                RawPluginDecl::Spec {
                    source: Some(name),
                    args,
                } => (name, args.unwrap_or(Yaml::Null)),
                RawPluginDecl::Spec { source: None, .. } => {
                    return Err(ResolveError::Schema {
                        message: format!("source is required for {alias} plugin"),
                    })
                }
            };
            let unit = self
                .host
                .plugin_unit(alias)
                .ok_or_else(|| ResolveError::PluginNotFound {
                    alias: alias.to_owned(),
                })?;
            let symbol =
                unit.resolve(&source_name)
                    .ok_or_else(|| ResolveError::SymbolNotFound {
                        namespace: format!("plugins.{alias}"),
                        symbol: source_name.clone(),
                    })?;
            let Symbol::PluginCtor(factory) = symbol else {
                return Err(ResolveError::PluginContract {
                    alias: alias.to_owned(),
                    symbol: source_name,
                });
            };
            let args = self.resolve_args(alias, &args_node)?;
            let instance = factory.instantiate(&args)?;
            debug!(alias, source = %source_name, "instantiated plugin");
            out.insert(alias.to_owned(), instance);
        }
        Ok(out)
    }
}
