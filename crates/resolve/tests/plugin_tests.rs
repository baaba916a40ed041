//! Plugin declaration tests: conformance checking, argument resolution,
//! and construction-time instantiation.

use indexmap::IndexMap;
use std::any::Any;
use std::sync::Arc;

use spindle_core::{
    plugin_ctor, HostRegistry, Plugin, ResolveError, StaticNamespace, Symbol, Value,
};
use spindle_resolve::{DocumentParser, InMemorySource};

const DOC: &str = "/docs/cfg.yml";

struct Dummy {
    x: i64,
    y: i64,
}

impl Plugin for Dummy {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn dummy_unit() -> StaticNamespace {
    StaticNamespace::new().with_symbol(
        "MyPlugin",
        plugin_ctor(|args| {
            let x = args.named("x").and_then(Value::as_i64).unwrap_or(0);
            let y = args.named("y").and_then(Value::as_i64).unwrap_or(0);
            Ok(Arc::new(Dummy { x, y }) as Arc<dyn Plugin>)
        }),
    )
}

fn load(
    text: &str,
    host: HostRegistry,
    overrides: IndexMap<String, Value>,
) -> Result<DocumentParser, ResolveError> {
    let source = InMemorySource::new().with_file(DOC, text);
    DocumentParser::load_from(Arc::new(source), DOC, Arc::new(host), overrides)
}

#[test]
fn plugin_is_instantiated_at_load_with_resolved_args() {
    let mut host = HostRegistry::new();
    host.register_plugin_unit("dummy", dummy_unit());
    let text = "plugins:
  dummy:
    source: MyPlugin
    args:
      x: 7
      y: 6
run: 1
";
    let parser = load(text, host, IndexMap::new()).unwrap();
    let plugins = parser.plugins().expect("plugins directive was present");
    let dummy = plugins["dummy"]
        .as_any()
        .downcast_ref::<Dummy>()
        .expect("instance should be a Dummy");
    assert_eq!((dummy.x, dummy.y), (7, 6));
}

#[test]
fn bare_string_declaration_names_the_source() {
    let mut host = HostRegistry::new();
    host.register_plugin_unit("dummy", dummy_unit());
    let parser = load("plugins:\n  dummy: MyPlugin\n", host, IndexMap::new()).unwrap();
    let plugins = parser.plugins().unwrap();
    let dummy = plugins["dummy"].as_any().downcast_ref::<Dummy>().unwrap();
    assert_eq!((dummy.x, dummy.y), (0, 0));
}

#[test]
fn plugin_args_respect_overrides() {
    let mut host = HostRegistry::new();
    host.register_plugin_unit("dummy", dummy_unit());
    let text = "plugins:\n  dummy:\n    source: MyPlugin\n    args:\n      x: 7\n      y: 6\n";
    let overrides = IndexMap::from([("x".to_owned(), Value::Int(100))]);
    let parser = load(text, host, overrides).unwrap();
    let dummy = parser.plugins().unwrap()["dummy"]
        .as_any()
        .downcast_ref::<Dummy>()
        .unwrap();
    assert_eq!((dummy.x, dummy.y), (100, 6));
}

#[test]
fn declaration_without_a_unit_fails_at_load() {
    let err = load("plugins:\n  dummy: MyPlugin\n", HostRegistry::new(), IndexMap::new())
        .unwrap_err();
    assert!(matches!(err, ResolveError::PluginNotFound { alias } if alias == "dummy"));
}

#[test]
fn declaration_without_source_is_a_schema_error() {
    let mut host = HostRegistry::new();
    host.register_plugin_unit("dummy", dummy_unit());
    let text = "plugins:\n  dummy:\n    args:\n      x: 7\n";
    let err = load(text, host, IndexMap::new()).unwrap_err();
    match err {
        ResolveError::Schema { message } => {
            assert_eq!(message, "source is required for dummy plugin");
        }
        other => panic!("expected Schema, got {other}"),
    }
}

#[test]
fn unknown_source_names_the_plugin_namespace() {
    let mut host = HostRegistry::new();
    host.register_plugin_unit("dummy", dummy_unit());
    let err = load("plugins:\n  dummy: Missing\n", host, IndexMap::new()).unwrap_err();
    match err {
        ResolveError::SymbolNotFound { namespace, symbol } => {
            assert_eq!(namespace, "plugins.dummy");
            assert_eq!(symbol, "Missing");
        }
        other => panic!("expected SymbolNotFound, got {other}"),
    }
}

#[test]
fn non_constructor_symbol_fails_the_conformance_check() {
    let unit = StaticNamespace::new()
        .with_symbol("MyPlugin", Symbol::function(|_| Ok(Value::Null)));
    let mut host = HostRegistry::new();
    host.register_plugin_unit("dummy", unit);
    let err = load("plugins:\n  dummy: MyPlugin\n", host, IndexMap::new()).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::PluginContract { alias, symbol } if alias == "dummy" && symbol == "MyPlugin"
    ));
}

#[test]
fn plugins_directive_must_be_a_mapping() {
    let err = load("plugins:\n  - dummy\n", HostRegistry::new(), IndexMap::new()).unwrap_err();
    assert!(matches!(err, ResolveError::Schema { .. }));
}

#[test]
fn plugin_args_register_into_the_variable_scope() {
    let mut host = HostRegistry::new();
    host.register_plugin_unit("dummy", dummy_unit());
    let text = "plugins:\n  dummy:\n    source: MyPlugin\n    args:\n      x: 7\nuse: .x\n";
    let mut parser = load(text, host, IndexMap::new()).unwrap();
    let out = parser.parse().unwrap();
    assert_eq!(out.get("use"), Some(Value::Int(7)));
}
