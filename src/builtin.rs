//! Modules shipped with the binary.
//!
//! Configured `ref`s are looked up here, after mapping through
//! `[loader.paths]`.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::json;
use tracing::info;

use bootline_core::ModuleCatalog;
use bootline_protocols::{
    BoxError, EntryPoint, Extension, ExtensionFactory, ModuleExport, ModulePaths, RequireConfig,
};

/// Catalog of the built-in modules.
pub(crate) fn catalog(paths: ModulePaths) -> ModuleCatalog {
    let catalog = ModuleCatalog::new(paths);
    catalog
        .define("ext-one", ext_one())
        .define("greeter", greeter())
        .define("json-tools", json_tools())
        .define("builtin/json-core", Extension::new("json-core"))
        .define("banner", banner())
        .define("noop", ModuleExport::Empty);
    catalog.define_async("clock", || async {
        // Stands in for a module fetched from elsewhere.
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok::<_, BoxError>(ModuleExport::Value(clock()))
    });
    catalog
}

/// An extension that is itself invocable.
fn ext_one() -> Extension {
    Extension::callable(
        "ext-one",
        EntryPoint::sync(|_| {
            info!(extension = "ext-one", "Extension invoked");
            Ok(())
        }),
    )
    .with_exports(json!({ "ready": true }))
}

/// Builds its extension from the configured context.
///
/// Context keys: `greeting` (default `"hello"`), `target` (default `"world"`).
fn greeter() -> ExtensionFactory {
    ExtensionFactory::new("greeter", |ctx| {
        let greeting = ctx
            .get_config::<String>("greeting")
            .unwrap_or_else(|| "hello".to_string());
        let message = greeting.clone();
        Some(
            Extension::new("greeter")
                .with_initialize(EntryPoint::sync(move |ctx| {
                    let target = ctx
                        .get_config::<String>("target")
                        .unwrap_or_else(|| "world".to_string());
                    info!(extension = "greeter", "{}, {}", message, target);
                    Ok(())
                }))
                .with_exports(json!({ "greeting": greeting })),
        )
    })
}

/// Declares a dependency loaded before it initializes.
fn json_tools() -> Extension {
    Extension::new("json-tools")
        .with_require(RequireConfig::new().with_path("json-core", "builtin/json-core"))
        .with_initialize(EntryPoint::sync(|_| {
            info!(extension = "json-tools", "Dependencies loaded");
            Ok(())
        }))
}

/// Prints once the application is assembled.
fn banner() -> Extension {
    Extension::new("banner").with_after_app_start(EntryPoint::sync(|ctx| {
        let title = ctx
            .get_config::<String>("title")
            .unwrap_or_else(|| "bootline".to_string());
        println!("== {} is up ==", title);
        Ok(())
    }))
}

fn clock() -> Extension {
    Extension::new("clock").with_initialize(EntryPoint::new(|_| async {
        let started = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        info!(extension = "clock", started, "Clock started");
        Ok::<(), BoxError>(())
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bootline_protocols::{ExtensionContext, ModuleLoader};

    #[test]
    fn test_catalog_locations() {
        let catalog = catalog(ModulePaths::new());
        assert_eq!(
            catalog.locations(),
            vec![
                "banner",
                "builtin/json-core",
                "clock",
                "ext-one",
                "greeter",
                "json-tools",
                "noop"
            ]
        );
    }

    #[tokio::test]
    async fn test_greeter_reads_context() {
        let catalog = catalog(ModulePaths::new());
        let export = catalog.request("greeter").await.unwrap();
        let ctx = ExtensionContext::from(json!({"greeting": "hi"}));
        let ext = export.into_extension(&ctx).unwrap();
        assert_eq!(ext.exports(), &json!({"greeting": "hi"}));
    }

    #[tokio::test]
    async fn test_clock_is_async_module() {
        let catalog = catalog(ModulePaths::new());
        assert!(!catalog.is_loaded("clock"));
        catalog.request("clock").await.unwrap();
        assert!(catalog.is_loaded("clock"));
    }

    #[test]
    fn test_entry_kinds() {
        assert!(ext_one().is_callable());
        assert!(banner().after_app_start().is_some());
        assert!(json_tools().require().is_some());
    }
}
