//! Subcommand implementations.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use bootline_config::{Config, ConfigLoader, ConfigValidator, ValidationResult};
use bootline_core::ExtensionManager;
use bootline_protocols::{Extension, ExtensionContext, ExtensionDescriptor, ModulePaths};

use crate::builtin;

type CommandResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// What a boot produced.
#[derive(Debug)]
pub(crate) struct BootReport {
    /// Loaded extensions paired with their configured `ref`, in load order.
    pub extensions: Vec<(String, Option<Extension>)>,
    /// Number of `after_app_start` hooks that ran.
    pub hooks_run: usize,
}

/// Register the enabled extensions, wait until they are ready and run their
/// post-start hooks in order.
pub(crate) async fn boot(config: &Config, run_hooks: bool) -> CommandResult<BootReport> {
    let paths = ModulePaths::from_table(config.loader.paths.clone(), config.loader.conflict_policy);
    let catalog = Arc::new(builtin::catalog(paths.clone()));
    let manager = ExtensionManager::new(catalog, paths);

    let mut registered = Vec::new();
    for entry in config.enabled_extensions() {
        let context = ExtensionContext::from(entry.context.clone());
        manager.add(ExtensionDescriptor::new(entry.reference.as_str(), context.clone()))?;
        registered.push((entry.reference.clone(), context));
    }

    manager.on_failure(|err| {
        warn!(error = %err, reference = ?err.reference(), "Extension loading failed");
    });

    let loaded = manager.init()?.await?;

    let mut hooks_run = 0;
    if run_hooks {
        for ((reference, context), extension) in registered.iter().zip(&loaded) {
            let Some(hook) = extension.as_ref().and_then(Extension::after_app_start) else {
                continue;
            };
            info!(reference = %reference, "Running after_app_start hook");
            hook.invoke(context.clone()).await?;
            hooks_run += 1;
        }
    }

    let extensions = registered
        .into_iter()
        .map(|(reference, _)| reference)
        .zip(loaded)
        .collect();
    Ok(BootReport {
        extensions,
        hooks_run,
    })
}

/// `bootline run`
pub(crate) async fn run(config: &Config, run_hooks: bool) -> CommandResult<()> {
    let validation = ConfigValidator::validate(config)?;
    log_warnings(&validation);
    validation.ensure_valid()?;

    let report = boot(config, run_hooks).await?;

    println!("Loaded {} extension(s):", report.extensions.len());
    for (position, (reference, extension)) in report.extensions.iter().enumerate() {
        match extension {
            Some(ext) if ext.exports().is_null() => {
                println!("  {:>2}. {} -> {}", position + 1, reference, ext.name())
            }
            Some(ext) => println!(
                "  {:>2}. {} -> {} {}",
                position + 1,
                reference,
                ext.name(),
                ext.exports()
            ),
            None => println!("  {:>2}. {} -> (empty)", position + 1, reference),
        }
    }
    if run_hooks {
        println!("Ran {} after_app_start hook(s)", report.hooks_run);
    }
    Ok(())
}

/// `bootline check`
pub(crate) fn check(path: &Path) -> CommandResult<()> {
    let config = ConfigLoader::load(path)?;
    let validation = ConfigValidator::validate(&config)?;

    for error in &validation.errors {
        println!("error: {}: {}", error.path, error.message);
    }
    for warning in &validation.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }

    validation.ensure_valid()?;
    println!(
        "{}: OK ({} extension(s), {} enabled)",
        path.display(),
        config.extensions.len(),
        config.enabled_extensions().count()
    );
    Ok(())
}

/// `bootline modules`
pub(crate) fn modules(config: &Config) {
    let paths = ModulePaths::from_table(config.loader.paths.clone(), config.loader.conflict_policy);
    let catalog = builtin::catalog(paths.clone());

    println!("Built-in modules:");
    for location in catalog.locations() {
        println!("  {}", location);
    }

    let mapped = paths.snapshot();
    if !mapped.is_empty() {
        println!("Configured paths:");
        for (name, location) in mapped {
            let status = if catalog.contains(&location) {
                "ok"
            } else {
                "missing"
            };
            println!("  {} -> {} ({})", name, location, status);
        }
    }
}

fn log_warnings(validation: &ValidationResult) {
    for warning in &validation.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use bootline_protocols::ExtensionError;
    use tempfile::NamedTempFile;

    fn config(content: &str) -> Config {
        ConfigLoader::load_str(content).unwrap()
    }

    fn names(report: &BootReport) -> Vec<Option<&str>> {
        report
            .extensions
            .iter()
            .map(|(_, ext)| ext.as_ref().map(|e| e.name()))
            .collect()
    }

    #[tokio::test]
    async fn test_boot_in_config_order() {
        let config = config(
            r#"
            [[extensions]]
            ref = "clock"

            [[extensions]]
            ref = "ext-one"

            [[extensions]]
            ref = "noop"

            [[extensions]]
            ref = "greeter"
            context = { greeting = "hey" }
            "#,
        );

        let report = boot(&config, true).await.unwrap();
        assert_eq!(
            names(&report),
            vec![Some("clock"), Some("ext-one"), None, Some("greeter")]
        );
        let greeter = report.extensions[3].1.as_ref().unwrap();
        assert_eq!(greeter.exports()["greeting"], "hey");
        assert_eq!(report.hooks_run, 0);
    }

    #[tokio::test]
    async fn test_boot_runs_hooks() {
        let config = config(
            r#"
            [[extensions]]
            ref = "banner"
            context = { title = "test" }

            [[extensions]]
            ref = "banner"
            enabled = false
            "#,
        );

        assert_eq!(boot(&config, true).await.unwrap().hooks_run, 1);
        assert_eq!(boot(&config, false).await.unwrap().hooks_run, 0);
    }

    #[tokio::test]
    async fn test_boot_through_configured_path() {
        let config = config(
            r#"
            [loader.paths]
            "hello" = "greeter"

            [[extensions]]
            ref = "hello"
            "#,
        );

        let report = boot(&config, false).await.unwrap();
        assert_eq!(names(&report), vec![Some("greeter")]);
    }

    #[tokio::test]
    async fn test_boot_dependency_conflict_rejected() {
        let config = config(
            r#"
            [loader]
            conflict_policy = "reject_overlap"

            [loader.paths]
            "json-core" = "vendor/json-core"

            [[extensions]]
            ref = "json-tools"
            "#,
        );

        let err = boot(&config, false).await.unwrap_err();
        let err = err.downcast_ref::<ExtensionError>().unwrap();
        assert!(matches!(err, ExtensionError::Load { reference, .. } if reference == "json-tools"));
    }

    #[tokio::test]
    async fn test_boot_unknown_module_fails() {
        let config = config("[[extensions]]\nref = \"does-not-exist\"");
        let err = boot(&config, false).await.unwrap_err();
        assert!(err.to_string().contains("does-not-exist"));
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_config() {
        let config = config("[[extensions]]\nref = \"\"");
        assert!(run(&config, false).await.is_err());
    }

    #[test]
    fn test_check_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[[extensions]]").unwrap();
        writeln!(file, "ref = \"ext-one\"").unwrap();
        assert!(check(file.path()).is_ok());

        let mut invalid = NamedTempFile::new().unwrap();
        writeln!(invalid, "[logging]").unwrap();
        writeln!(invalid, "level = \"bootline=loud\"").unwrap();
        assert!(check(invalid.path()).is_err());
    }

    #[tokio::test]
    async fn test_boot_report_debug_lists_extensions() {
        let config = config("[[extensions]]\nref = \"clock\"");
        let report = boot(&config, false).await.unwrap();
        let rendered = format!("{:?}", report);
        assert!(rendered.contains("BootReport"));
        assert!(rendered.contains("clock"));
    }

    #[test]
    fn test_check_missing_file() {
        assert!(check(Path::new("/nonexistent/bootline.toml")).is_err());
    }
}
