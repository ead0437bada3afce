//! Configuration validation.

use std::collections::HashSet;

use tracing_subscriber::EnvFilter;

use crate::error::ConfigError;
use crate::schema::Config;

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Fail with the first error, if any.
    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        match self.errors.first() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path.clone(),
                message: error.message.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_logging(config, &mut result);
        Self::validate_loader(config, &mut result);
        Self::validate_extensions(config, &mut result);

        Ok(result)
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let level = config.logging.level.trim();
        if level.is_empty() {
            result.add_error(ValidationError::new(
                "logging.level",
                "Log level cannot be empty",
            ));
            return;
        }

        if let Err(err) = EnvFilter::try_new(level) {
            result.add_error(ValidationError::new(
                "logging.level",
                format!("Invalid log filter '{}': {}", level, err),
            ));
            return;
        }

        // A bare word that is not a level still parses, as a target filter.
        let is_directive = level.contains('=') || level.contains(',');
        if !is_directive && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                format!(
                    "'{}' is not a log level ({:?}); it is treated as a target filter",
                    level, LOG_LEVELS
                ),
            ));
        }
    }

    fn validate_loader(config: &Config, result: &mut ValidationResult) {
        for (name, location) in &config.loader.paths {
            if name.trim().is_empty() {
                result.add_error(ValidationError::new(
                    "loader.paths",
                    "Module name cannot be empty",
                ));
            }
            if location.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("loader.paths.{}", name),
                    "Module location cannot be empty",
                ));
            } else if name == location {
                result.add_warning(ValidationWarning::new(
                    format!("loader.paths.{}", name),
                    "Path maps a module to its own name and has no effect",
                ));
            }
        }
    }

    fn validate_extensions(config: &Config, result: &mut ValidationResult) {
        let mut seen = HashSet::new();

        for (index, entry) in config.extensions.iter().enumerate() {
            let path = format!("extensions[{}]", index);

            if entry.reference.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("{}.ref", path),
                    "Extension ref cannot be empty",
                ));
                continue;
            }

            if !entry.enabled {
                result.add_warning(ValidationWarning::new(
                    path.clone(),
                    format!("Extension '{}' is disabled and will not be loaded", entry.reference),
                ));
            }

            if !seen.insert(entry.reference.as_str()) {
                result.add_warning(ValidationWarning::new(
                    format!("{}.ref", path),
                    format!(
                        "Extension '{}' is listed more than once; each entry is registered separately",
                        entry.reference
                    ),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
