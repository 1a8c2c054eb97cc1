// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the Agora permission engine.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Validation of per-action permission overrides
//! - Consistent environment variable naming (`AGORA_PERMISSION_*`)
//!
//! # Usage
//!
//! ```ignore
//! use agora_permission_config::load_config;
//!
//! let config = load_config()?;
//! let rules = config.rules.permission_rules()?;
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::PermissionConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved permission engine configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermissionConfig {
	pub logging: LoggingConfig,
	pub rules: RulesConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`AGORA_PERMISSION_*`)
/// 2. Config file (`/etc/agora/permission.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<PermissionConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only.
pub fn load_config_from_env() -> Result<PermissionConfig, ConfigError> {
	load_from_sources(vec![Box::new(DefaultsSource), Box::new(EnvSource)])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<PermissionConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<PermissionConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = PermissionConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: PermissionConfigLayer) -> Result<PermissionConfig, ConfigError> {
	let logging = layer.logging.unwrap_or_default().finalize();
	let rules = layer.rules.unwrap_or_default().finalize();

	validate_config(&logging, &rules)?;

	info!(
		log_level = %logging.level,
		log_format = %logging.format,
		overrides = rules.overrides.len(),
		"Permission configuration loaded"
	);

	Ok(PermissionConfig { logging, rules })
}

/// Validate cross-field configuration rules.
fn validate_config(logging: &LoggingConfig, rules: &RulesConfig) -> Result<(), ConfigError> {
	if logging.level.trim().is_empty() {
		return Err(ConfigError::Validation(
			"log level must not be empty".to_string(),
		));
	}

	rules.validate()
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::BTreeMap;

	struct FixedSource {
		precedence: Precedence,
		layer: PermissionConfigLayer,
	}

	impl ConfigSource for FixedSource {
		fn name(&self) -> &'static str {
			"fixed"
		}

		fn precedence(&self) -> Precedence {
			self.precedence
		}

		fn load(&self) -> Result<PermissionConfigLayer, ConfigError> {
			Ok(self.layer.clone())
		}
	}

	fn level_layer(level: &str) -> PermissionConfigLayer {
		PermissionConfigLayer {
			logging: Some(LoggingConfigLayer {
				level: Some(level.to_string()),
				format: None,
			}),
			rules: None,
		}
	}

	#[test]
	fn test_finalize_defaults() {
		let config = finalize(PermissionConfigLayer::default()).unwrap();
		assert_eq!(config, PermissionConfig::default());
	}

	#[test]
	fn test_higher_precedence_wins_regardless_of_order() {
		let config = load_from_sources(vec![
			Box::new(FixedSource {
				precedence: Precedence::Environment,
				layer: level_layer("trace"),
			}),
			Box::new(FixedSource {
				precedence: Precedence::ConfigFile,
				layer: level_layer("warn"),
			}),
		])
		.unwrap();
		assert_eq!(config.logging.level, "trace");
	}

	#[test]
	fn test_invalid_override_fails_validation() {
		let layer = PermissionConfigLayer {
			logging: None,
			rules: Some(RulesConfigLayer {
				overrides: Some(BTreeMap::from([(
					"topic.update".to_string(),
					"manage".to_string(),
				)])),
			}),
		};
		let result = finalize(layer);
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_blank_level_fails_validation() {
		let result = finalize(level_layer("  "));
		assert!(result.unwrap_err().to_string().contains("log level"));
	}

	#[test]
	fn test_load_with_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("permission.toml");
		std::fs::write(
			&path,
			"[rules.overrides]\n\"agenda_item.delete\" = \"agenda.can_see_internal\"\n",
		)
		.unwrap();

		let config = load_config_with_file(&path).unwrap();
		assert_eq!(
			config.rules.overrides.get("agenda_item.delete").map(String::as_str),
			Some("agenda.can_see_internal")
		);
	}
}
