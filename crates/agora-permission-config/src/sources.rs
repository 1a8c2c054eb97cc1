// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::PermissionConfigLayer;
use crate::sections::{parse_overrides, LogFormat, LoggingConfigLayer, RulesConfigLayer};

const ENV_LOG_LEVEL: &str = "AGORA_PERMISSION_LOG_LEVEL";
const ENV_LOG_FORMAT: &str = "AGORA_PERMISSION_LOG_FORMAT";
const ENV_RULES: &str = "AGORA_PERMISSION_RULES";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<PermissionConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<PermissionConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(PermissionConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/agora/permission.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<PermissionConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(PermissionConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: PermissionConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: AGORA_PERMISSION_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<PermissionConfigLayer, ConfigError> {
		debug!("loading environment variables");
		layer_from_lookup(|name| std::env::var(name).ok())
	}
}

fn layer_from_lookup(
	lookup: impl Fn(&str) -> Option<String>,
) -> Result<PermissionConfigLayer, ConfigError> {
	let var = |name: &str| lookup(name).filter(|s| !s.is_empty());

	let format = var(ENV_LOG_FORMAT)
		.map(|v| {
			v.parse::<LogFormat>().map_err(|_| ConfigError::InvalidValue {
				key: ENV_LOG_FORMAT.to_string(),
				message: format!("unknown log format '{v}', expected 'text' or 'json'"),
			})
		})
		.transpose()?;

	let overrides = var(ENV_RULES)
		.map(|v| parse_overrides(ENV_RULES, &v))
		.transpose()?;

	Ok(PermissionConfigLayer {
		logging: Some(LoggingConfigLayer {
			level: var(ENV_LOG_LEVEL),
			format,
		}),
		rules: Some(RulesConfigLayer { overrides }),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;
	use std::io::Write;

	fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |name: &str| vars.get(name).cloned()
	}

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert!(layer.logging.is_none());
		assert!(layer.rules.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let source = TomlSource::new("/nonexistent/permission.toml");
		assert_eq!(source.load().unwrap(), PermissionConfigLayer::default());
	}

	#[test]
	fn test_toml_source_reads_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			"[logging]\nformat = \"json\"\n\n[rules.overrides]\n\"topic.update\" = \"agenda.can_see\""
		)
		.unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		assert_eq!(layer.logging.unwrap().format, Some(LogFormat::Json));
		assert_eq!(
			layer.rules.unwrap().overrides.unwrap()["topic.update"],
			"agenda.can_see"
		);
	}

	#[test]
	fn test_toml_source_reports_parse_errors() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[logging\nlevel = ").unwrap();

		let err = TomlSource::new(file.path()).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}

	#[test]
	fn test_env_empty_values_are_unset() {
		let layer = layer_from_lookup(lookup_in(&[(ENV_LOG_LEVEL, "")])).unwrap();
		assert_eq!(layer.logging.unwrap().level, None);
		assert_eq!(layer.rules.unwrap().overrides, None);
	}

	#[test]
	fn test_env_reads_all_variables() {
		let layer = layer_from_lookup(lookup_in(&[
			(ENV_LOG_LEVEL, "debug"),
			(ENV_LOG_FORMAT, "json"),
			(ENV_RULES, "topic.delete=agenda.can_see_internal"),
		]))
		.unwrap();
		let logging = layer.logging.unwrap();
		assert_eq!(logging.level.as_deref(), Some("debug"));
		assert_eq!(logging.format, Some(LogFormat::Json));
		let overrides = layer.rules.unwrap().overrides.unwrap();
		assert_eq!(overrides["topic.delete"], "agenda.can_see_internal");
	}

	#[test]
	fn test_env_invalid_format_names_variable() {
		let err = layer_from_lookup(lookup_in(&[(ENV_LOG_FORMAT, "xml")])).unwrap_err();
		assert!(
			matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_LOG_FORMAT)
		);
	}
}
