// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Permission rules section: per-action overrides of the required permission.

use std::collections::BTreeMap;

use agora_permission::{InvalidPermission, PermissionRules};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RulesConfigLayer {
	pub overrides: Option<BTreeMap<String, String>>,
}

impl RulesConfigLayer {
	/// Overrides merge per action, so a later source can change one action
	/// without restating the rest.
	pub fn merge(&mut self, other: Self) {
		if let Some(overrides) = other.overrides {
			self.overrides
				.get_or_insert_with(BTreeMap::new)
				.extend(overrides);
		}
	}

	pub fn finalize(self) -> RulesConfig {
		RulesConfig {
			overrides: self.overrides.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RulesConfig {
	/// Action name to required permission name.
	pub overrides: BTreeMap<String, String>,
}

impl RulesConfig {
	/// Checks that every override names an action and a well-formed permission.
	pub fn validate(&self) -> Result<(), ConfigError> {
		for (action, permission) in &self.overrides {
			if action.trim().is_empty() {
				return Err(ConfigError::Validation(format!(
					"permission override '{permission}' has an empty action name"
				)));
			}
			if let Err(InvalidPermission(name)) = agora_permission::Permission::parse(permission) {
				return Err(ConfigError::Validation(format!(
					"override for '{action}' names invalid permission '{name}'"
				)));
			}
		}
		Ok(())
	}

	pub fn permission_rules(&self) -> Result<PermissionRules, InvalidPermission> {
		PermissionRules::from_pairs(
			self.overrides
				.iter()
				.map(|(action, permission)| (action.as_str(), permission.as_str())),
		)
	}
}

/// Parses `action=permission,action=permission`.
///
/// Blank entries are skipped. Permission syntax is checked later, during
/// validation.
pub fn parse_overrides(key: &str, raw: &str) -> Result<BTreeMap<String, String>, ConfigError> {
	let mut overrides = BTreeMap::new();
	for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
		let Some((action, permission)) = entry.split_once('=') else {
			return Err(ConfigError::InvalidValue {
				key: key.to_string(),
				message: format!("expected 'action=permission', got '{entry}'"),
			});
		};
		overrides.insert(action.trim().to_string(), permission.trim().to_string());
	}
	Ok(overrides)
}
