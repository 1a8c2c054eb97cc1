// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Required permission per action.
//!
//! Handlers receive their required permission at construction. The rules are
//! an immutable value: each action falls back to its catalogue default unless
//! an override is present.

use std::collections::BTreeMap;

use crate::permission::{InvalidPermission, Permission};

/// Per-action permission overrides on top of the catalogue defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionRules {
	overrides: BTreeMap<String, Permission>,
}

impl PermissionRules {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds rules from `(action, permission)` name pairs.
	pub fn from_pairs<A, P, I>(pairs: I) -> Result<Self, InvalidPermission>
	where
		A: Into<String>,
		P: AsRef<str>,
		I: IntoIterator<Item = (A, P)>,
	{
		let mut overrides = BTreeMap::new();
		for (action, permission) in pairs {
			overrides.insert(action.into(), Permission::parse(permission.as_ref())?);
		}
		Ok(Self { overrides })
	}

	pub fn with_override(mut self, action: impl Into<String>, permission: Permission) -> Self {
		self.overrides.insert(action.into(), permission);
		self
	}

	/// Actions with an override, in sorted order.
	pub fn overridden_actions(&self) -> impl Iterator<Item = &str> {
		self.overrides.keys().map(String::as_str)
	}

	/// Permission required by `action`, or `default` without an override.
	pub fn resolve(&self, action: &str, default: &Permission) -> Permission {
		self
			.overrides
			.get(action)
			.cloned()
			.unwrap_or_else(|| default.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn falls_back_to_default() {
		let default = Permission::parse("agenda.can_manage").unwrap();
		let rules = PermissionRules::new();
		assert_eq!(rules.resolve("topic.update", &default), default);
	}

	#[test]
	fn override_wins() {
		let default = Permission::parse("agenda.can_manage").unwrap();
		let custom = Permission::parse("agenda.can_see_internal").unwrap();
		let rules = PermissionRules::new().with_override("topic.update", custom.clone());
		assert_eq!(rules.resolve("topic.update", &default), custom);
		assert_eq!(rules.resolve("topic.delete", &default), default);
		assert_eq!(rules.overridden_actions().collect::<Vec<_>>(), vec!["topic.update"]);
	}

	#[test]
	fn from_pairs_validates_permissions() {
		let rules = PermissionRules::from_pairs([("topic.create", "agenda.can_see")]).unwrap();
		assert_eq!(rules.overridden_actions().count(), 1);
		assert!(PermissionRules::from_pairs([("topic.create", "nope")]).is_err());
	}
}
