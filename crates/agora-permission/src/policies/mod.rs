// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-collection action policies and the catalogue of built-in actions.

pub mod agenda_item;
pub mod topic;

use crate::handler::MeetingScopedAction;
use crate::permission::Permission;

/// A built-in action and how to construct its handler.
#[derive(Debug, Clone, Copy)]
pub struct ActionDefinition {
	pub name: &'static str,
	pub default_permission: &'static str,
	pub build: fn(Permission) -> MeetingScopedAction,
}

impl ActionDefinition {
	pub fn default_permission(&self) -> Permission {
		Permission::from_static(self.default_permission)
	}
}

/// Every built-in action.
pub const CATALOGUE: &[ActionDefinition] = &[
	ActionDefinition {
		name: topic::CREATE,
		default_permission: topic::DEFAULT_PERMISSION,
		build: topic::create_handler,
	},
	ActionDefinition {
		name: topic::UPDATE,
		default_permission: topic::DEFAULT_PERMISSION,
		build: topic::update_handler,
	},
	ActionDefinition {
		name: topic::DELETE,
		default_permission: topic::DEFAULT_PERMISSION,
		build: topic::delete_handler,
	},
	ActionDefinition {
		name: agenda_item::UPDATE,
		default_permission: agenda_item::DEFAULT_PERMISSION,
		build: agenda_item::update_handler,
	},
	ActionDefinition {
		name: agenda_item::DELETE,
		default_permission: agenda_item::DEFAULT_PERMISSION,
		build: agenda_item::delete_handler,
	},
];

/// Looks up a built-in action by name.
pub fn definition(name: &str) -> Option<&'static ActionDefinition> {
	CATALOGUE.iter().find(|def| def.name == name)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::handler::ActionHandler;

	#[test]
	fn default_permissions_are_valid() {
		for def in CATALOGUE {
			assert!(
				Permission::parse(def.default_permission).is_ok(),
				"{} has an invalid default permission",
				def.name
			);
		}
	}

	#[test]
	fn handlers_report_their_catalogue_name() {
		for def in CATALOGUE {
			let handler = (def.build)(def.default_permission());
			assert_eq!(handler.name(), def.name);
			assert!(handler.fields().is_writable(handler.fields().required()[0]));
		}
	}

	#[test]
	fn names_are_unique() {
		let mut names: Vec<_> = CATALOGUE.iter().map(|def| def.name).collect();
		names.sort_unstable();
		names.dedup();
		assert_eq!(names.len(), CATALOGUE.len());
	}

	#[test]
	fn definition_lookup() {
		assert!(definition("topic.update").is_some());
		assert!(definition("topic.archive").is_none());
	}
}
