// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration produced by a single source.

use serde::{Deserialize, Serialize};

use crate::sections::{LoggingConfigLayer, RulesConfigLayer};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PermissionConfigLayer {
	pub logging: Option<LoggingConfigLayer>,
	pub rules: Option<RulesConfigLayer>,
}

impl PermissionConfigLayer {
	/// Overlays `other` on top of `self`; values set in `other` win.
	pub fn merge(&mut self, other: Self) {
		if let Some(logging) = other.logging {
			self.logging.get_or_insert_with(Default::default).merge(logging);
		}
		if let Some(rules) = other.rules {
			self.rules.get_or_insert_with(Default::default).merge(rules);
		}
	}
}
