// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Action registry.
//!
//! Maps action names to handlers so a dispatcher can evaluate any action
//! without knowing its policy. [`ActionRegistry::is_allowed`] evaluates a
//! batch of payloads for one action and stops at the first denial or error.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::decision::{Addition, Verdict};
use crate::error::{PermissionError, Result};
use crate::fqfield::FqfieldData;
use crate::handler::{ActionHandler, IsAllowedParams};
use crate::policies::{self, CATALOGUE};
use crate::provider::DataProvider;
use crate::rules::PermissionRules;
use crate::types::UserId;

/// Outcome of a batch evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchVerdict {
	/// Every payload is allowed; one addition slot per payload.
	Allowed(Vec<Option<Addition>>),
	/// The payload at `index` was denied.
	Denied { index: usize },
}

impl BatchVerdict {
	pub fn is_allowed(&self) -> bool {
		matches!(self, BatchVerdict::Allowed(_))
	}
}

/// Registry of action handlers keyed by action name.
#[derive(Clone, Default)]
pub struct ActionRegistry {
	handlers: HashMap<String, Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registry with every built-in action at its default permission.
	pub fn standard() -> Self {
		let mut registry = Self::new();
		for def in CATALOGUE {
			registry.register(Arc::new((def.build)(def.default_permission())));
		}
		registry
	}

	/// Registry with every built-in action, applying `rules` overrides.
	///
	/// Fails if an override names an action outside the catalogue.
	pub fn with_rules(rules: &PermissionRules) -> Result<Self> {
		if let Some(unknown) = rules
			.overridden_actions()
			.find(|action| policies::definition(action).is_none())
		{
			return Err(PermissionError::UnknownAction(unknown.to_string()));
		}

		let mut registry = Self::new();
		for def in CATALOGUE {
			let permission = rules.resolve(def.name, &def.default_permission());
			registry.register(Arc::new((def.build)(permission)));
		}
		Ok(registry)
	}

	/// Registers a handler under its own name, returning any handler it replaced.
	pub fn register(&mut self, handler: Arc<dyn ActionHandler>) -> Option<Arc<dyn ActionHandler>> {
		self.handlers.insert(handler.name().to_string(), handler)
	}

	pub fn get(&self, action: &str) -> Option<&Arc<dyn ActionHandler>> {
		self.handlers.get(action)
	}

	/// Registered action names in sorted order.
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}

	pub fn len(&self) -> usize {
		self.handlers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}

	/// Evaluates `action` for every payload in order.
	///
	/// An unknown action is a hard error. The first error or denial ends the
	/// batch. An empty batch is allowed.
	#[instrument(
		level = "debug",
		skip(self, payloads, provider),
		fields(user_id = %user_id, payloads = payloads.len())
	)]
	pub async fn is_allowed(
		&self,
		action: &str,
		user_id: UserId,
		payloads: &[FqfieldData],
		provider: &dyn DataProvider,
	) -> Result<BatchVerdict> {
		let handler = self
			.get(action)
			.ok_or_else(|| PermissionError::UnknownAction(action.to_string()))?;

		let mut additions = Vec::with_capacity(payloads.len());
		for (index, data) in payloads.iter().enumerate() {
			let params = IsAllowedParams::new(user_id, data, provider);
			match handler.is_allowed(&params).await? {
				Verdict::Allowed(addition) => additions.push(addition),
				Verdict::Denied => {
					debug!(index, "batch denied");
					return Ok(BatchVerdict::Denied { index });
				}
			}
		}

		Ok(BatchVerdict::Allowed(additions))
	}
}

impl fmt::Debug for ActionRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ActionRegistry")
			.field("actions", &self.names())
			.finish()
	}
}
