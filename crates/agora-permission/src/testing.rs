// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fixture builder for permission tests.
//!
//! Every meeting `m` created here gets a default group `2m - 1` (also used
//! for anonymous callers) and an admin group `2m`, so meeting 1 has default
//! group 1 and admin group 2.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::error::ProviderError;
use crate::fqfield::Fqfield;
use crate::memory::MemoryDataProvider;
use crate::provider::DataProvider;

/// Meeting used by helpers that take no meeting argument.
pub const DEFAULT_MEETING: u64 = 1;

const SUPERADMIN_ROLE: u64 = 1;

/// Builds a [`MemoryDataProvider`] snapshot step by step.
#[derive(Debug, Clone, Default)]
pub struct TestDataProvider {
	inner: MemoryDataProvider,
}

impl TestDataProvider {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn default_group_of(meeting_id: u64) -> u64 {
		meeting_id * 2 - 1
	}

	pub fn admin_group_of(meeting_id: u64) -> u64 {
		meeting_id * 2
	}

	pub fn set(&mut self, collection: &str, id: u64, field: &str, value: Value) -> &mut Self {
		self.inner.insert(Fqfield::new(collection, id, field), value);
		self
	}

	pub fn add_user(&mut self, user_id: u64) -> &mut Self {
		self.set("user", user_id, "id", json!(user_id))
	}

	pub fn add_user_with_superadmin_role(&mut self, user_id: u64) -> &mut Self {
		self.add_user(user_id);
		self.set("user", user_id, "role_id", json!(SUPERADMIN_ROLE));
		self.set("role", SUPERADMIN_ROLE, "is_superadmin_role", json!(true))
	}

	/// Creates the meeting with its default and admin groups if missing.
	pub fn add_basic_meeting(&mut self, meeting_id: u64) -> &mut Self {
		let meeting = Fqfield::new("meeting", meeting_id, "id");
		if self.inner.get_value(&meeting).is_some() {
			return self;
		}

		let default_group = Self::default_group_of(meeting_id);
		let admin_group = Self::admin_group_of(meeting_id);
		self.inner.insert(meeting, json!(meeting_id));
		self.set("meeting", meeting_id, "default_group_id", json!(default_group));
		self.set("meeting", meeting_id, "admin_group_id", json!(admin_group));
		for group in [default_group, admin_group] {
			self.set("group", group, "id", json!(group));
			self.set("group", group, "meeting_id", json!(meeting_id));
		}
		self
	}

	/// Adds the user to the meeting's default group.
	pub fn add_user_to_meeting(&mut self, user_id: u64, meeting_id: u64) -> &mut Self {
		self.add_user_to_group(user_id, meeting_id, Self::default_group_of(meeting_id))
	}

	pub fn add_user_with_admin_group_to_meeting(&mut self, user_id: u64, meeting_id: u64) -> &mut Self {
		self.add_user_to_group(user_id, meeting_id, Self::admin_group_of(meeting_id))
	}

	pub fn add_user_to_group(&mut self, user_id: u64, meeting_id: u64, group_id: u64) -> &mut Self {
		self.add_user(user_id);
		self.add_basic_meeting(meeting_id);
		self.set("group", group_id, "meeting_id", json!(meeting_id));
		self.push(
			Fqfield::new("user", user_id, format!("group_${meeting_id}_ids")),
			json!(group_id),
		)
	}

	pub fn add_permission_to_group(&mut self, group_id: u64, permission: &str) -> &mut Self {
		self.push(
			Fqfield::new("group", group_id, "permissions"),
			json!(permission),
		)
	}

	/// Enables anonymous access for [`DEFAULT_MEETING`].
	pub fn enable_anonymous(&mut self) -> &mut Self {
		self.enable_anonymous_in(DEFAULT_MEETING)
	}

	pub fn enable_anonymous_in(&mut self, meeting_id: u64) -> &mut Self {
		self.add_basic_meeting(meeting_id);
		self.set("meeting", meeting_id, "enable_anonymous", json!(true))
	}

	pub fn add_topic(&mut self, topic_id: u64, meeting_id: u64) -> &mut Self {
		self.add_basic_meeting(meeting_id);
		self.set("topic", topic_id, "id", json!(topic_id));
		self.set("topic", topic_id, "meeting_id", json!(meeting_id))
	}

	/// Topic 1 in [`DEFAULT_MEETING`].
	pub fn add_basic_topic(&mut self) -> &mut Self {
		self.add_topic(1, DEFAULT_MEETING)
	}

	pub fn add_agenda_item(&mut self, item_id: u64, meeting_id: u64) -> &mut Self {
		self.add_basic_meeting(meeting_id);
		self.set("agenda_item", item_id, "id", json!(item_id));
		self.set("agenda_item", item_id, "meeting_id", json!(meeting_id))
	}

	pub fn provider(&self) -> &MemoryDataProvider {
		&self.inner
	}

	pub fn into_provider(self) -> MemoryDataProvider {
		self.inner
	}

	fn push(&mut self, fqfield: Fqfield, item: Value) -> &mut Self {
		let mut items = match self.inner.remove(&fqfield) {
			Some(Value::Array(items)) => items,
			_ => Vec::new(),
		};
		if !items.contains(&item) {
			items.push(item);
		}
		self.inner.insert(fqfield, Value::Array(items));
		self
	}
}

#[async_trait]
impl DataProvider for TestDataProvider {
	async fn get(&self, fqfields: &[Fqfield]) -> Result<HashMap<Fqfield, Value>, ProviderError> {
		self.inner.get(fqfields).await
	}
}
